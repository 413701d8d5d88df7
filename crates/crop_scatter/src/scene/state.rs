//! Live scene state shared by the builder, the frame randomizer and the session runner.
use crate::camera::CameraPose;
use crate::error::{Error, Result};
use crate::field::{FieldBounds, Region};
use crate::host::{
    CameraHandle, GroundHandle, LightHandle, LightPose, PlacedHandle, RenderTargetHandle,
};
use crate::placement::Placement;
use crate::sampling::category::{CategoryId, VariantChooser, WeightedCategory};

/// An object known to the host, with its base pose and the pose of the current frame.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedObject {
    pub handle: PlacedHandle,
    /// Semantic class passed to the host, e.g. `maize`.
    pub label: String,
    /// Pose from scene construction. Frame randomization never changes it.
    pub base: Placement,
    /// Pose the host should show for the current frame.
    pub current: Placement,
    /// Area the object may move within during frame randomization.
    pub bounds: Region,
    pub(crate) pending_recreate: bool,
}

impl PlacedObject {
    pub(crate) fn new(
        handle: PlacedHandle,
        label: &str,
        placement: Placement,
        bounds: Region,
    ) -> Self {
        Self {
            handle,
            label: label.to_owned(),
            base: placement.clone(),
            current: placement,
            bounds,
            pending_recreate: false,
        }
    }

    /// True when the host object must be destroyed and recreated on the next sync.
    pub fn pending_recreate(&self) -> bool {
        self.pending_recreate
    }

    /// Stages a variant change. Pose-only handles reject any change of variant.
    pub(crate) fn stage_category(&mut self, category: CategoryId) -> Result<()> {
        if category == self.current.category_id {
            return Ok(());
        }
        if let PlacedHandle::PoseOnly(h) = self.handle {
            return Err(Error::UnsupportedReassignment {
                handle: h.0,
                from: self.current.category_id.clone(),
                to: category,
            });
        }
        self.base.category_id = category.clone();
        self.current.category_id = category;
        self.pending_recreate = true;
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlacedCamera {
    pub handle: CameraHandle,
    pub name: String,
    pub base: CameraPose,
    pub current: CameraPose,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlacedLight {
    pub handle: LightHandle,
    pub base: LightPose,
    pub current: LightPose,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlacedGround {
    pub handle: GroundHandle,
    pub textures: Vec<String>,
    /// Index into `textures` of the texture currently shown.
    pub current: Option<usize>,
}

impl PlacedGround {
    pub fn texture(&self) -> Option<&str> {
        self.current
            .and_then(|i| self.textures.get(i))
            .map(String::as_str)
    }
}

/// Addresses one placed object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlacementRef {
    Crop(usize),
    Weed(usize),
}

/// Everything the engine placed on the host, plus what it needs to re-randomize it.
#[derive(Clone, Debug)]
pub struct SceneState {
    pub bounds: FieldBounds,
    /// Crops, column by column.
    pub crops: Vec<PlacedObject>,
    pub weeds: Vec<PlacedObject>,
    /// Cameras in sweep order.
    pub cameras: Vec<PlacedCamera>,
    /// One render target per camera, same order.
    pub render_targets: Vec<RenderTargetHandle>,
    pub ground: Option<PlacedGround>,
    pub light: Option<PlacedLight>,
    /// Region weeds are resampled over.
    pub weed_region: Region,
    pub crop_variants: VariantChooser,
    pub weed_categories: Vec<WeightedCategory>,
}

impl SceneState {
    pub fn object(&self, target: PlacementRef) -> Result<&PlacedObject> {
        match target {
            PlacementRef::Crop(i) => self.crops.get(i).ok_or(Error::UnknownPlacement {
                group: "crop",
                index: i,
            }),
            PlacementRef::Weed(i) => self.weeds.get(i).ok_or(Error::UnknownPlacement {
                group: "weed",
                index: i,
            }),
        }
    }

    pub fn object_mut(&mut self, target: PlacementRef) -> Result<&mut PlacedObject> {
        match target {
            PlacementRef::Crop(i) => self.crops.get_mut(i).ok_or(Error::UnknownPlacement {
                group: "crop",
                index: i,
            }),
            PlacementRef::Weed(i) => self.weeds.get_mut(i).ok_or(Error::UnknownPlacement {
                group: "weed",
                index: i,
            }),
        }
    }

    /// Changes the variant of one placed object.
    ///
    /// Pose-only handles fail with [`Error::UnsupportedReassignment`] and stay untouched.
    /// Recreatable handles are marked and replaced on the next
    /// [`crate::frame::sync_to_host`]. Assigning the current variant is a no-op.
    pub fn reassign(
        &mut self,
        target: PlacementRef,
        category: impl Into<CategoryId>,
    ) -> Result<()> {
        self.object_mut(target)?.stage_category(category.into())
    }

    /// All placed objects, crops first.
    pub fn objects(&self) -> impl Iterator<Item = &PlacedObject> {
        self.crops.iter().chain(self.weeds.iter())
    }

    pub fn object_count(&self) -> usize {
        self.crops.len() + self.weeds.len()
    }

    /// Puts every object, camera and light back to its base pose.
    pub fn reset_to_base(&mut self) {
        for o in self.crops.iter_mut().chain(self.weeds.iter_mut()) {
            o.current = o.base.clone();
        }
        for c in &mut self.cameras {
            c.current = c.base;
        }
        if let Some(light) = &mut self.light {
            light.current = light.base;
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::{Vec2, Vec3};

    use super::*;
    use crate::host::ObjectHandle;

    fn object(handle: PlacedHandle) -> PlacedObject {
        PlacedObject::new(
            handle,
            "weed",
            Placement::new("taraxacum_01", Vec3::ZERO),
            Region::new(Vec2::splat(-1.0), Vec2::splat(1.0)),
        )
    }

    #[test]
    fn pose_only_objects_refuse_new_variants() {
        let mut o = object(PlacedHandle::PoseOnly(ObjectHandle(4)));
        let err = o.stage_category("taraxacum_02".into()).unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedReassignment { handle: 4, ref from, ref to }
                if from == "taraxacum_01" && to == "taraxacum_02"
        ));
        assert_eq!(o.current.category_id, "taraxacum_01");
        assert!(!o.pending_recreate());

        o.stage_category("taraxacum_01".into()).unwrap();
    }

    #[test]
    fn recreatable_objects_stage_a_recreate() {
        let mut o = object(PlacedHandle::Recreatable(ObjectHandle(4)));
        o.stage_category("taraxacum_02".into()).unwrap();
        assert!(o.pending_recreate());
        assert_eq!(o.base.category_id, "taraxacum_02");
        assert_eq!(o.current.category_id, "taraxacum_02");
    }

    #[test]
    fn ground_texture_follows_index() {
        let mut g = PlacedGround {
            handle: GroundHandle(0),
            textures: vec!["a.png".into(), "b.png".into()],
            current: None,
        };
        assert_eq!(g.texture(), None);
        g.current = Some(1);
        assert_eq!(g.texture(), Some("b.png"));
    }
}
