//! In-memory [`SceneHost`] that records every command.
//!
//! Useful for tests, previews and dry runs: nothing is rendered, but the resulting
//! scene can be inspected after building or after any number of frames.
use std::collections::BTreeMap;

use glam::Vec3;

use crate::camera::CameraPose;
use crate::host::{
    CameraHandle, GroundHandle, HostError, HostResult, LightHandle, LightPose, ObjectHandle,
    RenderTargetHandle, SceneHost, WriterConfig,
};

/// Last known state of a recorded object.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectRecord {
    pub category_id: String,
    pub semantic_class: String,
    pub position: Vec3,
    pub scale: f32,
    pub rotation_z: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CameraRecord {
    pub name: String,
    pub pose: CameraPose,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GroundRecord {
    pub scale: f32,
    pub texture: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct RecordingHost {
    next_id: u64,
    recreatable: bool,
    objects: BTreeMap<ObjectHandle, ObjectRecord>,
    cameras: BTreeMap<CameraHandle, CameraRecord>,
    render_targets: BTreeMap<RenderTargetHandle, (CameraHandle, (u32, u32))>,
    grounds: BTreeMap<GroundHandle, GroundRecord>,
    lights: BTreeMap<LightHandle, LightPose>,
    writer: Option<(Vec<RenderTargetHandle>, WriterConfig)>,
    frames_run: usize,
    pose_updates: usize,
    destroyed: usize,
    fail_next_place: Option<String>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Host that also supports destroying objects.
    pub fn recreatable() -> Self {
        Self {
            recreatable: true,
            ..Self::default()
        }
    }

    /// Makes the next [`SceneHost::place_object`] call fail with `message`.
    pub fn fail_next_place(&mut self, message: impl Into<String>) {
        self.fail_next_place = Some(message.into());
    }

    fn next(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn object(&self, handle: ObjectHandle) -> Option<&ObjectRecord> {
        self.objects.get(&handle)
    }

    pub fn objects(&self) -> impl Iterator<Item = (&ObjectHandle, &ObjectRecord)> {
        self.objects.iter()
    }

    /// Live objects with the given semantic class.
    pub fn objects_with_class<'a>(
        &'a self,
        semantic_class: &'a str,
    ) -> impl Iterator<Item = &'a ObjectRecord> + 'a {
        self.objects
            .values()
            .filter(move |o| o.semantic_class == semantic_class)
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn camera(&self, handle: CameraHandle) -> Option<&CameraRecord> {
        self.cameras.get(&handle)
    }

    /// Cameras in creation order.
    pub fn cameras(&self) -> impl Iterator<Item = &CameraRecord> {
        self.cameras.values()
    }

    pub fn render_target_count(&self) -> usize {
        self.render_targets.len()
    }

    pub fn ground(&self, handle: GroundHandle) -> Option<&GroundRecord> {
        self.grounds.get(&handle)
    }

    pub fn light(&self, handle: LightHandle) -> Option<&LightPose> {
        self.lights.get(&handle)
    }

    pub fn writer(&self) -> Option<&(Vec<RenderTargetHandle>, WriterConfig)> {
        self.writer.as_ref()
    }

    pub fn frames_run(&self) -> usize {
        self.frames_run
    }

    pub fn pose_updates(&self) -> usize {
        self.pose_updates
    }

    pub fn destroyed(&self) -> usize {
        self.destroyed
    }
}

fn missing(what: impl std::fmt::Display) -> HostError {
    HostError::new(format!("unknown {what}"))
}

impl SceneHost for RecordingHost {
    fn place_object(
        &mut self,
        category_id: &str,
        semantic_class: &str,
        position: Vec3,
        scale: f32,
        rotation_z: f32,
    ) -> HostResult<ObjectHandle> {
        if let Some(message) = self.fail_next_place.take() {
            return Err(HostError::new(message));
        }
        let handle = ObjectHandle(self.next());
        self.objects.insert(
            handle,
            ObjectRecord {
                category_id: category_id.to_owned(),
                semantic_class: semantic_class.to_owned(),
                position,
                scale,
                rotation_z,
            },
        );
        Ok(handle)
    }

    fn set_object_pose(
        &mut self,
        handle: ObjectHandle,
        position: Vec3,
        scale: f32,
        rotation_z: f32,
    ) -> HostResult<()> {
        let record = self.objects.get_mut(&handle).ok_or_else(|| missing(handle))?;
        record.position = position;
        record.scale = scale;
        record.rotation_z = rotation_z;
        self.pose_updates += 1;
        Ok(())
    }

    fn supports_recreate(&self) -> bool {
        self.recreatable
    }

    fn destroy_object(&mut self, handle: ObjectHandle) -> HostResult<()> {
        if !self.recreatable {
            return Err(HostError::new(format!(
                "host cannot destroy {handle}; objects are pose-only"
            )));
        }
        self.objects.remove(&handle).ok_or_else(|| missing(handle))?;
        self.destroyed += 1;
        Ok(())
    }

    fn create_camera(&mut self, name: &str, pose: &CameraPose) -> HostResult<CameraHandle> {
        let handle = CameraHandle(self.next());
        self.cameras.insert(
            handle,
            CameraRecord {
                name: name.to_owned(),
                pose: *pose,
            },
        );
        Ok(handle)
    }

    fn set_camera_pose(&mut self, handle: CameraHandle, pose: &CameraPose) -> HostResult<()> {
        let record = self.cameras.get_mut(&handle).ok_or_else(|| missing(handle))?;
        record.pose = *pose;
        Ok(())
    }

    fn create_render_target(
        &mut self,
        camera: CameraHandle,
        resolution: (u32, u32),
    ) -> HostResult<RenderTargetHandle> {
        if !self.cameras.contains_key(&camera) {
            return Err(missing(camera));
        }
        if resolution.0 == 0 || resolution.1 == 0 {
            return Err(HostError::new("render target resolution must be non-zero"));
        }
        let handle = RenderTargetHandle(self.next());
        self.render_targets.insert(handle, (camera, resolution));
        Ok(handle)
    }

    fn create_ground(&mut self, scale: f32, texture: Option<&str>) -> HostResult<GroundHandle> {
        let handle = GroundHandle(self.next());
        self.grounds.insert(
            handle,
            GroundRecord {
                scale,
                texture: texture.map(str::to_owned),
            },
        );
        Ok(handle)
    }

    fn set_ground_texture(&mut self, ground: GroundHandle, texture: &str) -> HostResult<()> {
        let record = self.grounds.get_mut(&ground).ok_or_else(|| missing(ground))?;
        record.texture = Some(texture.to_owned());
        Ok(())
    }

    fn create_light(&mut self, light: &LightPose) -> HostResult<LightHandle> {
        let handle = LightHandle(self.next());
        self.lights.insert(handle, *light);
        Ok(handle)
    }

    fn set_light(&mut self, handle: LightHandle, light: &LightPose) -> HostResult<()> {
        let record = self.lights.get_mut(&handle).ok_or_else(|| missing(handle))?;
        *record = *light;
        Ok(())
    }

    fn attach_writer(
        &mut self,
        targets: &[RenderTargetHandle],
        writer: &WriterConfig,
    ) -> HostResult<()> {
        if let Some(t) = targets.iter().find(|t| !self.render_targets.contains_key(*t)) {
            return Err(missing(t));
        }
        self.writer = Some((targets.to_vec(), writer.clone()));
        Ok(())
    }

    fn run_frames(&mut self, count: usize) -> HostResult<()> {
        if self.writer.is_none() {
            return Err(HostError::new("no writer attached"));
        }
        self.frames_run += count;
        Ok(())
    }
}
