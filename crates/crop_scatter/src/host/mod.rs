//! Port to the rendering host.
//!
//! The engine decides what goes where; a [`SceneHost`] owns the actual 3D scene, loads
//! assets, renders frames and writes annotations. Everything crossing this boundary is a
//! plain value or an opaque handle.
use std::fmt;
use std::path::PathBuf;

use glam::Vec3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::camera::CameraPose;

pub mod recording;

pub use recording::RecordingHost;

/// Failure reported by a host implementation.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct HostError {
    message: String,
}

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub type HostResult<T> = std::result::Result<T, HostError>;

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", stringify!($name), self.0)
            }
        }
    };
}

handle!(
    /// Object created by [`SceneHost::place_object`].
    ObjectHandle
);
handle!(
    /// Camera created by [`SceneHost::create_camera`].
    CameraHandle
);
handle!(
    /// Render target created by [`SceneHost::create_render_target`].
    RenderTargetHandle
);
handle!(
    /// Light created by [`SceneHost::create_light`].
    LightHandle
);
handle!(
    /// Ground patch created by [`SceneHost::create_ground`].
    GroundHandle
);

/// What the engine may do with a placed object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlacedHandle {
    /// Only pose (position, scale, rotation) can change after creation.
    PoseOnly(ObjectHandle),
    /// The host can destroy the object, so a variant change is a destroy/recreate.
    Recreatable(ObjectHandle),
}

impl PlacedHandle {
    pub fn object(&self) -> ObjectHandle {
        match *self {
            PlacedHandle::PoseOnly(h) | PlacedHandle::Recreatable(h) => h,
        }
    }

    pub fn is_recreatable(&self) -> bool {
        matches!(self, PlacedHandle::Recreatable(_))
    }
}

/// Annotation channels the host writer should produce.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnnotationKind {
    Rgb,
    BoundingBox2dTight,
    SemanticSegmentation,
}

/// Output settings for the host writer.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct WriterConfig {
    pub output_dir: PathBuf,
    pub annotations: Vec<AnnotationKind>,
}

/// Light source type.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LightKind {
    #[default]
    Distant,
    Dome,
}

/// Light pose and intensity.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightPose {
    pub kind: LightKind,
    pub position: Vec3,
    /// Euler rotation in degrees.
    pub rotation: Vec3,
    pub intensity: f32,
}

impl Default for LightPose {
    fn default() -> Self {
        Self {
            kind: LightKind::Distant,
            position: Vec3::new(0.0, 0.0, 100.0),
            rotation: Vec3::new(315.0, 0.0, 0.0),
            intensity: 1000.0,
        }
    }
}

/// The rendering collaborator.
///
/// Methods are called synchronously from a single thread. Errors are opaque to the
/// engine and propagated as [`crate::error::Error::Host`].
pub trait SceneHost {
    /// Creates an object of the given variant, tagged with a semantic class for annotation.
    fn place_object(
        &mut self,
        category_id: &str,
        semantic_class: &str,
        position: Vec3,
        scale: f32,
        rotation_z: f32,
    ) -> HostResult<ObjectHandle>;

    fn set_object_pose(
        &mut self,
        handle: ObjectHandle,
        position: Vec3,
        scale: f32,
        rotation_z: f32,
    ) -> HostResult<()>;

    /// Whether [`SceneHost::destroy_object`] is available.
    fn supports_recreate(&self) -> bool {
        false
    }

    fn destroy_object(&mut self, handle: ObjectHandle) -> HostResult<()> {
        Err(HostError::new(format!(
            "host cannot destroy {handle}; objects are pose-only"
        )))
    }

    fn create_camera(&mut self, name: &str, pose: &CameraPose) -> HostResult<CameraHandle>;

    fn set_camera_pose(&mut self, handle: CameraHandle, pose: &CameraPose) -> HostResult<()>;

    fn create_render_target(
        &mut self,
        camera: CameraHandle,
        resolution: (u32, u32),
    ) -> HostResult<RenderTargetHandle>;

    fn create_ground(&mut self, scale: f32, texture: Option<&str>) -> HostResult<GroundHandle>;

    fn set_ground_texture(&mut self, ground: GroundHandle, texture: &str) -> HostResult<()>;

    fn create_light(&mut self, light: &LightPose) -> HostResult<LightHandle>;

    fn set_light(&mut self, handle: LightHandle, light: &LightPose) -> HostResult<()>;

    fn attach_writer(
        &mut self,
        targets: &[RenderTargetHandle],
        writer: &WriterConfig,
    ) -> HostResult<()>;

    fn run_frames(&mut self, count: usize) -> HostResult<()>;
}
