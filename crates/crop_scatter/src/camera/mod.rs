//! Camera poses and the straight-line camera sweep.
use glam::Vec3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod sweep;

pub use sweep::{CameraSweepPlanner, SweepConfig, SweepLine, SweepPlan};

/// Lens parameters shared by every camera of a sweep.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraIntrinsics {
    pub focal_length: f32,
    pub focus_distance: f32,
    pub f_stop: f32,
}

impl Default for CameraIntrinsics {
    fn default() -> Self {
        Self {
            focal_length: 35.0,
            focus_distance: 75.0,
            f_stop: 4.0,
        }
    }
}

/// Pose and lens of one camera.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    /// Pitch in degrees; `-90` looks straight down.
    pub pitch: f32,
    pub focal_length: f32,
    pub focus_distance: f32,
    pub f_stop: f32,
}

impl CameraPose {
    pub fn new(position: Vec3, pitch: f32, intrinsics: CameraIntrinsics) -> Self {
        Self {
            position,
            pitch,
            focal_length: intrinsics.focal_length,
            focus_distance: intrinsics.focus_distance,
            f_stop: intrinsics.f_stop,
        }
    }

    pub fn intrinsics(&self) -> CameraIntrinsics {
        CameraIntrinsics {
            focal_length: self.focal_length,
            focus_distance: self.focus_distance,
            f_stop: self.f_stop,
        }
    }
}

/// Host-facing camera name for sweep index `index`.
pub fn camera_name(index: usize) -> String {
    format!("Cam_{index:02}")
}
