//! Object placement: the crop lattice and the weed scatter.
use glam::{Vec2, Vec3};
use rand::RngCore;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sampling::category::CategoryId;
use crate::sampling::{angle_deg, uniform};

pub mod grid;
pub mod scatter;

pub use grid::{GridLayout, GridPlacer};
pub use scatter::{ScatterLayout, ScatterMode, ScatterPlacer};

/// One object handed to the scene host.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct Placement {
    /// Variant (asset) identifier.
    pub category_id: CategoryId,
    /// Position in field coordinates; Z is the ground height.
    pub position: Vec3,
    /// Uniform scale factor.
    pub scale: f32,
    /// Rotation about the vertical axis in degrees, `[0, 360)`.
    pub rotation_z: f32,
}

impl Placement {
    pub fn new(category_id: impl Into<CategoryId>, position: Vec3) -> Self {
        Self {
            category_id: category_id.into(),
            position,
            scale: 1.0,
            rotation_z: 0.0,
        }
    }

    pub fn ground_position(&self) -> Vec2 {
        self.position.truncate()
    }

    /// Draws rotation then scale, in that order.
    pub(crate) fn randomize_pose(&mut self, scale: &ScaleSpec, rng: &mut dyn RngCore) {
        self.rotation_z = angle_deg(rng);
        self.scale = scale.sample(rng);
    }
}

/// How a placer assigns scale.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScaleSpec {
    /// The same scale for every object; draws nothing from the RNG.
    Fixed(f32),
    /// Uniform in `[min, max)`.
    Uniform { min: f32, max: f32 },
}

impl Default for ScaleSpec {
    fn default() -> Self {
        ScaleSpec::Fixed(1.0)
    }
}

impl ScaleSpec {
    pub fn validate(&self) -> Result<()> {
        match *self {
            ScaleSpec::Fixed(s) if !(s.is_finite() && s > 0.0) => {
                Err(Error::InvalidConfig(format!("scale must be > 0, got {s}")))
            }
            ScaleSpec::Uniform { min, max }
                if !(min.is_finite() && max.is_finite() && min > 0.0 && min <= max) =>
            {
                Err(Error::InvalidConfig(format!(
                    "scale range must satisfy 0 < min <= max, got [{min}, {max}]"
                )))
            }
            _ => Ok(()),
        }
    }

    pub fn sample(&self, rng: &mut dyn RngCore) -> f32 {
        match *self {
            ScaleSpec::Fixed(s) => s,
            ScaleSpec::Uniform { min, max } => uniform(rng, min, max),
        }
    }

    /// Smallest and largest scale this spec can produce.
    pub fn bounds(&self) -> (f32, f32) {
        match *self {
            ScaleSpec::Fixed(s) => (s, s),
            ScaleSpec::Uniform { min, max } => (min, max),
        }
    }
}
