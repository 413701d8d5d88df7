//! Straight-line camera sweep with lateral jitter.
//!
//! Cameras are spaced evenly in `t` along a segment given in field-relative coordinates
//! and pushed sideways along the unit left-hand perpendicular by an independent uniform
//! amount drawn from `[-jitter_abs, jitter_abs)`; the upper edge is excluded like every
//! other uniform draw in the crate. A zero-length segment has no perpendicular; every
//! camera then sits on the base point and the plan is flagged as degenerate.
use glam::Vec2;
use rand::RngCore;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::camera::{CameraIntrinsics, CameraPose};
use crate::error::{Error, Result};
use crate::field::FieldBounds;
use crate::sampling::symmetric;

/// Sweep parameters relative to the field.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
#[derive(Clone, Debug, PartialEq)]
pub struct SweepConfig {
    /// Start as fractions of (width, length), each in `[0, 1]`.
    pub start_rel: (f32, f32),
    /// End as fractions of (width, length), each in `[0, 1]`.
    pub end_rel: (f32, f32),
    /// Lateral jitter amplitude as a fraction of the smaller field dimension.
    pub jitter_rel: f32,
    /// Number of cameras, at least 2.
    pub count: usize,
    /// Camera height above the ground.
    pub height: f32,
    /// Camera pitch in degrees.
    pub pitch: f32,
    pub intrinsics: CameraIntrinsics,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            start_rel: (0.05, 0.10),
            end_rel: (0.95, 0.10),
            jitter_rel: 0.015,
            count: 12,
            height: 75.0,
            pitch: -90.0,
            intrinsics: CameraIntrinsics::default(),
        }
    }
}

impl SweepConfig {
    pub fn with_endpoints(mut self, start_rel: (f32, f32), end_rel: (f32, f32)) -> Self {
        self.start_rel = start_rel;
        self.end_rel = end_rel;
        self
    }

    pub fn with_jitter_rel(mut self, jitter_rel: f32) -> Self {
        self.jitter_rel = jitter_rel;
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn with_height(mut self, height: f32) -> Self {
        self.height = height;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.count < 2 {
            return Err(Error::InvalidConfig(format!(
                "sweep needs at least 2 cameras, got {}",
                self.count
            )));
        }
        let in_unit = |v: f32| (0.0..=1.0).contains(&v);
        for (name, (x, y)) in [("start_rel", self.start_rel), ("end_rel", self.end_rel)] {
            if !(in_unit(x) && in_unit(y)) {
                return Err(Error::InvalidConfig(format!(
                    "{name} must lie in [0, 1]^2, got ({x}, {y})"
                )));
            }
        }
        if !(self.jitter_rel.is_finite() && self.jitter_rel >= 0.0) {
            return Err(Error::InvalidConfig("jitter_rel must be >= 0".into()));
        }
        if !self.height.is_finite() || !self.pitch.is_finite() {
            return Err(Error::InvalidConfig(
                "camera height and pitch must be finite".into(),
            ));
        }
        Ok(())
    }
}

/// Sweep segment in absolute field coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SweepLine {
    pub start: Vec2,
    pub end: Vec2,
    pub count: usize,
    pub jitter_abs: f32,
}

impl SweepLine {
    pub fn from_bounds(bounds: &FieldBounds, config: &SweepConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            start: bounds.absolute(config.start_rel.into()),
            end: bounds.absolute(config.end_rel.into()),
            count: config.count,
            jitter_abs: config.jitter_rel * bounds.min_dimension(),
        })
    }

    pub fn direction(&self) -> Vec2 {
        self.end - self.start
    }

    pub fn is_degenerate(&self) -> bool {
        self.direction().length_squared() == 0.0
    }

    /// Unit left-hand perpendicular `(-dy, dx) / |d|`, or zero for a degenerate line.
    pub fn perpendicular(&self) -> Vec2 {
        self.direction().perp().normalize_or_zero()
    }

    /// Sweep parameter of sample `i`.
    pub fn t(&self, i: usize) -> f32 {
        i as f32 / (self.count - 1) as f32
    }

    pub fn base_point(&self, i: usize) -> Vec2 {
        self.start + self.direction() * self.t(i)
    }
}

/// Ordered camera poses of one sweep.
#[derive(Clone, Debug)]
pub struct SweepPlan {
    pub line: SweepLine,
    /// Index order is sweep order.
    pub poses: Vec<CameraPose>,
    /// True when start and end coincide and no jitter could be applied.
    pub degenerate: bool,
}

/// Computes camera poses along a [`SweepLine`].
#[derive(Clone, Debug)]
pub struct CameraSweepPlanner {
    line: SweepLine,
    height: f32,
    pitch: f32,
    intrinsics: CameraIntrinsics,
}

impl CameraSweepPlanner {
    pub fn try_new(bounds: &FieldBounds, config: &SweepConfig) -> Result<Self> {
        Ok(Self {
            line: SweepLine::from_bounds(bounds, config)?,
            height: config.height,
            pitch: config.pitch,
            intrinsics: config.intrinsics,
        })
    }

    pub fn line(&self) -> &SweepLine {
        &self.line
    }

    /// Draws exactly one jitter value per camera, degenerate lines included.
    pub fn plan<R: RngCore>(&self, rng: &mut R) -> SweepPlan {
        let degenerate = self.line.is_degenerate();
        if degenerate {
            warn!(
                "Camera sweep start and end coincide at ({}, {}); lateral jitter disabled.",
                self.line.start.x, self.line.start.y
            );
        }
        let perp = self.line.perpendicular();

        let poses = (0..self.line.count)
            .map(|i| {
                let j = symmetric(rng, self.line.jitter_abs);
                let p = self.line.base_point(i) + perp * j;
                CameraPose::new(p.extend(self.height), self.pitch, self.intrinsics)
            })
            .collect();

        SweepPlan {
            line: self.line,
            poses,
            degenerate,
        }
    }
}
