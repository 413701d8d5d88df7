//! Per-frame randomization of an existing scene.
//!
//! Every perturbation is computed from the base layout recorded at build time, so frames
//! never accumulate drift and any frame can be reproduced from its RNG state alone.
//! [`randomize_frame`] only updates [`SceneState`]; [`sync_to_host`] pushes the result.
//!
//! RNG draw order per frame is fixed: ground texture, crops (dx, dy, scale, rotation),
//! weeds (x, y, scale, rotation), cameras (height, pitch), light (intensity, dx, dy),
//! then variant reassignment when enabled.
use glam::{Vec2, Vec3};
use rand::RngCore;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::camera::CameraPose;
use crate::error::{Error, Result};
use crate::host::{LightPose, PlacedHandle, SceneHost};
use crate::placement::Placement;
use crate::sampling::category::{sample_one, CategoryId};
use crate::sampling::{angle_deg, index, symmetric, uniform};
use crate::scene::{PlacedObject, SceneState};

/// Bounds of the per-frame perturbations.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
#[derive(Clone, Debug, PartialEq)]
pub struct FrameRandomizeConfig {
    /// Crop offset amplitude on each ground axis. Offsets that would leave the crop's
    /// lattice cell are clamped to the cell edge.
    pub crop_jitter: f32,
    /// Factor range applied to the base crop scale.
    pub crop_scale: (f32, f32),
    /// Factor range applied to the base weed scale.
    pub weed_scale: (f32, f32),
    /// Camera height offset amplitude.
    pub camera_height_jitter: f32,
    /// Camera pitch offset amplitude in degrees.
    pub camera_pitch_jitter: f32,
    /// Absolute light intensity range; `None` keeps the base intensity.
    pub light_intensity: Option<(f32, f32)>,
    /// Light offset amplitude on each ground axis.
    pub light_offset: f32,
    /// Re-choose the ground texture every frame.
    pub randomize_ground: bool,
    /// Re-choose every object's variant every frame. Needs a host that can recreate objects.
    pub reassign_variants: bool,
}

impl Default for FrameRandomizeConfig {
    fn default() -> Self {
        Self {
            crop_jitter: 1.4,
            crop_scale: (0.8, 1.2),
            weed_scale: (0.6, 1.4),
            camera_height_jitter: 10.0,
            camera_pitch_jitter: 5.0,
            light_intensity: Some((800.0, 1200.0)),
            light_offset: 20.0,
            randomize_ground: true,
            reassign_variants: false,
        }
    }
}

impl FrameRandomizeConfig {
    /// Leaves every pose at its base value.
    pub fn disabled() -> Self {
        Self {
            crop_jitter: 0.0,
            crop_scale: (1.0, 1.0),
            weed_scale: (1.0, 1.0),
            camera_height_jitter: 0.0,
            camera_pitch_jitter: 0.0,
            light_intensity: None,
            light_offset: 0.0,
            randomize_ground: false,
            reassign_variants: false,
        }
    }

    pub fn with_crop_jitter(mut self, crop_jitter: f32) -> Self {
        self.crop_jitter = crop_jitter;
        self
    }

    pub fn with_reassign_variants(mut self, reassign_variants: bool) -> Self {
        self.reassign_variants = reassign_variants;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let amplitudes = [
            ("crop_jitter", self.crop_jitter),
            ("camera_height_jitter", self.camera_height_jitter),
            ("camera_pitch_jitter", self.camera_pitch_jitter),
            ("light_offset", self.light_offset),
        ];
        for (name, v) in amplitudes {
            if !(v.is_finite() && v >= 0.0) {
                return Err(Error::InvalidConfig(format!("{name} must be >= 0, got {v}")));
            }
        }
        let ranges = [
            ("crop_scale", Some(self.crop_scale)),
            ("weed_scale", Some(self.weed_scale)),
            ("light_intensity", self.light_intensity),
        ];
        for (name, (lo, hi)) in ranges
            .into_iter()
            .filter_map(|(name, r)| r.map(|r| (name, r)))
        {
            if !(lo.is_finite() && hi.is_finite() && lo >= 0.0 && lo <= hi) {
                return Err(Error::InvalidConfig(format!(
                    "{name} must satisfy 0 <= min <= max, got ({lo}, {hi})"
                )));
            }
        }
        Ok(())
    }
}

/// Poses drawn for one frame, applied only once every draw succeeded.
struct FrameDraw {
    ground: Option<usize>,
    crops: Vec<Placement>,
    weeds: Vec<Placement>,
    cameras: Vec<CameraPose>,
    light: Option<LightPose>,
}

/// Perturbs the scene for one frame.
///
/// Crops move by at most `crop_jitter` per axis around their lattice point and never leave
/// their lattice cell. Weeds are redrawn uniformly over their scatter region. Scales are
/// the base scale times a factor from the configured range; rotations are redrawn in
/// `[0, 360)`. Nothing in `state` changes when an error is returned.
pub fn randomize_frame<R: RngCore>(
    state: &mut SceneState,
    rng: &mut R,
    config: &FrameRandomizeConfig,
) -> Result<()> {
    config.validate()?;

    let ground = match &state.ground {
        Some(g) if config.randomize_ground && g.textures.len() > 1 => {
            Some(index(rng, g.textures.len()))
        }
        Some(g) => g.current,
        None => None,
    };

    let (crop_lo, crop_hi) = config.crop_scale;
    let mut crops = Vec::with_capacity(state.crops.len());
    for o in &state.crops {
        let offset = Vec2::new(
            symmetric(rng, config.crop_jitter),
            symmetric(rng, config.crop_jitter),
        );
        let p = o.bounds.clamp(o.base.ground_position() + offset);
        let mut next = o.current.clone();
        next.position = p.extend(o.base.position.z);
        next.scale = o.base.scale * uniform(rng, crop_lo, crop_hi);
        next.rotation_z = angle_deg(rng);
        crops.push(next);
    }

    let (weed_lo, weed_hi) = config.weed_scale;
    let mut weeds = Vec::with_capacity(state.weeds.len());
    for o in &state.weeds {
        let x = uniform(rng, o.bounds.min.x, o.bounds.max.x);
        let y = uniform(rng, o.bounds.min.y, o.bounds.max.y);
        let mut next = o.current.clone();
        next.position = Vec3::new(x, y, o.base.position.z);
        next.scale = o.base.scale * uniform(rng, weed_lo, weed_hi);
        next.rotation_z = angle_deg(rng);
        weeds.push(next);
    }

    let mut cameras = Vec::with_capacity(state.cameras.len());
    for c in &state.cameras {
        let mut pose = c.base;
        pose.position.z += symmetric(rng, config.camera_height_jitter);
        pose.pitch += symmetric(rng, config.camera_pitch_jitter);
        cameras.push(pose);
    }

    let light = state.light.as_ref().map(|l| {
        let mut pose = l.base;
        if let Some((lo, hi)) = config.light_intensity {
            pose.intensity = uniform(rng, lo, hi);
        }
        pose.position.x += symmetric(rng, config.light_offset);
        pose.position.y += symmetric(rng, config.light_offset);
        pose
    });

    let mut draw = FrameDraw {
        ground,
        crops,
        weeds,
        cameras,
        light,
    };

    if config.reassign_variants {
        for next in &mut draw.crops {
            next.category_id = state.crop_variants.choose(rng)?;
        }
        for next in &mut draw.weeds {
            next.category_id = sample_one(&state.weed_categories, rng)?.clone();
        }
        let objects = state.crops.iter().zip(&draw.crops);
        for (o, next) in objects.chain(state.weeds.iter().zip(&draw.weeds)) {
            check_reassignable(o, &next.category_id)?;
        }
    }

    apply(state, draw);
    debug!(
        "Randomized frame: {} crops, {} weeds, {} cameras.",
        state.crops.len(),
        state.weeds.len(),
        state.cameras.len()
    );
    Ok(())
}

fn check_reassignable(object: &PlacedObject, category: &CategoryId) -> Result<()> {
    match object.handle {
        PlacedHandle::PoseOnly(h) if *category != object.current.category_id => {
            Err(Error::UnsupportedReassignment {
                handle: h.0,
                from: object.current.category_id.clone(),
                to: category.clone(),
            })
        }
        _ => Ok(()),
    }
}

fn apply(state: &mut SceneState, draw: FrameDraw) {
    if let Some(g) = &mut state.ground {
        g.current = draw.ground;
    }
    let objects = state.crops.iter_mut().zip(draw.crops);
    for (o, next) in objects.chain(state.weeds.iter_mut().zip(draw.weeds)) {
        if next.category_id != o.current.category_id {
            o.base.category_id = next.category_id.clone();
            o.pending_recreate = true;
        }
        o.current = next;
    }
    for (c, pose) in state.cameras.iter_mut().zip(draw.cameras) {
        c.current = pose;
    }
    if let (Some(l), Some(pose)) = (&mut state.light, draw.light) {
        l.current = pose;
    }
}

/// Pushes the current frame of `state` to the host.
///
/// Objects with a staged variant change are placed again with their current pose, then
/// the old host object is destroyed and the handle replaced. If either step fails the old
/// object and handle are kept and the change stays staged. Everything else gets a pose
/// update.
pub fn sync_to_host<H: SceneHost + ?Sized>(state: &mut SceneState, host: &mut H) -> Result<()> {
    let mut recreated = 0usize;
    for o in state.crops.iter_mut().chain(state.weeds.iter_mut()) {
        let p = &o.current;
        if o.pending_recreate {
            let handle = host.place_object(
                &p.category_id,
                &o.label,
                p.position,
                p.scale,
                p.rotation_z,
            )?;
            if let Err(e) = host.destroy_object(o.handle.object()) {
                // Keep the old object; the change stays staged for the next sync.
                let _ = host.destroy_object(handle);
                return Err(e.into());
            }
            o.handle = PlacedHandle::Recreatable(handle);
            o.pending_recreate = false;
            recreated += 1;
        } else {
            host.set_object_pose(o.handle.object(), p.position, p.scale, p.rotation_z)?;
        }
    }

    for c in &state.cameras {
        host.set_camera_pose(c.handle, &c.current)?;
    }
    if let Some(l) = &state.light {
        host.set_light(l.handle, &l.current)?;
    }
    if let Some(g) = &state.ground {
        if let Some(texture) = g.texture() {
            host.set_ground_texture(g.handle, texture)?;
        }
    }

    if recreated > 0 {
        debug!("Recreated {recreated} objects with new variants.");
    }
    Ok(())
}
