//! Random sources and sampling primitives shared by the placers, the camera sweep and the
//! frame randomizer.
//!
//! Every function draws from an explicitly passed [`RngCore`]; nothing reads a global
//! generator. The same seed and the same call sequence reproduce the same scene.
use mint::Vector2;
use rand::RngCore;

use crate::field::Region;

pub mod category;
pub mod uniform_random;

pub use category::{
    exact_counts, sample_one, CategoryCounts, CategoryId, VariantChooser, WeightedCategory,
};
pub use uniform_random::UniformRandomSampling;

/// Trait for position sampling inside a rectangular region.
pub trait PositionSampling: Send + Sync {
    fn generate(&self, region: &Region, rng: &mut dyn RngCore) -> Vec<Vector2<f32>>;
}

/// Generate a random float in the half-open range [0, 1).
///
/// Uses the top 24 bits so every result is exactly representable and strictly below 1.
#[inline]
pub(crate) fn rand01(rng: &mut dyn RngCore) -> f32 {
    (rng.next_u32() >> 8) as f32 * (1.0 / (1u32 << 24) as f32)
}

/// Generate a random double in the half-open range [0, 1) with 53 bits of precision.
#[inline]
pub(crate) fn rand01_f64(rng: &mut dyn RngCore) -> f64 {
    (rng.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
}

/// Uniform draw in `[lo, hi)`. Returns `lo` when the range is empty.
#[inline]
pub(crate) fn uniform(rng: &mut dyn RngCore, lo: f32, hi: f32) -> f32 {
    let u = rand01(rng);
    if hi <= lo {
        return lo;
    }
    (lo + (hi - lo) * u).min(next_down(hi))
}

/// Uniform draw in `[-amplitude, amplitude)`.
#[inline]
pub(crate) fn symmetric(rng: &mut dyn RngCore, amplitude: f32) -> f32 {
    uniform(rng, -amplitude, amplitude)
}

/// Uniform rotation in degrees, `[0, 360)`.
#[inline]
pub(crate) fn angle_deg(rng: &mut dyn RngCore) -> f32 {
    uniform(rng, 0.0, 360.0)
}

/// Uniform index in `0..len`. `len` must be non-zero.
#[inline]
pub(crate) fn index(rng: &mut dyn RngCore, len: usize) -> usize {
    debug_assert!(len > 0);
    ((rand01_f64(rng) * len as f64) as usize).min(len - 1)
}

/// Compute the next smaller representable float value.
#[inline]
pub(crate) fn next_down(val: f32) -> f32 {
    if val.is_nan() {
        return f32::NAN;
    }

    if val == f32::NEG_INFINITY {
        return f32::NEG_INFINITY;
    }

    if val == f32::INFINITY {
        return f32::MAX;
    }

    if val == 0.0 {
        return -f32::MIN_POSITIVE;
    }

    let bits = val.to_bits();
    if val > 0.0 {
        f32::from_bits(bits.saturating_sub(1))
    } else {
        f32::from_bits(bits.saturating_add(1))
    }
}

/// Derives an independent seed for one frame of a session.
///
/// Frames seeded this way can be randomized in any order, or in parallel on cloned
/// scene states, and still reproduce the sequential result for the same frame index.
pub fn seed_for_frame(base_seed: u64, frame: u64) -> u64 {
    mix_u64(base_seed ^ frame.wrapping_add(1).wrapping_mul(0x9E3779B97F4A7C15))
}

#[inline]
fn mix_u64(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xBF58476D1CE4E5B9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94D049BB133111EB);
    x ^ (x >> 31)
}
