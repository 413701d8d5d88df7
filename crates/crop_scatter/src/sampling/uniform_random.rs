//! Uniform random position sampling over a rectangular region.
use mint::Vector2;
use rand::RngCore;

use crate::field::Region;
use crate::sampling::{next_down, rand01, PositionSampling};

/// Uniform i.i.d. random sampling over a rectangular region.
#[derive(Debug, Clone)]
pub struct UniformRandomSampling {
    /// Number of points to generate.
    pub count: usize,
}

impl UniformRandomSampling {
    /// Create a new uniform random sampler that generates `count` points.
    pub fn new(count: usize) -> Self {
        Self { count }
    }
}

impl PositionSampling for UniformRandomSampling {
    fn generate(&self, region: &Region, rng: &mut dyn RngCore) -> Vec<Vector2<f32>> {
        if self.count == 0 || region.is_empty() {
            return Vec::new();
        }

        let extent = region.extent();
        // Keep results strictly inside the max edges.
        let max_x = next_down(region.max.x);
        let max_y = next_down(region.max.y);

        let mut out = Vec::with_capacity(self.count);
        for _ in 0..self.count {
            let u = rand01(rng);
            let v = rand01(rng);

            let x = (region.min.x + u * extent.x).clamp(region.min.x, max_x);
            let y = (region.min.y + v * extent.y).clamp(region.min.y, max_y);

            out.push(Vector2 { x, y });
        }

        out
    }
}
