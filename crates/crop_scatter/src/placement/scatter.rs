//! Uniform random weed scatter.
//!
//! Two statistical contracts are exposed as named modes:
//! - [`ScatterMode::Population`]: the category split is exact (see
//!   [crate::sampling::category::exact_counts]); positions are i.i.d. uniform.
//! - [`ScatterMode::PerDraw`]: every weed independently draws a position and a category;
//!   realized counts are multinomial around the weights.
use glam::Vec2;
use rand::RngCore;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::field::Region;
use crate::placement::{Placement, ScaleSpec};
use crate::sampling::category::{
    exact_counts, sample_position, validate_categories, CategoryCounts, WeightedCategory,
};
use crate::sampling::{PositionSampling, UniformRandomSampling};

/// How many weeds to place and how categories are assigned.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScatterMode {
    /// Partition `total` exactly across categories, then draw positions per category.
    Population { total: usize },
    /// Draw position and category independently for each of `count` weeds.
    PerDraw { count: usize },
}

impl Default for ScatterMode {
    fn default() -> Self {
        ScatterMode::PerDraw { count: 35 }
    }
}

impl ScatterMode {
    pub fn count(&self) -> usize {
        match *self {
            ScatterMode::Population { total } => total,
            ScatterMode::PerDraw { count } => count,
        }
    }
}

/// Result of a scatter pass.
#[derive(Clone, Debug, Default)]
pub struct ScatterLayout {
    pub placements: Vec<Placement>,
    /// Region the positions were drawn from.
    pub region: Region,
    /// Realized number of weeds per category, in category order.
    pub counts: CategoryCounts,
}

/// Scatters weeds uniformly over a rectangular region.
#[derive(Clone, Debug)]
pub struct ScatterPlacer {
    region: Region,
    categories: Vec<WeightedCategory>,
    mode: ScatterMode,
    scale: ScaleSpec,
}

impl ScatterPlacer {
    pub fn try_new(
        region: Region,
        categories: Vec<WeightedCategory>,
        mode: ScatterMode,
        scale: ScaleSpec,
    ) -> Result<Self> {
        if region.is_empty() {
            return Err(Error::InvalidConfig(format!(
                "scatter region must have positive area, got {:?}..{:?}",
                region.min, region.max
            )));
        }
        validate_categories(&categories)?;
        if matches!(mode, ScatterMode::PerDraw { count } if count > 0)
            && categories.iter().all(|c| c.weight == 0.0)
        {
            return Err(Error::InvalidConfig(
                "per-draw scatter needs at least one positive weight".into(),
            ));
        }
        scale.validate()?;
        Ok(Self {
            region,
            categories,
            mode,
            scale,
        })
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn categories(&self) -> &[WeightedCategory] {
        &self.categories
    }

    pub fn mode(&self) -> ScatterMode {
        self.mode
    }

    pub fn place<R: RngCore>(&self, rng: &mut R) -> Result<ScatterLayout> {
        let layout = match self.mode {
            ScatterMode::Population { total } => self.place_population(total, rng)?,
            ScatterMode::PerDraw { count } => self.place_per_draw(count, rng)?,
        };
        if layout.placements.is_empty() {
            warn!("Scatter produced no weeds.");
        }
        Ok(layout)
    }

    fn place_population(&self, total: usize, rng: &mut dyn RngCore) -> Result<ScatterLayout> {
        let counts = exact_counts(&self.categories, total)?;
        let mut placements = Vec::with_capacity(total);

        for (category, n) in counts.iter() {
            if n == 0 {
                debug!("Category '{category}' has no weeds; skipping.");
                continue;
            }
            let positions = UniformRandomSampling::new(n).generate(&self.region, rng);
            for p in positions {
                let mut placement = Placement::new(category.clone(), Vec2::from(p).extend(0.0));
                placement.randomize_pose(&self.scale, rng);
                placements.push(placement);
            }
        }

        Ok(ScatterLayout {
            placements,
            region: self.region,
            counts,
        })
    }

    fn place_per_draw(&self, count: usize, rng: &mut dyn RngCore) -> Result<ScatterLayout> {
        let sampler = UniformRandomSampling::new(1);
        let mut counts = CategoryCounts::zeroed(&self.categories);
        let mut placements = Vec::with_capacity(count);

        for _ in 0..count {
            let position = sampler
                .generate(&self.region, rng)
                .pop()
                .map(Vec2::from)
                .unwrap_or(self.region.min);
            let i = sample_position(&self.categories, rng)?;
            counts.increment(i);

            let mut placement = Placement::new(self.categories[i].id.clone(), position.extend(0.0));
            placement.randomize_pose(&self.scale, rng);
            placements.push(placement);
        }

        Ok(ScatterLayout {
            placements,
            region: self.region,
            counts,
        })
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn taraxacum() -> Vec<WeightedCategory> {
        vec![
            WeightedCategory::new("taraxacum_05", 0.4),
            WeightedCategory::new("taraxacum_07", 0.3),
            WeightedCategory::new("taraxacum_06", 0.2),
            WeightedCategory::new("taraxacum_04", 0.1),
        ]
    }

    fn field_region() -> Region {
        Region::new(Vec2::new(-133.0, -133.0), Vec2::new(133.0, 133.0))
    }

    fn weed_scale() -> ScaleSpec {
        ScaleSpec::Uniform { min: 2.0, max: 4.0 }
    }

    #[test]
    fn population_mode_counts_are_exact() {
        let placer = ScatterPlacer::try_new(
            field_region(),
            taraxacum(),
            ScatterMode::Population { total: 3000 },
            weed_scale(),
        )
        .unwrap();
        let layout = placer.place(&mut StdRng::seed_from_u64(1)).unwrap();

        assert_eq!(layout.counts.counts(), vec![1200, 900, 600, 300]);
        assert_eq!(layout.placements.len(), 3000);
        for (id, n) in layout.counts.iter() {
            let realized = layout
                .placements
                .iter()
                .filter(|p| &p.category_id == id)
                .count();
            assert_eq!(realized, n);
        }
    }

    /// Pearson chi-square statistic over a `bins x bins` histogram of the positions.
    fn chi_square(points: &[Placement], region: &Region, bins: usize) -> f64 {
        let mut hist = vec![0usize; bins * bins];
        let extent = region.extent();
        for p in points {
            let rel = (p.ground_position() - region.min) / extent;
            let bx = ((rel.x * bins as f32) as usize).min(bins - 1);
            let by = ((rel.y * bins as f32) as usize).min(bins - 1);
            hist[by * bins + bx] += 1;
        }
        let expected = points.len() as f64 / (bins * bins) as f64;
        hist.iter()
            .map(|&o| {
                let d = o as f64 - expected;
                d * d / expected
            })
            .sum()
    }

    #[test]
    fn population_mode_positions_are_uniform() {
        let region = field_region();
        let placer = ScatterPlacer::try_new(
            region,
            taraxacum(),
            ScatterMode::Population { total: 3000 },
            weed_scale(),
        )
        .unwrap();

        // 10x10 bins, 99 degrees of freedom. 170 is about the 0.99999 quantile, so five
        // fixed seeds leave a wide margin against chance failures.
        for seed in [3u64, 17, 2025, 40_000, 7_777_777] {
            let layout = placer.place(&mut StdRng::seed_from_u64(seed)).unwrap();
            for p in &layout.placements {
                assert!(region.contains(p.ground_position()));
            }
            let stat = chi_square(&layout.placements, &region, 10);
            assert!(stat < 170.0, "seed {seed}: chi-square {stat} too large");
        }
    }

    #[test]
    fn per_draw_mode_counts_follow_weights_loosely() {
        let placer = ScatterPlacer::try_new(
            field_region(),
            taraxacum(),
            ScatterMode::PerDraw { count: 3000 },
            weed_scale(),
        )
        .unwrap();
        let layout = placer.place(&mut StdRng::seed_from_u64(8)).unwrap();

        assert_eq!(layout.placements.len(), 3000);
        assert_eq!(layout.counts.total(), 3000);
        for ((_, n), c) in layout.counts.iter().zip(taraxacum()) {
            let p = n as f64 / 3000.0;
            assert!((p - c.weight).abs() < 0.04);
        }
    }

    #[test]
    fn per_draw_mode_skips_zero_weight_categories() {
        let mut cats = taraxacum();
        cats.push(WeightedCategory::new("taraxacum_01", 0.0));
        let placer = ScatterPlacer::try_new(
            field_region(),
            cats,
            ScatterMode::PerDraw { count: 500 },
            ScaleSpec::Fixed(20.0),
        )
        .unwrap();
        let layout = placer.place(&mut StdRng::seed_from_u64(2)).unwrap();
        assert_eq!(layout.counts.get("taraxacum_01"), Some(0));
        assert!(layout.placements.iter().all(|p| p.scale == 20.0));
    }

    #[test]
    fn scatter_is_reproducible() {
        let placer = ScatterPlacer::try_new(
            field_region(),
            taraxacum(),
            ScatterMode::PerDraw { count: 64 },
            weed_scale(),
        )
        .unwrap();
        let a = placer.place(&mut StdRng::seed_from_u64(5)).unwrap();
        let b = placer.place(&mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(a.placements, b.placements);
    }

    #[test]
    fn empty_region_and_bad_weights_are_rejected() {
        let flat = Region::new(Vec2::ZERO, Vec2::new(10.0, 0.0));
        assert!(matches!(
            ScatterPlacer::try_new(
                flat,
                taraxacum(),
                ScatterMode::PerDraw { count: 1 },
                weed_scale()
            ),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            ScatterPlacer::try_new(
                field_region(),
                vec![WeightedCategory::new("x", -1.0)],
                ScatterMode::PerDraw { count: 1 },
                weed_scale()
            ),
            Err(Error::InvalidWeight { .. })
        ));
        assert!(matches!(
            ScatterPlacer::try_new(
                field_region(),
                Vec::new(),
                ScatterMode::Population { total: 1 },
                weed_scale()
            ),
            Err(Error::EmptyCategorySet)
        ));
    }

    #[test]
    fn zero_weeds_is_not_an_error() {
        let placer = ScatterPlacer::try_new(
            field_region(),
            taraxacum(),
            ScatterMode::Population { total: 0 },
            weed_scale(),
        )
        .unwrap();
        let layout = placer.place(&mut StdRng::seed_from_u64(1)).unwrap();
        assert!(layout.placements.is_empty());
        assert_eq!(layout.counts.total(), 0);
    }
}
