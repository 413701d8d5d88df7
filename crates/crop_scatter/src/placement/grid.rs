//! Deterministic crop lattice placement.
use rand::RngCore;
use tracing::debug;

use crate::error::Result;
use crate::field::{FieldBounds, FieldConfig, Region};
use crate::placement::{Placement, ScaleSpec};
use crate::sampling::category::VariantChooser;

/// Result of placing the crop lattice.
#[derive(Clone, Debug, Default)]
pub struct GridLayout {
    /// One placement per lattice cell, column by column, rows inner.
    pub placements: Vec<Placement>,
    /// Footprint of each placement's lattice cell, centered on the plant. Same order as
    /// `placements`; the frame randomizer keeps jittered crops inside it.
    pub cells: Vec<Region>,
}

impl GridLayout {
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }
}

/// Places `num_columns * plants_per_column` crops on the field lattice.
#[derive(Clone, Debug)]
pub struct GridPlacer {
    field: FieldConfig,
    bounds: FieldBounds,
    variants: VariantChooser,
    scale: ScaleSpec,
}

impl GridPlacer {
    pub fn try_new(field: FieldConfig, variants: VariantChooser, scale: ScaleSpec) -> Result<Self> {
        let bounds = FieldBounds::try_from_config(&field)?;
        variants.validate()?;
        scale.validate()?;
        Ok(Self {
            field,
            bounds,
            variants,
            scale,
        })
    }

    pub fn bounds(&self) -> &FieldBounds {
        &self.bounds
    }

    /// Places every lattice cell. Per cell the RNG is drawn for variant, rotation, scale.
    pub fn place<R: RngCore>(&self, rng: &mut R) -> Result<GridLayout> {
        let steps = self.field.axis_steps();
        let cell = steps.cell();
        let start = self.bounds.start();

        let total = self.field.plant_count();
        let mut placements = Vec::with_capacity(total);
        let mut cells = Vec::with_capacity(total);

        for c in 0..self.field.num_columns {
            for r in 0..self.field.plants_per_column {
                let p = start + steps.column * c as f32 + steps.row * r as f32;

                let mut placement = Placement::new(self.variants.choose(rng)?, p.extend(0.0));
                placement.randomize_pose(&self.scale, rng);

                placements.push(placement);
                cells.push(Region::centered(p, cell));
            }
        }

        debug!(
            "Placed {} crops on a {}x{} lattice.",
            placements.len(),
            self.field.num_columns,
            self.field.plants_per_column
        );

        Ok(GridLayout { placements, cells })
    }
}
