//! Field geometry: the crop lattice configuration and the coordinate frame derived from it.
//!
//! [`FieldBounds`] is computed once per scene from a [`FieldConfig`] and is the only place
//! the field extent is derived. Grid placement, weed scatter regions and the camera sweep
//! all read it from here.
use glam::Vec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Direction in which crop columns run.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Orientation {
    /// Columns are stacked along Y; plants inside a column advance along X.
    #[default]
    Horizontal,
    /// Columns are stacked along X; plants inside a column advance along Y.
    Vertical,
}

/// Crop lattice parameters.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
#[derive(Clone, Debug, PartialEq)]
pub struct FieldConfig {
    /// Number of crop columns (rows of the field in agronomic terms).
    pub num_columns: usize,
    /// Number of plants in each column.
    pub plants_per_column: usize,
    /// Distance between neighbouring columns.
    pub column_delta: f32,
    /// Distance between neighbouring plants inside a column.
    pub plant_spacing: f32,
    /// Axis assignment of columns and plants.
    pub orientation: Orientation,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            num_columns: 3,
            plants_per_column: 8,
            column_delta: 19.0,
            plant_spacing: 10.0,
            orientation: Orientation::Horizontal,
        }
    }
}

/// World-space step vectors of the crop lattice.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisSteps {
    /// Offset between column `c` and column `c + 1`.
    pub column: Vec2,
    /// Offset between plant `r` and plant `r + 1` inside a column.
    pub row: Vec2,
}

impl AxisSteps {
    /// Footprint of one lattice cell.
    pub fn cell(&self) -> Vec2 {
        self.column + self.row
    }
}

impl FieldConfig {
    pub fn new(
        num_columns: usize,
        plants_per_column: usize,
        column_delta: f32,
        plant_spacing: f32,
    ) -> Self {
        Self {
            num_columns,
            plants_per_column,
            column_delta,
            plant_spacing,
            orientation: Orientation::Horizontal,
        }
    }

    /// Sets the column orientation.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Total number of lattice cells.
    pub fn plant_count(&self) -> usize {
        self.num_columns * self.plants_per_column
    }

    /// Lattice step vectors with the orientation applied.
    pub fn axis_steps(&self) -> AxisSteps {
        match self.orientation {
            Orientation::Horizontal => AxisSteps {
                column: Vec2::new(0.0, self.column_delta),
                row: Vec2::new(self.plant_spacing, 0.0),
            },
            Orientation::Vertical => AxisSteps {
                column: Vec2::new(self.column_delta, 0.0),
                row: Vec2::new(0.0, self.plant_spacing),
            },
        }
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.num_columns == 0 {
            return Err(Error::InvalidConfig("num_columns must be >= 1".into()));
        }
        if self.plants_per_column == 0 {
            return Err(Error::InvalidConfig(
                "plants_per_column must be >= 1".into(),
            ));
        }
        if !(self.column_delta.is_finite() && self.column_delta > 0.0) {
            return Err(Error::InvalidConfig("column_delta must be > 0".into()));
        }
        if !(self.plant_spacing.is_finite() && self.plant_spacing > 0.0) {
            return Err(Error::InvalidConfig("plant_spacing must be > 0".into()));
        }
        Ok(())
    }
}

/// Axis-aligned rectangle in field coordinates.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Region {
    pub min: Vec2,
    pub max: Vec2,
}

impl Region {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Region of the given size centered on `center`.
    pub fn centered(center: Vec2, extent: Vec2) -> Self {
        let half = extent * 0.5;
        Self::new(center - half, center + half)
    }

    pub fn extent(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// True when the region has no area.
    pub fn is_empty(&self) -> bool {
        let e = self.extent();
        !(e.x > 0.0 && e.y > 0.0)
    }

    /// Half-open containment: min edges inclusive, max edges exclusive.
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x < self.max.x && p.y >= self.min.y && p.y < self.max.y
    }

    /// Clamps a point into the closed region.
    pub fn clamp(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min, self.max)
    }
}

/// Field extent and origin derived from a [`FieldConfig`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldBounds {
    /// Extent along X.
    pub width: f32,
    /// Extent along Y.
    pub length: f32,
    /// Minimum X; always `-width / 2`.
    pub start_x: f32,
    /// Minimum Y; always `-length / 2`.
    pub start_y: f32,
}

impl FieldBounds {
    /// Derives bounds from a configuration that has already been validated.
    pub fn from_config(config: &FieldConfig) -> Self {
        debug_assert!(config.validate().is_ok(), "field config must be valid");

        let steps = config.axis_steps();
        let extent =
            steps.column * config.num_columns as f32 + steps.row * config.plants_per_column as f32;

        Self {
            width: extent.x,
            length: extent.y,
            start_x: -extent.x / 2.0,
            start_y: -extent.y / 2.0,
        }
    }

    /// Validates the configuration and derives bounds.
    pub fn try_from_config(config: &FieldConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_config(config))
    }

    pub fn extent(&self) -> Vec2 {
        Vec2::new(self.width, self.length)
    }

    pub fn start(&self) -> Vec2 {
        Vec2::new(self.start_x, self.start_y)
    }

    pub fn region(&self) -> Region {
        Region::new(self.start(), self.start() + self.extent())
    }

    pub fn min_dimension(&self) -> f32 {
        self.width.min(self.length)
    }

    /// Maps a point given in fractions of width/length to field coordinates.
    pub fn absolute(&self, relative: Vec2) -> Vec2 {
        self.start() + self.extent() * relative
    }
}

/// Rectangle used for uniform weed scatter, expressed relative to the field.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScatterRegion {
    /// Exactly the field bounds.
    #[default]
    Field,
    /// Field bounds shifted back by half a lattice cell, so every crop sits at the
    /// center of its own cell of the region.
    CellAligned,
    /// Field bounds padded by half a lattice cell on every side.
    Inflated,
}

impl ScatterRegion {
    pub fn resolve(self, config: &FieldConfig, bounds: &FieldBounds) -> Region {
        let field = bounds.region();
        let half_cell = config.axis_steps().cell() * 0.5;
        match self {
            ScatterRegion::Field => field,
            ScatterRegion::CellAligned => Region::new(field.min - half_cell, field.max - half_cell),
            ScatterRegion::Inflated => Region::new(field.min - half_cell, field.max + half_cell),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_field_dimensions() {
        let config = FieldConfig::new(3, 8, 19.0, 10.0);
        let b = FieldBounds::try_from_config(&config).unwrap();
        assert_eq!(b.width, 80.0);
        assert_eq!(b.length, 57.0);
        assert_eq!(b.start_x, -40.0);
        assert_eq!(b.start_y, -28.5);
    }

    #[test]
    fn vertical_orientation_swaps_axes() {
        let config = FieldConfig::new(3, 8, 19.0, 10.0).with_orientation(Orientation::Vertical);
        let b = FieldBounds::try_from_config(&config).unwrap();
        assert_eq!(b.width, 57.0);
        assert_eq!(b.length, 80.0);
        assert_eq!(config.axis_steps().column, Vec2::new(19.0, 0.0));
        assert_eq!(config.axis_steps().row, Vec2::new(0.0, 10.0));
    }

    #[test]
    fn bounds_are_centered_for_many_configs() {
        for cols in 1..6 {
            for plants in 1..6 {
                for orientation in [Orientation::Horizontal, Orientation::Vertical] {
                    let config = FieldConfig::new(cols, plants, 1.5 * cols as f32, 0.7)
                        .with_orientation(orientation);
                    let b = FieldBounds::try_from_config(&config).unwrap();
                    assert!(b.width > 0.0 && b.length > 0.0);
                    assert_eq!(b.start_x + b.width / 2.0, 0.0);
                    assert_eq!(b.start_y + b.length / 2.0, 0.0);
                    assert_eq!(b.region().center(), Vec2::ZERO);
                }
            }
        }
    }

    #[test]
    fn invalid_configs_are_rejected() {
        assert!(FieldConfig::new(0, 8, 19.0, 10.0).validate().is_err());
        assert!(FieldConfig::new(3, 0, 19.0, 10.0).validate().is_err());
        assert!(FieldConfig::new(3, 8, 0.0, 10.0).validate().is_err());
        assert!(FieldConfig::new(3, 8, 19.0, -1.0).validate().is_err());
        assert!(FieldConfig::new(3, 8, f32::NAN, 10.0).validate().is_err());
        assert!(matches!(
            FieldBounds::try_from_config(&FieldConfig::new(3, 8, 19.0, 0.0)),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn relative_points_map_into_field() {
        let b = FieldBounds::try_from_config(&FieldConfig::new(2, 4, 10.0, 5.0)).unwrap();
        assert_eq!(b.absolute(Vec2::ZERO), b.start());
        assert_eq!(b.absolute(Vec2::ONE), b.region().max);
        assert_eq!(b.absolute(Vec2::splat(0.5)), Vec2::ZERO);
    }

    #[test]
    fn scatter_regions_follow_lattice_cell() {
        let config = FieldConfig::new(2, 4, 10.0, 5.0);
        let b = FieldBounds::from_config(&config);
        let field = ScatterRegion::Field.resolve(&config, &b);
        assert_eq!(field, b.region());

        let aligned = ScatterRegion::CellAligned.resolve(&config, &b);
        assert_eq!(aligned.min, Vec2::new(-12.5, -15.0));
        assert_eq!(aligned.extent(), field.extent());

        let inflated = ScatterRegion::Inflated.resolve(&config, &b);
        assert_eq!(inflated.min, Vec2::new(-12.5, -15.0));
        assert_eq!(inflated.max, Vec2::new(12.5, 15.0));
    }

    #[test]
    fn region_containment_is_half_open() {
        let r = Region::new(Vec2::ZERO, Vec2::ONE);
        assert!(r.contains(Vec2::ZERO));
        assert!(!r.contains(Vec2::new(1.0, 0.5)));
        assert!(Region::new(Vec2::ZERO, Vec2::new(0.0, 1.0)).is_empty());
    }
}
