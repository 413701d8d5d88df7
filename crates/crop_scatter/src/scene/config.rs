//! Scene configuration.
//!
//! One immutable value describing the whole scene: lattice, crop and weed layers, camera
//! sweep, light, ground, writer output and the per-frame session.
use std::path::PathBuf;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::camera::SweepConfig;
use crate::error::{Error, Result};
use crate::field::{FieldConfig, ScatterRegion};
use crate::frame::FrameRandomizeConfig;
use crate::host::{AnnotationKind, LightPose, WriterConfig};
use crate::placement::{ScaleSpec, ScatterMode};
use crate::sampling::category::{validate_categories, VariantChooser, WeightedCategory};

/// Crop lattice content.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
#[derive(Clone, Debug, PartialEq)]
pub struct CropConfig {
    pub variants: VariantChooser,
    pub scale: ScaleSpec,
    /// Semantic class for annotation.
    pub label: String,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            variants: VariantChooser::Uniform(vec!["maize_medium".into(), "maize_small".into()]),
            scale: ScaleSpec::Fixed(20.0),
            label: "maize".into(),
        }
    }
}

/// Weed scatter content.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
#[derive(Clone, Debug, PartialEq)]
pub struct WeedConfig {
    pub categories: Vec<WeightedCategory>,
    pub mode: ScatterMode,
    pub region: ScatterRegion,
    pub scale: ScaleSpec,
    /// Semantic class for annotation.
    pub label: String,
}

impl Default for WeedConfig {
    fn default() -> Self {
        let weights = [0.4, 0.3, 0.2, 0.1, 0.0, 0.0, 0.0];
        Self {
            categories: weights
                .iter()
                .enumerate()
                .map(|(i, w)| WeightedCategory::new(format!("taraxacum_{:02}", i + 1), *w))
                .collect(),
            mode: ScatterMode::PerDraw { count: 35 },
            region: ScatterRegion::CellAligned,
            scale: ScaleSpec::Fixed(20.0),
            label: "weed".into(),
        }
    }
}

/// Ground plane under the field.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
#[derive(Clone, Debug, PartialEq)]
pub struct GroundConfig {
    pub scale: f32,
    /// Candidate textures; one is picked at build time. Empty means untextured.
    pub textures: Vec<String>,
}

impl Default for GroundConfig {
    fn default() -> Self {
        Self {
            scale: 1000.0,
            textures: Vec::new(),
        }
    }
}

/// Writer output of the session.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
#[derive(Clone, Debug, PartialEq)]
pub struct OutputConfig {
    pub output_dir: PathBuf,
    pub resolution: (u32, u32),
    pub annotations: Vec<AnnotationKind>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            resolution: (640, 640),
            annotations: vec![
                AnnotationKind::Rgb,
                AnnotationKind::BoundingBox2dTight,
                AnnotationKind::SemanticSegmentation,
            ],
        }
    }
}

impl OutputConfig {
    pub fn writer_config(&self) -> WriterConfig {
        WriterConfig {
            output_dir: self.output_dir.clone(),
            annotations: self.annotations.clone(),
        }
    }
}

/// Frame loop of a session.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfig {
    pub frames: usize,
    /// Randomize and sync before every frame; otherwise the base layout is rendered.
    pub randomize_each_frame: bool,
    /// When set, frame `i` is randomized with an RNG seeded from `seed_for_frame(seed, i)`
    /// instead of the caller's RNG.
    pub frame_seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            frames: 1,
            randomize_each_frame: true,
            frame_seed: None,
        }
    }
}

/// Complete description of a scene and its capture session.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
#[derive(Clone, Debug, PartialEq)]
pub struct SceneConfig {
    pub field: FieldConfig,
    pub crops: CropConfig,
    pub weeds: WeedConfig,
    pub sweep: SweepConfig,
    /// `None` creates no light.
    pub light: Option<LightPose>,
    /// `None` creates no ground plane.
    pub ground: Option<GroundConfig>,
    pub output: OutputConfig,
    pub randomize: FrameRandomizeConfig,
    pub session: SessionConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            field: FieldConfig::default(),
            crops: CropConfig::default(),
            weeds: WeedConfig::default(),
            sweep: SweepConfig::default(),
            light: Some(LightPose::default()),
            ground: Some(GroundConfig::default()),
            output: OutputConfig::default(),
            randomize: FrameRandomizeConfig::default(),
            session: SessionConfig::default(),
        }
    }
}

impl SceneConfig {
    pub fn with_field(mut self, field: FieldConfig) -> Self {
        self.field = field;
        self
    }

    pub fn with_weed_mode(mut self, mode: ScatterMode) -> Self {
        self.weeds.mode = mode;
        self
    }

    pub fn with_sweep(mut self, sweep: SweepConfig) -> Self {
        self.sweep = sweep;
        self
    }

    pub fn with_ground_textures(mut self, textures: Vec<String>) -> Self {
        self.ground.get_or_insert_with(GroundConfig::default).textures = textures;
        self
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output.output_dir = output_dir.into();
        self
    }

    pub fn with_randomize(mut self, randomize: FrameRandomizeConfig) -> Self {
        self.randomize = randomize;
        self
    }

    pub fn with_frames(mut self, frames: usize) -> Self {
        self.session.frames = frames;
        self
    }

    pub fn with_frame_seed(mut self, seed: u64) -> Self {
        self.session.frame_seed = Some(seed);
        self
    }

    /// Checks every section before anything is sampled or sent to a host.
    pub fn validate(&self) -> Result<()> {
        self.field.validate()?;

        self.crops.variants.validate()?;
        self.crops.scale.validate()?;
        if self.crops.label.is_empty() {
            return Err(Error::InvalidConfig("crop label must not be empty".into()));
        }

        validate_categories(&self.weeds.categories)?;
        if matches!(self.weeds.mode, ScatterMode::PerDraw { count } if count > 0)
            && self.weeds.categories.iter().all(|c| c.weight == 0.0)
        {
            return Err(Error::InvalidConfig(
                "per-draw weeds need at least one positive weight".into(),
            ));
        }
        self.weeds.scale.validate()?;
        if self.weeds.label.is_empty() {
            return Err(Error::InvalidConfig("weed label must not be empty".into()));
        }

        self.sweep.validate()?;

        if let Some(ground) = &self.ground {
            if !(ground.scale.is_finite() && ground.scale > 0.0) {
                return Err(Error::InvalidConfig(format!(
                    "ground scale must be > 0, got {}",
                    ground.scale
                )));
            }
        }
        if let Some(light) = &self.light {
            if !(light.intensity.is_finite() && light.intensity >= 0.0) {
                return Err(Error::InvalidConfig(format!(
                    "light intensity must be >= 0, got {}",
                    light.intensity
                )));
            }
        }

        let (w, h) = self.output.resolution;
        if w == 0 || h == 0 {
            return Err(Error::InvalidConfig(format!(
                "resolution must be non-zero, got {w}x{h}"
            )));
        }

        self.randomize.validate()
    }
}
