use std::path::Path;

use anyhow::Context;
use crop_scatter::prelude::*;

/// Reads a [`SceneConfig`] from a RON file. Omitted fields keep their defaults.
pub fn load_scene_config(path: impl AsRef<Path>) -> anyhow::Result<SceneConfig> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let config: SceneConfig = ron::de::from_bytes(&bytes)
        .map_err(|e| anyhow::anyhow!(e))
        .with_context(|| format!("parsing {}", path.display()))?;
    config.validate()?;
    Ok(config)
}
