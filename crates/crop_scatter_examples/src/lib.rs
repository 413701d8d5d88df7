#![forbid(unsafe_code)]

mod config;
mod rendering;

pub use config::load_scene_config;
pub use rendering::{init_tracing, render_scene_to_png, LayerStyle, RenderConfig};
