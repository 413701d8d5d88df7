//! Scene construction and capture sessions.
//!
//! [`build_scene`] places the field, cameras, light and ground on a [`crate::host::SceneHost`]
//! and returns a [`SceneState`]. [`run_session`] then renders frames, randomizing the state
//! with [`crate::frame::randomize_frame`] before each one.
pub mod builder;
pub mod config;
pub mod session;
pub mod state;

pub use builder::{build_scene, build_scene_with_events};
pub use config::{
    CropConfig, GroundConfig, OutputConfig, SceneConfig, SessionConfig, WeedConfig,
};
pub use session::{run_session, run_session_with_events};
pub use state::{
    PlacedCamera, PlacedGround, PlacedLight, PlacedObject, PlacementRef, SceneState,
};
