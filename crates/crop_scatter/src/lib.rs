#![forbid(unsafe_code)]
//! crop_scatter: Procedural layout and per-frame randomization of synthetic crop fields.
//!
//! Modules:
//! - field: lattice configuration, field bounds and scatter regions
//! - sampling: uniform positions, exact category counts and weighted draws
//! - placement: crop lattice and weed scatter
//! - camera: camera poses and the straight-line sweep
//! - frame: bounded per-frame perturbation relative to the base layout
//! - scene: scene configuration, construction on a host and capture sessions
//! - host: the rendering host port and an in-memory recording host
//!
//! For examples, see the `crop_scatter_examples` crate.
pub mod camera;
pub mod error;
pub mod events;
pub mod field;
pub mod frame;
pub mod host;
pub mod placement;
pub mod sampling;
pub mod scene;

/// Convenient re-exports for common types. Import with `use crop_scatter::prelude::*;`.
pub mod prelude {
    pub use crate::camera::{
        camera_name, CameraIntrinsics, CameraPose, CameraSweepPlanner, SweepConfig, SweepLine,
        SweepPlan,
    };
    pub use crate::error::{Error, Result};
    pub use crate::events::{
        EventSink, FnSink, MultiSink, SceneEvent, SceneEventKind, VecSink,
    };
    pub use crate::field::{FieldBounds, FieldConfig, Orientation, Region, ScatterRegion};
    pub use crate::frame::{randomize_frame, sync_to_host, FrameRandomizeConfig};
    pub use crate::host::{
        AnnotationKind, HostError, LightKind, LightPose, PlacedHandle, RecordingHost, SceneHost,
        WriterConfig,
    };
    pub use crate::placement::{
        GridLayout, GridPlacer, Placement, ScaleSpec, ScatterLayout, ScatterMode, ScatterPlacer,
    };
    pub use crate::sampling::{
        exact_counts, sample_one, seed_for_frame, CategoryCounts, CategoryId, PositionSampling,
        UniformRandomSampling, VariantChooser, WeightedCategory,
    };
    pub use crate::scene::{
        build_scene, build_scene_with_events, run_session, run_session_with_events,
        PlacementRef, SceneConfig, SceneState,
    };
}
