//! Event types and sinks for observing scene construction and frame sessions.
//!
//! This module defines [`SceneEvent`] and a set of sinks to emit, collect, or forward
//! events while building a scene with [`crate::scene::build_scene_with_events`] or running
//! frames with [`crate::scene::run_session_with_events`].
use glam::Vec2;

use crate::field::FieldBounds;
use crate::sampling::category::CategoryCounts;

/// Describes events emitted while building and running a scene.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum SceneEvent {
    /// Emitted once the field geometry is known, before anything is placed.
    SceneStarted {
        /// Derived field bounds.
        bounds: FieldBounds,
        /// Number of lattice cells.
        crops: usize,
        /// Requested number of weeds.
        weeds: usize,
    },

    /// Emitted after a placement layer was handed to the host.
    LayerPlaced {
        /// Layer name, e.g. `crops` or `weeds`.
        layer: String,
        /// Semantic class attached to every object of the layer.
        label: String,
        /// Number of objects placed.
        count: usize,
        /// Realized objects per category.
        counts: CategoryCounts,
    },

    /// Emitted after the camera sweep was created on the host.
    CamerasPlanned {
        /// Number of cameras.
        count: usize,
        /// True when the sweep line had zero length.
        degenerate: bool,
    },

    /// Non-fatal: the sweep line had zero length and jitter was disabled.
    DegenerateSweep {
        /// The single base point all cameras share.
        point: Vec2,
    },

    /// Emitted after the scene is fully set up on the host.
    SceneFinished {
        crops: usize,
        weeds: usize,
        cameras: usize,
    },

    /// Emitted after a frame's randomization was applied to the host.
    FrameRandomized {
        /// Zero-based frame index.
        frame: usize,
    },

    /// Emitted after the host rendered a frame.
    FrameRendered {
        /// Zero-based frame index.
        frame: usize,
    },

    /// Non-fatal warning.
    Warning {
        /// Context string (e.g. layer or camera name).
        context: String,
        /// Human-readable message.
        message: String,
    },
}

/// Discriminant of [`SceneEvent`] used for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneEventKind {
    SceneStarted,
    LayerPlaced,
    CamerasPlanned,
    DegenerateSweep,
    SceneFinished,
    FrameRandomized,
    FrameRendered,
    Warning,
}

impl SceneEvent {
    pub fn kind(&self) -> SceneEventKind {
        match self {
            SceneEvent::SceneStarted { .. } => SceneEventKind::SceneStarted,
            SceneEvent::LayerPlaced { .. } => SceneEventKind::LayerPlaced,
            SceneEvent::CamerasPlanned { .. } => SceneEventKind::CamerasPlanned,
            SceneEvent::DegenerateSweep { .. } => SceneEventKind::DegenerateSweep,
            SceneEvent::SceneFinished { .. } => SceneEventKind::SceneFinished,
            SceneEvent::FrameRandomized { .. } => SceneEventKind::FrameRandomized,
            SceneEvent::FrameRendered { .. } => SceneEventKind::FrameRendered,
            SceneEvent::Warning { .. } => SceneEventKind::Warning,
        }
    }
}

/// A generic event sink that accepts [`SceneEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: SceneEvent);

    /// Lets producers skip building events nobody listens to.
    fn wants(&self, _kind: SceneEventKind) -> bool {
        true
    }

    fn send_many<I>(&mut self, events: I)
    where
        Self: Sized,
        I: IntoIterator<Item = SceneEvent>,
    {
        for e in events {
            self.send(e);
        }
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: SceneEvent) {}

    #[inline]
    fn wants(&self, _kind: SceneEventKind) -> bool {
        false
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(SceneEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(SceneEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(SceneEvent),
{
    #[inline]
    fn send(&mut self, event: SceneEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects all events in a `Vec`.
#[derive(Default)]
pub struct VecSink {
    events: Vec<SceneEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn into_inner(self) -> Vec<SceneEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[SceneEvent] {
        &self.events
    }

    /// Number of collected events of the given kind.
    pub fn count_of(&self, kind: SceneEventKind) -> usize {
        self.events.iter().filter(|e| e.kind() == kind).count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: SceneEvent) {
        self.events.push(event);
    }
}

/// Fan-out sink that forwards each event to all contained sinks.
pub struct MultiSink<S: EventSink> {
    pub(crate) sinks: Vec<S>,
}

impl<S: EventSink> MultiSink<S> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with_sinks(sinks: Vec<S>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: S) {
        self.sinks.push(sink);
    }

    pub fn into_inner(self) -> Vec<S> {
        self.sinks
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }
}

impl<S: EventSink> Default for MultiSink<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EventSink> EventSink for MultiSink<S> {
    fn send(&mut self, event: SceneEvent) {
        if self.sinks.is_empty() {
            return;
        }
        let last_idx = self.sinks.len() - 1;
        for i in 0..last_idx {
            self.sinks[i].send(event.clone());
        }
        self.sinks[last_idx].send(event);
    }

    fn wants(&self, kind: SceneEventKind) -> bool {
        self.sinks.iter().any(|s| s.wants(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn warning(context: &str) -> SceneEvent {
        SceneEvent::Warning {
            context: context.into(),
            message: "msg".into(),
        }
    }

    #[test]
    fn vec_sink_collects_events() {
        let mut sink = VecSink::new();
        assert!(sink.is_empty());
        sink.send(warning("a"));
        sink.send(SceneEvent::FrameRendered { frame: 0 });
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.count_of(SceneEventKind::Warning), 1);
        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn unit_sink_wants_nothing() {
        let sink = ();
        assert!(!sink.wants(SceneEventKind::Warning));
    }

    #[test]
    fn multi_sink_fans_out_events() {
        let mut multi = MultiSink::with_sinks(vec![VecSink::new(), VecSink::new()]);
        multi.send(warning("ctx"));
        assert!(multi.wants(SceneEventKind::SceneStarted));
        let sinks = multi.into_inner();
        assert_eq!(sinks.len(), 2);
        assert!(sinks
            .iter()
            .all(|s| matches!(s.as_slice(), [SceneEvent::Warning { .. }])));
    }

    #[test]
    fn fn_sink_invokes_callback() {
        let mut count = 0;
        let mut sink = FnSink::new(|_event| {
            count += 1;
        });
        sink.send(SceneEvent::DegenerateSweep { point: Vec2::ZERO });
        sink.send_many([warning("a"), warning("b")]);
        drop(sink);
        assert_eq!(count, 3);
    }
}
