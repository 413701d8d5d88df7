use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::{debug, info};

use crate::error::Result;
use crate::events::{EventSink, SceneEvent, SceneEventKind};
use crate::frame::{randomize_frame, sync_to_host};
use crate::host::SceneHost;
use crate::sampling::seed_for_frame;
use crate::scene::{SceneConfig, SceneState};

/// Attaches the writer and renders `config.session.frames` frames.
///
/// Each frame is randomized, synced to the host and rendered, in that order. Returns the
/// number of rendered frames.
pub fn run_session<H, R>(
    state: &mut SceneState,
    host: &mut H,
    config: &SceneConfig,
    rng: &mut R,
) -> Result<usize>
where
    H: SceneHost + ?Sized,
    R: RngCore,
{
    run_session_with_events(state, host, config, rng, &mut ())
}

pub fn run_session_with_events<H, R>(
    state: &mut SceneState,
    host: &mut H,
    config: &SceneConfig,
    rng: &mut R,
    sink: &mut dyn EventSink,
) -> Result<usize>
where
    H: SceneHost + ?Sized,
    R: RngCore,
{
    config.randomize.validate()?;

    let writer = config.output.writer_config();
    host.attach_writer(&state.render_targets, &writer)?;
    info!(
        "Writer attached to {} render targets, output in {}.",
        state.render_targets.len(),
        writer.output_dir.display()
    );

    let session = &config.session;
    if !session.randomize_each_frame {
        state.reset_to_base();
        sync_to_host(state, host)?;
        debug!("Rendering the base layout for every frame.");
    }
    for frame in 0..session.frames {
        if session.randomize_each_frame {
            match session.frame_seed {
                Some(seed) => {
                    let mut frame_rng = StdRng::seed_from_u64(seed_for_frame(seed, frame as u64));
                    randomize_frame(state, &mut frame_rng, &config.randomize)?;
                }
                None => randomize_frame(state, rng, &config.randomize)?,
            }
            sync_to_host(state, host)?;
            if sink.wants(SceneEventKind::FrameRandomized) {
                sink.send(SceneEvent::FrameRandomized { frame });
            }
        }

        host.run_frames(1)?;
        debug!("Rendered frame {frame}.");
        if sink.wants(SceneEventKind::FrameRendered) {
            sink.send(SceneEvent::FrameRendered { frame });
        }
    }

    info!("Session finished after {} frames.", session.frames);
    Ok(session.frames)
}
