use crop_scatter::prelude::*;
use crop_scatter_examples::{init_tracing, render_scene_to_png, LayerStyle, RenderConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = SceneConfig::default();
    let mut host = RecordingHost::new();
    let mut state = build_scene(&config, &mut host, &mut StdRng::seed_from_u64(11))?;

    let mut rc = RenderConfig::around_field((640, 480), &state.bounds, 10.0);
    rc.set_style(
        "maize",
        LayerStyle::Scaled {
            color: [90, 200, 70],
            pixels_per_unit: 0.3,
        },
    );
    rc.set_style(
        "weed",
        LayerStyle::Scaled {
            color: [240, 220, 60],
            pixels_per_unit: 0.15,
        },
    );

    // Each frame is derived from the base layout with its own seed, so frames can be
    // regenerated individually.
    let base_seed = 99;
    for frame in 0..4u64 {
        let mut rng = StdRng::seed_from_u64(seed_for_frame(base_seed, frame));
        randomize_frame(&mut state, &mut rng, &config.randomize)?;
        sync_to_host(&mut state, &mut host)?;
        render_scene_to_png(&state, &rc, format!("frame-{frame:02}.png"))?;
    }

    Ok(())
}
