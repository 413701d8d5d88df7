use crop_scatter::prelude::*;
use crop_scatter_examples::{init_tracing, render_scene_to_png, LayerStyle, RenderConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Same weights, two statistical contracts: exact split vs independent draws.
    let total = 3000;
    let modes = [
        ("population", ScatterMode::Population { total }),
        ("per-draw", ScatterMode::PerDraw { count: total }),
    ];

    for (name, mode) in modes {
        let config = SceneConfig::default().with_weed_mode(mode);
        let mut host = RecordingHost::new();
        let mut rng = StdRng::seed_from_u64(7);
        let mut sink = VecSink::new();
        let state = build_scene_with_events(&config, &mut host, &mut rng, &mut sink)?;

        for event in sink.as_slice() {
            if let SceneEvent::LayerPlaced { layer, counts, .. } = event {
                if layer == "weeds" {
                    println!("{name}: {:?}", counts.counts());
                }
            }
        }

        let mut rc = RenderConfig::around_field((800, 600), &state.bounds, 12.0);
        rc.set_style(
            "maize",
            LayerStyle::Dot {
                color: [90, 200, 70],
                radius: 5,
            },
        );
        rc.set_style(
            "weed",
            LayerStyle::Dot {
                color: [240, 220, 60],
                radius: 1,
            },
        );
        render_scene_to_png(&state, &rc, format!("weeds-{name}.png"))?;
    }

    Ok(())
}
