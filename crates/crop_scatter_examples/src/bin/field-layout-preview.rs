use crop_scatter::prelude::*;
use crop_scatter_examples::{init_tracing, render_scene_to_png, LayerStyle, RenderConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Reference field: 3 columns of 8 maize plants, 35 weeds, 12 cameras.
    let config = SceneConfig::default().with_ground_textures(vec![
        "ground_textures/ground1.png".into(),
        "ground_textures/ground2.png".into(),
    ]);

    let mut host = RecordingHost::new();
    let mut rng = StdRng::seed_from_u64(2025);
    let state = build_scene(&config, &mut host, &mut rng)?;

    let mut rc = RenderConfig::around_field((800, 600), &state.bounds, 10.0);
    rc.set_style(
        "maize",
        LayerStyle::Dot {
            color: [90, 200, 70],
            radius: 6,
        },
    );
    rc.set_style(
        "weed",
        LayerStyle::Dot {
            color: [240, 220, 60],
            radius: 3,
        },
    );

    render_scene_to_png(&state, &rc, "field-layout-preview.png")?;
    Ok(())
}
