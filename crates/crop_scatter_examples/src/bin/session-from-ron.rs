use crop_scatter::prelude::*;
use crop_scatter_examples::{
    init_tracing, load_scene_config, render_scene_to_png, LayerStyle, RenderConfig,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let path = format!(
        "{}/assets/session-from-ron/scene.ron",
        env!("CARGO_MANIFEST_DIR")
    );
    let config = load_scene_config(&path)?;

    // Variant reassignment needs a host that can destroy objects.
    let mut host = if config.randomize.reassign_variants {
        RecordingHost::recreatable()
    } else {
        RecordingHost::new()
    };
    let mut rng = StdRng::seed_from_u64(config.session.frame_seed.unwrap_or(0));

    let mut sink = FnSink::new(|event: SceneEvent| match event {
        SceneEvent::LayerPlaced { layer, counts, .. } => {
            println!("{layer}: {:?}", counts.into_inner());
        }
        SceneEvent::DegenerateSweep { point } => {
            println!("degenerate sweep at {point}");
        }
        SceneEvent::FrameRendered { frame } => println!("frame {frame} rendered"),
        _ => {}
    });

    let mut state = build_scene_with_events(&config, &mut host, &mut rng, &mut sink)?;
    let frames = run_session_with_events(&mut state, &mut host, &config, &mut rng, &mut sink)?;
    drop(sink);

    println!(
        "{frames} frames, {} objects, {} recreated, writer output in {}",
        host.object_count(),
        host.destroyed(),
        config.output.output_dir.display()
    );

    let mut rc = RenderConfig::around_field((800, 600), &state.bounds, 10.0);
    rc.set_style(
        &config.crops.label,
        LayerStyle::Dot {
            color: [90, 200, 70],
            radius: 6,
        },
    );
    rc.set_style(
        &config.weeds.label,
        LayerStyle::Dot {
            color: [240, 220, 60],
            radius: 3,
        },
    );
    render_scene_to_png(&state, &rc, "session-from-ron.png")?;
    Ok(())
}
