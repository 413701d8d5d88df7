use crop_scatter::prelude::*;
use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn weights() -> Vec<WeightedCategory> {
    vec![
        WeightedCategory::new("A", 0.4),
        WeightedCategory::new("B", 0.3),
        WeightedCategory::new("C", 0.2),
        WeightedCategory::new("D", 0.1),
    ]
}

#[test]
fn field_bounds_are_centered_for_any_valid_config() {
    for orientation in [Orientation::Horizontal, Orientation::Vertical] {
        for (cols, plants, delta, spacing) in [(1, 1, 0.5, 0.5), (3, 8, 19.0, 10.0), (7, 2, 3.3, 11.1)]
        {
            let config = FieldConfig::new(cols, plants, delta, spacing).with_orientation(orientation);
            let b = FieldBounds::try_from_config(&config).unwrap();
            assert!(b.width > 0.0 && b.length > 0.0);
            assert!((b.start_x + b.width / 2.0).abs() < 1e-5);
            assert!((b.start_y + b.length / 2.0).abs() < 1e-5);
        }
    }
}

#[test]
fn exact_counts_split_population_without_drift() {
    let counts = exact_counts(&weights(), 3000).unwrap();
    assert_eq!(counts.counts(), vec![1200, 900, 600, 300]);

    for total in 0..200 {
        assert_eq!(exact_counts(&weights(), total).unwrap().total(), total);
    }
}

#[test]
fn population_scene_places_exact_weed_counts() {
    let mut config = SceneConfig::default().with_weed_mode(ScatterMode::Population { total: 3000 });
    config.weeds.categories = weights();
    let mut host = RecordingHost::new();
    let mut sink = VecSink::new();
    let state =
        build_scene_with_events(&config, &mut host, &mut StdRng::seed_from_u64(1), &mut sink)
            .unwrap();

    let by_category = |id: &str| {
        state
            .weeds
            .iter()
            .filter(|w| w.base.category_id == id)
            .count()
    };
    assert_eq!(by_category("A"), 1200);
    assert_eq!(by_category("B"), 900);
    assert_eq!(by_category("C"), 600);
    assert_eq!(by_category("D"), 300);
    assert_eq!(host.objects_with_class("weed").count(), 3000);

    let weed_counts = sink.as_slice().iter().find_map(|e| match e {
        SceneEvent::LayerPlaced { layer, counts, .. } if layer == "weeds" => Some(counts.counts()),
        _ => None,
    });
    assert_eq!(weed_counts, Some(vec![1200, 900, 600, 300]));
}

#[test]
fn unjittered_sweep_is_even_and_colinear() {
    let bounds = FieldBounds::from_config(&FieldConfig::default());
    let sweep = SweepConfig::default().with_jitter_rel(0.0);
    let plan = CameraSweepPlanner::try_new(&bounds, &sweep)
        .unwrap()
        .plan(&mut StdRng::seed_from_u64(3));

    let points: Vec<Vec2> = plan.poses.iter().map(|p| p.position.truncate()).collect();
    let step = points[1] - points[0];
    for pair in points.windows(2) {
        assert!(((pair[1] - pair[0]) - step).length() < 1e-3);
    }
    assert_eq!(plan.line.t(0), 0.0);
    assert_eq!(plan.line.t(11), 1.0);
}

#[test]
fn full_session_on_recording_host() {
    let config = SceneConfig::default()
        .with_ground_textures(vec!["a.png".into(), "b.png".into(), "c.png".into()])
        .with_frames(4)
        .with_output_dir("out/test");
    let mut host = RecordingHost::new();
    let mut rng = StdRng::seed_from_u64(2024);
    let mut state = build_scene(&config, &mut host, &mut rng).unwrap();
    let frames = run_session(&mut state, &mut host, &config, &mut rng).unwrap();

    assert_eq!(frames, 4);
    assert_eq!(host.frames_run(), 4);
    assert_eq!(host.objects_with_class("maize").count(), 24);
    assert_eq!(host.objects_with_class("weed").count(), 35);

    let names: Vec<String> = host.cameras().map(|c| c.name.clone()).collect();
    let expected: Vec<String> = (0..12).map(camera_name).collect();
    assert_eq!(names, expected);

    let (targets, writer) = host.writer().unwrap();
    assert_eq!(targets, &state.render_targets);
    assert_eq!(writer.output_dir, std::path::PathBuf::from("out/test"));
    assert!(writer
        .annotations
        .contains(&AnnotationKind::SemanticSegmentation));

    let ground = state.ground.as_ref().unwrap();
    let texture = host.ground(ground.handle).unwrap().texture.clone();
    assert_eq!(texture.as_deref(), ground.texture());

    for o in state.objects() {
        let record = host.object(o.handle.object()).unwrap();
        assert_eq!(record.position, o.current.position);
        assert_eq!(record.semantic_class, o.label);
    }
}

#[test]
fn pose_only_reassignment_is_rejected() {
    let mut host = RecordingHost::new();
    let mut state =
        build_scene(&SceneConfig::default(), &mut host, &mut StdRng::seed_from_u64(4)).unwrap();

    let current = state.weeds[0].current.category_id.clone();
    let other = if current == "taraxacum_01" {
        "taraxacum_02"
    } else {
        "taraxacum_01"
    };
    let err = state.reassign(PlacementRef::Weed(0), other).unwrap_err();
    assert!(matches!(err, Error::UnsupportedReassignment { .. }));
    assert_eq!(state.weeds[0].current.category_id, current);

    state.reassign(PlacementRef::Weed(0), current).unwrap();
    assert!(matches!(
        state.reassign(PlacementRef::Crop(999), "maize_small"),
        Err(Error::UnknownPlacement { group: "crop", index: 999 })
    ));
}

#[test]
fn recreatable_reassignment_replaces_the_host_object() {
    let mut host = RecordingHost::recreatable();
    let mut state =
        build_scene(&SceneConfig::default(), &mut host, &mut StdRng::seed_from_u64(4)).unwrap();
    let old = state.crops[0].handle;

    let next = if state.crops[0].current.category_id == "maize_small" {
        "maize_medium"
    } else {
        "maize_small"
    };
    state.reassign(PlacementRef::Crop(0), next).unwrap();
    sync_to_host(&mut state, &mut host).unwrap();

    let new = state.crops[0].handle;
    assert_ne!(old, new);
    assert!(host.object(old.object()).is_none());
    assert_eq!(host.object(new.object()).unwrap().category_id, next);
    assert_eq!(host.destroyed(), 1);
}

#[test]
fn vertical_fields_swap_the_lattice_axes() {
    let field = FieldConfig::default().with_orientation(Orientation::Vertical);
    let config = SceneConfig::default().with_field(field);
    let mut host = RecordingHost::new();
    let state = build_scene(&config, &mut host, &mut StdRng::seed_from_u64(6)).unwrap();

    assert_eq!(state.bounds.width, 57.0);
    assert_eq!(state.bounds.length, 80.0);
    // Column-major order: the first two crops share a column and differ along Y.
    let a = state.crops[0].base.ground_position();
    let b = state.crops[1].base.ground_position();
    assert_eq!(a.x, b.x);
    assert_eq!(b.y - a.y, 10.0);
}
