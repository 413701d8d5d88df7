use rand::RngCore;
use tracing::{info, warn};

use crate::camera::{camera_name, CameraSweepPlanner};
use crate::error::Result;
use crate::events::{EventSink, SceneEvent, SceneEventKind};
use crate::field::FieldBounds;
use crate::host::{ObjectHandle, PlacedHandle, SceneHost};
use crate::placement::{GridPlacer, Placement, ScatterPlacer};
use crate::sampling::category::CategoryCounts;
use crate::sampling::index;
use crate::scene::{
    PlacedCamera, PlacedGround, PlacedLight, PlacedObject, SceneConfig, SceneState,
};

/// Builds the scene on `host` and returns its state.
///
/// Order of host calls and RNG draws: ground, crops, weeds, cameras, light.
pub fn build_scene<H, R>(config: &SceneConfig, host: &mut H, rng: &mut R) -> Result<SceneState>
where
    H: SceneHost + ?Sized,
    R: RngCore,
{
    build_scene_with_events(config, host, rng, &mut ())
}

pub fn build_scene_with_events<H, R>(
    config: &SceneConfig,
    host: &mut H,
    rng: &mut R,
    sink: &mut dyn EventSink,
) -> Result<SceneState>
where
    H: SceneHost + ?Sized,
    R: RngCore,
{
    config.validate()?;

    let bounds = FieldBounds::try_from_config(&config.field)?;
    info!(
        "Field {} x {} starting at ({}, {}).",
        bounds.width, bounds.length, bounds.start_x, bounds.start_y
    );
    if sink.wants(SceneEventKind::SceneStarted) {
        sink.send(SceneEvent::SceneStarted {
            bounds,
            crops: config.field.plant_count(),
            weeds: config.weeds.mode.count(),
        });
    }

    // Every fallible constructor runs before the first host call.
    let grid_placer = GridPlacer::try_new(
        config.field.clone(),
        config.crops.variants.clone(),
        config.crops.scale,
    )?;
    let weed_region = config.weeds.region.resolve(&config.field, &bounds);
    let scatter_placer = ScatterPlacer::try_new(
        weed_region,
        config.weeds.categories.clone(),
        config.weeds.mode,
        config.weeds.scale,
    )?;
    let planner = CameraSweepPlanner::try_new(&bounds, &config.sweep)?;

    let ground = match &config.ground {
        Some(g) => {
            let current = match g.textures.len() {
                0 => None,
                1 => Some(0),
                n => Some(index(rng, n)),
            };
            let texture = current.map(|i| g.textures[i].as_str());
            let handle = host.create_ground(g.scale, texture)?;
            Some(PlacedGround {
                handle,
                textures: g.textures.clone(),
                current,
            })
        }
        None => None,
    };

    let wrap: fn(ObjectHandle) -> PlacedHandle = if host.supports_recreate() {
        PlacedHandle::Recreatable
    } else {
        PlacedHandle::PoseOnly
    };

    let grid = grid_placer.place(rng)?;
    let mut crops = Vec::with_capacity(grid.len());
    for (placement, cell) in grid.placements.into_iter().zip(grid.cells) {
        let handle = place(host, &placement, &config.crops.label)?;
        crops.push(PlacedObject::new(
            wrap(handle),
            &config.crops.label,
            placement,
            cell,
        ));
    }
    let crop_counts = CategoryCounts::tally(crops.iter().map(|o| &o.base.category_id));
    layer_placed(sink, "crops", &config.crops.label, crops.len(), crop_counts);

    let scatter = scatter_placer.place(rng)?;
    let mut weeds = Vec::with_capacity(scatter.placements.len());
    for placement in scatter.placements {
        let handle = place(host, &placement, &config.weeds.label)?;
        weeds.push(PlacedObject::new(
            wrap(handle),
            &config.weeds.label,
            placement,
            weed_region,
        ));
    }
    layer_placed(
        sink,
        "weeds",
        &config.weeds.label,
        weeds.len(),
        scatter.counts,
    );

    let plan = planner.plan(rng);
    if plan.degenerate && sink.wants(SceneEventKind::DegenerateSweep) {
        sink.send(SceneEvent::DegenerateSweep {
            point: plan.line.start,
        });
    }
    let mut cameras = Vec::with_capacity(plan.poses.len());
    let mut render_targets = Vec::with_capacity(plan.poses.len());
    for (i, pose) in plan.poses.into_iter().enumerate() {
        let name = camera_name(i);
        let handle = host.create_camera(&name, &pose)?;
        render_targets.push(host.create_render_target(handle, config.output.resolution)?);
        cameras.push(PlacedCamera {
            handle,
            name,
            base: pose,
            current: pose,
        });
    }
    info!(
        "Created {} cameras along the sweep at {}x{}.",
        cameras.len(),
        config.output.resolution.0,
        config.output.resolution.1
    );
    if sink.wants(SceneEventKind::CamerasPlanned) {
        sink.send(SceneEvent::CamerasPlanned {
            count: cameras.len(),
            degenerate: plan.degenerate,
        });
    }

    let light = match &config.light {
        Some(pose) => Some(PlacedLight {
            handle: host.create_light(pose)?,
            base: *pose,
            current: *pose,
        }),
        None => None,
    };

    let state = SceneState {
        bounds,
        crops,
        weeds,
        cameras,
        render_targets,
        ground,
        light,
        weed_region,
        crop_variants: config.crops.variants.clone(),
        weed_categories: config.weeds.categories.clone(),
    };

    if sink.wants(SceneEventKind::SceneFinished) {
        sink.send(SceneEvent::SceneFinished {
            crops: state.crops.len(),
            weeds: state.weeds.len(),
            cameras: state.cameras.len(),
        });
    }
    Ok(state)
}

fn place<H: SceneHost + ?Sized>(
    host: &mut H,
    placement: &Placement,
    label: &str,
) -> Result<ObjectHandle> {
    Ok(host.place_object(
        &placement.category_id,
        label,
        placement.position,
        placement.scale,
        placement.rotation_z,
    )?)
}

fn layer_placed(
    sink: &mut dyn EventSink,
    layer: &str,
    label: &str,
    count: usize,
    counts: CategoryCounts,
) {
    info!("Placed {count} {layer} labelled '{label}'.");
    if count == 0 {
        warn!("Layer '{layer}' is empty.");
        if sink.wants(SceneEventKind::Warning) {
            sink.send(SceneEvent::Warning {
                context: layer.into(),
                message: "Layer placed no objects".into(),
            });
        }
    }
    if sink.wants(SceneEventKind::LayerPlaced) {
        sink.send(SceneEvent::LayerPlaced {
            layer: layer.into(),
            label: label.into(),
            count,
            counts,
        });
    }
}
