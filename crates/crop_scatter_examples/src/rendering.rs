use std::collections::HashMap;
use std::path::Path;

use crop_scatter::prelude::*;
use glam::Vec2;
use image::{Rgb, RgbImage};
use tracing_subscriber::EnvFilter;

/// Installs a `fmt` subscriber. `RUST_LOG` overrides the default `info` level.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// How objects of one semantic class are drawn.
#[derive(Clone, Copy, Debug)]
pub enum LayerStyle {
    /// Filled disc with a fixed pixel radius.
    Dot { color: [u8; 3], radius: i32 },
    /// Filled disc sized by the object's scale.
    Scaled { color: [u8; 3], pixels_per_unit: f32 },
}

/// Top-down preview settings.
#[derive(Clone, Debug)]
pub struct RenderConfig {
    pub image_size: (u32, u32),
    /// World region mapped onto the image.
    pub domain: Region,
    pub background: [u8; 3],
    pub field_outline: Option<[u8; 3]>,
    pub camera_color: [u8; 3],
    styles: HashMap<String, LayerStyle>,
}

impl RenderConfig {
    /// Frames the field with a margin of `margin` world units on every side.
    pub fn around_field(image_size: (u32, u32), bounds: &FieldBounds, margin: f32) -> Self {
        let field = bounds.region();
        let pad = Vec2::splat(margin);
        Self {
            image_size,
            domain: Region::new(field.min - pad, field.max + pad),
            background: [58, 44, 32],
            field_outline: Some([120, 100, 80]),
            camera_color: [80, 160, 255],
            styles: HashMap::new(),
        }
    }

    pub fn with_background(mut self, background: [u8; 3]) -> Self {
        self.background = background;
        self
    }

    pub fn set_style(&mut self, label: &str, style: LayerStyle) {
        self.styles.insert(label.to_owned(), style);
    }

    fn to_pixel(&self, p: Vec2) -> (i32, i32) {
        let e = self.domain.extent();
        let (w, h) = self.image_size;
        let u = (p.x - self.domain.min.x) / e.x;
        let v = (self.domain.max.y - p.y) / e.y;
        ((u * w as f32) as i32, (v * h as f32) as i32)
    }
}

/// Draws the current frame of `state` (field outline, objects, camera path) into a PNG.
pub fn render_scene_to_png(
    state: &SceneState,
    config: &RenderConfig,
    path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    let (w, h) = config.image_size;
    let mut img = RgbImage::from_pixel(w, h, Rgb(config.background));

    if let Some(color) = config.field_outline {
        let r = state.bounds.region();
        let corners = [
            r.min,
            Vec2::new(r.max.x, r.min.y),
            r.max,
            Vec2::new(r.min.x, r.max.y),
        ];
        for i in 0..4 {
            let a = config.to_pixel(corners[i]);
            let b = config.to_pixel(corners[(i + 1) % 4]);
            draw_line(&mut img, a, b, color);
        }
    }

    for object in state.objects() {
        let Some(style) = config.styles.get(&object.label) else {
            continue;
        };
        let (color, radius) = match *style {
            LayerStyle::Dot { color, radius } => (color, radius),
            LayerStyle::Scaled {
                color,
                pixels_per_unit,
            } => (color, (object.current.scale * pixels_per_unit).max(1.0) as i32),
        };
        let c = config.to_pixel(object.current.ground_position());
        fill_disc(&mut img, c, radius, color);
    }

    let path_points: Vec<_> = state
        .cameras
        .iter()
        .map(|c| config.to_pixel(c.current.position.truncate()))
        .collect();
    for pair in path_points.windows(2) {
        draw_line(&mut img, pair[0], pair[1], config.camera_color);
    }
    for p in &path_points {
        fill_disc(&mut img, *p, 3, config.camera_color);
    }

    img.save(path.as_ref())?;
    tracing::info!("Wrote {}.", path.as_ref().display());
    Ok(())
}

fn put(img: &mut RgbImage, x: i32, y: i32, color: [u8; 3]) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, Rgb(color));
    }
}

fn fill_disc(img: &mut RgbImage, (cx, cy): (i32, i32), radius: i32, color: [u8; 3]) {
    let r2 = radius * radius;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= r2 {
                put(img, cx + dx, cy + dy, color);
            }
        }
    }
}

fn draw_line(img: &mut RgbImage, (x0, y0): (i32, i32), (x1, y1): (i32, i32), color: [u8; 3]) {
    let steps = (x1 - x0).abs().max((y1 - y0).abs()).max(1);
    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        let x = x0 as f32 + (x1 - x0) as f32 * t;
        let y = y0 as f32 + (y1 - y0) as f32 * t;
        put(img, x.round() as i32, y.round() as i32, color);
    }
}
