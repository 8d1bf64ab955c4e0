//! Debug renderers: noise previews, elevation bands, label maps and splat mixes.

use super::image::DebugImage;
use crate::export::SplatGrid;
use crate::grid::{ElevationGrid, LayerLabelGrid, NoiseField};
use crate::layer::{LayerKind, TerrainConfig};

/// Render a noise field as grayscale, black at `0` and white at `1`.
pub fn render_noise_field(field: &NoiseField) -> DebugImage {
    DebugImage::from_grid(field, |&v| {
        let level = (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        (level, level, level)
    })
}

/// Render normalized elevation with colors banded by each layer's height range.
pub fn render_elevation_debug(elevation: &ElevationGrid, config: &TerrainConfig) -> DebugImage {
    let depth = config.dimensions.depth;
    DebugImage::from_grid(elevation, |&h| height_to_color(h * depth, config))
}

/// Map a world height to an RGB color.
///
/// Bands: deep water -> shallow water below the ground minimum, green
/// lowlands up to the mountain minimum, brown slopes, then snow in the top
/// quarter of the mountain range.
pub fn height_to_color(world_height: f64, config: &TerrainConfig) -> (u8, u8, u8) {
    let ground_min = config.ground.min_height;
    let mountain_min = config.mountain.min_height;
    let mountain_max = config.mountain.max_height;

    if world_height < ground_min {
        let t = fraction(world_height, config.water.min_height, ground_min);
        lerp_color((0, 0, 128), (30, 80, 200), t)
    } else if world_height < mountain_min {
        let t = fraction(world_height, ground_min, mountain_min);
        lerp_color((30, 160, 30), (110, 120, 50), t)
    } else {
        let t = fraction(world_height, mountain_min, mountain_max);
        if t < 0.75 {
            lerp_color((110, 120, 50), (150, 70, 70), t / 0.75)
        } else {
            let base = (150.0 + (t - 0.75) / 0.25 * 105.0) as u8;
            (base, base, base)
        }
    }
}

/// Fixed display color of each layer.
pub fn layer_color(kind: LayerKind) -> (u8, u8, u8) {
    match kind {
        LayerKind::Water => (20, 50, 180),
        LayerKind::Ground => (100, 180, 60),
        LayerKind::Mountain => (130, 110, 90),
    }
}

/// Render the dominant-layer label of every cell.
pub fn render_label_map(labels: &LayerLabelGrid) -> DebugImage {
    DebugImage::from_grid(labels, |&kind| layer_color(kind))
}

/// Render splat weights as a weighted mix of [`layer_color`]s.
pub fn render_splat_debug(splat: &SplatGrid) -> DebugImage {
    let width = splat.width();
    let mut image = DebugImage::new(width as u32, splat.height() as u32);
    for (i, weights) in splat.cells().enumerate() {
        let mut rgb = [0.0f64; 3];
        for (kind, &w) in LayerKind::ALL.iter().zip(weights) {
            let (r, g, b) = layer_color(*kind);
            rgb[0] += w * r as f64;
            rgb[1] += w * g as f64;
            rgb[2] += w * b as f64;
        }
        let [r, g, b] = rgb.map(|c| c.round().clamp(0.0, 255.0) as u8);
        image.set_rgb((i % width) as u32, (i / width) as u32, (r, g, b));
    }
    image
}

fn fraction(value: f64, lo: f64, hi: f64) -> f64 {
    if hi > lo {
        ((value - lo) / (hi - lo)).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn lerp_color(a: (u8, u8, u8), b: (u8, u8, u8), t: f64) -> (u8, u8, u8) {
    let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
    (mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}
