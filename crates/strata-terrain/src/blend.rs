//! Layer blending: weighted water/ground/mountain samples to elevation and labels.

use crate::error::TerrainError;
use crate::grid::{ElevationGrid, Grid, LayerLabelGrid, NoiseField};
use crate::layer::{BlendPolicy, LayerKind, TerrainConfig};

/// Linearly remap `value` from `[from_min, from_max]` to `[to_min, to_max]`.
///
/// A degenerate source range maps everything to `to_min`.
pub fn remap(value: f64, from_min: f64, from_max: f64, to_min: f64, to_max: f64) -> f64 {
    let span = from_max - from_min;
    if span == 0.0 {
        return to_min;
    }
    (value - from_min) / span * (to_max - to_min) + to_min
}

/// Hermite smooth step of `t` clamped to `[0, 1]`.
pub fn smoothstep(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// The three noise fields feeding one blend.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerFields {
    pub water: NoiseField,
    pub ground: NoiseField,
    pub mountain: NoiseField,
}

impl LayerFields {
    pub fn get(&self, kind: LayerKind) -> &NoiseField {
        match kind {
            LayerKind::Water => &self.water,
            LayerKind::Ground => &self.ground,
            LayerKind::Mountain => &self.mountain,
        }
    }

    fn check_dimensions(&self, expected: (usize, usize)) -> Result<(), TerrainError> {
        for kind in LayerKind::ALL {
            let found = self.get(kind).dimensions();
            if found != expected {
                return Err(TerrainError::DimensionMismatch { expected, found });
            }
        }
        Ok(())
    }
}

/// Result of blending one cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellBlend {
    /// Height in world units.
    pub height: f64,
    /// Layer contributing the height.
    pub label: LayerKind,
    /// Per-layer weights in channel order, summing to one.
    pub weights: [f64; LayerKind::COUNT],
}

/// Blended grids for a whole terrain.
#[derive(Clone, Debug, PartialEq)]
pub struct BlendOutput {
    /// World height divided by depth.
    pub elevation: ElevationGrid,
    pub labels: LayerLabelGrid,
    /// Per-layer weights feeding the blended splat map.
    pub weights: Grid<[f64; LayerKind::COUNT]>,
}

/// Blend a single cell's raw noise samples under the configured policy.
pub fn blend_cell(water: f64, ground: f64, mountain: f64, config: &TerrainConfig) -> CellBlend {
    let w = water * config.water.weight;
    let g = ground * config.ground.weight;
    let m = mountain * config.mountain.weight;

    match config.policy {
        BlendPolicy::HardClassify => {
            let (label, value) = if m >= g && m >= w {
                (LayerKind::Mountain, m)
            } else if g >= w {
                (LayerKind::Ground, g)
            } else {
                (LayerKind::Water, w)
            };
            let mut weights = [0.0; LayerKind::COUNT];
            weights[label.index()] = 1.0;
            CellBlend {
                height: config.layer(label).remap(value),
                label,
                weights,
            }
        }
        BlendPolicy::SmoothBlend => {
            let water_blend = smoothstep(w);
            let ground_blend = smoothstep(g);
            let mountain_blend = smoothstep(m);

            let total = ground_blend + mountain_blend;
            let (ground_share, mountain_share) = if total > 0.0 {
                (ground_blend / total, mountain_blend / total)
            } else {
                (0.5, 0.5)
            };

            if water_blend > ground_share && water_blend > mountain_share {
                CellBlend {
                    height: config.water.remap(w),
                    label: LayerKind::Water,
                    weights: [1.0, 0.0, 0.0],
                }
            } else {
                let height = ground_share * config.ground.remap(g)
                    + mountain_share * config.mountain.remap(m);
                let label = if mountain_share >= ground_share {
                    LayerKind::Mountain
                } else {
                    LayerKind::Ground
                };
                CellBlend {
                    height,
                    label,
                    weights: [0.0, ground_share, mountain_share],
                }
            }
        }
    }
}

/// Blend three noise fields into elevation, labels and splat weights.
///
/// # Errors
///
/// Returns [`TerrainError::DimensionMismatch`] if any field's shape differs
/// from the configured grid, or a validation error from
/// [`TerrainConfig::validate`].
pub fn blend(fields: &LayerFields, config: &TerrainConfig) -> Result<BlendOutput, TerrainError> {
    config.validate()?;
    let dims = config.dimensions;
    fields.check_dimensions((dims.width, dims.height))?;

    let count = dims.width * dims.height;
    let mut elevation = Vec::with_capacity(count);
    let mut labels = Vec::with_capacity(count);
    let mut weights = Vec::with_capacity(count);

    let samples = fields
        .water
        .cells()
        .iter()
        .zip(fields.ground.cells())
        .zip(fields.mountain.cells());
    for ((&water, &ground), &mountain) in samples {
        let cell = blend_cell(water, ground, mountain, config);
        elevation.push(cell.height / dims.depth);
        labels.push(cell.label);
        weights.push(cell.weights);
    }

    Ok(BlendOutput {
        elevation: Grid::from_parts(dims.width, dims.height, elevation),
        labels: Grid::from_parts(dims.width, dims.height, labels),
        weights: Grid::from_parts(dims.width, dims.height, weights),
    })
}
