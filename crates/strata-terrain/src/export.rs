//! Conversions from blended grids to what a terrain host consumes:
//! world-unit heightmaps, splat weights and per-layer texture descriptors.

use serde::{Deserialize, Serialize};

use crate::error::TerrainError;
use crate::grid::{ElevationGrid, Grid, LayerLabelGrid};
use crate::layer::{LayerKind, TerrainConfig};

/// Per-cell layer weights, `layers` channels per cell, stored row-major.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SplatParts")]
pub struct SplatGrid {
    width: usize,
    height: usize,
    layers: usize,
    weights: Vec<f64>,
}

#[derive(Deserialize)]
struct SplatParts {
    width: usize,
    height: usize,
    layers: usize,
    weights: Vec<f64>,
}

impl TryFrom<SplatParts> for SplatGrid {
    type Error = String;

    fn try_from(parts: SplatParts) -> Result<Self, Self::Error> {
        let expected = parts
            .width
            .checked_mul(parts.height)
            .and_then(|cells| cells.checked_mul(parts.layers));
        if parts.layers == 0 || expected != Some(parts.weights.len()) {
            return Err(format!(
                "{} weights do not fill a {}x{} grid of {} layers",
                parts.weights.len(),
                parts.width,
                parts.height,
                parts.layers
            ));
        }
        Ok(SplatGrid {
            width: parts.width,
            height: parts.height,
            layers: parts.layers,
            weights: parts.weights,
        })
    }
}

impl SplatGrid {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Channels per cell.
    pub fn layers(&self) -> usize {
        self.layers
    }

    /// The weight vector of cell `(x, y)`, or `None` when out of bounds.
    pub fn cell(&self, x: usize, y: usize) -> Option<&[f64]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let start = (y * self.width + x) * self.layers;
        self.weights.get(start..start + self.layers)
    }

    /// Iterate every cell's weight vector in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &[f64]> {
        self.weights.chunks(self.layers.max(1))
    }

    /// Flat `[cell][layer]` buffer, the layout alphamap uploads expect.
    pub fn as_slice(&self) -> &[f64] {
        &self.weights
    }
}

/// Scale normalized elevation into world units (`elevation * depth`).
pub fn to_heightmap(elevation: &ElevationGrid, depth: f64) -> Grid<f64> {
    elevation.map(|&h| h * depth)
}

/// Inverse of [`to_heightmap`].
///
/// # Errors
///
/// Returns [`TerrainError::InvalidDepth`] for a depth that is not a normal
/// positive finite number.
pub fn from_heightmap(heightmap: &Grid<f64>, depth: f64) -> Result<ElevationGrid, TerrainError> {
    if !depth.is_finite() || depth < f64::MIN_POSITIVE {
        return Err(TerrainError::InvalidDepth(depth));
    }
    Ok(heightmap.map(|&h| h / depth))
}

/// One-hot splat weights from the dominant-layer labels.
///
/// Channels beyond the three terrain layers are left at zero.
///
/// # Errors
///
/// Returns [`TerrainError::TooFewSplatLayers`] if `num_layers` cannot hold
/// every [`LayerKind`].
pub fn to_splat_weights(
    labels: &LayerLabelGrid,
    num_layers: usize,
) -> Result<SplatGrid, TerrainError> {
    if num_layers < LayerKind::COUNT {
        return Err(TerrainError::TooFewSplatLayers {
            requested: num_layers,
            required: LayerKind::COUNT,
        });
    }
    let len = labels
        .len()
        .checked_mul(num_layers)
        .ok_or(TerrainError::GridTooLarge {
            width: labels.width(),
            height: labels.height(),
        })?;
    let mut weights = vec![0.0; len];
    for (i, label) in labels.cells().iter().enumerate() {
        weights[i * num_layers + label.index()] = 1.0;
    }
    Ok(SplatGrid {
        width: labels.width(),
        height: labels.height(),
        layers: num_layers,
        weights,
    })
}

/// Splat weights taken directly from blended per-layer weights.
pub fn splat_from_weights(weights: &Grid<[f64; LayerKind::COUNT]>) -> SplatGrid {
    SplatGrid {
        width: weights.width(),
        height: weights.height(),
        layers: LayerKind::COUNT,
        weights: weights.cells().iter().flatten().copied().collect(),
    }
}

/// Normalized height thresholds for classifying cells by elevation alone.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeightBands {
    /// Cells below this normalized height are water.
    pub water_level: f64,
    /// Cells below this normalized height (and not water) are ground.
    pub ground_level: f64,
}

impl Default for HeightBands {
    fn default() -> Self {
        Self {
            water_level: 0.2,
            ground_level: 0.4,
        }
    }
}

impl HeightBands {
    pub fn classify(&self, normalized_height: f64) -> LayerKind {
        if normalized_height < self.water_level {
            LayerKind::Water
        } else if normalized_height < self.ground_level {
            LayerKind::Ground
        } else {
            LayerKind::Mountain
        }
    }
}

/// Relabel an elevation grid by fixed height bands instead of layer dominance.
pub fn labels_from_height_bands(elevation: &ElevationGrid, bands: &HeightBands) -> LayerLabelGrid {
    elevation.map(|&h| bands.classify(h))
}

/// What the host needs to create one texture layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TerrainLayerDesc {
    pub kind: LayerKind,
    pub texture: Option<String>,
    /// Texture tiling in world units along x and z.
    pub tile_size: (f64, f64),
}

/// Texture layer descriptors in splat-channel order. Textures tile ten times
/// across the terrain on each axis.
pub fn terrain_layers(config: &TerrainConfig) -> [TerrainLayerDesc; LayerKind::COUNT] {
    let tile_size = (
        config.dimensions.width as f64 / 10.0,
        config.dimensions.height as f64 / 10.0,
    );
    LayerKind::ALL.map(|kind| TerrainLayerDesc {
        kind,
        texture: config.layer(kind).texture.clone(),
        tile_size,
    })
}
