//! Vegetation placement on labelled terrain.
//!
//! Placement draws from the precomputed set of cells carrying an accepted
//! label, so it always terminates: an empty set is reported as an error
//! instead of being retried forever.

use glam::DVec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::TerrainError;
use crate::generator::GeneratedTerrain;
use crate::layer::LayerKind;

/// One kind of vegetation to scatter (trees, bushes, ...).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VegetationKindDef {
    pub name: String,
    /// Instances to place.
    pub count: usize,
    /// Uniform scale variation range `(min, max)`.
    pub scale_range: (f64, f64),
}

/// Placement settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VegetationConfig {
    /// Seed for the placement RNG.
    pub seed: u64,
    pub kinds: Vec<VegetationKindDef>,
    /// Labels vegetation may stand on.
    pub allowed_layers: Vec<LayerKind>,
    /// Cells below this world height are not candidates.
    pub min_world_height: Option<f64>,
}

impl Default for VegetationConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            kinds: vec![
                VegetationKindDef {
                    name: "tree".into(),
                    count: 100,
                    scale_range: (0.8, 1.2),
                },
                VegetationKindDef {
                    name: "bush".into(),
                    count: 100,
                    scale_range: (0.6, 1.0),
                },
            ],
            allowed_layers: vec![LayerKind::Ground],
            min_world_height: None,
        }
    }
}

impl VegetationConfig {
    /// Check every scale range and the height floor.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::InvalidScaleRange`] for a non-finite, negative
    /// or inverted scale range, and [`TerrainError::InvalidMinWorldHeight`]
    /// for a NaN height floor.
    pub fn validate(&self) -> Result<(), TerrainError> {
        for def in &self.kinds {
            let (min, max) = def.scale_range;
            if !min.is_finite() || !max.is_finite() || min < 0.0 || min > max {
                return Err(TerrainError::InvalidScaleRange {
                    kind: def.name.clone(),
                    min,
                    max,
                });
            }
        }
        if let Some(height) = self.min_world_height
            && height.is_nan()
        {
            return Err(TerrainError::InvalidMinWorldHeight(height));
        }
        Ok(())
    }
}

/// A placed vegetation instance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacedVegetation {
    /// Index into [`VegetationConfig::kinds`].
    pub kind: usize,
    /// Grid cell the instance stands in.
    pub cell: (usize, usize),
    /// World position: grid x, world height, grid y.
    pub position: DVec3,
    /// Rotation around the vertical axis, in radians.
    pub rotation: f64,
    pub scale: f64,
}

/// Scatters vegetation over the candidate cells of a generated terrain.
pub struct VegetationPlacer {
    config: VegetationConfig,
}

impl VegetationPlacer {
    pub fn new(config: VegetationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &VegetationConfig {
        &self.config
    }

    /// Cells an instance may be placed in.
    pub fn candidates(&self, terrain: &GeneratedTerrain) -> Vec<(usize, usize)> {
        let mut cells = terrain.candidates(&self.config.allowed_layers);
        if let Some(min_height) = self.config.min_world_height {
            cells.retain(|&(x, y)| terrain.heightmap[(x, y)] >= min_height);
        }
        cells
    }

    /// Place every configured instance. Deterministic for a given seed and terrain.
    ///
    /// # Errors
    ///
    /// Returns a validation error from [`VegetationConfig::validate`], or
    /// [`TerrainError::NoCandidateCells`] if instances were requested but no
    /// cell qualifies.
    pub fn place(&self, terrain: &GeneratedTerrain) -> Result<Vec<PlacedVegetation>, TerrainError> {
        self.config.validate()?;
        let total: usize = self.config.kinds.iter().map(|k| k.count).sum();
        if total == 0 {
            return Ok(Vec::new());
        }

        let candidates = self.candidates(terrain);
        if candidates.is_empty() {
            return Err(TerrainError::NoCandidateCells(
                self.config.allowed_layers.clone(),
            ));
        }

        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        let mut placed = Vec::with_capacity(total);

        for (kind, def) in self.config.kinds.iter().enumerate() {
            let (min_scale, max_scale) = def.scale_range;
            for _ in 0..def.count {
                let (cx, cy) = candidates[rng.random_range(0..candidates.len())];
                let jitter_x: f64 = rng.random();
                let jitter_z: f64 = rng.random();
                let scale = if max_scale > min_scale {
                    rng.random_range(min_scale..=max_scale)
                } else {
                    min_scale
                };
                let rotation = rng.random_range(0.0..std::f64::consts::TAU);

                placed.push(PlacedVegetation {
                    kind,
                    cell: (cx, cy),
                    position: DVec3::new(
                        cx as f64 + jitter_x,
                        terrain.heightmap[(cx, cy)],
                        cy as f64 + jitter_z,
                    ),
                    rotation,
                    scale,
                });
            }
        }

        debug!(
            placed = placed.len(),
            candidates = candidates.len(),
            "vegetation placed"
        );
        Ok(placed)
    }
}
