//! The regeneration entry point: configuration in, freshly owned grids out.

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::blend::{BlendOutput, LayerFields, blend};
use crate::error::TerrainError;
use crate::export::{SplatGrid, splat_from_weights, to_heightmap, to_splat_weights};
use crate::grid::{ElevationGrid, Grid, LayerLabelGrid};
use crate::layer::{BlendPolicy, LayerKind, TerrainConfig, TerrainDimensions};
use crate::noise_field::NoiseFieldGenerator;

/// Every grid produced by one regeneration.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedTerrain {
    pub dimensions: TerrainDimensions,
    /// Raw normalized noise per layer, before weighting.
    pub fields: LayerFields,
    pub blend: BlendOutput,
    /// Heights in world units (`elevation * depth`).
    pub heightmap: Grid<f64>,
    /// One-hot under [`BlendPolicy::HardClassify`], blended under
    /// [`BlendPolicy::SmoothBlend`].
    pub splat: SplatGrid,
}

impl GeneratedTerrain {
    pub fn elevation(&self) -> &ElevationGrid {
        &self.blend.elevation
    }

    pub fn labels(&self) -> &LayerLabelGrid {
        &self.blend.labels
    }

    /// World height of cell `(x, y)`.
    pub fn world_height(&self, x: usize, y: usize) -> Option<f64> {
        self.heightmap.get(x, y).copied()
    }

    /// Cells labelled with any of `kinds`, for sampling placements without retries.
    pub fn candidates(&self, kinds: &[LayerKind]) -> Vec<(usize, usize)> {
        self.blend.labels.cells_with_any(kinds)
    }
}

/// Runs the noise, blend and export stages.
#[derive(Clone, Debug)]
pub struct TerrainGenerator {
    threads: usize,
}

impl TerrainGenerator {
    /// A generator that samples noise on the calling thread.
    pub fn new() -> Self {
        Self { threads: 1 }
    }

    /// Sample noise rows on `threads` scoped workers.
    pub fn with_threads(threads: usize) -> Self {
        Self {
            threads: threads.max(1),
        }
    }

    /// One noise worker per logical CPU.
    pub fn with_available_parallelism() -> Self {
        Self::with_threads(num_cpus::get())
    }

    /// Regenerate every grid from `config`.
    ///
    /// # Errors
    ///
    /// Fails with a validation error before allocating anything if the
    /// configuration is invalid.
    pub fn regenerate(&self, config: &TerrainConfig) -> Result<GeneratedTerrain, TerrainError> {
        config.validate()?;
        let start = Instant::now();
        let dims = config.dimensions;

        for kind in config.layers_exceeding_depth() {
            warn!(
                layer = %kind,
                max_height = config.layer(kind).max_height,
                depth = dims.depth,
                "layer can rise above the terrain depth; normalized elevation will exceed 1.0"
            );
        }

        let noise = NoiseFieldGenerator::new(config.seed).with_threads(self.threads);
        let fields = LayerFields {
            water: noise.generate_layer(dims.width, dims.height, &config.water)?,
            ground: noise.generate_layer(dims.width, dims.height, &config.ground)?,
            mountain: noise.generate_layer(dims.width, dims.height, &config.mountain)?,
        };
        debug!(
            width = dims.width,
            height = dims.height,
            seed = config.seed,
            threads = self.threads,
            "noise fields generated"
        );

        let blend = blend(&fields, config)?;
        let heightmap = to_heightmap(&blend.elevation, dims.depth);
        let splat = match config.policy {
            BlendPolicy::HardClassify => to_splat_weights(&blend.labels, LayerKind::COUNT)?,
            BlendPolicy::SmoothBlend => splat_from_weights(&blend.weights),
        };

        let [water, ground, mountain] = blend.labels.histogram();
        info!(
            width = dims.width,
            height = dims.height,
            policy = ?config.policy,
            water,
            ground,
            mountain,
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "terrain regenerated"
        );

        Ok(GeneratedTerrain {
            dimensions: dims,
            fields,
            blend,
            heightmap,
            splat,
        })
    }
}

impl Default for TerrainGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Regenerate every grid from `config` on the calling thread.
pub fn regenerate(config: &TerrainConfig) -> Result<GeneratedTerrain, TerrainError> {
    TerrainGenerator::new().regenerate(config)
}
