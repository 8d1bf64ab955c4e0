//! Coordinate-space Perlin noise fields.
//!
//! Every layer samples the same Perlin lattice through its own scale, offset
//! and frequency, so layers decorrelate by offset rather than by seed. Raw
//! Perlin output in `[-1, 1]` is mapped to `[0, 1]` and clamped.

use noise::{NoiseFn, Perlin};

use crate::error::TerrainError;
use crate::grid::{Grid, NoiseField};
use crate::layer::{LayerSpec, checked_cell_count};

/// Sampling parameters for one noise field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoiseParams {
    /// Span of noise-space covered by the whole grid along each axis.
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    /// Multiplier applied after scaling and offsetting.
    pub frequency: f64,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            scale: 10.0,
            offset_x: 0.0,
            offset_y: 0.0,
            frequency: 1.0,
        }
    }
}

impl From<&LayerSpec> for NoiseParams {
    fn from(layer: &LayerSpec) -> Self {
        Self {
            scale: layer.scale,
            offset_x: layer.offset_x,
            offset_y: layer.offset_y,
            frequency: layer.frequency,
        }
    }
}

/// Generates [`NoiseField`]s from a seeded Perlin source.
///
/// Rows have no dependency on each other, so generation can be split across
/// scoped worker threads. The result is bit-identical to the serial path.
pub struct NoiseFieldGenerator {
    perlin: Perlin,
    seed: u32,
    threads: usize,
}

impl NoiseFieldGenerator {
    /// Create a single-threaded generator.
    pub fn new(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
            seed,
            threads: 1,
        }
    }

    /// Split generation across `threads` workers (at least one).
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    /// Use one worker per logical CPU.
    pub fn with_available_parallelism(self) -> Self {
        self.with_threads(num_cpus::get())
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Sample normalized noise at a continuous noise-space coordinate.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let raw = self.perlin.get([x, y]);
        ((raw + 1.0) * 0.5).clamp(0.0, 1.0)
    }

    /// Sample the value of grid cell `(x, y)` for a `width` x `height` field.
    pub fn sample_cell(
        &self,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        params: &NoiseParams,
    ) -> f64 {
        let x_coord = x as f64 / width as f64 * params.scale + params.offset_x;
        let y_coord = y as f64 / height as f64 * params.scale + params.offset_y;
        self.sample(x_coord * params.frequency, y_coord * params.frequency)
    }

    /// Generate a `width` x `height` field.
    ///
    /// A `scale` or `frequency` of zero collapses every cell onto the same
    /// noise coordinate and yields a constant field.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::InvalidDimensions`] if either dimension is zero,
    /// or [`TerrainError::GridTooLarge`] if the cell count overflows.
    pub fn generate(
        &self,
        width: usize,
        height: usize,
        params: &NoiseParams,
    ) -> Result<NoiseField, TerrainError> {
        if width == 0 || height == 0 {
            return Err(TerrainError::InvalidDimensions { width, height });
        }

        let mut cells = vec![0.0; checked_cell_count(width, height)?];
        let workers = self.threads.min(height);

        if workers <= 1 {
            self.fill_rows(&mut cells, 0, width, height, params);
        } else {
            let rows_per_worker = height.div_ceil(workers);
            std::thread::scope(|scope| {
                for (chunk_index, chunk) in cells.chunks_mut(rows_per_worker * width).enumerate() {
                    let first_row = chunk_index * rows_per_worker;
                    scope.spawn(move || self.fill_rows(chunk, first_row, width, height, params));
                }
            });
        }

        Ok(Grid::from_parts(width, height, cells))
    }

    /// Generate the field described by a layer's noise settings.
    pub fn generate_layer(
        &self,
        width: usize,
        height: usize,
        layer: &LayerSpec,
    ) -> Result<NoiseField, TerrainError> {
        self.generate(width, height, &NoiseParams::from(layer))
    }

    fn fill_rows(
        &self,
        rows: &mut [f64],
        first_row: usize,
        width: usize,
        height: usize,
        params: &NoiseParams,
    ) {
        for (row_offset, row) in rows.chunks_mut(width).enumerate() {
            let y = first_row + row_offset;
            for (x, cell) in row.iter_mut().enumerate() {
                *cell = self.sample_cell(x, y, width, height, params);
            }
        }
    }
}

impl Default for NoiseFieldGenerator {
    fn default() -> Self {
        Self::new(0)
    }
}
