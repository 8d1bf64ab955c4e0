//! Terrain generation error types.

use crate::layer::LayerKind;

/// Errors reported synchronously by the generation pipeline.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TerrainError {
    /// Grid width or height is zero.
    #[error("terrain dimensions must be non-zero, got {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    /// The cell count of a grid does not fit in memory.
    #[error("terrain dimensions {width}x{height} are too large")]
    GridTooLarge { width: usize, height: usize },

    /// Depth is not a normal positive finite number.
    #[error("terrain depth must be positive, normal and finite, got {0}")]
    InvalidDepth(f64),

    /// A layer parameter is NaN or infinite.
    #[error("{layer} layer has non-finite {field}: {value}")]
    NonFinite {
        layer: LayerKind,
        field: &'static str,
        value: f64,
    },

    /// A layer weight is below zero.
    #[error("{layer} layer weight must be non-negative, got {weight}")]
    NegativeWeight { layer: LayerKind, weight: f64 },

    /// A layer's minimum height is above its maximum.
    #[error("{layer} layer height range is inverted: min {min} > max {max}")]
    InvertedRange { layer: LayerKind, min: f64, max: f64 },

    /// A layer can produce heights that overflow in world or normalized units.
    #[error("{layer} layer range [{min}, {max}] is not representable at depth {depth}")]
    HeightOverflow {
        layer: LayerKind,
        min: f64,
        max: f64,
        depth: f64,
    },

    /// The water band would rise above the lowest ground height.
    #[error("water band tops out at {water_max}, above the ground minimum {ground_min}")]
    WaterAboveGround { water_max: f64, ground_min: f64 },

    /// Input grids disagree on shape.
    #[error("grid is {found:?}, expected {expected:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    /// Splat export asked for fewer channels than there are layers.
    #[error("splat export needs at least {required} layers, got {requested}")]
    TooFewSplatLayers { requested: usize, required: usize },

    /// A vegetation scale range is non-finite, negative or inverted.
    #[error("vegetation kind {kind:?} has invalid scale range ({min}, {max})")]
    InvalidScaleRange { kind: String, min: f64, max: f64 },

    /// The vegetation height floor is NaN.
    #[error("vegetation min_world_height must be a number, got {0}")]
    InvalidMinWorldHeight(f64),

    /// No cell carries any label vegetation may be placed on.
    #[error("no cells carry any of the accepted labels {0:?}")]
    NoCandidateCells(Vec<LayerKind>),
}
