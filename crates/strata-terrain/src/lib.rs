//! Layered noise terrain synthesis: Perlin noise fields, water/ground/mountain
//! blending, heightmap and splat export, and vegetation placement.

mod blend;
mod error;
mod export;
mod generator;
mod grid;
mod layer;
mod noise_field;
mod vegetation;

pub mod debug_viz;

pub use blend::{BlendOutput, CellBlend, LayerFields, blend, blend_cell, remap, smoothstep};
pub use error::TerrainError;
pub use export::{
    HeightBands, SplatGrid, TerrainLayerDesc, from_heightmap, labels_from_height_bands,
    splat_from_weights, terrain_layers, to_heightmap, to_splat_weights,
};
pub use generator::{GeneratedTerrain, TerrainGenerator, regenerate};
pub use grid::{ElevationGrid, Grid, LayerLabelGrid, NoiseField};
pub use layer::{BlendPolicy, LayerKind, LayerSpec, TerrainConfig, TerrainDimensions};
pub use noise_field::{NoiseFieldGenerator, NoiseParams};
pub use vegetation::{PlacedVegetation, VegetationConfig, VegetationKindDef, VegetationPlacer};
