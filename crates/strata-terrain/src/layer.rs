//! Terrain layer definitions and the regeneration configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TerrainError;

/// The three terrain layers, in splat-channel order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum LayerKind {
    Water = 0,
    Ground = 1,
    Mountain = 2,
}

impl LayerKind {
    /// All layers in channel order.
    pub const ALL: [LayerKind; 3] = [LayerKind::Water, LayerKind::Ground, LayerKind::Mountain];

    /// Number of layers.
    pub const COUNT: usize = 3;

    /// Integer label code (`0` water, `1` ground, `2` mountain).
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Inverse of [`LayerKind::code`].
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(LayerKind::Water),
            1 => Some(LayerKind::Ground),
            2 => Some(LayerKind::Mountain),
            _ => None,
        }
    }

    /// Splat channel index.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            LayerKind::Water => "water",
            LayerKind::Ground => "ground",
            LayerKind::Mountain => "mountain",
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn default_frequency() -> f64 {
    1.0
}

/// Noise sampling and height-range settings for one terrain layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    /// Span of noise-space covered by the whole grid. `0` yields a constant field.
    pub scale: f64,
    /// Noise-space offset along the grid's x axis.
    pub offset_x: f64,
    /// Noise-space offset along the grid's y axis.
    pub offset_y: f64,
    /// Multiplier applied to the offset coordinate before sampling.
    #[serde(default = "default_frequency")]
    pub frequency: f64,
    /// Multiplier applied to the noise sample before blending.
    pub weight: f64,
    /// World height the layer maps a weighted sample of `0` to.
    pub min_height: f64,
    /// World height the layer maps a weighted sample of `1` to.
    pub max_height: f64,
    /// Texture asset the host paints this layer with.
    #[serde(default)]
    pub texture: Option<String>,
}

impl LayerSpec {
    pub fn water() -> Self {
        Self {
            scale: 10.0,
            offset_x: 0.0,
            offset_y: 0.0,
            frequency: 1.0,
            weight: 0.5,
            min_height: 0.0,
            max_height: 3.0,
            texture: None,
        }
    }

    pub fn ground() -> Self {
        Self {
            min_height: 3.0,
            max_height: 15.0,
            ..Self::water()
        }
    }

    pub fn mountain() -> Self {
        Self {
            min_height: 15.0,
            max_height: 250.0,
            ..Self::water()
        }
    }

    /// Linearly remap a weighted sample from `[0, 1]` into this layer's height range.
    pub fn remap(&self, value: f64) -> f64 {
        crate::blend::remap(value, 0.0, 1.0, self.min_height, self.max_height)
    }

    fn validate(&self, layer: LayerKind) -> Result<(), TerrainError> {
        let fields = [
            ("scale", self.scale),
            ("offset_x", self.offset_x),
            ("offset_y", self.offset_y),
            ("frequency", self.frequency),
            ("weight", self.weight),
            ("min_height", self.min_height),
            ("max_height", self.max_height),
        ];
        if let Some(&(field, value)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(TerrainError::NonFinite {
                layer,
                field,
                value,
            });
        }
        if self.weight < 0.0 {
            return Err(TerrainError::NegativeWeight {
                layer,
                weight: self.weight,
            });
        }
        if self.min_height > self.max_height {
            return Err(TerrainError::InvertedRange {
                layer,
                min: self.min_height,
                max: self.max_height,
            });
        }
        Ok(())
    }

    /// Largest absolute world height a weighted sample in `[0, weight]` maps to.
    /// Infinite when the range or its remap overflows.
    fn height_extent(&self) -> f64 {
        let span = self.max_height - self.min_height;
        if !span.is_finite() {
            return f64::INFINITY;
        }
        self.min_height
            .abs()
            .max(self.max_height.abs())
            .max(self.remap(self.weight.max(1.0)).abs())
    }
}

/// Grid resolution plus the vertical scale converting normalized to world height.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainDimensions {
    pub width: usize,
    pub height: usize,
    /// World height represented by a normalized elevation of `1.0`.
    pub depth: f64,
}

impl TerrainDimensions {
    /// Number of cells, checked so that every per-cell grid of the pipeline
    /// (the widest holds one `f64` per layer) stays within allocation limits.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::GridTooLarge`] when it does not.
    pub fn cell_count(&self) -> Result<usize, TerrainError> {
        checked_cell_count(self.width, self.height)
    }
}

pub(crate) fn checked_cell_count(width: usize, height: usize) -> Result<usize, TerrainError> {
    let widest_cell = std::mem::size_of::<[f64; LayerKind::COUNT]>();
    width
        .checked_mul(height)
        .filter(|&cells| {
            cells
                .checked_mul(widest_cell)
                .is_some_and(|bytes| bytes <= isize::MAX as usize)
        })
        .ok_or(TerrainError::GridTooLarge { width, height })
}

impl Default for TerrainDimensions {
    fn default() -> Self {
        Self {
            width: 256,
            height: 256,
            depth: 250.0,
        }
    }
}

/// How weighted layer samples combine into a height and a dominant label.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlendPolicy {
    /// Greatest weighted sample wins outright. Ties go mountain, then ground, then water.
    HardClassify,
    /// Smooth-stepped ground and mountain shares are normalized and summed;
    /// water takes over only where it beats both shares.
    #[default]
    SmoothBlend,
}

/// Everything a regeneration depends on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    pub dimensions: TerrainDimensions,
    /// Perlin permutation seed shared by all layers.
    pub seed: u32,
    pub water: LayerSpec,
    pub ground: LayerSpec,
    pub mountain: LayerSpec,
    pub policy: BlendPolicy,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            dimensions: TerrainDimensions::default(),
            seed: 0,
            water: LayerSpec::water(),
            ground: LayerSpec::ground(),
            mountain: LayerSpec::mountain(),
            policy: BlendPolicy::default(),
        }
    }
}

impl TerrainConfig {
    pub fn layer(&self, kind: LayerKind) -> &LayerSpec {
        match kind {
            LayerKind::Water => &self.water,
            LayerKind::Ground => &self.ground,
            LayerKind::Mountain => &self.mountain,
        }
    }

    /// Check the configuration before any grid is allocated.
    ///
    /// # Errors
    ///
    /// Returns the first problem found: zero-sized or oversized grids, a depth
    /// that is not a normal positive number, non-finite layer parameters,
    /// negative weights, inverted or overflowing height ranges, or a water band
    /// reaching above the ground minimum.
    pub fn validate(&self) -> Result<(), TerrainError> {
        let dims = &self.dimensions;
        if dims.width == 0 || dims.height == 0 {
            return Err(TerrainError::InvalidDimensions {
                width: dims.width,
                height: dims.height,
            });
        }
        dims.cell_count()?;
        if !dims.depth.is_finite() || dims.depth < f64::MIN_POSITIVE {
            return Err(TerrainError::InvalidDepth(dims.depth));
        }
        for kind in LayerKind::ALL {
            let layer = self.layer(kind);
            layer.validate(kind)?;
            let extent = layer.height_extent();
            if !extent.is_finite() || !(extent / dims.depth).is_finite() {
                return Err(TerrainError::HeightOverflow {
                    layer: kind,
                    min: layer.min_height,
                    max: layer.max_height,
                    depth: dims.depth,
                });
            }
        }
        if self.water.max_height > self.ground.min_height {
            return Err(TerrainError::WaterAboveGround {
                water_max: self.water.max_height,
                ground_min: self.ground.min_height,
            });
        }
        Ok(())
    }

    /// Layers whose maximum height exceeds the terrain depth, i.e. whose
    /// normalized elevation can rise above `1.0`.
    pub fn layers_exceeding_depth(&self) -> Vec<LayerKind> {
        LayerKind::ALL
            .into_iter()
            .filter(|&kind| self.layer(kind).max_height > self.dimensions.depth)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = TerrainConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.layers_exceeding_depth().is_empty());
    }

    #[test]
    fn test_layer_codes_roundtrip() {
        for kind in LayerKind::ALL {
            assert_eq!(LayerKind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(LayerKind::from_code(3), None);
        assert_eq!(LayerKind::Mountain.to_string(), "mountain");
    }

    #[test]
    fn test_zero_width_rejected() {
        let mut config = TerrainConfig::default();
        config.dimensions.width = 0;
        assert_eq!(
            config.validate(),
            Err(TerrainError::InvalidDimensions {
                width: 0,
                height: 256
            })
        );
    }

    #[test]
    fn test_non_positive_depth_rejected() {
        let mut config = TerrainConfig::default();
        config.dimensions.depth = 0.0;
        assert_eq!(config.validate(), Err(TerrainError::InvalidDepth(0.0)));

        config.dimensions.depth = f64::NAN;
        assert!(matches!(
            config.validate(),
            Err(TerrainError::InvalidDepth(_))
        ));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let mut config = TerrainConfig::default();
        config.mountain.min_height = 300.0;
        assert_eq!(
            config.validate(),
            Err(TerrainError::InvertedRange {
                layer: LayerKind::Mountain,
                min: 300.0,
                max: 250.0
            })
        );
    }

    #[test]
    fn test_non_finite_parameter_rejected() {
        let mut config = TerrainConfig::default();
        config.ground.offset_y = f64::INFINITY;
        assert!(matches!(
            config.validate(),
            Err(TerrainError::NonFinite {
                layer: LayerKind::Ground,
                field: "offset_y",
                ..
            })
        ));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let mut config = TerrainConfig::default();
        config.water.weight = -0.1;
        assert!(matches!(
            config.validate(),
            Err(TerrainError::NegativeWeight {
                layer: LayerKind::Water,
                ..
            })
        ));
    }

    #[test]
    fn test_water_band_above_ground_rejected() {
        let mut config = TerrainConfig::default();
        config.water.max_height = 4.0;
        assert_eq!(
            config.validate(),
            Err(TerrainError::WaterAboveGround {
                water_max: 4.0,
                ground_min: 3.0
            })
        );
    }

    #[test]
    fn test_remap_hits_range_endpoints() {
        let ground = LayerSpec::ground();
        assert_eq!(ground.remap(0.0), 3.0);
        assert_eq!(ground.remap(1.0), 15.0);
        assert_eq!(ground.remap(0.5), 9.0);
    }

    #[test]
    fn test_layers_exceeding_depth() {
        let mut config = TerrainConfig::default();
        config.dimensions.depth = 100.0;
        assert_eq!(config.layers_exceeding_depth(), vec![LayerKind::Mountain]);
    }

    #[test]
    fn test_subnormal_depth_rejected() {
        let mut config = TerrainConfig::default();
        config.dimensions.depth = 1e-310;
        assert_eq!(config.validate(), Err(TerrainError::InvalidDepth(1e-310)));
    }

    #[test]
    fn test_overflowing_height_span_rejected() {
        let mut config = TerrainConfig::default();
        config.dimensions.depth = 1.0;
        config.water.min_height = -1e308;
        config.mountain.max_height = 1e308;
        config.mountain.min_height = -1e308;
        assert_eq!(
            config.validate(),
            Err(TerrainError::HeightOverflow {
                layer: LayerKind::Mountain,
                min: -1e308,
                max: 1e308,
                depth: 1.0,
            })
        );
    }

    #[test]
    fn test_height_too_large_for_depth_rejected() {
        let mut config = TerrainConfig::default();
        config.dimensions.depth = 0.5;
        config.mountain.max_height = f64::MAX;
        assert!(matches!(
            config.validate(),
            Err(TerrainError::HeightOverflow {
                layer: LayerKind::Mountain,
                ..
            })
        ));
    }

    #[test]
    fn test_overflowing_cell_count_rejected() {
        let mut config = TerrainConfig::default();
        config.dimensions.width = usize::MAX / 2 + 1;
        config.dimensions.height = 2;
        assert_eq!(
            config.validate(),
            Err(TerrainError::GridTooLarge {
                width: usize::MAX / 2 + 1,
                height: 2
            })
        );
    }

    #[test]
    fn test_cell_count_of_default_grid() {
        assert_eq!(TerrainDimensions::default().cell_count(), Ok(256 * 256));
    }
}
