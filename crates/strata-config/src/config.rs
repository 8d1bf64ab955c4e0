//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strata_terrain::{TerrainConfig, VegetationConfig};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Grid size, depth, seed, layers and blend policy.
    pub terrain: TerrainConfig,
    /// Vegetation placement settings.
    pub vegetation: VegetationConfig,
    /// Where and what to write after a regeneration.
    pub output: OutputConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving generated files. Relative paths resolve against
    /// the working directory.
    pub directory: PathBuf,
    /// Write heightmap, label and splat grids as JSON.
    pub write_grids: bool,
    /// Write PNG previews of the noise fields, elevation, labels and splat map.
    pub write_previews: bool,
    /// Place vegetation and write the placements as JSON.
    pub write_vegetation: bool,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("output"),
            write_grids: true,
            write_previews: true,
            write_vegetation: true,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// The platform config directory for Strata (e.g. `~/.config/strata`).
pub fn default_config_dir() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join("strata"))
        .ok_or(ConfigError::NoConfigDir)
}

impl Config {
    /// Location of the config file inside `config_dir`.
    pub fn path_in(config_dir: &Path) -> PathBuf {
        config_dir.join(CONFIG_FILE)
    }

    /// Parse the config stored at `path`.
    pub fn read_from(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Pretty RON as written by [`Config::save`].
    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        Ok(ron::ser::to_string_pretty(self, pretty)?)
    }

    /// Read `config.ron` from `config_dir`, writing the defaults there first
    /// if it does not exist yet.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let path = Self::path_in(config_dir);
        if !path.exists() {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Wrote default config to {}", path.display());
            return Ok(config);
        }
        let config = Self::read_from(&path)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Write `config.ron` into `config_dir`, creating the directory as needed.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        let path = Self::path_in(config_dir);
        let write_err = |source| ConfigError::Write {
            path: path.clone(),
            source,
        };
        std::fs::create_dir_all(config_dir).map_err(write_err)?;
        std::fs::write(&path, self.to_ron_string()?).map_err(write_err)
    }

    /// Re-read `config.ron`. `Some` carries the new config when it differs
    /// from `self`; hosts use that as the signal to regenerate.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let current = Self::read_from(&Self::path_in(config_dir))?;
        if current == *self {
            return Ok(None);
        }
        log::info!("Config changed on disk");
        Ok(Some(current))
    }
}
