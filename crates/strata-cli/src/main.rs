//! Strata command-line generator.
//!
//! Loads `config.ron` (created with defaults on first run), applies CLI
//! overrides, regenerates the terrain and writes grids and previews.
//! Run with `cargo run -p strata-cli -- --width 512 --seed 7 --policy hard`.

mod output;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use strata_config::{CliArgs, Config, default_config_dir};
use strata_terrain::{PlacedVegetation, TerrainError, TerrainGenerator, VegetationPlacer};
use tracing::{error, info, warn};

use crate::output::{OutputError, write_outputs};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    // Resolve config directory
    let config_dir = match args.config.clone() {
        Some(dir) => dir,
        None => default_config_dir().unwrap_or_else(|e| {
            eprintln!("{e}, using the working directory");
            PathBuf::from(".")
        }),
    };

    // Load or create config, then apply CLI overrides
    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    strata_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    match run(&config) {
        Ok(files) => {
            info!(
                files = files.len(),
                dir = %config.output.directory.display(),
                "generation complete"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Regenerate the terrain described by `config` and write its outputs.
fn run(config: &Config) -> Result<Vec<PathBuf>, OutputError> {
    let start = Instant::now();
    let terrain = TerrainGenerator::with_available_parallelism().regenerate(&config.terrain)?;

    let vegetation = if config.output.write_vegetation {
        place_vegetation(config, &terrain)?
    } else {
        None
    };

    let files = write_outputs(
        &terrain,
        &config.terrain,
        vegetation.as_deref(),
        &config.output,
    )?;
    info!(elapsed_ms = start.elapsed().as_millis() as u64, "run finished");
    Ok(files)
}

/// Empty candidate sets are reported and skipped; other errors abort.
fn place_vegetation(
    config: &Config,
    terrain: &strata_terrain::GeneratedTerrain,
) -> Result<Option<Vec<PlacedVegetation>>, OutputError> {
    match VegetationPlacer::new(config.vegetation.clone()).place(terrain) {
        Ok(placed) => Ok(Some(placed)),
        Err(TerrainError::NoCandidateCells(layers)) => {
            warn!(?layers, "no cells accept vegetation, skipping placement");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_terrain::{LayerKind, TerrainDimensions};

    fn config_in(dir: &std::path::Path) -> Config {
        let mut config = Config::default();
        config.terrain.dimensions = TerrainDimensions {
            width: 32,
            height: 32,
            depth: 250.0,
        };
        config.output.directory = dir.to_path_buf();
        config.output.write_previews = false;
        config
    }

    #[test]
    fn test_run_writes_grids() {
        let temp = tempfile::tempdir().unwrap();
        let config = config_in(temp.path());
        let files = run(&config).unwrap();
        assert!(files.contains(&temp.path().join("heightmap.json")));
        assert!(temp.path().join("splat.json").exists());
    }

    #[test]
    fn test_invalid_terrain_fails() {
        let temp = tempfile::tempdir().unwrap();
        let mut config = config_in(temp.path());
        config.terrain.dimensions.width = 0;
        assert!(matches!(
            run(&config),
            Err(OutputError::Terrain(TerrainError::InvalidDimensions { .. }))
        ));
    }

    #[test]
    fn test_missing_candidates_skip_vegetation() {
        let temp = tempfile::tempdir().unwrap();
        let mut config = config_in(temp.path());
        config.vegetation.allowed_layers = LayerKind::ALL.to_vec();
        config.vegetation.min_world_height = Some(f64::INFINITY);
        let files = run(&config).unwrap();
        assert!(!files.contains(&temp.path().join("vegetation.json")));
        assert!(temp.path().join("heightmap.json").exists());
    }
}
