//! Writes generated grids as JSON and previews as PNG.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use strata_config::OutputConfig;
use strata_terrain::debug_viz::{
    DebugImage, render_elevation_debug, render_label_map, render_noise_field, render_splat_debug,
};
use strata_terrain::{
    GeneratedTerrain, LayerKind, PlacedVegetation, TerrainConfig, TerrainError, terrain_layers,
};
use thiserror::Error;
use tracing::debug;

/// Errors raised while generating or writing output files.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("terrain generation failed: {0}")]
    Terrain(#[from] TerrainError),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode JSON for {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode PNG for {path}: {source}")]
    Png {
        path: PathBuf,
        #[source]
        source: png::EncodingError,
    },
}

/// Serialize `value` as JSON into `path`.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), OutputError> {
    let io_err = |source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = BufWriter::new(File::create(path).map_err(io_err)?);
    serde_json::to_writer(&mut writer, value).map_err(|source| OutputError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(io_err)?;
    Ok(())
}

/// Encode an RGBA8 image as PNG bytes.
pub fn encode_png(image: &DebugImage) -> Result<Vec<u8>, png::EncodingError> {
    let (width, height) = image.dimensions();
    let mut buf = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&image.pixels)?;
        writer.finish()?;
    }
    Ok(buf)
}

/// Encode `image` and write it to `path`.
pub fn write_png(path: &Path, image: &DebugImage) -> Result<(), OutputError> {
    let bytes = encode_png(image).map_err(|source| OutputError::Png {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, bytes).map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Write everything enabled in `output` for one regeneration. Returns the
/// paths written, in order.
pub fn write_outputs(
    terrain: &GeneratedTerrain,
    config: &TerrainConfig,
    vegetation: Option<&[PlacedVegetation]>,
    output: &OutputConfig,
) -> Result<Vec<PathBuf>, OutputError> {
    let dir = output.directory.as_path();
    std::fs::create_dir_all(dir).map_err(|source| OutputError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut written = Vec::new();
    if output.write_grids {
        push_json(dir, &mut written, "heightmap.json", &terrain.heightmap)?;
        push_json(dir, &mut written, "labels.json", terrain.labels())?;
        push_json(dir, &mut written, "splat.json", &terrain.splat)?;
        push_json(dir, &mut written, "layers.json", &terrain_layers(config))?;
    }
    if let Some(placed) = vegetation {
        push_json(dir, &mut written, "vegetation.json", placed)?;
    }

    if output.write_previews {
        let mut previews = Vec::with_capacity(6);
        for kind in LayerKind::ALL {
            previews.push((
                format!("noise_{kind}.png"),
                render_noise_field(terrain.fields.get(kind)),
            ));
        }
        previews.push((
            "elevation.png".to_string(),
            render_elevation_debug(terrain.elevation(), config),
        ));
        previews.push(("labels.png".to_string(), render_label_map(terrain.labels())));
        previews.push(("splat.png".to_string(), render_splat_debug(&terrain.splat)));

        for (name, image) in previews {
            let path = dir.join(name);
            write_png(&path, &image)?;
            written.push(path);
        }
    }

    debug!(files = written.len(), dir = %dir.display(), "outputs written");
    Ok(written)
}

fn push_json<T: Serialize + ?Sized>(
    dir: &Path,
    written: &mut Vec<PathBuf>,
    name: &str,
    value: &T,
) -> Result<(), OutputError> {
    let path = dir.join(name);
    write_json(&path, value)?;
    written.push(path);
    Ok(())
}
