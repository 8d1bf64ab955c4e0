//! Debug visualization: RGBA images of noise fields, elevation, labels and splat weights.
//!
//! These are diagnostics for inspecting a regeneration (written to PNG by the
//! CLI), the equivalent of an editor's noise-preview textures.

mod image;
mod renderers;

pub use self::image::DebugImage;
pub use renderers::{
    height_to_color, layer_color, render_elevation_debug, render_label_map, render_noise_field,
    render_splat_debug,
};
