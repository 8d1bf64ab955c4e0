//! Command-line argument parsing for Strata.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use strata_terrain::BlendPolicy;

use crate::Config;

/// Blend policy as accepted on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    /// Each cell takes the height of its strongest layer.
    Hard,
    /// Smoothstep transitions with additive land heights.
    Smooth,
}

impl From<PolicyArg> for BlendPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Hard => BlendPolicy::HardClassify,
            PolicyArg::Smooth => BlendPolicy::SmoothBlend,
        }
    }
}

/// Strata command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "strata", about = "Layered Perlin-noise terrain generator")]
pub struct CliArgs {
    /// Grid width in cells.
    #[arg(long)]
    pub width: Option<usize>,

    /// Grid height in cells.
    #[arg(long)]
    pub height: Option<usize>,

    /// World depth used to normalize heights.
    #[arg(long)]
    pub depth: Option<f64>,

    /// Noise seed.
    #[arg(long)]
    pub seed: Option<u32>,

    /// Layer blend policy.
    #[arg(long, value_enum)]
    pub policy: Option<PolicyArg>,

    /// Vegetation placement seed.
    #[arg(long)]
    pub vegetation_seed: Option<u64>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Output directory for generated files.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Write PNG previews.
    #[arg(long)]
    pub previews: Option<bool>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.terrain.dimensions.width = w;
        }
        if let Some(h) = args.height {
            self.terrain.dimensions.height = h;
        }
        if let Some(d) = args.depth {
            self.terrain.dimensions.depth = d;
        }
        if let Some(seed) = args.seed {
            self.terrain.seed = seed;
        }
        if let Some(policy) = args.policy {
            self.terrain.policy = policy.into();
        }
        if let Some(seed) = args.vegetation_seed {
            self.vegetation.seed = seed;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        if let Some(ref dir) = args.output {
            self.output.directory = dir.clone();
        }
        if let Some(previews) = args.previews {
            self.output.write_previews = previews;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            width: Some(512),
            seed: Some(42),
            policy: Some(PolicyArg::Hard),
            output: Some(PathBuf::from("maps")),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.terrain.dimensions.width, 512);
        assert_eq!(config.terrain.seed, 42);
        assert_eq!(config.terrain.policy, BlendPolicy::HardClassify);
        assert_eq!(config.output.directory, PathBuf::from("maps"));
        // Non-overridden fields retain defaults
        assert_eq!(config.terrain.dimensions.height, 256);
        assert_eq!(config.terrain.dimensions.depth, 250.0);
        assert!(config.output.write_previews);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_parse_flags() {
        let args = CliArgs::try_parse_from([
            "strata",
            "--width",
            "64",
            "--depth",
            "120.5",
            "--policy",
            "smooth",
            "--previews",
            "false",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(args.width, Some(64));
        assert_eq!(args.depth, Some(120.5));
        assert_eq!(args.policy, Some(PolicyArg::Smooth));
        assert_eq!(args.previews, Some(false));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert_eq!(args.height, None);
    }

    #[test]
    fn test_unknown_policy_rejected() {
        assert!(CliArgs::try_parse_from(["strata", "--policy", "fuzzy"]).is_err());
    }

    #[test]
    fn test_policy_arg_maps_to_blend_policy() {
        assert_eq!(BlendPolicy::from(PolicyArg::Hard), BlendPolicy::HardClassify);
        assert_eq!(BlendPolicy::from(PolicyArg::Smooth), BlendPolicy::SmoothBlend);
    }
}
