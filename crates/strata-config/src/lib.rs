//! Configuration for Strata.
//!
//! Terrain, vegetation, output and debug settings persisted to disk as RON.
//! Supports CLI overrides via clap, hot-reload detection, and forward/backward
//! compatible serialization.

mod cli;
mod config;
mod error;

pub use cli::{CliArgs, PolicyArg};
pub use config::{Config, DebugConfig, OutputConfig, default_config_dir};
pub use error::ConfigError;
