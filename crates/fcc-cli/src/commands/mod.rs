//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod fetch;
pub mod output;
pub mod process;
pub mod serve;

use std::path::Path;

use fcc_core::{FccConfig, FccError};
use tracing::debug;

/// Load the configuration from `path`, or the defaults when no path is given.
pub fn load_config(path: Option<&str>) -> anyhow::Result<FccConfig> {
    match path {
        Some(path) => {
            debug!("Loading configuration from {}", path);
            FccConfig::from_file(Path::new(path)).map_err(|e| match e {
                FccError::Config(reason) => anyhow::anyhow!("Invalid config {}", reason),
                other => anyhow::anyhow!("Failed to load config {}: {}", path, other),
            })
        }
        None => Ok(FccConfig::default()),
    }
}
