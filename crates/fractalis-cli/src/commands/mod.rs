pub mod config;
pub mod render;
pub mod run;

use std::path::Path;

use anyhow::{Context, Result};
use fractalis_core::config::ExplorerConfig;

/// The config at `path`, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<ExplorerConfig> {
    match path {
        Some(path) => ExplorerConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(ExplorerConfig::default()),
    }
}
