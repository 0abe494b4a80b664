//! Subcommand implementations.

pub mod build;
pub mod info;
pub mod region;

use anyhow::{Context, Result};
use terrain_mesh::TerrainConfig;

use crate::Cli;

/// Load `--config` if given, otherwise the defaults.
pub fn load_config(cli: &Cli) -> Result<TerrainConfig> {
    match &cli.config {
        Some(path) => TerrainConfig::from_toml_file(path)
            .with_context(|| format!("Failed to load config from {:?}", path)),
        None => Ok(TerrainConfig::default()),
    }
}
