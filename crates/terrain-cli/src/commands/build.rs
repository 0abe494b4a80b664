//! terrain build command - convert a raster into an STL surface.

use std::path::Path;

use anyhow::{Context, Result};
use terrain_mesh::{StlFormat, TerrainConfig, convert_raster};

use super::load_config;
use crate::{Cli, OutputFormat, output};

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
    pub height_scale: Option<f64>,
    pub max_size: Option<u32>,
    pub full_resolution: bool,
    pub ascii: bool,
    pub parallel: bool,
}

impl Overrides {
    /// Apply flags on top of file values.
    pub fn apply(&self, mut config: TerrainConfig) -> TerrainConfig {
        if let Some(scale) = self.height_scale {
            config.height_scale = scale;
        }
        if let Some(side) = self.max_size {
            config.max_size = [side, side];
            config.shrink = true;
        }
        if self.full_resolution {
            config.shrink = false;
        }
        if self.ascii {
            config.stl_format = StlFormat::Ascii;
        }
        if self.parallel {
            config.parallel = true;
        }
        config
    }
}

pub fn run(input: &Path, output_path: &Path, overrides: Overrides, cli: &Cli) -> Result<()> {
    let config = overrides.apply(load_config(cli)?);

    let report = convert_raster(input, &config, output_path)
        .with_context(|| format!("Failed to convert {:?} into {:?}", input, output_path))?;

    match cli.format {
        OutputFormat::Json => output::print(&report, cli.format, cli.quiet),
        OutputFormat::Text => {
            if !cli.quiet {
                output::success(
                    &format!("Wrote {}", output_path.display()),
                    cli.format,
                    cli.quiet,
                );
                output::field("Grid", format!("{} x {} points", report.cols, report.rows));
                output::field("Triangles", report.triangle_count);
                output::field(
                    "Height",
                    format!("{:.3} to {:.3}", report.z_min, report.z_max),
                );
                output::field("Format", format!("{:?} STL", report.stl_format));
            }
        }
    }

    Ok(())
}
