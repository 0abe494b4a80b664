//! terrain: turn elevation rasters of Norway into printable STL meshes.
//!
//! # Logging
//!
//! Set the `RUST_LOG` environment variable to control log output:
//! - `RUST_LOG=terrain_mesh=info` - Basic operation logging
//! - `RUST_LOG=terrain_mesh=debug` - Dimensions and counts per stage
//! - `RUST_LOG=terrain_mesh::timing=info` - Performance timing
//!
//! # Example
//!
//! ```bash
//! # Print the raster request for Gaustatoppen
//! terrain region --lat 59.853952 --lon 8.648471
//!
//! # Convert the downloaded raster
//! terrain build gaustatoppen.png -o surface.stl --height-scale 10
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod commands;
mod output;

use commands::{build, info, region};

/// terrain - Printable 3D terrain from greyscale elevation rasters.
#[derive(Parser)]
#[command(name = "terrain")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format for results
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Suppress all non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Increase output verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for scripting
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a greyscale raster into an STL surface
    Build {
        /// Input raster (PNG or JPEG)
        input: PathBuf,

        /// Output STL path
        #[arg(short, long)]
        output: PathBuf,

        /// Height of the brightest pixel in mesh units
        #[arg(long)]
        height_scale: Option<f64>,

        /// Shrink rasters so neither side exceeds this many pixels
        #[arg(long, conflicts_with = "full_resolution")]
        max_size: Option<u32>,

        /// Triangulate the raster at its original size
        #[arg(long)]
        full_resolution: bool,

        /// Write ASCII STL instead of binary
        #[arg(long)]
        ascii: bool,

        /// Triangulate rows in parallel
        #[arg(long)]
        parallel: bool,
    },

    /// Validate a center coordinate and print the raster request for it
    Region {
        /// Latitude (57 to 71)
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        /// Longitude (2 to 32.88)
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,

        /// Side of the printed square in kilometres
        #[arg(long)]
        side_km: Option<f64>,
    },

    /// Display STL statistics
    Info {
        /// Input STL file
        input: PathBuf,
    },
}

/// Initialize the tracing subscriber based on verbosity level.
fn init_tracing(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    // RUST_LOG wins over -v flags
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match verbose {
            0 => "warn",
            1 => "terrain_mesh=info",
            2 => "terrain_mesh=debug",
            _ => "trace",
        };
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    #[cfg(debug_assertions)]
    miette::set_panic_hook();

    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Commands::Build {
            input,
            output,
            height_scale,
            max_size,
            full_resolution,
            ascii,
            parallel,
        } => build::run(
            input,
            output,
            build::Overrides {
                height_scale: *height_scale,
                max_size: *max_size,
                full_resolution: *full_resolution,
                ascii: *ascii,
                parallel: *parallel,
            },
            &cli,
        ),
        Commands::Region { lat, lon, side_km } => region::run(*lat, *lon, *side_km, &cli),
        Commands::Info { input } => info::run(input, &cli),
    };

    if let Err(e) = &result {
        if !cli.quiet {
            eprintln!("{}: {}", "Error".red().bold(), e);
            for cause in e.chain().skip(1) {
                eprintln!("  {}: {}", "Caused by".yellow(), cause);
            }
            if let Some(terrain_err) = e.downcast_ref::<terrain_mesh::TerrainError>() {
                eprintln!("  {}: {}", "Code".cyan(), terrain_err.code());
                eprintln!(
                    "  {}: {}",
                    "Suggestion".green(),
                    terrain_err.recovery_suggestion()
                );
            }
        }
        std::process::exit(1);
    }

    Ok(())
}
