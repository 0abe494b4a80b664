//! terrain region command - validate a center and print the raster request.

use anyhow::{Context, Result};
use serde::Serialize;
use terrain_mesh::{BoundingBox, Coordinate, WmsRequest};

use super::load_config;
use crate::{Cli, OutputFormat, output};

#[derive(Serialize)]
struct RegionResult {
    lat: f64,
    lon: f64,
    side_km: f64,
    bbox: BoundingBox,
    url: String,
}

pub fn run(lat: f64, lon: f64, side_km: Option<f64>, cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let side_km = side_km.unwrap_or(config.region.side_km);

    let center = Coordinate::new(lat, lon).context("Center coordinate rejected")?;
    let bbox = BoundingBox::around(center, side_km)?;
    let url = WmsRequest::new(config.wms.clone(), bbox).url();

    let result = RegionResult {
        lat: center.lat(),
        lon: center.lon(),
        side_km,
        bbox,
        url,
    };

    match cli.format {
        OutputFormat::Json => output::print(&result, cli.format, cli.quiet),
        OutputFormat::Text => {
            if !cli.quiet {
                output::success(
                    &format!("Region around {}, {}", result.lat, result.lon),
                    cli.format,
                    cli.quiet,
                );
                output::field(
                    "Latitude",
                    format!("{:.6} to {:.6}", bbox.min_lat, bbox.max_lat),
                );
                output::field(
                    "Longitude",
                    format!("{:.6} to {:.6}", bbox.min_lon, bbox.max_lon),
                );
                output::field("Request", &result.url);
            }
        }
    }

    Ok(())
}
