//! End-to-end conversion: grid → height field → triangles → STL.
//!
//! ```no_run
//! use std::path::Path;
//! use terrain_mesh::{TerrainConfig, convert_raster};
//!
//! let report = convert_raster(
//!     Path::new("gaustatoppen.png"),
//!     &TerrainConfig::default(),
//!     Path::new("surface.stl"),
//! )
//! .unwrap();
//! println!("{} triangles", report.triangle_count);
//! ```

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use crate::config::TerrainConfig;
use crate::error::TerrainResult;
use crate::heightfield::HeightField;
use crate::io::{StlFormat, save_stl_with_format};
use crate::raster::load_grid;
use crate::tracing_ext::{OperationTimer, log_height_field_stats, log_mesh_stats};
use crate::triangulate::{triangulate, triangulate_par};
use crate::types::{ImageGrid, TerrainMesh};

/// Summary of one conversion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionReport {
    /// Grid rows (raster height after shrinking).
    pub rows: usize,
    /// Grid columns (raster width after shrinking).
    pub cols: usize,
    pub triangle_count: usize,
    pub z_min: f64,
    pub z_max: f64,
    pub stl_format: StlFormat,
    pub output: PathBuf,
}

/// Build the height field and triangulate it, without writing anything.
pub fn grid_to_mesh(
    grid: &ImageGrid,
    config: &TerrainConfig,
) -> TerrainResult<(HeightField, TerrainMesh)> {
    let field = HeightField::build(grid, config.height_scale)?;
    log_height_field_stats(&field, "after build");

    let mesh = if config.parallel {
        triangulate_par(&field)
    } else {
        triangulate(&field)
    };
    log_mesh_stats(&mesh, "after triangulate");

    Ok((field, mesh))
}

/// Convert an in-memory grid and write the STL to `output`.
///
/// Nothing is written if any stage fails.
pub fn convert_grid(
    grid: &ImageGrid,
    config: &TerrainConfig,
    output: &Path,
) -> TerrainResult<ConversionReport> {
    let _timer = OperationTimer::with_context("convert_grid", grid.height(), grid.width());

    let (field, mesh) = grid_to_mesh(grid, config)?;
    if field.rows() < 2 || field.cols() < 2 {
        warn!(
            "{}x{} grid has no complete cell to triangulate",
            field.cols(),
            field.rows()
        );
    }
    save_stl_with_format(&mesh, output, config.stl_format)?;

    let (z_min, z_max) = field.z_range();
    let report = ConversionReport {
        rows: field.rows(),
        cols: field.cols(),
        triangle_count: mesh.triangle_count(),
        z_min,
        z_max,
        stl_format: config.stl_format,
        output: output.to_path_buf(),
    };
    info!(
        "Converted {}x{} grid into {} triangles",
        report.cols, report.rows, report.triangle_count
    );
    Ok(report)
}

/// Load a raster from disk, convert it and write the STL to `output`.
pub fn convert_raster(
    input: &Path,
    config: &TerrainConfig,
    output: &Path,
) -> TerrainResult<ConversionReport> {
    config.validate()?;
    let grid = load_grid(input, config.raster_bound())?;
    convert_grid(&grid, config, output)
}
