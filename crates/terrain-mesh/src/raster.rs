//! Loading elevation rasters into intensity grids.
//!
//! The elevation service returns a shaded PNG; any colour input is reduced to
//! 8-bit luma and, when larger than the configured maximum, shrunk to fit while
//! keeping its aspect ratio. Rasters already inside the bounds are never
//! enlarged.

use std::path::Path;

use image::{DynamicImage, GrayImage};
use tracing::{debug, info};

use crate::error::{TerrainError, TerrainResult};
use crate::types::ImageGrid;

/// Default bound on raster dimensions before triangulation.
pub const DEFAULT_MAX_SIZE: (u32, u32) = (500, 500);

/// Decode a raster file into a greyscale grid.
///
/// `max_size` bounds `(width, height)`; `None` keeps the full resolution.
pub fn load_grid(path: &Path, max_size: Option<(u32, u32)>) -> TerrainResult<ImageGrid> {
    info!("Loading raster from {:?}", path);
    let bytes = std::fs::read(path).map_err(|e| TerrainError::io_read(path, e))?;
    let image = image::load_from_memory(&bytes)
        .map_err(|e| TerrainError::image_decode(path.display().to_string(), e.to_string()))?;
    grid_from_image(&image, max_size)
}

/// Decode an in-memory raster (PNG or JPEG) into a greyscale grid.
pub fn grid_from_bytes(bytes: &[u8], max_size: Option<(u32, u32)>) -> TerrainResult<ImageGrid> {
    let image = image::load_from_memory(bytes)
        .map_err(|e| TerrainError::image_decode("<memory>", e.to_string()))?;
    grid_from_image(&image, max_size)
}

/// Convert a decoded image to luma, shrink it to fit `max_size`, and wrap the
/// pixels in a grid anchored at the brightest pixel.
pub fn grid_from_image(
    image: &DynamicImage,
    max_size: Option<(u32, u32)>,
) -> TerrainResult<ImageGrid> {
    let mut grey = image.to_luma8();

    if let Some((max_w, max_h)) = max_size {
        if max_w == 0 || max_h == 0 {
            return Err(TerrainError::invalid_input(format!(
                "max raster size must be positive, got {}x{}",
                max_w, max_h
            )));
        }
        if grey.width() > max_w || grey.height() > max_h {
            let (w, h) = grey.dimensions();
            grey = match DynamicImage::ImageLuma8(grey).thumbnail(max_w, max_h) {
                DynamicImage::ImageLuma8(shrunk) => shrunk,
                other => other.to_luma8(),
            };
            debug!(
                "Shrunk raster from {}x{} to {}x{}",
                w,
                h,
                grey.width(),
                grey.height()
            );
        }
    }

    grid_from_luma(&grey)
}

/// Wrap 8-bit luma pixels in a grid anchored at the observed maximum.
pub fn grid_from_luma(image: &GrayImage) -> TerrainResult<ImageGrid> {
    let samples = image.pixels().map(|p| f64::from(p.0[0])).collect();
    let grid = ImageGrid::new(image.width() as usize, image.height() as usize, samples)?;
    debug!(
        width = grid.width(),
        height = grid.height(),
        min_intensity = grid.min_intensity(),
        max_intensity = grid.max_intensity(),
        "Raster converted to grid"
    );
    Ok(grid)
}
