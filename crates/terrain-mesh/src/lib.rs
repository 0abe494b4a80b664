//! Printable terrain meshes from greyscale elevation rasters.
//!
//! This crate turns a 2D grid of intensity samples into a triangulated
//! surface and writes it as STL, ready for a slicer. Pixel brightness is read
//! as relative height: the brightest pixel of a raster maps onto
//! `height_scale`, black maps onto zero.
//!
//! # Features
//!
//! - **Height fields**: Linear intensity → height mapping with one point per pixel
//! - **Triangulation**: Two triangles per grid cell with a fixed diagonal split
//! - **STL I/O**: Atomic binary or ASCII output, binary/ASCII input for round-trips
//! - **Rasters**: PNG/JPEG decoding, greyscale conversion, shrink-to-fit
//! - **Regions**: Coordinate validation for Norway, bounding boxes, WMS request URLs
//!
//! # Coordinate System
//!
//! Grid spacing is one unit per pixel:
//! - X: column index (west → east)
//! - Y: row index (north → south in the raster)
//! - Z: scaled intensity
//!
//! No geographic unit conversion is applied; heights are relative to the
//! raster's own contrast, not true elevations.
//!
//! # Quick Start
//!
//! ```
//! use terrain_mesh::{HeightField, ImageGrid, triangulate};
//!
//! let grid = ImageGrid::from_rows(&[[0.0, 100.0], [50.0, 100.0]]).unwrap();
//! let field = HeightField::build(&grid, 10.0).unwrap();
//! let mesh = triangulate(&field);
//! assert_eq!(mesh.triangle_count(), 2);
//! ```
//!
//! Writing to disk:
//!
//! ```no_run
//! use std::path::Path;
//! use terrain_mesh::{HeightField, StlFormat, load_grid, save_stl_with_format, triangulate};
//!
//! let grid = load_grid(Path::new("raster.png"), Some((500, 500))).unwrap();
//! let mesh = triangulate(&HeightField::build(&grid, 10.0).unwrap());
//! save_stl_with_format(&mesh, Path::new("surface.stl"), StlFormat::Binary).unwrap();
//! ```
//!
//! # Error Handling
//!
//! Fallible operations return `TerrainResult<T>`, which is
//! `Result<T, TerrainError>`.
//!
//! ```
//! use terrain_mesh::{HeightField, ImageGrid, TerrainError};
//!
//! let dark = ImageGrid::new(2, 2, vec![0.0; 4]).unwrap();
//! match HeightField::build(&dark, 10.0) {
//!     Err(TerrainError::InvalidInput { details }) => println!("rejected: {}", details),
//!     other => panic!("unexpected: {:?}", other),
//! }
//! ```

mod error;
mod types;

pub mod config;
pub mod heightfield;
pub mod io;
pub mod pipeline;
pub mod raster;
pub mod region;
pub mod tracing_ext;
pub mod triangulate;

pub use error::{ErrorCode, RecoverySuggestion, TerrainError, TerrainResult};
pub use types::{ImageGrid, TerrainMesh, Triangle};

pub use config::{RegionSettings, TerrainConfig};
pub use heightfield::HeightField;
pub use io::{StlFormat, load_stl, save_stl, save_stl_with_format};
pub use pipeline::{ConversionReport, convert_grid, convert_raster, grid_to_mesh};
pub use raster::{DEFAULT_MAX_SIZE, grid_from_bytes, grid_from_image, grid_from_luma, load_grid};
pub use region::{BoundingBox, Coordinate, WmsRequest, WmsSettings};
pub use triangulate::{expected_triangle_count, triangulate, triangulate_par};

impl TerrainMesh {
    /// Save as binary STL.
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> TerrainResult<()> {
        save_stl(self, path.as_ref())
    }

    /// Load an STL file.
    pub fn load(path: impl AsRef<std::path::Path>) -> TerrainResult<Self> {
        load_stl(path.as_ref())
    }
}
