//! Error types for terrain conversion with rich diagnostics.
//!
//! Every error carries a machine-readable code in the format `TERRAIN-XXXX`:
//! - `TERRAIN-1xxx`: I/O errors (reading rasters, writing meshes, parsing)
//! - `TERRAIN-2xxx`: Input validation errors (grids, coordinates, empty meshes)
//! - `TERRAIN-3xxx`: Configuration errors
//!
//! # Example
//!
//! ```
//! use terrain_mesh::{ErrorCode, TerrainError};
//!
//! let err = TerrainError::invalid_input("max intensity must be positive, got 0");
//! assert_eq!(err.code(), ErrorCode::InvalidInput);
//! assert_eq!(err.code().as_str(), "TERRAIN-2001");
//! ```

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for terrain operations.
pub type TerrainResult<T> = Result<T, TerrainError>;

/// Machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // I/O errors (1xxx)
    /// TERRAIN-1001: Failed to read file
    IoRead = 1001,
    /// TERRAIN-1002: Failed to write file
    IoWrite = 1002,
    /// TERRAIN-1003: Failed to parse mesh file
    ParseError = 1003,
    /// TERRAIN-1004: Unsupported file extension
    UnsupportedFormat = 1004,
    /// TERRAIN-1005: Raster could not be decoded
    ImageDecode = 1005,

    // Input errors (2xxx)
    /// TERRAIN-2001: Grid or scale parameters are invalid
    InvalidInput = 2001,
    /// TERRAIN-2002: Coordinate outside the supported region
    InvalidCoordinate = 2002,
    /// TERRAIN-2003: Nothing to write
    EmptyMesh = 2003,

    // Configuration errors (3xxx)
    /// TERRAIN-3001: Configuration file invalid
    Config = 3001,
}

impl ErrorCode {
    /// Returns the error code as a string in the format `TERRAIN-XXXX`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::IoRead => "TERRAIN-1001",
            ErrorCode::IoWrite => "TERRAIN-1002",
            ErrorCode::ParseError => "TERRAIN-1003",
            ErrorCode::UnsupportedFormat => "TERRAIN-1004",
            ErrorCode::ImageDecode => "TERRAIN-1005",
            ErrorCode::InvalidInput => "TERRAIN-2001",
            ErrorCode::InvalidCoordinate => "TERRAIN-2002",
            ErrorCode::EmptyMesh => "TERRAIN-2003",
            ErrorCode::Config => "TERRAIN-3001",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Recovery suggestions for terrain errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoverySuggestion {
    /// Check a file or directory on disk.
    CheckPath { checks: Vec<String> },
    /// Provide a different input raster.
    CheckInput { checks: Vec<String> },
    /// Adjust parameters.
    AdjustParameters { parameters: Vec<(String, String)> },
    /// Use a different file format.
    UseDifferentFormat { suggested: Vec<String> },
}

impl std::fmt::Display for RecoverySuggestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecoverySuggestion::CheckPath { checks } => {
                write!(f, "Check the path for: {}", checks.join(", "))
            }
            RecoverySuggestion::CheckInput { checks } => {
                write!(f, "Check the input for: {}", checks.join(", "))
            }
            RecoverySuggestion::AdjustParameters { parameters } => {
                let params: Vec<String> = parameters
                    .iter()
                    .map(|(k, v)| format!("{} = {}", k, v))
                    .collect();
                write!(f, "Try adjusting: {}", params.join(", "))
            }
            RecoverySuggestion::UseDifferentFormat { suggested } => {
                write!(f, "Try using a different format: {}", suggested.join(", "))
            }
        }
    }
}

/// Errors that can occur while converting a raster into a terrain mesh.
#[derive(Debug, Error, Diagnostic)]
pub enum TerrainError {
    /// Error reading from a file.
    #[error("failed to read {path}")]
    #[diagnostic(
        code(terrain::io::read),
        help("Check that the file exists and is readable. Try: ls -la {}", path.display())
    )]
    IoRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error writing to a file.
    #[error("failed to write mesh to {path}")]
    #[diagnostic(
        code(terrain::io::write),
        help("Check that the directory exists and is writable")
    )]
    IoWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error parsing a mesh file.
    #[error("failed to parse mesh from {path}: {details}")]
    #[diagnostic(
        code(terrain::parse::error),
        help("The file may be truncated or not an STL file.")
    )]
    ParseError { path: PathBuf, details: String },

    /// Unsupported file extension.
    #[error("unsupported mesh format: {extension:?}")]
    #[diagnostic(code(terrain::format::unsupported), help("Supported formats: STL"))]
    UnsupportedFormat { extension: Option<String> },

    /// Raster could not be decoded.
    #[error("failed to decode raster {source_name}: {details}")]
    #[diagnostic(
        code(terrain::image::decode),
        help("Supported raster encodings: PNG, JPEG. Greyscale or RGB input is converted to luma.")
    )]
    ImageDecode { source_name: String, details: String },

    /// Grid dimensions, intensity anchor or height scale are unusable.
    #[error("invalid input: {details}")]
    #[diagnostic(
        code(terrain::input::invalid),
        help("Grids need at least one row and column, a positive max intensity and a positive height scale.")
    )]
    InvalidInput { details: String },

    /// Coordinate outside the supported region.
    #[error("{axis} {value} is out of bounds, expected a value between {min} and {max}")]
    #[diagnostic(
        code(terrain::input::coordinate),
        help("Only coordinates inside Norway are covered by the elevation service.")
    )]
    InvalidCoordinate {
        axis: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Nothing to write.
    #[error("mesh is empty: {details}")]
    #[diagnostic(
        code(terrain::mesh::empty),
        help("A raster needs at least 2x2 pixels to produce any triangles.")
    )]
    EmptyMesh { details: String },

    /// Configuration could not be loaded or failed validation.
    #[error("invalid configuration: {details}")]
    #[diagnostic(code(terrain::config::invalid))]
    Config {
        path: Option<PathBuf>,
        details: String,
    },
}

impl TerrainError {
    /// Returns the machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            TerrainError::IoRead { .. } => ErrorCode::IoRead,
            TerrainError::IoWrite { .. } => ErrorCode::IoWrite,
            TerrainError::ParseError { .. } => ErrorCode::ParseError,
            TerrainError::UnsupportedFormat { .. } => ErrorCode::UnsupportedFormat,
            TerrainError::ImageDecode { .. } => ErrorCode::ImageDecode,
            TerrainError::InvalidInput { .. } => ErrorCode::InvalidInput,
            TerrainError::InvalidCoordinate { .. } => ErrorCode::InvalidCoordinate,
            TerrainError::EmptyMesh { .. } => ErrorCode::EmptyMesh,
            TerrainError::Config { .. } => ErrorCode::Config,
        }
    }

    /// Returns a recovery suggestion for this error.
    pub fn recovery_suggestion(&self) -> RecoverySuggestion {
        match self {
            TerrainError::IoRead { .. } => RecoverySuggestion::CheckPath {
                checks: vec!["file exists".into(), "file permissions".into()],
            },
            TerrainError::IoWrite { .. } => RecoverySuggestion::CheckPath {
                checks: vec!["directory exists".into(), "write permissions".into()],
            },
            TerrainError::ParseError { .. } => RecoverySuggestion::CheckInput {
                checks: vec!["file is a complete STL".into()],
            },
            TerrainError::UnsupportedFormat { .. } => RecoverySuggestion::UseDifferentFormat {
                suggested: vec!["STL".into()],
            },
            TerrainError::ImageDecode { .. } => RecoverySuggestion::UseDifferentFormat {
                suggested: vec!["PNG".into(), "JPEG".into()],
            },
            TerrainError::InvalidInput { .. } => RecoverySuggestion::AdjustParameters {
                parameters: vec![
                    ("height_scale".into(), "a positive number".into()),
                    ("max_intensity".into(), "a positive number".into()),
                ],
            },
            TerrainError::InvalidCoordinate { axis, min, max, .. } => {
                RecoverySuggestion::AdjustParameters {
                    parameters: vec![((*axis).into(), format!("between {} and {}", min, max))],
                }
            }
            TerrainError::EmptyMesh { .. } => RecoverySuggestion::CheckInput {
                checks: vec!["raster is at least 2x2 pixels".into()],
            },
            TerrainError::Config { .. } => RecoverySuggestion::CheckInput {
                checks: vec!["TOML syntax".into(), "field values".into()],
            },
        }
    }

    /// Create an IoRead error.
    pub fn io_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TerrainError::IoRead {
            path: path.into(),
            source,
        }
    }

    /// Create an IoWrite error.
    pub fn io_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TerrainError::IoWrite {
            path: path.into(),
            source,
        }
    }

    /// Create a ParseError.
    pub fn parse_error(path: impl Into<PathBuf>, details: impl Into<String>) -> Self {
        TerrainError::ParseError {
            path: path.into(),
            details: details.into(),
        }
    }

    /// Create an ImageDecode error.
    pub fn image_decode(source_name: impl Into<String>, details: impl Into<String>) -> Self {
        TerrainError::ImageDecode {
            source_name: source_name.into(),
            details: details.into(),
        }
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(details: impl Into<String>) -> Self {
        TerrainError::InvalidInput {
            details: details.into(),
        }
    }

    /// Create an InvalidCoordinate error.
    pub fn invalid_coordinate(axis: &'static str, value: f64, min: f64, max: f64) -> Self {
        TerrainError::InvalidCoordinate {
            axis,
            value,
            min,
            max,
        }
    }

    /// Create an EmptyMesh error.
    pub fn empty_mesh(details: impl Into<String>) -> Self {
        TerrainError::EmptyMesh {
            details: details.into(),
        }
    }

    /// Create a Config error.
    pub fn config(path: Option<PathBuf>, details: impl Into<String>) -> Self {
        TerrainError::Config {
            path,
            details: details.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = TerrainError::invalid_input("max intensity is 0");
        assert_eq!(err.code(), ErrorCode::InvalidInput);
        assert_eq!(err.code().as_str(), "TERRAIN-2001");

        let err = TerrainError::empty_mesh("no triangles");
        assert_eq!(err.code().to_string(), "TERRAIN-2003");
    }

    #[test]
    fn test_coordinate_error_display() {
        let err = TerrainError::invalid_coordinate("latitude", 80.0, 57.0, 71.0);
        let display = format!("{}", err);
        assert!(display.contains("latitude 80"));
        assert!(display.contains("between 57 and 71"));
    }

    #[test]
    fn test_recovery_suggestions() {
        let err = TerrainError::invalid_coordinate("longitude", 40.0, 2.0, 32.88);
        match err.recovery_suggestion() {
            RecoverySuggestion::AdjustParameters { parameters } => {
                assert_eq!(parameters[0].0, "longitude");
                assert!(parameters[0].1.contains("32.88"));
            }
            other => panic!("Expected AdjustParameters, got {:?}", other),
        }
    }

    #[test]
    fn test_io_write_keeps_source() {
        use std::error::Error as _;

        let err = TerrainError::io_write(
            "/nonexistent/out.stl",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such directory"),
        );
        assert_eq!(err.code(), ErrorCode::IoWrite);
        assert!(err.source().is_some());
        assert!(err.to_string().contains("/nonexistent/out.stl"));
    }
}
