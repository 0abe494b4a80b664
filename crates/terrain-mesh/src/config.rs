//! Serializable conversion settings.
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```toml
//! height_scale = 25.0
//! stl_format = "ascii"
//!
//! [region]
//! side_km = 5.0
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{TerrainError, TerrainResult};
use crate::io::StlFormat;
use crate::raster::DEFAULT_MAX_SIZE;
use crate::region::WmsSettings;

/// Settings for the region around the center coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionSettings {
    /// Side of the printed square in kilometres.
    pub side_km: f64,
}

impl Default for RegionSettings {
    fn default() -> Self {
        Self { side_km: 2.0 }
    }
}

/// Settings for one raster-to-STL conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Height the brightest pixel maps onto, in mesh units.
    pub height_scale: f64,
    /// Largest raster `[width, height]` triangulated; bigger rasters are shrunk.
    pub max_size: [u32; 2],
    /// Whether to shrink rasters larger than `max_size`.
    pub shrink: bool,
    /// Output encoding.
    pub stl_format: StlFormat,
    /// Triangulate rows in parallel.
    pub parallel: bool,
    pub region: RegionSettings,
    pub wms: WmsSettings,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            height_scale: 10.0,
            max_size: [DEFAULT_MAX_SIZE.0, DEFAULT_MAX_SIZE.1],
            shrink: true,
            stl_format: StlFormat::Binary,
            parallel: false,
            region: RegionSettings::default(),
            wms: WmsSettings::default(),
        }
    }
}

impl TerrainConfig {
    /// Parse and validate a TOML string.
    pub fn from_toml(toml_str: &str) -> TerrainResult<Self> {
        let config: Self =
            toml::from_str(toml_str).map_err(|e| TerrainError::config(None, e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> TerrainResult<Self> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|e| TerrainError::io_read(path, e))?;
        let config: Self = toml::from_str(&contents)
            .map_err(|e| TerrainError::config(Some(path.to_path_buf()), e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> TerrainResult<String> {
        toml::to_string_pretty(self).map_err(|e| TerrainError::config(None, e.to_string()))
    }

    /// Serialize to a JSON string.
    pub fn to_json(&self) -> TerrainResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| TerrainError::config(None, e.to_string()))
    }

    /// Raster bound passed to the loader, `None` when shrinking is disabled.
    pub fn raster_bound(&self) -> Option<(u32, u32)> {
        self.shrink.then_some((self.max_size[0], self.max_size[1]))
    }

    /// Check value ranges.
    pub fn validate(&self) -> TerrainResult<()> {
        if !(self.height_scale.is_finite() && self.height_scale > 0.0) {
            return Err(TerrainError::config(
                None,
                format!("height_scale must be positive, got {}", self.height_scale),
            ));
        }
        if self.max_size.contains(&0) {
            return Err(TerrainError::config(
                None,
                format!(
                    "max_size must be positive, got {}x{}",
                    self.max_size[0], self.max_size[1]
                ),
            ));
        }
        if !(self.region.side_km.is_finite() && self.region.side_km > 0.0) {
            return Err(TerrainError::config(
                None,
                format!("region.side_km must be positive, got {}", self.region.side_km),
            ));
        }
        if self.wms.width == 0 || self.wms.height == 0 {
            return Err(TerrainError::config(
                None,
                "wms.width and wms.height must be positive",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TerrainConfig::default();
        assert_eq!(config.height_scale, 10.0);
        assert_eq!(config.max_size, [500, 500]);
        assert_eq!(config.raster_bound(), Some((500, 500)));
        assert_eq!(config.stl_format, StlFormat::Binary);
        assert_eq!(config.region.side_km, 2.0);
        assert_eq!(config.wms.width, 1080);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = TerrainConfig::from_toml(
            r#"
            height_scale = 25.0
            stl_format = "ascii"

            [region]
            side_km = 5.0
            "#,
        )
        .unwrap();

        assert_eq!(config.height_scale, 25.0);
        assert_eq!(config.stl_format, StlFormat::Ascii);
        assert_eq!(config.region.side_km, 5.0);
        assert_eq!(config.max_size, [500, 500]);
        assert_eq!(config.wms, WmsSettings::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        for toml_str in [
            "height_scale = 0.0",
            "height_scale = -3.0",
            "max_size = [0, 500]",
            "[region]\nside_km = 0.0",
            "[wms]\nwidth = 0",
        ] {
            let err = TerrainConfig::from_toml(toml_str).unwrap_err();
            assert!(
                matches!(err, TerrainError::Config { .. }),
                "{} should be rejected",
                toml_str
            );
        }
    }

    #[test]
    fn test_malformed_toml() {
        let err = TerrainConfig::from_toml("height_scale = \"tall\"").unwrap_err();
        assert!(matches!(err, TerrainError::Config { .. }));
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = TerrainConfig::default();
        config.parallel = true;
        config.shrink = false;
        let parsed = TerrainConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, config);
        assert_eq!(parsed.raster_bound(), None);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("terrain.toml");
        std::fs::write(&path, "parallel = true\n").unwrap();

        let config = TerrainConfig::from_toml_file(&path).unwrap();
        assert!(config.parallel);

        let missing = TerrainConfig::from_toml_file(dir.path().join("missing.toml"));
        assert!(matches!(missing, Err(TerrainError::IoRead { .. })));
    }

    #[test]
    fn test_to_json() {
        let json = TerrainConfig::default().to_json().unwrap();
        assert!(json.contains("\"stl_format\": \"binary\""));
    }
}
