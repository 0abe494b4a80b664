//! Geographic region selection and the elevation service request.
//!
//! A [`Coordinate`] is validated once against the area the Norwegian elevation
//! service covers; an out-of-range value is a single reported error. The box
//! around a center uses a flat degrees-per-kilometre approximation and makes
//! no claim of geodetic accuracy.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{TerrainError, TerrainResult};

/// Southern and northern latitude limits, inclusive.
pub const LATITUDE_RANGE: (f64, f64) = (57.0, 71.0);
/// Western and eastern longitude limits, inclusive.
pub const LONGITUDE_RANGE: (f64, f64) = (2.0, 32.88);

/// A validated latitude/longitude pair in degrees (WGS84).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    lat: f64,
    lon: f64,
}

impl Coordinate {
    /// Validate a center coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::InvalidCoordinate`] naming the first axis out of
    /// range (latitude is checked before longitude).
    pub fn new(lat: f64, lon: f64) -> TerrainResult<Self> {
        check_axis("latitude", lat, LATITUDE_RANGE)?;
        check_axis("longitude", lon, LONGITUDE_RANGE)?;
        Ok(Self { lat, lon })
    }

    /// Latitude (north-south).
    #[inline]
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude (east-west).
    #[inline]
    pub fn lon(&self) -> f64 {
        self.lon
    }
}

fn check_axis(axis: &'static str, value: f64, (min, max): (f64, f64)) -> TerrainResult<()> {
    // NaN fails both comparisons and is rejected as well.
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(TerrainError::invalid_coordinate(axis, value, min, max))
    }
}

/// A latitude/longitude rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Box around `center` for a printout roughly `side_km` kilometres across.
    ///
    /// The latitude half-extent is `90 * side_km / 22000` degrees; longitude
    /// spans twice that on each side to roughly compensate for meridians
    /// converging at Norwegian latitudes.
    pub fn around(center: Coordinate, side_km: f64) -> TerrainResult<Self> {
        if !(side_km.is_finite() && side_km > 0.0) {
            return Err(TerrainError::invalid_input(format!(
                "region side length must be positive, got {} km",
                side_km
            )));
        }
        let corner = 90.0 * side_km / 22000.0;
        Ok(Self {
            min_lat: center.lat - corner,
            min_lon: center.lon - corner * 2.0,
            max_lat: center.lat + corner,
            max_lon: center.lon + corner * 2.0,
        })
    }

    /// Latitude span in degrees.
    pub fn lat_span(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Longitude span in degrees.
    pub fn lon_span(&self) -> f64 {
        self.max_lon - self.min_lon
    }
}

/// Axis order follows EPSG:4326 under WMS 1.3.0: latitude first.
impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.min_lat, self.min_lon, self.max_lat, self.max_lon
        )
    }
}

/// Connection settings for the WMS elevation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WmsSettings {
    /// Service endpoint, without query string.
    pub base_url: String,
    /// Layer name.
    pub layer: String,
    /// Requested raster width in pixels.
    pub width: u32,
    /// Requested raster height in pixels.
    pub height: u32,
}

impl Default for WmsSettings {
    fn default() -> Self {
        Self {
            base_url: "https://wms.geonorge.no/skwms1/wms.hoyde-dom".to_string(),
            layer: "DOM:None".to_string(),
            width: 1080,
            height: 1080,
        }
    }
}

/// A `GetMap` request for a greyscale PNG covering a bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct WmsRequest {
    pub settings: WmsSettings,
    pub bbox: BoundingBox,
}

impl WmsRequest {
    /// Create a request for `bbox`.
    pub fn new(settings: WmsSettings, bbox: BoundingBox) -> Self {
        Self { settings, bbox }
    }

    /// Render the full request URL.
    pub fn url(&self) -> String {
        format!(
            "{}?SERVICE=WMS&VERSION=1.3.0&REQUEST=GetMap&FORMAT=image/png&TRANSPARENT=false\
             &LAYERS={}&CRS=EPSG:4326&STYLES=&WIDTH={}&HEIGHT={}&BBOX={}",
            self.settings.base_url,
            self.settings.layer,
            self.settings.width,
            self.settings.height,
            self.bbox
        )
    }
}
