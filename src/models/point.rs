//! Point types for the two coordinate spaces the pipeline works in.

use geo::Coord;
use serde::{Deserialize, Serialize};

/// Geographic point (lat/lon, WGS84 degrees)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Planar point (easting/northing in metres of the configured projection)
pub type PlanarPoint = Coord<f64>;
