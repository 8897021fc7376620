//! Geographic ⇄ planar coordinate conversion.
//!
//! Conversions go through PROJ. The planar space is any projected CRS PROJ
//! knows by name, usually an EPSG code such as `EPSG:32630` (UTM 30N) or
//! `EPSG:27700` (British National Grid). Geographic points are WGS84
//! (`EPSG:4326`). Accuracy outside the CRS's area of use is whatever PROJ
//! gives; no error is raised for such points.

use std::fmt;
use std::str::FromStr;

use proj::Proj;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ZoneError};
use crate::models::{GeoPoint, PlanarPoint};

const GEOGRAPHIC_CRS: &str = "EPSG:4326";
const DEFAULT_CRS: &str = "EPSG:32630";

/// Identifier of the planar coordinate reference system.
///
/// Only its shape is checked on parsing; whether PROJ can resolve it is
/// checked by [`Projector::new`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProjectionReference(String);

impl ProjectionReference {
    pub fn epsg(code: u32) -> Self {
        Self(format!("EPSG:{}", code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The numeric code of an `EPSG:nnnn` reference
    pub fn epsg_code(&self) -> Option<u32> {
        let (authority, code) = self.0.split_once(':')?;
        if !authority.eq_ignore_ascii_case("epsg") {
            return None;
        }
        code.parse().ok()
    }
}

/// UTM zone 30N, covering Great Britain
impl Default for ProjectionReference {
    fn default() -> Self {
        Self(DEFAULT_CRS.to_string())
    }
}

impl fmt::Display for ProjectionReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ProjectionReference {
    type Err = ZoneError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
            return Err(ZoneError::UnknownProjection(s.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl TryFrom<String> for ProjectionReference {
    type Error = ZoneError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<ProjectionReference> for String {
    fn from(value: ProjectionReference) -> Self {
        value.0
    }
}

/// Converts between WGS84 degrees and one planar CRS
pub struct Projector {
    reference: ProjectionReference,
    forward: Proj,
    inverse: Proj,
}

impl fmt::Debug for Projector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Projector")
            .field("reference", &self.reference)
            .finish_non_exhaustive()
    }
}

impl Projector {
    /// Fails with [`ZoneError::UnknownProjection`] when PROJ cannot build a
    /// transformation to or from `reference`
    pub fn new(reference: &ProjectionReference) -> Result<Self> {
        let create = |from: &str, to: &str| {
            Proj::new_known_crs(from, to, None).map_err(|e| {
                ZoneError::UnknownProjection(format!("{} ({})", reference, e))
            })
        };

        let forward = create(GEOGRAPHIC_CRS, reference.as_str())?;
        let inverse = create(reference.as_str(), GEOGRAPHIC_CRS)?;

        Ok(Self {
            reference: reference.clone(),
            forward,
            inverse,
        })
    }

    pub fn reference(&self) -> &ProjectionReference {
        &self.reference
    }

    /// Project a sequence of geographic points, preserving order
    pub fn to_planar(&self, points: &[GeoPoint]) -> Result<Vec<PlanarPoint>> {
        points.iter().map(|p| self.project(p)).collect()
    }

    /// Inverse of [`Projector::to_planar`]
    pub fn to_geographic(&self, points: &[PlanarPoint]) -> Result<Vec<GeoPoint>> {
        points.iter().map(|c| self.unproject(c)).collect()
    }

    pub fn project(&self, point: &GeoPoint) -> Result<PlanarPoint> {
        // Known-CRS transforms take geographic input as (lon, lat)
        let (x, y) = self
            .forward
            .convert((point.lon, point.lat))
            .map_err(|e| ZoneError::ProjectionFailed(format!("{:?}: {}", point, e)))?;
        Ok(PlanarPoint { x, y })
    }

    pub fn unproject(&self, point: &PlanarPoint) -> Result<GeoPoint> {
        let (lon, lat) = self
            .inverse
            .convert((point.x, point.y))
            .map_err(|e| ZoneError::ProjectionFailed(format!("{:?}: {}", point, e)))?;
        Ok(GeoPoint::new(lat, lon))
    }
}
