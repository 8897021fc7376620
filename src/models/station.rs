//! Station sites and classification results.

use serde::{Deserialize, Serialize};

use super::PlanarPoint;

/// OSM node id of a station
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationId(pub i64);

/// Whether a station lies inside the boundary or is an outside candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Membership {
    Inside,
    Outside,
}

/// A station positioned in the planar projection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StationSite {
    pub id: StationId,
    pub location: PlanarPoint,
    pub membership: Membership,
}

impl StationSite {
    pub fn inside(id: i64, location: PlanarPoint) -> Self {
        Self {
            id: StationId(id),
            location,
            membership: Membership::Inside,
        }
    }

    pub fn outside(id: i64, location: PlanarPoint) -> Self {
        Self {
            id: StationId(id),
            location,
            membership: Membership::Outside,
        }
    }

    pub fn is_inside(&self) -> bool {
        self.membership == Membership::Inside
    }
}

/// Verdict for one outside candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelevanceResult {
    pub id: StationId,
    /// True when the station's Voronoi cell touches the boundary ring
    pub relevant: bool,
}
