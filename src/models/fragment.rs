//! Boundary way fragments.

use serde::{Deserialize, Serialize};

use super::GeoPoint;

/// OSM way id of a boundary fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FragmentId(pub i64);

impl std::fmt::Display for FragmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "way/{}", self.0)
    }
}

/// One outer arc of a boundary relation.
///
/// Fragments are undirected: the stitcher may traverse `points` in either
/// direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WayFragment {
    pub id: FragmentId,
    pub points: Vec<GeoPoint>,
}

impl WayFragment {
    pub fn new(id: i64, points: Vec<GeoPoint>) -> Self {
        Self {
            id: FragmentId(id),
            points,
        }
    }

    pub fn start(&self) -> Option<&GeoPoint> {
        self.points.first()
    }

    pub fn end(&self) -> Option<&GeoPoint> {
        self.points.last()
    }
}
