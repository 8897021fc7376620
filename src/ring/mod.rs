//! Boundary ring construction.
//!
//! Outer ways of an admin boundary relation are stitched into one ring,
//! projected to the planar reference system and simplified.

mod extract;
mod simplify;
mod stitch;

pub use extract::{BoundaryGraph, BoundaryRelation};
pub use simplify::{ramer_douglas_peucker, simplify};
pub use stitch::{remove_identical_points, stitch, StitchedRing};

use geo::LineString;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::ZoneConfig;
use crate::error::Result;
use crate::models::{FragmentId, GeoPoint, WayFragment};
use crate::projection::{ProjectionReference, Projector};

/// A simplified, closed boundary ring in both coordinate spaces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryRing {
    /// Reference system of `planar`
    pub projection: ProjectionReference,
    pub planar: LineString<f64>,
    pub geographic: Vec<GeoPoint>,
    /// Point count after stitching, before simplification
    pub raw_point_count: usize,
    /// Ways that could not be attached while stitching
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dropped: Vec<FragmentId>,
}

impl BoundaryRing {
    pub fn is_empty(&self) -> bool {
        self.planar.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.planar.0.len()
    }
}

/// Stitch, project and simplify a set of outer ways.
///
/// No ways means an empty ring, not an error.
pub fn build_boundary_ring(fragments: &[WayFragment], config: &ZoneConfig) -> Result<BoundaryRing> {
    let projector = Projector::new(&config.projection)?;

    let stitched = stitch(fragments);
    let planar = projector.to_planar(&stitched.points)?;
    let simplified = simplify(&planar, config.epsilon)?;
    let geographic = projector.to_geographic(&simplified)?;

    info!(
        "Boundary ring: {} stitched points, {} after simplification",
        stitched.points.len(),
        simplified.len()
    );

    Ok(BoundaryRing {
        projection: config.projection.clone(),
        planar: LineString::new(simplified),
        geographic,
        raw_point_count: stitched.points.len(),
        dropped: stitched.dropped,
    })
}

/// Extract the outer ways from boundary data and build the ring
pub fn build_from_graph(graph: &BoundaryGraph, config: &ZoneConfig) -> Result<BoundaryRing> {
    let fragments = graph.outer_fragments()?;
    build_boundary_ring(&fragments, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ZoneError;

    /// Two ways forming a 0.02° x 0.01° rectangle in central London
    fn london_square() -> Vec<WayFragment> {
        let at = |a: f64, b: f64| GeoPoint::new(51.5 + 0.01 * a, -0.1 + 0.01 * b);
        vec![
            WayFragment::new(1, vec![at(0.0, 0.0), at(1.0, 0.0), at(2.0, 0.0)]),
            WayFragment::new(
                2,
                vec![at(2.0, 0.0), at(2.0, 1.0), at(0.0, 1.0), at(0.0, 0.0)],
            ),
        ]
    }

    #[test]
    fn test_square_keeps_every_corner_at_fine_tolerance() {
        let config = ZoneConfig {
            epsilon: 0.001,
            ..ZoneConfig::default()
        };

        let ring = build_boundary_ring(&london_square(), &config).unwrap();
        assert_eq!(ring.raw_point_count, 5);
        assert_eq!(ring.len(), 6);
        assert!(ring.planar.is_closed());
        assert!(ring.dropped.is_empty());

        let expected = [(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (2.0, 1.0), (0.0, 1.0), (0.0, 0.0)];
        for (point, (a, b)) in ring.geographic.iter().zip(expected) {
            assert!((point.lat - (51.5 + 0.01 * a)).abs() < 1e-7);
            assert!((point.lon - (-0.1 + 0.01 * b)).abs() < 1e-7);
        }
    }

    #[test]
    fn test_square_midpoint_dropped_at_metre_tolerance() {
        let ring = build_boundary_ring(&london_square(), &ZoneConfig::default()).unwrap();
        assert_eq!(ring.len(), 5);
        assert!(ring.planar.is_closed());
        assert!((ring.geographic[1].lat - 51.52).abs() < 1e-7);
    }

    #[test]
    fn test_no_ways_is_empty_ring() {
        let ring = build_boundary_ring(&[], &ZoneConfig::default()).unwrap();
        assert!(ring.is_empty());
        assert!(ring.geographic.is_empty());
    }

    #[test]
    fn test_invalid_epsilon_is_rejected() {
        let config = ZoneConfig {
            epsilon: -5.0,
            ..ZoneConfig::default()
        };
        assert_eq!(
            build_boundary_ring(&london_square(), &config),
            Err(ZoneError::InvalidEpsilon(-5.0))
        );
    }

    #[test]
    fn test_national_grid_projection() {
        let config = ZoneConfig {
            epsilon: 0.0001,
            projection: ProjectionReference::epsg(27700),
            ..ZoneConfig::default()
        };

        let ring = build_boundary_ring(&london_square(), &config).unwrap();
        assert_eq!(ring.len(), 6);
        assert_eq!(ring.projection.as_str(), "EPSG:27700");
        // National grid eastings; UTM 30N would put these near 700 km
        assert!(ring.planar.0.iter().all(|c| c.x > 500_000.0 && c.x < 600_000.0));
        assert!((ring.geographic[2].lat - 51.52).abs() < 1e-6);
    }

    #[test]
    fn test_unresolvable_projection_is_rejected() {
        let config = ZoneConfig {
            projection: "EPSG:999999".parse().unwrap(),
            ..ZoneConfig::default()
        };
        assert!(matches!(
            build_boundary_ring(&london_square(), &config),
            Err(ZoneError::UnknownProjection(_))
        ));
    }

    #[test]
    fn test_serialises_projection_as_epsg() {
        let ring = build_boundary_ring(&london_square(), &ZoneConfig::default()).unwrap();
        let json = serde_json::to_value(&ring).unwrap();
        assert_eq!(json["projection"], "EPSG:32630");
        assert!(json.get("dropped").is_none());

        let back: BoundaryRing = serde_json::from_value(json).unwrap();
        assert_eq!(back.len(), ring.len());
    }
}
