//! Synthetic padding sites around the real stations.
//!
//! Without padding, every station on the convex hull of the site set owns
//! an unbounded cell. A ring of extra sites well outside the stations moves
//! the hull outwards so that the real stations' cells become finite.

use std::f64::consts::TAU;

use geo::{BoundingRect, MultiPoint};

use crate::error::{Result, ZoneError};
use crate::models::PlanarPoint;

/// Place `count` sites evenly on a circle around `sites`.
///
/// The circle is centred on the sites' bounding box and its radius is
/// `multiplier` times the distance from that centre to the furthest site.
/// A `count` of zero yields no padding.
pub fn padding_ring(sites: &[PlanarPoint], multiplier: f64, count: usize) -> Result<Vec<PlanarPoint>> {
    if count == 0 {
        return Ok(Vec::new());
    }

    if let Some(index) = sites
        .iter()
        .position(|site| !(site.x.is_finite() && site.y.is_finite()))
    {
        return Err(ZoneError::RejectedSite {
            index,
            reason: "non-finite coordinate".to_string(),
        });
    }

    let bounds = MultiPoint::from(sites.to_vec())
        .bounding_rect()
        .ok_or(ZoneError::EmptySiteSet)?;
    let center = bounds.center();

    let furthest = sites
        .iter()
        .map(|site| (site.x - center.x).hypot(site.y - center.y))
        .fold(0.0, f64::max);
    let radius = furthest * multiplier;

    if !(radius.is_finite() && radius > 0.0) {
        return Err(ZoneError::DegenerateSites(format!(
            "padding radius {} from {} coincident sites",
            radius,
            sites.len()
        )));
    }

    Ok((0..count)
        .map(|k| {
            let angle = TAU * k as f64 / count as f64;
            PlanarPoint {
                x: center.x + radius * angle.cos(),
                y: center.y + radius * angle.sin(),
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::coord;

    #[test]
    fn test_ring_geometry() {
        let sites = vec![
            coord! { x: 0.0, y: 0.0 },
            coord! { x: 4.0, y: 0.0 },
            coord! { x: 4.0, y: 2.0 },
            coord! { x: 1.0, y: 1.0 },
        ];

        let ring = padding_ring(&sites, 1.5, 64).unwrap();
        assert_eq!(ring.len(), 64);

        // Centre (2, 1); furthest site sqrt(5) away
        let expected_radius = 5.0f64.sqrt() * 1.5;
        for p in &ring {
            let r = (p.x - 2.0).hypot(p.y - 1.0);
            assert!((r - expected_radius).abs() < 1e-9);
        }
        assert!((ring[0].x - (2.0 + expected_radius)).abs() < 1e-9);
        assert!((ring[0].y - 1.0).abs() < 1e-9);
        assert!((ring[16].x - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_repeated_points() {
        let sites = vec![coord! { x: 0.0, y: 0.0 }, coord! { x: 10.0, y: 0.0 }];
        let ring = padding_ring(&sites, 2.0, 8).unwrap();
        for (i, a) in ring.iter().enumerate() {
            for b in &ring[i + 1..] {
                assert!((a.x - b.x).hypot(a.y - b.y) > 1.0);
            }
        }
    }

    #[test]
    fn test_disabled() {
        assert!(padding_ring(&[], 1.5, 0).unwrap().is_empty());
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(matches!(
            padding_ring(&[], 1.5, 64),
            Err(ZoneError::EmptySiteSet)
        ));

        let same = vec![coord! { x: 3.0, y: 3.0 }, coord! { x: 3.0, y: 3.0 }];
        assert!(matches!(
            padding_ring(&same, 1.5, 64),
            Err(ZoneError::DegenerateSites(_))
        ));
    }

    #[test]
    fn test_non_finite_site() {
        let sites = vec![
            coord! { x: 0.0, y: 0.0 },
            coord! { x: f64::NAN, y: 5.0 },
            coord! { x: 10.0, y: 0.0 },
        ];
        assert!(matches!(
            padding_ring(&sites, 1.5, 64),
            Err(ZoneError::RejectedSite { index: 1, .. })
        ));
    }
}
