//! Spatial partition over station sites.
//!
//! The classifier only needs two things from a partition: build it from an
//! ordered list of sites, then ask for the cell of a site by its index.
//! [`VoronoiPartition`] answers with Voronoi cells read off a spade
//! Delaunay triangulation.

use spade::handles::{FixedVertexHandle, VoronoiVertex};
use spade::{DelaunayTriangulation, Point2, Triangulation};
use tracing::debug;

use crate::error::{Result, ZoneError};
use crate::models::PlanarPoint;

/// The influence region of one site
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Cell polygon vertices in order, without a closing repeat
    Bounded(Vec<PlanarPoint>),
    /// The cell reaches infinity (its site is on the convex hull)
    Unbounded,
}

impl Cell {
    pub fn is_unbounded(&self) -> bool {
        matches!(self, Cell::Unbounded)
    }
}

pub trait SpatialPartition: Sized {
    /// Partition the plane among `sites`; site indices follow slice order
    fn build(sites: &[PlanarPoint]) -> Result<Self>;

    /// Cell owned by the site at `index`
    fn cell(&self, index: usize) -> Result<Cell>;
}

/// Voronoi diagram as the dual of a Delaunay triangulation
pub struct VoronoiPartition {
    triangulation: DelaunayTriangulation<Point2<f64>>,
    handles: Vec<FixedVertexHandle>,
}

impl SpatialPartition for VoronoiPartition {
    /// Fails on an empty site list, on repeated positions, on sites the
    /// triangulation rejects (NaN, out of range) and when every site lies on
    /// one line, which leaves no finite cell at all.
    fn build(sites: &[PlanarPoint]) -> Result<Self> {
        if sites.is_empty() {
            return Err(ZoneError::EmptySiteSet);
        }

        let mut triangulation: DelaunayTriangulation<Point2<f64>> = DelaunayTriangulation::new();
        let mut handles = Vec::with_capacity(sites.len());

        for (index, site) in sites.iter().enumerate() {
            let before = triangulation.num_vertices();
            let handle = triangulation
                .insert(Point2::new(site.x, site.y))
                .map_err(|e| ZoneError::RejectedSite {
                    index,
                    reason: format!("{:?}", e),
                })?;

            // Inserting an existing position updates that vertex in place
            if triangulation.num_vertices() == before {
                return Err(ZoneError::DuplicateSite { index });
            }
            handles.push(handle);
        }

        if triangulation.num_inner_faces() == 0 {
            return Err(ZoneError::DegenerateSites(format!(
                "{} sites are collinear",
                sites.len()
            )));
        }

        debug!(
            "Triangulated {} sites into {} faces",
            sites.len(),
            triangulation.num_inner_faces()
        );

        Ok(Self {
            triangulation,
            handles,
        })
    }

    fn cell(&self, index: usize) -> Result<Cell> {
        let handle = *self
            .handles
            .get(index)
            .ok_or(ZoneError::SiteIndexOutOfRange {
                index,
                len: self.handles.len(),
            })?;

        let face = self.triangulation.vertex(handle).as_voronoi_face();

        let mut vertices = Vec::new();
        for edge in face.adjacent_edges() {
            match edge.from() {
                VoronoiVertex::Inner(delaunay_face) => {
                    let center = delaunay_face.circumcenter();
                    vertices.push(PlanarPoint {
                        x: center.x,
                        y: center.y,
                    });
                }
                VoronoiVertex::Outer(_) => return Ok(Cell::Unbounded),
            }
        }

        Ok(Cell::Bounded(vertices))
    }
}

impl VoronoiPartition {
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::coord;

    fn sites(coords: &[(f64, f64)]) -> Vec<PlanarPoint> {
        coords.iter().map(|&(x, y)| coord! { x: x, y: y }).collect()
    }

    #[test]
    fn test_center_of_square_is_bounded() {
        let partition = VoronoiPartition::build(&sites(&[
            (0.0, 0.0),
            (2.0, 0.0),
            (2.0, 2.0),
            (0.0, 2.0),
            (1.0, 1.0),
        ]))
        .unwrap();

        assert_eq!(partition.len(), 5);
        for corner in 0..4 {
            assert!(partition.cell(corner).unwrap().is_unbounded());
        }

        match partition.cell(4).unwrap() {
            Cell::Bounded(vertices) => {
                assert_eq!(vertices.len(), 4);
                // Diamond with corners one unit from the centre along each axis
                for v in &vertices {
                    let manhattan = (v.x - 1.0).abs() + (v.y - 1.0).abs();
                    assert!((manhattan - 1.0).abs() < 1e-9, "vertex {:?}", v);
                }
            }
            Cell::Unbounded => panic!("centre cell should be bounded"),
        }
    }

    #[test]
    fn test_empty_sites() {
        assert!(matches!(
            VoronoiPartition::build(&[]),
            Err(ZoneError::EmptySiteSet)
        ));
    }

    #[test]
    fn test_collinear_sites() {
        let result = VoronoiPartition::build(&sites(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]));
        assert!(matches!(result, Err(ZoneError::DegenerateSites(_))));

        let result = VoronoiPartition::build(&sites(&[(0.0, 0.0), (1.0, 1.0)]));
        assert!(matches!(result, Err(ZoneError::DegenerateSites(_))));
    }

    #[test]
    fn test_duplicate_site() {
        let result = VoronoiPartition::build(&sites(&[
            (0.0, 0.0),
            (1.0, 0.0),
            (0.0, 1.0),
            (1.0, 0.0),
        ]));
        assert!(matches!(result, Err(ZoneError::DuplicateSite { index: 3 })));
    }

    #[test]
    fn test_nan_site() {
        let result = VoronoiPartition::build(&sites(&[(0.0, 0.0), (f64::NAN, 0.0)]));
        assert!(matches!(result, Err(ZoneError::RejectedSite { index: 1, .. })));
    }

    #[test]
    fn test_index_out_of_range() {
        let partition =
            VoronoiPartition::build(&sites(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)])).unwrap();
        assert_eq!(
            partition.cell(3),
            Err(ZoneError::SiteIndexOutOfRange { index: 3, len: 3 })
        );
    }
}
