//! Relevance of outside stations to a boundary.
//!
//! An outside station is relevant when its Voronoi cell, the area for
//! which it is the nearest station, reaches across the boundary ring.
//! Cells that extend to infinity are always treated as relevant since no
//! finite test can rule them out.

use geo::{GeoNum, Kernel, Line, LineString, Orientation};
use tracing::{debug, info, warn};

use super::padding::padding_ring;
use super::partition::{Cell, SpatialPartition, VoronoiPartition};
use crate::config::ZoneConfig;
use crate::error::{Result, ZoneError};
use crate::models::{PlanarPoint, RelevanceResult, StationSite};

/// Decides which outside stations matter for a boundary
#[derive(Debug, Clone)]
pub struct RelevanceClassifier {
    padding_radius_multiplier: f64,
    padding_point_count: usize,
}

impl RelevanceClassifier {
    pub fn new(config: &ZoneConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            padding_radius_multiplier: config.padding_radius_multiplier,
            padding_point_count: config.padding_point_count,
        })
    }

    /// Classify each `outside` station, in order, against `boundary`
    pub fn classify(
        &self,
        inside: &[StationSite],
        outside: &[StationSite],
        boundary: &LineString<f64>,
    ) -> Result<Vec<RelevanceResult>> {
        self.classify_with::<VoronoiPartition>(inside, outside, boundary)
    }

    /// [`RelevanceClassifier::classify`] over any partition implementation
    pub fn classify_with<P: SpatialPartition>(
        &self,
        inside: &[StationSite],
        outside: &[StationSite],
        boundary: &LineString<f64>,
    ) -> Result<Vec<RelevanceResult>> {
        let inside_points: Vec<PlanarPoint> = inside.iter().map(|s| s.location).collect();
        let outside_points: Vec<PlanarPoint> = outside.iter().map(|s| s.location).collect();

        let flags = self.relevance_flags::<P>(&inside_points, &outside_points, boundary)?;

        Ok(outside
            .iter()
            .zip(flags)
            .map(|(site, relevant)| RelevanceResult {
                id: site.id,
                relevant,
            })
            .collect())
    }

    /// Split mixed sites by membership and classify the outside ones.
    ///
    /// Relative order within each group is kept.
    pub fn classify_sites(
        &self,
        sites: &[StationSite],
        boundary: &LineString<f64>,
    ) -> Result<Vec<RelevanceResult>> {
        let (inside, outside): (Vec<StationSite>, Vec<StationSite>) =
            sites.iter().partition(|s| s.is_inside());
        self.classify(&inside, &outside, boundary)
    }

    /// One flag per outside point: does its cell reach the boundary?
    pub fn relevance_flags<P: SpatialPartition>(
        &self,
        inside: &[PlanarPoint],
        outside: &[PlanarPoint],
        boundary: &LineString<f64>,
    ) -> Result<Vec<bool>> {
        if outside.is_empty() {
            return Ok(Vec::new());
        }

        let mut sites = Vec::with_capacity(inside.len() + outside.len() + self.padding_point_count);
        sites.extend_from_slice(inside);
        sites.extend_from_slice(outside);

        let padding = padding_ring(
            &sites,
            self.padding_radius_multiplier,
            self.padding_point_count,
        )?;
        sites.extend(padding);

        let partition = P::build(&sites)?;

        let boundary_edges = ring_edges(boundary);
        if boundary_edges.is_empty() {
            warn!("Boundary ring has no edges; no bounded cell can reach it");
        }

        let mut flags = Vec::with_capacity(outside.len());
        for i in 0..outside.len() {
            let index = inside.len() + i;
            let relevant = match partition.cell(index)? {
                Cell::Unbounded => {
                    debug!("Site {} has an unbounded cell", index);
                    true
                }
                Cell::Bounded(vertices) => cell_crosses_boundary(&vertices, &boundary_edges),
            };
            flags.push(relevant);
        }

        info!(
            "{} of {} outside stations are relevant",
            flags.iter().filter(|&&r| r).count(),
            flags.len()
        );
        Ok(flags)
    }
}

/// Keep only the outside stations classified as relevant.
///
/// `results` must come from classifying `outside`, in the same order.
pub fn relevant_outside<'a>(
    outside: &'a [StationSite],
    results: &[RelevanceResult],
) -> Result<Vec<&'a StationSite>> {
    if outside.len() != results.len() {
        return Err(ZoneError::ResultCountMismatch {
            results: results.len(),
            stations: outside.len(),
        });
    }

    Ok(outside
        .iter()
        .zip(results)
        .filter(|(_, result)| result.relevant)
        .map(|(site, _)| site)
        .collect())
}

/// Edges of the ring, including the closing edge when it is open
fn ring_edges(boundary: &LineString<f64>) -> Vec<Line<f64>> {
    let mut ring = boundary.clone();
    ring.close();
    ring.lines().collect()
}

fn cell_crosses_boundary(cell: &[PlanarPoint], boundary_edges: &[Line<f64>]) -> bool {
    let n = cell.len();
    (0..n).any(|i| {
        let a = cell[i];
        let b = cell[(i + 1) % n];
        boundary_edges
            .iter()
            .any(|edge| segments_cross(a, b, edge.start, edge.end))
    })
}

/// Counter-clockwise turn from `a` through `b` to `c`; collinear is false
fn ccw(a: PlanarPoint, b: PlanarPoint, c: PlanarPoint) -> bool {
    <f64 as GeoNum>::Ker::orient2d(a, b, c) == Orientation::CounterClockwise
}

/// Segments `ab` and `cd` cross when each one's endpoints lie on opposite
/// sides of the other. Collinear overlaps do not count.
pub fn segments_cross(a: PlanarPoint, b: PlanarPoint, c: PlanarPoint, d: PlanarPoint) -> bool {
    ccw(a, c, d) != ccw(b, c, d) && ccw(a, b, c) != ccw(a, b, d)
}
