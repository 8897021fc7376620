//! Station catchment analysis.
//!
//! Inside and outside stations are partitioned into Voronoi cells, padded
//! with a ring of synthetic sites, and each outside station is flagged as
//! relevant when its cell crosses the boundary ring.

mod classify;
mod padding;
mod partition;

pub use classify::{relevant_outside, segments_cross, RelevanceClassifier};
pub use padding::padding_ring;
pub use partition::{Cell, SpatialPartition, VoronoiPartition};
