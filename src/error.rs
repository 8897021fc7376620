//! Library error type.
//!
//! Every fallible operation in the geometry core returns [`ZoneError`].
//! Binaries wrap these in `anyhow` with context.

/// Errors raised by the boundary and catchment pipeline.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ZoneError {
    /// Simplification tolerance must be a finite number above zero
    #[error("simplification epsilon must be positive and finite, got {0}")]
    InvalidEpsilon(f64),

    /// A configuration value is out of range
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Projection identifier could not be resolved to a supported CRS
    #[error("unsupported projection reference '{0}'")]
    UnknownProjection(String),

    /// No station sites at all were supplied to the partition
    #[error("cannot build a spatial partition from an empty site set")]
    EmptySiteSet,

    /// Sites are too few or all collinear, so no cell has finite area
    #[error("degenerate site set: {0}")]
    DegenerateSites(String),

    /// PROJ could not transform a coordinate
    #[error("coordinate transformation failed: {0}")]
    ProjectionFailed(String),

    /// Two sites share the exact same position
    #[error("site {index} duplicates the position of an earlier site")]
    DuplicateSite { index: usize },

    /// A site with a non-finite coordinate, or one the triangulation refused
    #[error("site {index} rejected by triangulation: {reason}")]
    RejectedSite { index: usize, reason: String },

    /// A cell was requested for a site index the partition does not hold
    #[error("site index {index} out of range (partition holds {len} sites)")]
    SiteIndexOutOfRange { index: usize, len: usize },

    /// Relation references a way that is not present in the response
    #[error("relation member way {0} not found in boundary data")]
    MissingWay(i64),

    /// Way references a node that is not present in the response
    #[error("node {node} referenced by way {way} not found in boundary data")]
    MissingNode { way: i64, node: i64 },

    /// Classification results do not line up with the stations they describe
    #[error("{results} classification results for {stations} outside stations")]
    ResultCountMismatch { results: usize, stations: usize },
}

pub type Result<T> = std::result::Result<T, ZoneError>;
