//! Transitzone - boundary rings and station catchments for transit zones
//!
//! The library turns an administrative boundary relation into a simplified
//! planar ring and decides which stations outside that boundary still serve
//! it. Shared by the `build-ring` and `classify` binaries.

pub mod catchment;
pub mod config;
pub mod error;
pub mod models;
pub mod projection;
pub mod ring;

pub use catchment::RelevanceClassifier;
pub use config::ZoneConfig;
pub use error::{Result, ZoneError};
pub use models::{GeoPoint, PlanarPoint, RelevanceResult, StationSite, WayFragment};
pub use projection::{ProjectionReference, Projector};
pub use ring::{build_boundary_ring, BoundaryRing};
