//! Core data models for the boundary and catchment pipeline.

pub mod fragment;
pub mod overpass;
pub mod point;
pub mod station;

pub use fragment::{FragmentId, WayFragment};
pub use overpass::{Element, Member, OsmType, OverpassResponse};
pub use point::{GeoPoint, PlanarPoint};
pub use station::{Membership, RelevanceResult, StationId, StationSite};
