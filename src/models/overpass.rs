//! Overpass API JSON response structure.
//!
//! Only the parts the boundary pipeline reads are modelled. A boundary
//! query of the form `relation[...]; out body; >; out skel qt;` returns the
//! relation, its member ways and their nodes as a flat `elements` list.

use serde::{Deserialize, Serialize};

/// Type of OSM object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsmType {
    Node,
    Way,
    Relation,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<Element>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    Node {
        id: i64,
        lat: f64,
        lon: f64,
    },
    Way {
        id: i64,
        #[serde(default)]
        nodes: Vec<i64>,
    },
    Relation {
        id: i64,
        #[serde(default)]
        members: Vec<Member>,
    },
    /// Areas, counts and anything else Overpass may interleave
    #[serde(other)]
    Other,
}

/// A relation member reference
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Member {
    #[serde(rename = "type")]
    pub member_type: OsmType,
    #[serde(rename = "ref")]
    pub reference: i64,
    #[serde(default)]
    pub role: String,
}

impl Member {
    /// Outer way of a boundary (inner rings are holes and not consumed)
    pub fn is_outer_way(&self) -> bool {
        self.member_type == OsmType::Way && self.role == "outer"
    }
}
