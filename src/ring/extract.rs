//! Boundary relation graph and outer way extraction.

use hashbrown::{HashMap, HashSet};
use tracing::{debug, info};

use crate::error::{Result, ZoneError};
use crate::models::{Element, GeoPoint, Member, OverpassResponse, WayFragment};

/// A boundary relation with the ways and nodes it references
#[derive(Debug, Clone, Default)]
pub struct BoundaryGraph {
    nodes: HashMap<i64, GeoPoint>,
    ways: HashMap<i64, Vec<i64>>,
    relation: Option<BoundaryRelation>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryRelation {
    pub id: i64,
    /// Members in relation order
    pub members: Vec<Member>,
}

impl BoundaryGraph {
    /// Index an Overpass response. The first relation found is the boundary.
    pub fn from_response(response: &OverpassResponse) -> Self {
        let mut graph = Self::default();

        for element in &response.elements {
            match element {
                Element::Node { id, lat, lon } => {
                    graph.nodes.insert(*id, GeoPoint::new(*lat, *lon));
                }
                Element::Way { id, nodes } => {
                    graph.ways.insert(*id, nodes.clone());
                }
                Element::Relation { id, members } => {
                    if graph.relation.is_none() {
                        graph.relation = Some(BoundaryRelation {
                            id: *id,
                            members: members.clone(),
                        });
                    } else {
                        debug!("Ignoring additional relation {}", id);
                    }
                }
                Element::Other => {}
            }
        }

        debug!(
            "Indexed boundary data: {} nodes, {} ways",
            graph.nodes.len(),
            graph.ways.len()
        );
        graph
    }

    pub fn relation(&self) -> Option<&BoundaryRelation> {
        self.relation.as_ref()
    }

    /// Resolve the relation's outer ways to coordinates, in member order.
    ///
    /// A missing relation or one without outer ways yields no fragments.
    /// A way listed twice is only taken once.
    pub fn outer_fragments(&self) -> Result<Vec<WayFragment>> {
        let Some(relation) = &self.relation else {
            info!("No boundary relation found");
            return Ok(Vec::new());
        };

        let mut seen = HashSet::new();
        let mut fragments = Vec::new();

        for member in relation.members.iter().filter(|m| m.is_outer_way()) {
            let way_id = member.reference;
            if !seen.insert(way_id) {
                debug!("Outer way {} listed more than once", way_id);
                continue;
            }

            let node_ids = self.ways.get(&way_id).ok_or(ZoneError::MissingWay(way_id))?;
            let points = node_ids
                .iter()
                .map(|node_id| {
                    self.nodes
                        .get(node_id)
                        .copied()
                        .ok_or(ZoneError::MissingNode {
                            way: way_id,
                            node: *node_id,
                        })
                })
                .collect::<Result<Vec<GeoPoint>>>()?;

            fragments.push(WayFragment::new(way_id, points));
        }

        info!(
            "Relation {} has {} outer ways",
            relation.id,
            fragments.len()
        );
        Ok(fragments)
    }
}
