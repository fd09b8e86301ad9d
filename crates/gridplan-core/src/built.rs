//! Serializable result of a network build.
//!
//! A [`BuiltNetwork`] is what the planner hands back to its caller: the
//! surviving subnets with resolved node and segment records. It carries no
//! handles into the build's registry, so it outlives the build.

use crate::{Coord, Node, NodeId, Projection};
use serde::{Deserialize, Serialize};

/// A committed segment, resolved to endpoint ids and coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentRecord {
    pub from: NodeId,
    pub to: NodeId,
    pub from_coord: Coord,
    pub to_coord: Coord,
    pub cost: f64,
    pub is_existing: bool,
}

/// One connected component and its shared residual weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubnetRecord {
    /// Residual budget shared by every node of the subnet
    pub weight: f64,
    /// Member nodes; each node's `weight` equals the subnet weight
    pub nodes: Vec<Node>,
    pub segments: Vec<SegmentRecord>,
}

impl SubnetRecord {
    /// Number of real (non-fixed) nodes.
    pub fn count_nodes(&self) -> usize {
        self.nodes.iter().filter(|n| !n.is_fixed()).count()
    }

    /// Cost of the segments that have to be built (existing ones excluded).
    pub fn new_segment_cost(&self) -> f64 {
        self.segments
            .iter()
            .filter(|s| !s.is_existing)
            .map(|s| s.cost)
            .sum()
    }

    pub fn contains_existing(&self) -> bool {
        self.nodes.iter().any(Node::is_fixed)
    }
}

/// The planned network: every subnet that survived pruning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuiltNetwork {
    pub projection: Projection,
    pub subnets: Vec<SubnetRecord>,
}

impl BuiltNetwork {
    pub fn node_count(&self) -> usize {
        self.subnets.iter().map(|s| s.nodes.len()).sum()
    }

    pub fn segment_count(&self) -> usize {
        self.subnets.iter().map(|s| s.segments.len()).sum()
    }

    pub fn new_segment_cost(&self) -> f64 {
        self.subnets.iter().map(SubnetRecord::new_segment_cost).sum()
    }

    pub fn cycle_subnets(&self) -> impl Iterator<Item = &SubnetRecord> {
        self.subnets.iter()
    }
}
