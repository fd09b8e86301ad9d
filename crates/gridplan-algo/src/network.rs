//! Disjoint-set network of subnets.
//!
//! Each node starts as its own subnet. Subnets are the sets of a union-find
//! structure (path compression, union by rank); the subnet payload (shared
//! residual weight, member nodes, committed segments) lives only at the set
//! representative, so every member of a subnet reads the same weight by
//! construction.
//!
//! ```text
//!   Unmerged ──add_segment──▶ Merged ──finalize──▶ Final
//!  (1 node)                  (≥2 nodes)
//! ```
//!
//! Merging two subnets through a segment of cost `c` leaves the merged subnet
//! with weight `w_a + w_b - c`. A segment whose endpoints already share a
//! subnet would close a cycle and is refused.

use gridplan_core::{NodeIdx, Segment, SegmentIdx};
use serde::Serialize;

use crate::factory::EntityRegistry;

/// Representative node of a subnet. Only valid until the next merge.
pub type SubnetId = NodeIdx;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubnetPhase {
    Unmerged,
    Merged,
    Final,
}

#[derive(Debug, Clone)]
struct Payload {
    weight: f64,
    nodes: Vec<NodeIdx>,
    segments: Vec<SegmentIdx>,
}

#[derive(Debug, Clone)]
pub struct Network {
    parent: Vec<usize>,
    rank: Vec<u8>,
    payload: Vec<Option<Payload>>,
    fixed: Vec<bool>,
    history: Vec<SegmentIdx>,
    subnet_count: usize,
    finalized: bool,
}

impl Network {
    /// One singleton subnet per registered node, weighted by the node's
    /// initial weight.
    pub fn new(registry: &EntityRegistry) -> Self {
        let n = registry.node_count();
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
            payload: registry
                .nodes()
                .iter()
                .enumerate()
                .map(|(i, node)| {
                    Some(Payload {
                        weight: node.weight,
                        nodes: vec![NodeIdx::new(i)],
                        segments: Vec::new(),
                    })
                })
                .collect(),
            fixed: registry.nodes().iter().map(|node| node.is_fixed()).collect(),
            history: Vec::new(),
            subnet_count: n,
            finalized: false,
        }
    }

    /// Representative of the subnet containing `node`, compressing the path.
    pub fn find(&mut self, node: NodeIdx) -> SubnetId {
        let mut root = node.value();
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut current = node.value();
        while self.parent[current] != root {
            let next = self.parent[current];
            self.parent[current] = root;
            current = next;
        }
        NodeIdx::new(root)
    }

    /// Representative lookup without path compression.
    pub fn find_readonly(&self, node: NodeIdx) -> SubnetId {
        let mut current = node.value();
        while self.parent[current] != current {
            current = self.parent[current];
        }
        NodeIdx::new(current)
    }

    /// Current residual weight of the subnet holding `node`.
    pub fn weight_of(&self, node: NodeIdx) -> f64 {
        self.payload[self.find_readonly(node).value()]
            .as_ref()
            .map_or(0.0, |payload| payload.weight)
    }

    pub fn connected(&mut self, a: NodeIdx, b: NodeIdx) -> bool {
        self.find(a) == self.find(b)
    }

    /// Join two subnets, keeping the payload at the new representative.
    fn union(&mut self, ra: SubnetId, rb: SubnetId) -> SubnetId {
        let (ra, rb) = (ra.value(), rb.value());
        let (root, child) = if self.rank[ra] < self.rank[rb] {
            (rb, ra)
        } else {
            if self.rank[ra] == self.rank[rb] {
                self.rank[ra] += 1;
            }
            (ra, rb)
        };
        self.parent[child] = root;
        let absorbed = self.payload[child].take();
        if let (Some(target), Some(absorbed)) = (self.payload[root].as_mut(), absorbed) {
            target.weight += absorbed.weight;
            target.nodes.extend(absorbed.nodes);
            target.segments.extend(absorbed.segments);
        }
        self.subnet_count -= 1;
        NodeIdx::new(root)
    }

    /// Load an existing network as one subnet: every listed node joins it
    /// regardless of geometric connectivity, and its weight is the sum of
    /// the members' weights.
    pub fn seed_existing(&mut self, nodes: &[NodeIdx], segments: &[SegmentIdx]) -> Option<SubnetId> {
        let (&first, rest) = nodes.split_first()?;
        let mut root = self.find(first);
        for &node in rest {
            let other = self.find(node);
            if other != root {
                root = self.union(root, other);
            }
        }
        if let Some(payload) = self.payload[root.value()].as_mut() {
            payload.segments.extend_from_slice(segments);
        }
        self.history.extend_from_slice(segments);
        Some(root)
    }

    /// Commit `segment` if its endpoints lie in different subnets.
    ///
    /// Returns the merged subnet, or `None` when the segment would close a
    /// cycle (or the network is finalized); in that case nothing changes.
    pub fn add_segment(&mut self, idx: SegmentIdx, segment: &Segment) -> Option<SubnetId> {
        if self.finalized {
            return None;
        }
        let (a, b) = segment.nodes();
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return None;
        }
        let root = self.union(ra, rb);
        if let Some(payload) = self.payload[root.value()].as_mut() {
            payload.weight -= segment.cost;
            payload.segments.push(idx);
        }
        self.history.push(idx);
        Some(root)
    }

    /// Mark every subnet final; later `add_segment` calls are refused.
    pub fn finalize(&mut self) {
        self.finalized = true;
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn subnet(&self, id: SubnetId) -> Option<Subnet<'_>> {
        let payload = self.payload.get(id.value())?.as_ref()?;
        Some(Subnet {
            id,
            payload,
            fixed: &self.fixed,
            finalized: self.finalized,
        })
    }

    /// Current distinct subnets, ordered by representative.
    pub fn cycle_subnets(&self) -> impl Iterator<Item = Subnet<'_>> {
        self.payload
            .iter()
            .enumerate()
            .filter_map(move |(i, payload)| {
                payload.as_ref().map(|payload| Subnet {
                    id: NodeIdx::new(i),
                    payload,
                    fixed: &self.fixed,
                    finalized: self.finalized,
                })
            })
    }

    pub fn subnet_count(&self) -> usize {
        self.subnet_count
    }

    /// Segments in the order they were committed (existing ones first).
    pub fn history(&self) -> &[SegmentIdx] {
        &self.history
    }
}

/// Borrowed view of one subnet.
#[derive(Debug, Clone, Copy)]
pub struct Subnet<'a> {
    id: SubnetId,
    payload: &'a Payload,
    fixed: &'a [bool],
    finalized: bool,
}

impl<'a> Subnet<'a> {
    pub fn id(&self) -> SubnetId {
        self.id
    }

    pub fn weight(&self) -> f64 {
        self.payload.weight
    }

    /// Number of real (non-fixed) member nodes.
    pub fn count_nodes(&self) -> usize {
        self.payload
            .nodes
            .iter()
            .filter(|n| !self.fixed[n.value()])
            .count()
    }

    /// All member nodes, fixed ones included.
    pub fn cycle_nodes(&self) -> impl Iterator<Item = NodeIdx> + 'a {
        self.payload.nodes.iter().copied()
    }

    /// Real (non-fixed) member nodes.
    pub fn real_nodes(&self) -> impl Iterator<Item = NodeIdx> + 'a {
        let fixed = self.fixed;
        self.payload
            .nodes
            .iter()
            .copied()
            .filter(move |n| !fixed[n.value()])
    }

    pub fn segments(&self) -> &'a [SegmentIdx] {
        &self.payload.segments
    }

    pub fn len(&self) -> usize {
        self.payload.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.nodes.is_empty()
    }

    pub fn phase(&self) -> SubnetPhase {
        if self.finalized {
            SubnetPhase::Final
        } else if self.payload.nodes.len() > 1 {
            SubnetPhase::Merged
        } else {
            SubnetPhase::Unmerged
        }
    }
}
