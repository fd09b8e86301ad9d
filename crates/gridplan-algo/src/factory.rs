//! Entity factory: the single source of node and segment identity.
//!
//! Everything the planner builds goes through one [`EntityFactory`]. Nodes are
//! keyed by exact coordinates and segments by their unordered endpoint pair,
//! so asking twice for the same thing returns the same [`NodeIdx`] or
//! [`SegmentIdx`]. Weight bookkeeping downstream depends on that: if two
//! handles existed for one location, budget merged into one of them would
//! never be seen by the other.
//!
//! The factory is mutable only while candidates are generated.
//! [`EntityFactory::finish`] turns it into a read-only [`EntityRegistry`],
//! which is all the merge loop ever sees.

use gridplan_core::{
    Coord, CoordKey, DemandNode, DistanceMetric, Node, NodeId, NodeIdx, Segment, SegmentIdx,
};
use std::collections::HashMap;
use tracing::debug;

use crate::config::CostConfig;

#[derive(Debug)]
pub struct EntityFactory {
    metric: DistanceMetric,
    unit_cost: f64,
    existing_segment_cost: f64,
    nodes: Vec<Node>,
    node_index: HashMap<CoordKey, NodeIdx>,
    segments: Vec<Segment>,
    segment_index: HashMap<(CoordKey, CoordKey), SegmentIdx>,
    demand_count: usize,
    duplicate_count: usize,
    next_fixed_id: i64,
}

impl EntityFactory {
    /// Register the demand nodes. Ids follow input order over distinct
    /// coordinates; when a coordinate repeats, the first row wins.
    pub fn new(demand: &[DemandNode], metric: DistanceMetric, cost: &CostConfig) -> Self {
        let mut factory = Self {
            metric,
            unit_cost: cost.unit_cost,
            existing_segment_cost: cost.existing_segment_cost,
            nodes: Vec::with_capacity(demand.len()),
            node_index: HashMap::with_capacity(demand.len()),
            segments: Vec::new(),
            segment_index: HashMap::new(),
            demand_count: 0,
            duplicate_count: 0,
            next_fixed_id: -1,
        };
        for point in demand {
            let key = point.coord.key();
            if factory.node_index.contains_key(&key) {
                factory.duplicate_count += 1;
                debug!(coord = %point.coord, "duplicate demand coordinate; keeping first");
                continue;
            }
            let id = NodeId::new(factory.nodes.len() as i64);
            factory.insert_node(Node {
                id,
                coord: point.coord,
                weight: point.weight,
                label: point.label.clone(),
            });
        }
        factory.demand_count = factory.nodes.len();
        factory
    }

    fn insert_node(&mut self, node: Node) -> NodeIdx {
        let idx = NodeIdx::new(self.nodes.len());
        self.node_index.insert(node.coord.key(), idx);
        self.nodes.push(node);
        idx
    }

    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    /// The canonical demand nodes, deduplicated by coordinate.
    pub fn get_nodes(&self) -> &[Node] {
        &self.nodes[..self.demand_count]
    }

    pub fn demand_count(&self) -> usize {
        self.demand_count
    }

    /// Demand rows dropped because their coordinates repeated an earlier row.
    pub fn duplicate_count(&self) -> usize {
        self.duplicate_count
    }

    pub fn node(&self, idx: NodeIdx) -> &Node {
        &self.nodes[idx.value()]
    }

    pub fn node_at(&self, coord: Coord) -> Option<NodeIdx> {
        self.node_index.get(&coord.key()).copied()
    }

    pub fn segment(&self, idx: SegmentIdx) -> &Segment {
        &self.segments[idx.value()]
    }

    /// The node at `coord`, creating a fixed (negative id, zero weight) node
    /// if nothing is registered there yet.
    pub fn fixed_node(&mut self, coord: Coord) -> NodeIdx {
        if let Some(idx) = self.node_at(coord) {
            return idx;
        }
        let id = NodeId::new(self.next_fixed_id);
        self.next_fixed_id -= 1;
        self.insert_node(Node {
            id,
            coord,
            weight: 0.0,
            label: None,
        })
    }

    /// The canonical segment between two coordinates, in either order.
    ///
    /// New segments cost `distance * unit_cost`, or the configured existing
    /// segment cost when `is_existing` is set. Coordinates with no registered
    /// node become fixed nodes. Returns `None` when both coordinates resolve
    /// to the same node.
    pub fn get_segment(&mut self, a: Coord, b: Coord, is_existing: bool) -> Option<SegmentIdx> {
        let (key_a, key_b) = (a.key(), b.key());
        if key_a == key_b {
            return None;
        }
        let pair = if key_a < key_b {
            (key_a, key_b)
        } else {
            (key_b, key_a)
        };
        if let Some(&idx) = self.segment_index.get(&pair) {
            return Some(idx);
        }
        let node_a = self.fixed_node(a);
        let node_b = self.fixed_node(b);
        let cost = if is_existing {
            self.existing_segment_cost
        } else {
            self.metric.distance(a, b) * self.unit_cost
        };
        let idx = SegmentIdx::new(self.segments.len());
        self.segments.push(Segment {
            endpoints: [node_a, node_b],
            cost,
            is_existing,
        });
        self.segment_index.insert(pair, idx);
        Some(idx)
    }

    /// Freeze the registry; no further entities can be created.
    pub fn finish(self) -> EntityRegistry {
        debug!(
            nodes = self.nodes.len(),
            segments = self.segments.len(),
            "entity registry finalized"
        );
        EntityRegistry {
            metric: self.metric,
            nodes: self.nodes,
            segments: self.segments,
            demand_count: self.demand_count,
            duplicate_count: self.duplicate_count,
        }
    }
}

/// Read-only view of every node and segment created during one build.
#[derive(Debug)]
pub struct EntityRegistry {
    metric: DistanceMetric,
    nodes: Vec<Node>,
    segments: Vec<Segment>,
    demand_count: usize,
    duplicate_count: usize,
}

impl EntityRegistry {
    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    pub fn node(&self, idx: NodeIdx) -> &Node {
        &self.nodes[idx.value()]
    }

    pub fn segment(&self, idx: SegmentIdx) -> &Segment {
        &self.segments[idx.value()]
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn demand_count(&self) -> usize {
        self.demand_count
    }

    pub fn fixed_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_fixed()).count()
    }

    pub fn duplicate_count(&self) -> usize {
        self.duplicate_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factory(points: &[(f64, f64, f64)]) -> EntityFactory {
        let demand: Vec<DemandNode> = points
            .iter()
            .map(|&(x, y, w)| DemandNode::new(x, y, w))
            .collect();
        EntityFactory::new(&demand, DistanceMetric::Planar, &CostConfig::default())
    }

    #[test]
    fn test_nodes_deduplicated_by_coordinate() {
        let f = factory(&[(0.0, 0.0, 1.0), (1.0, 0.0, 2.0), (0.0, 0.0, 9.0)]);
        assert_eq!(f.get_nodes().len(), 2);
        assert_eq!(f.duplicate_count(), 1);
        let idx = f.node_at(Coord::new(0.0, 0.0)).unwrap();
        assert_eq!(f.node(idx).weight, 1.0);
        assert_eq!(f.node(idx).id, NodeId::new(0));
        assert_eq!(f.node_at(Coord::new(1.0, 0.0)), Some(NodeIdx::new(1)));
    }

    #[test]
    fn test_segment_identity_ignores_order() {
        let mut f = factory(&[(0.0, 0.0, 1.0), (3.0, 4.0, 1.0)]);
        let a = Coord::new(0.0, 0.0);
        let b = Coord::new(3.0, 4.0);
        let forward = f.get_segment(a, b, false).unwrap();
        let backward = f.get_segment(b, a, false).unwrap();
        assert_eq!(forward, backward);
        let registry = f.finish();
        assert_eq!(registry.segments().len(), 1);
        assert_eq!(registry.segment(forward).cost, 5.0);
    }

    #[test]
    fn test_degenerate_segment_rejected() {
        let mut f = factory(&[(1.0, 1.0, 1.0)]);
        let c = Coord::new(1.0, 1.0);
        assert_eq!(f.get_segment(c, c, false), None);
    }

    #[test]
    fn test_unit_cost_scales_distance() {
        let demand = vec![DemandNode::new(0.0, 0.0, 1.0), DemandNode::new(2.0, 0.0, 1.0)];
        let cost = CostConfig {
            unit_cost: 2.5,
            existing_segment_cost: 0.0,
        };
        let mut f = EntityFactory::new(&demand, DistanceMetric::Planar, &cost);
        let seg = f
            .get_segment(Coord::new(0.0, 0.0), Coord::new(2.0, 0.0), false)
            .unwrap();
        assert_eq!(f.finish().segment(seg).cost, 5.0);
    }

    #[test]
    fn test_existing_segments_create_fixed_nodes() {
        let mut f = factory(&[(0.0, 0.0, 1.0)]);
        let seg = f
            .get_segment(Coord::new(5.0, 0.0), Coord::new(6.0, 0.0), true)
            .unwrap();
        let reg = f.finish();
        let s = reg.segment(seg);
        assert!(s.is_existing);
        assert_eq!(s.cost, 0.0);
        let (a, b) = s.nodes();
        assert_eq!(reg.node(a).id, NodeId::new(-1));
        assert_eq!(reg.node(b).id, NodeId::new(-2));
        assert_eq!(reg.fixed_count(), 2);
        assert_eq!(reg.demand_count(), 1);
    }

    #[test]
    fn test_fixed_node_reuses_registered_demand_node() {
        let mut f = factory(&[(5.0, 0.0, 3.0)]);
        let idx = f.fixed_node(Coord::new(5.0, 0.0));
        assert_eq!(f.node(idx).id, NodeId::new(0));
        assert!(!f.node(idx).is_fixed());
    }
}
