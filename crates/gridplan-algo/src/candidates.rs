//! Candidate segment generation.
//!
//! Candidates come from two sources:
//!
//! 1. With an existing network: one segment per demand node to the closest
//!    point on that network. The existing network itself becomes one
//!    pre-built subnet of fixed nodes.
//! 2. For every demand node, segments to its `k` nearest demand nodes.
//!
//! Limiting candidates to nearest neighbors keeps the candidate set at
//! O(n·k) instead of O(n²); the builder sorts the whole set afterwards.

use gridplan_core::{
    Coord, DemandNode, DistanceMetric, ExistingNetwork, NodeIdx, PointTransform, SegmentIdx,
};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::collections::HashSet;
use tracing::debug;

use crate::config::BuildConfig;
use crate::factory::{EntityFactory, EntityRegistry};
use crate::network::Network;
use crate::project::ExistingProjector;
use crate::spatial::SpatialIndex;

/// Output of candidate generation: a frozen registry, the candidate list in
/// generation order, and the initial network.
#[derive(Debug)]
pub struct CandidateGraph {
    pub registry: EntityRegistry,
    pub candidates: Vec<SegmentIdx>,
    pub network: Network,
    /// Candidates that connect a demand node to the existing network
    pub projection_candidates: usize,
}

pub struct CandidateGraphBuilder<'a> {
    metric: DistanceMetric,
    config: &'a BuildConfig,
    existing: Option<(&'a ExistingNetwork, &'a dyn PointTransform)>,
}

impl<'a> CandidateGraphBuilder<'a> {
    pub fn new(metric: DistanceMetric, config: &'a BuildConfig) -> Self {
        Self {
            metric,
            config,
            existing: None,
        }
    }

    /// Attach an existing network, mapped into the build projection by
    /// `transform`.
    pub fn with_existing(
        mut self,
        existing: &'a ExistingNetwork,
        transform: &'a dyn PointTransform,
    ) -> Self {
        self.existing = Some((existing, transform));
        self
    }

    pub fn build(self, demand: &[DemandNode]) -> CandidateGraph {
        let mut factory = EntityFactory::new(demand, self.metric, &self.config.cost);
        let mut candidates = Vec::new();
        let mut seen = HashSet::new();
        let mut seed_nodes: Vec<NodeIdx> = Vec::new();
        let mut existing_segments: Vec<SegmentIdx> = Vec::new();

        if let Some((existing, transform)) = self.existing {
            let lines: Vec<(Coord, Coord)> = existing
                .transformed(transform)
                .filter(|(a, b)| a.key() != b.key())
                .collect();
            for &(a, b) in &lines {
                if let Some(idx) = factory.get_segment(a, b, true) {
                    if seen.insert(idx) {
                        existing_segments.push(idx);
                        let (na, nb) = factory.segment(idx).nodes();
                        seed_nodes.extend([na, nb]);
                    }
                }
            }
            let projector = ExistingProjector::new(lines);
            let demand_coords: Vec<Coord> =
                factory.get_nodes().iter().map(|node| node.coord).collect();
            for (i, coord) in demand_coords.into_iter().enumerate() {
                let Some(tap) = projector.nearest_point(coord) else {
                    continue;
                };
                if tap.key() == coord.key() {
                    // already on the network
                    seed_nodes.push(NodeIdx::new(i));
                    continue;
                }
                let tap_node = factory.fixed_node(tap);
                if factory.node(tap_node).is_fixed() {
                    seed_nodes.push(tap_node);
                }
                if let Some(idx) = factory.get_segment(coord, tap, false) {
                    if seen.insert(idx) {
                        candidates.push(idx);
                    }
                }
            }
            debug!(
                existing_segments = existing_segments.len(),
                projections = candidates.len(),
                "existing network registered"
            );
        }
        let projection_candidates = candidates.len();

        let coords: Vec<Coord> = factory.get_nodes().iter().map(|node| node.coord).collect();
        let k = self.config.algorithm.maximum_nearest_neighbor_count;
        let neighbors = nearest_neighbors(&coords, self.metric, k);
        for (i, near) in neighbors.into_iter().enumerate() {
            for j in near {
                if j == i {
                    continue;
                }
                if let Some(idx) = factory.get_segment(coords[i], coords[j], false) {
                    if seen.insert(idx) {
                        candidates.push(idx);
                    }
                }
            }
        }
        debug!(
            demand_nodes = coords.len(),
            k,
            candidates = candidates.len(),
            "candidate segments generated"
        );

        let registry = factory.finish();
        let mut network = Network::new(&registry);
        if !existing_segments.is_empty() || !seed_nodes.is_empty() {
            network.seed_existing(&seed_nodes, &existing_segments);
        }
        CandidateGraph {
            registry,
            candidates,
            network,
            projection_candidates,
        }
    }
}

/// Per-node neighbor lists. Queries are independent, so they run in parallel
/// when the `parallel` feature is on; output order is always node order.
fn nearest_neighbors(coords: &[Coord], metric: DistanceMetric, k: usize) -> Vec<Vec<usize>> {
    let index = SpatialIndex::build(coords, metric);
    #[cfg(feature = "parallel")]
    {
        coords.par_iter().map(|&c| index.k_nearest(c, k)).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        coords.iter().map(|&c| index.k_nearest(c, k)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridplan_core::{Identity, NodeId, Projection};

    fn demand() -> Vec<DemandNode> {
        vec![
            DemandNode::new(0.0, 0.0, 10.0),
            DemandNode::new(1.0, 0.0, 10.0),
            DemandNode::new(2.0, 0.0, 10.0),
            DemandNode::new(10.0, 10.0, 1.0),
        ]
    }

    #[test]
    fn test_knn_candidates_are_deduplicated() {
        let config = BuildConfig::default().with_nearest_neighbor_count(2);
        let graph = CandidateGraphBuilder::new(DistanceMetric::Planar, &config).build(&demand());
        // (0,0)-(1,0), (1,0)-(2,0) shared by both directions, plus (10,10)-(2,0)
        assert_eq!(graph.candidates.len(), 3);
        let unique: HashSet<_> = graph.candidates.iter().collect();
        assert_eq!(unique.len(), graph.candidates.len());
        assert_eq!(graph.projection_candidates, 0);
        assert_eq!(graph.network.subnet_count(), 4);
    }

    #[test]
    fn test_no_self_segments() {
        let config = BuildConfig::default();
        let graph = CandidateGraphBuilder::new(DistanceMetric::Planar, &config).build(&demand());
        for &idx in &graph.candidates {
            let (a, b) = graph.registry.segment(idx).nodes();
            assert_ne!(a, b);
        }
    }

    #[test]
    fn test_empty_input() {
        let config = BuildConfig::default();
        let graph = CandidateGraphBuilder::new(DistanceMetric::Planar, &config).build(&[]);
        assert!(graph.candidates.is_empty());
        assert_eq!(graph.network.subnet_count(), 0);
    }

    #[test]
    fn test_existing_network_seeds_one_subnet() {
        let existing = ExistingNetwork::new(
            Projection::from_proj4("+units=m"),
            vec![
                (Coord::new(0.0, 5.0), Coord::new(4.0, 5.0)),
                (Coord::new(20.0, 5.0), Coord::new(24.0, 5.0)),
            ],
        );
        let demand = vec![DemandNode::new(1.0, 0.0, 10.0), DemandNode::new(2.0, 0.0, 10.0)];
        let config = BuildConfig::default();
        let graph = CandidateGraphBuilder::new(DistanceMetric::Planar, &config)
            .with_existing(&existing, &Identity)
            .build(&demand);

        assert_eq!(graph.projection_candidates, 2);
        // two demand singletons + one existing subnet (4 vertices + 2 taps)
        assert_eq!(graph.network.subnet_count(), 3);
        let existing_subnet = graph
            .network
            .cycle_subnets()
            .find(|s| s.len() > 1)
            .unwrap();
        assert_eq!(existing_subnet.len(), 6);
        assert_eq!(existing_subnet.count_nodes(), 0);
        assert_eq!(existing_subnet.weight(), 0.0);
        assert_eq!(existing_subnet.segments().len(), 2);

        let tap = graph.registry.segment(graph.candidates[0]);
        assert!(!tap.is_existing);
        assert_eq!(tap.cost, 5.0);
        let (a, b) = tap.nodes();
        assert_eq!(graph.registry.node(a).id, NodeId::new(0));
        assert!(graph.registry.node(b).is_fixed());
    }

    #[test]
    fn test_demand_node_on_existing_vertex_joins_existing_subnet() {
        let existing = ExistingNetwork::new(
            Projection::from_proj4("+units=m"),
            vec![(Coord::new(0.0, 0.0), Coord::new(3.0, 0.0))],
        );
        let demand = vec![DemandNode::new(0.0, 0.0, 7.0), DemandNode::new(0.0, 4.0, 7.0)];
        let config = BuildConfig::default();
        let graph = CandidateGraphBuilder::new(DistanceMetric::Planar, &config)
            .with_existing(&existing, &Identity)
            .build(&demand);
        let root = graph.network.find_readonly(NodeIdx::new(0));
        let subnet = graph.network.subnet(root).unwrap();
        assert_eq!(subnet.count_nodes(), 1);
        assert_eq!(subnet.weight(), 7.0);
        // (0,4) taps the network at its own vertex (0,0), which is a demand node
        assert_eq!(graph.projection_candidates, 1);
    }
}
