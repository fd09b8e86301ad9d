//! Budget-constrained spanning forest construction.
//!
//! A modified Kruskal pass over the candidate segments:
//!
//! ```text
//! for segment in candidates sorted by cost:
//!     (a, b) = endpoints
//!     a qualifies  ⇔  weight(subnet(a)) ≥ cost  or  a is fixed
//!     b qualifies  ⇔  weight(subnet(b)) ≥ cost  or  b is fixed
//!     if both qualify and subnet(a) ≠ subnet(b):
//!         merge; merged weight = weight(a) + weight(b) − cost
//! drop subnets with fewer than `minimum_node_count_per_subnetwork` real nodes
//! ```
//!
//! The pass is greedy: a rejected segment is never reconsidered, and each
//! decision sees every weight change made before it, so the loop is strictly
//! sequential. Nodes that cannot afford any connection end up in small
//! subnets that pruning removes; nothing in the loop is an error.
//!
//! # Tie-breaking
//!
//! Equal-cost candidates are ordered by their endpoint coordinates
//! (lexicographically smaller endpoint pair first), then by generation order.

use gridplan_core::{
    BuiltNetwork, Coord, DemandNode, DistanceMetric, ExistingNetwork, GridplanResult, NodeIdx,
    PointTransform, Projection, SegmentIdx, SegmentRecord, SubnetRecord,
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, info};

use crate::candidates::{CandidateGraph, CandidateGraphBuilder};
use crate::config::BuildConfig;
use crate::factory::EntityRegistry;
use crate::network::{Network, Subnet};

/// Counters describing one build.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildReport {
    pub demand_nodes: usize,
    /// Demand rows folded into an earlier row with identical coordinates
    pub duplicate_nodes: usize,
    pub fixed_nodes: usize,
    pub candidates: usize,
    pub projection_candidates: usize,
    pub accepted: usize,
    pub rejected_cycle: usize,
    pub rejected_unaffordable: usize,
    pub subnets_before_pruning: usize,
    pub subnets_pruned: usize,
    pub subnets_kept: usize,
    /// Total cost of accepted (new) segments over all subnets, pruned included
    pub accepted_cost: f64,
}

#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub network: BuiltNetwork,
    pub report: BuildReport,
}

/// What the merge loop decided for one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accepted,
    RejectedCycle,
    RejectedUnaffordable,
}

#[derive(Debug, Clone)]
pub struct NetworkBuilder {
    config: BuildConfig,
}

impl NetworkBuilder {
    pub fn new(config: BuildConfig) -> GridplanResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Plan a network over `nodes` alone.
    pub fn build(&self, nodes: &[DemandNode], projection: &Projection) -> BuildOutcome {
        self.run(nodes, projection, None)
    }

    /// Plan a network over `nodes` that may attach to `existing`, whose
    /// coordinates `transform` maps into `projection`.
    pub fn build_with_existing(
        &self,
        nodes: &[DemandNode],
        projection: &Projection,
        existing: &ExistingNetwork,
        transform: &dyn PointTransform,
    ) -> BuildOutcome {
        self.run(nodes, projection, Some((existing, transform)))
    }

    fn run(
        &self,
        nodes: &[DemandNode],
        projection: &Projection,
        existing: Option<(&ExistingNetwork, &dyn PointTransform)>,
    ) -> BuildOutcome {
        let metric = DistanceMetric::for_projection(projection);
        info!(
            nodes = nodes.len(),
            planar = metric.is_planar(),
            existing = existing.is_some(),
            "building network"
        );
        let mut generator = CandidateGraphBuilder::new(metric, &self.config);
        if let Some((network, transform)) = existing {
            generator = generator.with_existing(network, transform);
        }
        let CandidateGraph {
            registry,
            candidates,
            mut network,
            projection_candidates,
        } = generator.build(nodes);

        let mut report = BuildReport {
            demand_nodes: registry.demand_count(),
            duplicate_nodes: registry.duplicate_count(),
            fixed_nodes: registry.fixed_count(),
            candidates: candidates.len(),
            projection_candidates,
            ..BuildReport::default()
        };

        let ordered = sort_candidates(&registry, candidates);
        for idx in ordered {
            match merge_candidate(&registry, &mut network, idx) {
                Decision::Accepted => {
                    report.accepted += 1;
                    report.accepted_cost += registry.segment(idx).cost;
                }
                Decision::RejectedCycle => report.rejected_cycle += 1,
                Decision::RejectedUnaffordable => report.rejected_unaffordable += 1,
            }
        }
        network.finalize();

        let minimum = self.config.algorithm.minimum_node_count_per_subnetwork;
        report.subnets_before_pruning = network.subnet_count();
        let subnets: Vec<SubnetRecord> = network
            .cycle_subnets()
            .filter(|subnet| subnet.count_nodes() >= minimum)
            .map(|subnet| subnet_record(&registry, &subnet))
            .collect();
        report.subnets_kept = subnets.len();
        report.subnets_pruned = report.subnets_before_pruning - report.subnets_kept;
        debug!(
            minimum,
            pruned = report.subnets_pruned,
            kept = report.subnets_kept,
            "small subnets pruned"
        );
        info!(
            accepted = report.accepted,
            rejected_cycle = report.rejected_cycle,
            rejected_unaffordable = report.rejected_unaffordable,
            subnets = report.subnets_kept,
            "network built"
        );

        BuildOutcome {
            network: BuiltNetwork {
                projection: projection.clone(),
                subnets,
            },
            report,
        }
    }
}

/// Stable ascending sort by cost, ties broken by endpoint coordinates.
pub fn sort_candidates(registry: &EntityRegistry, mut candidates: Vec<SegmentIdx>) -> Vec<SegmentIdx> {
    candidates.sort_by(|&a, &b| compare_candidates(registry, a, b));
    debug!(candidates = candidates.len(), "candidates sorted");
    candidates
}

fn compare_candidates(registry: &EntityRegistry, a: SegmentIdx, b: SegmentIdx) -> Ordering {
    let (sa, sb) = (registry.segment(a), registry.segment(b));
    sa.cost
        .total_cmp(&sb.cost)
        .then_with(|| compare_pairs(endpoint_pair(registry, a), endpoint_pair(registry, b)))
}

fn endpoint_pair(registry: &EntityRegistry, idx: SegmentIdx) -> (Coord, Coord) {
    let (a, b) = registry.segment(idx).nodes();
    let (ca, cb) = (registry.node(a).coord, registry.node(b).coord);
    if compare_coords(ca, cb) == Ordering::Greater {
        (cb, ca)
    } else {
        (ca, cb)
    }
}

fn compare_coords(a: Coord, b: Coord) -> Ordering {
    a.x.total_cmp(&b.x).then_with(|| a.y.total_cmp(&b.y))
}

fn compare_pairs(a: (Coord, Coord), b: (Coord, Coord)) -> Ordering {
    compare_coords(a.0, b.0).then_with(|| compare_coords(a.1, b.1))
}

/// A node can take part in a segment if its subnet can pay for it or the
/// node belongs to the existing network.
pub fn qualifies(registry: &EntityRegistry, network: &Network, node: NodeIdx, cost: f64) -> bool {
    network.weight_of(node) >= cost || registry.node(node).is_fixed()
}

/// Apply the affordability predicate to both endpoints and merge if allowed.
pub fn merge_candidate(registry: &EntityRegistry, network: &mut Network, idx: SegmentIdx) -> Decision {
    let segment = registry.segment(idx);
    let (a, b) = segment.nodes();
    if !qualifies(registry, network, a, segment.cost) || !qualifies(registry, network, b, segment.cost) {
        return Decision::RejectedUnaffordable;
    }
    match network.add_segment(idx, segment) {
        Some(_) => Decision::Accepted,
        None => Decision::RejectedCycle,
    }
}

fn subnet_record(registry: &EntityRegistry, subnet: &Subnet<'_>) -> SubnetRecord {
    let weight = subnet.weight();
    let mut members: Vec<NodeIdx> = subnet.cycle_nodes().collect();
    members.sort_unstable();
    let nodes = members
        .into_iter()
        .map(|idx| {
            let mut node = registry.node(idx).clone();
            node.weight = weight;
            node
        })
        .collect();
    let segments = subnet
        .segments()
        .iter()
        .map(|&idx| {
            let segment = registry.segment(idx);
            let (a, b) = segment.nodes();
            let (na, nb) = (registry.node(a), registry.node(b));
            SegmentRecord {
                from: na.id,
                to: nb.id,
                from_coord: na.coord,
                to_coord: nb.coord,
                cost: segment.cost,
                is_existing: segment.is_existing,
            }
        })
        .collect();
    SubnetRecord {
        weight,
        nodes,
        segments,
    }
}
