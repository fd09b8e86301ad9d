//! # gridplan-core: entity model for least-cost network planning
//!
//! Shared records for the planner: demand points, the canonical [`Node`] and
//! [`Segment`] records the entity registry hands out, projection and distance
//! metric selection, and the serializable result of a build.
//!
//! ## Identity
//!
//! Nodes are identified by their exact coordinates. Two inputs with bitwise
//! equal coordinates (after folding `-0.0` into `0.0`) are the same node, and
//! an unordered pair of node coordinates is the same segment. [`CoordKey`] is
//! the hashable form of that identity.
//!
//! Inside one build every consumer holds a [`NodeIdx`]/[`SegmentIdx`] handle
//! into the registry arena rather than a copy of the record, so there is
//! exactly one place each node's state can live.
//!
//! ## Node ids
//!
//! [`NodeId`] values are signed: demand nodes get non-negative ids in input
//! order, nodes belonging to an existing network get negative ids. A negative
//! id marks a *fixed* node, which is exempt from the affordability check.
//!
//! ## Modules
//!
//! - [`metric`] - planar vs. great-circle distance
//! - [`projection`] - proj4 descriptor parsing
//! - [`built`] - the serializable build result
//! - [`graph_utils`] - petgraph view, stats and DOT export of a result
//! - [`existing`] - existing-network input and reprojection hook
//! - [`diagnostics`] - load-time issue collection

use serde::{Deserialize, Serialize};

pub mod built;
pub mod diagnostics;
pub mod error;
pub mod existing;
pub mod graph_utils;
pub mod metric;
pub mod projection;
pub mod units;

pub use built::{BuiltNetwork, SegmentRecord, SubnetRecord};
pub use diagnostics::{DiagnosticIssue, LoadDiagnostics, LoadStats, Severity};
pub use error::{GridplanError, GridplanResult};
pub use existing::{ExistingNetwork, Identity, PointTransform};
pub use metric::{DistanceMetric, EARTH_RADIUS_METERS};
pub use projection::{Projection, ProjectionKind};

/// A point in the active build projection. For geographic projections `x` is
/// longitude and `y` latitude, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
}

impl Coord {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn key(&self) -> CoordKey {
        // + 0.0 folds -0.0 into 0.0
        CoordKey([(self.x + 0.0).to_bits(), (self.y + 0.0).to_bits()])
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn to_array(self) -> [f64; 2] {
        [self.x, self.y]
    }
}

impl From<(f64, f64)> for Coord {
    fn from((x, y): (f64, f64)) -> Self {
        Coord::new(x, y)
    }
}

impl From<[f64; 2]> for Coord {
    fn from([x, y]: [f64; 2]) -> Self {
        Coord::new(x, y)
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Exact-equality hash key for a [`Coord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CoordKey([u64; 2]);

/// Signed node identifier; negative means fixed (existing network).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(i64);

impl NodeId {
    #[inline]
    pub fn new(value: i64) -> Self {
        NodeId(value)
    }
    #[inline]
    pub fn value(&self) -> i64 {
        self.0
    }
    #[inline]
    pub fn is_fixed(&self) -> bool {
        self.0 < 0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Node#{}", self.0)
    }
}

/// Arena handle to a node record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIdx(usize);

impl NodeIdx {
    #[inline]
    pub fn new(value: usize) -> Self {
        NodeIdx(value)
    }
    #[inline]
    pub fn value(&self) -> usize {
        self.0
    }
}

/// Arena handle to a segment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegmentIdx(usize);

impl SegmentIdx {
    #[inline]
    pub fn new(value: usize) -> Self {
        SegmentIdx(value)
    }
    #[inline]
    pub fn value(&self) -> usize {
        self.0
    }
}

/// A located demand point as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandNode {
    pub coord: Coord,
    /// Spending capacity this node brings to whichever subnet it joins
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl DemandNode {
    pub fn new(x: f64, y: f64, weight: f64) -> Self {
        Self {
            coord: Coord::new(x, y),
            weight,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Canonical node record. `weight` is the node's initial budget; during a
/// build the live value belongs to the node's subnet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub coord: Coord,
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Node {
    #[inline]
    pub fn is_fixed(&self) -> bool {
        self.id.is_fixed()
    }
}

/// Canonical segment record between two distinct nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub endpoints: [NodeIdx; 2],
    pub cost: f64,
    /// Part of a pre-existing network rather than a candidate to build
    pub is_existing: bool,
}

impl Segment {
    #[inline]
    pub fn nodes(&self) -> (NodeIdx, NodeIdx) {
        (self.endpoints[0], self.endpoints[1])
    }
}
