//! # gridplan-algo: least-cost network planning
//!
//! Builds a forest of subnets over weighted demand nodes. Each node carries a
//! budget (its weight); connecting two subnets spends part of their combined
//! budget on the segment between them.
//!
//! ## Pipeline
//!
//! | Stage | Type | Role |
//! |-------|------|------|
//! | Nearest neighbors | [`SpatialIndex`] | k closest demand nodes per node |
//! | Identity | [`EntityFactory`] | one handle per coordinate and per node pair |
//! | Candidates | [`CandidateGraphBuilder`] | kNN segments plus taps onto an existing network |
//! | Merging | [`Network`] | disjoint subnets with shared residual weight |
//! | Orchestration | [`NetworkBuilder`] | sort, merge, prune, report |
//!
//! ## Example
//!
//! ```ignore
//! use gridplan_algo::{BuildConfig, NetworkBuilder};
//! use gridplan_core::{DemandNode, Projection};
//!
//! let builder = NetworkBuilder::new(BuildConfig::default())?;
//! let outcome = builder.build(&nodes, &Projection::from_proj4("+proj=utm +zone=33 +units=m"));
//! println!("{} subnets", outcome.network.subnets.len());
//! ```

pub mod builder;
pub mod candidates;
pub mod config;
pub mod factory;
pub mod network;
pub mod project;
pub mod spatial;

pub use builder::{BuildOutcome, BuildReport, Decision, NetworkBuilder};
pub use candidates::{CandidateGraph, CandidateGraphBuilder};
pub use config::{AlgorithmConfig, BuildConfig, CostConfig, NetworkConfig};
pub use factory::{EntityFactory, EntityRegistry};
pub use network::{Network, Subnet, SubnetId, SubnetPhase};
pub use project::ExistingProjector;
pub use spatial::SpatialIndex;
