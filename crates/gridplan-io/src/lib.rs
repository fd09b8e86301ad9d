//! # gridplan-io: planner inputs and outputs
//!
//! Everything that touches the filesystem lives here, so the algorithm crate
//! only ever sees in-memory values.
//!
//! | Input / output | Entry point | Formats |
//! |----------------|-------------|---------|
//! | Demand nodes | [`load_demand_nodes`] | CSV `x,y,weight[,label]` |
//! | Build configuration | [`load_config`] | TOML, YAML, JSON |
//! | Existing network | [`load_existing_network`] | `.zip` with GeoJSON, bare GeoJSON |
//! | Reprojection | [`transform_for`] | identity, longlat ↔ web mercator |
//! | Result | [`write_result`] / [`read_result`] | JSON |
//!
//! Row-level problems in demand files are collected in
//! [`gridplan_core::LoadDiagnostics`] rather than failing the load.
//! Problems that make a build meaningless (missing archive, unknown
//! projection pair, invalid configuration) are
//! [`gridplan_core::GridplanError::Config`] errors.

pub mod config;
pub mod existing;
pub mod nodes;
pub mod reproject;
pub mod result;

pub use config::{load_config, parse_config, ConfigFormat};
pub use existing::{load_existing_network, parse_geojson};
pub use nodes::{load_demand_nodes, read_demand_nodes, DemandLoad};
pub use reproject::{transform_for, Reprojection};
pub use result::{read_result, write_result, BuildResult};
