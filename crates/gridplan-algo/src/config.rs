//! Build parameters.
//!
//! [`BuildConfig`] is handed to [`crate::NetworkBuilder::new`] explicitly; the
//! section layout (`[algorithm]`, `[network]`, `[cost]`) follows the planner's
//! configuration files, and the long-form option names used by older
//! scenario files are accepted as aliases.

use gridplan_core::{GridplanError, GridplanResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildConfig {
    #[serde(default)]
    pub algorithm: AlgorithmConfig,
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub cost: CostConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmConfig {
    /// Subnets with fewer real nodes than this are dropped from the result
    #[serde(
        default = "default_minimum_node_count",
        alias = "minimum node count per subnetwork"
    )]
    pub minimum_node_count_per_subnetwork: usize,
    /// Neighbors queried per node when generating candidates
    #[serde(
        default = "default_nearest_neighbor_count",
        alias = "maximum nearest neighbor count"
    )]
    pub maximum_nearest_neighbor_count: usize,
}

fn default_minimum_node_count() -> usize {
    2
}

fn default_nearest_neighbor_count() -> usize {
    5
}

impl Default for AlgorithmConfig {
    fn default() -> Self {
        Self {
            minimum_node_count_per_subnetwork: default_minimum_node_count(),
            maximum_nearest_neighbor_count: default_nearest_neighbor_count(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Archive (or GeoJSON file) holding the existing network, if any
    #[serde(default, alias = "existing networks")]
    pub existing_networks: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostConfig {
    /// Cost per unit of distance for a new segment
    #[serde(default = "default_unit_cost")]
    pub unit_cost: f64,
    /// Cost recorded on segments of the existing network
    #[serde(default)]
    pub existing_segment_cost: f64,
}

fn default_unit_cost() -> f64 {
    1.0
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            unit_cost: default_unit_cost(),
            existing_segment_cost: 0.0,
        }
    }
}

impl BuildConfig {
    pub fn with_minimum_node_count(mut self, count: usize) -> Self {
        self.algorithm.minimum_node_count_per_subnetwork = count;
        self
    }

    pub fn with_nearest_neighbor_count(mut self, count: usize) -> Self {
        self.algorithm.maximum_nearest_neighbor_count = count;
        self
    }

    pub fn with_unit_cost(mut self, unit_cost: f64) -> Self {
        self.cost.unit_cost = unit_cost;
        self
    }

    pub fn validate(&self) -> GridplanResult<()> {
        if self.algorithm.maximum_nearest_neighbor_count == 0 {
            return Err(GridplanError::Config(
                "maximum nearest neighbor count must be at least 1".into(),
            ));
        }
        let unit_cost = self.cost.unit_cost;
        if !unit_cost.is_finite() || unit_cost < 0.0 {
            return Err(GridplanError::Config(format!(
                "unit cost must be a finite nonnegative number, got {unit_cost}"
            )));
        }
        let existing_cost = self.cost.existing_segment_cost;
        if !existing_cost.is_finite() || existing_cost < 0.0 {
            return Err(GridplanError::Config(format!(
                "existing segment cost must be a finite nonnegative number, got {existing_cost}"
            )));
        }
        if let Some(path) = &self.network.existing_networks {
            if path.as_os_str().is_empty() {
                return Err(GridplanError::Config(
                    "existing networks path is set but empty".into(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BuildConfig::default();
        assert_eq!(config.algorithm.minimum_node_count_per_subnetwork, 2);
        assert_eq!(config.algorithm.maximum_nearest_neighbor_count, 5);
        assert_eq!(config.network.existing_networks, None);
        assert_eq!(config.cost.unit_cost, 1.0);
        assert_eq!(config.cost.existing_segment_cost, 0.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: BuildConfig =
            serde_json::from_str(r#"{"algorithm": {"maximum_nearest_neighbor_count": 8}}"#)
                .unwrap();
        assert_eq!(config.algorithm.maximum_nearest_neighbor_count, 8);
        assert_eq!(config.algorithm.minimum_node_count_per_subnetwork, 2);
    }

    #[test]
    fn test_long_form_aliases() {
        let config: BuildConfig = serde_json::from_str(
            r#"{"algorithm": {"minimum node count per subnetwork": 4},
                "network": {"existing networks": "grid.zip"}}"#,
        )
        .unwrap();
        assert_eq!(config.algorithm.minimum_node_count_per_subnetwork, 4);
        assert_eq!(
            config.network.existing_networks,
            Some(PathBuf::from("grid.zip"))
        );
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let zero_k = BuildConfig::default().with_nearest_neighbor_count(0);
        assert!(matches!(zero_k.validate(), Err(GridplanError::Config(_))));

        let negative_cost = BuildConfig::default().with_unit_cost(-1.0);
        assert!(negative_cost.validate().is_err());

        let nan_cost = BuildConfig::default().with_unit_cost(f64::NAN);
        assert!(nan_cost.validate().is_err());
    }
}
