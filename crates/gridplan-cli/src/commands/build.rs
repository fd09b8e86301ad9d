use anyhow::{Context, Result};
use gridplan_algo::{BuildConfig, NetworkBuilder};
use gridplan_cli::{BuildArgs, OutputFormat};
use gridplan_core::{graph_utils, Projection};
use gridplan_io::{
    load_config, load_demand_nodes, load_existing_network, transform_for, write_result,
    BuildResult,
};
use tracing::{info, warn};

use crate::commands::util::{configure_threads, emit};

pub fn handle(args: &BuildArgs) -> Result<()> {
    configure_threads(&args.threads);

    let mut config = match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("loading build config '{}'", path.display()))?,
        None => BuildConfig::default(),
    };
    if let Some(minimum) = args.min_nodes {
        config.algorithm.minimum_node_count_per_subnetwork = minimum;
    }
    if let Some(k) = args.neighbors {
        config.algorithm.maximum_nearest_neighbor_count = k;
    }
    if let Some(path) = &args.existing {
        config.network.existing_networks = Some(path.clone());
    }
    let builder = NetworkBuilder::new(config)?;
    let projection = Projection::from_proj4(args.proj.trim());

    let existing = match &builder.config().network.existing_networks {
        Some(path) => Some(
            load_existing_network(path)
                .with_context(|| format!("loading existing network '{}'", path.display()))?,
        ),
        None => None,
    };
    let transform = existing
        .as_ref()
        .map(|network| transform_for(&network.projection, &projection))
        .transpose()?;

    let load = load_demand_nodes(&args.nodes)
        .with_context(|| format!("loading demand nodes '{}'", args.nodes.display()))?;
    if load.diagnostics.has_issues() {
        warn!("{}", load.diagnostics.summary());
        for issue in &load.diagnostics.issues {
            warn!("{issue}");
        }
    }

    let outcome = match (&existing, &transform) {
        (Some(network), Some(transform)) => {
            builder.build_with_existing(&load.nodes, &projection, network, transform)
        }
        _ => builder.build(&load.nodes, &projection),
    };
    let report = &outcome.report;
    info!(
        subnets = report.subnets_kept,
        pruned = report.subnets_pruned,
        cost = report.accepted_cost,
        "build finished"
    );

    match (args.format, &args.out) {
        (OutputFormat::Json, Some(path)) => {
            let result = BuildResult::from(outcome);
            write_result(path, &result)?;
            println!(
                "Built {} subnet(s) with {} node(s); new segment cost {:.2}",
                result.network.subnets.len(),
                result.network.node_count(),
                result.network.new_segment_cost()
            );
            println!("Result written to {}", path.display());
        }
        (OutputFormat::Json, None) => {
            let payload = serde_json::to_string_pretty(&BuildResult::from(outcome))?;
            emit(None, &payload, "Result")?;
        }
        (OutputFormat::Dot, out) => {
            let dot = graph_utils::export_graph(&outcome.network, "dot")?;
            emit(out.as_deref(), &dot, "Graph")?;
        }
    }
    Ok(())
}
