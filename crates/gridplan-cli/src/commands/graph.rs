use anyhow::{Context, Result};
use gridplan_core::graph_utils;
use gridplan_io::read_result;
use std::path::Path;

use crate::commands::util::emit;

pub fn stats(result: &Path) -> Result<()> {
    let loaded =
        read_result(result).with_context(|| format!("reading result '{}'", result.display()))?;
    let stats = graph_utils::graph_stats(&loaded.network)?;
    println!("Network statistics for {}:", result.display());
    println!("  Subnets       : {}", loaded.network.subnets.len());
    println!("  Nodes         : {}", stats.node_count);
    println!("  Fixed nodes   : {}", stats.fixed_node_count);
    println!("  Segments      : {}", stats.edge_count);
    println!("  Existing      : {}", stats.existing_edge_count);
    println!("  Components    : {}", stats.connected_components);
    println!(
        "  Degree [min/avg/max]: {}/{:.2}/{}",
        stats.min_degree, stats.avg_degree, stats.max_degree
    );
    println!("  New cost      : {:.2}", stats.new_segment_cost);
    Ok(())
}

pub fn export(result: &Path, format: &str, out: Option<&Path>) -> Result<()> {
    let loaded =
        read_result(result).with_context(|| format!("reading result '{}'", result.display()))?;
    let dot = graph_utils::export_graph(&loaded.network, format)?;
    emit(out, &dot, "Graph")
}
