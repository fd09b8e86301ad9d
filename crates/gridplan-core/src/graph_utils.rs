use crate::{BuiltNetwork, NodeId};
use anyhow::{anyhow, Result};
use petgraph::algo::connected_components;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

/// Summary statistics produced by `gridplan stats`.
#[derive(Debug)]
pub struct GraphStats {
    pub node_count: usize,
    pub fixed_node_count: usize,
    pub edge_count: usize,
    pub existing_edge_count: usize,
    pub connected_components: usize,
    pub min_degree: usize,
    pub avg_degree: f64,
    pub max_degree: usize,
    pub new_segment_cost: f64,
}

/// Undirected petgraph view of a built network. Node weights are the node
/// ids, edge weights the segment costs.
pub fn to_graph(network: &BuiltNetwork) -> UnGraph<NodeId, f64> {
    let mut graph = UnGraph::new_undirected();
    let mut index: HashMap<NodeId, NodeIndex> = HashMap::new();
    for subnet in &network.subnets {
        for node in &subnet.nodes {
            index
                .entry(node.id)
                .or_insert_with(|| graph.add_node(node.id));
        }
        for segment in &subnet.segments {
            let a = *index
                .entry(segment.from)
                .or_insert_with(|| graph.add_node(segment.from));
            let b = *index
                .entry(segment.to)
                .or_insert_with(|| graph.add_node(segment.to));
            graph.add_edge(a, b, segment.cost);
        }
    }
    graph
}

/// Degree distribution and component count of a built network.
pub fn graph_stats(network: &BuiltNetwork) -> Result<GraphStats> {
    let graph = to_graph(network);
    let node_count = graph.node_count();
    let degrees: Vec<usize> = graph
        .node_indices()
        .map(|node| graph.neighbors(node).count())
        .collect();
    let min_degree = degrees.iter().copied().min().unwrap_or(0);
    let max_degree = degrees.iter().copied().max().unwrap_or(0);
    let avg_degree = if node_count == 0 {
        0.0
    } else {
        degrees.iter().sum::<usize>() as f64 / node_count as f64
    };
    let fixed_node_count = graph
        .node_indices()
        .filter(|&node| graph[node].is_fixed())
        .count();
    let existing_edge_count = network
        .subnets
        .iter()
        .flat_map(|s| s.segments.iter())
        .filter(|s| s.is_existing)
        .count();
    Ok(GraphStats {
        node_count,
        fixed_node_count,
        edge_count: graph.edge_count(),
        existing_edge_count,
        connected_components: connected_components(&graph),
        min_degree,
        avg_degree,
        max_degree,
        new_segment_cost: network.new_segment_cost(),
    })
}

/// Export the topology to a DOT string (Graphviz) for external viewers.
pub fn export_graph(network: &BuiltNetwork, format: &str) -> Result<String> {
    match format.to_ascii_lowercase().as_str() {
        "graphviz" | "dot" => Ok(render_dot(network)),
        other => Err(anyhow!("unsupported graph export format '{other}'")),
    }
}

fn render_dot(network: &BuiltNetwork) -> String {
    let graph = to_graph(network);
    let mut buffer = String::new();
    buffer.push_str("graph gridplan_network {\n");
    for node in graph.node_indices() {
        let id = graph[node];
        let shape = if id.is_fixed() { "box" } else { "ellipse" };
        buffer.push_str(&format!(
            "  n{} [label=\"{}\", shape={}];\n",
            node.index(),
            id.value(),
            shape
        ));
    }
    for edge in graph.edge_references() {
        let source = edge.source().index();
        let target = edge.target().index();
        buffer.push_str(&format!(
            "  n{source} -- n{target} [label=\"{:.2}\"];\n",
            edge.weight()
        ));
    }
    buffer.push('}');
    buffer
}
