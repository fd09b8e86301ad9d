use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gridplan", author, version, about, long_about = None)]
pub struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info")]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Plan a network over weighted demand nodes
    Build(BuildArgs),
    /// Summarize a result file
    Stats {
        #[arg(value_hint = ValueHint::FilePath)]
        result: PathBuf,
    },
    /// Export a result file as a graph
    Export {
        #[arg(value_hint = ValueHint::FilePath)]
        result: PathBuf,
        #[arg(long, default_value = "graphviz")]
        format: String,
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Dot,
}

#[derive(Args, Debug, Clone)]
pub struct BuildArgs {
    /// Demand node CSV (x,y,weight[,label])
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub nodes: PathBuf,
    /// proj4 descriptor of the node coordinates
    #[arg(long, default_value = "+proj=longlat +datum=WGS84 +no_defs")]
    pub proj: String,
    /// Build configuration (TOML, YAML or JSON)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    /// Existing network archive; overrides the configuration file
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub existing: Option<PathBuf>,
    /// Override `minimum_node_count_per_subnetwork`
    #[arg(long)]
    pub min_nodes: Option<usize>,
    /// Override `maximum_nearest_neighbor_count`
    #[arg(long)]
    pub neighbors: Option<usize>,
    /// Output path (stdout when omitted)
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub out: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
    /// Threads for neighbor search (`auto` or a number)
    #[arg(long, default_value = "auto")]
    pub threads: String,
}
