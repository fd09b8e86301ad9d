use anyhow::{Context, Result};
use clap::Parser;
use gridplan_cli::{Cli, Commands};
use tracing::info;
use tracing_subscriber::FmtSubscriber;

mod commands;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    info!("gridplan {}", env!("CARGO_PKG_VERSION"));

    match &cli.command {
        Commands::Build(args) => commands::build::handle(args),
        Commands::Stats { result } => commands::graph::stats(result),
        Commands::Export {
            result,
            format,
            out,
        } => commands::graph::export(result, format, out.as_deref()),
    }
}
