use celf_io::cli::{run_estimate_command, run_select_command, Cli, Commands};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("celf=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .compact()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Select(args) => run_select_command(args)?,
        Commands::Estimate(args) => run_estimate_command(args)?,
    }

    Ok(())
}
