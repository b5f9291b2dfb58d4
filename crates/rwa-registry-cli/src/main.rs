//! `rwa-registry` binary entry point

use anyhow::Result;
use clap::Parser;
use rwa_registry_cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    for line in rwa_registry_cli::run(cli)? {
        println!("{line}");
    }
    Ok(())
}
