use anyhow::{Context, Result};
use clap::Parser;
use srx2mist::config::Config;
use tracing_subscriber::EnvFilter;

mod cli;
mod ingest_cmd;
mod inspect_cmd;
mod path_guard;
mod push_cmd;

use cli::{Cli, Command};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load_optional(cli.config.as_deref())
        .with_context(|| "failed to load configuration")?;

    match cli.command {
        Command::Ingest(args) => ingest_cmd::run_ingest(args, &config),
        Command::Push(args) => push_cmd::run_push(args, &config),
        Command::Inspect(args) => inspect_cmd::run_inspect(args),
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
