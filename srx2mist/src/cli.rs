use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "srx2mist")]
#[command(about = "Translate Junos SRX set-format security configuration into Mist objects")]
pub struct Cli {
    /// Optional TOML config file (lookup table, output dir, Mist connection).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Translate a configuration dump and write all stage documents.
    Ingest(IngestArgs),
    /// Push compiled objects from a previous ingest to Mist.
    Push(PushArgs),
    /// Show how each line of a configuration dump classifies.
    Inspect(InspectArgs),
}

#[derive(Parser, Debug)]
pub struct IngestArgs {
    /// SRX configuration in "set" format.
    pub file: PathBuf,
    /// Directory for the JSON documents. Defaults to the config value or ".".
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
    /// Predefined application table (JSON).
    #[arg(long)]
    pub app_definitions: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct PushArgs {
    /// Which compiled objects to push.
    #[arg(value_enum)]
    pub what: PushKind,
    /// Directory holding the documents written by `ingest`.
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
    /// Mist organization id.
    #[arg(long)]
    pub org_id: Option<String>,
    /// Mist API base URL.
    #[arg(long)]
    pub host: Option<String>,
    /// List what would be pushed without contacting Mist.
    #[arg(long)]
    pub dry_run: bool,
    /// Push without stopping after the object count.
    #[arg(long)]
    pub yes: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct InspectArgs {
    pub file: PathBuf,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum PushKind {
    Applications,
    Networks,
    Policies,
    All,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
