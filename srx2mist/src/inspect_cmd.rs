use anyhow::{Context, Result};
use set_config_core::parse_file;
use srx2mist::inspect::build_inventory;
use srx2mist::report::render_inventory;

use crate::cli::{InspectArgs, OutputFormat};

pub fn run_inspect(args: InspectArgs) -> Result<()> {
    let statements = parse_file(&args.file)
        .with_context(|| format!("failed to parse {}", args.file.display()))?;
    let inventory = build_inventory(&statements);

    match args.format {
        OutputFormat::Text => println!("{}", render_inventory(&inventory)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&inventory)?),
    }
    Ok(())
}
