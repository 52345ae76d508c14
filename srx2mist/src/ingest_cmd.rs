use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;
use set_config_core::parse_file;
use srx2mist::compile::DuplicateNotice;
use srx2mist::config::Config;
use srx2mist::ledger::ProblemLedger;
use srx2mist::pipeline::translate;
use srx2mist::report::{render_duplicates, render_problems, render_summary};
use srx2mist::resolve::AppDefinitions;
use srx2mist::summary::{summarize, TranslationSummary};

use crate::cli::{IngestArgs, OutputFormat};
use crate::path_guard;

#[derive(Debug, Serialize)]
struct IngestReport<'a> {
    summary: TranslationSummary,
    duplicates: &'a [DuplicateNotice],
    problems: &'a ProblemLedger,
    documents: Vec<PathBuf>,
}

pub fn run_ingest(args: IngestArgs, config: &Config) -> Result<()> {
    let statements = parse_file(&args.file)
        .with_context(|| format!("failed to parse {}", args.file.display()))?;

    let out_dir = args.out_dir.unwrap_or_else(|| config.output.dir.clone());
    path_guard::ensure_documents_spare_input(&out_dir, &args.file)?;
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("failed to create output directory {}", out_dir.display()))?;

    let defs_path = args
        .app_definitions
        .unwrap_or_else(|| config.lookup.app_definitions.clone());
    let definitions = AppDefinitions::load_or_empty(&defs_path);

    let translation = translate(&statements, &definitions);
    let documents = translation
        .write_documents(&out_dir)
        .with_context(|| format!("failed to write documents to {}", out_dir.display()))?;
    let summary = summarize(&translation);

    match args.format {
        OutputFormat::Text => {
            println!("{}", render_summary(summary));
            println!();
            println!("{}", render_duplicates(&translation.compilation.duplicates));
            println!();
            println!("{}", render_problems(&translation.ledger));
            println!();
            println!(
                "documents dir={} written={}",
                out_dir.display(),
                documents.len()
            );
        }
        OutputFormat::Json => {
            let report = IngestReport {
                summary,
                duplicates: &translation.compilation.duplicates,
                problems: &translation.ledger,
                documents,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}
