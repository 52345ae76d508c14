use std::path::Path;

use anyhow::{bail, Context, Result};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use srx2mist::compile::{MistApplication, OrganizedNetworks, ServicePolicy};
use srx2mist::config::Config;
use srx2mist::documents::{self, read_document};
use srx2mist::push::{push_all, DryRun, MistClient, PushContext, PushReport, PushTarget};
use srx2mist::registry::Namespace;
use srx2mist::report::render_push_report;

use crate::cli::{OutputFormat, PushArgs, PushKind};

/// Compiled objects selected for one push run. Kinds not selected stay empty.
#[derive(Debug, Default)]
struct Outbox {
    applications: Namespace<MistApplication>,
    networks: OrganizedNetworks,
    policies: IndexMap<String, ServicePolicy>,
}

impl Outbox {
    fn len(&self) -> usize {
        self.applications.len()
            + self.networks.interface_count()
            + self.networks.indirect_count()
            + self.policies.len()
    }

    fn push<T: PushTarget + ?Sized>(&self, target: &mut T) -> PushReport {
        push_all(target, &self.applications, &self.networks, &self.policies)
    }
}

pub fn run_push(args: PushArgs, config: &Config) -> Result<()> {
    let out_dir = args
        .out_dir
        .clone()
        .unwrap_or_else(|| config.output.dir.clone());

    let mut outbox = Outbox::default();
    let mut missing = Vec::new();
    if matches!(args.what, PushKind::Applications | PushKind::All) {
        load_into(
            &out_dir,
            documents::MIST_APPLICATIONS,
            &mut outbox.applications,
            &mut missing,
        )?;
    }
    if matches!(args.what, PushKind::Networks | PushKind::All) {
        load_into(
            &out_dir,
            documents::MIST_NETWORKS,
            &mut outbox.networks,
            &mut missing,
        )?;
    }
    if matches!(args.what, PushKind::Policies | PushKind::All) {
        load_into(
            &out_dir,
            documents::MIST_POLICIES,
            &mut outbox.policies,
            &mut missing,
        )?;
    }
    if !missing.is_empty() {
        println!(
            "missing {} in {}; ingest configuration first",
            missing.join(", "),
            out_dir.display()
        );
        return Ok(());
    }

    println!("{} objects ready to push", outbox.len());
    if !args.yes && !args.dry_run {
        println!("nothing pushed; re-run with --yes to push or --dry-run to preview");
        return Ok(());
    }

    let report = if args.dry_run {
        let mut target = DryRun::default();
        let report = outbox.push(&mut target);
        if matches!(args.format, OutputFormat::Text) {
            for (kind, name) in &target.sent {
                println!("dry-run {kind} {name}");
            }
        }
        report
    } else {
        let context = push_context(&args, config)?;
        let mut client = MistClient::new(context).context("failed to build Mist client")?;
        outbox.push(&mut client)
    };

    match args.format {
        OutputFormat::Text => println!("{}", render_push_report(&report)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    if !report.is_clean() {
        bail!(
            "push failed: {} of {} objects rejected",
            report.failures.len(),
            report.attempted
        );
    }
    Ok(())
}

fn load_into<T: DeserializeOwned>(
    dir: &Path,
    file: &'static str,
    slot: &mut T,
    missing: &mut Vec<&'static str>,
) -> Result<()> {
    match read_document(dir, file).with_context(|| format!("failed to load {file}"))? {
        Some(value) => *slot = value,
        None => missing.push(file),
    }
    Ok(())
}

fn push_context(args: &PushArgs, config: &Config) -> Result<PushContext> {
    let Some(org_id) = args.org_id.clone().or_else(|| config.mist.org_id.clone()) else {
        bail!("no Mist organization id; pass --org-id or set [mist] org_id in the config file");
    };
    let host = args
        .host
        .clone()
        .unwrap_or_else(|| config.mist.host.clone());
    let token_env = &config.mist.token_env;
    let api_token = std::env::var(token_env)
        .with_context(|| format!("Mist API token not found in environment variable {token_env}"))?;
    Ok(PushContext {
        host,
        org_id,
        api_token,
    })
}
