use colored::Colorize;

use crate::compile::DuplicateNotice;
use crate::inspect::StatementInventory;
use crate::ledger::ProblemLedger;
use crate::push::PushReport;
use crate::summary::{self, TranslationSummary};

/// Render the translation summary lines.
pub fn render_summary(summary: TranslationSummary) -> String {
    summary::render(summary).cyan().to_string()
}

/// Render ledger entries, one per line, in the order they were recorded.
pub fn render_problems(ledger: &ProblemLedger) -> String {
    let mut out = vec![format!("problem_cases count={}", ledger.len())];
    if ledger.is_empty() {
        out.push("- none".to_string());
    }
    for entry in ledger.entries() {
        out.push(format!("- {entry}").yellow().to_string());
    }
    out.join("\n")
}

/// Render application name collisions.
pub fn render_duplicates(notices: &[DuplicateNotice]) -> String {
    let mut out = vec![format!("duplicate_applications count={}", notices.len())];
    if notices.is_empty() {
        out.push("- none".to_string());
    }
    for notice in notices {
        out.push(format!("- {notice}").yellow().to_string());
    }
    out.join("\n")
}

pub fn render_push_report(report: &PushReport) -> String {
    let mut out = vec![format!(
        "push_summary attempted={} succeeded={} failed={}",
        report.attempted,
        report.succeeded,
        report.failures.len()
    )
    .cyan()
    .to_string()];
    for failure in &report.failures {
        let status = failure
            .status
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());
        out.push(
            format!(
                "FAILED {} {} status={status} {}",
                failure.kind, failure.name, failure.error
            )
            .red()
            .to_string(),
        );
    }
    out.join("\n")
}

/// Render a statement inventory: totals, per-kind counts and ignored lines.
pub fn render_inventory(inv: &StatementInventory) -> String {
    let mut out = vec![format!(
        "statements total={} recognized={} ignored={}",
        inv.statements,
        inv.recognized(),
        inv.ignored.len()
    )
    .cyan()
    .to_string()];
    out.push("kinds".to_string());
    if inv.kinds.is_empty() {
        out.push("- none".to_string());
    }
    for (kind, count) in &inv.kinds {
        out.push(format!("- {kind}: {count}"));
    }
    out.push("ignored".to_string());
    if inv.ignored.is_empty() {
        out.push("- none".to_string());
    }
    for line in &inv.ignored {
        out.push(format!("- line {}: {}", line.line, line.text).dimmed().to_string());
    }
    out.join("\n")
}
