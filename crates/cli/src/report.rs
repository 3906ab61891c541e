//! Report rendering: plain-text table, JSON, Markdown.

use std::fmt::{self, Write};

use anyhow::Context;
use clap::ValueEnum;
use sweep::{NamespaceScanResult, OrphanType, OrphanedBranch};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    #[default]
    Table,
    Json,
    Markdown,
}

pub fn render(result: &NamespaceScanResult, format: ReportFormat) -> anyhow::Result<String> {
    let mut out = String::new();
    match format {
        ReportFormat::Json => {
            out = serde_json::to_string_pretty(result).context("failed to serialize report")?;
            out.push('\n');
        }
        ReportFormat::Table => write_table(&mut out, result).context("failed to render table")?,
        ReportFormat::Markdown => {
            write_markdown(&mut out, result).context("failed to render markdown")?
        }
    }
    Ok(out)
}

fn write_totals(out: &mut impl Write, result: &NamespaceScanResult, bold: bool) -> fmt::Result {
    let (open, close) = if bold { ("**", ":**") } else { ("", ":") };
    writeln!(out, "{open}Total Repositories{close} {}", result.total_repos())?;
    writeln!(
        out,
        "{open}Total Orphaned Branches{close} {}",
        result.total_orphans()
    )?;
    let scanned = result.results().len();
    if scanned < result.total_repos() {
        writeln!(
            out,
            "{open}Scan incomplete{close} {scanned} of {} repositories scanned",
            result.total_repos()
        )?;
    }
    writeln!(out)
}

fn pr_reference(orphan: &OrphanedBranch) -> Option<String> {
    orphan.pr_number.map(|n| n.to_string())
}

fn write_table(out: &mut impl Write, result: &NamespaceScanResult) -> fmt::Result {
    writeln!(out, "Orphaned Branches Report: {}", result.namespace())?;
    writeln!(out)?;
    write_totals(out, result, false)?;

    if result.total_orphans() == 0 {
        writeln!(out, "No orphaned branches found.")?;
    } else {
        writeln!(out, "Summary by Type:")?;
        for orphan_type in OrphanType::ALL {
            let label = format!("{}:", orphan_type.label());
            writeln!(out, "  {label:<16}{}", result.count_by_type(orphan_type))?;
        }
        writeln!(out)?;

        writeln!(out, "Orphaned Branches:")?;
        writeln!(out)?;
        for scan in result.results().iter().filter(|r| !r.orphans.is_empty()) {
            writeln!(
                out,
                "  {} ({} orphans)",
                scan.repository.full_name,
                scan.orphans.len()
            )?;
            for orphan in &scan.orphans {
                write!(
                    out,
                    "    - {} [{}, {} days]",
                    orphan.branch_name,
                    orphan.orphan_type.label(),
                    orphan.days_since_activity
                )?;
                match pr_reference(orphan) {
                    Some(pr) => writeln!(out, " (PR {pr})")?,
                    None => writeln!(out)?,
                }
            }
            writeln!(out)?;
        }
    }

    let mut failed = result.failed_results().peekable();
    if failed.peek().is_some() {
        writeln!(out)?;
        writeln!(out, "Failed Repositories:")?;
        for scan in failed {
            if let Some(error) = &scan.error {
                writeln!(out, "  {}: {error}", scan.repository.full_name)?;
            }
        }
    }
    Ok(())
}

fn write_markdown(out: &mut impl Write, result: &NamespaceScanResult) -> fmt::Result {
    writeln!(out, "# Orphaned Branches Report: {}", result.namespace())?;
    writeln!(out)?;
    write_totals(out, result, true)?;

    writeln!(out, "## Summary by Type")?;
    writeln!(out)?;
    writeln!(out, "| Type | Count |")?;
    writeln!(out, "|------|-------|")?;
    for orphan_type in OrphanType::ALL {
        writeln!(
            out,
            "| {} | {} |",
            orphan_type.label(),
            result.count_by_type(orphan_type)
        )?;
    }
    writeln!(out)?;

    writeln!(out, "## Orphaned Branches")?;
    writeln!(out)?;
    writeln!(out, "| Repository | Branch | Type | Days Inactive | PR |")?;
    writeln!(out, "|------------|--------|------|---------------|----|")?;
    for orphan in result.all_orphans() {
        writeln!(
            out,
            "| {} | {} | {} | {} | {} |",
            orphan.repository,
            orphan.branch_name,
            orphan.orphan_type.label(),
            orphan.days_since_activity,
            pr_reference(orphan).unwrap_or_else(|| "-".to_string())
        )?;
    }

    let mut failed = result.failed_results().peekable();
    if failed.peek().is_some() {
        writeln!(out)?;
        writeln!(out, "## Failed Repositories")?;
        writeln!(out)?;
        for scan in failed {
            if let Some(error) = &scan.error {
                writeln!(out, "- `{}`: {error}", scan.repository.full_name)?;
            }
        }
    }
    Ok(())
}
