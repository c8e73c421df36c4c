//! Report rendering (text, JSON, markdown)

use clap::ValueEnum;
use colored::{Color, Colorize};
use ddlaudit_core::{CheckResult, Report};

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Sectioned human-readable report
    Text,
    /// report.json (v1)
    Json,
    /// Markdown, for pull request comments
    Markdown,
}

pub fn render(
    report: &Report,
    format: OutputFormat,
    color: bool,
) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Text => Ok(render_text(report, color)),
        OutputFormat::Json => report.to_json().map(|json| json + "\n"),
        OutputFormat::Markdown => Ok(render_markdown(report)),
    }
}

pub fn paint(text: &str, color: Color, enabled: bool) -> String {
    if enabled {
        text.color(color).to_string()
    } else {
        text.to_string()
    }
}

/// One section per category, in report order
pub fn render_text(report: &Report, color: bool) -> String {
    let mut out = String::new();

    out.push_str(&paint("Starting Postgres Schema Audit...", Color::Blue, color));
    out.push('\n');

    for check in &report.checks {
        out.push_str(&format!("\n--- {} ---\n", check.category.title()));
        render_check(&mut out, check, color);
    }

    out
}

fn render_check(out: &mut String, check: &CheckResult, color: bool) {
    if check.skipped {
        out.push_str("- Skipped (disabled in configuration)\n");
    } else if check.diagnostics.is_empty() {
        out.push_str(&paint("✓ No issues found", Color::Green, color));
        out.push('\n');
    } else {
        for diag in &check.diagnostics {
            out.push_str(&paint(&format!("⚠ {}", diag.message), Color::Yellow, color));
            out.push('\n');
        }
    }
}

pub fn render_markdown(report: &Report) -> String {
    let mut md = String::new();

    md.push_str("# Postgres Schema Audit\n\n");
    md.push_str(&format!("**Source:** `{}`\n\n", report.source.name));
    md.push_str(&format!("**Report version:** {}\n\n", report.version));

    md.push_str("## Summary\n\n");
    md.push_str(&format!("- Warnings: {}\n", report.summary.warnings));
    md.push_str(&format!(
        "- Inventory: {} tables, {} indexes, {} foreign keys\n",
        report.summary.inventory.tables,
        report.summary.inventory.indexes,
        report.summary.inventory.foreign_keys
    ));
    md.push('\n');

    for check in &report.checks {
        md.push_str(&format!("## {}\n\n", check.category.title()));

        if check.skipped {
            md.push_str("_Skipped (disabled in configuration)_\n\n");
        } else if check.diagnostics.is_empty() {
            md.push_str("✅ No issues found\n\n");
        } else {
            for diag in &check.diagnostics {
                md.push_str(&format!("- ⚠️ `{}` {}\n", diag.code, diag.message));
            }
            md.push('\n');
        }
    }

    md
}
