//! Markdown summary generation
//!
//! This module renders a bill of materials as a markdown document with the
//! parts table, any component errors and the run metadata.

use crate::output::summary::{BillSummary, OutputResult};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes a markdown summary of a bill to a file
///
/// # Arguments
///
/// * `summary` - The finished run
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote markdown summary
/// * `Err(OutputError)` - Failed to write summary
pub fn write_markdown_summary(summary: &BillSummary, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_summary(summary);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a bill summary as markdown
///
/// # Arguments
///
/// * `summary` - The finished run
///
/// # Returns
///
/// A formatted markdown string
pub fn format_markdown_summary(summary: &BillSummary) -> String {
    let bill = &summary.bill;
    let mut md = String::new();

    md.push_str("# Bike-Parts Bill of Materials\n\n");

    // Run metadata
    md.push_str("## Build\n\n");
    md.push_str(&format!("- **Specification**: {}\n", summary.spec));
    for patch in &summary.patches {
        md.push_str(&format!(
            "- **Adjusted**: rear gears set to {} ({})\n",
            patch.rear_gears, patch.reason
        ));
    }
    md.push_str(&format!(
        "- **Generated**: {}\n",
        summary.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    md.push_str(&format!("- **Status**: {}\n", summary.status()));
    md.push_str(&format!("- **Config Hash**: {}\n\n", summary.config_hash));

    // Parts
    md.push_str("## Parts\n\n");
    if bill.parts.is_empty() {
        md.push_str("No parts resolved.\n\n");
    } else {
        md.push_str("| Component | Product | Price |\n");
        md.push_str("|-----------|---------|-------|\n");
        for part in &bill.parts {
            md.push_str(&format!(
                "| {} | [{}]({}) | {} |\n",
                part.label,
                escape_cell(&part.name),
                part.url,
                part.price
            ));
        }
        md.push('\n');
    }
    md.push_str(&format!("**Total**: {}\n\n", bill.total_display));

    // Omissions
    if !bill.omissions.is_empty() {
        md.push_str("## Not Required\n\n");
        for omission in &bill.omissions {
            md.push_str(&format!("- {}: {}\n", omission.component, omission.reason));
        }
        md.push('\n');
    }

    // Errors
    if !bill.errors.is_empty() {
        md.push_str("## Errors\n\n");
        md.push_str("| Component | Stage | Detail |\n");
        md.push_str("|-----------|-------|--------|\n");
        for error in &bill.errors {
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                error.component,
                error.stage,
                escape_cell(&error.detail)
            ));
        }
        md.push('\n');
    }

    md
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
