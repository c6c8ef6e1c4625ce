//! Plain-text rendering for the command line

use crate::bom::BillOfMaterials;
use crate::orchestrator::ResolutionPlan;
use crate::resolver::Resolution;

/// Formats a bill as aligned plain text
pub fn format_bill(bill: &BillOfMaterials) -> String {
    let mut out = String::new();
    let width = bill
        .parts
        .iter()
        .map(|p| p.label.len())
        .max()
        .unwrap_or(0);

    out.push_str("=== Bill of Materials ===\n\n");

    for part in &bill.parts {
        out.push_str(&format!(
            "  {:<width$}  {:>10}  {}\n",
            part.label,
            part.price.to_string(),
            part.name,
            width = width
        ));
    }
    if bill.parts.is_empty() {
        out.push_str("  (no parts resolved)\n");
    }

    if !bill.omissions.is_empty() {
        out.push_str("\nNot required:\n");
        for omission in &bill.omissions {
            out.push_str(&format!("  - {}: {}\n", omission.component, omission.reason));
        }
    }

    if !bill.errors.is_empty() {
        out.push_str(&format!("\nErrors ({}):\n", bill.errors.len()));
        for error in &bill.errors {
            out.push_str(&format!("  - {}\n", error));
        }
    }

    out.push_str(&format!("\nTotal: {}\n", bill.total_display));
    out
}

/// Prints a bill to stdout
pub fn print_bill(bill: &BillOfMaterials) {
    print!("{}", format_bill(bill));
}

/// Formats the pages a run would fetch
pub fn format_plan(plan: &ResolutionPlan) -> String {
    let mut out = String::new();

    out.push_str("=== Resolution Plan ===\n\n");
    out.push_str(&format!("Specification: {}\n", plan.spec));
    for patch in &plan.patches {
        out.push_str(&format!(
            "Adjusted: rear gears set to {} ({})\n",
            patch.rear_gears, patch.reason
        ));
    }
    out.push('\n');

    for (component, resolution) in &plan.resolutions {
        match resolution {
            Resolution::Resolved(parts) | Resolution::Patched(parts, _) => {
                for part in parts {
                    out.push_str(&format!("  {}\n    {}\n", part.label, part.url));
                }
            }
            Resolution::BenignOmission(reason) => {
                out.push_str(&format!("  {} (not required: {})\n", component, reason));
            }
            Resolution::Unresolved(reason) => {
                out.push_str(&format!("  {} UNRESOLVED: {}\n", component, reason));
            }
        }
    }

    out.push_str(&format!(
        "\n{} pages to fetch, {} unresolved components\n",
        plan.urls().len(),
        plan.unresolved_count()
    ));
    out
}

/// Prints a resolution plan to stdout
pub fn print_plan(plan: &ResolutionPlan) {
    print!("{}", format_plan(plan));
}
