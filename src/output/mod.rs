//! Output module for presenting bills of materials
//!
//! This module handles:
//! - Printing the bill and resolution plans to the terminal
//! - Writing markdown summaries of a run

mod markdown;
mod summary;
mod terminal;

pub use markdown::{format_markdown_summary, write_markdown_summary};
pub use summary::{BillSummary, OutputError, OutputResult};
pub use terminal::{format_bill, format_plan, print_bill, print_plan};
