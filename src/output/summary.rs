//! Summary types shared by the output formats

use crate::bike::{BikeSpecification, SpecPatch};
use crate::bom::BillOfMaterials;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// A finished run, ready to be rendered
#[derive(Debug, Clone)]
pub struct BillSummary {
    /// When the bill was produced
    pub generated_at: DateTime<Utc>,

    /// SHA-256 of the configuration the run used
    pub config_hash: String,

    /// The specification as resolved (after any clamp)
    pub spec: BikeSpecification,

    /// Clamps applied during the run
    pub patches: Vec<SpecPatch>,

    pub bill: BillOfMaterials,
}

impl BillSummary {
    /// Creates a summary stamped with the current time
    pub fn new(
        config_hash: impl Into<String>,
        spec: BikeSpecification,
        patches: Vec<SpecPatch>,
        bill: BillOfMaterials,
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            config_hash: config_hash.into(),
            spec,
            patches,
            bill,
        }
    }

    /// "complete" when every component resolved, "partial" otherwise
    pub fn status(&self) -> &'static str {
        if self.bill.is_complete() {
            "complete"
        } else {
            "partial"
        }
    }
}
