//! Resolution orchestrator
//!
//! Drives one bill-of-materials run:
//! - Sequential pre-pass over the components that may clamp gear counts
//! - Concurrent fan-out of resolve + fetch + extract tasks
//! - Join of every task, then aggregation

mod coordinator;

pub use coordinator::{Orchestrator, ResolutionPlan, ResolvedRun};

use crate::bike::BikeSpecification;
use crate::bom::BillOfMaterials;
use crate::config::Config;

/// Resolves a specification into a priced bill of materials
///
/// Builds a one-off [`Orchestrator`]; callers running many specifications
/// should keep an orchestrator and reuse its HTTP client.
///
/// # Arguments
///
/// * `spec` - The bike specification; consumed by the run
/// * `config` - Vendor profiles and catalog
///
/// # Returns
///
/// * `Ok(BillOfMaterials)` - The bill, possibly with per-component errors
/// * `Err(BikeError)` - The HTTP client could not be built
pub async fn resolve_parts_for_specification(
    spec: BikeSpecification,
    config: &Config,
) -> crate::Result<BillOfMaterials> {
    let orchestrator = Orchestrator::new(config.clone())?;
    Ok(orchestrator.resolve(spec).await)
}
