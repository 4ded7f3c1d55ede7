//! Capability flags and their aggregation across a selection.

mod aggregator;
mod model;

pub use aggregator::{aggregate, combine, effective_capabilities};
pub use model::{CapabilityFlag, CapabilitySet, DEFAULT_MAX_RESULTS_LIMIT};
