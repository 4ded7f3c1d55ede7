//! Strips parameter fields the effective capabilities no longer support.

use super::model::{QueryParameters, SortOption};
use crate::capability::CapabilitySet;

/// Returns the sanitized parameters only when at least one field changed.
///
/// Unsupported filters are cleared to their neutral value, the sort order falls
/// back to relevance and `max_results` is clamped to the effective limit.
/// Sanitizing an already sanitized set yields `None`.
pub fn sanitize(params: &QueryParameters, caps: &CapabilitySet) -> Option<QueryParameters> {
    let next = sanitized(params, caps);
    (next != *params).then_some(next)
}

/// Always returns a sanitized copy, whether or not anything changed.
pub fn sanitized(params: &QueryParameters, caps: &CapabilitySet) -> QueryParameters {
    let mut next = params.clone();

    if !caps.supports_date_range {
        next.date_from = None;
        next.date_to = None;
    }
    if !caps.supports_publication_types {
        next.publication_types.clear();
    }
    if !caps.supports_language_filter {
        next.languages.clear();
    }
    if !caps.supports_sort_options {
        next.sort_by = SortOption::Relevance;
    }
    if !caps.supports_additional_terms {
        next.additional_terms = None;
    }
    if !caps.supports_variation_type {
        next.variation_types.clear();
    }
    if !caps.supports_clinical_significance {
        next.clinical_significance.clear();
    }
    if !caps.supports_review_status {
        next.review_statuses.clear();
    }
    if !caps.supports_organism {
        next.organism = None;
    }
    if next.max_results > caps.max_results_limit {
        next.max_results = caps.max_results_limit;
    }

    next
}
