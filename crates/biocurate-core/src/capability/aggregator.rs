//! Effective capabilities of a multi-source selection.
//!
//! Boolean flags combine with AND, the result cap with MIN and the storage use
//! cases with UNION. All three are commutative and associative, so the result
//! does not depend on selection order.

use super::model::{CapabilityFlag, CapabilitySet};
use crate::catalog::CatalogIndex;
use strum::IntoEnumIterator;

/// Combines two capability records into a new one.
pub fn combine(left: &CapabilitySet, right: &CapabilitySet) -> CapabilitySet {
    let mut combined = CapabilitySet {
        max_results_limit: left.max_results_limit.min(right.max_results_limit),
        supported_storage_use_cases: left
            .supported_storage_use_cases
            .union(&right.supported_storage_use_cases)
            .cloned()
            .collect(),
        ..CapabilitySet::default()
    };
    for flag in CapabilityFlag::iter() {
        combined.set_flag(flag, left.flag(flag) && right.flag(flag));
    }
    combined
}

/// Reduces a list of capability records, starting from
/// [`CapabilitySet::permissive`]. The result cap therefore never exceeds
/// [`DEFAULT_MAX_RESULTS_LIMIT`](super::DEFAULT_MAX_RESULTS_LIMIT).
pub fn aggregate<'a, I>(records: I) -> CapabilitySet
where
    I: IntoIterator<Item = &'a CapabilitySet>,
{
    records
        .into_iter()
        .fold(CapabilitySet::permissive(), |acc, next| combine(&acc, next))
}

/// Effective capabilities for `selection` against a catalog snapshot.
///
/// Ids missing from the catalog contribute no constraint.
pub fn effective_capabilities<S>(catalog: &CatalogIndex, selection: &[S]) -> CapabilitySet
where
    S: AsRef<str>,
{
    let records: Vec<&CapabilitySet> = selection
        .iter()
        .filter_map(|id| {
            let caps = catalog.capabilities(id.as_ref());
            if caps.is_none() {
                tracing::debug!(
                    "[CapabilityAggregator] Skipping unknown source: {}",
                    id.as_ref()
                );
            }
            caps
        })
        .collect();
    aggregate(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::DEFAULT_MAX_RESULTS_LIMIT;
    use crate::catalog::{CatalogEntry, ParamType, SourceType};

    fn source(id: &str, caps: CapabilitySet) -> CatalogEntry {
        CatalogEntry {
            id: id.to_string(),
            name: id.to_string(),
            category: "test".to_string(),
            description: None,
            source_type: SourceType::Api,
            param_type: ParamType::None,
            capabilities: caps,
            is_active: true,
        }
    }

    fn catalog() -> CatalogIndex {
        let mut pubmed = CapabilitySet::permissive();
        pubmed.supports_variation_type = false;
        pubmed.max_results_limit = 500;
        pubmed.supported_storage_use_cases.insert("PDF".to_string());

        let mut clinvar = CapabilitySet::default()
            .with_flag(CapabilityFlag::SupportsVariationType, true)
            .with_flag(CapabilityFlag::SupportsDateRange, true);
        clinvar.max_results_limit = 200;
        clinvar.supported_storage_use_cases.insert("RAW_SOURCE".to_string());

        let mut uniprot = CapabilitySet::permissive();
        uniprot.max_results_limit = 5000;

        CatalogIndex::new(vec![
            source("pubmed", pubmed),
            source("clinvar", clinvar),
            source("uniprot", uniprot),
        ])
    }

    #[test]
    fn test_empty_selection_is_permissive() {
        let caps = effective_capabilities::<&str>(&catalog(), &[]);
        assert_eq!(caps, CapabilitySet::permissive());
        assert_eq!(caps.max_results_limit, DEFAULT_MAX_RESULTS_LIMIT);
        assert!(caps.supported_storage_use_cases.is_empty());
    }

    #[test]
    fn test_flags_and_limit_intersect() {
        let caps = effective_capabilities(&catalog(), &["pubmed", "clinvar"]);
        assert!(caps.supports_date_range);
        assert!(!caps.supports_variation_type);
        assert!(!caps.supports_publication_types);
        assert_eq!(caps.max_results_limit, 200);
        assert_eq!(
            caps.supported_storage_use_cases.into_iter().collect::<Vec<_>>(),
            vec!["PDF".to_string(), "RAW_SOURCE".to_string()]
        );
    }

    #[test]
    fn test_limit_never_exceeds_default_ceiling() {
        let caps = effective_capabilities(&catalog(), &["uniprot"]);
        assert_eq!(caps.max_results_limit, DEFAULT_MAX_RESULTS_LIMIT);
    }

    #[test]
    fn test_order_does_not_matter() {
        let index = catalog();
        let permutations = [
            ["pubmed", "clinvar", "uniprot"],
            ["pubmed", "uniprot", "clinvar"],
            ["clinvar", "pubmed", "uniprot"],
            ["clinvar", "uniprot", "pubmed"],
            ["uniprot", "pubmed", "clinvar"],
            ["uniprot", "clinvar", "pubmed"],
        ];
        let expected = effective_capabilities(&index, &permutations[0]);
        for selection in &permutations[1..] {
            assert_eq!(effective_capabilities(&index, selection), expected);
        }
    }

    #[test]
    fn test_adding_a_source_never_loosens() {
        let index = catalog();
        let mut selection: Vec<&str> = Vec::new();
        let mut previous = effective_capabilities(&index, &selection);
        for id in ["uniprot", "pubmed", "clinvar"] {
            selection.push(id);
            let next = effective_capabilities(&index, &selection);
            for flag in CapabilityFlag::iter() {
                assert!(
                    !(next.flag(flag) && !previous.flag(flag)),
                    "{flag} loosened after adding {id}"
                );
            }
            assert!(next.max_results_limit <= previous.max_results_limit);
            previous = next;
        }
    }

    #[test]
    fn test_unknown_sources_are_skipped() {
        let index = catalog();
        assert_eq!(
            effective_capabilities(&index, &["clinvar", "retired-source"]),
            effective_capabilities(&index, &["clinvar"])
        );
        assert_eq!(
            effective_capabilities(&index, &["retired-source"]),
            CapabilitySet::permissive()
        );
    }
}
