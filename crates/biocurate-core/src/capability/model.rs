//! Capability declarations of a discovery source.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use strum::{Display, EnumIter, IntoEnumIterator};

/// Result cap offered when no source constrains it.
pub const DEFAULT_MAX_RESULTS_LIMIT: u32 = 1000;

/// One boolean capability a source may declare.
///
/// Each flag gates one group of query parameter fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, Display)]
#[strum(serialize_all = "snake_case")]
pub enum CapabilityFlag {
    SupportsDateRange,
    SupportsPublicationTypes,
    SupportsLanguageFilter,
    SupportsSortOptions,
    SupportsAdditionalTerms,
    SupportsVariationType,
    SupportsClinicalSignificance,
    SupportsReviewStatus,
    SupportsOrganism,
}

impl CapabilityFlag {
    /// Human readable label of the filter this flag gates.
    pub fn label(self) -> &'static str {
        match self {
            Self::SupportsDateRange => "Date range",
            Self::SupportsPublicationTypes => "Publication types",
            Self::SupportsLanguageFilter => "Languages",
            Self::SupportsSortOptions => "Sort order",
            Self::SupportsAdditionalTerms => "Additional terms",
            Self::SupportsVariationType => "Variation type",
            Self::SupportsClinicalSignificance => "Clinical significance",
            Self::SupportsReviewStatus => "Review status",
            Self::SupportsOrganism => "Organism",
        }
    }
}

/// Capabilities of one source, or the effective capabilities of a selection.
///
/// Flags missing from a catalog payload deserialize as unsupported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapabilitySet {
    pub supports_date_range: bool,
    pub supports_publication_types: bool,
    pub supports_language_filter: bool,
    pub supports_sort_options: bool,
    pub supports_additional_terms: bool,
    pub supports_variation_type: bool,
    pub supports_clinical_significance: bool,
    pub supports_review_status: bool,
    pub supports_organism: bool,
    /// Largest `max_results` this source accepts. When capabilities are
    /// aggregated across a selection the result never exceeds
    /// [`DEFAULT_MAX_RESULTS_LIMIT`], even for a single source declaring more.
    pub max_results_limit: u32,
    pub supported_storage_use_cases: BTreeSet<String>,
}

impl Default for CapabilitySet {
    fn default() -> Self {
        Self {
            supports_date_range: false,
            supports_publication_types: false,
            supports_language_filter: false,
            supports_sort_options: false,
            supports_additional_terms: false,
            supports_variation_type: false,
            supports_clinical_significance: false,
            supports_review_status: false,
            supports_organism: false,
            max_results_limit: DEFAULT_MAX_RESULTS_LIMIT,
            supported_storage_use_cases: BTreeSet::new(),
        }
    }
}

impl CapabilitySet {
    /// Capability set used while nothing is selected: every filter offered,
    /// default result ceiling, no storage use cases.
    pub fn permissive() -> Self {
        let mut caps = Self::default();
        for flag in CapabilityFlag::iter() {
            caps.set_flag(flag, true);
        }
        caps
    }

    pub fn flag(&self, flag: CapabilityFlag) -> bool {
        match flag {
            CapabilityFlag::SupportsDateRange => self.supports_date_range,
            CapabilityFlag::SupportsPublicationTypes => self.supports_publication_types,
            CapabilityFlag::SupportsLanguageFilter => self.supports_language_filter,
            CapabilityFlag::SupportsSortOptions => self.supports_sort_options,
            CapabilityFlag::SupportsAdditionalTerms => self.supports_additional_terms,
            CapabilityFlag::SupportsVariationType => self.supports_variation_type,
            CapabilityFlag::SupportsClinicalSignificance => self.supports_clinical_significance,
            CapabilityFlag::SupportsReviewStatus => self.supports_review_status,
            CapabilityFlag::SupportsOrganism => self.supports_organism,
        }
    }

    pub fn set_flag(&mut self, flag: CapabilityFlag, value: bool) {
        let slot = match flag {
            CapabilityFlag::SupportsDateRange => &mut self.supports_date_range,
            CapabilityFlag::SupportsPublicationTypes => &mut self.supports_publication_types,
            CapabilityFlag::SupportsLanguageFilter => &mut self.supports_language_filter,
            CapabilityFlag::SupportsSortOptions => &mut self.supports_sort_options,
            CapabilityFlag::SupportsAdditionalTerms => &mut self.supports_additional_terms,
            CapabilityFlag::SupportsVariationType => &mut self.supports_variation_type,
            CapabilityFlag::SupportsClinicalSignificance => {
                &mut self.supports_clinical_significance
            }
            CapabilityFlag::SupportsReviewStatus => &mut self.supports_review_status,
            CapabilityFlag::SupportsOrganism => &mut self.supports_organism,
        };
        *slot = value;
    }

    /// Builder-style variant of [`CapabilitySet::set_flag`].
    pub fn with_flag(mut self, flag: CapabilityFlag, value: bool) -> Self {
        self.set_flag(flag, value);
        self
    }

    /// Flags currently supported, in declaration order.
    pub fn supported_flags(&self) -> Vec<CapabilityFlag> {
        CapabilityFlag::iter().filter(|f| self.flag(*f)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_flags_deserialize_as_unsupported() {
        let caps: CapabilitySet =
            serde_json::from_str(r#"{"supports_date_range": true, "max_results_limit": 200}"#)
                .unwrap();
        assert!(caps.supports_date_range);
        assert!(!caps.supports_organism);
        assert_eq!(caps.max_results_limit, 200);
        assert!(caps.supported_storage_use_cases.is_empty());
    }

    #[test]
    fn test_permissive_enables_every_flag() {
        let caps = CapabilitySet::permissive();
        assert_eq!(caps.supported_flags().len(), CapabilityFlag::iter().count());
        assert_eq!(caps.max_results_limit, DEFAULT_MAX_RESULTS_LIMIT);
    }

    #[test]
    fn test_flag_display_matches_field_name() {
        assert_eq!(
            CapabilityFlag::SupportsClinicalSignificance.to_string(),
            "supports_clinical_significance"
        );
    }
}
