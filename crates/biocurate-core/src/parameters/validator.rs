//! Per-source parameter validation, driven by the source's `param_type`.

use super::model::QueryParameters;
use crate::catalog::{CatalogEntry, ParamType};
use crate::error::{CurateError, Result};
use serde::{Deserialize, Serialize};

pub const GENE_REQUIRED: &str = "A gene symbol is required";
pub const TERM_REQUIRED: &str = "A search term is required";
pub const GENE_AND_TERM_REQUIRED: &str = "Both a gene symbol and a search term are required";
pub const ANY_PARAMETER_REQUIRED: &str =
    "Provide at least one parameter (gene symbol or search term)";

/// Checks `params` against a parameter contract.
///
/// Returns the failure message, or `None` when the contract is met.
pub fn check(param_type: ParamType, params: &QueryParameters) -> Option<&'static str> {
    let gene = params.has_gene_symbol();
    let term = params.has_search_term();

    match param_type {
        ParamType::Gene => (!gene).then_some(GENE_REQUIRED),
        ParamType::Term => (!term).then_some(TERM_REQUIRED),
        ParamType::None => None,
        ParamType::Api => (!gene && !term).then_some(ANY_PARAMETER_REQUIRED),
        ParamType::GeneAndTerm | ParamType::Unrecognized => match (gene, term) {
            (true, true) => None,
            (false, false) => Some(GENE_AND_TERM_REQUIRED),
            (false, true) => Some(GENE_REQUIRED),
            (true, false) => Some(TERM_REQUIRED),
        },
    }
}

/// Outcome of validating one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub source_id: String,
    pub source_name: String,
    pub is_valid: bool,
    pub message: Option<String>,
}

impl ValidationResult {
    /// Converts a failed validation into a source-scoped error.
    pub fn into_result(self) -> Result<()> {
        match self.message {
            Some(message) if !self.is_valid => Err(CurateError::validation(
                self.source_id,
                self.source_name,
                message,
            )),
            _ => Ok(()),
        }
    }
}

/// Validates the parameters that would be sent for `entry`.
pub fn validate(entry: &CatalogEntry, params: &QueryParameters) -> ValidationResult {
    let failure = check(entry.param_type, params);
    ValidationResult {
        source_id: entry.id.clone(),
        source_name: entry.name.clone(),
        is_valid: failure.is_none(),
        message: failure.map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::CapabilitySet;
    use crate::catalog::SourceType;

    fn params(gene: Option<&str>, term: Option<&str>) -> QueryParameters {
        QueryParameters {
            gene_symbol: gene.map(str::to_string),
            search_term: term.map(str::to_string),
            ..QueryParameters::default()
        }
    }

    #[test]
    fn test_table_for_every_param_type() {
        // (param_type, gene present, term present, expected failure)
        let cases = [
            (ParamType::Gene, true, true, None),
            (ParamType::Gene, true, false, None),
            (ParamType::Gene, false, true, Some(GENE_REQUIRED)),
            (ParamType::Gene, false, false, Some(GENE_REQUIRED)),
            (ParamType::Term, true, true, None),
            (ParamType::Term, true, false, Some(TERM_REQUIRED)),
            (ParamType::Term, false, true, None),
            (ParamType::Term, false, false, Some(TERM_REQUIRED)),
            (ParamType::GeneAndTerm, true, true, None),
            (ParamType::GeneAndTerm, true, false, Some(TERM_REQUIRED)),
            (ParamType::GeneAndTerm, false, true, Some(GENE_REQUIRED)),
            (ParamType::GeneAndTerm, false, false, Some(GENE_AND_TERM_REQUIRED)),
            (ParamType::None, true, true, None),
            (ParamType::None, true, false, None),
            (ParamType::None, false, true, None),
            (ParamType::None, false, false, None),
            (ParamType::Api, true, true, None),
            (ParamType::Api, true, false, None),
            (ParamType::Api, false, true, None),
            (ParamType::Api, false, false, Some(ANY_PARAMETER_REQUIRED)),
        ];

        for (param_type, gene, term, expected) in cases {
            let p = params(gene.then_some("MED13"), term.then_some("cardiomyopathy"));
            assert_eq!(
                check(param_type, &p),
                expected,
                "{param_type} gene={gene} term={term}"
            );
        }
    }

    #[test]
    fn test_unrecognized_type_requires_both() {
        assert_eq!(
            check(ParamType::Unrecognized, &params(None, None)),
            Some(GENE_AND_TERM_REQUIRED)
        );
        assert_eq!(
            check(ParamType::Unrecognized, &params(Some("MED13"), None)),
            Some(TERM_REQUIRED)
        );
    }

    #[test]
    fn test_blank_values_count_as_missing() {
        let p = params(Some("MED13"), Some(""));
        let message = check(ParamType::GeneAndTerm, &p).unwrap();
        assert!(message.contains("search term"));

        let p = params(Some(" \t"), None);
        assert_eq!(check(ParamType::Gene, &p), Some(GENE_REQUIRED));
    }

    #[test]
    fn test_validate_attributes_failure_to_source() {
        let entry = CatalogEntry {
            id: "clinvar".into(),
            name: "ClinVar".into(),
            category: "Variants".into(),
            description: None,
            source_type: SourceType::Api,
            param_type: ParamType::Gene,
            capabilities: CapabilitySet::default(),
            is_active: true,
        };

        let result = validate(&entry, &QueryParameters::default());
        assert!(!result.is_valid);
        let err = result.into_result().unwrap_err();
        assert_eq!(err.source_id(), Some("clinvar"));
        assert_eq!(err.to_string(), "ClinVar: A gene symbol is required");

        let ok = validate(&entry, &params(Some("BRCA1"), None));
        assert!(ok.is_valid);
        assert!(ok.into_result().is_ok());
    }
}
