//! Query parameter model shared by every discovery source.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Result cap applied to a fresh parameter set.
pub const DEFAULT_MAX_RESULTS: u32 = 100;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SortOption {
    #[default]
    Relevance,
    PublicationDate,
    Title,
    Author,
    Source,
}

/// Flat record of query filters.
///
/// Every field is optional in the wire format; a missing field takes its
/// neutral value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryParameters {
    pub gene_symbol: Option<String>,
    pub search_term: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub publication_types: Vec<String>,
    pub languages: Vec<String>,
    pub sort_by: SortOption,
    pub max_results: u32,
    pub additional_terms: Option<String>,
    pub variation_types: Vec<String>,
    pub clinical_significance: Vec<String>,
    pub review_statuses: Vec<String>,
    pub organism: Option<String>,
}

impl Default for QueryParameters {
    fn default() -> Self {
        Self {
            gene_symbol: None,
            search_term: None,
            date_from: None,
            date_to: None,
            publication_types: Vec::new(),
            languages: Vec::new(),
            sort_by: SortOption::default(),
            max_results: DEFAULT_MAX_RESULTS,
            additional_terms: None,
            variation_types: Vec::new(),
            clinical_significance: Vec::new(),
            review_statuses: Vec::new(),
            organism: None,
        }
    }
}

impl QueryParameters {
    /// True when a gene symbol with visible characters is set.
    pub fn has_gene_symbol(&self) -> bool {
        is_present(self.gene_symbol.as_deref())
    }

    /// True when a search term with visible characters is set.
    pub fn has_search_term(&self) -> bool {
        is_present(self.search_term.as_deref())
    }

    pub fn with_gene_symbol(mut self, gene_symbol: impl Into<String>) -> Self {
        self.gene_symbol = Some(gene_symbol.into());
        self
    }

    pub fn with_search_term(mut self, search_term: impl Into<String>) -> Self {
        self.search_term = Some(search_term.into());
        self
    }

    pub fn with_date_range(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.date_from = from;
        self.date_to = to;
        self
    }
}

fn is_present(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}
