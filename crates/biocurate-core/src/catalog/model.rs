//! Catalog entry domain model.

use crate::capability::CapabilitySet;
use serde::{Deserialize, Serialize};
use strum::Display;

/// Which query fields a source requires before it can be queried.
///
/// Unknown values coming from the catalog deserialize as `Unrecognized`, which
/// validation treats like `GeneAndTerm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ParamType {
    Gene,
    Term,
    GeneAndTerm,
    None,
    Api,
    #[serde(other)]
    Unrecognized,
}

impl ParamType {
    /// Short description of what the source expects, for form hints.
    pub fn label(self) -> &'static str {
        match self {
            Self::Gene => "Gene symbol",
            Self::Term => "Search term",
            Self::GeneAndTerm | Self::Unrecognized => "Gene symbol and search term",
            Self::None => "No parameters",
            Self::Api => "Gene symbol or search term",
        }
    }
}

/// Discriminates how a source is queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SourceType {
    LiteratureSearch,
    Api,
    Database,
    FileUpload,
    #[serde(other)]
    Other,
}

/// One selectable data or literature connector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Stable identifier, unique across the catalog
    pub id: String,
    pub name: String,
    /// Grouping key used by bulk selection
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    pub source_type: SourceType,
    pub param_type: ParamType,
    #[serde(default)]
    pub capabilities: CapabilitySet,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}
