use super::model::CatalogEntry;
use crate::capability::CapabilitySet;
use std::collections::HashMap;

/// Catalog entries indexed by id.
///
/// Built once per catalog snapshot. Insertion order is kept so category
/// listings come back in the order the catalog service returned them.
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    entries: Vec<CatalogEntry>,
    by_id: HashMap<String, usize>,
}

impl CatalogIndex {
    /// Builds an index from a catalog listing. A duplicated id keeps its first entry.
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        let mut index = Self::default();
        for entry in entries {
            if index.by_id.contains_key(&entry.id) {
                tracing::warn!("[CatalogIndex] Duplicate catalog id ignored: {}", entry.id);
                continue;
            }
            index.by_id.insert(entry.id.clone(), index.entries.len());
            index.entries.push(entry);
        }
        index
    }

    pub fn get(&self, source_id: &str) -> Option<&CatalogEntry> {
        self.by_id.get(source_id).map(|&i| &self.entries[i])
    }

    pub fn capabilities(&self, source_id: &str) -> Option<&CapabilitySet> {
        self.get(source_id).map(|entry| &entry.capabilities)
    }

    pub fn contains(&self, source_id: &str) -> bool {
        self.by_id.contains_key(source_id)
    }

    /// Display name of a source, falling back to its id for unknown sources.
    pub fn display_name<'a>(&'a self, source_id: &'a str) -> &'a str {
        self.get(source_id)
            .map(|entry| entry.name.as_str())
            .unwrap_or(source_id)
    }

    /// Ids of every entry in `category`, in catalog order.
    pub fn ids_in_category(&self, category: &str) -> Vec<String> {
        self.entries
            .iter()
            .filter(|entry| entry.category == category)
            .map(|entry| entry.id.clone())
            .collect()
    }

    /// Distinct categories, in order of first appearance.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for entry in &self.entries {
            if !seen.contains(&entry.category.as_str()) {
                seen.push(entry.category.as_str());
            }
        }
        seen
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ParamType, SourceType};

    fn entry(id: &str, category: &str) -> CatalogEntry {
        CatalogEntry {
            id: id.to_string(),
            name: id.to_uppercase(),
            category: category.to_string(),
            description: None,
            source_type: SourceType::Api,
            param_type: ParamType::Gene,
            capabilities: CapabilitySet::default(),
            is_active: true,
        }
    }

    #[test]
    fn test_lookup_and_categories() {
        let index = CatalogIndex::new(vec![
            entry("pubmed", "Literature"),
            entry("clinvar", "Variants"),
            entry("europepmc", "Literature"),
        ]);

        assert_eq!(index.len(), 3);
        assert_eq!(index.get("clinvar").unwrap().name, "CLINVAR");
        assert!(index.get("missing").is_none());
        assert_eq!(
            index.ids_in_category("Literature"),
            vec!["pubmed".to_string(), "europepmc".to_string()]
        );
        assert_eq!(index.categories(), vec!["Literature", "Variants"]);
    }

    #[test]
    fn test_duplicate_ids_keep_first_entry() {
        let mut second = entry("pubmed", "Other");
        second.name = "Second".to_string();
        let index = CatalogIndex::new(vec![entry("pubmed", "Literature"), second]);

        assert_eq!(index.len(), 1);
        assert_eq!(index.get("pubmed").unwrap().category, "Literature");
    }

    #[test]
    fn test_display_name_falls_back_to_id() {
        let index = CatalogIndex::new(vec![entry("pubmed", "Literature")]);
        assert_eq!(index.display_name("pubmed"), "PUBMED");
        assert_eq!(index.display_name("gone"), "gone");
    }

    #[test]
    fn test_unknown_param_type_deserializes_as_unrecognized() {
        let json = r#"{
            "id": "x", "name": "X", "category": "c",
            "source_type": "something_new", "param_type": "sequence"
        }"#;
        let parsed: CatalogEntry = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.param_type, ParamType::Unrecognized);
        assert_eq!(parsed.source_type, SourceType::Other);
        assert!(parsed.is_active);
    }
}
