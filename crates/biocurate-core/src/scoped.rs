//! Associative container for values that exist only for selected sources.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Values keyed by source id whose keys are kept a subset of the selection.
///
/// [`SourceScopedMap::reconcile`] is the single place where keys are pruned
/// (deselected sources) and seeded (newly selected sources).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceScopedMap<V> {
    entries: BTreeMap<String, V>,
}

impl<V> Default for SourceScopedMap<V> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<V> SourceScopedMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops entries for sources outside `selection` and seeds an entry for
    /// every selected source that has none.
    ///
    /// Returns `true` when any key was added or removed.
    pub fn reconcile<S, F>(&mut self, selection: &[S], mut seed: F) -> bool
    where
        S: AsRef<str>,
        F: FnMut(&str) -> V,
    {
        let before = self.entries.len();
        self.entries
            .retain(|id, _| selection.iter().any(|s| s.as_ref() == id));
        let mut changed = self.entries.len() != before;

        for id in selection {
            let id = id.as_ref();
            if !self.entries.contains_key(id) {
                self.entries.insert(id.to_string(), seed(id));
                changed = true;
            }
        }
        changed
    }

    pub fn get(&self, source_id: &str) -> Option<&V> {
        self.entries.get(source_id)
    }

    /// Replaces the value of an existing key. Unknown keys are left out so the
    /// map never gains an entry for an unselected source.
    pub fn replace(&mut self, source_id: &str, value: V) -> Option<V> {
        self.entries
            .get_mut(source_id)
            .map(|slot| std::mem::replace(slot, value))
    }

    pub fn contains(&self, source_id: &str) -> bool {
        self.entries.contains_key(source_id)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut V)> {
        self.entries.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
