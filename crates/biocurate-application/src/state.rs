//! Engine-owned discovery state.
//!
//! One `DiscoveryState` exists per engine instance (one workspace). Every
//! change of the selection goes through [`DiscoveryState::apply_selection`],
//! which recomputes the effective capabilities, sanitizes the shared
//! parameters and keeps the per-source maps in step with the selection.

use crate::optimistic::Snapshot;
use biocurate_core::capability::{CapabilitySet, effective_capabilities};
use biocurate_core::catalog::{CatalogEntry, CatalogIndex};
use biocurate_core::parameters::{QueryParameters, sanitize, sanitized};
use biocurate_core::scoped::SourceScopedMap;
use biocurate_core::settings::AdvancedSettings;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;

/// State shared by the engine components.
pub type SharedState = Arc<RwLock<DiscoveryState>>;

#[derive(Debug, Clone)]
pub struct DiscoveryState {
    catalog: Arc<CatalogIndex>,
    active_session_id: Option<String>,
    selected_sources: Vec<String>,
    parameters: QueryParameters,
    source_parameters: SourceScopedMap<QueryParameters>,
    advanced_settings: SourceScopedMap<AdvancedSettings>,
    capabilities: CapabilitySet,
}

impl Default for DiscoveryState {
    fn default() -> Self {
        Self {
            catalog: Arc::new(CatalogIndex::default()),
            active_session_id: None,
            selected_sources: Vec::new(),
            parameters: QueryParameters::default(),
            source_parameters: SourceScopedMap::new(),
            advanced_settings: SourceScopedMap::new(),
            capabilities: CapabilitySet::permissive(),
        }
    }
}

impl DiscoveryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared(self) -> SharedState {
        Arc::new(RwLock::new(self))
    }

    // ============================================================================
    // Accessors
    // ============================================================================

    pub fn catalog(&self) -> &CatalogIndex {
        &self.catalog
    }

    pub fn entry(&self, source_id: &str) -> Option<&CatalogEntry> {
        self.catalog.get(source_id)
    }

    pub fn active_session_id(&self) -> Option<&str> {
        self.active_session_id.as_deref()
    }

    pub fn selected_sources(&self) -> &[String] {
        &self.selected_sources
    }

    pub fn is_selected(&self, source_id: &str) -> bool {
        self.selected_sources.iter().any(|id| id == source_id)
    }

    pub fn parameters(&self) -> &QueryParameters {
        &self.parameters
    }

    pub fn capabilities(&self) -> &CapabilitySet {
        &self.capabilities
    }

    pub fn source_parameters(&self, source_id: &str) -> Option<&QueryParameters> {
        self.source_parameters.get(source_id)
    }

    pub fn advanced_settings(&self, source_id: &str) -> Option<&AdvancedSettings> {
        self.advanced_settings.get(source_id)
    }

    /// Parameters a query for `source_id` would use: its override if present,
    /// otherwise the shared parameters.
    pub fn effective_parameters(&self, source_id: &str) -> QueryParameters {
        self.source_parameters
            .get(source_id)
            .cloned()
            .unwrap_or_else(|| self.parameters.clone())
    }

    // ============================================================================
    // Mutations
    // ============================================================================

    /// Replaces the catalog snapshot and re-derives everything that depends on it.
    pub fn set_catalog(&mut self, catalog: CatalogIndex) {
        self.catalog = Arc::new(catalog);
        self.on_selection_changed();
    }

    pub fn set_active_session(&mut self, session_id: Option<String>) {
        self.active_session_id = session_id;
    }

    /// Replaces the selection. Duplicate ids are dropped, first occurrence wins.
    ///
    /// Returns `true` when the selection actually changed.
    pub fn apply_selection(&mut self, source_ids: Vec<String>) -> bool {
        let next = dedupe_ids(source_ids);
        if next == self.selected_sources {
            return false;
        }
        self.selected_sources = next;
        self.on_selection_changed();
        true
    }

    /// Mirrors a server session's selection and shared parameters.
    ///
    /// The parameters are sanitized for the incoming selection and installed
    /// before the selection reaction runs, so newly selected sources seed their
    /// overrides from them. Returns `true` when anything changed.
    pub fn adopt_remote(&mut self, source_ids: Vec<String>, parameters: QueryParameters) -> bool {
        let next_selection = dedupe_ids(source_ids);
        let next_parameters = sanitized(
            &parameters,
            &effective_capabilities(&self.catalog, &next_selection),
        );

        let parameters_changed = next_parameters != self.parameters;
        if parameters_changed {
            self.parameters = next_parameters;
        }
        let selection_changed = next_selection != self.selected_sources;
        if selection_changed {
            self.selected_sources = next_selection;
            self.on_selection_changed();
        }
        parameters_changed || selection_changed
    }

    /// Replaces the shared parameters, sanitized against the effective capabilities.
    pub fn set_parameters(&mut self, parameters: QueryParameters) {
        self.parameters = sanitized(&parameters, &self.capabilities);
    }

    /// Replaces a selected source's override, sanitized against that source's
    /// own capabilities. Unselected sources are ignored.
    pub fn set_source_parameters(&mut self, source_id: &str, parameters: QueryParameters) -> bool {
        let parameters = self.sanitize_for_source(source_id, &parameters);
        self.source_parameters
            .replace(source_id, parameters)
            .is_some()
    }

    /// Resets a selected source's override to the current shared parameters.
    pub fn reset_source_parameters(&mut self, source_id: &str) -> bool {
        let parameters = self.parameters.clone();
        self.set_source_parameters(source_id, parameters)
    }

    pub fn set_advanced_settings(&mut self, source_id: &str, settings: AdvancedSettings) -> bool {
        self.advanced_settings.replace(source_id, settings).is_some()
    }

    /// Forgets the active session together with everything scoped to it.
    pub fn clear_session(&mut self) {
        self.active_session_id = None;
        self.selected_sources.clear();
        self.on_selection_changed();
    }

    /// Reaction run after every selection or catalog change.
    fn on_selection_changed(&mut self) {
        self.capabilities = effective_capabilities(&self.catalog, &self.selected_sources);

        if let Some(next) = sanitize(&self.parameters, &self.capabilities) {
            tracing::debug!("[DiscoveryState] Shared parameters sanitized after capability change");
            self.parameters = next;
        }

        let catalog = Arc::clone(&self.catalog);
        let shared = self.parameters.clone();
        self.source_parameters
            .reconcile(&self.selected_sources, |id| seed_for(&catalog, id, &shared));
        for (id, params) in self.source_parameters.iter_mut() {
            if let Some(caps) = catalog.capabilities(id)
                && let Some(next) = sanitize(params, caps)
            {
                *params = next;
            }
        }

        self.advanced_settings
            .reconcile(&self.selected_sources, |_| AdvancedSettings::default());
    }

    fn sanitize_for_source(&self, source_id: &str, parameters: &QueryParameters) -> QueryParameters {
        match self.catalog.capabilities(source_id) {
            Some(caps) => sanitized(parameters, caps),
            None => parameters.clone(),
        }
    }

    pub fn view(&self) -> DiscoveryView {
        DiscoveryView {
            active_session_id: self.active_session_id.clone(),
            selected_sources: self.selected_sources.clone(),
            capabilities: self.capabilities.clone(),
            parameters: self.parameters.clone(),
            source_parameters: self.source_parameters.clone(),
            advanced_settings: self.advanced_settings.clone(),
        }
    }
}

fn seed_for(catalog: &CatalogIndex, source_id: &str, shared: &QueryParameters) -> QueryParameters {
    match catalog.capabilities(source_id) {
        Some(caps) => sanitized(shared, caps),
        None => shared.clone(),
    }
}

/// Drops repeated ids, keeping the first occurrence and its position.
pub fn dedupe_ids<I>(ids: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut out: Vec<String> = Vec::new();
    for id in ids {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}

/// What an optimistic mutation may need to put back.
#[derive(Debug, Clone)]
pub struct StateSnapshot {
    active_session_id: Option<String>,
    selected_sources: Vec<String>,
    parameters: QueryParameters,
    source_parameters: SourceScopedMap<QueryParameters>,
    advanced_settings: SourceScopedMap<AdvancedSettings>,
}

impl Snapshot for DiscoveryState {
    type Snapshot = StateSnapshot;

    fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            active_session_id: self.active_session_id.clone(),
            selected_sources: self.selected_sources.clone(),
            parameters: self.parameters.clone(),
            source_parameters: self.source_parameters.clone(),
            advanced_settings: self.advanced_settings.clone(),
        }
    }

    fn restore(&mut self, snapshot: StateSnapshot) {
        // A snapshot taken under another session must not leak into this one
        if snapshot.active_session_id != self.active_session_id {
            tracing::debug!("[DiscoveryState] Skipping restore of a snapshot from another session");
            return;
        }
        self.selected_sources = snapshot.selected_sources;
        self.parameters = snapshot.parameters;
        self.source_parameters = snapshot.source_parameters;
        self.advanced_settings = snapshot.advanced_settings;
        self.capabilities = effective_capabilities(&self.catalog, &self.selected_sources);
    }
}

/// Read-only rendering snapshot of the engine state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscoveryView {
    pub active_session_id: Option<String>,
    pub selected_sources: Vec<String>,
    pub capabilities: CapabilitySet,
    pub parameters: QueryParameters,
    pub source_parameters: SourceScopedMap<QueryParameters>,
    pub advanced_settings: SourceScopedMap<AdvancedSettings>,
}
