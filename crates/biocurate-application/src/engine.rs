//! Discovery engine facade.
//!
//! This module provides the `DiscoveryEngine`, which wires the session,
//! selection, parameter, test and promotion services around one shared state
//! for a single workspace.

use crate::promotion::{PromotionCoordinator, PromotionReport};
use crate::session::{
    BootstrapOutcome, ParameterOutcome, ParameterSynchronizer, SelectionOutcome,
    SelectionSynchronizer, SessionBootstrapper,
};
use crate::state::{DiscoveryState, DiscoveryView, SharedState};
use crate::test_runner::{TestExecutionCoordinator, TestOutcome};
use biocurate_core::capability::CapabilitySet;
use biocurate_core::catalog::CatalogIndex;
use biocurate_core::error::Result;
use biocurate_core::notification::NotificationSink;
use biocurate_core::parameters::{QueryParameters, ValidationResult, validate};
use biocurate_core::session::{DiscoveryApi, Session, SessionScope};
use biocurate_core::settings::{AdvancedSettings, PromotionConfig};
use std::sync::Arc;

/// Client-side engine owning selection, capability and parameter state for one
/// workspace.
///
/// Mutating operations never return errors: failures are turned into
/// notifications plus local state corrections, and the returned outcome tells
/// the caller what happened. Independent engines share nothing.
pub struct DiscoveryEngine {
    api: Arc<dyn DiscoveryApi>,
    state: SharedState,
    bootstrapper: Arc<SessionBootstrapper>,
    selection: SelectionSynchronizer,
    parameters: ParameterSynchronizer,
    tests: TestExecutionCoordinator,
    promotions: PromotionCoordinator,
}

impl DiscoveryEngine {
    pub fn new(
        api: Arc<dyn DiscoveryApi>,
        notifier: Arc<dyn NotificationSink>,
        scope: SessionScope,
    ) -> Self {
        let state = DiscoveryState::new().shared();
        let bootstrapper = Arc::new(SessionBootstrapper::new(
            api.clone(),
            state.clone(),
            notifier.clone(),
            scope,
        ));

        Self {
            selection: SelectionSynchronizer::new(
                api.clone(),
                state.clone(),
                bootstrapper.clone(),
                notifier.clone(),
            ),
            parameters: ParameterSynchronizer::new(
                api.clone(),
                state.clone(),
                bootstrapper.clone(),
                notifier.clone(),
            ),
            tests: TestExecutionCoordinator::new(
                api.clone(),
                state.clone(),
                bootstrapper.clone(),
                notifier.clone(),
            ),
            promotions: PromotionCoordinator::new(
                api.clone(),
                state.clone(),
                bootstrapper.clone(),
                notifier,
            ),
            api,
            state,
            bootstrapper,
        }
    }

    // ============================================================================
    // Inbound data
    // ============================================================================

    /// Fetches the catalog and re-derives capabilities for the current selection.
    ///
    /// Returns the number of catalog entries.
    pub async fn load_catalog(&self) -> Result<usize> {
        let entries = self.api.list_catalog().await?;
        let index = CatalogIndex::new(entries);
        let count = index.len();
        self.state.write().await.set_catalog(index);
        tracing::info!("[DiscoveryEngine] Catalog loaded: {} sources", count);
        Ok(count)
    }

    /// Fetches the scope's sessions and bootstraps or adopts one.
    pub async fn refresh_sessions(&self) -> BootstrapOutcome {
        self.bootstrapper.refresh().await
    }

    /// Feeds a session listing obtained elsewhere (e.g. a push update).
    pub async fn observe_sessions(&self, sessions: Vec<Session>) -> BootstrapOutcome {
        self.bootstrapper.observe(sessions).await
    }

    /// Loads the catalog, then bootstraps the session.
    pub async fn start(&self) -> Result<BootstrapOutcome> {
        self.load_catalog().await?;
        Ok(self.refresh_sessions().await)
    }

    // ============================================================================
    // Selection
    // ============================================================================

    pub async fn toggle_source(&self, source_id: &str) -> SelectionOutcome {
        let outcome = self.selection.toggle(source_id).await;
        if outcome == SelectionOutcome::SessionExpired {
            self.recover_session().await;
        }
        outcome
    }

    /// Selects the union of the current selection and `source_ids`, or
    /// deselects them all when every one is already selected.
    pub async fn select_sources(&self, source_ids: Vec<String>) -> SelectionOutcome {
        let outcome = self.selection.set_all(source_ids).await;
        if outcome == SelectionOutcome::SessionExpired {
            self.recover_session().await;
        }
        outcome
    }

    /// [`DiscoveryEngine::select_sources`] over every source of a catalog category.
    pub async fn toggle_category(&self, category: &str) -> SelectionOutcome {
        let group = self.state.read().await.catalog().ids_in_category(category);
        self.select_sources(group).await
    }

    /// Re-lists the scope's sessions after an expiry so a fresh session is
    /// adopted or created right away.
    async fn recover_session(&self) {
        let recovered = self.bootstrapper.refresh().await;
        tracing::info!("[DiscoveryEngine] Re-bootstrap after expiry: {:?}", recovered);
    }

    // ============================================================================
    // Parameters and settings
    // ============================================================================

    pub async fn update_parameters(&self, parameters: QueryParameters) -> ParameterOutcome {
        let outcome = self.parameters.update(parameters).await;
        if outcome == ParameterOutcome::SessionExpired {
            self.recover_session().await;
        }
        outcome
    }

    /// Sets a per-source override. Returns `false` for unselected sources.
    pub async fn set_source_parameters(&self, source_id: &str, parameters: QueryParameters) -> bool {
        self.state
            .write()
            .await
            .set_source_parameters(source_id, parameters)
    }

    /// Resets a per-source override to the shared parameters.
    pub async fn reset_source_parameters(&self, source_id: &str) -> bool {
        self.state.write().await.reset_source_parameters(source_id)
    }

    /// Returns `false` for unselected sources.
    pub async fn update_advanced_settings(&self, source_id: &str, settings: AdvancedSettings) -> bool {
        self.state
            .write()
            .await
            .set_advanced_settings(source_id, settings)
    }

    // ============================================================================
    // Validation, tests and promotion
    // ============================================================================

    /// Validates one source's effective parameters. `None` for unknown sources.
    pub async fn validate_source(&self, source_id: &str) -> Option<ValidationResult> {
        let state = self.state.read().await;
        let entry = state.entry(source_id)?;
        Some(validate(entry, &state.effective_parameters(source_id)))
    }

    /// Validation outcome for every selected source known to the catalog.
    pub async fn validate_selection(&self) -> Vec<ValidationResult> {
        let state = self.state.read().await;
        state
            .selected_sources()
            .iter()
            .filter_map(|id| {
                state
                    .entry(id)
                    .map(|entry| validate(entry, &state.effective_parameters(id)))
            })
            .collect()
    }

    pub async fn run_test(&self, source_id: &str) -> TestOutcome {
        let outcome = self.tests.run_test(source_id).await;
        if outcome == TestOutcome::SessionExpired {
            self.recover_session().await;
        }
        outcome
    }

    /// Runs a test for every selected source.
    pub async fn run_selected_tests(&self) -> Vec<(String, TestOutcome)> {
        let selected = self.state.read().await.selected_sources().to_vec();
        let outcomes = self.tests.run_tests(&selected).await;
        if outcomes
            .iter()
            .any(|(_, outcome)| *outcome == TestOutcome::SessionExpired)
        {
            self.recover_session().await;
        }
        outcomes
    }

    pub async fn build_promotion_config(&self, source_id: &str) -> PromotionConfig {
        self.promotions.build_config(source_id).await
    }

    pub async fn promote_to_space(&self, space_id: &str, source_ids: &[String]) -> PromotionReport {
        let report = self.promotions.promote(space_id, source_ids).await;
        if report.session_expired() {
            self.recover_session().await;
        }
        report
    }

    // ============================================================================
    // Outbound state
    // ============================================================================

    pub async fn view(&self) -> DiscoveryView {
        self.state.read().await.view()
    }

    pub async fn selected_sources(&self) -> Vec<String> {
        self.state.read().await.selected_sources().to_vec()
    }

    pub async fn capabilities(&self) -> CapabilitySet {
        self.state.read().await.capabilities().clone()
    }

    pub async fn parameters(&self) -> QueryParameters {
        self.state.read().await.parameters().clone()
    }

    pub async fn active_session_id(&self) -> Option<String> {
        self.state.read().await.active_session_id().map(str::to_string)
    }

    pub fn is_creating_session(&self) -> bool {
        self.bootstrapper.is_creation_latched()
    }
}
