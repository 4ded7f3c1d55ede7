//! Shared parameter updates against the session record.

use super::bootstrapper::SessionBootstrapper;
use crate::optimistic::optimistic_update;
use crate::state::SharedState;
use biocurate_core::error::CurateError;
use biocurate_core::notification::{Notification, NotificationSink};
use biocurate_core::parameters::{QueryParameters, sanitized};
use biocurate_core::session::{DiscoveryApi, Session};
use std::sync::Arc;

pub const PARAMETERS_FAILED_MESSAGE: &str = "Failed to save query parameters. Please try again.";

#[derive(Debug, Clone, PartialEq)]
pub enum ParameterOutcome {
    /// Stored on the server; holds the parameters now in effect.
    Saved(QueryParameters),
    /// No session yet. Kept locally; they seed the session once it is created.
    LocalOnly(QueryParameters),
    RolledBack(CurateError),
    SessionExpired,
}

pub struct ParameterSynchronizer {
    api: Arc<dyn DiscoveryApi>,
    state: SharedState,
    bootstrapper: Arc<SessionBootstrapper>,
    notifier: Arc<dyn NotificationSink>,
}

impl ParameterSynchronizer {
    pub fn new(
        api: Arc<dyn DiscoveryApi>,
        state: SharedState,
        bootstrapper: Arc<SessionBootstrapper>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            api,
            state,
            bootstrapper,
            notifier,
        }
    }

    /// Replaces the shared parameters, sanitized against the effective
    /// capabilities, and stores them on the session.
    pub async fn update(&self, parameters: QueryParameters) -> ParameterOutcome {
        let (session_id, next) = {
            let mut state = self.state.write().await;
            let next = sanitized(&parameters, state.capabilities());
            match state.active_session_id().map(str::to_string) {
                Some(id) => (id, next),
                None => {
                    state.set_parameters(next.clone());
                    return ParameterOutcome::LocalOnly(next);
                }
            }
        };

        let api = Arc::clone(&self.api);
        let remote_session = session_id.clone();
        let request = next.clone();
        let result = optimistic_update(
            &self.state,
            "update_parameters",
            |state| state.set_parameters(next.clone()),
            || async move { api.update_parameters(&remote_session, &request).await },
            |state, session: &Session| {
                if state.active_session_id() == Some(session_id.as_str())
                    && *state.parameters() != session.current_parameters
                {
                    state.set_parameters(session.current_parameters.clone());
                }
            },
        )
        .await;

        match result {
            Ok(_) => ParameterOutcome::Saved(self.state.read().await.parameters().clone()),
            Err(e) if e.is_session_expired() => {
                self.bootstrapper.expire(&session_id).await;
                ParameterOutcome::SessionExpired
            }
            Err(e) => {
                tracing::error!("[ParameterSynchronizer] Parameter update failed: {}", e);
                self.notifier
                    .notify(Notification::error(PARAMETERS_FAILED_MESSAGE));
                ParameterOutcome::RolledBack(e)
            }
        }
    }
}
