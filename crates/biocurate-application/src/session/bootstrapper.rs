//! Ensures one active discovery session exists for the engine's scope.

use crate::state::SharedState;
use biocurate_core::error::CurateError;
use biocurate_core::notification::{Notification, NotificationSink};
use biocurate_core::session::{CreateSessionRequest, DiscoveryApi, Session, SessionScope};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub const SESSION_EXPIRED_MESSAGE: &str =
    "Your discovery session expired. A new session is being created.";
pub const SESSION_CREATE_FAILED_MESSAGE: &str =
    "Could not start a discovery session. Please try again.";
const DEFAULT_SESSION_NAME: &str = "Data discovery";

/// Result of observing the scope's session list.
#[derive(Debug, Clone, PartialEq)]
pub enum BootstrapOutcome {
    /// An existing session was adopted. `changed` is false when local state
    /// already matched it.
    Adopted { session_id: String, changed: bool },
    /// No session existed and one was created.
    Created { session_id: String },
    /// No session listed, but a creation is in flight or already completed.
    CreationSuppressed,
    /// Creation was attempted and failed; the latch is re-armed.
    CreationFailed(CurateError),
    /// The session list could not be fetched.
    ListFailed(CurateError),
}

impl BootstrapOutcome {
    pub fn session_id(&self) -> Option<&str> {
        match self {
            Self::Adopted { session_id, .. } | Self::Created { session_id } => Some(session_id),
            _ => None,
        }
    }
}

/// Lazily creates the scope's session and reconciles local state with
/// whichever session the server reports.
///
/// At most one creation is in flight per instance. The latch stays closed
/// after a successful creation until a listing shows a session, so a stale
/// empty listing cannot cause a second creation. It is re-armed when creation
/// fails or the session expires.
pub struct SessionBootstrapper {
    api: Arc<dyn DiscoveryApi>,
    state: SharedState,
    notifier: Arc<dyn NotificationSink>,
    scope: SessionScope,
    creation_latch: AtomicBool,
}

impl SessionBootstrapper {
    pub fn new(
        api: Arc<dyn DiscoveryApi>,
        state: SharedState,
        notifier: Arc<dyn NotificationSink>,
        scope: SessionScope,
    ) -> Self {
        Self {
            api,
            state,
            notifier,
            scope,
            creation_latch: AtomicBool::new(false),
        }
    }

    pub fn scope(&self) -> &SessionScope {
        &self.scope
    }

    /// True while session creation is suppressed.
    pub fn is_creation_latched(&self) -> bool {
        self.creation_latch.load(Ordering::SeqCst)
    }

    /// Fetches the scope's sessions and observes them.
    pub async fn refresh(&self) -> BootstrapOutcome {
        match self.api.list_sessions(&self.scope).await {
            Ok(sessions) => self.observe(sessions).await,
            Err(e) => {
                tracing::warn!("[SessionBootstrapper] Failed to list sessions: {}", e);
                BootstrapOutcome::ListFailed(e)
            }
        }
    }

    /// Reacts to one observation of the scope's session list.
    pub async fn observe(&self, sessions: Vec<Session>) -> BootstrapOutcome {
        if let Some(canonical) = sessions.into_iter().next() {
            self.creation_latch.store(false, Ordering::SeqCst);
            let session_id = canonical.id.clone();
            let changed = self.adopt(canonical).await;
            return BootstrapOutcome::Adopted {
                session_id,
                changed,
            };
        }

        if self
            .creation_latch
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!("[SessionBootstrapper] Creation already in flight, skipping");
            return BootstrapOutcome::CreationSuppressed;
        }

        let request = {
            let state = self.state.read().await;
            CreateSessionRequest {
                space_id: self.scope.space_id.clone(),
                name: DEFAULT_SESSION_NAME.to_string(),
                initial_parameters: state.parameters().clone(),
            }
        };

        tracing::info!(
            "[SessionBootstrapper] No session for scope {:?}, creating one",
            self.scope.space_id
        );

        match self.api.create_session(&request).await {
            Ok(session) => {
                let session_id = session.id.clone();
                tracing::info!("[SessionBootstrapper] Created session: {}", session_id);
                self.adopt(session).await;
                BootstrapOutcome::Created { session_id }
            }
            Err(e) => {
                tracing::error!("[SessionBootstrapper] Session creation failed: {}", e);
                self.creation_latch.store(false, Ordering::SeqCst);
                self.notifier
                    .notify(Notification::error(SESSION_CREATE_FAILED_MESSAGE));
                BootstrapOutcome::CreationFailed(e)
            }
        }
    }

    /// Reconciles local state with `session`, touching only what differs.
    ///
    /// Returns `true` when anything changed.
    async fn adopt(&self, session: Session) -> bool {
        let mut state = self.state.write().await;
        let mut changed = false;

        if state.active_session_id() != Some(session.id.as_str()) {
            tracing::info!("[SessionBootstrapper] Adopting session: {}", session.id);
            state.set_active_session(Some(session.id.clone()));
            changed = true;
        }
        changed |= state.adopt_remote(session.selected_sources, session.current_parameters);
        changed
    }

    /// Drops the expired session and everything scoped to it, and re-arms
    /// creation so the next observation bootstraps a fresh session.
    ///
    /// A no-op when `session_id` is no longer the active session.
    pub async fn expire(&self, session_id: &str) {
        {
            let mut state = self.state.write().await;
            if state.active_session_id() != Some(session_id) {
                tracing::debug!(
                    "[SessionBootstrapper] Session {} already replaced, ignoring expiry",
                    session_id
                );
                return;
            }
            state.clear_session();
        }
        self.creation_latch.store(false, Ordering::SeqCst);
        tracing::warn!("[SessionBootstrapper] Session expired: {}", session_id);
        self.notifier
            .notify(Notification::warning(SESSION_EXPIRED_MESSAGE));
    }
}
