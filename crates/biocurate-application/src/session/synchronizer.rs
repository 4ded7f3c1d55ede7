//! Selection synchronization between the local mirror and the session record.

use super::bootstrapper::SessionBootstrapper;
use crate::optimistic::optimistic_update;
use crate::state::{SharedState, dedupe_ids};
use biocurate_core::error::CurateError;
use biocurate_core::notification::{Notification, NotificationSink};
use biocurate_core::session::DiscoveryApi;
use std::sync::Arc;

pub const SELECTION_FAILED_MESSAGE: &str =
    "Failed to update the source selection. Please try again.";

/// Result of a selection mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionOutcome {
    /// The server answered; `selected` is now the local selection.
    /// `rejected` lists requested additions the server left out.
    Applied {
        selected: Vec<String>,
        rejected: Vec<String>,
    },
    /// Nothing to send: the requested selection equals the current one.
    Unchanged,
    /// No active session yet; the request was dropped.
    NoSession,
    /// The remote call failed and the local selection was restored.
    RolledBack(CurateError),
    /// The session is gone; local session state was cleared.
    SessionExpired,
}

/// The only component that mutates the selection.
///
/// Each mutation is applied locally first, then sent with the full target set,
/// then replaced by exactly what the server returns. Concurrent mutations are
/// not serialized; whichever resolves last decides the final selection.
pub struct SelectionSynchronizer {
    api: Arc<dyn DiscoveryApi>,
    state: SharedState,
    bootstrapper: Arc<SessionBootstrapper>,
    notifier: Arc<dyn NotificationSink>,
}

impl SelectionSynchronizer {
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

    /// Flips the membership of one source.
    pub async fn toggle(&self, source_id: &str) -> SelectionOutcome {
        let (session_id, target) = {
            let state = self.state.read().await;
            let Some(session_id) = state.active_session_id() else {
                tracing::debug!(
                    "[SelectionSynchronizer] No active session, ignoring toggle of {}",
                    source_id
                );
                return SelectionOutcome::NoSession;
            };
            let current = state.selected_sources();
            let target: Vec<String> = if state.is_selected(source_id) {
                current.iter().filter(|id| *id != source_id).cloned().collect()
            } else {
                current
                    .iter()
                    .cloned()
                    .chain(std::iter::once(source_id.to_string()))
                    .collect()
            };
            (session_id.to_string(), target)
        };

        let api = Arc::clone(&self.api);
        let remote_session = session_id.clone();
        let result = optimistic_update(
            &self.state,
            "toggle",
            |state| {
                state.apply_selection(target.clone());
            },
            || async move { api.toggle_source(&remote_session, source_id).await },
            |state, returned: &Vec<String>| {
                if state.active_session_id() == Some(session_id.as_str()) {
                    state.apply_selection(returned.clone());
                }
            },
        )
        .await;

        self.finish(&session_id, &target, result).await
    }

    /// Bulk selection over a group of sources (e.g. one catalog category).
    ///
    /// If every id of the group is already selected the whole group is
    /// deselected; otherwise the group is added to the current selection.
    pub async fn set_all(&self, group: Vec<String>) -> SelectionOutcome {
        let group = dedupe_ids(group);

        let (session_id, target) = {
            let state = self.state.read().await;
            let Some(session_id) = state.active_session_id() else {
                tracing::debug!("[SelectionSynchronizer] No active session, ignoring bulk selection");
                return SelectionOutcome::NoSession;
            };
            let current = state.selected_sources();
            let target = bulk_target(current, &group);
            if target == current {
                return SelectionOutcome::Unchanged;
            }
            (session_id.to_string(), target)
        };

        let api = Arc::clone(&self.api);
        let remote_session = session_id.clone();
        let request = target.clone();
        let result = optimistic_update(
            &self.state,
            "set_all",
            |state| {
                state.apply_selection(target.clone());
            },
            || async move { api.set_selection(&remote_session, &request).await },
            |state, returned: &Vec<String>| {
                if state.active_session_id() == Some(session_id.as_str()) {
                    state.apply_selection(returned.clone());
                }
            },
        )
        .await;

        self.finish(&session_id, &target, result).await
    }

    async fn finish(
        &self,
        session_id: &str,
        expected: &[String],
        result: Result<Vec<String>, CurateError>,
    ) -> SelectionOutcome {
        match result {
            Ok(returned) => {
                let rejected: Vec<String> = expected
                    .iter()
                    .filter(|id| !returned.contains(id))
                    .cloned()
                    .collect();
                if !rejected.is_empty() {
                    // The server may refuse additions without failing the call
                    let state = self.state.read().await;
                    for id in &rejected {
                        let name = state.catalog().display_name(id);
                        tracing::warn!(
                            "[SelectionSynchronizer] Server did not select {} in session {}",
                            id,
                            session_id
                        );
                        self.notifier.notify(
                            Notification::warning(format!(
                                "{name} could not be selected. Check its required parameters."
                            ))
                            .for_source(id.clone()),
                        );
                    }
                }
                SelectionOutcome::Applied {
                    selected: returned,
                    rejected,
                }
            }
            Err(e) if e.is_session_expired() => {
                self.bootstrapper.expire(session_id).await;
                SelectionOutcome::SessionExpired
            }
            Err(e) => {
                tracing::error!("[SelectionSynchronizer] Selection update failed: {}", e);
                self.notifier
                    .notify(Notification::error(SELECTION_FAILED_MESSAGE));
                SelectionOutcome::RolledBack(e)
            }
        }
    }
}

/// Target selection for a bulk operation over `group`.
pub fn bulk_target(current: &[String], group: &[String]) -> Vec<String> {
    let all_selected = !group.is_empty() && group.iter().all(|id| current.contains(id));
    if all_selected {
        current
            .iter()
            .filter(|id| !group.contains(id))
            .cloned()
            .collect()
    } else {
        dedupe_ids(current.iter().chain(group.iter()).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_bulk_target_adds_missing_group_members() {
        assert_eq!(
            bulk_target(&ids(&["a", "x"]), &ids(&["a", "b", "c"])),
            ids(&["a", "x", "b", "c"])
        );
    }

    #[test]
    fn test_bulk_target_removes_fully_selected_group() {
        assert_eq!(
            bulk_target(&ids(&["a", "x", "b"]), &ids(&["a", "b"])),
            ids(&["x"])
        );
    }

    #[test]
    fn test_bulk_target_empty_group_is_identity() {
        assert_eq!(bulk_target(&ids(&["a"]), &[]), ids(&["a"]));
    }
}
