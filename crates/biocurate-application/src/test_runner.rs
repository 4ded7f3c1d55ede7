//! Per-source test execution.

use crate::session::SessionBootstrapper;
use crate::state::SharedState;
use biocurate_core::error::CurateError;
use biocurate_core::notification::{Notification, NotificationSink};
use biocurate_core::parameters::{ValidationResult, validate};
use biocurate_core::session::{DiscoveryApi, TestRunRequest, TestRunResult};
use futures::future::join_all;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub enum TestOutcome {
    /// The server ran the test. `result.success` tells whether it passed.
    Completed(TestRunResult),
    /// Parameters do not satisfy the source's contract; nothing was sent.
    Invalid(ValidationResult),
    UnknownSource,
    NoSession,
    Failed(CurateError),
    SessionExpired,
}

/// Runs test queries one source at a time.
///
/// Parameters are validated against the source's own contract first; a
/// failure is reported for that source only and never reaches the server.
pub struct TestExecutionCoordinator {
    api: Arc<dyn DiscoveryApi>,
    state: SharedState,
    bootstrapper: Arc<SessionBootstrapper>,
    notifier: Arc<dyn NotificationSink>,
}

impl TestExecutionCoordinator {
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

    pub async fn run_test(&self, source_id: &str) -> TestOutcome {
        let (session_id, name, request) = {
            let state = self.state.read().await;
            let Some(entry) = state.entry(source_id) else {
                tracing::warn!("[TestExecution] Unknown source: {}", source_id);
                self.notifier.notify(
                    Notification::error(format!("Unknown source: {source_id}"))
                        .for_source(source_id),
                );
                return TestOutcome::UnknownSource;
            };
            let Some(session_id) = state.active_session_id() else {
                return TestOutcome::NoSession;
            };

            let parameters = state.effective_parameters(source_id);
            let validation = validate(entry, &parameters);
            if !validation.is_valid {
                let message = validation.message.as_deref().unwrap_or_default();
                tracing::info!(
                    "[TestExecution] {} failed validation: {}",
                    source_id,
                    message
                );
                self.notifier.notify(
                    Notification::error(format!("{}: {}", entry.name, message))
                        .for_source(source_id),
                );
                return TestOutcome::Invalid(validation);
            }

            (
                session_id.to_string(),
                entry.name.clone(),
                TestRunRequest {
                    session_id: session_id.to_string(),
                    source_id: source_id.to_string(),
                    parameters,
                },
            )
        };

        tracing::debug!("[TestExecution] Running test for {}", source_id);

        match self.api.execute_test(&request).await {
            Ok(result) => {
                let notification = if result.success {
                    let count = result
                        .result_count
                        .map(|n| format!(" ({n} results)"))
                        .unwrap_or_default();
                    Notification::success(format!("{name}: test completed{count}"))
                } else {
                    let reason = result.message.as_deref().unwrap_or("no details");
                    Notification::warning(format!("{name}: test failed: {reason}"))
                };
                self.notifier.notify(notification.for_source(source_id));
                TestOutcome::Completed(result)
            }
            Err(e) if e.is_session_expired() => {
                self.bootstrapper.expire(&session_id).await;
                TestOutcome::SessionExpired
            }
            Err(e) => {
                tracing::error!("[TestExecution] Test for {} failed: {}", source_id, e);
                self.notifier.notify(
                    Notification::error(format!("{name}: test execution failed: {e}"))
                        .for_source(source_id),
                );
                TestOutcome::Failed(e)
            }
        }
    }

    /// Runs several tests concurrently. Each source's outcome is independent.
    pub async fn run_tests(&self, source_ids: &[String]) -> Vec<(String, TestOutcome)> {
        let runs = source_ids.iter().map(|id| async move {
            let outcome = self.run_test(id).await;
            (id.clone(), outcome)
        });
        join_all(runs).await
    }
}
