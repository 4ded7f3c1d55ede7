//! Promotion of tested sources into a space.

use crate::session::SessionBootstrapper;
use crate::state::SharedState;
use biocurate_core::error::CurateError;
use biocurate_core::notification::{Notification, NotificationSink};
use biocurate_core::parameters::validate;
use biocurate_core::session::{DiscoveryApi, PromotionRequest, PromotionResult};
use biocurate_core::settings::{PromotionConfig, build_promotion_config};
use futures::future::join_all;
use std::sync::Arc;

pub const PARTIAL_PROMOTION_MESSAGE: &str = "Some sources could not be added to the space.";
pub const PROMOTION_FAILED_MESSAGE: &str = "No sources could be added to the space.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromotionStatus {
    Empty,
    AllSucceeded,
    Partial,
    AllFailed,
}

/// Aggregate result of promoting several sources. Successes are kept even
/// when other sources failed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PromotionReport {
    pub succeeded: Vec<PromotionResult>,
    pub failed: Vec<(String, CurateError)>,
}

impl PromotionReport {
    pub fn status(&self) -> PromotionStatus {
        match (self.succeeded.is_empty(), self.failed.is_empty()) {
            (true, true) => PromotionStatus::Empty,
            (false, true) => PromotionStatus::AllSucceeded,
            (false, false) => PromotionStatus::Partial,
            (true, false) => PromotionStatus::AllFailed,
        }
    }

    /// True when a promotion hit a session the server no longer has.
    pub fn session_expired(&self) -> bool {
        self.failed
            .iter()
            .any(|(_, e)| matches!(e, CurateError::SessionExpired { .. }))
    }
}

pub struct PromotionCoordinator {
    api: Arc<dyn DiscoveryApi>,
    state: SharedState,
    bootstrapper: Arc<SessionBootstrapper>,
    notifier: Arc<dyn NotificationSink>,
}

impl PromotionCoordinator {
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

    /// Promotion payload for one source from its advanced settings.
    /// Sources without settings yield an empty config.
    pub async fn build_config(&self, source_id: &str) -> PromotionConfig {
        let state = self.state.read().await;
        build_promotion_config(state.advanced_settings(source_id))
    }

    /// Promotes each source independently and reports in aggregate.
    pub async fn promote(&self, space_id: &str, source_ids: &[String]) -> PromotionReport {
        let mut report = PromotionReport::default();

        let (session_id, requests) = {
            let state = self.state.read().await;
            let Some(session_id) = state.active_session_id() else {
                self.notifier
                    .notify(Notification::warning("No active discovery session to promote from."));
                report.failed = source_ids
                    .iter()
                    .map(|id| (id.clone(), CurateError::not_found("Session", "active")))
                    .collect();
                return report;
            };

            let mut requests = Vec::new();
            for source_id in source_ids {
                let Some(entry) = state.entry(source_id) else {
                    report
                        .failed
                        .push((source_id.clone(), CurateError::not_found("Source", source_id)));
                    continue;
                };
                let validation = validate(entry, &state.effective_parameters(source_id));
                if let Err(e) = validation.into_result() {
                    self.notifier
                        .notify(Notification::error(e.to_string()).for_source(source_id.clone()));
                    report.failed.push((source_id.clone(), e));
                    continue;
                }
                requests.push(PromotionRequest {
                    session_id: session_id.to_string(),
                    source_id: source_id.clone(),
                    space_id: space_id.to_string(),
                    config: build_promotion_config(state.advanced_settings(source_id)),
                });
            }
            (session_id.to_string(), requests)
        };

        let results = join_all(requests.iter().map(|request| async move {
            (
                request.source_id.clone(),
                self.api.promote_to_space(request).await,
            )
        }))
        .await;

        let mut expired = false;
        for (source_id, result) in results {
            match result {
                Ok(promoted) => report.succeeded.push(promoted),
                Err(e) if e.is_session_expired() => {
                    tracing::warn!("[Promotion] {} hit an expired session: {}", source_id, e);
                    expired = true;
                    report
                        .failed
                        .push((source_id, CurateError::session_expired(session_id.as_str())));
                }
                Err(e) => {
                    tracing::warn!("[Promotion] {} could not be promoted: {}", source_id, e);
                    report.failed.push((source_id, e));
                }
            }
        }

        // The expiry notice replaces the summary
        if expired {
            self.bootstrapper.expire(&session_id).await;
        } else {
            self.notify_summary(&report);
        }
        report
    }

    fn notify_summary(&self, report: &PromotionReport) {
        let notification = match report.status() {
            PromotionStatus::Empty => return,
            PromotionStatus::AllSucceeded => Notification::success(format!(
                "Added {} source(s) to the space.",
                report.succeeded.len()
            )),
            PromotionStatus::Partial => Notification::warning(PARTIAL_PROMOTION_MESSAGE),
            PromotionStatus::AllFailed => Notification::error(PROMOTION_FAILED_MESSAGE),
        };
        tracing::info!(
            "[Promotion] {} succeeded, {} failed",
            report.succeeded.len(),
            report.failed.len()
        );
        self.notifier.notify(notification);
    }
}
