//! Remote discovery service interface.

use super::model::{CreateSessionRequest, Session, SessionScope};
use crate::catalog::CatalogEntry;
use crate::error::Result;
use crate::parameters::QueryParameters;
use crate::settings::PromotionConfig;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestRunRequest {
    pub session_id: String,
    pub source_id: String,
    pub parameters: QueryParameters,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestRunResult {
    pub source_id: String,
    pub success: bool,
    #[serde(default)]
    pub result_count: Option<u64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub executed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromotionRequest {
    pub session_id: String,
    pub source_id: String,
    pub space_id: String,
    pub config: PromotionConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromotionResult {
    pub source_id: String,
    /// Id of the data source created inside the space
    #[serde(default)]
    pub data_source_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// The remote session/catalog service.
///
/// Implementations report HTTP failures as [`CurateError::Remote`](crate::CurateError::Remote)
/// with the response status; a 404 on a session-scoped call means the session
/// is gone. Timeouts and retries belong to the implementation.
#[async_trait]
pub trait DiscoveryApi: Send + Sync {
    /// Lists every source the catalog offers.
    async fn list_catalog(&self) -> Result<Vec<CatalogEntry>>;

    /// Lists the active sessions of a scope, canonical session first.
    async fn list_sessions(&self, scope: &SessionScope) -> Result<Vec<Session>>;

    /// Creates a session and returns the stored record.
    async fn create_session(&self, request: &CreateSessionRequest) -> Result<Session>;

    /// Flips one source's membership and returns the resulting full selection.
    ///
    /// The server may refuse an addition without failing the call; the
    /// returned list then lacks the requested id.
    async fn toggle_source(&self, session_id: &str, source_id: &str) -> Result<Vec<String>>;

    /// Replaces the whole selection and returns what the server kept.
    async fn set_selection(&self, session_id: &str, source_ids: &[String]) -> Result<Vec<String>>;

    /// Stores the shared parameters of a session.
    async fn update_parameters(
        &self,
        session_id: &str,
        parameters: &QueryParameters,
    ) -> Result<Session>;

    /// Runs a test query for one source.
    async fn execute_test(&self, request: &TestRunRequest) -> Result<TestRunResult>;

    /// Turns a tested source into a configured data source inside a space.
    async fn promote_to_space(&self, request: &PromotionRequest) -> Result<PromotionResult>;
}
