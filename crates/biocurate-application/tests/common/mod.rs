#![allow(dead_code)]

use async_trait::async_trait;
use biocurate_core::capability::{CapabilityFlag, CapabilitySet};
use biocurate_core::catalog::{CatalogEntry, ParamType, SourceType};
use biocurate_core::error::{CurateError, Result};
use biocurate_core::notification::{Notification, NotificationLevel, NotificationSink};
use biocurate_core::parameters::QueryParameters;
use biocurate_core::session::{
    CreateSessionRequest, DiscoveryApi, PromotionRequest, PromotionResult, Session, SessionScope,
    TestRunRequest, TestRunResult,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use uuid::Uuid;

// Mock DiscoveryApi for testing
#[derive(Default)]
pub struct MockDiscoveryApi {
    pub inner: Mutex<MockServer>,
    /// When set, `create_session` waits for a permit before answering
    pub create_gate: Option<Arc<Notify>>,
}

#[derive(Default)]
pub struct MockServer {
    pub catalog: Vec<CatalogEntry>,
    pub sessions: Vec<Session>,
    /// Ids the server refuses to add to a selection
    pub rejected_sources: HashSet<String>,
    pub toggle_error: Option<CurateError>,
    pub set_error: Option<CurateError>,
    pub create_error: Option<CurateError>,
    pub parameters_error: Option<CurateError>,
    pub test_errors: HashMap<String, CurateError>,
    pub promote_errors: HashMap<String, CurateError>,
    pub create_calls: usize,
    pub toggle_calls: usize,
    pub set_calls: usize,
    pub test_requests: Vec<TestRunRequest>,
    pub promote_requests: Vec<PromotionRequest>,
}

impl MockDiscoveryApi {
    pub fn with_catalog(catalog: Vec<CatalogEntry>) -> Self {
        let api = Self::default();
        api.inner.lock().unwrap().catalog = catalog;
        api
    }

    pub fn server(&self) -> std::sync::MutexGuard<'_, MockServer> {
        self.inner.lock().unwrap()
    }

    /// Simulates the server dropping every session.
    pub fn expire_all_sessions(&self) {
        self.server().sessions.clear();
    }

    pub fn insert_session(&self, id: &str, selected: &[&str]) -> Session {
        let session = session(id, selected);
        self.server().sessions.push(session.clone());
        session
    }
}

fn not_found(session_id: &str) -> CurateError {
    CurateError::remote(404, format!("session {session_id} not found"))
}

impl MockServer {
    fn session_mut(&mut self, session_id: &str) -> Result<&mut Session> {
        self.sessions
            .iter_mut()
            .find(|s| s.id == session_id)
            .ok_or_else(|| not_found(session_id))
    }
}

#[async_trait]
impl DiscoveryApi for MockDiscoveryApi {
    async fn list_catalog(&self) -> Result<Vec<CatalogEntry>> {
        Ok(self.server().catalog.clone())
    }

    async fn list_sessions(&self, scope: &SessionScope) -> Result<Vec<Session>> {
        Ok(self
            .server()
            .sessions
            .iter()
            .filter(|s| s.space_id == scope.space_id)
            .cloned()
            .collect())
    }

    async fn create_session(&self, request: &CreateSessionRequest) -> Result<Session> {
        if let Some(gate) = &self.create_gate {
            gate.notified().await;
        }
        let mut server = self.server();
        server.create_calls += 1;
        if let Some(err) = server.create_error.take() {
            return Err(err);
        }
        let mut created = session(&Uuid::new_v4().to_string(), &[]);
        created.space_id = request.space_id.clone();
        created.name = Some(request.name.clone());
        created.current_parameters = request.initial_parameters.clone();
        server.sessions.push(created.clone());
        Ok(created)
    }

    async fn toggle_source(&self, session_id: &str, source_id: &str) -> Result<Vec<String>> {
        let mut server = self.server();
        server.toggle_calls += 1;
        if let Some(err) = server.toggle_error.take() {
            return Err(err);
        }
        let rejected = server.rejected_sources.contains(source_id);
        let session = server.session_mut(session_id)?;
        if let Some(pos) = session.selected_sources.iter().position(|id| id == source_id) {
            session.selected_sources.remove(pos);
        } else if !rejected {
            session.selected_sources.push(source_id.to_string());
        }
        Ok(session.selected_sources.clone())
    }

    async fn set_selection(&self, session_id: &str, source_ids: &[String]) -> Result<Vec<String>> {
        let mut server = self.server();
        server.set_calls += 1;
        if let Some(err) = server.set_error.take() {
            return Err(err);
        }
        let kept: Vec<String> = source_ids
            .iter()
            .filter(|id| !server.rejected_sources.contains(*id))
            .cloned()
            .collect();
        let session = server.session_mut(session_id)?;
        session.selected_sources = kept;
        Ok(session.selected_sources.clone())
    }

    async fn update_parameters(
        &self,
        session_id: &str,
        parameters: &QueryParameters,
    ) -> Result<Session> {
        let mut server = self.server();
        if let Some(err) = server.parameters_error.take() {
            return Err(err);
        }
        let session = server.session_mut(session_id)?;
        session.current_parameters = parameters.clone();
        Ok(session.clone())
    }

    async fn execute_test(&self, request: &TestRunRequest) -> Result<TestRunResult> {
        let mut server = self.server();
        server.test_requests.push(request.clone());
        if let Some(err) = server.test_errors.remove(&request.source_id) {
            return Err(err);
        }
        server.session_mut(&request.session_id)?;
        Ok(TestRunResult {
            source_id: request.source_id.clone(),
            success: true,
            result_count: Some(42),
            message: None,
            executed_at: Some(chrono::Utc::now()),
        })
    }

    async fn promote_to_space(&self, request: &PromotionRequest) -> Result<PromotionResult> {
        let mut server = self.server();
        server.promote_requests.push(request.clone());
        if let Some(err) = server.promote_errors.remove(&request.source_id) {
            return Err(err);
        }
        server.session_mut(&request.session_id)?;
        Ok(PromotionResult {
            source_id: request.source_id.clone(),
            data_source_id: Some(format!("ds-{}", request.source_id)),
            message: None,
        })
    }
}

// Notification sink that keeps everything it receives
#[derive(Default)]
pub struct RecordingSink {
    pub notifications: Mutex<Vec<Notification>>,
}

impl RecordingSink {
    pub fn all(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }

    pub fn with_level(&self, level: NotificationLevel) -> Vec<Notification> {
        self.all().into_iter().filter(|n| n.level == level).collect()
    }

    pub fn contains(&self, text: &str) -> bool {
        self.all().iter().any(|n| n.message.contains(text))
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, notification: Notification) {
        self.notifications.lock().unwrap().push(notification);
    }
}

pub fn session(id: &str, selected: &[&str]) -> Session {
    let now = chrono::Utc::now();
    Session {
        id: id.to_string(),
        owner_id: "curator-1".to_string(),
        space_id: None,
        name: None,
        selected_sources: selected.iter().map(|s| s.to_string()).collect(),
        current_parameters: QueryParameters::default(),
        is_active: true,
        created_at: now,
        last_activity_at: now,
    }
}

pub fn entry(
    id: &str,
    name: &str,
    category: &str,
    param_type: ParamType,
    capabilities: CapabilitySet,
) -> CatalogEntry {
    CatalogEntry {
        id: id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
        description: None,
        source_type: SourceType::LiteratureSearch,
        param_type,
        capabilities,
        is_active: true,
    }
}

/// X requires a gene and has no date range; Y needs nothing and supports
/// everything; Z requires a search term and lives in another category.
pub fn catalog() -> Vec<CatalogEntry> {
    let mut x_caps =
        CapabilitySet::permissive().with_flag(CapabilityFlag::SupportsDateRange, false);
    x_caps.max_results_limit = 300;
    vec![
        entry("x", "Source X", "Literature", ParamType::Gene, x_caps),
        entry(
            "y",
            "Source Y",
            "Literature",
            ParamType::None,
            CapabilitySet::permissive(),
        ),
        entry(
            "z",
            "Source Z",
            "Variants",
            ParamType::Term,
            CapabilitySet::permissive().with_flag(CapabilityFlag::SupportsOrganism, false),
        ),
    ]
}

pub fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
