//! Discovery session record as owned by the server.

use crate::parameters::QueryParameters;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a session lives: the user's own scope or a space (project).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionScope {
    pub space_id: Option<String>,
}

impl SessionScope {
    pub fn user() -> Self {
        Self::default()
    }

    pub fn space(space_id: impl Into<String>) -> Self {
        Self {
            space_id: Some(space_id.into()),
        }
    }
}

/// Server-owned discovery session.
///
/// `selected_sources` is the authoritative selection; the engine only ever
/// mirrors it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub owner_id: String,
    #[serde(default)]
    pub space_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub selected_sources: Vec<String>,
    #[serde(default)]
    pub current_parameters: QueryParameters,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

/// Payload for lazily creating the session of a scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    pub space_id: Option<String>,
    pub name: String,
    pub initial_parameters: QueryParameters,
}
