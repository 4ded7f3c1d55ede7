//! Error types for the discovery engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the whole discovery engine.
///
/// Remote failures, session expiry and per-source validation failures are kept
/// as separate variants so the engine can choose between rollback, re-bootstrap
/// and a source-scoped message without inspecting strings.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CurateError {
    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound { entity_type: String, id: String },

    /// The remote session no longer exists
    #[error("Session expired: '{session_id}'")]
    SessionExpired { session_id: String },

    /// Remote API failure. `status` is `None` for transport failures.
    #[error("Remote error{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    Remote { status: Option<u16>, message: String },

    /// A source's parameters do not satisfy its parameter contract
    #[error("{source_name}: {message}")]
    Validation {
        source_id: String,
        source_name: String,
        message: String,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CurateError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.to_string(),
            id: id.into(),
        }
    }

    /// Creates a Remote error carrying an HTTP status
    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        Self::Remote {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Creates a SessionExpired error for `session_id`
    pub fn session_expired(session_id: impl Into<String>) -> Self {
        Self::SessionExpired {
            session_id: session_id.into(),
        }
    }

    /// Creates a Remote error for a transport failure (no response received)
    pub fn network(message: impl Into<String>) -> Self {
        Self::Remote {
            status: None,
            message: message.into(),
        }
    }

    /// Creates a Validation error attributed to one source
    pub fn validation(
        source_id: impl Into<String>,
        source_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Validation {
            source_id: source_id.into(),
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this error means the session-scoped call hit a session that no
    /// longer exists on the server.
    ///
    /// Returns true for:
    /// - `SessionExpired` errors
    /// - `Remote` errors with status 404
    pub fn is_session_expired(&self) -> bool {
        match self {
            Self::SessionExpired { .. } => true,
            Self::Remote { status, .. } => *status == Some(404),
            _ => false,
        }
    }

    /// Check if this is a source-scoped validation failure
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Check if this is a network failure or a 5xx response
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Remote { status: None, .. } => true,
            Self::Remote {
                status: Some(code), ..
            } => *code >= 500,
            _ => false,
        }
    }

    /// The source this error is attributed to, if any
    pub fn source_id(&self) -> Option<&str> {
        match self {
            Self::Validation { source_id, .. } => Some(source_id),
            _ => None,
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for CurateError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(format!("{} (kind: {:?})", err, err.kind()))
    }
}

impl From<serde_json::Error> for CurateError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for CurateError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from anyhow::Error
impl From<anyhow::Error> for CurateError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Conversion from String (for error messages)
impl From<String> for CurateError {
    fn from(err: String) -> Self {
        Self::Internal(err)
    }
}

/// A type alias for `Result<T, CurateError>`.
pub type Result<T> = std::result::Result<T, CurateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_404_counts_as_session_expired() {
        assert!(CurateError::remote(404, "gone").is_session_expired());
        assert!(CurateError::session_expired("s1").is_session_expired());
        assert!(!CurateError::remote(500, "boom").is_session_expired());
        assert!(!CurateError::network("reset").is_session_expired());
    }

    #[test]
    fn test_transient_classification() {
        assert!(CurateError::network("reset").is_transient());
        assert!(CurateError::remote(503, "unavailable").is_transient());
        assert!(!CurateError::remote(400, "bad").is_transient());
        assert!(!CurateError::validation("x", "X", "missing").is_transient());
    }

    #[test]
    fn test_validation_display_names_source() {
        let err = CurateError::validation("pubmed", "PubMed", "A gene symbol is required");
        assert_eq!(err.to_string(), "PubMed: A gene symbol is required");
        assert_eq!(err.source_id(), Some("pubmed"));
    }

    #[test]
    fn test_remote_display() {
        assert_eq!(
            CurateError::remote(502, "bad gateway").to_string(),
            "Remote error (502): bad gateway"
        );
        assert_eq!(
            CurateError::network("refused").to_string(),
            "Remote error: refused"
        );
    }
}
