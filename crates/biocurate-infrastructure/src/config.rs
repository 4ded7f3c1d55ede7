//! Engine configuration.
//!
//! Settings are read from `~/.config/biocurate/config.toml` and then
//! overridden by `BIOCURATE_*` environment variables. A missing file yields
//! the defaults.

use biocurate_core::error::{CurateError, Result};
use biocurate_core::session::SessionScope;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOG_FILTER: &str = "info";

pub const ENV_API_URL: &str = "BIOCURATE_API_URL";
pub const ENV_API_TOKEN: &str = "BIOCURATE_API_TOKEN";
pub const ENV_API_TIMEOUT_SECS: &str = "BIOCURATE_API_TIMEOUT_SECS";
pub const ENV_SPACE_ID: &str = "BIOCURATE_SPACE_ID";
pub const ENV_LOG: &str = "BIOCURATE_LOG";

const CONFIG_DIR_NAME: &str = "biocurate";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Connection settings for the discovery backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeConfig {
    /// Research space the engine works in. `None` means the user's own scope.
    pub space_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub api: ApiConfig,
    pub log_filter: String,
    pub scope: ScopeConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            scope: ScopeConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Default location of the config file.
    pub fn default_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
            .ok_or_else(|| CurateError::config("Cannot find config directory"))
    }

    /// Parses a config file. A missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("[Config] {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            CurateError::config(format!("Invalid config file {}: {}", path.display(), e))
        })
    }

    /// Loads the default config file and applies the process environment.
    pub fn load() -> Result<Self> {
        let mut config = Self::from_file(&Self::default_path()?)?;
        let env: HashMap<String, String> = std::env::vars().collect();
        config.apply_overrides(&env)?;
        Ok(config)
    }

    /// Applies `BIOCURATE_*` overrides from a key/value map. Blank values are ignored.
    pub fn apply_overrides(&mut self, vars: &HashMap<String, String>) -> Result<()> {
        let get = |key: &str| {
            vars.get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        if let Some(url) = get(ENV_API_URL) {
            self.api.base_url = url;
        }
        if let Some(token) = get(ENV_API_TOKEN) {
            self.api.api_token = Some(token);
        }
        if let Some(raw) = get(ENV_API_TIMEOUT_SECS) {
            self.api.timeout_secs = raw.parse().map_err(|_| {
                CurateError::config(format!("{ENV_API_TIMEOUT_SECS} must be a number, got {raw:?}"))
            })?;
        }
        if let Some(space_id) = get(ENV_SPACE_ID) {
            self.scope.space_id = Some(space_id);
        }
        if let Some(filter) = get(ENV_LOG) {
            self.log_filter = filter;
        }
        Ok(())
    }

    pub fn session_scope(&self) -> SessionScope {
        SessionScope {
            space_id: self.scope.space_id.clone(),
        }
    }
}
