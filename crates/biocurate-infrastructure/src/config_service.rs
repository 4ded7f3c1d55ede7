//! Configuration service implementation.
//!
//! This module provides a ConfigService that loads the engine configuration
//! once and serves the cached copy until invalidated.

use crate::config::EngineConfig;
use biocurate_core::error::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Loads and caches the engine configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    /// Explicit config file. `None` uses the default location.
    path: Option<PathBuf>,
    config: Arc<RwLock<Option<EngineConfig>>>,
}

impl ConfigService {
    pub fn new() -> Self {
        Self {
            path: None,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Reads from `path` instead of `~/.config/biocurate/config.toml`.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Returns the configuration, loading it on first access.
    pub async fn get_config(&self) -> Result<EngineConfig> {
        if let Some(cached) = self.config.read().await.as_ref() {
            return Ok(cached.clone());
        }

        let mut slot = self.config.write().await;
        // Another task may have loaded it while we waited for the lock
        if let Some(cached) = slot.as_ref() {
            return Ok(cached.clone());
        }
        let loaded = self.load()?;
        tracing::info!("[ConfigService] Loaded config (api: {})", loaded.api.base_url);
        *slot = Some(loaded.clone());
        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub async fn invalidate_cache(&self) {
        *self.config.write().await = None;
    }

    fn load(&self) -> Result<EngineConfig> {
        match &self.path {
            Some(path) => {
                let mut config = EngineConfig::from_file(path)?;
                let env = std::env::vars().collect();
                config.apply_overrides(&env)?;
                Ok(config)
            }
            None => EngineConfig::load(),
        }
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}
