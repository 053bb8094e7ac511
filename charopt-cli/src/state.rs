//! Application state shared by the command handlers.

use crate::config::{LoadedConfig, OptionsCache};
use charopt_core::options::CharacterOptions;
use charopt_core::{CacheError, LoadStatus, SettingsMap};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("character options were not ready within {0:?}")]
    Timeout(Duration),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Application state handed to each command.
///
/// This is cloneable and cheap to pass around (the cache is behind Arc).
#[derive(Clone)]
pub struct AppState {
    /// Lazily populated character options.
    pub cache: OptionsCache,
    /// Upper bound on how long a command waits for the cache.
    pub wait_timeout: Duration,
}

impl AppState {
    /// Create a new AppState from the loaded configuration.
    pub fn new(config: &LoadedConfig) -> Self {
        Self {
            cache: config.build_cache(),
            wait_timeout: config.wait_timeout,
        }
    }

    /// Get the populated character options, waiting at most `wait_timeout`.
    pub async fn options(&self) -> Result<Arc<SettingsMap<CharacterOptions>>, StateError> {
        tokio::time::timeout(self.wait_timeout, self.cache.all())
            .await
            .map_err(|_| StateError::Timeout(self.wait_timeout))?
            .map_err(StateError::from)
    }

    pub fn status(&self) -> LoadStatus {
        self.cache.status()
    }
}
