//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::sync::SyncStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    store: SyncStore,
}

impl AppState {
    pub fn new(config: Config, store: SyncStore) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, store }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the sync store
    pub fn store(&self) -> &SyncStore {
        &self.inner.store
    }
}
