//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::pdf::Rasterizer;
use crate::session::SessionRegistry;
use crate::storage::PageStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    store: PageStore,
    rasterizer: Arc<dyn Rasterizer>,
    sessions: SessionRegistry,
}

impl AppState {
    /// Create a new application state
    ///
    /// The store is expected to be initialized already.
    pub fn new(config: Config, store: PageStore, rasterizer: Arc<dyn Rasterizer>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                rasterizer,
                sessions: SessionRegistry::new(),
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the page store
    pub fn store(&self) -> &PageStore {
        &self.inner.store
    }

    /// Get the rasterizer
    pub fn rasterizer(&self) -> &dyn Rasterizer {
        self.inner.rasterizer.as_ref()
    }

    /// Get the session registry
    pub fn sessions(&self) -> &SessionRegistry {
        &self.inner.sessions
    }
}
