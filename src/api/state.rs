//! Application state for the slab charge API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::ConfigLoader;
use crate::store::{UserConfig, UserConfigStore};

/// Shared application state.
///
/// Holds the loaded engine configuration and the per-user configuration
/// store. The store is owned here and handed to handlers by reference; the
/// calculation functions never reach it directly.
#[derive(Clone)]
pub struct AppState {
    /// The loaded engine configuration.
    config: Arc<ConfigLoader>,
    /// Per-user schedules and column names.
    store: Arc<UserConfigStore>,
}

impl AppState {
    /// Creates a new application state with the given configuration loader.
    ///
    /// Users start from the loader's default schedule, counterparty schedule
    /// and amount column.
    pub fn new(config: ConfigLoader) -> Self {
        let store = UserConfigStore::new(UserConfig::from_config(&config));
        Self {
            config: Arc::new(config),
            store: Arc::new(store),
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns a reference to the per-user configuration store.
    pub fn store(&self) -> &UserConfigStore {
        &self.store
    }
}
