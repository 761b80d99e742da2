//! Per-user configuration store.
//!
//! Each user identity owns one [`UserConfig`]: the schedule their files are
//! charged with, an optional counterparty schedule for profit comparison and
//! the name of their amount column. Records are immutable and shared behind
//! `Arc`; an update builds a new record and swaps it in under the write lock,
//! so a reader never observes a half-applied change and concurrent updates
//! for the same user are serialized (last write wins).

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::config::ConfigLoader;
use crate::error::EngineResult;
use crate::models::Schedule;

/// The configuration of one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserConfig {
    /// The schedule charged on the user's files.
    pub schedule: Schedule,
    /// The schedule compared against, if any.
    pub counterparty_schedule: Option<Schedule>,
    /// Name of the amount column in the user's files.
    pub amount_column: String,
}

impl UserConfig {
    /// Builds the record a user starts with from the engine configuration.
    pub fn from_config(config: &ConfigLoader) -> Self {
        Self {
            schedule: config.default_schedule().clone(),
            counterparty_schedule: config.counterparty_schedule().cloned(),
            amount_column: config.settings().amount_column.clone(),
        }
    }
}

/// A keyed, thread-safe store of [`UserConfig`] records.
///
/// # Example
///
/// ```
/// use slab_charges::config::ConfigLoader;
/// use slab_charges::store::{UserConfig, UserConfigStore};
///
/// let store = UserConfigStore::new(UserConfig::from_config(&ConfigLoader::builtin()));
/// assert_eq!(store.get("alice").amount_column, "Amount");
///
/// store
///     .update("alice", |current| {
///         Ok(UserConfig {
///             amount_column: "Txn Amount".to_string(),
///             ..current.clone()
///         })
///     })
///     .unwrap();
/// assert_eq!(store.get("alice").amount_column, "Txn Amount");
/// assert_eq!(store.get("bob").amount_column, "Amount");
/// ```
#[derive(Debug)]
pub struct UserConfigStore {
    defaults: Arc<UserConfig>,
    entries: RwLock<HashMap<String, Arc<UserConfig>>>,
}

impl UserConfigStore {
    /// Creates an empty store whose users start from `defaults`.
    pub fn new(defaults: UserConfig) -> Self {
        Self {
            defaults: Arc::new(defaults),
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the user's record, or the defaults if they have none.
    pub fn get(&self, user_id: &str) -> Arc<UserConfig> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(user_id)
            .cloned()
            .unwrap_or_else(|| Arc::clone(&self.defaults))
    }

    /// Atomically replaces the user's record with one derived from the current one.
    ///
    /// The write lock is held across `apply`, so no other update for any user
    /// interleaves with it. If `apply` fails the stored record is unchanged.
    pub fn update<F>(&self, user_id: &str, apply: F) -> EngineResult<Arc<UserConfig>>
    where
        F: FnOnce(&UserConfig) -> EngineResult<UserConfig>,
    {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let current = entries
            .get(user_id)
            .cloned()
            .unwrap_or_else(|| Arc::clone(&self.defaults));

        let next = Arc::new(apply(&current)?);
        entries.insert(user_id.to_string(), Arc::clone(&next));
        Ok(next)
    }

    /// Replaces the user's record outright.
    pub fn replace(&self, user_id: &str, config: UserConfig) -> Arc<UserConfig> {
        let next = Arc::new(config);
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(user_id.to_string(), Arc::clone(&next));
        next
    }

    /// Drops the user's record so they fall back to the defaults.
    ///
    /// Returns true if a record existed.
    pub fn reset(&self, user_id: &str) -> bool {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(user_id)
            .is_some()
    }
}
