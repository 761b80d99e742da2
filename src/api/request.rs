//! Request types for the slab charge API.
//!
//! The charges endpoint takes a [`Table`](crate::models::Table) body as-is;
//! this module holds the body of the configuration update.

use serde::{Deserialize, Serialize};

/// Request body for `PUT /users/:user_id/config`.
///
/// Every field is optional; omitted fields keep their current value.
/// Schedules are given in slab text form, one slab per line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateConfigRequest {
    /// The user's new schedule text.
    #[serde(default)]
    pub schedule: Option<String>,
    /// The new counterparty schedule text.
    #[serde(default)]
    pub counterparty_schedule: Option<String>,
    /// Removes the counterparty schedule. Ignored if one is also given.
    #[serde(default)]
    pub clear_counterparty: bool,
    /// The new amount column name.
    #[serde(default)]
    pub amount_column: Option<String>,
}

impl UpdateConfigRequest {
    /// Returns true if the request would change nothing.
    pub fn is_empty(&self) -> bool {
        self.schedule.is_none()
            && self.counterparty_schedule.is_none()
            && !self.clear_counterparty
            && self.amount_column.is_none()
    }
}
