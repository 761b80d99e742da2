//! Configuration types for the slab charge engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use std::collections::HashMap;

use serde::Deserialize;

use crate::calculation::ParseMode;
use crate::models::Schedule;

/// Name of the built-in default schedule.
pub const DEFAULT_SCHEDULE_NAME: &str = "default";

/// Text of the built-in default schedule.
///
/// ₹5 per transaction from ₹100 to ₹1000, ₹7 per transaction from ₹1001 to
/// ₹7000, and 1% of the volume above ₹7000.
pub const DEFAULT_SCHEDULE_TEXT: &str = "100-1000=5\n1001-7000=7\n>7000=1%";

/// Default name of the amount column.
pub const DEFAULT_AMOUNT_COLUMN: &str = "Amount";

/// Default name of the status column.
pub const DEFAULT_STATUS_COLUMN: &str = "Status";

fn default_amount_column() -> String {
    DEFAULT_AMOUNT_COLUMN.to_string()
}

fn default_status_column() -> String {
    DEFAULT_STATUS_COLUMN.to_string()
}

fn default_schedule_name() -> String {
    DEFAULT_SCHEDULE_NAME.to_string()
}

/// Engine settings from `settings.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Column holding transaction amounts, unless a user overrides it.
    #[serde(default = "default_amount_column")]
    pub amount_column: String,
    /// Column holding transaction statuses.
    #[serde(default = "default_status_column")]
    pub status_column: String,
    /// How malformed schedule lines are handled.
    #[serde(default)]
    pub parse_mode: ParseMode,
    /// Name of the schedule applied when a user has not set one.
    #[serde(default = "default_schedule_name")]
    pub default_schedule: String,
    /// Name of the schedule compared against, if any.
    #[serde(default)]
    pub counterparty_schedule: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            amount_column: default_amount_column(),
            status_column: default_status_column(),
            parse_mode: ParseMode::Strict,
            default_schedule: default_schedule_name(),
            counterparty_schedule: None,
        }
    }
}

/// One schedule file from the `schedules/` directory.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleFile {
    /// The schedule name.
    pub name: String,
    /// A description of whose fee structure this is.
    #[serde(default)]
    pub description: String,
    /// The slab lines, in schedule text form.
    pub slabs: String,
}

/// The complete engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Engine settings.
    settings: Settings,
    /// Parsed schedules by name.
    schedules: HashMap<String, Schedule>,
}

impl EngineConfig {
    /// Creates a new EngineConfig from its component parts.
    pub fn new(settings: Settings, schedules: Vec<Schedule>) -> Self {
        Self {
            settings,
            schedules: schedules
                .into_iter()
                .map(|s| (s.name.clone(), s))
                .collect(),
        }
    }

    /// Returns the engine settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns all schedules.
    pub fn schedules(&self) -> &HashMap<String, Schedule> {
        &self.schedules
    }
}
