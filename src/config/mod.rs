//! Configuration loading and management for the slab charge engine.
//!
//! This module loads engine settings and named schedules from YAML files and
//! supplies the documented built-in default schedule.
//!
//! # Example
//!
//! ```no_run
//! use slab_charges::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Amount column: {}", config.settings().amount_column);
//! ```

mod loader;
mod types;

pub use loader::{ConfigLoader, default_schedule};
pub use types::{
    DEFAULT_AMOUNT_COLUMN, DEFAULT_SCHEDULE_NAME, DEFAULT_SCHEDULE_TEXT, DEFAULT_STATUS_COLUMN,
    EngineConfig, ScheduleFile, Settings,
};
