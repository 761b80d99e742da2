//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading engine
//! settings and named schedules from YAML files.

use std::fs;
use std::path::Path;

use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::calculation::parse_schedule;
use crate::error::{EngineError, EngineResult};
use crate::models::{Schedule, Slab};

use super::types::{DEFAULT_SCHEDULE_NAME, EngineConfig, ScheduleFile, Settings};

/// Returns the built-in default schedule.
///
/// Equivalent to parsing [`DEFAULT_SCHEDULE_TEXT`](super::DEFAULT_SCHEDULE_TEXT).
pub fn default_schedule() -> Schedule {
    Schedule::new(
        DEFAULT_SCHEDULE_NAME,
        vec![
            Slab::FixedRate {
                min: Decimal::from(100),
                max: Decimal::from(1000),
                rate: Decimal::from(5),
            },
            Slab::FixedRate {
                min: Decimal::from(1001),
                max: Decimal::from(7000),
                rate: Decimal::from(7),
            },
            Slab::Percentage {
                min: Decimal::from(7000),
                percent: Decimal::ONE,
            },
        ],
    )
}

/// Loads and provides access to engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── settings.yaml        # Column names, parse mode, schedule selection
/// └── schedules/
///     ├── ours.yaml        # One named schedule per file
///     └── counterparty.yaml
/// ```
///
/// # Example
///
/// ```no_run
/// use slab_charges::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// println!("Default schedule:\n{}", loader.default_schedule().to_text());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: EngineConfig,
    default_schedule: Schedule,
    counterparty_schedule: Option<Schedule>,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - `settings.yaml` or the `schedules` directory is missing
    /// - Any file contains invalid YAML
    /// - Any schedule's slab text fails to parse
    /// - The settings name a schedule that was not loaded
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let settings = Self::load_yaml::<Settings>(&path.join("settings.yaml"))?;
        let schedules = Self::load_schedules(&path.join("schedules"), &settings)?;

        let config = EngineConfig::new(settings, schedules);
        let default_schedule = Self::find_schedule(&config, &config.settings().default_schedule)?;
        let counterparty_schedule = match &config.settings().counterparty_schedule {
            Some(name) => Some(Self::find_schedule(&config, name)?),
            None => None,
        };

        info!(
            path = %path.display(),
            schedules = config.schedules().len(),
            default_schedule = %default_schedule.name,
            "Loaded charge configuration"
        );
        Ok(Self {
            config,
            default_schedule,
            counterparty_schedule,
        })
    }

    /// Returns a loader holding only the built-in defaults.
    ///
    /// # Example
    ///
    /// ```
    /// use slab_charges::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::builtin();
    /// assert_eq!(loader.default_schedule().to_text(), "100-1000=5\n1001-7000=7\n>7000=1%");
    /// assert_eq!(loader.settings().amount_column, "Amount");
    /// assert!(loader.counterparty_schedule().is_none());
    /// ```
    pub fn builtin() -> Self {
        Self {
            config: EngineConfig::new(Settings::default(), vec![default_schedule()]),
            default_schedule: default_schedule(),
            counterparty_schedule: None,
        }
    }

    fn find_schedule(config: &EngineConfig, name: &str) -> EngineResult<Schedule> {
        config
            .schedules()
            .get(name)
            .cloned()
            .ok_or_else(|| EngineError::ScheduleNotFound {
                name: name.to_string(),
            })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigFileError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads and parses every schedule file in the schedules directory.
    fn load_schedules(schedules_dir: &Path, settings: &Settings) -> EngineResult<Vec<Schedule>> {
        let dir_str = schedules_dir.display().to_string();

        let entries = fs::read_dir(schedules_dir).map_err(|_| EngineError::ConfigNotFound {
            path: dir_str.clone(),
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: dir_str.clone(),
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut schedules = Vec::with_capacity(paths.len());
        for path in paths {
            let file = Self::load_yaml::<ScheduleFile>(&path)?;
            let parsed = parse_schedule(&file.name, &file.slabs, settings.parse_mode)?;
            if !parsed.skipped_lines.is_empty() {
                warn!(
                    path = %path.display(),
                    skipped = parsed.skipped_lines.len(),
                    "Schedule file contains malformed slab lines"
                );
            }
            schedules.push(parsed.schedule);
        }

        if schedules.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no schedule files found)", dir_str),
            });
        }

        Ok(schedules)
    }

    /// Returns the underlying engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the engine settings.
    pub fn settings(&self) -> &Settings {
        self.config.settings()
    }

    /// Returns the schedule applied to users who have not set their own.
    pub fn default_schedule(&self) -> &Schedule {
        &self.default_schedule
    }

    /// Returns the configured counterparty schedule, if any.
    pub fn counterparty_schedule(&self) -> Option<&Schedule> {
        self.counterparty_schedule.as_ref()
    }
}
