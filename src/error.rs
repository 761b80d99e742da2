//! Error types for the slab charge engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the parser, the calculator and the configuration
//! layer can report. Each variant carries the structured detail a host needs
//! to render a precise message (column name, line text, row index).

use thiserror::Error;

/// The main error type for the slab charge engine.
///
/// All operations in the engine return this error type. A failure is
/// terminal for the current computation; no partial breakdown is ever
/// returned alongside an error.
///
/// # Example
///
/// ```
/// use slab_charges::error::EngineError;
///
/// let error = EngineError::MissingColumn {
///     column: "Amount".to_string(),
/// };
/// assert_eq!(error.to_string(), "Required column not found: Amount");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be read as YAML.
    #[error("Failed to load configuration file '{path}': {message}")]
    ConfigFileError {
        /// The path to the file that failed to load.
        path: String,
        /// A description of the failure.
        message: String,
    },

    /// A named schedule was not present in the configuration.
    #[error("Schedule not found: {name}")]
    ScheduleNotFound {
        /// The schedule name that was looked up.
        name: String,
    },

    /// A line of schedule text did not match the slab grammar.
    #[error("Invalid slab on line {line_number} '{line}': {message}")]
    ConfigParseError {
        /// The 1-based line number within the schedule text.
        line_number: usize,
        /// The offending line, trimmed.
        line: String,
        /// What was wrong with the line.
        message: String,
    },

    /// A required column was absent from the row set.
    #[error("Required column not found: {column}")]
    MissingColumn {
        /// The column that was looked up.
        column: String,
    },

    /// An amount that cannot be charged reached the calculator.
    #[error("Invalid amount at row {index} ('{value}'): {message}")]
    InvalidInput {
        /// Position of the amount in its series (or row in its table).
        index: usize,
        /// The offending value as text.
        value: String,
        /// Why the value was rejected.
        message: String,
    },

    /// There was nothing to charge.
    #[error("No chargeable transactions: {message}")]
    EmptyInput {
        /// A description of what was empty.
        message: String,
    },

    /// A sum or product exceeded the range of a decimal.
    #[error("Amount is out of range while computing {operation}")]
    Overflow {
        /// What was being computed.
        operation: String,
    },
}

impl EngineError {
    /// Creates an `Overflow` error for the named computation.
    pub fn overflow(operation: impl Into<String>) -> Self {
        EngineError::Overflow {
            operation: operation.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/settings.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/settings.yaml"
        );
    }

    #[test]
    fn test_config_file_error_displays_path_and_message() {
        let error = EngineError::ConfigFileError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to load configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_schedule_not_found_displays_name() {
        let error = EngineError::ScheduleNotFound {
            name: "partner".to_string(),
        };
        assert_eq!(error.to_string(), "Schedule not found: partner");
    }

    #[test]
    fn test_config_parse_error_names_the_line() {
        let error = EngineError::ConfigParseError {
            line_number: 2,
            line: "100..1000=5".to_string(),
            message: "expected '<min>-<max>=<rate>' or '><threshold>=<percent>%'".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid slab on line 2 '100..1000=5': expected '<min>-<max>=<rate>' or '><threshold>=<percent>%'"
        );
    }

    #[test]
    fn test_missing_column_displays_column() {
        let error = EngineError::MissingColumn {
            column: "Status".to_string(),
        };
        assert_eq!(error.to_string(), "Required column not found: Status");
    }

    #[test]
    fn test_invalid_input_displays_index_and_value() {
        let error = EngineError::InvalidInput {
            index: 4,
            value: "-20".to_string(),
            message: "amount must not be negative".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid amount at row 4 ('-20'): amount must not be negative"
        );
    }

    #[test]
    fn test_empty_input_displays_message() {
        let error = EngineError::EmptyInput {
            message: "no successful transactions".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "No chargeable transactions: no successful transactions"
        );
    }

    #[test]
    fn test_overflow_displays_operation() {
        let error = EngineError::overflow("volume above 7000");
        assert_eq!(
            error.to_string(),
            "Amount is out of range while computing volume above 7000"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_missing_column() -> EngineResult<()> {
            Err(EngineError::MissingColumn {
                column: "Amount".to_string(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_missing_column()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
