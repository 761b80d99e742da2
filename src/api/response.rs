//! Response types for the slab charge API.
//!
//! This module defines the success bodies returned by each endpoint, the
//! error response structures, and the mapping from engine errors to HTTP.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculation::SkippedLine;
use crate::error::EngineError;
use crate::models::{ChargeBreakdown, StatusPartition};
use crate::store::UserConfig;

/// A user's configuration as returned by the API.
///
/// Schedules are rendered back into slab text, the same form they are
/// submitted in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserConfigResponse {
    /// The user the configuration belongs to.
    pub user_id: String,
    /// The user's schedule text.
    pub schedule: String,
    /// The counterparty schedule text, if one is set.
    pub counterparty_schedule: Option<String>,
    /// Name of the amount column in the user's files.
    pub amount_column: String,
}

impl UserConfigResponse {
    /// Builds the response body for one user's record.
    pub fn new(user_id: &str, config: &UserConfig) -> Self {
        Self {
            user_id: user_id.to_string(),
            schedule: config.schedule.to_text(),
            counterparty_schedule: config.counterparty_schedule.as_ref().map(|s| s.to_text()),
            amount_column: config.amount_column.clone(),
        }
    }
}

/// Response body for a configuration update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigUpdateResponse {
    /// The configuration now in effect.
    pub config: UserConfigResponse,
    /// Lines dropped from the submitted schedules in lenient mode.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped_lines: Vec<SkippedLine>,
}

/// The counterparty side of a charge report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonReport {
    /// Breakdown under the counterparty's schedule.
    pub counterparty: ChargeBreakdown,
    /// Counterparty total, rounded for presentation.
    pub counterparty_charge: Decimal,
    /// Our total minus the counterparty total, rounded for presentation.
    pub profit: Decimal,
}

/// Response body for `POST /users/:user_id/charges`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeReport {
    /// Unique identifier of this report.
    pub report_id: Uuid,
    /// When the report was produced.
    pub timestamp: DateTime<Utc>,
    /// Version of the engine that produced it.
    pub engine_version: String,
    /// The user whose schedule was applied.
    pub user_id: String,
    /// The uploaded rows partitioned by status.
    pub partition: StatusPartition,
    /// Success total minus failed and refunded totals.
    pub chargeable_amount: Decimal,
    /// Breakdown of the success amounts under the user's schedule.
    pub breakdown: ChargeBreakdown,
    /// The breakdown total, rounded for presentation.
    pub total_charge: Decimal,
    /// Comparison against the counterparty schedule, if one is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparison: Option<ComparisonReport>,
    /// Human-readable summary lines.
    pub summary: Vec<String>,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        match error {
            EngineError::ConfigNotFound { .. }
            | EngineError::ConfigFileError { .. }
            | EngineError::ScheduleNotFound { .. } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            },
            EngineError::ConfigParseError { line_number, .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "CONFIG_PARSE_ERROR",
                    message,
                    format!(
                        "Schedule line {} must look like '100-1000=5' or '>7000=1%'",
                        line_number
                    ),
                ),
            },
            EngineError::MissingColumn { column } => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::with_details(
                    "MISSING_COLUMN",
                    message,
                    format!("The uploaded table has no column named '{}'", column),
                ),
            },
            EngineError::InvalidInput { .. } => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::new("INVALID_INPUT", message),
            },
            EngineError::EmptyInput { .. } => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::new("EMPTY_INPUT", message),
            },
            EngineError::Overflow { .. } => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::new("AMOUNT_OUT_OF_RANGE", message),
            },
        }
    }
}
