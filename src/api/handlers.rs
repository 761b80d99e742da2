//! HTTP request handlers for the slab charge API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{
    ParseMode, SkippedLine, compare_schedules, compute_breakdown, parse_schedule,
    partition_by_status,
};
use crate::error::{EngineError, EngineResult};
use crate::models::{Schedule, Table, round_currency};
use crate::store::UserConfig;

use super::report::{render_comparison, render_summary};
use super::request::UpdateConfigRequest;
use super::response::{
    ApiError, ApiErrorResponse, ChargeReport, ComparisonReport, ConfigUpdateResponse,
    UserConfigResponse,
};
use super::state::AppState;

/// Version reported in every charge report.
const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Schedule name given to a user's own schedule.
const OURS_SCHEDULE_NAME: &str = "ours";

/// Schedule name given to a user's counterparty schedule.
const COUNTERPARTY_SCHEDULE_NAME: &str = "counterparty";

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/users/:user_id/config",
            get(get_config_handler)
                .put(update_config_handler)
                .delete(reset_config_handler),
        )
        .route("/users/:user_id/charges", post(charges_handler))
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn engine_error_response(error: EngineError) -> Response {
    let api_error: ApiErrorResponse = error.into();
    json_response(api_error.status, api_error.error)
}

/// Converts a body rejection into a 400 response.
fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // Get the body text which contains the detailed error from serde
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    json_response(StatusCode::BAD_REQUEST, error)
}

/// Handler for GET /users/:user_id/config.
///
/// Returns the user's configuration, or the defaults if they have none.
async fn get_config_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, user_id = %user_id, "Fetching user configuration");

    let config = state.store().get(&user_id);
    json_response(StatusCode::OK, UserConfigResponse::new(&user_id, &config))
}

/// Handler for PUT /users/:user_id/config.
///
/// Parses the submitted schedule text and swaps the user's record in one
/// step; on any parse error the previous record stays in effect.
async fn update_config_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    payload: Result<Json<UpdateConfigRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, user_id = %user_id, "Processing configuration update");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    if request.is_empty() {
        warn!(correlation_id = %correlation_id, "Empty configuration update");
        return json_response(
            StatusCode::BAD_REQUEST,
            ApiError::validation_error("request changes nothing"),
        );
    }
    if request
        .amount_column
        .as_ref()
        .is_some_and(|column| column.trim().is_empty())
    {
        warn!(correlation_id = %correlation_id, "Blank amount column");
        return json_response(
            StatusCode::BAD_REQUEST,
            ApiError::validation_error("amount_column must not be blank"),
        );
    }

    let parse_mode = state.config().settings().parse_mode;
    let mut skipped_lines = Vec::new();
    let result = state.store().update(&user_id, |current| {
        apply_update(current, &request, parse_mode, &mut skipped_lines)
    });

    match result {
        Ok(config) => {
            info!(
                correlation_id = %correlation_id,
                user_id = %user_id,
                slabs = config.schedule.slabs.len(),
                has_counterparty = config.counterparty_schedule.is_some(),
                skipped_lines = skipped_lines.len(),
                "Configuration updated"
            );
            json_response(
                StatusCode::OK,
                ConfigUpdateResponse {
                    config: UserConfigResponse::new(&user_id, &config),
                    skipped_lines,
                },
            )
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                user_id = %user_id,
                error = %err,
                "Configuration update rejected"
            );
            engine_error_response(err)
        }
    }
}

/// Handler for DELETE /users/:user_id/config.
///
/// Drops the user's record so they fall back to the defaults, and returns
/// the configuration now in effect.
async fn reset_config_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let existed = state.store().reset(&user_id);
    info!(
        correlation_id = %correlation_id,
        user_id = %user_id,
        existed,
        "Configuration reset to defaults"
    );

    let config = state.store().get(&user_id);
    json_response(StatusCode::OK, UserConfigResponse::new(&user_id, &config))
}

/// Builds the user's next record from the current one and an update request.
fn apply_update(
    current: &UserConfig,
    request: &UpdateConfigRequest,
    parse_mode: ParseMode,
    skipped_lines: &mut Vec<SkippedLine>,
) -> EngineResult<UserConfig> {
    let mut parse = |name: &str, text: &str| -> EngineResult<Schedule> {
        let parsed = parse_schedule(name, text, parse_mode)?;
        skipped_lines.extend(parsed.skipped_lines);
        Ok(parsed.schedule)
    };

    let mut next = current.clone();
    if let Some(text) = &request.schedule {
        next.schedule = parse(OURS_SCHEDULE_NAME, text)?;
    }
    if let Some(text) = &request.counterparty_schedule {
        next.counterparty_schedule = Some(parse(COUNTERPARTY_SCHEDULE_NAME, text)?);
    } else if request.clear_counterparty {
        next.counterparty_schedule = None;
    }
    if let Some(column) = &request.amount_column {
        next.amount_column = column.trim().to_string();
    }
    Ok(next)
}

/// Handler for POST /users/:user_id/charges.
///
/// Accepts a transaction table and returns the charge report for its
/// successful transactions under the user's schedule.
async fn charges_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    payload: Result<Json<Table>, JsonRejection>,
) -> Response {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, user_id = %user_id, "Processing charge request");

    let table = match payload {
        Ok(Json(table)) => table,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    match build_report(&state, &user_id, &table) {
        Ok(report) => {
            info!(
                correlation_id = %correlation_id,
                user_id = %user_id,
                rows = table.rows.len(),
                charged = report.breakdown.transaction_count,
                total_charge = %report.total_charge,
                duration_us = start_time.elapsed().as_micros(),
                "Charge report completed successfully"
            );
            json_response(StatusCode::OK, report)
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                user_id = %user_id,
                error = %err,
                "Charge calculation failed"
            );
            engine_error_response(err)
        }
    }
}

/// Partitions the table and charges its successful transactions.
fn build_report(state: &AppState, user_id: &str, table: &Table) -> EngineResult<ChargeReport> {
    let config = state.store().get(user_id);
    let status_column = &state.config().settings().status_column;

    let partition = partition_by_status(table, &config.amount_column, status_column)?;
    if partition.success.amounts.is_empty() {
        return Err(EngineError::EmptyInput {
            message: "no successful transactions".to_string(),
        });
    }
    let amounts = &partition.success.amounts;

    let (breakdown, comparison, mut summary) = match &config.counterparty_schedule {
        Some(counterparty) => {
            let comparison = compare_schedules(amounts, &config.schedule, counterparty)?;
            let mut summary = render_summary(&comparison.ours);
            summary.extend(render_comparison(&comparison));
            let report = ComparisonReport {
                counterparty_charge: comparison.counterparty.rounded_total(),
                profit: comparison.rounded_profit(),
                counterparty: comparison.counterparty,
            };
            (comparison.ours, Some(report), summary)
        }
        None => {
            let breakdown = compute_breakdown(amounts, &config.schedule)?;
            let summary = render_summary(&breakdown);
            (breakdown, None, summary)
        }
    };
    summary.insert(
        0,
        format!(
            "Successful: {}, Failed: {}, Refunded: {}, Other: {}, Skipped: {}",
            partition.success.count,
            partition.failed.count,
            partition.refunded.count,
            partition.other_count,
            partition.skipped_rows
        ),
    );
    let chargeable_amount = round_currency(partition.chargeable_amount()?);

    Ok(ChargeReport {
        report_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        engine_version: ENGINE_VERSION.to_string(),
        user_id: user_id.to_string(),
        chargeable_amount,
        total_charge: breakdown.rounded_total(),
        partition,
        breakdown,
        comparison,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use crate::models::CellValue;

    fn table(rows: &[(f64, &str)]) -> Table {
        Table::new(
            vec!["Amount".to_string(), "Status".to_string()],
            rows.iter()
                .map(|(amount, status)| {
                    vec![CellValue::Number(*amount), CellValue::Text(status.to_string())]
                })
                .collect(),
        )
    }

    #[test]
    fn test_build_report_with_builtin_defaults() {
        let state = AppState::new(ConfigLoader::builtin());
        let table = table(&[
            (100.0, "success"),
            (500.0, "success"),
            (1000.0, "success"),
            (1500.0, "success"),
            (8000.0, "success"),
            (300.0, "failed"),
        ]);

        let report = build_report(&state, "alice", &table).unwrap();

        assert_eq!(report.total_charge.to_string(), "102.00");
        assert_eq!(report.partition.failed.count, 1);
        assert!(report.comparison.is_none());
        assert_eq!(
            report.summary[0],
            "Successful: 5, Failed: 1, Refunded: 0, Other: 0, Skipped: 0"
        );
        assert_eq!(report.summary.last().unwrap(), "Total Charge: ₹102.00");
    }

    #[test]
    fn test_summary_header_counts_other_and_skipped_rows() {
        let state = AppState::new(ConfigLoader::builtin());
        let mut table = table(&[(500.0, "success"), (200.0, "pending"), (f64::NAN, "success")]);
        table.rows.push(vec![CellValue::Empty, CellValue::Text("failed".to_string())]);

        let report = build_report(&state, "alice", &table).unwrap();

        assert_eq!(
            report.summary[0],
            "Successful: 1, Failed: 0, Refunded: 0, Other: 1, Skipped: 2"
        );
    }

    #[test]
    fn test_build_report_with_out_of_range_rate_is_an_error() {
        let state = AppState::new(ConfigLoader::builtin());
        let mut config = UserConfig::from_config(state.config());
        config.schedule = parse_schedule(
            "ours",
            "0-100=79228162514264337593543950335",
            ParseMode::Strict,
        )
        .unwrap()
        .schedule;
        state.store().replace("alice", config);

        let result = build_report(&state, "alice", &table(&[(1.0, "success"), (2.0, "success")]));
        assert!(matches!(result, Err(EngineError::Overflow { .. })));
    }

    #[test]
    fn test_build_report_without_successes_is_empty_input() {
        let state = AppState::new(ConfigLoader::builtin());
        let table = table(&[(300.0, "failed"), (200.0, "refunded")]);

        match build_report(&state, "alice", &table) {
            Err(EngineError::EmptyInput { message }) => {
                assert_eq!(message, "no successful transactions");
            }
            other => panic!("Expected EmptyInput, got {:?}", other),
        }
    }

    #[test]
    fn test_apply_update_keeps_omitted_fields() {
        let current = UserConfig::from_config(&ConfigLoader::builtin());
        let request = UpdateConfigRequest {
            amount_column: Some(" Value ".to_string()),
            ..Default::default()
        };
        let mut skipped = Vec::new();

        let next = apply_update(&current, &request, ParseMode::Strict, &mut skipped).unwrap();

        assert_eq!(next.amount_column, "Value");
        assert_eq!(next.schedule, current.schedule);
        assert!(skipped.is_empty());
    }

    #[test]
    fn test_apply_update_collects_lenient_skips() {
        let current = UserConfig::from_config(&ConfigLoader::builtin());
        let request = UpdateConfigRequest {
            schedule: Some("0-500=2\nbogus\n>500=1%".to_string()),
            counterparty_schedule: Some("0-500=1".to_string()),
            ..Default::default()
        };
        let mut skipped = Vec::new();

        let next = apply_update(&current, &request, ParseMode::Lenient, &mut skipped).unwrap();

        assert_eq!(next.schedule.slabs.len(), 2);
        assert_eq!(next.schedule.name, "ours");
        assert_eq!(next.counterparty_schedule.unwrap().to_text(), "0-500=1");
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].line_number, 2);
    }

    #[test]
    fn test_apply_update_clears_counterparty() {
        let mut current = UserConfig::from_config(&ConfigLoader::builtin());
        current.counterparty_schedule =
            Some(Schedule::new("counterparty", current.schedule.slabs.clone()));
        let request = UpdateConfigRequest {
            clear_counterparty: true,
            ..Default::default()
        };

        let next = apply_update(&current, &request, ParseMode::Strict, &mut Vec::new()).unwrap();
        assert!(next.counterparty_schedule.is_none());
    }
}
