//! HTTP API module for the slab charge engine.
//!
//! This module hosts the engine behind a small REST API: per-user schedule
//! configuration and charge reports for uploaded transaction tables.

mod handlers;
mod report;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use report::{render_comparison, render_summary};
pub use request::UpdateConfigRequest;
pub use response::{
    ApiError, ChargeReport, ComparisonReport, ConfigUpdateResponse, UserConfigResponse,
};
pub use state::AppState;
