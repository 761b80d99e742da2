//! Calculation logic for the slab charge engine.
//!
//! This module contains every pure function of the engine: schedule text
//! parsing, fixed-rate and percentage slab evaluation, the charge breakdown
//! of a whole schedule, the two-schedule profit comparison and the
//! status-based partition of raw rows that produces the charged series.
//! None of them perform I/O or keep state between calls.

mod breakdown;
mod fixed_rate;
mod percentage;
mod profit;
mod schedule_parser;
mod status_partition;

pub use breakdown::{compute_breakdown, validate_amounts};
pub use fixed_rate::{FIXED_RATE_RULE_ID, FixedRateSlabResult, calculate_fixed_rate_slab};
pub use percentage::{PERCENTAGE_RULE_ID, PercentageSlabResult, calculate_percentage_slab};
pub use profit::compare_schedules;
pub use schedule_parser::{
    ParseMode, ParsedSchedule, SkippedLine, parse_schedule, parse_schedule_lines,
};
pub use status_partition::partition_by_status;
