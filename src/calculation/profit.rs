//! Two-schedule profit comparison.
//!
//! Our schedule and the counterparty's schedule are applied to the identical
//! amount series. The series is validated once and never re-derived per
//! schedule, so the two totals are directly comparable.

use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{ProfitComparison, Schedule};

use super::breakdown::{apply_schedule, validate_amounts};

/// Compares the charges of two schedules over the same amounts.
///
/// `profit = ours.total - counterparty.total`, unrounded.
///
/// # Errors
///
/// - `EmptyInput` if `amounts` is empty
/// - `InvalidInput` if any amount is negative
/// - `Overflow` if either schedule's total is out of range
///
/// # Example
///
/// ```
/// use slab_charges::calculation::{compare_schedules, parse_schedule, ParseMode};
/// use rust_decimal::Decimal;
///
/// let ours = parse_schedule("ours", "100-1000=5", ParseMode::Strict).unwrap().schedule;
/// let theirs = parse_schedule("counterparty", "100-1000=10", ParseMode::Strict).unwrap().schedule;
/// let amounts = [50, 200, 9000].map(Decimal::from);
///
/// let comparison = compare_schedules(&amounts, &ours, &theirs).unwrap();
/// assert_eq!(comparison.profit, Decimal::from(-5));
/// ```
pub fn compare_schedules(
    amounts: &[Decimal],
    ours: &Schedule,
    counterparty: &Schedule,
) -> EngineResult<ProfitComparison> {
    validate_amounts(amounts)?;

    let ours = apply_schedule(amounts, ours)?;
    let counterparty = apply_schedule(amounts, counterparty)?;
    let profit = ours
        .total
        .checked_sub(counterparty.total)
        .ok_or_else(|| EngineError::overflow("profit"))?;

    debug!(
        ours = %ours.total,
        counterparty = %counterparty.total,
        profit = %profit,
        "Compared schedules"
    );

    Ok(ProfitComparison {
        ours,
        counterparty,
        profit,
    })
}
