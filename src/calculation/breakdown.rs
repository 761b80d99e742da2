//! Charge breakdown computation.
//!
//! Applies every slab of a schedule, independently and in order, to one
//! validated amount series and sums the subtotals.

use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{ChargeBreakdown, Schedule, Slab};

use super::fixed_rate::calculate_fixed_rate_slab;
use super::percentage::calculate_percentage_slab;

/// Checks that an amount series can be charged.
///
/// Fails with `EmptyInput` for an empty series and with `InvalidInput`
/// naming the first negative amount.
pub fn validate_amounts(amounts: &[Decimal]) -> EngineResult<()> {
    if amounts.is_empty() {
        return Err(EngineError::EmptyInput {
            message: "the amount series is empty".to_string(),
        });
    }

    if let Some((index, amount)) = amounts
        .iter()
        .enumerate()
        .find(|(_, a)| a.is_sign_negative() && !a.is_zero())
    {
        return Err(EngineError::InvalidInput {
            index,
            value: amount.to_string(),
            message: "amount must not be negative".to_string(),
        });
    }

    Ok(())
}

/// Converts one floating-point amount, rejecting non-finite and negative values.
pub(crate) fn decimal_from_f64(index: usize, value: f64) -> EngineResult<Decimal> {
    let invalid = |message: &str| EngineError::InvalidInput {
        index,
        value: value.to_string(),
        message: message.to_string(),
    };

    if !value.is_finite() {
        return Err(invalid("amount must be a finite number"));
    }
    if value < 0.0 {
        return Err(invalid("amount must not be negative"));
    }
    Decimal::try_from(value).map_err(|_| invalid("amount is out of range"))
}

/// Computes the charge breakdown of a schedule over an amount series.
///
/// Each slab is evaluated against the full series; ranges may overlap, in
/// which case an amount is counted by every slab that contains it. The
/// resulting lines follow the schedule's slab order and `total` is the
/// unrounded sum of their subtotals.
///
/// # Errors
///
/// - `EmptyInput` if `amounts` is empty
/// - `InvalidInput` if any amount is negative
/// - `Overflow` if a subtotal or the total is out of range
///
/// # Example
///
/// ```
/// use slab_charges::calculation::{compute_breakdown, parse_schedule, ParseMode};
/// use rust_decimal::Decimal;
///
/// let schedule = parse_schedule("ours", "100-1000=5\n1001-7000=7\n>7000=1%", ParseMode::Strict)
///     .unwrap()
///     .schedule;
/// let amounts = [100, 500, 1000, 1500, 8000].map(Decimal::from);
///
/// let breakdown = compute_breakdown(&amounts, &schedule).unwrap();
/// assert_eq!(breakdown.total, Decimal::from(102));
/// assert_eq!(breakdown.rounded_total().to_string(), "102.00");
/// ```
pub fn compute_breakdown(amounts: &[Decimal], schedule: &Schedule) -> EngineResult<ChargeBreakdown> {
    validate_amounts(amounts)?;
    apply_schedule(amounts, schedule)
}

/// Applies a schedule to an already validated series.
pub(crate) fn apply_schedule(
    amounts: &[Decimal],
    schedule: &Schedule,
) -> EngineResult<ChargeBreakdown> {
    let mut lines = Vec::with_capacity(schedule.slabs.len());
    let mut audit_steps = Vec::with_capacity(schedule.slabs.len());

    for (index, slab) in schedule.slabs.iter().enumerate() {
        let step_number = u32::try_from(index + 1)
            .map_err(|_| EngineError::overflow(format!("audit step number of slab {}", slab)))?;
        let (line, audit_step) = match *slab {
            Slab::FixedRate { min, max, rate } => {
                let result = calculate_fixed_rate_slab(amounts, min, max, rate, step_number)?;
                (result.line, result.audit_step)
            }
            Slab::Percentage { min, percent } => {
                let result = calculate_percentage_slab(amounts, min, percent, step_number)?;
                (result.line, result.audit_step)
            }
        };
        lines.push(line);
        audit_steps.push(audit_step);
    }

    let total = lines
        .iter()
        .try_fold(Decimal::ZERO, |sum, line| sum.checked_add(line.subtotal()))
        .ok_or_else(|| EngineError::overflow(format!("total of schedule '{}'", schedule.name)))?;

    debug!(
        schedule = %schedule.name,
        amounts = amounts.len(),
        slabs = lines.len(),
        total = %total,
        "Computed charge breakdown"
    );

    Ok(ChargeBreakdown {
        schedule_name: schedule.name.clone(),
        transaction_count: amounts.len() as u64,
        lines,
        total,
        audit_steps,
    })
}
