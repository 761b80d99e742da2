//! Fixed-rate slab calculation.
//!
//! A fixed-rate slab charges a flat amount for every transaction whose
//! amount lies within its inclusive range.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, Slab, SlabResult};

/// Rule identifier recorded in the audit trail for fixed-rate slabs.
pub const FIXED_RATE_RULE_ID: &str = "fixed_rate_slab";

/// The result of evaluating a fixed-rate slab, including the line and audit step.
#[derive(Debug, Clone)]
pub struct FixedRateSlabResult {
    /// The computed slab line.
    pub line: SlabResult,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Evaluates a fixed-rate slab against an amount series.
///
/// Counts every amount `a` with `min <= a <= max`. Both bounds are inclusive,
/// so an amount equal to `min` or `max` is always counted. The subtotal is
/// `count * rate`; fails with `Overflow` if that product is out of range.
///
/// # Arguments
///
/// * `amounts` - The validated amount series
/// * `min` - Lower bound of the range (inclusive)
/// * `max` - Upper bound of the range (inclusive)
/// * `rate` - The flat charge per matching transaction
/// * `step_number` - The step number for audit trail sequencing
///
/// # Examples
///
/// ```
/// use slab_charges::calculation::calculate_fixed_rate_slab;
/// use slab_charges::models::SlabResult;
/// use rust_decimal::Decimal;
///
/// let amounts = [100, 500, 1000, 1500, 8000].map(Decimal::from);
/// let result = calculate_fixed_rate_slab(
///     &amounts,
///     Decimal::from(100),
///     Decimal::from(1000),
///     Decimal::from(5),
///     1,
/// )
/// .unwrap();
///
/// match result.line {
///     SlabResult::FixedRate { count, subtotal, .. } => {
///         assert_eq!(count, 3);
///         assert_eq!(subtotal, Decimal::from(15));
///     }
///     _ => unreachable!(),
/// }
/// ```
pub fn calculate_fixed_rate_slab(
    amounts: &[Decimal],
    min: Decimal,
    max: Decimal,
    rate: Decimal,
    step_number: u32,
) -> EngineResult<FixedRateSlabResult> {
    let slab = Slab::FixedRate { min, max, rate };
    let count = amounts.iter().filter(|a| slab.applies_to(**a)).count() as u64;
    let subtotal = Decimal::from(count)
        .checked_mul(rate)
        .ok_or_else(|| EngineError::overflow(format!("subtotal of slab {}", slab)))?;

    let audit_step = AuditStep {
        step_number,
        rule_id: FIXED_RATE_RULE_ID.to_string(),
        rule_name: "Fixed Rate Slab".to_string(),
        slab_ref: slab.to_string(),
        input: serde_json::json!({
            "min": min.normalize().to_string(),
            "max": max.normalize().to_string(),
            "rate": rate.normalize().to_string(),
            "amount_count": amounts.len()
        }),
        output: serde_json::json!({
            "count": count,
            "subtotal": subtotal.normalize().to_string()
        }),
        reasoning: format!(
            "{} of {} amounts lie within {} to {} inclusive; {} x {} = {}",
            count,
            amounts.len(),
            min.normalize(),
            max.normalize(),
            count,
            rate.normalize(),
            subtotal.normalize()
        ),
    };

    Ok(FixedRateSlabResult {
        line: SlabResult::FixedRate {
            min,
            max,
            rate,
            count,
            subtotal,
        },
        audit_step,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn amounts(values: &[&str]) -> Vec<Decimal> {
        values.iter().map(|v| dec(v)).collect()
    }

    fn count_and_subtotal(result: &FixedRateSlabResult) -> (u64, Decimal) {
        match result.line {
            SlabResult::FixedRate {
                count, subtotal, ..
            } => (count, subtotal),
            _ => panic!("Expected fixed-rate line"),
        }
    }

    #[test]
    fn test_counts_amounts_within_range() {
        let series = amounts(&["100", "500", "1000", "1500", "8000"]);
        let result = calculate_fixed_rate_slab(&series, dec("100"), dec("1000"), dec("5"), 1).unwrap();
        assert_eq!(count_and_subtotal(&result), (3, dec("15")));
    }

    #[test]
    fn test_second_default_slab() {
        let series = amounts(&["100", "500", "1000", "1500", "8000"]);
        let result = calculate_fixed_rate_slab(&series, dec("1001"), dec("7000"), dec("7"), 2).unwrap();
        assert_eq!(count_and_subtotal(&result), (1, dec("7")));
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let series = amounts(&["99.99", "100", "1000", "1000.01"]);
        let result = calculate_fixed_rate_slab(&series, dec("100"), dec("1000"), dec("5"), 1).unwrap();
        assert_eq!(count_and_subtotal(&result), (2, dec("10")));
    }

    #[test]
    fn test_amount_in_gap_is_not_counted() {
        // 1000.50 lies between the default 100-1000 and 1001-7000 slabs
        let series = amounts(&["1000.50"]);
        let low = calculate_fixed_rate_slab(&series, dec("100"), dec("1000"), dec("5"), 1).unwrap();
        let high = calculate_fixed_rate_slab(&series, dec("1001"), dec("7000"), dec("7"), 2).unwrap();
        assert_eq!(count_and_subtotal(&low).0, 0);
        assert_eq!(count_and_subtotal(&high).0, 0);
    }

    #[test]
    fn test_no_matches_gives_zero_subtotal() {
        let series = amounts(&["10", "20"]);
        let result = calculate_fixed_rate_slab(&series, dec("100"), dec("1000"), dec("5"), 1).unwrap();
        assert_eq!(count_and_subtotal(&result), (0, Decimal::ZERO));
    }

    #[test]
    fn test_fractional_rate() {
        let series = amounts(&["150", "250", "350"]);
        let result = calculate_fixed_rate_slab(&series, dec("100"), dec("1000"), dec("2.75"), 1).unwrap();
        assert_eq!(count_and_subtotal(&result), (3, dec("8.25")));
    }

    #[test]
    fn test_subtotal_out_of_range_is_an_error() {
        let series = amounts(&["1", "2"]);
        let result = calculate_fixed_rate_slab(&series, dec("0"), dec("100"), Decimal::MAX, 1);

        match result {
            Err(EngineError::Overflow { operation }) => {
                assert!(operation.contains("0-100="));
            }
            other => panic!("Expected Overflow error, got {:?}", other),
        }
    }

    #[test]
    fn test_audit_step() {
        let series = amounts(&["100", "500", "8000"]);
        let result = calculate_fixed_rate_slab(&series, dec("100"), dec("1000"), dec("5"), 4).unwrap();

        assert_eq!(result.audit_step.step_number, 4);
        assert_eq!(result.audit_step.rule_id, "fixed_rate_slab");
        assert_eq!(result.audit_step.slab_ref, "100-1000=5");
        assert_eq!(result.audit_step.input["amount_count"], 3);
        assert_eq!(result.audit_step.output["count"], 2);
        assert_eq!(result.audit_step.output["subtotal"].as_str().unwrap(), "10");
        assert!(result.audit_step.reasoning.contains("2 of 3 amounts"));
    }
}
