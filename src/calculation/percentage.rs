//! Percentage slab calculation.
//!
//! A percentage slab charges on volume, not per transaction: it sums every
//! amount strictly above its threshold and applies the percentage to that sum.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, Slab, SlabResult};

/// Rule identifier recorded in the audit trail for percentage slabs.
pub const PERCENTAGE_RULE_ID: &str = "percentage_slab";

const ONE_HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// The result of evaluating a percentage slab, including the line and audit step.
#[derive(Debug, Clone)]
pub struct PercentageSlabResult {
    /// The computed slab line.
    pub line: SlabResult,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Evaluates a percentage slab against an amount series.
///
/// `volume` is the sum of amounts `a` with `a > min`; an amount equal to the
/// threshold is excluded. The subtotal is `volume * percent / 100`.
/// Fails with `Overflow` if the volume or the subtotal is out of range.
///
/// # Examples
///
/// ```
/// use slab_charges::calculation::calculate_percentage_slab;
/// use slab_charges::models::SlabResult;
/// use rust_decimal::Decimal;
///
/// let amounts = [7000, 8000, 12000].map(Decimal::from);
/// let result = calculate_percentage_slab(&amounts, Decimal::from(7000), Decimal::ONE, 1).unwrap();
///
/// match result.line {
///     SlabResult::Percentage { volume, subtotal, .. } => {
///         assert_eq!(volume, Decimal::from(20000));
///         assert_eq!(subtotal, Decimal::from(200));
///     }
///     _ => unreachable!(),
/// }
/// ```
pub fn calculate_percentage_slab(
    amounts: &[Decimal],
    min: Decimal,
    percent: Decimal,
    step_number: u32,
) -> EngineResult<PercentageSlabResult> {
    let slab = Slab::Percentage { min, percent };
    let qualifying: Vec<Decimal> = amounts
        .iter()
        .copied()
        .filter(|a| slab.applies_to(*a))
        .collect();
    let volume = qualifying
        .iter()
        .try_fold(Decimal::ZERO, |sum, amount| sum.checked_add(*amount))
        .ok_or_else(|| EngineError::overflow(format!("volume of slab {}", slab)))?;
    let subtotal = percent
        .checked_div(ONE_HUNDRED)
        .and_then(|fraction| volume.checked_mul(fraction))
        .ok_or_else(|| EngineError::overflow(format!("subtotal of slab {}", slab)))?;

    let audit_step = AuditStep {
        step_number,
        rule_id: PERCENTAGE_RULE_ID.to_string(),
        rule_name: "Percentage Slab".to_string(),
        slab_ref: slab.to_string(),
        input: serde_json::json!({
            "threshold": min.normalize().to_string(),
            "percent": percent.normalize().to_string(),
            "amount_count": amounts.len()
        }),
        output: serde_json::json!({
            "qualifying_count": qualifying.len(),
            "volume": volume.normalize().to_string(),
            "subtotal": subtotal.normalize().to_string()
        }),
        reasoning: format!(
            "{} amounts exceed {} for a volume of {}; {} x {}% = {}",
            qualifying.len(),
            min.normalize(),
            volume.normalize(),
            volume.normalize(),
            percent.normalize(),
            subtotal.normalize()
        ),
    };

    Ok(PercentageSlabResult {
        line: SlabResult::Percentage {
            min,
            percent,
            volume,
            subtotal,
        },
        audit_step,
    })
}
