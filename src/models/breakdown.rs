//! Charge breakdown models.
//!
//! This module contains the [`ChargeBreakdown`] type and its associated
//! structures that capture every output of a charge computation: per-slab
//! results, the grand total, the audit steps, the two-schedule profit
//! comparison and the status partition that feeds them.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::{Transaction, TransactionStatus};
use crate::error::{EngineError, EngineResult};

/// Number of decimal places used when presenting currency.
pub const CURRENCY_DECIMAL_PLACES: u32 = 2;

/// Rounds a currency amount for presentation.
///
/// Totals are accumulated unrounded; this is only applied at the edge.
///
/// # Example
///
/// ```
/// use slab_charges::models::round_currency;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_currency(Decimal::from_str("107.025").unwrap()), Decimal::from_str("107.03").unwrap());
/// assert_eq!(round_currency(Decimal::from_str("102").unwrap()).to_string(), "102.00");
/// ```
pub fn round_currency(amount: Decimal) -> Decimal {
    let mut rounded =
        amount.round_dp_with_strategy(CURRENCY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(CURRENCY_DECIMAL_PLACES);
    rounded
}

/// Represents a single step in the charge computation audit trail.
///
/// Each step records how one slab line was derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequence number of this step.
    pub step_number: u32,
    /// Identifier of the rule applied (e.g. "fixed_rate_slab").
    pub rule_id: String,
    /// Human-readable name of the rule.
    pub rule_name: String,
    /// The slab in its schedule text form (e.g. "100-1000=5").
    pub slab_ref: String,
    /// Input values for this step.
    pub input: serde_json::Value,
    /// Output values from this step.
    pub output: serde_json::Value,
    /// Explanation of the decision made.
    pub reasoning: String,
}

/// The result of evaluating one slab against an amount series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SlabResult {
    /// Result of a fixed-rate slab.
    FixedRate {
        /// Lower bound, inclusive.
        min: Decimal,
        /// Upper bound, inclusive.
        max: Decimal,
        /// Charge per matching transaction.
        rate: Decimal,
        /// Number of amounts within `[min, max]`.
        count: u64,
        /// `count * rate`.
        subtotal: Decimal,
    },
    /// Result of a percentage slab.
    Percentage {
        /// Threshold, exclusive.
        min: Decimal,
        /// Percentage applied.
        percent: Decimal,
        /// Sum of amounts strictly above `min`.
        volume: Decimal,
        /// `volume * percent / 100`.
        subtotal: Decimal,
    },
}

impl SlabResult {
    /// Returns the charge contributed by this slab.
    pub fn subtotal(&self) -> Decimal {
        match self {
            SlabResult::FixedRate { subtotal, .. } | SlabResult::Percentage { subtotal, .. } => {
                *subtotal
            }
        }
    }
}

/// The complete breakdown of charges for one schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeBreakdown {
    /// Name of the schedule the breakdown was computed with.
    pub schedule_name: String,
    /// Number of amounts the schedule was applied to.
    pub transaction_count: u64,
    /// Per-slab results, aligned with the schedule's slab order.
    pub lines: Vec<SlabResult>,
    /// Sum of all subtotals, unrounded.
    pub total: Decimal,
    /// How each line was derived.
    pub audit_steps: Vec<AuditStep>,
}

impl ChargeBreakdown {
    /// Returns the total rounded for presentation.
    pub fn rounded_total(&self) -> Decimal {
        round_currency(self.total)
    }
}

/// The comparison of two schedules applied to the same amount series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfitComparison {
    /// Breakdown under our schedule.
    pub ours: ChargeBreakdown,
    /// Breakdown under the counterparty's schedule.
    pub counterparty: ChargeBreakdown,
    /// `ours.total - counterparty.total`, unrounded.
    pub profit: Decimal,
}

impl ProfitComparison {
    /// Returns the profit rounded for presentation.
    pub fn rounded_profit(&self) -> Decimal {
        round_currency(self.profit)
    }
}

/// Transactions of one status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBucket {
    /// Number of transactions in the bucket.
    pub count: u64,
    /// Sum of their amounts.
    pub total: Decimal,
    /// The amounts in row order.
    #[serde(skip)]
    pub amounts: Vec<Decimal>,
}

impl StatusBucket {
    /// Adds one amount to the bucket.
    ///
    /// Fails with `Overflow`, leaving the bucket unchanged, if the total
    /// would go out of range.
    pub fn push(&mut self, amount: Decimal) -> EngineResult<()> {
        self.total = self
            .total
            .checked_add(amount)
            .ok_or_else(|| EngineError::overflow("status bucket total"))?;
        self.count += 1;
        self.amounts.push(amount);
        Ok(())
    }
}

/// Transactions partitioned by status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusPartition {
    /// Successful transactions; the only ones charged.
    pub success: StatusBucket,
    /// Failed transactions.
    pub failed: StatusBucket,
    /// Refunded transactions.
    pub refunded: StatusBucket,
    /// Rows with an unrecognised status.
    pub other_count: u64,
    /// Rows whose amount was missing or not numeric.
    pub skipped_rows: u64,
}

impl StatusPartition {
    /// Returns the success total minus the failed and refunded totals.
    pub fn chargeable_amount(&self) -> EngineResult<Decimal> {
        self.success
            .total
            .checked_sub(self.failed.total)
            .and_then(|amount| amount.checked_sub(self.refunded.total))
            .ok_or_else(|| EngineError::overflow("chargeable amount"))
    }

    /// Adds one transaction to the bucket matching its status.
    pub fn record(&mut self, transaction: Transaction) -> EngineResult<()> {
        match transaction.status {
            TransactionStatus::Success => self.success.push(transaction.amount)?,
            TransactionStatus::Failed => self.failed.push(transaction.amount)?,
            TransactionStatus::Refunded => self.refunded.push(transaction.amount)?,
            TransactionStatus::Other => self.other_count += 1,
        }
        Ok(())
    }
}
