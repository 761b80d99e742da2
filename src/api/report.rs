//! Plain-text rendering of charge results.
//!
//! These are the human-readable lines returned alongside the structured
//! report, one per slab plus the totals.

use rust_decimal::Decimal;

use crate::models::{ChargeBreakdown, ProfitComparison, SlabResult, round_currency};

/// Formats a presented amount in rupees, sign first.
fn rupees(amount: Decimal) -> String {
    let rounded = round_currency(amount);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-₹{}", rounded.abs())
    } else {
        format!("₹{}", rounded.abs())
    }
}

/// Renders a breakdown as one line per slab followed by the total.
///
/// Fixed-rate counts and rates are shown as entered; percentage volumes and
/// every total are rounded to two decimal places.
///
/// # Example
///
/// ```
/// use slab_charges::api::render_summary;
/// use slab_charges::calculation::{compute_breakdown, parse_schedule, ParseMode};
/// use rust_decimal::Decimal;
///
/// let schedule = parse_schedule("ours", "100-1000=5\n>7000=1%", ParseMode::Strict)
///     .unwrap()
///     .schedule;
/// let breakdown = compute_breakdown(&[100, 500, 8000].map(Decimal::from), &schedule).unwrap();
///
/// assert_eq!(
///     render_summary(&breakdown),
///     vec![
///         "₹5 transactions: 2 × ₹5 = ₹10".to_string(),
///         "Volume > ₹7000: ₹8000.00 × 1% = ₹80.00".to_string(),
///         "Total Charge: ₹90.00".to_string(),
///     ]
/// );
/// ```
pub fn render_summary(breakdown: &ChargeBreakdown) -> Vec<String> {
    let mut lines: Vec<String> = breakdown
        .lines
        .iter()
        .map(|line| match line {
            SlabResult::FixedRate {
                rate,
                count,
                subtotal,
                ..
            } => format!(
                "₹{rate} transactions: {count} × ₹{rate} = ₹{subtotal}",
                rate = rate.normalize(),
                subtotal = subtotal.normalize()
            ),
            SlabResult::Percentage {
                min,
                percent,
                volume,
                subtotal,
            } => format!(
                "Volume > ₹{}: {} × {}% = {}",
                min.normalize(),
                rupees(*volume),
                percent.normalize(),
                rupees(*subtotal)
            ),
        })
        .collect();

    lines.push(format!("Total Charge: {}", rupees(breakdown.total)));
    lines
}

/// Renders the totals of a two-schedule comparison.
pub fn render_comparison(comparison: &ProfitComparison) -> Vec<String> {
    vec![
        format!("Our Charge: {}", rupees(comparison.ours.total)),
        format!("Counterparty Charge: {}", rupees(comparison.counterparty.total)),
        format!("Profit: {}", rupees(comparison.profit)),
    ]
}
