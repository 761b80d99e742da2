//! Transaction model and status classification.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The settlement status of a transaction.
///
/// Only [`TransactionStatus::Success`] is charged. Failed and refunded
/// transactions are deducted from the chargeable amount; anything else is
/// reported as a count only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    /// The payment went through.
    Success,
    /// The payment failed.
    Failed,
    /// The payment was refunded.
    Refunded,
    /// Any unrecognised status value.
    Other,
}

impl TransactionStatus {
    /// Classifies a raw status label.
    ///
    /// Matching ignores case and surrounding whitespace. Unknown labels map
    /// to [`TransactionStatus::Other`].
    ///
    /// # Examples
    ///
    /// ```
    /// use slab_charges::models::TransactionStatus;
    ///
    /// assert_eq!(TransactionStatus::from_label(" SUCCESS "), TransactionStatus::Success);
    /// assert_eq!(TransactionStatus::from_label("Refunded"), TransactionStatus::Refunded);
    /// assert_eq!(TransactionStatus::from_label("pending"), TransactionStatus::Other);
    /// ```
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "success" | "successful" | "succeeded" | "completed" => TransactionStatus::Success,
            "failed" | "failure" => TransactionStatus::Failed,
            "refunded" | "refund" => TransactionStatus::Refunded,
            _ => TransactionStatus::Other,
        }
    }
}

/// One charged row: an amount and its status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// The transaction amount.
    pub amount: Decimal,
    /// The settlement status.
    pub status: TransactionStatus,
}
