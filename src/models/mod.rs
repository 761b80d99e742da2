//! Core data models for the slab charge engine.
//!
//! This module contains all the domain models used throughout the engine.

mod breakdown;
mod row_set;
mod slab;
mod transaction;

pub use breakdown::{
    AuditStep, CURRENCY_DECIMAL_PLACES, ChargeBreakdown, ProfitComparison, SlabResult,
    StatusBucket, StatusPartition, round_currency,
};
pub use row_set::{CellValue, ColumnRef, RowSet, Table};
pub use slab::{Schedule, Slab};
pub use transaction::{Transaction, TransactionStatus};
