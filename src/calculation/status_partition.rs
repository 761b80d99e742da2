//! Status-based amount partition.
//!
//! Splits raw rows into success, failed, refunded and other buckets before
//! any slab is applied. The success bucket is the series both schedules are
//! charged on.

use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{CellValue, RowSet, StatusPartition, Transaction, TransactionStatus};

use super::breakdown::decimal_from_f64;

/// Partitions rows by their status column.
///
/// Both columns are resolved up front and a missing one fails with
/// `MissingColumn`. Status labels are matched case-insensitively; rows with
/// an unrecognised status are only counted. Rows whose amount is empty or
/// not numeric are counted in `skipped_rows` and left out of every sum.
///
/// # Errors
///
/// - `MissingColumn` if either column is absent
/// - `InvalidInput` if an amount cell holds an infinite or negative value;
///   the reported index is the 1-based data row
/// - `Overflow` if a bucket total is out of range
///
/// # Example
///
/// ```
/// use slab_charges::calculation::partition_by_status;
/// use slab_charges::models::{CellValue, Table};
/// use rust_decimal::Decimal;
///
/// let table = Table::new(
///     vec!["Amount".to_string(), "Status".to_string()],
///     vec![
///         vec![CellValue::Number(500.0), CellValue::Text("Success".to_string())],
///         vec![CellValue::Number(200.0), CellValue::Text("failed".to_string())],
///         vec![CellValue::Text("n/a".to_string()), CellValue::Text("success".to_string())],
///     ],
/// );
///
/// let partition = partition_by_status(&table, "Amount", "Status").unwrap();
/// assert_eq!(partition.success.amounts, vec![Decimal::from(500)]);
/// assert_eq!(partition.chargeable_amount().unwrap(), Decimal::from(300));
/// assert_eq!(partition.skipped_rows, 1);
/// ```
pub fn partition_by_status<R: RowSet + ?Sized>(
    rows: &R,
    amount_column: &str,
    status_column: &str,
) -> EngineResult<StatusPartition> {
    let amount_ref = rows.column(amount_column)?;
    let status_ref = rows.column(status_column)?;

    let mut partition = StatusPartition::default();

    for row in 0..rows.row_count() {
        let status = match rows.value(row, status_ref) {
            CellValue::Text(label) => TransactionStatus::from_label(label),
            _ => TransactionStatus::Other,
        };
        if status == TransactionStatus::Other {
            partition.other_count += 1;
            continue;
        }

        match read_amount(row + 1, rows.value(row, amount_ref))? {
            Some(amount) => partition.record(Transaction { amount, status })?,
            None => partition.skipped_rows += 1,
        }
    }

    debug!(
        rows = rows.row_count(),
        success = partition.success.count,
        failed = partition.failed.count,
        refunded = partition.refunded.count,
        other = partition.other_count,
        skipped = partition.skipped_rows,
        "Partitioned transactions by status"
    );

    Ok(partition)
}

/// Reads an amount cell. `None` means missing or non-numeric.
fn read_amount(row_number: usize, cell: &CellValue) -> EngineResult<Option<Decimal>> {
    let invalid = |message: &str| EngineError::InvalidInput {
        index: row_number,
        value: cell.display(),
        message: message.to_string(),
    };

    let amount = match cell {
        CellValue::Number(value) if value.is_nan() => return Ok(None),
        CellValue::Number(value) => decimal_from_f64(row_number, *value)?,
        CellValue::Text(text) => match Decimal::from_str(text.trim()) {
            Ok(amount) => amount,
            Err(_) => return Ok(None),
        },
        CellValue::Empty => return Ok(None),
    };

    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(invalid("amount must not be negative"));
    }
    Ok(Some(amount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Table;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn table(rows: Vec<Vec<CellValue>>) -> Table {
        Table::new(vec!["Amount".to_string(), "Status".to_string()], rows)
    }

    #[test]
    fn test_partitions_each_status() {
        let rows = table(vec![
            vec![CellValue::Number(1000.0), text("success")],
            vec![CellValue::Number(500.0), text("SUCCESS")],
            vec![CellValue::Number(200.0), text("Failed")],
            vec![CellValue::Number(100.0), text("refunded")],
            vec![CellValue::Number(999.0), text("pending")],
        ]);

        let partition = partition_by_status(&rows, "Amount", "Status").unwrap();

        assert_eq!(partition.success.count, 2);
        assert_eq!(partition.success.total, dec("1500"));
        assert_eq!(partition.failed.total, dec("200"));
        assert_eq!(partition.refunded.total, dec("100"));
        assert_eq!(partition.other_count, 1);
        assert_eq!(partition.chargeable_amount().unwrap(), dec("1200"));
    }

    #[test]
    fn test_success_amounts_keep_row_order() {
        let rows = table(vec![
            vec![CellValue::Number(8000.0), text("success")],
            vec![CellValue::Number(100.0), text("success")],
        ]);
        let partition = partition_by_status(&rows, "Amount", "Status").unwrap();
        assert_eq!(partition.success.amounts, vec![dec("8000"), dec("100")]);
    }

    #[test]
    fn test_numeric_text_amounts_are_accepted() {
        let rows = table(vec![vec![text(" 1500.50 "), text("success")]]);
        let partition = partition_by_status(&rows, "Amount", "Status").unwrap();
        assert_eq!(partition.success.amounts, vec![dec("1500.50")]);
    }

    #[test]
    fn test_missing_and_non_numeric_amounts_are_skipped() {
        let rows = table(vec![
            vec![CellValue::Empty, text("success")],
            vec![text("N/A"), text("success")],
            vec![CellValue::Number(f64::NAN), text("failed")],
            vec![CellValue::Number(300.0), text("success")],
        ]);
        let partition = partition_by_status(&rows, "Amount", "Status").unwrap();
        assert_eq!(partition.skipped_rows, 3);
        assert_eq!(partition.success.count, 1);
        assert_eq!(partition.failed.count, 0);
    }

    #[test]
    fn test_non_text_status_is_other() {
        let rows = table(vec![
            vec![CellValue::Number(300.0), CellValue::Number(1.0)],
            vec![CellValue::Number(300.0), CellValue::Empty],
        ]);
        let partition = partition_by_status(&rows, "Amount", "Status").unwrap();
        assert_eq!(partition.other_count, 2);
        assert_eq!(partition.success.count, 0);
    }

    #[test]
    fn test_infinite_amount_is_invalid() {
        let rows = table(vec![
            vec![CellValue::Number(100.0), text("success")],
            vec![CellValue::Number(f64::INFINITY), text("success")],
        ]);
        match partition_by_status(&rows, "Amount", "Status") {
            Err(EngineError::InvalidInput { index, .. }) => assert_eq!(index, 2),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_failed_amount_is_invalid() {
        let rows = table(vec![
            vec![CellValue::Number(500.0), text("success")],
            vec![CellValue::Number(-200.0), text("failed")],
        ]);
        match partition_by_status(&rows, "Amount", "Status") {
            Err(EngineError::InvalidInput { index, value, message }) => {
                assert_eq!(index, 2);
                assert_eq!(value, "-200");
                assert_eq!(message, "amount must not be negative");
            }
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_success_text_reports_table_row() {
        let rows = table(vec![
            vec![CellValue::Number(100.0), text("failed")],
            vec![CellValue::Number(300.0), text("success")],
            vec![text("-200"), text("success")],
        ]);
        match partition_by_status(&rows, "Amount", "Status") {
            Err(EngineError::InvalidInput { index, value, .. }) => {
                assert_eq!(index, 3);
                assert_eq!(value, "-200");
            }
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_zero_is_accepted() {
        let rows = table(vec![vec![text("-0"), text("success")]]);
        let partition = partition_by_status(&rows, "Amount", "Status").unwrap();
        assert_eq!(partition.success.amounts, vec![Decimal::ZERO]);
    }

    #[test]
    fn test_bucket_total_out_of_range_is_an_error() {
        let rows = table(vec![
            vec![text("79228162514264337593543950335"), text("success")],
            vec![text("79228162514264337593543950335"), text("success")],
        ]);
        assert!(matches!(
            partition_by_status(&rows, "Amount", "Status"),
            Err(EngineError::Overflow { .. })
        ));
    }

    #[test]
    fn test_missing_amount_column() {
        let rows = table(vec![]);
        match partition_by_status(&rows, "Value", "Status") {
            Err(EngineError::MissingColumn { column }) => assert_eq!(column, "Value"),
            other => panic!("Expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_status_column() {
        let rows = Table::new(vec!["Amount".to_string()], vec![]);
        match partition_by_status(&rows, "Amount", "Status") {
            Err(EngineError::MissingColumn { column }) => assert_eq!(column, "Status"),
            other => panic!("Expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_table_gives_empty_partition() {
        let partition = partition_by_status(&table(vec![]), "Amount", "Status").unwrap();
        assert_eq!(partition, StatusPartition::default());
    }
}
