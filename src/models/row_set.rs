//! Tabular row access.
//!
//! The engine never parses spreadsheets itself. A host hands it any type
//! implementing [`RowSet`]; columns are resolved by name once into a
//! [`ColumnRef`], which fails fast with `MissingColumn` when absent.
//! [`Table`] is the owned implementation used by the HTTP layer.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A single cell value as read from a tabular file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// A numeric cell.
    Number(f64),
    /// A text cell.
    Text(String),
    /// An empty cell.
    Empty,
}

impl CellValue {
    /// Returns the cell as text, for error messages.
    pub fn display(&self) -> String {
        match self {
            CellValue::Number(n) => n.to_string(),
            CellValue::Text(s) => s.clone(),
            CellValue::Empty => String::new(),
        }
    }
}

/// A column that has been validated against a row set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnRef(usize);

impl ColumnRef {
    /// Returns the position of the column.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Read access to a set of rows with named columns.
pub trait RowSet {
    /// Resolves a column by its exact name.
    fn column(&self, name: &str) -> EngineResult<ColumnRef>;

    /// Returns the number of data rows.
    fn row_count(&self) -> usize;

    /// Returns the value at `row` in `column`. Short rows read as empty.
    fn value(&self, row: usize, column: ColumnRef) -> &CellValue;
}

/// An owned table of rows.
///
/// # Example
///
/// ```
/// use slab_charges::models::{CellValue, RowSet, Table};
///
/// let table = Table::new(
///     vec!["Amount".to_string(), "Status".to_string()],
///     vec![vec![CellValue::Number(500.0), CellValue::Text("success".to_string())]],
/// );
/// let amount = table.column("Amount").unwrap();
/// assert_eq!(table.value(0, amount), &CellValue::Number(500.0));
/// assert!(table.column("Fee").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Column names, in order.
    pub columns: Vec<String>,
    /// Data rows; each row is aligned with `columns`.
    pub rows: Vec<Vec<CellValue>>,
}

static EMPTY_CELL: CellValue = CellValue::Empty;

impl Table {
    /// Creates a table from its header and rows.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self { columns, rows }
    }
}

impl RowSet for Table {
    fn column(&self, name: &str) -> EngineResult<ColumnRef> {
        self.columns
            .iter()
            .position(|c| c == name)
            .map(ColumnRef)
            .ok_or_else(|| EngineError::MissingColumn {
                column: name.to_string(),
            })
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn value(&self, row: usize, column: ColumnRef) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(column.index()))
            .unwrap_or(&EMPTY_CELL)
    }
}
