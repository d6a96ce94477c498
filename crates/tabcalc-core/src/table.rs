//! Table type

use crate::error::{Error, Result};
use crate::field::{FieldValue, NameMatching};
use crate::row::Row;

/// An ordered sequence of rows plus the ordered list of column names
///
/// Derived columns are appended with [`Table::push_column`] after every row
/// has received its field. The row count and order are fixed while a column
/// is being materialized: [`Table::rows_mut`] hands out a slice, not the
/// vector.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty table with a declared header
    pub fn with_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::new();
        for column in columns {
            let column = column.into();
            if table.column_index(&column).is_some() {
                return Err(Error::DuplicateColumn(column));
            }
            table.columns.push(column);
        }
        Ok(table)
    }

    /// Create a table from rows, collecting column names in first-seen order
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for row in &rows {
            for name in row.names() {
                if !columns.iter().any(|c| c == name) {
                    columns.push(name.to_string());
                }
            }
        }
        Self { columns, rows }
    }

    /// Append a row
    pub fn push_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Register a column name (derived columns may repeat a name)
    pub fn push_column<S: Into<String>>(&mut self, name: S) {
        self.columns.push(name.into());
    }

    /// Column names in order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Position of a declared column
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// All rows in order
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Mutable access to the rows (count and order stay fixed)
    pub fn rows_mut(&mut self) -> &mut [Row] {
        &mut self.rows
    }

    /// Get a row by index
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Values of one column, row by row (`None` where a row lacks the field)
    pub fn column_values<'a>(
        &'a self,
        reference: &'a str,
        matching: NameMatching,
    ) -> impl Iterator<Item = Option<&'a FieldValue>> + 'a {
        self.rows
            .iter()
            .map(move |row| row.find(reference, matching).map(|f| &f.value))
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
