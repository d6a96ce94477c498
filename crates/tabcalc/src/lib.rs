//! # tabcalc
//!
//! Derived columns for tabular data.
//!
//! A derived column is defined by a `Name = Expression` formula over the
//! existing columns of a [`Table`]. The formula is parsed once, then evaluated
//! row by row in table order and the result is appended to every row as a new
//! field. Rows that cannot be computed get an error field instead, so one bad
//! row never stops the others.
//!
//! ## Features
//!
//! - Arithmetic (`+ - * × / ÷ ^`) and comparisons (`> < <>`)
//! - Aggregates over the whole table: `sum`, `avg`, `count`, `min`, `max`
//! - Row-order functions: `lag`, `lead`, `delta` and the `Δt` time delta
//! - `if(condition, then, else)`
//! - CSV input and output (`csv` feature, on by default)
//!
//! ## Example
//!
//! ```rust
//! use tabcalc::prelude::*;
//!
//! let mut table = Table::from_rows(vec![
//!     Row::new().with_field("Density", 2).with_field("Volume", 10),
//!     Row::new().with_field("Density", 3).with_field("Volume", 5),
//! ]);
//!
//! let stats = table
//!     .add_derived_column("Total Cells = Cell Density × Volume")
//!     .unwrap();
//! assert_eq!(stats.numbers, 2);
//!
//! let totals: Vec<_> = table
//!     .column_values("Total Cells", NameMatching::Exact)
//!     .map(|v| v.and_then(FieldValue::as_number))
//!     .collect();
//! assert_eq!(totals, vec![Some(20.0), Some(15.0)]);
//! ```

pub mod materialize;
pub mod prelude;

// Re-export materialization types
pub use materialize::{materialize, MaterializeOptions, MaterializeStats, TableFormulaExt};

// Re-export core types
pub use tabcalc_core::{
    Error, Field, FieldError, FieldKind, FieldValue, NameMatching, Result, Row, SharedString,
    StringPool, Table,
};

// Re-export formula types
pub use tabcalc_formula::{
    evaluate, evaluate_field, parse, parse_expression, ColumnReferences, EvaluationContext,
    EvaluationOptions, Expression, ExpressionError, FormulaDefinition, ParseError, RowView, Value,
};

// Re-export I/O types
#[cfg(feature = "csv")]
pub use tabcalc_csv::{
    CsvError, CsvReadOptions, CsvReader, CsvResult, CsvWriteOptions, CsvWriter, LineTerminator,
};

#[cfg(feature = "csv")]
use std::path::Path;

/// Extension trait for Table to add file I/O
#[cfg(feature = "csv")]
pub trait TableExt: Sized {
    /// Open a table from a CSV file with default options
    fn open<P: AsRef<Path>>(path: P) -> CsvResult<Self>;

    /// Save the table to a CSV file with default options
    fn save<P: AsRef<Path>>(&self, path: P) -> CsvResult<()>;
}

#[cfg(feature = "csv")]
impl TableExt for Table {
    fn open<P: AsRef<Path>>(path: P) -> CsvResult<Table> {
        CsvReader::read_file(path, &CsvReadOptions::default())
    }

    fn save<P: AsRef<Path>>(&self, path: P) -> CsvResult<()> {
        CsvWriter::write_file(self, path, &CsvWriteOptions::default())
    }
}
