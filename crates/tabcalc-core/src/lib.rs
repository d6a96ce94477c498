//! # tabcalc-core
//!
//! Core data structures for the tabcalc derived-column engine.
//!
//! This crate provides the fundamental types used throughout tabcalc:
//! - [`Field`] and [`FieldValue`] - A named value on a row (number, string or error)
//! - [`FieldError`] - The per-row evaluation error taxonomy
//! - [`Row`] and [`Table`] - The ordered dataset derived columns are attached to
//! - [`NameMatching`] - How column references are matched against field names
//!
//! ## Example
//!
//! ```rust
//! use tabcalc_core::{FieldValue, Row, Table};
//!
//! let mut table = Table::from_rows(vec![
//!     Row::new().with_field("Density", 2.0).with_field("Volume", 10.0),
//!     Row::new().with_field("Density", 3.0).with_field("Volume", 5.0),
//! ]);
//!
//! assert_eq!(table.columns(), ["Density", "Volume"]);
//! assert_eq!(
//!     table.row(1).unwrap().get("Volume").map(|f| &f.value),
//!     Some(&FieldValue::Number(5.0))
//! );
//!
//! table.rows_mut()[0].push_value("Note", "first");
//! ```

pub mod error;
pub mod field;
pub mod row;
pub mod table;

// Re-exports for convenience
pub use error::{Error, Result};
pub use field::{Field, FieldError, FieldKind, FieldValue, NameMatching, SharedString, StringPool};
pub use row::Row;
pub use table::Table;
