//! Prelude module - common imports for tabcalc users
//!
//! ```rust
//! use tabcalc::prelude::*;
//! ```

pub use crate::{
    // Data model
    Field,
    FieldError,
    FieldKind,
    FieldValue,
    NameMatching,
    Row,
    Table,

    // Formulas
    FormulaDefinition,
    ParseError,

    // Materialization
    MaterializeOptions,
    MaterializeStats,
    TableFormulaExt,
};

#[cfg(feature = "csv")]
pub use crate::{CsvReadOptions, CsvReader, CsvWriteOptions, CsvWriter, TableExt};
