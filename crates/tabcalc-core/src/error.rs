//! Error types for tabcalc-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in tabcalc-core
#[derive(Debug, Error)]
pub enum Error {
    /// Column declared twice in a header
    #[error("Column name already exists: {0}")]
    DuplicateColumn(String),
}
