//! Formula error types

use thiserror::Error;

/// Result type for definition parsing
pub type ParseResult<T> = std::result::Result<T, ParseError>;

/// Result type for expression parsing
pub type ExpressionResult<T> = std::result::Result<T, ExpressionError>;

/// Errors that reject a `Name = Expression` definition before any row is touched
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The input contains no `=`
    #[error("No equal sign found")]
    NoEqualsFound,

    /// The input contains more than one `=`
    #[error("Invalid formula: more than one '=' in definition")]
    Nonsense,
}

/// Errors from the expression grammar
///
/// These are not fatal for a materialization: a formula whose expression
/// fails to parse yields an unsupported-formula error on every row.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpressionError {
    /// Malformed expression text
    #[error("Syntax error at offset {offset}: {message}")]
    Syntax { offset: usize, message: String },

    /// Function name outside the built-in vocabulary
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    /// Wrong number of arguments
    #[error("Wrong number of arguments for {function}: expected {expected}, got {actual}")]
    ArgumentCount {
        function: String,
        expected: String,
        actual: usize,
    },

    /// Function requires a plain column reference argument
    #[error("{function} expects a column reference, got {found}")]
    ExpectedColumn { function: String, found: String },
}
