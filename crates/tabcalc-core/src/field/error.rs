//! Per-row evaluation errors

use thiserror::Error;

/// Why a derived value could not be computed for one row
///
/// These errors never abort a materialization: they are stored on the
/// affected row as an error-kind field and evaluation moves on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FieldError {
    /// A referenced field is absent on the row (or on the neighbouring row)
    #[error("Missing operand: {column}")]
    MissingOperand { column: String },

    /// A time or value delta could not be computed
    #[error("Error calculating Δv/Δt: {reason}")]
    UndefinedDelta { reason: String },

    /// The expression is outside the built-in operator vocabulary
    #[error("Parser not designed, formula not in predefined list")]
    UnsupportedFormula,

    /// An operand has the wrong kind for the operation
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },
}

impl FieldError {
    /// Create a [`FieldError::MissingOperand`]
    pub fn missing<S: Into<String>>(column: S) -> Self {
        FieldError::MissingOperand {
            column: column.into(),
        }
    }

    /// Create a [`FieldError::UndefinedDelta`]
    pub fn undefined_delta<S: Into<String>>(reason: S) -> Self {
        FieldError::UndefinedDelta {
            reason: reason.into(),
        }
    }

    /// Create a [`FieldError::TypeMismatch`]
    pub fn type_mismatch<E: Into<String>, A: Into<String>>(expected: E, actual: A) -> Self {
        FieldError::TypeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_error_display() {
        assert_eq!(
            FieldError::missing("Volume").to_string(),
            "Missing operand: Volume"
        );
        assert_eq!(
            FieldError::undefined_delta("division by zero").to_string(),
            "Error calculating Δv/Δt: division by zero"
        );
        assert_eq!(
            FieldError::type_mismatch("number", "string").to_string(),
            "Type mismatch: expected number, got string"
        );
    }
}
