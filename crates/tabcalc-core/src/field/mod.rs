//! Field-related types
//!
//! This module contains:
//! - [`Field`] - A named value attached to a row
//! - [`FieldValue`] / [`FieldKind`] - The value stored in a field and its kind
//! - [`FieldError`] - Why a derived value could not be computed for a row
//! - [`NameMatching`] - Column reference resolution rules

mod error;
mod matching;
mod value;

pub use error::FieldError;
pub use matching::NameMatching;
pub use value::{FieldKind, FieldValue, SharedString, StringPool};

/// A named value belonging to exactly one row
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Field {
    /// Column name
    pub name: String,
    /// Stored value
    pub value: FieldValue,
}

impl Field {
    /// Create a new field
    pub fn new<S: Into<String>, V: Into<FieldValue>>(name: S, value: V) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Kind of the stored value
    pub fn kind(&self) -> FieldKind {
        self.value.kind()
    }

    /// Check if the field holds an error
    pub fn is_error(&self) -> bool {
        self.value.is_error()
    }
}
