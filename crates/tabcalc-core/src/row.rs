//! Row types

use crate::field::{Field, FieldValue, NameMatching};

/// An ordered record of fields
///
/// Position in the table is significant: it defines "previous" and "next"
/// for sequence operators. Field names are not deduplicated; lookups return
/// the first matching field.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Row {
    fields: Vec<Field>,
}

impl Row {
    /// Create an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field append
    pub fn with_field<S: Into<String>, V: Into<FieldValue>>(mut self, name: S, value: V) -> Self {
        self.push_value(name, value);
        self
    }

    /// Append a field
    pub fn push(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Append a field built from a name and value
    pub fn push_value<S: Into<String>, V: Into<FieldValue>>(&mut self, name: S, value: V) {
        self.fields.push(Field::new(name, value));
    }

    /// Get the first field with exactly this name
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Get the `n`-th field (0-based) with exactly this name
    pub fn get_nth(&self, name: &str, n: usize) -> Option<&Field> {
        self.fields.iter().filter(|f| f.name == name).nth(n)
    }

    /// Resolve a column reference using the given matching rules
    pub fn find(&self, reference: &str, matching: NameMatching) -> Option<&Field> {
        matching
            .resolve(reference, self.fields.iter().map(|f| f.name.as_str()))
            .map(|idx| &self.fields[idx])
    }

    /// Resolve a column reference and read it as a number
    pub fn number(&self, reference: &str, matching: NameMatching) -> Option<f64> {
        self.find(reference, matching)
            .and_then(|f| f.value.as_number())
    }

    /// All fields in order
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Field names in order
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the row has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
