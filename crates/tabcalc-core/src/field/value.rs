//! Field value types

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::FieldError;

/// The kind of value a field holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FieldKind {
    Number,
    String,
    Error,
}

impl FieldKind {
    /// Lowercase name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Number => "number",
            FieldKind::String => "string",
            FieldKind::Error => "error",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents the value stored in a field
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "kind", content = "value", rename_all = "lowercase")
)]
pub enum FieldValue {
    /// Numeric value
    Number(f64),

    /// String value
    String(SharedString),

    /// Evaluation error recorded for this row
    Error(FieldError),
}

impl FieldValue {
    /// Create a new string value
    pub fn string<S: AsRef<str>>(s: S) -> Self {
        FieldValue::String(SharedString::new(s))
    }

    /// Kind of this value
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Number(_) => FieldKind::Number,
            FieldValue::String(_) => FieldKind::String,
            FieldValue::Error(_) => FieldKind::Error,
        }
    }

    /// Try to get the value as a number
    ///
    /// Strings holding a decimal number (such as `"3.5"`) are accepted, since
    /// imported text columns frequently carry measurements.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::String(s) => s
                .as_str()
                .trim()
                .parse()
                .ok()
                .filter(|n: &f64| n.is_finite()),
            FieldValue::Error(_) => None,
        }
    }

    /// Try to get the value as a string
    pub fn as_string(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Get the error if this is one
    pub fn as_error(&self) -> Option<&FieldError> {
        match self {
            FieldValue::Error(e) => Some(e),
            _ => None,
        }
    }

    /// Check if the value is an error
    pub fn is_error(&self) -> bool {
        matches!(self, FieldValue::Error(_))
    }

    /// Get the type name for error messages
    pub fn type_name(&self) -> &'static str {
        self.kind().as_str()
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::String(s) => write!(f, "{}", s.as_str()),
            FieldValue::Error(e) => write!(f, "{}", e),
        }
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        FieldValue::Number(n as f64)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n as f64)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::string(s)
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::string(s)
    }
}

impl From<SharedString> for FieldValue {
    fn from(s: SharedString) -> Self {
        FieldValue::String(s)
    }
}

impl From<FieldError> for FieldValue {
    fn from(e: FieldError) -> Self {
        FieldValue::Error(e)
    }
}

/// Interned string for memory efficiency
///
/// Imported tables repeat the same labels on many rows (units, batch names,
/// the `"null"` marker of conditional formulas). Using `Arc<str>` shares the
/// string data across all of them.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SharedString(Arc<str>);

impl SharedString {
    /// Create a new shared string
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        SharedString(Arc::from(s.as_ref()))
    }

    /// Get the string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get the length of the string
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the string is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SharedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl fmt::Display for SharedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for SharedString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SharedString {
    fn from(s: &str) -> Self {
        SharedString::new(s)
    }
}

impl From<String> for SharedString {
    fn from(s: String) -> Self {
        SharedString::new(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for SharedString {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for SharedString {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        <String as serde::Deserialize>::deserialize(deserializer).map(SharedString::from)
    }
}

/// String pool for deduplicating strings
///
/// When loading large tables, many rows contain the same string values.
/// The string pool ensures each unique string is stored only once in memory.
#[derive(Debug, Default)]
pub struct StringPool {
    strings: HashMap<Arc<str>, SharedString>,
}

impl StringPool {
    /// Create a new empty string pool
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create a shared string
    ///
    /// If the string already exists in the pool, returns a clone of the existing SharedString.
    /// Otherwise, creates a new SharedString and adds it to the pool.
    pub fn intern<S: AsRef<str>>(&mut self, s: S) -> SharedString {
        let s = s.as_ref();
        if let Some(shared) = self.strings.get(s) {
            shared.clone()
        } else {
            let arc: Arc<str> = Arc::from(s);
            let shared = SharedString(arc.clone());
            self.strings.insert(arc, shared.clone());
            shared
        }
    }

    /// Get the number of unique strings in the pool
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Check if the pool is empty
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_value_conversions() {
        assert_eq!(FieldValue::from(42), FieldValue::Number(42.0));
        assert_eq!(FieldValue::from(3.25), FieldValue::Number(3.25));

        let s = FieldValue::from("hello");
        assert_eq!(s.as_string(), Some("hello"));
        assert_eq!(s.kind(), FieldKind::String);
    }

    #[test]
    fn test_field_value_as_number() {
        assert_eq!(FieldValue::Number(42.0).as_number(), Some(42.0));
        assert_eq!(FieldValue::string(" 3.5 ").as_number(), Some(3.5));
        assert_eq!(FieldValue::string("hello").as_number(), None);
        assert_eq!(FieldValue::string("NaN").as_number(), None);
        assert_eq!(FieldValue::string("-inf").as_number(), None);
        assert_eq!(FieldValue::Error(FieldError::UnsupportedFormula).as_number(), None);
    }

    #[test]
    fn test_field_value_display() {
        assert_eq!(FieldValue::Number(20.0).to_string(), "20");
        assert_eq!(FieldValue::Number(2.5).to_string(), "2.5");
        assert_eq!(FieldValue::string("null").to_string(), "null");
        assert_eq!(
            FieldValue::Error(FieldError::UnsupportedFormula).to_string(),
            "Parser not designed, formula not in predefined list"
        );
    }

    #[test]
    fn test_string_pool() {
        let mut pool = StringPool::new();

        let s1 = pool.intern("hello");
        let s2 = pool.intern("hello");
        let s3 = pool.intern("world");

        // Same string should return same SharedString
        assert!(Arc::ptr_eq(&s1.0, &s2.0));

        // Different strings should be different
        assert!(!Arc::ptr_eq(&s1.0, &s3.0));

        assert_eq!(pool.len(), 2);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_field_value_json() {
        let json = serde_json::to_string(&FieldValue::Number(20.0)).unwrap();
        assert_eq!(json, r#"{"kind":"number","value":20.0}"#);

        let back: FieldValue = serde_json::from_str(r#"{"kind":"string","value":"null"}"#).unwrap();
        assert_eq!(back, FieldValue::string("null"));
    }
}
