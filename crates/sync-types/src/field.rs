//! Typed field values extracted from records.
//!
//! A [`FieldValue`] is what a record property lookup yields and what a
//! search document ultimately carries. Dates are kept as UTC instants and
//! only rendered to the backend's wire format at serialization time.

use chrono::{DateTime, Utc};
use serde::ser::{Serialize, Serializer};

/// Store-assigned record identity. Records are always enumerated in
/// ascending id order, which is what makes batch partitioning stable.
pub type RecordId = u64;

/// Identity of a known viewer, used for visibility markers.
pub type ViewerId = u64;

/// The backend date format: `1995-12-31T23:59:59Z`.
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// A single typed value read from a record property or accessor.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Free text
    Text(String),
    /// Signed integer
    Int(i64),
    /// Floating point number
    Float(f64),
    /// UTC instant
    Date(DateTime<Utc>),
    /// Boolean flag
    Bool(bool),
}

impl FieldValue {
    /// Render the value the way the backend expects it in a document.
    ///
    /// Dates become `YYYY-MM-DDTHH:MM:SSZ`; everything else uses its
    /// natural textual form.
    pub fn render(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Int(i) => i.to_string(),
            FieldValue::Float(f) => f.to_string(),
            FieldValue::Date(d) => d.format(DATE_FORMAT).to_string(),
            FieldValue::Bool(b) => b.to_string(),
        }
    }

    /// Borrow the inner text, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The inner integer, if this is an integer value.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// The inner date, if this is a date value.
    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Whether the value is empty text. Empty values are dropped during
    /// date coercion rather than sent to the backend.
    pub fn is_empty_text(&self) -> bool {
        matches!(self, FieldValue::Text(s) if s.trim().is_empty())
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(d: DateTime<Utc>) -> Self {
        FieldValue::Date(d)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Text(s) => serializer.serialize_str(s),
            FieldValue::Int(i) => serializer.serialize_i64(*i),
            FieldValue::Float(f) => serializer.serialize_f64(*f),
            FieldValue::Date(d) => serializer.serialize_str(&d.format(DATE_FORMAT).to_string()),
            FieldValue::Bool(b) => serializer.serialize_bool(*b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_render_date_is_utc_wire_format() {
        let d = Utc.with_ymd_and_hms(1995, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(FieldValue::Date(d).render(), "1995-12-31T23:59:59Z");
    }

    #[test]
    fn test_render_scalars() {
        assert_eq!(FieldValue::from("Home").render(), "Home");
        assert_eq!(FieldValue::from(42i64).render(), "42");
        assert_eq!(FieldValue::from(true).render(), "true");
    }

    #[test]
    fn test_serialize_date_as_string() {
        let d = Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap();
        let json = serde_json::to_string(&FieldValue::Date(d)).unwrap();
        assert_eq!(json, "\"2020-01-02T03:04:05Z\"");
    }

    #[test]
    fn test_serialize_scalars_as_native_json() {
        assert_eq!(
            serde_json::to_string(&FieldValue::Int(7)).unwrap(),
            "7"
        );
        assert_eq!(
            serde_json::to_string(&FieldValue::Text("a".into())).unwrap(),
            "\"a\""
        );
    }

    #[test]
    fn test_is_empty_text() {
        assert!(FieldValue::from("").is_empty_text());
        assert!(FieldValue::from("   ").is_empty_text());
        assert!(!FieldValue::from("x").is_empty_text());
        assert!(!FieldValue::Int(0).is_empty_text());
    }
}
