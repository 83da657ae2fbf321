//! Value coercion to declared field kinds.
//!
//! Source data is assumed dirty: a date field may hold an empty string,
//! a numeric field may hold text. Invalid values are dropped from the
//! document rather than erroring, so one bad value never sinks a batch.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use sync_schema::FieldKind;
use sync_types::FieldValue;

/// Coerce one raw value to its declared kind.
///
/// Returns `None` when the value cannot represent the kind: an
/// unparseable or empty date, a non-numeric literal for a numeric kind.
pub fn coerce(value: FieldValue, kind: FieldKind) -> Option<FieldValue> {
    match kind {
        FieldKind::Date => coerce_date(value),
        FieldKind::Int => coerce_int(value),
        FieldKind::Float | FieldKind::Double => coerce_float(value),
        FieldKind::Text => Some(coerce_text(value)),
    }
}

/// Coerce a list of raw values, dropping the invalid ones.
pub fn coerce_values(values: Vec<FieldValue>, kind: FieldKind) -> Vec<FieldValue> {
    values.into_iter().filter_map(|v| coerce(v, kind)).collect()
}

fn coerce_date(value: FieldValue) -> Option<FieldValue> {
    match value {
        FieldValue::Date(d) => Some(FieldValue::Date(d)),
        FieldValue::Text(s) => parse_date(s.trim()).map(FieldValue::Date),
        _ => None,
    }
}

fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    if s.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(s) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(parsed.and_utc());
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(parsed.and_hms_opt(0, 0, 0)?.and_utc());
    }
    None
}

fn coerce_int(value: FieldValue) -> Option<FieldValue> {
    match value {
        FieldValue::Int(i) => Some(FieldValue::Int(i)),
        FieldValue::Float(f) if f.fract() == 0.0 => Some(FieldValue::Int(f as i64)),
        FieldValue::Text(s) => s.trim().parse::<i64>().ok().map(FieldValue::Int),
        _ => None,
    }
}

fn coerce_float(value: FieldValue) -> Option<FieldValue> {
    match value {
        FieldValue::Float(f) => Some(FieldValue::Float(f)),
        FieldValue::Int(i) => Some(FieldValue::Float(i as f64)),
        FieldValue::Text(s) => s.trim().parse::<f64>().ok().map(FieldValue::Float),
        _ => None,
    }
}

fn coerce_text(value: FieldValue) -> FieldValue {
    match value {
        FieldValue::Text(s) => FieldValue::Text(s),
        other => FieldValue::Text(other.render()),
    }
}
