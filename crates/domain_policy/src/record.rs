//! Policy records
//!
//! The shape of a policy row is owned by the `policy_with_popularity` view,
//! not by this crate. A [`PolicyRecord`] therefore keeps the row as an
//! ordered JSON object and only interprets the columns the ranking needs.
//! Serializing a record writes the row back exactly as it was received.

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;

use crate::error::PolicyError;

/// Column names exposed by the listing view
pub mod columns {
    pub const ID: &str = "id";
    pub const POPULARITY_SCORE: &str = "popularity_score";
    pub const IMMEDIATE_COUNT: &str = "immediate_count";
    pub const NEXT_COUNT: &str = "next_count";
    pub const CREATED_AT: &str = "created_at";
}

/// One row of the policy listing view
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolicyRecord(Map<String, Value>);

impl PolicyRecord {
    /// Wraps a row already decoded as a JSON object
    pub fn new(columns: Map<String, Value>) -> Self {
        Self(columns)
    }

    /// Decodes a row from an arbitrary JSON value
    ///
    /// # Errors
    ///
    /// Returns `PolicyError::InvalidRecord` unless the value is an object.
    pub fn from_value(value: Value) -> Result<Self, PolicyError> {
        match value {
            Value::Object(columns) => Ok(Self(columns)),
            other => Err(PolicyError::invalid_record(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Sets a column, returning the record
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(column.into(), value.into());
        self
    }

    /// Raw value of a column; `None` when the row has no such column
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    /// Value of a column with JSON `null` folded into `None`
    pub fn non_null(&self, column: &str) -> Option<&Value> {
        self.0.get(column).filter(|value| !value.is_null())
    }

    /// The row's `id` column, whatever its type
    pub fn id(&self) -> Option<&Value> {
        self.non_null(columns::ID)
    }

    pub fn popularity_score(&self) -> Option<Decimal> {
        self.non_null(columns::POPULARITY_SCORE).and_then(decimal_value)
    }

    pub fn immediate_count(&self) -> Option<i64> {
        self.non_null(columns::IMMEDIATE_COUNT).and_then(integer_value)
    }

    pub fn next_count(&self) -> Option<i64> {
        self.non_null(columns::NEXT_COUNT).and_then(integer_value)
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.non_null(columns::CREATED_AT)
            .and_then(Value::as_str)
            .and_then(parse_timestamp)
    }

    /// All columns in the order the store returned them
    pub fn columns(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl TryFrom<Value> for PolicyRecord {
    type Error = PolicyError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

impl From<PolicyRecord> for Value {
    fn from(record: PolicyRecord) -> Self {
        Value::Object(record.0)
    }
}

/// Reads a JSON number (or numeric string) without going through `f64`
pub fn decimal_value(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(number) => number.to_string(),
        Value::String(text) => text.trim().to_string(),
        _ => return None,
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

/// Reads an integral JSON number
pub fn integer_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            decimal_value(value)
                .filter(|decimal| decimal.fract().is_zero())
                .and_then(|decimal| decimal.to_i64())
        }),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// Parses the timestamp shapes emitted for `timestamptz` and `timestamp` columns.
///
/// Values without an offset are taken as UTC.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f%#z", "%Y-%m-%d %H:%M:%S%.f%#z"] {
        if let Ok(parsed) = DateTime::parse_from_str(text, format) {
            return Some(parsed.with_timezone(&Utc));
        }
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(text, format) {
            return Some(parsed.and_utc());
        }
    }
    None
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn sample() -> PolicyRecord {
        PolicyRecord::from_value(json!({
            "id": 7,
            "title": "Free school meals",
            "popularity_score": 12.75,
            "immediate_count": 9,
            "next_count": 3,
            "created_at": "2024-03-01T09:30:00.123456+00:00"
        }))
        .unwrap()
    }

    #[test]
    fn test_typed_accessors() {
        let record = sample();

        assert_eq!(record.id(), Some(&json!(7)));
        assert_eq!(record.popularity_score(), Some(dec!(12.75)));
        assert_eq!(record.immediate_count(), Some(9));
        assert_eq!(record.next_count(), Some(3));
        assert_eq!(
            record.created_at().map(|t| t.date_naive()),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap().date_naive())
        );
    }

    #[test]
    fn test_null_and_missing_columns() {
        let record = PolicyRecord::default().with("popularity_score", Value::Null);

        assert_eq!(record.get("popularity_score"), Some(&Value::Null));
        assert!(record.popularity_score().is_none());
        assert!(record.get("next_count").is_none());
        assert!(record.next_count().is_none());
    }

    #[test]
    fn test_rejects_non_objects() {
        assert!(PolicyRecord::from_value(json!([1, 2])).is_err());
        assert!(PolicyRecord::try_from(json!("row")).is_err());
        assert!(serde_json::from_value::<PolicyRecord>(json!(null)).is_err());
    }

    #[test]
    fn test_serialization_preserves_row() {
        let raw = r#"{"title":"Bus lanes","id":"b6a1","popularity_score":null,"extra":{"a":[1,2]}}"#;
        let record: PolicyRecord = serde_json::from_str(raw).unwrap();

        assert_eq!(serde_json::to_string(&record).unwrap(), raw);
    }

    #[test]
    fn test_decimal_value_shapes() {
        assert_eq!(decimal_value(&json!(3)), Some(Decimal::from(3)));
        assert_eq!(decimal_value(&json!("4.50")), Some(dec!(4.50)));
        assert_eq!(decimal_value(&json!(1e3)), Some(Decimal::from(1000)));
        assert!(decimal_value(&json!(true)).is_none());
    }

    #[test]
    fn test_integer_value_shapes() {
        assert_eq!(integer_value(&json!(42)), Some(42));
        assert_eq!(integer_value(&json!(42.0)), Some(42));
        assert_eq!(integer_value(&json!("17")), Some(17));
        assert!(integer_value(&json!(4.5)).is_none());
    }

    #[test]
    fn test_parse_timestamp_shapes() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();

        assert_eq!(parse_timestamp("2024-01-02T03:04:05Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-02T03:04:05+00:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-02 03:04:05+00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-02T05:04:05+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-02T03:04:05"), Some(expected));
        assert!(parse_timestamp("yesterday").is_none());
    }
}
