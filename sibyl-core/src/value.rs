//! Value types for SQL literals

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::value::{MapAccessDeserializer, SeqAccessDeserializer};
use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};

/// A typed value that is rendered into statement text as a literal
///
/// Decoding from self-describing formats only yields the variants the
/// input can name unambiguously: `null`, booleans, integers (`I32` when
/// they fit, else `I64`), floats and strings. Arrays and objects become a
/// `Json` document. Dates and timestamps arrive as plain strings; build
/// `Date`, `DateTime` and `Bytes` values from typed Rust data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// 32-bit integer
    I32(i32),
    /// 64-bit integer
    I64(i64),
    /// 64-bit float
    F64(f64),
    /// 32-bit float
    F32(f32),
    /// String value
    String(String),
    /// Raw bytes
    Bytes(Vec<u8>),
    /// JSON document, stored as text
    Json(serde_json::Value),
    /// Calendar date
    Date(NaiveDate),
    /// Instant in UTC
    DateTime(DateTime<Utc>),
    /// Exact decimal
    #[cfg(feature = "decimal-support")]
    Decimal(rust_decimal::Decimal),
    /// UUID
    #[cfg(feature = "uuid-support")]
    Uuid(uuid::Uuid),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the string payload if this is a `String` value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a literal value")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        Value::deserialize(deserializer)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(i32::try_from(v).map_or(Value::I64(v), Value::I32))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        if let Ok(small) = i32::try_from(v) {
            Ok(Value::I32(small))
        } else if let Ok(large) = i64::try_from(v) {
            Ok(Value::I64(large))
        } else {
            Ok(Value::F64(v as f64))
        }
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        Ok(Value::F64(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(Value::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> Result<Value, A::Error> {
        serde_json::Value::deserialize(SeqAccessDeserializer::new(seq)).map(Value::Json)
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Value, A::Error> {
        serde_json::Value::deserialize(MapAccessDeserializer::new(map)).map(Value::Json)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl From<bool> for Value {
    fn from(val: bool) -> Self {
        Value::Bool(val)
    }
}

impl From<i32> for Value {
    fn from(val: i32) -> Self {
        Value::I32(val)
    }
}

impl From<i64> for Value {
    fn from(val: i64) -> Self {
        Value::I64(val)
    }
}

impl From<f32> for Value {
    fn from(val: f32) -> Self {
        Value::F32(val)
    }
}

impl From<f64> for Value {
    fn from(val: f64) -> Self {
        Value::F64(val)
    }
}

impl From<String> for Value {
    fn from(val: String) -> Self {
        Value::String(val)
    }
}

impl From<&str> for Value {
    fn from(val: &str) -> Self {
        Value::String(val.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(val: Vec<u8>) -> Self {
        Value::Bytes(val)
    }
}

impl From<serde_json::Value> for Value {
    fn from(val: serde_json::Value) -> Self {
        Value::Json(val)
    }
}

impl From<NaiveDate> for Value {
    fn from(val: NaiveDate) -> Self {
        Value::Date(val)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(val: DateTime<Utc>) -> Self {
        Value::DateTime(val)
    }
}

#[cfg(feature = "decimal-support")]
impl From<rust_decimal::Decimal> for Value {
    fn from(val: rust_decimal::Decimal) -> Self {
        Value::Decimal(val)
    }
}

#[cfg(feature = "uuid-support")]
impl From<uuid::Uuid> for Value {
    fn from(val: uuid::Uuid) -> Self {
        Value::Uuid(val)
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(val) => val.into(),
            None => Value::Null,
        }
    }
}

/// Collect enumeration members from plain Rust values
pub fn values<I, T>(items: I) -> Vec<Value>
where
    I: IntoIterator<Item = T>,
    T: Into<Value>,
{
    items.into_iter().map(Into::into).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_creation() {
        assert_eq!(Value::from(42i32), Value::I32(42));
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from("hello"), Value::String("hello".to_string()));
        assert_eq!(Value::from(()), Value::Null);
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(Value::from(Some(42i32)), Value::I32(42));
        assert_eq!(Value::from(None::<i32>), Value::Null);
    }

    #[test]
    fn test_values_helper_keeps_order() {
        assert_eq!(
            values(["b", "a"]),
            vec![Value::from("b"), Value::from("a")]
        );
    }

    #[test]
    fn test_date_conversion() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(Value::from(date), Value::Date(date));
    }

    #[test]
    fn test_plain_json_scalars_decode() {
        let decoded: Vec<Value> = serde_json::from_str(r#"[null, true, 7, 1.5, "a"]"#).unwrap();
        assert_eq!(
            decoded,
            vec![
                Value::Null,
                Value::Bool(true),
                Value::I32(7),
                Value::F64(1.5),
                Value::String("a".into()),
            ]
        );
    }

    #[test]
    fn test_json_containers_decode_as_documents() {
        let decoded: Vec<Value> =
            serde_json::from_str(r#"[[1, 2], ["x"], {"k": 1}, []]"#).unwrap();
        assert_eq!(
            decoded,
            vec![
                Value::Json(serde_json::json!([1, 2])),
                Value::Json(serde_json::json!(["x"])),
                Value::Json(serde_json::json!({"k": 1})),
                Value::Json(serde_json::json!([])),
            ]
        );
    }

    #[test]
    fn test_date_text_stays_a_string() {
        let decoded: Value = serde_json::from_str(r#""2024-01-02""#).unwrap();
        assert_eq!(decoded, Value::String("2024-01-02".into()));
    }

    #[test]
    fn test_integer_width_follows_magnitude() {
        let decoded: Vec<Value> =
            serde_json::from_str("[-5, 3000000000, -3000000000, 18446744073709551615]").unwrap();
        assert_eq!(
            decoded,
            vec![
                Value::I32(-5),
                Value::I64(3_000_000_000),
                Value::I64(-3_000_000_000),
                Value::F64(18_446_744_073_709_551_615u64 as f64),
            ]
        );
    }

    #[test]
    fn test_is_null_and_as_str() {
        assert!(Value::Null.is_null());
        assert!(!Value::I32(42).is_null());
        assert_eq!(Value::from("x").as_str(), Some("x"));
        assert_eq!(Value::I64(1).as_str(), None);
    }
}
