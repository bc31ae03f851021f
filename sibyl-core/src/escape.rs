//! Literal escaping

use std::fmt::Write;

use crate::{AttributeDefinition, SemanticType, Value};

/// Literal written for null and missing values
pub const NULL_LITERAL: &str = "NULL";

const TRUE_LITERAL: &str = "1";
const FALSE_LITERAL: &str = "0";

/// Quote a string literal, doubling embedded single quotes.
///
/// # Examples
/// ```
/// use sibyl_core::escape::escape_string;
///
/// assert_eq!(escape_string("O'Brien"), "'O''Brien'");
/// ```
pub fn escape_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 2);
    escaped.push('\'');
    for ch in value.chars() {
        if ch == '\'' {
            escaped.push('\'');
        }
        escaped.push(ch);
    }
    escaped.push('\'');
    escaped
}

/// Render a value as literal text.
///
/// The optional attribute describes the column the value is written to; a
/// boolean column turns the strings `true`/`false` into `1`/`0`.
pub fn escape(value: &Value, hint: Option<&AttributeDefinition>) -> String {
    if let Some(hint) = hint {
        if hint.semantic_type() == SemanticType::Boolean {
            if let Some(flag) = boolean_text(value) {
                return escape_bool(flag).to_string();
            }
        }
    }

    match value {
        Value::Null => NULL_LITERAL.to_string(),
        Value::Bool(flag) => escape_bool(*flag).to_string(),
        Value::I32(n) => n.to_string(),
        Value::I64(n) => n.to_string(),
        Value::F32(n) => escape_float(f64::from(*n), n.to_string()),
        Value::F64(n) => escape_float(*n, n.to_string()),
        Value::String(s) => escape_string(s),
        Value::Bytes(bytes) => escape_bytes(bytes),
        Value::Json(json) => escape_string(&json.to_string()),
        Value::Date(date) => format!("DATE '{}'", date.format("%Y-%m-%d")),
        Value::DateTime(instant) => format!(
            "TO_TIMESTAMP_TZ('{} +00:00', 'YYYY-MM-DD HH24:MI:SS.FF3 TZH:TZM')",
            instant.format("%Y-%m-%d %H:%M:%S%.3f")
        ),
        #[cfg(feature = "decimal-support")]
        Value::Decimal(d) => d.to_string(),
        #[cfg(feature = "uuid-support")]
        Value::Uuid(id) => escape_string(&id.hyphenated().to_string()),
    }
}

/// Render a row slot that may be absent; an absent slot is `NULL`
pub fn escape_slot(value: Option<&Value>, hint: Option<&AttributeDefinition>) -> String {
    match value {
        Some(value) => escape(value, hint),
        None => NULL_LITERAL.to_string(),
    }
}

/// The dialect has no boolean literal
pub fn escape_bool(flag: bool) -> &'static str {
    if flag {
        TRUE_LITERAL
    } else {
        FALSE_LITERAL
    }
}

/// Boolean meaning of a value, if it is a boolean or its textual form
pub(crate) fn boolean_text(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::String(s) if s == "true" => Some(true),
        Value::String(s) if s == "false" => Some(false),
        _ => None,
    }
}

fn escape_float(value: f64, text: String) -> String {
    if value.is_nan() {
        "BINARY_DOUBLE_NAN".to_string()
    } else if value.is_infinite() && value > 0.0 {
        "BINARY_DOUBLE_INFINITY".to_string()
    } else if value.is_infinite() {
        "-BINARY_DOUBLE_INFINITY".to_string()
    } else {
        text
    }
}

fn escape_bytes(bytes: &[u8]) -> String {
    let mut hex = String::with_capacity(bytes.len() * 2 + 13);
    hex.push_str("HEXTORAW('");
    for byte in bytes {
        let _ = write!(hex, "{:02x}", byte);
    }
    hex.push_str("')");
    hex
}
