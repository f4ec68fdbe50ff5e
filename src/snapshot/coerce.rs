//! Value coercion for loosely typed extract columns
//!
//! Falsy source values (null, empty string, zero, false) mean "no value".
//! Anything else must parse, or the batch is rejected.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;

use crate::error::{Result, TombstoneError};

/// Truthiness of an extract column
pub fn is_falsy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Bool(b)) => !b,
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Object(map)) => map.is_empty(),
    }
}

/// Integer column, or `None` when falsy. Fractional numbers truncate.
pub fn coerce_int(field: &'static str, value: Option<&Value>) -> Result<Option<i64>> {
    if is_falsy(value) {
        return Ok(None);
    }
    let invalid = || TombstoneError::InvalidNumber {
        field,
        value: value.map(Value::to_string).unwrap_or_default(),
    };

    match value {
        Some(Value::Bool(true)) => Ok(Some(1)),
        Some(Value::Number(n)) => match n.as_i64() {
            Some(i) => Ok(Some(i)),
            None => n
                .as_f64()
                .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                .map(|f| Some(f.trunc() as i64))
                .ok_or_else(invalid),
        },
        Some(Value::String(s)) => s.trim().parse::<i64>().map(Some).map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}

/// Decimal column, or `None` when falsy
pub fn coerce_decimal(field: &'static str, value: Option<&Value>) -> Result<Option<Decimal>> {
    if is_falsy(value) {
        return Ok(None);
    }
    let text = match value {
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) => s.trim().to_string(),
        other => {
            return Err(TombstoneError::InvalidNumber {
                field,
                value: other.map(Value::to_string).unwrap_or_default(),
            })
        }
    };

    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map(Some)
        .map_err(|_| TombstoneError::InvalidNumber { field, value: text })
}

/// Normalized grouping key for an id column; `None` for null.
///
/// Integral floats collapse onto the integer form so `7` and `7.0` group
/// together. Text ids are trimmed, so `"7 "` joins them too.
pub fn group_key(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Some(i.to_string()),
            (None, Some(f)) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                Some((f as i64).to_string())
            }
            _ => Some(n.to_string()),
        },
        other => Some(other.to_string()),
    }
}

/// Trimmed text, or `None` when absent or whitespace-only
pub fn non_blank(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}
