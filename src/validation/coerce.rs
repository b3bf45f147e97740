//! Coercion of non-empty [`RawValue`]s into typed [`Value`]s.
//!
//! One set of rules serves every format: text is parsed, numbers are range/fraction checked,
//! nothing is silently truncated.

use crate::types::{DataType, Value};

use super::record::RawValue;

/// Coerce `raw` into `data_type`. On failure, returns a human-readable reason.
///
/// Callers handle empty input (null, blank text) before calling this.
pub(crate) fn coerce(raw: &RawValue, data_type: DataType) -> Result<Value, String> {
    match data_type {
        DataType::Int64 => to_int(raw).map(Value::Int64),
        DataType::Float64 => to_float(raw).map(Value::Float64),
        DataType::Bool => to_bool(raw).map(Value::Bool),
        DataType::Utf8 => match raw {
            RawValue::Text(s) => Ok(Value::Utf8(s.clone())),
            _ => Err("expected string".to_string()),
        },
        DataType::Json => Ok(Value::Json(match raw {
            RawValue::Text(s) => serde_json::Value::String(s.clone()),
            other => other.to_json(),
        })),
    }
}

fn to_int(raw: &RawValue) -> Result<i64, String> {
    match raw {
        RawValue::Int(v) => Ok(*v),
        RawValue::UInt(v) => i64::try_from(*v).map_err(|_| "u64 out of range for i64".to_string()),
        RawValue::Float(v) => {
            if v.fract() == 0.0 && *v >= i64::MIN as f64 && *v < i64::MAX as f64 {
                Ok(*v as i64)
            } else {
                Err("expected integer, got fractional or out-of-range number".to_string())
            }
        }
        RawValue::Text(s) => s.trim().parse::<i64>().map_err(|e| e.to_string()),
        _ => Err("expected integer".to_string()),
    }
}

fn to_float(raw: &RawValue) -> Result<f64, String> {
    match raw {
        RawValue::Int(v) => Ok(*v as f64),
        RawValue::UInt(v) => Ok(*v as f64),
        RawValue::Float(v) => Ok(*v),
        RawValue::Text(s) => s.trim().parse::<f64>().map_err(|e| e.to_string()),
        _ => Err("expected number".to_string()),
    }
}

fn to_bool(raw: &RawValue) -> Result<bool, String> {
    match raw {
        RawValue::Bool(b) => Ok(*b),
        RawValue::Int(0) | RawValue::UInt(0) => Ok(false),
        RawValue::Int(1) | RawValue::UInt(1) => Ok(true),
        RawValue::Text(s) => parse_bool(s.trim()),
        _ => Err("expected bool".to_string()),
    }
}

fn parse_bool(s: &str) -> Result<bool, String> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" | "y" => Ok(true),
        "false" | "f" | "0" | "no" | "n" => Ok(false),
        _ => Err("expected bool (true/false/1/0/yes/no)".to_string()),
    }
}
