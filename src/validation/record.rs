//! Loosely-typed decoder output ([`RawValue`], [`FieldMap`]) and validated [`Record`]s.

use indexmap::IndexMap;
use serde::Serialize;

use crate::types::Value;

/// An untyped value as produced by a record decoder.
///
/// Text formats produce [`RawValue::Text`]; JSON and Parquet keep the scalar type they carry.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// Explicit null (JSON `null`, Parquet null).
    Null,
    /// Boolean.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Unsigned integer too large for `i64` or from an unsigned column.
    UInt(u64),
    /// Floating point number.
    Float(f64),
    /// Text, untrimmed.
    Text(String),
    /// Nested JSON (objects and arrays).
    Json(serde_json::Value),
}

impl RawValue {
    /// `true` for null and for text that is blank after trimming.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Render the raw input for error messages.
    pub fn render(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::Bool(v) => v.to_string(),
            Self::Int(v) => v.to_string(),
            Self::UInt(v) => v.to_string(),
            Self::Float(v) => v.to_string(),
            Self::Text(s) => s.clone(),
            Self::Json(v) => v.to_string(),
        }
    }

    /// Convert into a JSON value.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(v) => serde_json::Value::Bool(*v),
            Self::Int(v) => serde_json::Value::from(*v),
            Self::UInt(v) => serde_json::Value::from(*v),
            Self::Float(v) => serde_json::Number::from_f64(*v)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Self::Text(s) => serde_json::Value::String(s.clone()),
            Self::Json(v) => v.clone(),
        }
    }
}

impl From<serde_json::Value> for RawValue {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Self::UInt(u)
                } else {
                    n.as_f64().map(Self::Float).unwrap_or(Self::Null)
                }
            }
            serde_json::Value::String(s) => Self::Text(s),
            other => Self::Json(other),
        }
    }
}

impl From<&str> for RawValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

/// Ordered, string-keyed map of raw values: one decoded unit (row, line, document).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap {
    entries: IndexMap<String, RawValue>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value. Returns the previous value for `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: RawValue) -> Option<RawValue> {
        self.entries.insert(key.into(), value)
    }

    /// Exact key lookup.
    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.entries.get(key)
    }

    /// Look a field up by name.
    ///
    /// Tries the exact key first, then treats dots as a path into nested JSON objects
    /// (`user.name` reads `name` inside the `user` object).
    pub fn lookup(&self, name: &str) -> Option<RawValue> {
        if let Some(v) = self.entries.get(name) {
            return Some(v.clone());
        }
        if !name.contains('.') {
            return None;
        }

        let mut segments = name.split('.');
        let head = segments.next()?;
        let mut current = match self.entries.get(head)? {
            RawValue::Json(v) => v,
            _ => return None,
        };
        for segment in segments {
            match current {
                serde_json::Value::Object(map) => current = map.get(segment)?,
                _ => return None,
            }
        }
        Some(RawValue::from(current.clone()))
    }

    /// Top-level keys in input order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `true` when every value is empty (see [`RawValue::is_empty`]).
    pub fn is_blank(&self) -> bool {
        self.entries.values().all(RawValue::is_empty)
    }
}

impl<K: Into<String>> FromIterator<(K, RawValue)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (K, RawValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for FieldMap {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        map.into_iter().map(|(k, v)| (k, RawValue::from(v))).collect()
    }
}

/// A validated record: one typed value per schema field, in schema declaration order.
///
/// Serializes as a JSON-like map from field name to value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record {
    values: IndexMap<String, Value>,
}

impl Record {
    pub(crate) fn with_capacity(n: usize) -> Self {
        Self {
            values: IndexMap::with_capacity(n),
        }
    }

    pub(crate) fn push(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_owned(), value);
    }

    /// Value of a field, if the schema declares it.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Field/value pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Convert into a JSON object keyed by field name.
    pub fn into_json(self) -> serde_json::Value {
        serde_json::Value::Object(
            self.values
                .into_iter()
                .map(|(k, v)| (k, v.to_json()))
                .collect(),
        )
    }
}
