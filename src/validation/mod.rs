//! Schema validation: turns one decoded [`FieldMap`] into a typed [`Record`].
//!
//! The rules are driven entirely by the [`Schema`] data, so every format shares them:
//!
//! - input keys not named by the schema are dropped ([`UnknownFields::Ignore`]) or reported
//!   ([`UnknownFields::Reject`])
//! - a missing field takes its default; without one it is reported as missing
//! - an empty value (null, or blank text) takes the default; otherwise a `Utf8` field keeps the
//!   text as-is, a nullable field becomes [`Value::Null`], and anything else is reported
//! - any other value is coerced into the field type, and a failed coercion is reported with the
//!   raw value and target type
//!
//! All issues of one unit are collected into a single [`ValidationError`].

mod coerce;
mod record;

use serde::de::DeserializeOwned;

use crate::error::{FieldIssue, IssueReason, ValidationError};
use crate::types::{DataType, Schema, UnknownFields, Value};

pub use record::{FieldMap, RawValue, Record};

pub(crate) use coerce::coerce as coerce_value;

/// Validate `fields` against `schema`.
pub fn validate(fields: &FieldMap, schema: &Schema) -> Result<Record, ValidationError> {
    let mut issues = Vec::new();
    let mut record = Record::with_capacity(schema.fields.len());

    for field in &schema.fields {
        let raw = fields.lookup(&field.name);
        let outcome = match raw {
            None => field.default.clone().ok_or(IssueReason::Missing),
            Some(raw) if raw.is_empty() => match (&field.default, &raw) {
                (Some(default), _) => Ok(default.clone()),
                (None, RawValue::Text(s)) if field.data_type == DataType::Utf8 => {
                    Ok(Value::Utf8(s.clone()))
                }
                (None, _) if field.nullable => Ok(Value::Null),
                (None, _) => Err(IssueReason::Null),
            },
            Some(raw) => coerce::coerce(&raw, field.data_type).map_err(|message| {
                IssueReason::InvalidType {
                    raw: raw.render(),
                    expected: field.data_type,
                    message,
                }
            }),
        };

        match outcome {
            Ok(value) => record.push(&field.name, value),
            Err(reason) => issues.push(FieldIssue {
                field: field.name.clone(),
                reason,
            }),
        }
    }

    if schema.unknown_fields == UnknownFields::Reject {
        for key in fields.keys() {
            if !is_declared(schema, key) {
                issues.push(FieldIssue {
                    field: key.to_owned(),
                    reason: IssueReason::Unknown,
                });
            }
        }
    }

    if issues.is_empty() {
        Ok(record)
    } else {
        Err(ValidationError::new(issues))
    }
}

// A top-level key is declared if a field names it directly or as the head of a dot path.
fn is_declared(schema: &Schema, key: &str) -> bool {
    schema.fields.iter().any(|f| {
        f.name == key
            || f
                .name
                .strip_prefix(key)
                .is_some_and(|rest| rest.starts_with('.'))
    })
}

/// Convert a validated record into a caller type through its serde representation.
///
/// Deserialization failures are reported as [`IssueReason::Conversion`] against the field serde
/// names when it can, or `<record>` otherwise.
pub fn deserialize_record<T: DeserializeOwned>(record: Record) -> Result<T, ValidationError> {
    serde_json::from_value(record.into_json()).map_err(|e| {
        let message = e.to_string();
        let field = field_from_serde_message(&message).unwrap_or("<record>").to_owned();
        ValidationError::single(field, IssueReason::Conversion(message))
    })
}

// serde reports missing/unknown fields as "missing field `name`" / "unknown field `name`".
fn field_from_serde_message(message: &str) -> Option<&str> {
    let start = message.find('`')? + 1;
    let len = message[start..].find('`')?;
    Some(&message[start..start + len])
}
