//! JSON decoders.
//!
//! Supported inputs:
//! - A single JSON document whose top level is an object: [`JsonDecoder`]
//! - JSON Lines / NDJSON, one object per non-blank line: [`JsonLinesDecoder`]
//!
//! Nested objects are kept as JSON; schema fields can reach into them with dot paths
//! (e.g. `user.name`).

use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{DecodeError, Position};
use crate::validation::FieldMap;

use super::decoder::{DecodeFailure, DecodedUnit, RecordDecoder, UnitStream};
use super::unified::LoadFormat;

/// Decoder for a whole-file JSON object. Produces exactly one unit at [`Position::Document`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonDecoder;

impl JsonDecoder {
    /// Decode one document from an in-memory string.
    pub fn decode_str(&self, input: &str) -> Result<DecodedUnit, DecodeFailure> {
        let value: serde_json::Value =
            serde_json::from_str(input).map_err(|e| DecodeFailure::at(Position::Document, e))?;
        object_unit(value, Position::Document)
    }
}

impl RecordDecoder for JsonDecoder {
    fn format(&self) -> LoadFormat {
        LoadFormat::Json
    }

    fn extensions(&self) -> &[&'static str] {
        &[".json"]
    }

    fn decode<'a>(&'a self, path: &Path) -> Result<UnitStream<'a>, DecodeFailure> {
        let bytes = fs::read(path)?;
        let value: serde_json::Value =
            serde_json::from_slice(&bytes).map_err(|e| DecodeFailure::at(Position::Document, e))?;
        let unit = object_unit(value, Position::Document)?;
        Ok(Box::new(std::iter::once(Ok(unit))))
    }
}

/// Decoder for JSON Lines: one JSON object per line, blank lines skipped.
///
/// An empty file decodes to zero units. Positions are 1-based physical line numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonLinesDecoder;

impl JsonLinesDecoder {
    /// Decode units from any buffered reader.
    pub fn decode_reader<'a, R: BufRead + 'a>(&self, reader: R) -> UnitStream<'a> {
        let units = reader
            .lines()
            .enumerate()
            .filter_map(|(idx0, line)| {
                let position = Position::Line(idx0 + 1);
                let line = match line {
                    Ok(line) => line,
                    Err(e) => return Some(Err(DecodeFailure::at(position, e))),
                };
                let raw = line.trim();
                if raw.is_empty() {
                    return None;
                }
                Some(
                    serde_json::from_str::<serde_json::Value>(raw)
                        .map_err(|e| DecodeFailure::at(position, e))
                        .and_then(|value| object_unit(value, position)),
                )
            });
        Box::new(units)
    }
}

impl RecordDecoder for JsonLinesDecoder {
    fn format(&self) -> LoadFormat {
        LoadFormat::JsonLines
    }

    fn extensions(&self) -> &[&'static str] {
        &[".jsonl", ".ndjson"]
    }

    fn decode<'a>(&'a self, path: &Path) -> Result<UnitStream<'a>, DecodeFailure> {
        let file = File::open(path)?;
        Ok(self.decode_reader(BufReader::new(file)))
    }
}

fn object_unit(value: serde_json::Value, position: Position) -> Result<DecodedUnit, DecodeFailure> {
    match value {
        serde_json::Value::Object(map) => Ok(DecodedUnit {
            position,
            fields: FieldMap::from(map),
        }),
        other => Err(DecodeFailure::at(
            position,
            DecodeError::Shape(format!("expected a json object, found {}", kind_of(&other))),
        )),
    }
}

fn kind_of(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a bool",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::RawValue;

    #[test]
    fn json_lines_skip_blank_lines_and_keep_line_numbers() {
        let input = "{\"a\":1}\n\n   \n{\"a\":2}\n";
        let out: Vec<_> = JsonLinesDecoder
            .decode_reader(input.as_bytes())
            .map(|u| u.unwrap())
            .collect();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].position, Position::Line(1));
        assert_eq!(out[1].position, Position::Line(4));
        assert_eq!(out[1].fields.get("a"), Some(&RawValue::Int(2)));
    }

    #[test]
    fn json_lines_report_syntax_errors_with_line() {
        let input = "{\"a\":1}\n{not json}\n";
        let results: Vec<_> = JsonLinesDecoder.decode_reader(input.as_bytes()).collect();
        let err = results.into_iter().nth(1).unwrap().unwrap_err();
        assert_eq!(err.position, Some(Position::Line(2)));
        assert!(matches!(err.error, DecodeError::Json(_)));
    }

    #[test]
    fn non_object_documents_are_shape_errors() {
        let err = JsonDecoder.decode_str("[1, 2]").unwrap_err();
        assert!(matches!(err.error, DecodeError::Shape(_)));
        assert!(err.error.to_string().contains("found an array"));
    }

    #[test]
    fn document_is_a_single_unit() {
        let unit = JsonDecoder.decode_str(r#"{"name": "Example", "nested": {"k": "v"}}"#).unwrap();
        assert_eq!(unit.position, Position::Document);
        assert_eq!(unit.fields.len(), 2);
    }
}
