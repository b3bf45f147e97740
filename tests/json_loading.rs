use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use schema_loader::error::{DecodeError, IssueReason, LoadErrorKind, Position};
use schema_loader::ingestion::Loader;
use schema_loader::types::{DataType, Field, Schema, Value};

fn tmp_file(name: &str, ext: &str, contents: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let path = std::env::temp_dir().join(format!("schema-loader-{name}-{nanos}.{ext}"));
    std::fs::write(&path, contents).unwrap();
    path
}

fn people_schema() -> Schema {
    Schema::new(vec![
        Field::new("name", DataType::Utf8),
        Field::new("age", DataType::Int64),
    ])
}

#[test]
fn load_json_document_with_nested_fields() {
    let schema = Schema::new(vec![
        Field::new("name", DataType::Utf8),
        Field::new("age", DataType::Int64),
        Field::new("address.city", DataType::Utf8),
        Field::new("address", DataType::Json),
    ]);
    let rows = Loader::json(schema).load("tests/fixtures/person.json").unwrap();

    assert_eq!(rows.len(), 1);
    let person = &rows.rows[0].value;
    assert_eq!(person.get("age"), Some(&Value::Int64(42)));
    assert_eq!(person.get("address.city"), Some(&Value::Utf8("Osaka".to_string())));
    assert_eq!(
        person.get("address"),
        Some(&Value::Json(
            serde_json::json!({"city": "Osaka", "zip": "530-0001"})
        ))
    );
}

#[test]
fn json_document_must_be_an_object() {
    let path = tmp_file("array", "json", r#"[{"name": "A", "age": 1}]"#);
    let err = Loader::json(people_schema()).load(&path).unwrap_err();
    assert_eq!(err.kind(), LoadErrorKind::Decode);
    assert_eq!(err.position(), Some(Position::Document));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn malformed_json_is_a_decode_error_with_source() {
    let path = tmp_file("broken", "json", r#"{"name": "A", "age": "#);
    let err = Loader::json(people_schema()).load(&path).unwrap_err();
    assert_eq!(err.kind(), LoadErrorKind::Decode);

    let source = std::error::Error::source(&err).unwrap();
    assert!(matches!(
        source.downcast_ref::<DecodeError>(),
        Some(DecodeError::Json(_))
    ));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn json_document_validation_reports_document_position() {
    let path = tmp_file("doc-missing", "json", r#"{"name": "A"}"#);
    let err = Loader::json(people_schema()).load(&path).unwrap_err();
    assert_eq!(err.kind(), LoadErrorKind::Validation);
    assert!(err.to_string().contains("at document"));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn load_json_lines_happy_path() {
    let rows = Loader::json_lines(people_schema())
        .load("tests/fixtures/people.jsonl")
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows.rows[1].value.get("name"), Some(&Value::Utf8("Bob".to_string())));
    // `tags` is not in the schema.
    assert_eq!(rows.rows[1].value.len(), 2);
}

#[test]
fn json_lines_missing_field_reports_line_and_field() {
    let path = tmp_file("missing-age", "jsonl", "{\"name\": \"A\"}\n");
    let err = Loader::json_lines(people_schema()).load(&path).unwrap_err();

    assert_eq!(err.kind(), LoadErrorKind::Validation);
    assert_eq!(err.position(), Some(Position::Line(1)));
    let detail = err.validation().unwrap();
    assert_eq!(detail.fields().collect::<Vec<_>>(), vec!["age"]);
    assert_eq!(detail.issues[0].reason, IssueReason::Missing);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn empty_json_lines_file_loads_zero_rows() {
    let path = tmp_file("empty", "jsonl", "");
    let rows = Loader::json_lines(people_schema()).load(&path).unwrap();
    assert!(rows.is_empty());
    let _ = std::fs::remove_file(&path);
}

#[test]
fn json_lines_blank_lines_are_skipped() {
    let path = tmp_file(
        "blank-lines",
        "jsonl",
        "{\"name\": \"A\", \"age\": 1}\n\n   \n{\"name\": \"B\", \"age\": \"two\"}\n",
    );
    let err = Loader::json_lines(people_schema()).load(&path).unwrap_err();
    assert_eq!(err.position(), Some(Position::Line(4)));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn json_lines_syntax_error_reports_line() {
    let path = tmp_file("syntax", "ndjson", "{\"name\": \"A\", \"age\": 1}\n{oops}\n");
    let err = Loader::json_lines(people_schema()).load(&path).unwrap_err();
    assert_eq!(err.kind(), LoadErrorKind::Decode);
    assert_eq!(err.position(), Some(Position::Line(2)));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn json_null_takes_default_or_null() {
    let schema = Schema::new(vec![
        Field::new("name", DataType::Utf8),
        Field::new("age", DataType::Int64).with_default(18_i64),
        Field::new("score", DataType::Float64).nullable(),
        Field::new("active", DataType::Bool),
    ]);
    let path = tmp_file(
        "nulls",
        "jsonl",
        "{\"name\": \"A\", \"age\": null, \"score\": null, \"active\": true}\n",
    );
    let rows = Loader::json_lines(schema).load(&path).unwrap();
    let row = &rows.rows[0].value;
    assert_eq!(row.get("age"), Some(&Value::Int64(18)));
    assert_eq!(row.get("score"), Some(&Value::Null));
    assert_eq!(row.get("active"), Some(&Value::Bool(true)));
    let _ = std::fs::remove_file(&path);
}
