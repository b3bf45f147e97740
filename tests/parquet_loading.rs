use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use parquet::column::writer::ColumnWriter;
use parquet::data_type::ByteArray;
use parquet::file::properties::WriterProperties;
use parquet::file::writer::SerializedFileWriter;
use parquet::schema::parser::parse_message_type;

use schema_loader::error::{LoadErrorKind, Position};
use schema_loader::ingestion::{load_from_path, LoadOptions, Loader};
use schema_loader::types::{DataType, Field, Schema, Value};

fn tmp_file(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("schema-loader-{name}-{nanos}.parquet"))
}

fn people_schema() -> Schema {
    Schema::new(vec![
        Field::new("name", DataType::Utf8),
        Field::new("age", DataType::Int64),
        Field::new("score", DataType::Float64),
    ])
}

/// Two rows: (Ada, 36, 98.5) and (Grace, null, 87.25). `age` is OPTIONAL.
fn write_people_parquet(path: &Path) {
    let schema_str = r#"
    message schema {
      REQUIRED BINARY name (UTF8);
      OPTIONAL INT64 age;
      REQUIRED DOUBLE score;
    }
    "#;

    let schema = Arc::new(parse_message_type(schema_str).unwrap());
    let props = Arc::new(WriterProperties::builder().build());
    let file = File::create(path).unwrap();
    let mut writer = SerializedFileWriter::new(file, schema, props).unwrap();

    let mut rg = writer.next_row_group().unwrap();
    while let Some(mut col) = rg.next_column().unwrap() {
        match col.untyped() {
            ColumnWriter::ByteArrayColumnWriter(w) => {
                let names = [ByteArray::from("Ada"), ByteArray::from("Grace")];
                w.write_batch(&names, None, None).unwrap();
            }
            ColumnWriter::Int64ColumnWriter(w) => {
                // Definition level 0 marks the null in the second row.
                w.write_batch(&[36_i64], Some(&[1, 0]), None).unwrap();
            }
            ColumnWriter::DoubleColumnWriter(w) => {
                w.write_batch(&[98.5_f64, 87.25_f64], None, None).unwrap();
            }
            _ => panic!("unexpected column writer in test"),
        }
        col.close().unwrap();
    }
    rg.close().unwrap();
    writer.close().unwrap();
}

/// One row whose `age` is text.
fn write_text_age_parquet(path: &Path) {
    let schema_str = r#"
    message schema {
      REQUIRED BINARY name (UTF8);
      REQUIRED BINARY age (UTF8);
      REQUIRED DOUBLE score;
    }
    "#;

    let schema = Arc::new(parse_message_type(schema_str).unwrap());
    let props = Arc::new(WriterProperties::builder().build());
    let file = File::create(path).unwrap();
    let mut writer = SerializedFileWriter::new(file, schema, props).unwrap();

    let mut rg = writer.next_row_group().unwrap();
    let mut col_idx: usize = 0;
    while let Some(mut col) = rg.next_column().unwrap() {
        match col.untyped() {
            ColumnWriter::ByteArrayColumnWriter(w) => {
                let value = if col_idx == 0 { "Ada" } else { "thirty-six" };
                w.write_batch(&[ByteArray::from(value)], None, None).unwrap();
            }
            ColumnWriter::DoubleColumnWriter(w) => {
                w.write_batch(&[98.5_f64], None, None).unwrap();
            }
            _ => panic!("unexpected column writer in test"),
        }
        col.close().unwrap();
        col_idx += 1;
    }
    rg.close().unwrap();
    writer.close().unwrap();
}

#[test]
fn load_parquet_with_null_taking_default() {
    let schema = Schema::new(vec![
        Field::new("name", DataType::Utf8),
        Field::new("age", DataType::Int64).with_default(-1_i64),
        Field::new("score", DataType::Float64),
    ]);
    let path = tmp_file("people");
    write_people_parquet(&path);

    let rows = Loader::parquet(schema).load(&path).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows.rows[0].value.get("name"), Some(&Value::Utf8("Ada".to_string())));
    assert_eq!(rows.rows[0].value.get("age"), Some(&Value::Int64(36)));
    assert_eq!(rows.rows[1].value.get("age"), Some(&Value::Int64(-1)));
    assert_eq!(rows.rows[1].value.get("score"), Some(&Value::Float64(87.25)));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn parquet_null_without_default_is_reported_at_its_row() {
    let path = tmp_file("null-age");
    write_people_parquet(&path);

    let err = Loader::parquet(people_schema()).load(&path).unwrap_err();
    assert_eq!(err.kind(), LoadErrorKind::Validation);
    assert_eq!(err.position(), Some(Position::Row(2)));
    assert_eq!(err.validation().unwrap().fields().collect::<Vec<_>>(), vec!["age"]);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn parquet_type_mismatch_names_field() {
    let path = tmp_file("text-age");
    write_text_age_parquet(&path);

    let err = Loader::parquet(people_schema()).load(&path).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("row 1"));
    assert!(msg.contains("field 'age'"));
    assert!(msg.contains("thirty-six"));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn parquet_is_inferred_from_extension_and_exported() {
    let schema = Schema::new(vec![
        Field::new("name", DataType::Utf8),
        Field::new("age", DataType::Int64).nullable(),
    ]);
    let path = tmp_file("export");
    write_people_parquet(&path);

    let rows = load_from_path(&path, &schema, &LoadOptions::default()).unwrap();
    let table = rows.to_table(true).unwrap();
    assert_eq!(table.column_names(), vec!["name", "age", "path"]);
    assert_eq!(
        table.column("age"),
        Some(vec![&Value::Int64(36), &Value::Null])
    );
    let expected = Value::Utf8(path.to_string_lossy().into_owned());
    assert!(table.column("path").unwrap().iter().all(|v| **v == expected));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn corrupt_parquet_is_a_decode_error() {
    let path = tmp_file("corrupt");
    std::fs::write(&path, b"not a parquet file").unwrap();

    let err = Loader::parquet(people_schema()).load(&path).unwrap_err();
    assert_eq!(err.kind(), LoadErrorKind::Decode);

    let _ = std::fs::remove_file(&path);
}
