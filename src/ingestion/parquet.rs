//! Parquet decoder.
//!
//! Notes:
//! - The container is read with the Parquet record API (`RowIter`); every leaf column becomes a
//!   field keyed by its column name
//! - Explicit nulls are kept as [`RawValue::Null`], so schema defaults apply to them
//! - Positions are 1-based row numbers; rows are never skipped

use std::path::Path;

use parquet::file::serialized_reader::SerializedFileReader;
use parquet::record::Field;

use crate::error::Position;
use crate::validation::{FieldMap, RawValue};

use super::decoder::{DecodeFailure, DecodedUnit, RecordDecoder, UnitStream};
use super::unified::LoadFormat;

/// Decoder for Apache Parquet files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParquetDecoder;

impl RecordDecoder for ParquetDecoder {
    fn format(&self) -> LoadFormat {
        LoadFormat::Parquet
    }

    fn extensions(&self) -> &[&'static str] {
        &[".parquet", ".pq"]
    }

    fn decode<'a>(&'a self, path: &Path) -> Result<UnitStream<'a>, DecodeFailure> {
        let reader = SerializedFileReader::try_from(path)?;

        let units = reader.into_iter().enumerate().map(|(idx0, row_res)| {
            let position = Position::Row(idx0 + 1);
            let row = row_res.map_err(|e| DecodeFailure::at(position, e))?;
            let fields: FieldMap = row
                .get_column_iter()
                .map(|(name, field)| (name.clone(), convert_parquet_field(field)))
                .collect();
            Ok(DecodedUnit { position, fields })
        });
        Ok(Box::new(units))
    }
}

fn convert_parquet_field(f: &Field) -> RawValue {
    match f {
        Field::Null => RawValue::Null,
        Field::Bool(b) => RawValue::Bool(*b),
        Field::Byte(v) => RawValue::Int(i64::from(*v)),
        Field::Short(v) => RawValue::Int(i64::from(*v)),
        Field::Int(v) => RawValue::Int(i64::from(*v)),
        Field::Long(v) => RawValue::Int(*v),
        Field::UByte(v) => RawValue::Int(i64::from(*v)),
        Field::UShort(v) => RawValue::Int(i64::from(*v)),
        Field::UInt(v) => RawValue::Int(i64::from(*v)),
        Field::ULong(v) => RawValue::UInt(*v),
        Field::Float(v) => RawValue::Float(f64::from(*v)),
        Field::Double(v) => RawValue::Float(*v),
        Field::Str(s) => RawValue::Text(s.clone()),
        // Dates, timestamps, decimals, bytes and nested groups keep their display form.
        other => RawValue::Text(other.to_string()),
    }
}
