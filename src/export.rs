//! Tabular export of loaded collections.
//!
//! [`LoadedCollection::to_table`] flattens every row value through its serde representation into
//! a neutral [`DataSet`]. With the `polars` feature, [`DataSet::to_polars`] converts that table into
//! a Polars `DataFrame`.

use indexmap::IndexMap;
use serde::Serialize;

use crate::collection::LoadedCollection;
use crate::error::ExportError;
use crate::types::{DataSet, DataType, Field, Schema, Value};
use crate::validation::{coerce_value, RawValue};

/// Name of the column added by `include_path_column`.
pub const PATH_COLUMN: &str = "path";

impl<T: Serialize> LoadedCollection<T> {
    /// Flatten the rows into a table, one table row per loaded row.
    ///
    /// - An empty collection gives a table with zero columns and zero rows.
    /// - Columns are the keys of the flattened rows. Schema fields that appear in some row come
    ///   first, in schema order and with the declared type; other keys follow in first-seen order.
    /// - Values that do not serialize to an object become a single `value` column.
    /// - With `include_path_column`, a `path` column holding each row's own source path is
    ///   appended (replacing any existing `path` column).
    pub fn to_table(&self, include_path_column: bool) -> Result<DataSet, ExportError> {
        if self.is_empty() {
            return Ok(DataSet::empty());
        }

        let mut flat: Vec<serde_json::Map<String, serde_json::Value>> = Vec::with_capacity(self.len());
        for (idx, row) in self.rows.iter().enumerate() {
            let value = serde_json::to_value(&row.value)
                .map_err(|source| ExportError::Flatten { row: idx, source })?;
            flat.push(match value {
                serde_json::Value::Object(map) => map,
                other => std::iter::once(("value".to_string(), other)).collect(),
            });
        }

        let mut columns: IndexMap<String, Option<DataType>> = IndexMap::new();
        if let Some(schema) = self.schema() {
            // Typed rows may drop or rename schema fields.
            for f in &schema.fields {
                if flat.iter().any(|m| m.contains_key(&f.name)) {
                    columns.insert(f.name.clone(), Some(f.data_type));
                }
            }
        }
        for map in &flat {
            for key in map.keys() {
                if !columns.contains_key(key) {
                    columns.insert(key.clone(), None);
                }
            }
        }
        if include_path_column {
            columns.shift_remove(PATH_COLUMN);
        }

        // Undeclared columns take the type of their first non-null value.
        let fields: Vec<Field> = columns
            .iter()
            .map(|(name, declared)| {
                let data_type = declared.unwrap_or_else(|| {
                    flat.iter()
                        .filter_map(|m| m.get(name))
                        .find_map(|v| infer_value(v).data_type())
                        .unwrap_or(DataType::Utf8)
                });
                Field::new(name.clone(), data_type)
            })
            .collect();

        let mut rows: Vec<Vec<Value>> = Vec::with_capacity(flat.len());
        for (map, loaded) in flat.iter().zip(&self.rows) {
            let mut out: Vec<Value> = fields
                .iter()
                .map(|f| match map.get(&f.name) {
                    None | Some(serde_json::Value::Null) => Value::Null,
                    Some(v) => typed_cell(v, f.data_type),
                })
                .collect();
            if include_path_column {
                out.push(Value::Utf8(loaded.path.to_string_lossy().into_owned()));
            }
            rows.push(out);
        }

        let mut fields = fields;
        if include_path_column {
            fields.push(Field::new(PATH_COLUMN, DataType::Utf8));
        }
        Ok(DataSet::new(Schema::new(fields), rows))
    }
}

fn typed_cell(v: &serde_json::Value, data_type: DataType) -> Value {
    coerce_value(&RawValue::from(v.clone()), data_type).unwrap_or_else(|_| infer_value(v))
}

fn infer_value(v: &serde_json::Value) -> Value {
    match v {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Int64(i),
            None => n.as_f64().map(Value::Float64).unwrap_or(Value::Null),
        },
        serde_json::Value::String(s) => Value::Utf8(s.clone()),
        other => Value::Json(other.clone()),
    }
}

#[cfg(feature = "polars")]
impl DataSet {
    /// Convert into a Polars `DataFrame`. Cells whose type does not match the column type
    /// become nulls; `Json` columns are stored as serialized strings.
    pub fn to_polars(&self) -> Result<polars::prelude::DataFrame, ExportError> {
        use polars::prelude::{Column, DataFrame, NamedFrom, PlSmallStr, Series};

        let mut columns: Vec<Series> = Vec::with_capacity(self.column_count());
        for (idx, field) in self.schema.fields.iter().enumerate() {
            let cells = self.rows.iter().map(|r| r.get(idx).unwrap_or(&Value::Null));
            let name = PlSmallStr::from(field.name.as_str());
            let series = match field.data_type {
                DataType::Int64 => Series::new(
                    name,
                    cells
                        .map(|v| match v {
                            Value::Int64(i) => Some(*i),
                            _ => None,
                        })
                        .collect::<Vec<Option<i64>>>(),
                ),
                DataType::Float64 => Series::new(
                    name,
                    cells
                        .map(|v| match v {
                            Value::Float64(x) => Some(*x),
                            Value::Int64(i) => Some(*i as f64),
                            _ => None,
                        })
                        .collect::<Vec<Option<f64>>>(),
                ),
                DataType::Bool => Series::new(
                    name,
                    cells
                        .map(|v| match v {
                            Value::Bool(b) => Some(*b),
                            _ => None,
                        })
                        .collect::<Vec<Option<bool>>>(),
                ),
                DataType::Utf8 | DataType::Json => Series::new(
                    name,
                    cells
                        .map(|v| match v {
                            Value::Null => None,
                            Value::Utf8(s) => Some(s.clone()),
                            other => Some(other.to_json().to_string()),
                        })
                        .collect::<Vec<Option<String>>>(),
                ),
            };
            columns.push(series);
        }

        let mut iter = columns.into_iter();
        let Some(first) = iter.next() else {
            return Ok(DataFrame::default());
        };
        let rest: Vec<Column> = iter.map(Column::from).collect();
        Ok(first.into_frame().hstack(&rest)?)
    }
}
