//! `schema-loader` loads common file formats into typed, in-memory collections, validating every
//! row against a user-provided [`types::Schema`].
//!
//! The primary entrypoint is [`ingestion::load_from_path`], which can auto-detect the format from
//! the file extension (or you can force a format via [`ingestion::LoadOptions`]). For finer
//! control, build an [`ingestion::Loader`] for one format and, for directories, wrap it in an
//! [`ingestion::DirectoryLoader`].
//!
//! ## What you can load
//!
//! **Schema-validated formats (auto-detected by extension):**
//!
//! - **CSV / TSV**: `.csv`, `.tsv` (a header row is mandatory)
//! - **JSON**: `.json` (one object per file)
//! - **JSON Lines**: `.jsonl`, `.ndjson` (one object per non-blank line)
//! - **Parquet**: `.parquet`, `.pq`
//!
//! **Unvalidated files:** plain text ([`ingestion::TextLoader`]) and, with the default `image`
//! feature, raster images (`ingestion::ImageLoader`).
//!
//! **Schema + value types:**
//!
//! Every loaded row is a [`validation::Record`] of typed [`types::Value`]s following the schema's
//! field order (or your own `serde` type via [`ingestion::Loader::typed`]). Supported logical
//! types are:
//!
//! - [`types::DataType::Int64`]
//! - [`types::DataType::Float64`]
//! - [`types::DataType::Bool`]
//! - [`types::DataType::Utf8`]
//! - [`types::DataType::Json`] (any JSON value, kept as-is)
//!
//! Missing or empty values take the field's default; extra input fields are ignored unless the
//! schema rejects them. A file loads completely or fails with a [`LoadingError`] naming the file,
//! the line/row, and the offending fields.
//!
//! ## Quick examples: load data
//!
//! ```no_run
//! use schema_loader::ingestion::{load_from_path, LoadOptions};
//! use schema_loader::types::{DataType, Field, Schema};
//!
//! # fn main() -> Result<(), schema_loader::LoadingError> {
//! let schema = Schema::new(vec![
//!     Field::new("name", DataType::Utf8),
//!     Field::new("age", DataType::Int64),
//! ]);
//! // Auto-detects by extension (.csv/.tsv/.json/.jsonl/.parquet).
//! let rows = load_from_path("people.csv", &schema, &LoadOptions::default())?;
//! println!("rows={}", rows.len());
//! # Ok(())
//! # }
//! ```
//!
//! Rows can be deserialized straight into your own types:
//!
//! ```no_run
//! use serde::Deserialize;
//!
//! use schema_loader::ingestion::Loader;
//! use schema_loader::types::{DataType, Field, Schema};
//!
//! #[derive(Debug, Deserialize)]
//! struct Person {
//!     name: String,
//!     age: i64,
//! }
//!
//! # fn main() -> Result<(), schema_loader::LoadingError> {
//! let schema = Schema::new(vec![
//!     Field::new("name", DataType::Utf8),
//!     Field::new("age", DataType::Int64).with_default(0_i64),
//! ]);
//! let people = Loader::json_lines(schema).typed::<Person>().load("people.jsonl")?;
//! for person in people.values() {
//!     println!("{person:?}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Tabular export
//!
//! [`collection::LoadedCollection::to_table`] flattens any collection into a neutral
//! [`types::DataSet`], optionally with a `path` column holding each row's source file. With the
//! `polars` feature, `DataSet::to_polars` converts it into a Polars `DataFrame`.
//!
//! ```no_run
//! use schema_loader::ingestion::{load_from_path, LoadOptions};
//! use schema_loader::types::{DataType, Field, Schema};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let schema = Schema::new(vec![Field::new("id", DataType::Int64)]);
//! let rows = load_from_path("items.parquet", &schema, &LoadOptions::default())?;
//! let table = rows.to_table(true)?;
//! assert_eq!(table.column_names(), vec!["id", "path"]);
//! # Ok(())
//! # }
//! ```

pub mod collection;
pub mod error;
pub mod export;
pub mod ingestion;
pub mod resolver;
pub mod types;
pub mod validation;

pub use collection::{LoadedCollection, LoadedRow};
pub use error::{LoadResult, LoadingError};
