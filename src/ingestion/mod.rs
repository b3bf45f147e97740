//! Loaders and their building blocks.
//!
//! Most callers should use [`load_from_path`] (from [`unified`]) or build a [`Loader`] directly:
//!
//! - [`Loader`] validates one file against a [`crate::types::Schema`] using a per-format
//!   [`RecordDecoder`]
//! - [`DirectoryLoader`] applies any [`FileLoader`] to every matching file of a directory
//! - [`TextLoader`] and `ImageLoader` (feature `image`) load files that are not schema-validated
//! - an optional [`LoadObserver`] receives success/failure/alert callbacks
//!
//! Format-specific decoders live under:
//! - [`csv`]
//! - [`json`]
//! - [`parquet`]

pub mod csv;
pub mod decoder;
pub mod directory;
#[cfg(feature = "image")]
pub mod image;
pub mod json;
pub mod loader;
pub mod observability;
pub mod parquet;
pub mod text;
pub mod unified;

pub use csv::CsvDecoder;
pub use decoder::{DecodeFailure, DecodedUnit, RecordDecoder, UnitStream};
pub use directory::{Aggregation, DirectoryLoader};
#[cfg(feature = "image")]
pub use image::{ImageLoader, LoadedImage};
pub use json::{JsonDecoder, JsonLinesDecoder};
pub use loader::{FileLoader, Loader};
pub use observability::{
    severity_for_error, CompositeObserver, FileObserver, LoadContext, LoadObserver, LoadSeverity,
    LoadStats, StdErrObserver, TracingObserver,
};
pub use parquet::ParquetDecoder;
pub use text::TextLoader;
pub use unified::{load_from_path, LoadFormat, LoadOptions};
