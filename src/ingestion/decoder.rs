//! The record-decoder capability shared by every schema-validated format.
//!
//! A decoder turns one file into a stream of [`DecodedUnit`]s (a [`FieldMap`] plus its position).
//! Byte-level grammar is delegated to the format's library (`csv`, `serde_json`, `parquet`);
//! the generic [`super::loader::Loader`] handles path checks, validation and error wrapping.

use std::path::Path;

use crate::error::{DecodeError, Position};
use crate::validation::FieldMap;

use super::unified::LoadFormat;

/// One decoded unit of input: a CSV data row, a JSON Lines line, a Parquet row, a JSON document.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedUnit {
    pub position: Position,
    pub fields: FieldMap,
}

/// A decoder failure, with the position where it happened when the decoder knows it.
#[derive(Debug)]
pub struct DecodeFailure {
    pub position: Option<Position>,
    pub error: DecodeError,
}

impl DecodeFailure {
    /// Attach a position to a failure.
    pub fn at(position: Position, error: impl Into<DecodeError>) -> Self {
        Self {
            position: Some(position),
            error: error.into(),
        }
    }
}

impl From<DecodeError> for DecodeFailure {
    fn from(error: DecodeError) -> Self {
        Self {
            position: None,
            error,
        }
    }
}

macro_rules! decode_failure_from {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for DecodeFailure {
                fn from(e: $t) -> Self {
                    DecodeError::from(e).into()
                }
            }
        )*
    };
}

decode_failure_from!(
    std::io::Error,
    csv::Error,
    serde_json::Error,
    parquet::errors::ParquetError,
);

/// Stream of decoded units. The underlying file handle is released when the stream is dropped.
pub type UnitStream<'a> = Box<dyn Iterator<Item = Result<DecodedUnit, DecodeFailure>> + 'a>;

/// Per-format record decoder.
pub trait RecordDecoder: Send + Sync {
    /// The format this decoder reads (used for logging context).
    fn format(&self) -> LoadFormat;

    /// Extensions selected by default when loading a directory with this decoder.
    fn extensions(&self) -> &[&'static str];

    /// Open `path` and stream its units in file order.
    ///
    /// Opening failures (missing header, unreadable container) are returned directly; failures
    /// while streaming are yielded as `Err` items, after which the stream should be abandoned.
    fn decode<'a>(&'a self, path: &Path) -> Result<UnitStream<'a>, DecodeFailure>;
}
