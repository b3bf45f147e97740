//! Delimited-text (CSV/TSV) decoder.
//!
//! Rules:
//!
//! - The file must have a header line; a file with no lines fails with "no headers found".
//! - Headers name the fields; column order does not matter and extra columns are carried along
//!   (the schema decides whether they are ignored).
//! - Rows shorter than the header simply lack the trailing fields; extra cells are dropped.
//! - Rows whose cells are all blank are skipped. Positions are physical line numbers, with the
//!   header on line 1.

use std::fs::File;
use std::path::Path;

use crate::error::{DecodeError, Position};
use crate::validation::{FieldMap, RawValue};

use super::decoder::{DecodeFailure, DecodedUnit, RecordDecoder, UnitStream};
use super::unified::LoadFormat;

/// Decoder for delimited text with a mandatory header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvDecoder {
    delimiter: u8,
}

impl Default for CsvDecoder {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvDecoder {
    /// Comma-separated decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tab-separated decoder.
    pub fn tsv() -> Self {
        Self { delimiter: b'\t' }
    }

    /// Use a custom single-byte delimiter.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Decode units from any reader. Used by [`RecordDecoder::decode`] and for in-memory input.
    pub fn decode_reader<'a, R: std::io::Read + 'a>(
        &self,
        reader: R,
    ) -> Result<UnitStream<'a>, DecodeFailure> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(self.delimiter)
            .from_reader(reader);

        let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_owned()).collect();
        if headers.is_empty() {
            return Err(DecodeError::NoHeader.into());
        }

        let units = rdr.into_records().enumerate().filter_map(move |(idx0, result)| {
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    let line = e.position().map(|p| p.line() as usize);
                    return Some(Err(DecodeFailure {
                        position: line.map(Position::Line),
                        error: e.into(),
                    }));
                }
            };
            // Header is line 1; fall back to counting records if the reader has no position.
            let line = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(idx0 + 2);

            let fields: FieldMap = headers
                .iter()
                .zip(record.iter())
                .map(|(h, cell)| (h.clone(), RawValue::from(cell)))
                .collect();
            if fields.is_blank() {
                return None;
            }
            Some(Ok(DecodedUnit {
                position: Position::Line(line),
                fields,
            }))
        });
        Ok(Box::new(units))
    }
}

impl RecordDecoder for CsvDecoder {
    fn format(&self) -> LoadFormat {
        if self.delimiter == b'\t' {
            LoadFormat::Tsv
        } else {
            LoadFormat::Csv
        }
    }

    fn extensions(&self) -> &[&'static str] {
        if self.delimiter == b'\t' {
            &[".tsv"]
        } else {
            &[".csv"]
        }
    }

    fn decode<'a>(&'a self, path: &Path) -> Result<UnitStream<'a>, DecodeFailure> {
        let file = File::open(path)?;
        self.decode_reader(file)
    }
}
