//! Generic single-file loader.
//!
//! [`Loader`] runs the same pipeline for every schema-validated format:
//!
//! 1. resolve the path as a file
//! 2. open it with the format's [`RecordDecoder`]
//! 3. validate each decoded unit against the [`Schema`] and convert it to the output type
//! 4. stop at the first failure; a file loads completely or not at all
//!
//! Decoder and validation failures are wrapped into a [`LoadingError`] carrying the file path and,
//! where known, the line/row position.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::collection::{LoadedCollection, LoadedRow};
use crate::error::{DecodeError, LoadResult, LoadingError, ValidationError};
use crate::resolver::resolve_file;
use crate::types::Schema;
use crate::validation::{deserialize_record, validate, Record};

use super::csv::CsvDecoder;
use super::decoder::{DecodeFailure, RecordDecoder};
use super::json::{JsonDecoder, JsonLinesDecoder};
use super::observability::{LoadContext, LoadObserver, LoadSeverity, Reporter};
use super::parquet::ParquetDecoder;
use super::unified::LoadFormat;

/// Anything that loads one file into a [`LoadedCollection`].
///
/// Implemented by [`Loader`], [`super::text::TextLoader`] and (with the `image` feature)
/// [`super::image::ImageLoader`], so [`super::directory::DirectoryLoader`] can drive any of them.
pub trait FileLoader {
    /// Row value type.
    type Output;

    /// Format reported to observers.
    fn format(&self) -> LoadFormat;

    /// Extensions a directory load selects when none are configured.
    fn default_extensions(&self) -> &[&'static str];

    /// Load one file.
    fn load_file(&self, path: &Path) -> LoadResult<LoadedCollection<Self::Output>>;
}

/// Schema-validated loader for one format.
///
/// `T` is [`Record`] by default; use [`Loader::typed`] to deserialize rows into your own type.
///
/// ```no_run
/// use schema_loader::ingestion::Loader;
/// use schema_loader::types::{DataType, Field, Schema};
///
/// # fn main() -> Result<(), schema_loader::LoadingError> {
/// let schema = Schema::new(vec![
///     Field::new("name", DataType::Utf8),
///     Field::new("age", DataType::Int64),
/// ]);
/// let people = Loader::csv(schema).load("people.csv")?;
/// for row in &people {
///     println!("{}: {:?}", row.path.display(), row.value.get("name"));
/// }
/// # Ok(())
/// # }
/// ```
pub struct Loader<T = Record> {
    schema: Arc<Schema>,
    decoder: Arc<dyn RecordDecoder>,
    convert: fn(Record) -> Result<T, ValidationError>,
    reporter: Reporter,
}

impl<T> Clone for Loader<T> {
    fn clone(&self) -> Self {
        Self {
            schema: Arc::clone(&self.schema),
            decoder: Arc::clone(&self.decoder),
            convert: self.convert,
            reporter: self.reporter.clone(),
        }
    }
}

impl<T> fmt::Debug for Loader<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Loader")
            .field("format", &self.decoder.format())
            .field("schema_fields", &self.schema.fields.len())
            .field("reporter", &self.reporter)
            .finish()
    }
}

impl Loader<Record> {
    /// Loader for any decoder.
    pub fn new(schema: impl Into<Arc<Schema>>, decoder: impl RecordDecoder + 'static) -> Self {
        Self::with_decoder(schema, Arc::new(decoder))
    }

    /// Loader for a shared decoder.
    pub fn with_decoder(schema: impl Into<Arc<Schema>>, decoder: Arc<dyn RecordDecoder>) -> Self {
        Self {
            schema: schema.into(),
            decoder,
            convert: Ok,
            reporter: Reporter::default(),
        }
    }

    /// Comma-separated values with a header row.
    pub fn csv(schema: impl Into<Arc<Schema>>) -> Self {
        Self::new(schema, CsvDecoder::new())
    }

    /// Tab-separated values with a header row.
    pub fn tsv(schema: impl Into<Arc<Schema>>) -> Self {
        Self::new(schema, CsvDecoder::tsv())
    }

    /// A single JSON object per file.
    pub fn json(schema: impl Into<Arc<Schema>>) -> Self {
        Self::new(schema, JsonDecoder)
    }

    /// JSON Lines / NDJSON.
    pub fn json_lines(schema: impl Into<Arc<Schema>>) -> Self {
        Self::new(schema, JsonLinesDecoder)
    }

    /// Apache Parquet.
    pub fn parquet(schema: impl Into<Arc<Schema>>) -> Self {
        Self::new(schema, ParquetDecoder)
    }

    /// Deserialize every validated record into `U`.
    ///
    /// Conversion failures are reported as validation failures at the unit's position.
    pub fn typed<U: DeserializeOwned>(self) -> Loader<U> {
        Loader {
            schema: self.schema,
            decoder: self.decoder,
            convert: deserialize_record::<U>,
            reporter: self.reporter,
        }
    }
}

impl<T> Loader<T> {
    /// Report load outcomes to `observer`.
    pub fn with_observer(mut self, observer: Arc<dyn LoadObserver>) -> Self {
        self.reporter.observer = Some(observer);
        self
    }

    /// Severity at or above which `on_alert` is invoked (default: Critical).
    pub fn with_alert_threshold(mut self, severity: LoadSeverity) -> Self {
        self.reporter.alert_at_or_above = severity;
        self
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn format(&self) -> LoadFormat {
        self.decoder.format()
    }

    /// Load every unit of `path`.
    pub fn load(&self, path: impl AsRef<Path>) -> LoadResult<LoadedCollection<T>> {
        let path = path.as_ref();
        let result = self.load_unreported(path);
        self.reporter.report(
            || LoadContext {
                path: path.to_path_buf(),
                format: self.decoder.format(),
            },
            &result,
            |c| c.len(),
        );
        result
    }

    fn load_unreported(&self, path: &Path) -> LoadResult<LoadedCollection<T>> {
        let file = resolve_file(path)?;
        let units = self
            .decoder
            .decode(&file)
            .map_err(|failure| decode_error(&file, failure))?;

        let mut rows = Vec::new();
        for unit in units {
            let unit = unit.map_err(|failure| decode_error(&file, failure))?;
            let value = validate(&unit.fields, &self.schema)
                .and_then(self.convert)
                .map_err(|source| LoadingError::Validation {
                    path: file.clone(),
                    position: unit.position,
                    source,
                })?;
            rows.push(LoadedRow::new(file.clone(), value));
        }

        Ok(LoadedCollection::new(file, rows).with_schema(Arc::clone(&self.schema)))
    }
}

impl<T> FileLoader for Loader<T> {
    type Output = T;

    fn format(&self) -> LoadFormat {
        self.decoder.format()
    }

    fn default_extensions(&self) -> &[&'static str] {
        self.decoder.extensions()
    }

    fn load_file(&self, path: &Path) -> LoadResult<LoadedCollection<T>> {
        self.load(path)
    }
}

/// Wrap a decoder failure for `path`. I/O failures and missing headers get their own kinds.
pub(crate) fn decode_error(path: &Path, failure: DecodeFailure) -> LoadingError {
    let path = path.to_path_buf();
    match failure.error {
        DecodeError::Io(source) => LoadingError::Io { path, source },
        DecodeError::NoHeader => LoadingError::NoHeader { path },
        source => LoadingError::Decode {
            path,
            position: failure.position,
            source,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{LoadErrorKind, Position};
    use crate::types::{DataType, Field};

    #[test]
    fn io_and_header_failures_keep_their_kind() {
        let path = Path::new("x.csv");
        let io = decode_error(path, DecodeError::Io(std::io::Error::other("boom")).into());
        assert_eq!(io.kind(), LoadErrorKind::Io);

        let header = decode_error(path, DecodeError::NoHeader.into());
        assert_eq!(header.kind(), LoadErrorKind::NoHeader);

        let shape = decode_error(
            path,
            DecodeFailure::at(Position::Line(3), DecodeError::Shape("bad".to_string())),
        );
        assert_eq!(shape.kind(), LoadErrorKind::Decode);
        assert_eq!(shape.position(), Some(Position::Line(3)));
    }

    #[test]
    fn missing_file_is_path_not_found() {
        let schema = Schema::new(vec![Field::new("a", DataType::Int64)]);
        let err = Loader::csv(schema).load("definitely/not/here.csv").unwrap_err();
        assert_eq!(err.kind(), LoadErrorKind::PathNotFound);
    }

    #[test]
    fn directory_is_not_a_file() {
        let schema = Schema::new(vec![Field::new("a", DataType::Int64)]);
        let err = Loader::json(schema).load(std::env::temp_dir()).unwrap_err();
        assert_eq!(err.kind(), LoadErrorKind::PathInvalid);
    }

    #[test]
    fn typed_loader_keeps_format_and_schema() {
        #[derive(serde::Deserialize)]
        #[allow(dead_code)]
        struct Row {
            a: i64,
        }
        let schema = Schema::new(vec![Field::new("a", DataType::Int64)]);
        let loader = Loader::parquet(schema).typed::<Row>();
        assert_eq!(loader.format(), LoadFormat::Parquet);
        assert_eq!(loader.schema().fields.len(), 1);
    }
}
