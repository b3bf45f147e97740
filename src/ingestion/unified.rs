//! Unified loading entrypoint.
//!
//! Most callers should use [`load_from_path`], which loads a file (or a directory of files) into a
//! [`LoadedCollection`] of [`Record`]s validated against a provided [`Schema`].
//!
//! - For a file, if [`LoadOptions::format`] is `None`, the format is inferred from the extension.
//! - For a directory, [`LoadOptions::format`] is required; it also fixes which extensions are
//!   selected.
//! - If a [`LoadObserver`] is provided, success/failure/alerts are reported to it.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::collection::LoadedCollection;
use crate::error::{LoadResult, LoadingError};
use crate::resolver::DirectoryScan;
use crate::types::Schema;
use crate::validation::Record;

use super::directory::{Aggregation, DirectoryLoader};
use super::loader::Loader;
use super::observability::{LoadObserver, LoadSeverity};

/// Supported load formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadFormat {
    /// Comma-separated values with a header row.
    Csv,
    /// Tab-separated values with a header row.
    Tsv,
    /// A single JSON object per file.
    Json,
    /// JSON Lines / NDJSON.
    JsonLines,
    /// Apache Parquet.
    Parquet,
    /// Plain UTF-8 text (not schema-validated).
    Text,
    /// Raster image (not schema-validated).
    Image,
}

impl LoadFormat {
    /// Parse a load format from a file extension (case-insensitive, leading dot optional).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "tsv" => Some(Self::Tsv),
            "json" => Some(Self::Json),
            "jsonl" | "ndjson" => Some(Self::JsonLines),
            "parquet" | "pq" => Some(Self::Parquet),
            "txt" => Some(Self::Text),
            "png" | "jpg" | "jpeg" => Some(Self::Image),
            _ => None,
        }
    }

    /// `true` for formats whose rows are validated against a schema.
    pub fn is_schema_validated(self) -> bool {
        !matches!(self, Self::Text | Self::Image)
    }

    fn loader(self, schema: Arc<Schema>) -> Option<Loader> {
        match self {
            Self::Csv => Some(Loader::csv(schema)),
            Self::Tsv => Some(Loader::tsv(schema)),
            Self::Json => Some(Loader::json(schema)),
            Self::JsonLines => Some(Loader::json_lines(schema)),
            Self::Parquet => Some(Loader::parquet(schema)),
            Self::Text | Self::Image => None,
        }
    }
}

/// Options controlling unified loading behavior.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct LoadOptions {
    /// If `None`, auto-detect the format from the file extension (files only).
    pub format: Option<LoadFormat>,
    /// Directory listing depth.
    pub scan: DirectoryScan,
    /// Directory failure policy.
    pub aggregation: Aggregation,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn LoadObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: LoadSeverity,
}

impl fmt::Debug for LoadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadOptions")
            .field("format", &self.format)
            .field("scan", &self.scan)
            .field("aggregation", &self.aggregation)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            format: None,
            scan: DirectoryScan::default(),
            aggregation: Aggregation::default(),
            observer: None,
            alert_at_or_above: LoadSeverity::Critical,
        }
    }
}

/// Unified loading entry point for path-based sources.
///
/// When an observer is configured, this function reports:
///
/// - `on_success` on success, with row count stats
/// - `on_failure` on failure, with a computed severity
/// - `on_alert` on failure when the computed severity is >= `options.alert_at_or_above`
///
/// Text and image formats are not schema-validated; use
/// [`super::text::TextLoader`] / `ImageLoader` for those.
///
/// # Examples
///
/// ## CSV (auto-detect by extension)
///
/// ```no_run
/// use schema_loader::ingestion::{load_from_path, LoadOptions};
/// use schema_loader::types::{DataType, Field, Schema};
///
/// # fn main() -> Result<(), schema_loader::LoadingError> {
/// let schema = Schema::new(vec![
///     Field::new("name", DataType::Utf8),
///     Field::new("age", DataType::Int64).with_default(0_i64),
/// ]);
///
/// let rows = load_from_path("people.csv", &schema, &LoadOptions::default())?;
/// println!("rows={}", rows.len());
/// # Ok(())
/// # }
/// ```
///
/// ## A directory of JSON Lines files, skipping broken files
///
/// ```no_run
/// use std::sync::Arc;
///
/// use schema_loader::ingestion::{
///     load_from_path, Aggregation, LoadFormat, LoadOptions, StdErrObserver,
/// };
/// use schema_loader::types::{DataType, Field, Schema};
///
/// # fn main() -> Result<(), schema_loader::LoadingError> {
/// let schema = Schema::new(vec![Field::new("user.name", DataType::Utf8)]);
///
/// let opts = LoadOptions {
///     format: Some(LoadFormat::JsonLines),
///     aggregation: Aggregation::Lenient,
///     observer: Some(Arc::new(StdErrObserver)),
///     ..Default::default()
/// };
///
/// let rows = load_from_path("events/", &schema, &opts)?;
/// println!("rows={}", rows.len());
/// # Ok(())
/// # }
/// ```
pub fn load_from_path(
    path: impl AsRef<Path>,
    schema: &Schema,
    options: &LoadOptions,
) -> LoadResult<LoadedCollection<Record>> {
    let path = path.as_ref();
    let is_dir = path.is_dir();
    let fmt = match options.format {
        Some(f) => f,
        None if is_dir => {
            return Err(LoadingError::UnknownFormat {
                path: path.to_path_buf(),
                message: "loading a directory requires an explicit format".to_string(),
            });
        }
        None => infer_format_from_path(path)?,
    };

    let Some(loader) = fmt.loader(Arc::new(schema.clone())) else {
        return Err(LoadingError::UnknownFormat {
            path: path.to_path_buf(),
            message: format!("{fmt:?} files are not schema-validated"),
        });
    };

    if is_dir {
        let mut dir = DirectoryLoader::new(loader)
            .with_scan(options.scan)
            .with_aggregation(options.aggregation)
            .with_alert_threshold(options.alert_at_or_above);
        if let Some(obs) = options.observer.as_ref() {
            dir = dir.with_observer(Arc::clone(obs));
        }
        dir.load(path)
    } else {
        let mut loader = loader.with_alert_threshold(options.alert_at_or_above);
        if let Some(obs) = options.observer.as_ref() {
            loader = loader.with_observer(Arc::clone(obs));
        }
        loader.load(path)
    }
}

fn infer_format_from_path(path: &Path) -> LoadResult<LoadFormat> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or_else(|| LoadingError::UnknownFormat {
            path: path.to_path_buf(),
            message: "cannot infer format: path has no extension".to_string(),
        })?;

    LoadFormat::from_extension(ext).ok_or_else(|| LoadingError::UnknownFormat {
        path: path.to_path_buf(),
        message: format!("cannot infer format from extension '{ext}'"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoadErrorKind;
    use crate::types::{DataType, Field};

    #[test]
    fn extensions_map_to_formats() {
        assert_eq!(LoadFormat::from_extension("CSV"), Some(LoadFormat::Csv));
        assert_eq!(LoadFormat::from_extension(".tsv"), Some(LoadFormat::Tsv));
        assert_eq!(LoadFormat::from_extension("ndjson"), Some(LoadFormat::JsonLines));
        assert_eq!(LoadFormat::from_extension("pq"), Some(LoadFormat::Parquet));
        assert_eq!(LoadFormat::from_extension("JPEG"), Some(LoadFormat::Image));
        assert_eq!(LoadFormat::from_extension("xlsx"), None);
        assert!(!LoadFormat::Text.is_schema_validated());
    }

    #[test]
    fn unknown_extension_is_reported() {
        let schema = Schema::new(vec![Field::new("a", DataType::Int64)]);
        let err = load_from_path("data.xyz", &schema, &LoadOptions::default()).unwrap_err();
        assert_eq!(err.kind(), LoadErrorKind::UnknownFormat);
        assert!(err.to_string().contains("'xyz'"));
    }

    #[test]
    fn directory_requires_a_format() {
        let schema = Schema::new(vec![Field::new("a", DataType::Int64)]);
        let err = load_from_path(std::env::temp_dir(), &schema, &LoadOptions::default()).unwrap_err();
        assert_eq!(err.kind(), LoadErrorKind::UnknownFormat);
    }

    #[test]
    fn text_is_not_schema_validated() {
        let schema = Schema::new(vec![Field::new("a", DataType::Int64)]);
        let err = load_from_path("notes.txt", &schema, &LoadOptions::default()).unwrap_err();
        assert_eq!(err.kind(), LoadErrorKind::UnknownFormat);
    }
}
