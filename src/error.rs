use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::types::DataType;

/// Convenience result type for loading operations.
pub type LoadResult<T> = Result<T, LoadingError>;

/// The kind of filesystem object a path was expected to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    /// A regular file.
    File,
    /// A directory.
    Directory,
}

impl fmt::Display for PathKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => f.write_str("file"),
            Self::Directory => f.write_str("directory"),
        }
    }
}

/// Position of a decoded unit inside its source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// 1-based physical line number (delimited text, JSON Lines).
    Line(usize),
    /// 1-based row number (columnar formats).
    Row(usize),
    /// The whole file is one unit (single JSON document).
    Document,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Line(n) => write!(f, "line {n}"),
            Self::Row(n) => write!(f, "row {n}"),
            Self::Document => f.write_str("document"),
        }
    }
}

/// Tag of a [`LoadingError`], for callers that branch on the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadErrorKind {
    /// [`LoadingError::PathNotFound`].
    PathNotFound,
    /// [`LoadingError::PathInvalid`].
    PathInvalid,
    /// [`LoadingError::NoHeader`].
    NoHeader,
    /// [`LoadingError::Decode`].
    Decode,
    /// [`LoadingError::Validation`].
    Validation,
    /// [`LoadingError::Io`].
    Io,
    /// [`LoadingError::UnknownFormat`].
    UnknownFormat,
    /// [`LoadingError::Pattern`].
    Pattern,
}

/// Error type returned by every loader.
///
/// Lower-level causes (decoder errors, validation details, I/O errors) are kept as the error
/// `source`, so callers can inspect the structured cause as well as the formatted message.
#[derive(Debug, Error)]
pub enum LoadingError {
    /// The referenced file or directory does not exist.
    #[error("path not found: {}", path.display())]
    PathNotFound { path: PathBuf },

    /// The path exists but is the wrong kind of filesystem object.
    #[error("input path is invalid: {} (expected a {expected})", path.display())]
    PathInvalid { path: PathBuf, expected: PathKind },

    /// A delimited file has no lines, so no header row could be read.
    #[error("no headers found in {}", path.display())]
    NoHeader { path: PathBuf },

    /// The file content could not be parsed as the expected format.
    #[error("failed to decode {}{}: {source}", path.display(), at(position))]
    Decode {
        path: PathBuf,
        position: Option<Position>,
        #[source]
        source: DecodeError,
    },

    /// A decoded unit does not satisfy the schema.
    #[error("validation failed for {} at {position}: {source}", path.display())]
    Validation {
        path: PathBuf,
        position: Position,
        #[source]
        source: ValidationError,
    },

    /// Underlying read failure (permissions, transient I/O).
    #[error("io error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The load format could not be determined for a path.
    #[error("cannot load {}: {message}", path.display())]
    UnknownFormat { path: PathBuf, message: String },

    /// A glob pattern could not be parsed.
    #[error("invalid glob pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

fn at(position: &Option<Position>) -> String {
    position.map(|p| format!(" at {p}")).unwrap_or_default()
}

impl LoadingError {
    /// The failure category.
    pub fn kind(&self) -> LoadErrorKind {
        match self {
            Self::PathNotFound { .. } => LoadErrorKind::PathNotFound,
            Self::PathInvalid { .. } => LoadErrorKind::PathInvalid,
            Self::NoHeader { .. } => LoadErrorKind::NoHeader,
            Self::Decode { .. } => LoadErrorKind::Decode,
            Self::Validation { .. } => LoadErrorKind::Validation,
            Self::Io { .. } => LoadErrorKind::Io,
            Self::UnknownFormat { .. } => LoadErrorKind::UnknownFormat,
            Self::Pattern { .. } => LoadErrorKind::Pattern,
        }
    }

    /// The file or directory the error refers to, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::PathNotFound { path }
            | Self::PathInvalid { path, .. }
            | Self::NoHeader { path }
            | Self::Decode { path, .. }
            | Self::Validation { path, .. }
            | Self::Io { path, .. }
            | Self::UnknownFormat { path, .. } => Some(path),
            Self::Pattern { .. } => None,
        }
    }

    /// The position inside the file, for decode and validation failures.
    pub fn position(&self) -> Option<Position> {
        match self {
            Self::Decode { position, .. } => *position,
            Self::Validation { position, .. } => Some(*position),
            _ => None,
        }
    }

    /// The validation details, if this is a validation failure.
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Error raised by a record decoder while turning file bytes into field maps.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Underlying read failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV grammar error.
    #[error("csv error: {0}")]
    Csv(csv::Error),

    /// JSON syntax error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Parquet container error.
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[cfg(feature = "image")]
    /// Image codec error (feature-gated behind `image`).
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Text input is not valid UTF-8.
    #[error("invalid utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// A delimited file has no header row.
    #[error("no headers found")]
    NoHeader,

    /// The input parsed but has the wrong structure (e.g. a JSON line that is not an object).
    #[error("{0}")]
    Shape(String),
}

impl From<csv::Error> for DecodeError {
    fn from(e: csv::Error) -> Self {
        if !e.is_io_error() {
            return Self::Csv(e);
        }
        match e.into_kind() {
            csv::ErrorKind::Io(io) => Self::Io(io),
            other => Self::Shape(format!("{other:?}")),
        }
    }
}

/// Why a single field failed validation.
#[derive(Debug, Clone, PartialEq)]
pub enum IssueReason {
    /// Required field absent and no default declared.
    Missing,
    /// Value is null/empty, the field is not nullable and has no default.
    Null,
    /// Value could not be coerced into the field type.
    InvalidType {
        /// The input value, rendered as text.
        raw: String,
        /// Declared field type.
        expected: DataType,
        /// Parser message.
        message: String,
    },
    /// Input key not declared in the schema (only with [`crate::types::UnknownFields::Reject`]).
    Unknown,
    /// The validated record could not be converted into the caller's type.
    Conversion(String),
}

/// One offending field of a [`ValidationError`].
#[derive(Debug, Clone, PartialEq)]
pub struct FieldIssue {
    /// Field name (or input key, for [`IssueReason::Unknown`]).
    pub field: String,
    /// What was wrong with it.
    pub reason: IssueReason,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            IssueReason::Missing => write!(f, "field '{}': missing", self.field),
            IssueReason::Null => write!(f, "field '{}': null or empty value not allowed", self.field),
            IssueReason::InvalidType {
                raw,
                expected,
                message,
            } => write!(
                f,
                "field '{}': expected {expected}: {message} (raw='{raw}')",
                self.field
            ),
            IssueReason::Unknown => write!(f, "field '{}': unknown field", self.field),
            IssueReason::Conversion(message) => write!(f, "field '{}': {message}", self.field),
        }
    }
}

/// A decoded unit does not satisfy the schema. Lists every offending field of the unit.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Offending fields in schema order; unknown keys follow.
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    /// Create a validation error from a non-empty list of issues.
    pub fn new(issues: Vec<FieldIssue>) -> Self {
        Self { issues }
    }

    /// A single-issue error.
    pub fn single(field: impl Into<String>, reason: IssueReason) -> Self {
        Self::new(vec![FieldIssue {
            field: field.into(),
            reason,
        }])
    }

    /// Names of the offending fields, in report order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.issues.iter().map(|i| i.field.as_str())
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} validation error(s)", self.issues.len())?;
        for issue in &self.issues {
            write!(f, "; {issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Error returned by table export and dataframe adapters.
#[derive(Debug, Error)]
pub enum ExportError {
    /// A row value could not be flattened into field/value pairs.
    #[error("failed to flatten row {row}: {source}")]
    Flatten {
        /// 0-based index of the row in the collection.
        row: usize,
        #[source]
        source: serde_json::Error,
    },

    #[cfg(feature = "polars")]
    /// Polars rejected the converted columns (feature-gated behind `polars`).
    #[error("polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}
