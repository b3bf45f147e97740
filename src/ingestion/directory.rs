//! Directory loading: one [`FileLoader`] applied to every matching file of a directory.
//!
//! Files are visited in sorted path order and their rows are concatenated, file by file, into one
//! collection keyed by the directory path. What happens when a file fails is an explicit
//! [`Aggregation`] choice; the default is [`Aggregation::Strict`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::collection::LoadedCollection;
use crate::error::LoadResult;
use crate::resolver::{glob_files, list_files, normalize_extensions, resolve_directory, DirectoryScan};

use super::loader::FileLoader;
use super::observability::{LoadContext, LoadObserver, LoadSeverity, Reporter};

/// What a directory load does when one of its files fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Aggregation {
    /// The first failing file aborts the whole load.
    #[default]
    Strict,
    /// Failing files are skipped (and reported as warnings); the rest are kept.
    Lenient,
}

/// Loads every matching file under a directory with one [`FileLoader`].
///
/// ```no_run
/// use schema_loader::ingestion::{Aggregation, DirectoryLoader, Loader};
/// use schema_loader::resolver::DirectoryScan;
/// use schema_loader::types::{DataType, Field, Schema};
///
/// # fn main() -> Result<(), schema_loader::LoadingError> {
/// let schema = Schema::new(vec![Field::new("id", DataType::Int64)]);
/// let rows = DirectoryLoader::new(Loader::json_lines(schema))
///     .with_scan(DirectoryScan::Recursive)
///     .with_aggregation(Aggregation::Lenient)
///     .load("events/")?;
/// println!("rows={} files={}", rows.len(), rows.source_files().len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DirectoryLoader<L> {
    loader: L,
    extensions: Vec<String>,
    scan: DirectoryScan,
    aggregation: Aggregation,
    reporter: Reporter,
}

impl<L: FileLoader> DirectoryLoader<L> {
    /// Directory loader selecting the loader's default extensions.
    pub fn new(loader: L) -> Self {
        let extensions = normalize_extensions(loader.default_extensions());
        Self {
            loader,
            extensions,
            scan: DirectoryScan::default(),
            aggregation: Aggregation::default(),
            reporter: Reporter::default(),
        }
    }

    /// Select files by these extensions instead (case-insensitive, leading dot optional).
    pub fn with_extensions<S: AsRef<str>>(mut self, extensions: &[S]) -> Self {
        self.extensions = normalize_extensions(extensions);
        self
    }

    pub fn with_scan(mut self, scan: DirectoryScan) -> Self {
        self.scan = scan;
        self
    }

    pub fn with_aggregation(mut self, aggregation: Aggregation) -> Self {
        self.aggregation = aggregation;
        self
    }

    /// Report directory outcomes and skipped files to `observer`.
    pub fn with_observer(mut self, observer: Arc<dyn LoadObserver>) -> Self {
        self.reporter.observer = Some(observer);
        self
    }

    pub fn with_alert_threshold(mut self, severity: LoadSeverity) -> Self {
        self.reporter.alert_at_or_above = severity;
        self
    }

    /// The per-file loader.
    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Normalized extensions used for selection.
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Load every matching file under `dir`.
    pub fn load(&self, dir: impl AsRef<Path>) -> LoadResult<LoadedCollection<L::Output>> {
        let dir = dir.as_ref();
        let result = resolve_directory(dir).and_then(|dir| {
            let files = list_files(&dir, &self.extensions, self.scan);
            self.load_files(dir, files)
        });
        self.report(dir, &result);
        result
    }

    /// Load every file matching a glob pattern (and the configured extensions).
    ///
    /// The resulting collection is keyed by the pattern itself.
    pub fn load_glob(&self, pattern: &str) -> LoadResult<LoadedCollection<L::Output>> {
        let root = PathBuf::from(pattern);
        let result = glob_files(pattern, &self.extensions)
            .and_then(|files| self.load_files(root.clone(), files));
        self.report(&root, &result);
        result
    }

    fn load_files(
        &self,
        root: PathBuf,
        files: Vec<PathBuf>,
    ) -> LoadResult<LoadedCollection<L::Output>> {
        let mut rows = Vec::new();
        let mut schema = None;

        for file in files {
            match self.loader.load_file(&file) {
                Ok(collection) => {
                    if schema.is_none() {
                        schema = collection.schema_arc();
                    }
                    rows.extend(collection.rows);
                }
                Err(e) => match self.aggregation {
                    Aggregation::Strict => return Err(e),
                    Aggregation::Lenient => {
                        let ctx = LoadContext {
                            path: file,
                            format: self.loader.format(),
                        };
                        self.reporter.skipped(&ctx, &e);
                    }
                },
            }
        }

        let collection = LoadedCollection::new(root, rows);
        Ok(match schema {
            Some(schema) => collection.with_schema(schema),
            None => collection,
        })
    }

    fn report(&self, path: &Path, result: &LoadResult<LoadedCollection<L::Output>>) {
        self.reporter.report(
            || LoadContext {
                path: path.to_path_buf(),
                format: self.loader.format(),
            },
            result,
            |c| c.len(),
        );
    }
}
