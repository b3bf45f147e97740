//! Plain-text loader: one UTF-8 file becomes a single-row collection of `String`.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::collection::{LoadedCollection, LoadedRow};
use crate::error::{DecodeError, LoadResult, LoadingError};
use crate::resolver::resolve_file;

use super::loader::FileLoader;
use super::observability::{LoadContext, LoadObserver, LoadSeverity, Reporter};
use super::unified::LoadFormat;

/// Reads whole UTF-8 text files. Not schema-validated.
#[derive(Debug, Clone, Default)]
pub struct TextLoader {
    reporter: Reporter,
}

impl TextLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_observer(mut self, observer: Arc<dyn LoadObserver>) -> Self {
        self.reporter.observer = Some(observer);
        self
    }

    pub fn with_alert_threshold(mut self, severity: LoadSeverity) -> Self {
        self.reporter.alert_at_or_above = severity;
        self
    }

    /// Read `path` as UTF-8. Invalid UTF-8 is a decode failure.
    pub fn load(&self, path: impl AsRef<Path>) -> LoadResult<LoadedCollection<String>> {
        let path = path.as_ref();
        let result = read_text(path);
        self.reporter.report(
            || LoadContext {
                path: path.to_path_buf(),
                format: LoadFormat::Text,
            },
            &result,
            |c| c.len(),
        );
        result
    }
}

fn read_text(path: &Path) -> LoadResult<LoadedCollection<String>> {
    let file = resolve_file(path)?;
    let bytes = fs::read(&file).map_err(|source| LoadingError::Io {
        path: file.clone(),
        source,
    })?;
    let text = String::from_utf8(bytes).map_err(|e| LoadingError::Decode {
        path: file.clone(),
        position: None,
        source: DecodeError::from(e),
    })?;
    Ok(LoadedCollection::new(
        file.clone(),
        vec![LoadedRow::new(file, text)],
    ))
}

impl FileLoader for TextLoader {
    type Output = String;

    fn format(&self) -> LoadFormat {
        LoadFormat::Text
    }

    fn default_extensions(&self) -> &[&'static str] {
        &[".txt"]
    }

    fn load_file(&self, path: &Path) -> LoadResult<LoadedCollection<String>> {
        self.load(path)
    }
}
