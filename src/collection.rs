//! Loaded results: one [`LoadedRow`] per decoded unit, gathered into a [`LoadedCollection`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::types::Schema;

/// One validated unit of data, tagged with the file it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedRow<T> {
    /// Source file. Always a file that existed at load time.
    pub path: PathBuf,
    pub value: T,
}

impl<T> LoadedRow<T> {
    pub fn new(path: impl Into<PathBuf>, value: T) -> Self {
        Self {
            path: path.into(),
            value,
        }
    }
}

/// The full result of one load call: the source path (file or directory) and its rows in
/// decode order (file order, then directory listing order).
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedCollection<T> {
    /// The file or directory that was loaded.
    pub path: PathBuf,
    pub rows: Vec<LoadedRow<T>>,
    schema: Option<Arc<Schema>>,
}

impl<T> LoadedCollection<T> {
    /// Create a collection without schema information.
    pub fn new(path: impl Into<PathBuf>, rows: Vec<LoadedRow<T>>) -> Self {
        Self {
            path: path.into(),
            rows,
            schema: None,
        }
    }

    /// Attach the schema the rows were validated against. Table export uses it for column order
    /// and types.
    pub fn with_schema(mut self, schema: Arc<Schema>) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Schema the rows were validated against, if any.
    pub fn schema(&self) -> Option<&Schema> {
        self.schema.as_deref()
    }

    pub(crate) fn schema_arc(&self) -> Option<Arc<Schema>> {
        self.schema.clone()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate rows in order.
    pub fn iter(&self) -> std::slice::Iter<'_, LoadedRow<T>> {
        self.rows.iter()
    }

    /// Iterate the row values in order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.rows.iter().map(|r| &r.value)
    }

    /// Distinct source files in first-seen order.
    pub fn source_files(&self) -> Vec<&Path> {
        let mut out: Vec<&Path> = Vec::new();
        for row in &self.rows {
            if !out.contains(&row.path.as_path()) {
                out.push(&row.path);
            }
        }
        out
    }

    /// Consume the collection, returning the values in order.
    pub fn into_values(self) -> Vec<T> {
        self.rows.into_iter().map(|r| r.value).collect()
    }
}

impl<T> IntoIterator for LoadedCollection<T> {
    type Item = LoadedRow<T>;
    type IntoIter = std::vec::IntoIter<LoadedRow<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a LoadedCollection<T> {
    type Item = &'a LoadedRow<T>;
    type IntoIter = std::slice::Iter<'a, LoadedRow<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
