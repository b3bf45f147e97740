//! Path resolution and directory listing.
//!
//! Single-file loaders call [`resolve_file`]; directory loaders call [`resolve_directory`] and then
//! [`list_files`]. Listing never fails: existence is checked by the caller beforehand, and
//! unreadable entries are skipped.
//!
//! Listings are sorted by path, so directory loads visit files in a deterministic order on every
//! platform.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{LoadResult, LoadingError, PathKind};

/// How deep a directory listing goes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DirectoryScan {
    /// Immediate children only.
    #[default]
    Shallow,
    /// All descendants, following subdirectories.
    Recursive,
}

/// Check that `path` exists and is a file.
pub fn resolve_file(path: impl AsRef<Path>) -> LoadResult<PathBuf> {
    resolve(path.as_ref(), PathKind::File)
}

/// Check that `path` exists and is a directory.
pub fn resolve_directory(path: impl AsRef<Path>) -> LoadResult<PathBuf> {
    resolve(path.as_ref(), PathKind::Directory)
}

fn resolve(path: &Path, expected: PathKind) -> LoadResult<PathBuf> {
    let meta = match fs::metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(LoadingError::PathNotFound {
                path: path.to_path_buf(),
            });
        }
        Err(source) => {
            return Err(LoadingError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let ok = match expected {
        PathKind::File => meta.is_file(),
        PathKind::Directory => meta.is_dir(),
    };
    if ok {
        Ok(path.to_path_buf())
    } else {
        Err(LoadingError::PathInvalid {
            path: path.to_path_buf(),
            expected,
        })
    }
}

/// Normalize extensions to lowercase with a leading dot. Blank entries are dropped.
///
/// `"JSON"`, `"json"` and `".json"` all become `".json"`.
pub fn normalize_extensions<S: AsRef<str>>(extensions: &[S]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(extensions.len());
    for ext in extensions {
        let ext = ext.as_ref().trim();
        if ext.is_empty() {
            continue;
        }
        let normalized = if ext.starts_with('.') {
            ext.to_lowercase()
        } else {
            format!(".{}", ext.to_lowercase())
        };
        if !out.contains(&normalized) {
            out.push(normalized);
        }
    }
    out
}

/// `true` if the file name ends with one of `extensions` (case-insensitive).
///
/// Multi-part extensions such as `".tar.gz"` match as suffixes. A name that is nothing but the
/// extension (`".csv"`) does not match. An empty extension list matches every file.
pub fn matches_extension<S: AsRef<str>>(path: &Path, extensions: &[S]) -> bool {
    if extensions.is_empty() {
        return true;
    }
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    let name = name.to_lowercase();
    normalize_extensions(extensions)
        .iter()
        .any(|e| name.len() > e.len() && name.ends_with(e.as_str()))
}

/// List the files under `dir` whose extension matches `extensions`, sorted by path.
///
/// Returns an empty list when `dir` does not exist or is not a directory.
pub fn list_files<S: AsRef<str>>(dir: &Path, extensions: &[S], scan: DirectoryScan) -> Vec<PathBuf> {
    let normalized = normalize_extensions(extensions);
    let mut files: Vec<PathBuf> = match scan {
        DirectoryScan::Shallow => match fs::read_dir(dir) {
            Ok(entries) => entries
                .filter_map(Result::ok)
                .map(|entry| entry.path())
                .filter(|p| p.is_file())
                .collect(),
            Err(_) => Vec::new(),
        },
        DirectoryScan::Recursive => WalkDir::new(dir)
            .follow_links(true)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.path().is_file())
            .map(|entry| entry.into_path())
            .collect(),
    };
    files.retain(|p| matches_extension(p, &normalized));
    files.sort();
    files
}

/// List files matching a glob pattern and `extensions`, sorted by path.
///
/// Unreadable matches are skipped; an unparsable pattern is an error.
pub fn glob_files<S: AsRef<str>>(pattern: &str, extensions: &[S]) -> LoadResult<Vec<PathBuf>> {
    let paths = glob::glob(pattern).map_err(|source| LoadingError::Pattern {
        pattern: pattern.to_owned(),
        source,
    })?;
    let normalized = normalize_extensions(extensions);
    let mut files: Vec<PathBuf> = paths
        .filter_map(Result::ok)
        .filter(|p| p.is_file() && matches_extension(p, &normalized))
        .collect();
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::*;
    use crate::error::LoadErrorKind;

    fn tmp_dir(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("schema-loader-resolver-{name}-{nanos}"));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn touch(path: &Path) {
        fs::write(path, "x").unwrap();
    }

    fn names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    fn sample_tree(name: &str) -> PathBuf {
        let dir = tmp_dir(name);
        touch(&dir.join("file1.txt"));
        touch(&dir.join("file2.jpg"));
        touch(&dir.join("file3.JPG"));
        touch(&dir.join("file4.png"));
        fs::create_dir(dir.join("subdir")).unwrap();
        touch(&dir.join("subdir").join("file5.txt"));
        touch(&dir.join("subdir").join("file6.jpg"));
        dir
    }

    #[test]
    fn normalizes_extensions() {
        assert_eq!(
            normalize_extensions(&["JSON", ".csv", "json", " ", "Tar.GZ"]),
            vec![".json", ".csv", ".tar.gz"]
        );
    }

    #[test]
    fn multi_part_extensions_match_as_suffixes() {
        let dir = tmp_dir("suffix");
        touch(&dir.join("a.tar.gz"));
        touch(&dir.join("b.gz"));
        touch(&dir.join(".tar.gz"));

        let files = list_files(&dir, &["tar.gz"], DirectoryScan::Shallow);
        assert_eq!(names(&files), vec!["a.tar.gz"]);
        assert!(matches_extension(Path::new("x/A.TAR.GZ"), &[".tar.gz"]));
        assert!(!matches_extension(Path::new("x/agz"), &["gz"]));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn shallow_listing_ignores_subdirectories() {
        let dir = sample_tree("shallow");
        let files = list_files(&dir, &["jpg"], DirectoryScan::Shallow);
        assert_eq!(names(&files), vec!["file2.jpg", "file3.JPG"]);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn recursive_listing_descends() {
        let dir = sample_tree("recursive");
        let files = list_files(&dir, &[".jpg", "png"], DirectoryScan::Recursive);
        assert_eq!(
            names(&files),
            vec!["file2.jpg", "file3.JPG", "file4.png", "file6.jpg"]
        );
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn empty_extension_list_matches_everything() {
        let dir = sample_tree("all");
        let none: [&str; 0] = [];
        assert_eq!(list_files(&dir, &none, DirectoryScan::Shallow).len(), 4);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn listing_a_missing_directory_is_empty() {
        let missing = std::env::temp_dir().join("schema-loader-definitely-missing-dir");
        assert!(list_files(&missing, &["txt"], DirectoryScan::Recursive).is_empty());
    }

    #[test]
    fn resolve_reports_missing_and_wrong_kind() {
        let dir = sample_tree("resolve");
        let file = dir.join("file1.txt");

        assert_eq!(resolve_file(&file).unwrap(), file);
        assert_eq!(resolve_directory(&dir).unwrap(), dir);

        let err = resolve_file(&dir).unwrap_err();
        assert_eq!(err.kind(), LoadErrorKind::PathInvalid);
        let err = resolve_directory(&file).unwrap_err();
        assert_eq!(err.kind(), LoadErrorKind::PathInvalid);
        let err = resolve_file(dir.join("nope.txt")).unwrap_err();
        assert_eq!(err.kind(), LoadErrorKind::PathNotFound);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn glob_selects_and_filters() {
        let dir = sample_tree("glob");
        let pattern = format!("{}/**/*", dir.display());
        let files = glob_files(&pattern, &["txt"]).unwrap();
        assert_eq!(names(&files), vec!["file1.txt", "file5.txt"]);

        let err = glob_files("[", &["txt"]).unwrap_err();
        assert_eq!(err.kind(), LoadErrorKind::Pattern);
        let _ = fs::remove_dir_all(&dir);
    }
}
