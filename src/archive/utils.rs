use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::trace;

/// A file (or directory listing) that could not be cleared
#[derive(Debug, Error)]
#[error("Failed to remove {}: {source}", .path.display())]
pub struct RemoveFileError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Delete every regular file below `dir`, recursing into subdirectories.
/// Directories themselves are left in place. Stops at the first failure;
/// files removed before it stay removed. Returns the number of files removed.
pub fn remove_regular_files(
    dir: &Path,
    remove: &dyn Fn(&Path) -> io::Result<()>,
) -> Result<usize, RemoveFileError> {
    let listing_error = |source| RemoveFileError {
        path: dir.to_path_buf(),
        source,
    };

    let mut removed = 0;
    for entry in fs::read_dir(dir).map_err(listing_error)? {
        let entry = entry.map_err(listing_error)?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|source| RemoveFileError {
            path: path.clone(),
            source,
        })?;

        if file_type.is_dir() {
            removed += remove_regular_files(&path, remove)?;
        } else if file_type.is_file() || (file_type.is_symlink() && !path.is_dir()) {
            trace!(path = %path.display(), "removing cached file");
            remove(&path).map_err(|source| RemoveFileError {
                path: path.clone(),
                source,
            })?;
            removed += 1;
        }
    }

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use tempfile::TempDir;

    #[test]
    fn test_remove_nested_files_keeps_directories() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(temp.path().join("top.txt"), "top").unwrap();
        fs::write(nested.join("deep.txt"), "deep").unwrap();

        let removed = remove_regular_files(temp.path(), &|p| fs::remove_file(p)).unwrap();

        assert_eq!(removed, 2);
        assert!(!temp.path().join("top.txt").exists());
        assert!(!nested.join("deep.txt").exists());
        assert!(nested.is_dir());
    }

    #[test]
    fn test_remove_empty_dir() {
        let temp = TempDir::new().unwrap();
        let removed = remove_regular_files(temp.path(), &|p| fs::remove_file(p)).unwrap();
        assert_eq!(removed, 0);
    }

    #[test]
    fn test_remove_stops_at_first_failure() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("busy.dat"), "busy").unwrap();

        let attempts = RefCell::new(Vec::new());
        let err = remove_regular_files(temp.path(), &|p| {
            attempts.borrow_mut().push(p.to_path_buf());
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "in use"))
        })
        .unwrap_err();

        assert!(err.path.ends_with("busy.dat"));
        assert_eq!(err.source.kind(), io::ErrorKind::PermissionDenied);
        assert_eq!(attempts.borrow().len(), 1);
        assert!(temp.path().join("busy.dat").exists());
    }

    #[test]
    fn test_remove_missing_dir_reports_dir() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope");
        let err = remove_regular_files(&missing, &|p| fs::remove_file(p)).unwrap_err();
        assert_eq!(err.path, missing);
        assert_eq!(err.source.kind(), io::ErrorKind::NotFound);
    }
}
