//! Disk-backed storage for uploaded statement files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

use crate::errors::{Error, Result, ValidationError};
use crate::statements::statements_errors::StatementError;
use crate::statements::statements_traits::StatementStoreTrait;

/// Stores statement files under a single root directory.
///
/// Stored names are `<millisecond timestamp>-<sequence>-<sanitized original
/// name>`; the sequence keeps same-millisecond uploads from colliding.
pub struct DiskStatementStore {
    root: PathBuf,
    sequence: AtomicU64,
}

impl DiskStatementStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            sequence: AtomicU64::new(0),
        })
    }
}

/// Strips path components so a stored name can never escape the root.
fn sanitize_file_name(original: &str) -> String {
    let base = Path::new(original)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "statement".to_string());
    base.replace(['/', '\\'], "_")
}

impl StatementStoreTrait for DiskStatementStore {
    fn store(&self, original_name: &str, bytes: &[u8]) -> Result<String> {
        let stored_name = format!(
            "{}-{}-{}",
            Utc::now().timestamp_millis(),
            self.sequence.fetch_add(1, Ordering::Relaxed),
            sanitize_file_name(original_name)
        );
        fs::write(self.root.join(&stored_name), bytes).map_err(|e| StatementError::Store {
            name: original_name.to_string(),
            reason: e.to_string(),
        })?;
        Ok(stored_name)
    }

    fn read(&self, stored_name: &str) -> Result<Vec<u8>> {
        if stored_name.contains(['/', '\\']) || stored_name.contains("..") {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "invalid stored name '{}'",
                stored_name
            ))));
        }
        let bytes =
            fs::read(self.root.join(stored_name)).map_err(|e| StatementError::Parse {
                name: stored_name.to_string(),
                reason: e.to_string(),
            })?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_store_and_read_round_trip() {
        let dir = tempdir().unwrap();
        let store = DiskStatementStore::new(dir.path()).unwrap();

        let name = store.store("banco enero.csv", b"fecha;importe\n").unwrap();
        assert!(name.ends_with("-banco enero.csv"));
        assert_eq!(store.read(&name).unwrap(), b"fecha;importe\n");
    }

    #[test]
    fn test_store_strips_path_components() {
        let dir = tempdir().unwrap();
        let store = DiskStatementStore::new(dir.path()).unwrap();

        let name = store.store("../../etc/banco.csv", b"x").unwrap();
        assert!(!name.contains('/'));
        assert!(store.read(&name).is_ok());
    }

    #[test]
    fn test_same_name_uploads_do_not_collide() {
        let dir = tempdir().unwrap();
        let store = DiskStatementStore::new(dir.path()).unwrap();

        let first = store.store("uber.csv", b"a").unwrap();
        let second = store.store("uber.csv", b"b").unwrap();
        assert_ne!(first, second);
        assert_eq!(store.read(&first).unwrap(), b"a");
        assert_eq!(store.read(&second).unwrap(), b"b");
    }

    #[test]
    fn test_read_rejects_traversal() {
        let dir = tempdir().unwrap();
        let store = DiskStatementStore::new(dir.path()).unwrap();

        assert!(store.read("../secret").is_err());
        assert!(store.read("nested/name").is_err());
    }
}
