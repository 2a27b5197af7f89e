use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::fs;

use parking_lot::Mutex;
use tempfile::NamedTempFile;

use crate::contract::model::User;
use crate::domain::storage::{SessionStorage, StorageError};

/// Session storage backed by a single JSON file.
///
/// Writes go through a temp file in the same directory followed by a
/// rename, so a crash mid-write never leaves a half-written session behind.
/// A mutex serializes writers within the process.
pub struct FileSessionStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileSessionStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn io_err(err: io::Error) -> StorageError {
    StorageError::Io(err.to_string())
}

impl SessionStorage for FileSessionStorage {
    fn load(&self) -> Result<Option<User>, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(io_err(err)),
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|err| StorageError::Corrupt(err.to_string()))
    }

    fn save(&self, user: &User) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock();

        let parent = self.path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent).map_err(io_err)?;

        let json =
            serde_json::to_vec_pretty(user).map_err(|err| StorageError::Io(err.to_string()))?;

        let mut tmp = NamedTempFile::new_in(parent).map_err(io_err)?;
        tmp.write_all(&json).map_err(io_err)?;
        tmp.persist(&self.path)
            .map_err(|err| StorageError::Io(err.to_string()))?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock();

        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(io_err(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;

    fn sample_user() -> User {
        User {
            id: "u1".into(),
            email: "a@b.co".into(),
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn missing_file_reads_as_logged_out() {
        let dir = tempdir().unwrap();
        let storage = FileSessionStorage::new(dir.path().join("current_user.json"));
        assert!(storage.load().unwrap().is_none());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let storage = FileSessionStorage::new(dir.path().join("current_user.json"));

        storage.save(&sample_user()).unwrap();
        assert_eq!(storage.load().unwrap(), Some(sample_user()));
    }

    #[test]
    fn corrupt_content_is_reported_as_corrupt() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("current_user.json");
        fs::write(&path, "{not json").unwrap();

        let storage = FileSessionStorage::new(&path);
        assert!(matches!(storage.load(), Err(StorageError::Corrupt(_))));
    }

    #[test]
    fn clear_is_idempotent() {
        let dir = tempdir().unwrap();
        let storage = FileSessionStorage::new(dir.path().join("current_user.json"));

        storage.save(&sample_user()).unwrap();
        storage.clear().unwrap();
        storage.clear().unwrap();
        assert!(storage.load().unwrap().is_none());
    }

    #[test]
    fn save_creates_missing_parent_directories() {
        let dir = tempdir().unwrap();
        let storage = FileSessionStorage::new(dir.path().join("nested/deeper/current_user.json"));

        storage.save(&sample_user()).unwrap();
        assert_eq!(storage.load().unwrap(), Some(sample_user()));
    }
}
