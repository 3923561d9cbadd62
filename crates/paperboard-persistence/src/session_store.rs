//! Session file storage.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use paperboard_models::Session;
use tracing::debug;

use crate::error::{PersistenceError, Result};

/// Persists the signed-in session as a single JSON file.
///
/// Layout:
/// ```text
/// base_path/
/// └── session.json
/// ```
pub struct SessionStore {
    base_path: PathBuf,
}

impl SessionStore {
    /// Creates a new SessionStore rooted at the given directory.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Returns the path of the session file.
    fn session_path(&self) -> PathBuf {
        self.base_path.join("session.json")
    }

    /// Saves the session, replacing any previous one.
    ///
    /// Writes to a temp file in the same directory and renames it into
    /// place, so a crash mid-write never corrupts the stored session.
    pub fn save(&self, session: &Session) -> Result<()> {
        let path = self.session_path();

        if !self.base_path.exists() {
            fs::create_dir_all(&self.base_path).map_err(|source| {
                PersistenceError::Directory {
                    path: self.base_path.clone(),
                    source,
                }
            })?;
        }

        let json = serde_json::to_string_pretty(session)?;

        let mut temp = tempfile::NamedTempFile::new_in(&self.base_path).map_err(|source| {
            PersistenceError::Write {
                path: path.clone(),
                source,
            }
        })?;
        temp.write_all(json.as_bytes())
            .and_then(|_| temp.flush())
            .map_err(|source| PersistenceError::Write {
                path: path.clone(),
                source,
            })?;
        temp.persist(&path).map_err(|e| PersistenceError::Write {
            path: path.clone(),
            source: e.error,
        })?;

        debug!(path = %path.display(), "session saved");
        Ok(())
    }

    /// Loads the persisted session, or `None` if nobody is signed in.
    pub fn load(&self) -> Result<Option<Session>> {
        let path = self.session_path();
        if !path.exists() {
            return Ok(None);
        }

        let data = fs::read_to_string(&path).map_err(|source| PersistenceError::Read {
            path: path.clone(),
            source,
        })?;
        let session = serde_json::from_str(&data)?;
        Ok(Some(session))
    }

    /// Removes the persisted session, if any.
    pub fn clear(&self) -> Result<()> {
        let path = self.session_path();
        if path.exists() {
            fs::remove_file(&path).map_err(|source| PersistenceError::Write { path, source })?;
        }
        Ok(())
    }

    /// Returns the directory this store writes into.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_session() -> Session {
        Session::new("id-token", "refresh-token", "user@example.com", "uid-1")
    }

    #[test]
    fn test_load_missing_returns_none() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path());

        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path());

        store.save(&sample_session()).unwrap();
        let loaded = store.load().unwrap().unwrap();

        assert_eq!(loaded, sample_session());
    }

    #[test]
    fn test_save_creates_base_dir() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("nested/state"));

        store.save(&sample_session()).unwrap();
        assert!(store.load().unwrap().is_some());
    }

    #[test]
    fn test_save_replaces_previous_session() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path());

        store.save(&sample_session()).unwrap();
        let other = Session::new("tok2", "ref2", "other@example.com", "uid-2");
        store.save(&other).unwrap();

        assert_eq!(store.load().unwrap().unwrap(), other);
    }

    #[test]
    fn test_clear_removes_session() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path());

        store.save(&sample_session()).unwrap();
        store.clear().unwrap();

        assert!(store.load().unwrap().is_none());
        // Clearing twice is not an error.
        store.clear().unwrap();
    }
}
