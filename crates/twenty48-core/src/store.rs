//! Best-score persistence port.
//!
//! The session never touches ambient global storage: hosts hand it a store,
//! it reads the value once at startup and writes on every new best. The
//! file-backed store is the terminal analog of the browser's single
//! `localStorage` slot.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Port for the single persisted best-score scalar.
pub trait BestScoreStore {
    /// Current persisted best score; missing state reads as 0.
    fn load(&self) -> Result<u64, StoreError>;

    /// Persist a new best score.
    fn save(&mut self, value: u64) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read best score from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write best score to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed best score file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct BestScoreDoc {
    best_score: u64,
}

/// Single-document JSON store at a caller-chosen path.
///
/// Parent directories are created on the first save; a missing file loads
/// as 0 so a fresh install needs no setup step.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BestScoreStore for JsonFileStore {
    fn load(&self) -> Result<u64, StoreError> {
        if !self.path.exists() {
            return Ok(0);
        }
        let contents = fs::read_to_string(&self.path).map_err(|source| StoreError::Read {
            path: self.path.clone(),
            source,
        })?;
        let doc: BestScoreDoc =
            serde_json::from_str(&contents).map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })?;
        Ok(doc.best_score)
    }

    fn save(&mut self, value: u64) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                    path: self.path.clone(),
                    source,
                })?;
            }
        }
        let doc = BestScoreDoc { best_score: value };
        let contents = serde_json::to_string(&doc).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, contents).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

/// In-process store for tests and ephemeral sessions.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    best: u64,
}

impl MemoryStore {
    pub fn with_best(best: u64) -> Self {
        Self { best }
    }
}

impl BestScoreStore for MemoryStore {
    fn load(&self) -> Result<u64, StoreError> {
        Ok(self.best)
    }

    fn save(&mut self, value: u64) -> Result<(), StoreError> {
        self.best = value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn memory_store_roundtrip() {
        let mut store = MemoryStore::default();
        assert_eq!(store.load().unwrap(), 0);
        store.save(2048).unwrap();
        assert_eq!(store.load().unwrap(), 2048);
    }

    #[test]
    fn missing_file_loads_as_zero() {
        let td = tempdir().unwrap();
        let store = JsonFileStore::new(td.path().join("scores/best.json"));
        assert_eq!(store.load().unwrap(), 0);
    }

    #[test]
    fn file_roundtrip_creates_parents() {
        let td = tempdir().unwrap();
        let path = td.path().join("nested/dir/best.json");
        let mut store = JsonFileStore::new(&path);
        store.save(4096).unwrap();
        assert!(path.exists());
        assert_eq!(store.load().unwrap(), 4096);
        // a second handle sees the same value, as across a process restart
        assert_eq!(JsonFileStore::new(&path).load().unwrap(), 4096);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let td = tempdir().unwrap();
        let path = td.path().join("best.json");
        std::fs::write(&path, "not json").unwrap();
        match JsonFileStore::new(&path).load() {
            Err(StoreError::Parse { .. }) => {}
            other => panic!("expected parse error, got {other:?}"),
        }
    }
}
