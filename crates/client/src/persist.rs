//! Key-value persistence for client state snapshots.
//!
//! Each key maps to one JSON file inside the state directory. Stores
//! read their snapshot eagerly at construction and write one back after
//! every successful mutation.
//!
//! Writes are best-effort: a full disk or unreadable file must degrade
//! to "no persisted state", never corrupt the in-memory state or fail a
//! local mutation, so `save`/`remove` log failures instead of returning
//! them.

use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Fixed storage keys. Versioning is implicit in the key: a breaking
/// change to a persisted shape gets a new key.
pub mod keys {
    /// Client-generated session identity string.
    pub const SESSION: &str = "session";
    /// Bearer credential obtained at login.
    pub const TOKEN: &str = "token";
    /// Cart snapshot (items + total).
    pub const CART: &str = "cart";
    /// Compare set (list of product snapshots).
    pub const COMPARE: &str = "compare";
    /// Last confirmed user identity.
    pub const AUTH: &str = "auth";
}

/// Directory-backed JSON key-value store.
#[derive(Debug, Clone)]
pub struct StateStore {
    dir: PathBuf,
}

impl StateStore {
    /// Open (creating if necessary) a state directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Path of the file backing `key`.
    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// The state directory this store writes into.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load the value stored under `key`.
    ///
    /// Returns `None` when the key has never been written, and also when
    /// the file is unreadable or no longer decodes (logged at warn).
    #[must_use]
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.path(key);
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to read persisted state");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "persisted state no longer decodes, ignoring");
                None
            }
        }
    }

    /// Persist `value` under `key`, replacing any previous value.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) {
        let json = match serde_json::to_vec_pretty(value) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to encode state snapshot");
                return;
            }
        };

        if let Err(e) = std::fs::write(self.path(key), json) {
            tracing::warn!(key, error = %e, "failed to write state snapshot");
        }
    }

    /// Remove the value stored under `key`, if any.
    pub fn remove(&self, key: &str) {
        match std::fs::remove_file(self.path(key)) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(key, error = %e, "failed to remove persisted state"),
        }
    }
}
