//! Small persistent key-value store for signed-in state.
//!
//! Values live in a flat JSON object on disk. A missing file is an empty
//! store; an unreadable one is logged and replaced on the next write.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Keys written by the auth adapter.
pub mod keys {
    pub const PLAYER_NAME: &str = "player_name";
    pub const USER_ID: &str = "user_id";
    pub const USER_NAME: &str = "user_name";
    pub const AUTH_TOKEN: &str = "auth_token";
}

#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    path: Option<PathBuf>,
    values: BTreeMap<String, String>,
}

impl SessionStore {
    /// Open the store backed by `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read session file: {}", path.display()))?;
            match serde_json::from_str(&content) {
                Ok(values) => values,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "ignoring corrupt session file");
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            path: Some(path),
            values,
        })
    }

    /// A store that never touches the disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<()> {
        self.values.insert(key.to_string(), value.into());
        self.flush()
    }

    pub fn remove(&mut self, key: &str) -> Result<()> {
        if self.values.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(path, content)
            .with_context(|| format!("failed to write session file: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::open(dir.path().join("session.json")).unwrap();
        assert_eq!(store.get(keys::USER_ID), None);
    }

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let mut store = SessionStore::open(&path).unwrap();
        store.set(keys::PLAYER_NAME, "Bo").unwrap();
        store.set(keys::USER_ID, "u1").unwrap();
        store.remove(keys::USER_ID).unwrap();

        let reopened = SessionStore::open(&path).unwrap();
        assert_eq!(reopened.get(keys::PLAYER_NAME), Some("Bo"));
        assert_eq!(reopened.get(keys::USER_ID), None);
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();

        let mut store = SessionStore::open(&path).unwrap();
        assert_eq!(store.get(keys::PLAYER_NAME), None);
        store.set(keys::PLAYER_NAME, "Al").unwrap();
        assert_eq!(SessionStore::open(&path).unwrap().get(keys::PLAYER_NAME), Some("Al"));
    }

    #[test]
    fn in_memory_store() {
        let mut store = SessionStore::in_memory();
        store.set(keys::AUTH_TOKEN, "t").unwrap();
        assert_eq!(store.get(keys::AUTH_TOKEN), Some("t"));
        assert!(store.path().is_none());
    }
}
