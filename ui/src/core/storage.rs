//! Platform key/value persistence.
//!
//! Web builds read and write browser local storage; native builds keep one
//! JSON file per key under the project data directory. Everything above
//! this module works in string keys and JSON payloads.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("lagringen är inte tillgänglig")]
    Unavailable,
    #[error("ogiltigt dataformat: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("inte inloggad")]
    AuthRequired,
    #[error("{0}")]
    Backend(String),
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;
    use std::sync::RwLock;

    use once_cell::sync::Lazy;

    /// Test and desktop override for the data directory.
    static ROOT: Lazy<RwLock<Option<PathBuf>>> = Lazy::new(|| RwLock::new(None));

    pub fn set_storage_root(path: PathBuf) {
        if let Ok(mut root) = ROOT.write() {
            *root = Some(path);
        }
    }

    pub fn storage_root() -> Option<PathBuf> {
        if let Ok(root) = ROOT.read() {
            if let Some(path) = root.as_ref() {
                return Some(path.clone());
            }
        }
        directories::ProjectDirs::from("se", "Fysioscreen", "Fysioscreen")
            .map(|dirs| dirs.data_dir().join("store"))
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::set_storage_root;

#[cfg(not(target_arch = "wasm32"))]
fn key_path(key: &str) -> Result<std::path::PathBuf, StorageError> {
    let root = native::storage_root().ok_or(StorageError::Unavailable)?;
    let mut path = root;
    for part in key.split('/') {
        path.push(part);
    }
    path.set_extension("json");
    Ok(path)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn read_key(key: &str) -> Result<Option<String>, StorageError> {
    let path = key_path(key)?;
    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(Some(contents)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(StorageError::Backend(err.to_string())),
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn write_key(key: &str, value: &str) -> Result<(), StorageError> {
    let path = key_path(key)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|err| StorageError::Backend(err.to_string()))?;
    }
    tracing::debug!(key, bytes = value.len(), "writing storage key");
    std::fs::write(&path, value).map_err(|err| StorageError::Backend(err.to_string()))
}

#[cfg(not(target_arch = "wasm32"))]
pub fn remove_key(key: &str) -> Result<(), StorageError> {
    let path = key_path(key)?;
    match std::fs::remove_file(&path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(StorageError::Backend(err.to_string())),
    }
}

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Result<web_sys::Storage, StorageError> {
    web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
        .ok_or(StorageError::Unavailable)
}

#[cfg(target_arch = "wasm32")]
pub fn read_key(key: &str) -> Result<Option<String>, StorageError> {
    local_storage()?
        .get_item(key)
        .map_err(|_| StorageError::Backend("localStorage read failed".into()))
}

#[cfg(target_arch = "wasm32")]
pub fn write_key(key: &str, value: &str) -> Result<(), StorageError> {
    tracing::debug!(key, bytes = value.len(), "writing storage key");
    local_storage()?
        .set_item(key, value)
        .map_err(|_| StorageError::Backend("localStorage write failed".into()))
}

#[cfg(target_arch = "wasm32")]
pub fn remove_key(key: &str) -> Result<(), StorageError> {
    local_storage()?
        .remove_item(key)
        .map_err(|_| StorageError::Backend("localStorage remove failed".into()))
}

/// Points the native backend at a fresh temp directory, once per test
/// process. Tests use unique keys on top of this shared root so they can
/// run in parallel.
#[cfg(all(test, not(target_arch = "wasm32")))]
pub(crate) fn isolated_test_root() {
    use once_cell::sync::Lazy;
    static INIT: Lazy<()> = Lazy::new(|| {
        let dir = std::env::temp_dir()
            .join("fysioscreen-tests")
            .join(uuid::Uuid::new_v4().to_string());
        set_storage_root(dir);
    });
    Lazy::force(&INIT);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_read_as_none() {
        isolated_test_root();
        assert!(read_key("nope/never").unwrap().is_none());
    }

    #[test]
    fn write_read_remove_round_trip() {
        isolated_test_root();
        let key = format!("users/{}/patients", uuid::Uuid::new_v4());
        write_key(&key, "[1,2,3]").unwrap();
        assert_eq!(read_key(&key).unwrap().unwrap(), "[1,2,3]");
        remove_key(&key).unwrap();
        assert!(read_key(&key).unwrap().is_none());
        // Removing twice is a no-op.
        remove_key(&key).unwrap();
    }
}
