//! Native directory-backed key-value store (one JSON file per key).

use std::fs;
use std::path::{Path, PathBuf};

use super::key_value::{KeyValueFuture, KeyValueStore};

const FILE_EXTENSION: &str = "json";

fn validate_key(key: &str) -> Result<(), String> {
    if key.is_empty() {
        return Err("Storage key must not be empty".to_string());
    }
    if !key
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-'))
    {
        return Err(format!("Storage key `{key}` contains unsupported characters"));
    }
    Ok(())
}

fn key_file(root: &Path, key: &str) -> Result<PathBuf, String> {
    validate_key(key)?;
    Ok(root.join(format!("{key}.{FILE_EXTENSION}")))
}

fn key_from_file_name(path: &Path) -> Option<String> {
    if path.extension().and_then(|ext| ext.to_str()) != Some(FILE_EXTENSION) {
        return None;
    }
    let stem = path.file_stem()?.to_string_lossy().to_string();
    validate_key(&stem).ok().map(|()| stem)
}

#[derive(Debug, Clone)]
/// Key-value store rooted at a native directory.
pub struct FileKeyValueStore {
    root: PathBuf,
}

impl FileKeyValueStore {
    /// Creates a store rooted at `root`, creating the directory when missing.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory cannot be created.
    pub fn from_root(root: impl AsRef<Path>) -> Result<Self, String> {
        let root = root.as_ref();
        fs::create_dir_all(root)
            .map_err(|err| format!("failed to create storage dir {}: {err}", root.display()))?;
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// Returns the directory backing this store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reads the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid keys or unreadable files.
    pub fn load(&self, key: &str) -> Result<Option<String>, String> {
        let path = key_file(&self.root, key)?;
        if !path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&path)
            .map(Some)
            .map_err(|err| format!("failed to read {}: {err}", path.display()))
    }

    /// Writes `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid keys or failed writes.
    pub fn save(&self, key: &str, value: &str) -> Result<(), String> {
        let path = key_file(&self.root, key)?;
        fs::write(&path, value).map_err(|err| format!("failed to write {}: {err}", path.display()))
    }

    /// Deletes the file for `key` if present.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid keys or failed deletes.
    pub fn delete(&self, key: &str) -> Result<(), String> {
        let path = key_file(&self.root, key)?;
        if !path.exists() {
            return Ok(());
        }
        fs::remove_file(&path).map_err(|err| format!("failed to delete {}: {err}", path.display()))
    }

    /// Lists keys currently present in the store.
    ///
    /// # Errors
    ///
    /// Returns an error when the root directory cannot be listed.
    pub fn keys(&self) -> Result<Vec<String>, String> {
        let entries = fs::read_dir(&self.root)
            .map_err(|err| format!("failed to read {}: {err}", self.root.display()))?;

        let mut keys = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|err| format!("failed to read storage dir entry: {err}"))?
                .path();
            if let Some(key) = key_from_file_name(&path) {
                keys.push(key);
            }
        }
        keys.sort();
        Ok(keys)
    }

    /// Deletes every key file; unrelated files in the directory are left alone.
    ///
    /// # Errors
    ///
    /// Returns the first listing or delete failure.
    pub fn delete_all(&self) -> Result<(), String> {
        for key in self.keys()? {
            self.delete(&key)?;
        }
        Ok(())
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get_item<'a>(&'a self, key: &'a str) -> KeyValueFuture<'a, Result<Option<String>, String>> {
        Box::pin(async move { self.load(key) })
    }

    fn set_item<'a>(
        &'a self,
        key: &'a str,
        value: &'a str,
    ) -> KeyValueFuture<'a, Result<(), String>> {
        Box::pin(async move { self.save(key, value) })
    }

    fn remove_item<'a>(&'a self, key: &'a str) -> KeyValueFuture<'a, Result<(), String>> {
        Box::pin(async move { self.delete(key) })
    }

    fn clear<'a>(&'a self) -> KeyValueFuture<'a, Result<(), String>> {
        Box::pin(async move { self.delete_all() })
    }
}
