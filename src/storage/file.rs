//! File-based document storage for wordhoard.
//!
//! Documents are stored as JSON files in `~/.wordhoard/data/`.
//! Atomic writes are achieved via temp file + rename pattern.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::data_dir;
use crate::error::{Result, VocabError};
use crate::storage::DocumentStore;
use crate::util::read_to_string_limited;

/// File-based document storage.
///
/// Stores each document as `<key>.json` in a configurable directory.
#[derive(Debug, Clone)]
pub struct FileDocumentStore {
    /// Directory where document files are stored.
    data_dir: PathBuf,
}

impl FileDocumentStore {
    /// Create a new file document store with the default directory.
    ///
    /// Uses `~/.wordhoard/data/` or `$WORDHOARD_HOME/data/`.
    pub fn new() -> Result<Self> {
        let dir = data_dir().ok_or_else(|| {
            VocabError::config("Could not determine data directory (no home directory)")
        })?;
        Self::with_dir(dir)
    }

    /// Create a new file document store with a custom directory.
    pub fn with_dir(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();

        if !data_dir.exists() {
            fs::create_dir_all(&data_dir).map_err(|e| VocabError::storage(&data_dir, e))?;
        }

        Ok(Self { data_dir })
    }

    /// Directory holding the documents.
    pub fn dir(&self) -> &Path {
        &self.data_dir
    }

    /// Get the path for a document file.
    fn document_path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", key))
    }

    /// Get the path for a temp file used during atomic writes.
    fn temp_path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!(".{}.json.tmp", key))
    }

    /// Write a document atomically using temp file + rename.
    fn atomic_write(&self, key: &str, contents: &str) -> Result<()> {
        let final_path = self.document_path(key);
        let temp_path = self.temp_path(key);

        {
            let mut file =
                fs::File::create(&temp_path).map_err(|e| VocabError::storage(&temp_path, e))?;
            file.write_all(contents.as_bytes())
                .map_err(|e| VocabError::storage(&temp_path, e))?;
            file.sync_all()
                .map_err(|e| VocabError::storage(&temp_path, e))?;
        }

        // Rename temp file to final path (atomic on POSIX)
        fs::rename(&temp_path, &final_path).map_err(|e| VocabError::storage(&final_path, e))?;

        Ok(())
    }
}

impl DocumentStore for FileDocumentStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.document_path(key);

        if !path.exists() {
            return Ok(None);
        }

        read_to_string_limited(&path).map(Some)
    }

    fn put(&self, key: &str, contents: &str) -> Result<()> {
        self.atomic_write(key, contents)
    }

    fn delete(&self, key: &str) -> Result<()> {
        let path = self.document_path(key);

        if path.exists() {
            fs::remove_file(&path).map_err(|e| VocabError::storage(&path, e))?;
        }

        // Also clean up any temp file
        let temp_path = self.temp_path(key);
        if temp_path.exists() {
            let _ = fs::remove_file(&temp_path);
        }

        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        if !self.data_dir.exists() {
            return Ok(Vec::new());
        }

        let entries =
            fs::read_dir(&self.data_dir).map_err(|e| VocabError::storage(&self.data_dir, e))?;

        let mut keys = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| VocabError::storage(&self.data_dir, e))?;
            let path = entry.path();

            // Skip non-JSON files and temp files
            if path.extension().map(|e| e != "json").unwrap_or(true) {
                continue;
            }
            let Some(stem) = path.file_stem().map(|s| s.to_string_lossy().to_string()) else {
                continue;
            };
            if stem.starts_with('.') {
                continue;
            }
            keys.push(stem);
        }

        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::traits::tests::test_document_store_crud;
    use tempfile::TempDir;

    fn create_test_store() -> (FileDocumentStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = FileDocumentStore::with_dir(dir.path()).unwrap();
        (store, dir)
    }

    #[test]
    fn test_file_document_store_crud() {
        let (store, _dir) = create_test_store();
        test_document_store_crud(&store);
    }

    #[test]
    fn test_with_dir_creates_directory() {
        let dir = TempDir::new().unwrap();
        let data_path = dir.path().join("data");

        assert!(!data_path.exists());
        let _store = FileDocumentStore::with_dir(&data_path).unwrap();
        assert!(data_path.is_dir());
    }

    #[test]
    fn test_document_path() {
        let (store, _dir) = create_test_store();
        assert!(store.document_path("knowledge").ends_with("knowledge.json"));
    }

    #[test]
    fn test_temp_file_cleaned_up() {
        let (store, _dir) = create_test_store();
        store.put("knowledge", "{}").unwrap();
        assert!(!store.temp_path("knowledge").exists());
    }

    #[test]
    fn test_keys_ignore_temp_and_foreign_files() {
        let (store, dir) = create_test_store();
        store.put("knowledge", "{}").unwrap();

        fs::write(dir.path().join(".knowledge.json.tmp"), "{}").unwrap();
        fs::write(dir.path().join("notes.txt"), "hello").unwrap();

        assert_eq!(store.keys().unwrap(), vec!["knowledge".to_string()]);
    }

    #[test]
    fn test_get_returns_raw_contents_even_if_invalid() {
        let (store, dir) = create_test_store();
        fs::write(dir.path().join("knowledge.json"), "not valid json").unwrap();

        assert_eq!(
            store.get("knowledge").unwrap().as_deref(),
            Some("not valid json")
        );
    }
}
