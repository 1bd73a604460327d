//! In-memory document storage for testing.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::Result;
use crate::storage::DocumentStore;

/// In-memory document store.
///
/// Documents are lost when the store is dropped.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    documents: RwLock<HashMap<String, String>>,
    /// Number of `put` calls, for asserting persistence behavior in tests.
    writes: RwLock<usize>,
    /// Number of `get` calls.
    reads: RwLock<usize>,
}

impl MemoryDocumentStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with one document.
    pub fn with_document(key: &str, contents: &str) -> Self {
        let store = Self::new();
        store
            .documents
            .write()
            .unwrap()
            .insert(key.to_string(), contents.to_string());
        store
    }

    /// Get the number of documents in the store.
    pub fn len(&self) -> usize {
        self.documents.read().unwrap().len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.documents.read().unwrap().is_empty()
    }

    /// Number of writes performed so far.
    pub fn write_count(&self) -> usize {
        *self.writes.read().unwrap()
    }

    /// Number of reads performed so far.
    pub fn read_count(&self) -> usize {
        *self.reads.read().unwrap()
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        *self.reads.write().unwrap() += 1;
        Ok(self.documents.read().unwrap().get(key).cloned())
    }

    fn put(&self, key: &str, contents: &str) -> Result<()> {
        self.documents
            .write()
            .unwrap()
            .insert(key.to_string(), contents.to_string());
        *self.writes.write().unwrap() += 1;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.documents.write().unwrap().remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys: Vec<String> = self.documents.read().unwrap().keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}
