//! Document storage traits for wordhoard.
//!
//! Persisted state is a handful of whole JSON documents addressed by key.
//! Stores deal in raw text so that callers decide how to react to a
//! document that no longer parses.

use std::sync::Arc;

use crate::error::Result;

/// Key of the knowledge document.
pub const KNOWLEDGE_KEY: &str = "knowledge";

/// Key of the selection history for one category.
///
/// Lowercase ASCII letters, digits and `-` are kept; every other byte of
/// the UTF-8 name is written as `_xx` hex. The mapping is injective, so
/// distinct category names never share a history, and keys stay valid
/// file names on case-insensitive file systems.
pub fn selection_history_key(category: &str) -> String {
    let mut key = String::from("selection-history-");
    for byte in category.bytes() {
        match byte {
            b'a'..=b'z' | b'0'..=b'9' | b'-' => key.push(byte as char),
            other => key.push_str(&format!("_{:02x}", other)),
        }
    }
    key
}

/// Trait for document storage backends.
///
/// Every `put` replaces the whole document; partial updates never reach the
/// persisted form.
pub trait DocumentStore: Send + Sync {
    /// Retrieve a document by key.
    ///
    /// Returns `Ok(None)` if the document doesn't exist.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace a document.
    fn put(&self, key: &str, contents: &str) -> Result<()>;

    /// Delete a document.
    ///
    /// Returns `Ok(())` even if the document doesn't exist.
    fn delete(&self, key: &str) -> Result<()>;

    /// List stored keys, sorted.
    fn keys(&self) -> Result<Vec<String>>;

    /// Check if a document exists.
    fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}

/// Blanket implementation so an `Arc`-shared store can be handed to several
/// components.
impl<T: DocumentStore + ?Sized> DocumentStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn put(&self, key: &str, contents: &str) -> Result<()> {
        (**self).put(key, contents)
    }

    fn delete(&self, key: &str) -> Result<()> {
        (**self).delete(key)
    }

    fn keys(&self) -> Result<Vec<String>> {
        (**self).keys()
    }
}
