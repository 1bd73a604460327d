//! Document storage for wordhoard.
//!
//! Persistent storage for the knowledge document and the per-category
//! selection histories, with file-based and in-memory backends.

pub mod file;
pub mod memory;
pub mod traits;

pub use file::FileDocumentStore;
pub use memory::MemoryDocumentStore;
pub use traits::{selection_history_key, DocumentStore, KNOWLEDGE_KEY};
