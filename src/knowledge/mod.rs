//! Knowledge tracking for wordhoard.
//!
//! The [`KnowledgeStore`] is the only writer of the knowledge document;
//! [`summary`] derives read-only statistics from it.

pub mod store;
pub mod summary;

pub use store::{KnowledgeStore, KNOWLEDGE_BACKUP_KEY};
pub use summary::{top_n_coverage, KnowledgeSummary, TopNCoverage};
