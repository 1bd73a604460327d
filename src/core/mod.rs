//! Core types for wordhoard.
//!
//! Word identifiers, the knowledge document model, and the vocabulary
//! lookup collaborator shared by every other module.

pub mod knowledge;
pub mod vocabulary;
pub mod word;

pub use knowledge::{
    thresholds, DirectionPair, DirectionalStat, DocumentMeta, KnowledgeDocument, KnowledgeEntry,
    SessionItem, SessionRecord, KNOWLEDGE_SCHEMA_VERSION,
};
pub use vocabulary::{CefrLevel, Vocabulary, VocabularyLookup, VocabularyWord};
pub use word::{Direction, Mode, Quality, WordId, SENSE_SEPARATOR};
