//! wordhoard - vocabulary knowledge tracking for language-learning games
//!
//! wordhoard keeps a per-learner knowledge document (one score per word
//! sense, practice direction, and mode), upgrades legacy documents to the
//! current sense-aware schema, picks the words of each session with an
//! adaptive selection engine, and grades free-text answers.

pub mod answer;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod knowledge;
pub mod migration;
pub mod selection;
pub mod storage;
pub mod util;

pub use answer::{check_answer, AnswerVerdict};
pub use config::Config;
pub use core::{
    Direction, KnowledgeDocument, KnowledgeEntry, Mode, Quality, Vocabulary, VocabularyLookup,
    VocabularyWord, WordId, KNOWLEDGE_SCHEMA_VERSION,
};
pub use error::{Result, VocabError};
pub use knowledge::{top_n_coverage, KnowledgeStore, KnowledgeSummary, TopNCoverage};
pub use migration::{migrate, migrate_str, MigrationDiagnostic, MigrationReport};
pub use selection::{SelectionEngine, SelectionHistory, SelectionOutcome, SelectionRequest};
pub use storage::{DocumentStore, FileDocumentStore, MemoryDocumentStore};

// CLI commands
pub use cli::{
    CheckCommand, GameCommand, MigrateCommand, ResetCommand, SelectCommand, StatsCommand,
};
