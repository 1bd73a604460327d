//! The knowledge store.
//!
//! Owns the in-memory knowledge document for the lifetime of the process.
//! Answer recording mutates memory only; game completion and explicit
//! resets write the whole document back through the [`DocumentStore`].

use chrono::Utc;

use crate::config::{Config, ScoringConfig};
use crate::core::{
    Direction, KnowledgeDocument, KnowledgeEntry, Mode, Quality, SessionItem, SessionRecord,
    VocabularyLookup, WordId,
};
use crate::error::{FailOpen, Result};
use crate::knowledge::summary::KnowledgeSummary;
use crate::migration::{migrate_str, MigrationReport};
use crate::storage::{DocumentStore, KNOWLEDGE_KEY};

/// Key under which an unreadable knowledge document is preserved before
/// the store starts over.
pub const KNOWLEDGE_BACKUP_KEY: &str = "knowledge-backup";

/// Knowledge store over a document backend.
pub struct KnowledgeStore<S: DocumentStore> {
    store: S,
    document: KnowledgeDocument,
    scoring: ScoringConfig,
    history_limit: usize,
    migration: Option<MigrationReport>,
}

impl<S: DocumentStore> KnowledgeStore<S> {
    /// Load, migrate, and take ownership of the persisted document.
    ///
    /// Never fails. A missing document starts empty; an unreadable one is
    /// copied to [`KNOWLEDGE_BACKUP_KEY`] and replaced by an empty document.
    /// A migrated document is written back before this returns, so no
    /// caller ever observes a stale schema.
    pub fn open(store: S, vocabulary: &dyn VocabularyLookup, config: &Config) -> Self {
        let raw = store
            .get(KNOWLEDGE_KEY)
            .fail_open_default("Failed to read knowledge document");

        let (document, migration) = match raw {
            None => (KnowledgeDocument::empty(Utc::now()), None),
            Some(raw) => match migrate_str(&raw, vocabulary) {
                Ok((document, report)) => (document, Some(report)),
                Err(err) => {
                    tracing::warn!("knowledge document is malformed, starting fresh: {}", err);
                    store
                        .put(KNOWLEDGE_BACKUP_KEY, &raw)
                        .fail_open_default("Failed to back up malformed knowledge document");
                    (KnowledgeDocument::empty(Utc::now()), None)
                }
            },
        };
        let mut knowledge = Self::with_document(store, document, config);
        knowledge.migration = migration;

        if knowledge.migration.as_ref().is_some_and(|r| !r.is_noop()) {
            knowledge
                .save()
                .fail_open_default("Failed to persist migrated knowledge document");
        }

        knowledge
    }

    /// Take ownership of an already-migrated document without reading the
    /// backend. Nothing is written until the next mutation or [`save`].
    ///
    /// [`save`]: Self::save
    pub fn with_document(store: S, mut document: KnowledgeDocument, config: &Config) -> Self {
        let history_limit = config.knowledge.history_limit;
        document.normalize(history_limit);
        Self {
            store,
            document,
            scoring: config.scoring.clone(),
            history_limit,
            migration: None,
        }
    }

    /// Report of the migration run at load time, if a document was loaded.
    pub fn migration_report(&self) -> Option<&MigrationReport> {
        self.migration.as_ref()
    }

    /// The current in-memory document.
    pub fn document(&self) -> &KnowledgeDocument {
        &self.document
    }

    /// Read-only entry lookup. Unknown identifiers are simply absent.
    pub fn get_entry(&self, word_id: &str) -> Option<&KnowledgeEntry> {
        self.document.entry(word_id)
    }

    /// Record one graded answer in memory.
    pub fn record_answer(
        &mut self,
        word_id: impl Into<WordId>,
        direction: Direction,
        quality: Quality,
        mode: Mode,
    ) {
        let delta = self.scoring.delta(quality);
        self.document
            .entries
            .entry(word_id.into())
            .or_default()
            .stat_mut(direction, mode)
            .record(quality, delta, Utc::now());
    }

    /// Count one ungraded exposure in memory.
    pub fn record_encounter(&mut self, word_id: impl Into<WordId>, direction: Direction, mode: Mode) {
        self.document
            .entries
            .entry(word_id.into())
            .or_default()
            .stat_mut(direction, mode)
            .encounter();
    }

    /// Record a finished game and persist the document.
    ///
    /// Every result is applied as an answer, then one session record is
    /// appended to the bounded history.
    pub fn record_game(
        &mut self,
        session_id: Option<String>,
        direction: Direction,
        results: &[SessionItem],
        mode: Mode,
    ) -> Result<()> {
        for item in results {
            self.record_answer(item.word_id.clone(), direction, item.quality, mode);
        }

        let now = Utc::now();
        self.document.push_history(
            SessionRecord {
                session_id,
                timestamp: now,
                direction,
                mode,
                items: results.to_vec(),
            },
            self.history_limit,
        );
        *self
            .document
            .meta
            .per_mode_session_counts
            .entry(mode)
            .or_insert(0) += 1;
        self.document.meta.updated_at = now;

        self.save()
    }

    /// Explicit user reset: drop every entry and the session history.
    pub fn reset(&mut self) -> Result<()> {
        let now = Utc::now();
        self.document.entries.clear();
        self.document.history.clear();
        self.document.meta.per_mode_session_counts.clear();
        self.document.meta.updated_at = now;
        tracing::info!("knowledge document reset");
        self.save()
    }

    /// Remove one entry. Returns whether it existed.
    pub fn forget(&mut self, word_id: &str) -> Result<bool> {
        if self.document.entries.remove(word_id).is_none() {
            return Ok(false);
        }
        self.document.meta.updated_at = Utc::now();
        self.save()?;
        Ok(true)
    }

    /// Aggregate statistics for one (direction, mode) pair.
    pub fn summary(&self, direction: Direction, mode: Mode) -> KnowledgeSummary {
        KnowledgeSummary::compute(&self.document, direction, mode)
    }

    /// Write the whole document back.
    pub fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.document)?;
        self.store.put(KNOWLEDGE_KEY, &json)
    }
}
