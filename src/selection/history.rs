//! Per-category selection history.
//!
//! Each category keeps the word sequences of its most recent sessions,
//! oldest first. The history is independent of the knowledge document and
//! is only written when a session completes.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::WordId;
use crate::error::{FailOpen, Result, VocabError};
use crate::storage::{selection_history_key, DocumentStore};

/// Recently played sessions for one category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionHistory {
    /// Word sequences, oldest first.
    #[serde(default)]
    pub games: Vec<Vec<WordId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl SelectionHistory {
    /// Append one session, dropping the oldest beyond `depth`.
    pub fn push(&mut self, words: Vec<WordId>, depth: usize, now: DateTime<Utc>) {
        self.games.push(words);
        if self.games.len() > depth {
            let excess = self.games.len() - depth;
            self.games.drain(..excess);
        }
        self.last_updated = Some(now);
    }

    /// `sessions_ago` = 1 is the immediately previous session.
    pub fn session(&self, sessions_ago: usize) -> Option<&[WordId]> {
        if sessions_ago == 0 || sessions_ago > self.games.len() {
            return None;
        }
        Some(&self.games[self.games.len() - sessions_ago])
    }

    /// Words of the previous session.
    pub fn previous(&self) -> HashSet<&WordId> {
        self.session(1).into_iter().flatten().collect()
    }

    /// Words of sessions 2 through `window` ago.
    pub fn earlier(&self, window: usize) -> HashSet<&WordId> {
        (2..=window)
            .filter_map(|ago| self.session(ago))
            .flatten()
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

/// Loads and appends selection histories through a [`DocumentStore`].
pub struct SelectionHistoryStore<S: DocumentStore> {
    store: S,
    depth: usize,
}

impl<S: DocumentStore> SelectionHistoryStore<S> {
    pub fn new(store: S, depth: usize) -> Self {
        Self { store, depth }
    }

    /// Load a category's history. Missing or unreadable histories are empty.
    pub fn load(&self, category: &str) -> SelectionHistory {
        self.try_load(category)
            .fail_open_default("Failed to load selection history")
    }

    fn try_load(&self, category: &str) -> Result<SelectionHistory> {
        let key = selection_history_key(category);
        match self.store.get(&key)? {
            None => Ok(SelectionHistory::default()),
            Some(raw) => serde_json::from_str(&raw).map_err(|e| {
                VocabError::malformed_document(format!("selection history '{}': {}", category, e))
            }),
        }
    }

    /// Append a completed session's word sequence.
    pub fn record_session_completion(&self, word_ids: &[WordId], category: &str) -> Result<()> {
        let mut history = self.load(category);
        history.push(word_ids.to_vec(), self.depth, Utc::now());
        let json = serde_json::to_string_pretty(&history)?;
        self.store.put(&selection_history_key(category), &json)
    }
}
