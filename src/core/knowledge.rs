//! Knowledge document model.
//!
//! The document is the single writable snapshot of what a learner knows. It
//! is keyed by [`WordId`] and holds one [`DirectionalStat`] per
//! (direction, mode) pair for every practiced word sense.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::word::{Direction, Mode, Quality, WordId};

/// Schema version written by this crate.
///
/// Increment together with a new migration step.
pub const KNOWLEDGE_SCHEMA_VERSION: u32 = 3;

/// Score thresholds shared by statistics and selection.
pub mod thresholds {
    /// Upper bound of every score.
    pub const MAX_SCORE: u8 = 100;
    /// A word at or above this score counts as known.
    pub const KNOWN: u8 = 60;
    /// A word at or above this score counts as mastered.
    pub const MASTERED: u8 = 80;
    /// A practiced word below this score counts as weak.
    pub const WEAK: u8 = 40;
}

/// Practice statistics for one (direction, mode) pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DirectionalStat {
    /// Knowledge score in `[0, 100]`.
    pub score: u8,
    /// Number of recorded answers.
    pub practice_count: u32,
    /// Answers solved on the first attempt.
    pub first_try_count: u32,
    /// Answers solved on the second attempt.
    pub second_try_count: u32,
    /// Answers solved on the third attempt.
    pub third_try_count: u32,
    /// Answers never solved.
    pub failed_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_practiced_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_practiced_at: Option<DateTime<Utc>>,
    /// Passive exposures that were not graded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encounter_count: Option<u32>,
}

impl DirectionalStat {
    /// Apply one graded answer.
    ///
    /// The score moves by `delta` and is clamped to `[0, 100]`; exactly one
    /// try-bucket counter and `practice_count` are incremented.
    pub fn record(&mut self, quality: Quality, delta: i32, now: DateTime<Utc>) {
        let next = (self.score as i32 + delta).clamp(0, thresholds::MAX_SCORE as i32);
        self.score = next as u8;
        self.practice_count += 1;

        match quality {
            Quality::Perfect => self.first_try_count += 1,
            Quality::Good => self.second_try_count += 1,
            Quality::Hard => self.third_try_count += 1,
            Quality::Failed => self.failed_count += 1,
        }

        if self.first_practiced_at.is_none() {
            self.first_practiced_at = Some(now);
        }
        self.last_practiced_at = Some(now);
    }

    /// Count one ungraded exposure.
    pub fn encounter(&mut self) {
        *self.encounter_count.get_or_insert(0) += 1;
    }

    /// Whether any answer has been recorded.
    pub fn is_practiced(&self) -> bool {
        self.practice_count > 0
    }

    /// Practiced and at or above the known threshold.
    pub fn is_known(&self) -> bool {
        self.is_practiced() && self.score >= thresholds::KNOWN
    }

    /// Practiced and at or above the mastered threshold.
    pub fn is_mastered(&self) -> bool {
        self.is_practiced() && self.score >= thresholds::MASTERED
    }

    /// Practiced but below the weak threshold.
    pub fn is_weak(&self) -> bool {
        self.is_practiced() && self.score < thresholds::WEAK
    }

    /// Clamp a score that arrived from outside this crate.
    pub(crate) fn clamp_score(&mut self) {
        self.score = self.score.min(thresholds::MAX_SCORE);
    }
}

/// Stats for both directions within one mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DirectionPair {
    pub source_to_target: DirectionalStat,
    pub target_to_source: DirectionalStat,
}

impl DirectionPair {
    pub fn get(&self, direction: Direction) -> &DirectionalStat {
        match direction {
            Direction::SourceToTarget => &self.source_to_target,
            Direction::TargetToSource => &self.target_to_source,
        }
    }

    pub fn get_mut(&mut self, direction: Direction) -> &mut DirectionalStat {
        match direction {
            Direction::SourceToTarget => &mut self.source_to_target,
            Direction::TargetToSource => &mut self.target_to_source,
        }
    }
}

/// Everything known about one word sense.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KnowledgeEntry {
    pub standard: DirectionPair,
    pub simplified: DirectionPair,
}

impl KnowledgeEntry {
    /// Stats for a (direction, mode) pair.
    pub fn stat(&self, direction: Direction, mode: Mode) -> &DirectionalStat {
        self.mode(mode).get(direction)
    }

    /// Mutable stats for a (direction, mode) pair.
    pub fn stat_mut(&mut self, direction: Direction, mode: Mode) -> &mut DirectionalStat {
        match mode {
            Mode::Standard => self.standard.get_mut(direction),
            Mode::Simplified => self.simplified.get_mut(direction),
        }
    }

    /// Both directions of one mode.
    pub fn mode(&self, mode: Mode) -> &DirectionPair {
        match mode {
            Mode::Standard => &self.standard,
            Mode::Simplified => &self.simplified,
        }
    }

    /// Iterate every stat with its key.
    pub fn stats(&self) -> impl Iterator<Item = (Direction, Mode, &DirectionalStat)> {
        Mode::ALL.into_iter().flat_map(move |mode| {
            Direction::ALL
                .into_iter()
                .map(move |direction| (direction, mode, self.stat(direction, mode)))
        })
    }

    /// Total answers across every direction and mode.
    pub fn total_practice(&self) -> u32 {
        self.stats().map(|(_, _, s)| s.practice_count).sum()
    }

    fn clamp_scores(&mut self) {
        for mode in Mode::ALL {
            for direction in Direction::ALL {
                self.stat_mut(direction, mode).clamp_score();
            }
        }
    }
}

/// One graded item inside a session record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionItem {
    pub word_id: WordId,
    pub quality: Quality,
}

/// Immutable log entry for a completed game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub direction: Direction,
    pub mode: Mode,
    pub items: Vec<SessionItem>,
}

/// Document bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMeta {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub per_mode_session_counts: BTreeMap<Mode, u32>,
}

impl DocumentMeta {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            created_at: now,
            updated_at: now,
            per_mode_session_counts: BTreeMap::new(),
        }
    }
}

impl Default for DocumentMeta {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

/// The persisted knowledge document, current schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeDocument {
    pub schema_version: u32,
    #[serde(default)]
    pub entries: BTreeMap<WordId, KnowledgeEntry>,
    #[serde(default)]
    pub history: Vec<SessionRecord>,
    #[serde(default)]
    pub meta: DocumentMeta,
}

impl Default for KnowledgeDocument {
    fn default() -> Self {
        Self::empty(Utc::now())
    }
}

impl KnowledgeDocument {
    /// A fresh document at the current schema version.
    pub fn empty(now: DateTime<Utc>) -> Self {
        Self {
            schema_version: KNOWLEDGE_SCHEMA_VERSION,
            entries: BTreeMap::new(),
            history: Vec::new(),
            meta: DocumentMeta::new(now),
        }
    }

    /// Look up an entry.
    pub fn entry(&self, word_id: &str) -> Option<&KnowledgeEntry> {
        self.entries.get(word_id)
    }

    /// Look up the stat for one (direction, mode) pair.
    pub fn stat(&self, word_id: &str, direction: Direction, mode: Mode) -> Option<&DirectionalStat> {
        self.entry(word_id).map(|e| e.stat(direction, mode))
    }

    /// Append a session record, dropping the oldest beyond `limit`.
    pub fn push_history(&mut self, record: SessionRecord, limit: usize) {
        self.history.push(record);
        if self.history.len() > limit {
            let excess = self.history.len() - limit;
            self.history.drain(..excess);
        }
    }

    /// Enforce invariants on a document that was read from disk.
    pub(crate) fn normalize(&mut self, history_limit: usize) {
        for entry in self.entries.values_mut() {
            entry.clamp_scores();
        }
        if self.history.len() > history_limit {
            let excess = self.history.len() - history_limit;
            self.history.drain(..excess);
        }
    }
}
