//! Aggregate statistics derived from the knowledge document.
//!
//! Everything here is a pure read over an already-loaded document.

use serde::Serialize;

use crate::core::{thresholds, Direction, KnowledgeDocument, Mode, Vocabulary, VocabularyLookup};

/// Counts for one (direction, mode) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeSummary {
    pub direction: Direction,
    pub mode: Mode,
    /// Entries in the document, practiced or not.
    pub total_entries: usize,
    /// Entries with at least one answer in this pair.
    pub practiced: usize,
    /// Practiced entries at or above the known threshold.
    pub known: usize,
    /// Practiced entries at or above the mastered threshold.
    pub mastered: usize,
    /// Practiced entries below the weak threshold.
    pub weak: usize,
    /// Mean score over practiced entries, 0 when none.
    pub mean_score: f64,
    /// Sessions played in this mode.
    pub sessions: u32,
}

impl KnowledgeSummary {
    pub fn compute(document: &KnowledgeDocument, direction: Direction, mode: Mode) -> Self {
        let mut summary = Self {
            direction,
            mode,
            total_entries: document.entries.len(),
            practiced: 0,
            known: 0,
            mastered: 0,
            weak: 0,
            mean_score: 0.0,
            sessions: document
                .meta
                .per_mode_session_counts
                .get(&mode)
                .copied()
                .unwrap_or(0),
        };

        let mut score_sum = 0u64;
        for entry in document.entries.values() {
            let stat = entry.stat(direction, mode);
            if !stat.is_practiced() {
                continue;
            }
            summary.practiced += 1;
            score_sum += stat.score as u64;
            if stat.is_known() {
                summary.known += 1;
            }
            if stat.is_mastered() {
                summary.mastered += 1;
            }
            if stat.is_weak() {
                summary.weak += 1;
            }
        }

        if summary.practiced > 0 {
            summary.mean_score = score_sum as f64 / summary.practiced as f64;
        }
        summary
    }
}

/// Share of the most frequent words a learner knows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopNCoverage {
    /// Requested size of the frequency band.
    pub n: usize,
    /// Ranked words actually available in the band.
    pub considered: usize,
    /// Words of the band at or above the known threshold.
    pub known: usize,
    /// `known / considered`, 0 for an empty band.
    pub ratio: f64,
}

/// Fraction of the `n` most frequent vocabulary words scored as known.
///
/// Document entries that no longer exist in the vocabulary cannot belong to
/// any frequency band and are skipped.
pub fn top_n_coverage(
    document: &KnowledgeDocument,
    vocabulary: &Vocabulary,
    n: usize,
    direction: Direction,
    mode: Mode,
) -> TopNCoverage {
    let orphaned = document
        .entries
        .keys()
        .filter(|id| vocabulary.word(id.as_str()).is_none())
        .count();
    if orphaned > 0 {
        tracing::debug!(orphaned, "entries outside the vocabulary skipped for coverage");
    }

    let band = vocabulary.top_ranked(n);
    let known = band
        .iter()
        .filter(|word| {
            document
                .stat(word.id.as_str(), direction, mode)
                .is_some_and(|s| s.is_practiced() && s.score >= thresholds::KNOWN)
        })
        .count();

    let ratio = if band.is_empty() {
        0.0
    } else {
        known as f64 / band.len() as f64
    };

    TopNCoverage {
        n,
        considered: band.len(),
        known,
        ratio,
    }
}
