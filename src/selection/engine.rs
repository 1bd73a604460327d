//! Adaptive word selection.
//!
//! A selection runs five passes over the category pool:
//! 1. recency partition into previous-session, 2..window-ago, and fresh;
//! 2. quota fill, reserving a few slots for recent words and cascading
//!    when a bucket runs short, with repeats when the pool is smaller than
//!    the session;
//! 3. knowledge substitution, swapping some well-known words for weak or
//!    unpracticed ones;
//! 4. frequency substitution, raising the share of top-frequency words;
//! 5. a final shuffle.
//!
//! Randomness comes from an owned, seedable generator.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::config::SelectionConfig;
use crate::core::{Direction, KnowledgeDocument, Mode, VocabularyLookup, WordId};
use crate::selection::history::SelectionHistory;
use crate::selection::spacing;

/// Inputs of one selection.
pub struct SelectionRequest<'a> {
    /// Category-filtered candidates.
    pub pool: &'a [WordId],
    /// Number of words wanted.
    pub count: usize,
    pub history: &'a SelectionHistory,
    pub knowledge: &'a KnowledgeDocument,
    pub vocabulary: &'a dyn VocabularyLookup,
    pub direction: Direction,
    pub mode: Mode,
    /// Whether the frequency substitution pass runs.
    pub prioritize_frequency: bool,
}

/// Result of one selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionOutcome {
    pub words: Vec<WordId>,
    /// Well-known words replaced by weak or new ones.
    pub knowledge_substitutions: usize,
    /// Non-frequent words replaced by top-frequency ones.
    pub frequency_substitutions: usize,
    /// Slots filled by repeating words because the pool was too small.
    pub repeats: usize,
}

/// Selection engine with an owned random source.
pub struct SelectionEngine {
    config: SelectionConfig,
    rng: ChaCha8Rng,
}

impl SelectionEngine {
    /// Engine seeded from system entropy.
    pub fn new(config: SelectionConfig) -> Self {
        Self {
            config,
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Engine with a fixed seed, for reproducible sessions.
    pub fn with_seed(config: SelectionConfig, seed: u64) -> Self {
        Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    /// Choose `request.count` words.
    ///
    /// Returns exactly `count` words for a non-empty pool, repeating words
    /// when the pool is smaller. An empty pool yields an empty selection.
    pub fn select(&mut self, request: &SelectionRequest<'_>) -> SelectionOutcome {
        let pool = dedup(request.pool);
        if pool.is_empty() || request.count == 0 {
            if pool.is_empty() {
                tracing::warn!("selection requested from an empty candidate pool");
            }
            return SelectionOutcome::default();
        }

        let mut selected = self.fill_by_recency(&pool, request);
        let (knowledge_substitutions, protected) =
            self.substitute_known(&mut selected, &pool, request);

        let frequency_substitutions = if request.prioritize_frequency {
            self.substitute_infrequent(&mut selected, &pool, &protected, request)
        } else {
            0
        };

        let repeats = request.count.saturating_sub(selected.len());
        while selected.len() < request.count {
            let mut cycle = pool.clone();
            cycle.shuffle(&mut self.rng);
            let missing = request.count - selected.len();
            selected.extend(cycle.into_iter().take(missing));
        }

        selected.shuffle(&mut self.rng);
        selected.truncate(request.count);

        tracing::debug!(
            count = selected.len(),
            knowledge_substitutions,
            frequency_substitutions,
            repeats,
            "selection complete"
        );

        SelectionOutcome {
            words: selected,
            knowledge_substitutions,
            frequency_substitutions,
            repeats,
        }
    }

    /// Order a selected word set for presentation, repeating each word.
    pub fn build_session_queue(
        &mut self,
        words: &[WordId],
        repetitions: usize,
        min_distance: usize,
    ) -> Vec<WordId> {
        spacing::build_session_queue(words, repetitions, min_distance, &mut self.rng)
    }

    /// Distinct words chosen by recency bucket.
    fn fill_by_recency(&mut self, pool: &[WordId], request: &SelectionRequest<'_>) -> Vec<WordId> {
        let previous = request.history.previous();
        let earlier = request.history.earlier(self.config.recency_window);

        let mut previous_bucket = Vec::new();
        let mut earlier_bucket = Vec::new();
        let mut fresh_bucket = Vec::new();
        for word in pool {
            if previous.contains(word) {
                previous_bucket.push(word.clone());
            } else if earlier.contains(word) {
                earlier_bucket.push(word.clone());
            } else {
                fresh_bucket.push(word.clone());
            }
        }
        previous_bucket.shuffle(&mut self.rng);
        earlier_bucket.shuffle(&mut self.rng);
        fresh_bucket.shuffle(&mut self.rng);

        tracing::debug!(
            previous = previous_bucket.len(),
            earlier = earlier_bucket.len(),
            fresh = fresh_bucket.len(),
            "recency partition"
        );

        let target = request.count.min(pool.len());
        let quota = self.config.recent_quota(request.count);

        let mut selected = Vec::with_capacity(request.count);
        let mut previous_rest = previous_bucket.into_iter();
        let mut earlier_rest = earlier_bucket.into_iter();
        let mut fresh_rest = fresh_bucket.into_iter();

        selected.extend(previous_rest.by_ref().take(quota.min(target)));
        let room = target - selected.len();
        selected.extend(earlier_rest.by_ref().take(quota.min(room)));

        // cascade: fresh, then 2..window ago, then previous session
        for bucket in [&mut fresh_rest, &mut earlier_rest, &mut previous_rest] {
            let room = target - selected.len();
            selected.extend(bucket.by_ref().take(room));
        }
        selected
    }

    /// Replace part of the well-known selection with weak or unpracticed
    /// words. Returns the number replaced and the inserted words.
    fn substitute_known(
        &mut self,
        selected: &mut [WordId],
        pool: &[WordId],
        request: &SelectionRequest<'_>,
    ) -> (usize, HashSet<WordId>) {
        let mastery = self.config.mastery_threshold;
        let weak = self.config.weak_threshold;
        let stat_of = |word: &WordId| {
            request
                .knowledge
                .stat(word.as_str(), request.direction, request.mode)
        };

        let mut well_known: Vec<usize> = (0..selected.len())
            .filter(|&i| stat_of(&selected[i]).is_some_and(|s| s.is_practiced() && s.score >= mastery))
            .collect();
        if well_known.is_empty() {
            return (0, HashSet::new());
        }

        let chosen: HashSet<&WordId> = selected.iter().collect();
        let mut replacements: Vec<WordId> = pool
            .iter()
            .filter(|w| !chosen.contains(w))
            .filter(|&w| stat_of(w).is_none_or(|s| !s.is_practiced() || s.score < weak))
            .cloned()
            .collect();

        let wanted = ((well_known.len() as f64 * self.config.knowledge_substitution_ratio)
            .floor() as usize)
            .max(1);
        let count = wanted.min(replacements.len()).min(well_known.len());
        if count == 0 {
            return (0, HashSet::new());
        }

        well_known.shuffle(&mut self.rng);
        replacements.shuffle(&mut self.rng);

        let mut inserted = HashSet::new();
        for (&position, replacement) in well_known.iter().zip(replacements).take(count) {
            tracing::debug!(from = %selected[position], to = %replacement, "knowledge substitution");
            inserted.insert(replacement.clone());
            selected[position] = replacement;
        }
        (count, inserted)
    }

    /// Raise the share of top-frequency words when it is below target.
    fn substitute_infrequent(
        &mut self,
        selected: &mut [WordId],
        pool: &[WordId],
        protected: &HashSet<WordId>,
        request: &SelectionRequest<'_>,
    ) -> usize {
        if selected.is_empty() {
            return 0;
        }
        let limit = self.config.top_frequency_limit;
        let is_top = |word: &WordId| {
            if request.vocabulary.word(word.as_str()).is_none() {
                tracing::debug!(word_id = %word, "unknown word treated as infrequent");
                return false;
            }
            request.vocabulary.is_top_frequency(word.as_str(), limit)
        };

        let top_count = selected.iter().filter(|&w| is_top(w)).count();
        let ratio = top_count as f64 / selected.len() as f64;
        if ratio >= self.config.frequency_target_ratio {
            return 0;
        }

        let mut infrequent: Vec<usize> = (0..selected.len())
            .filter(|&i| !protected.contains(&selected[i]) && !is_top(&selected[i]))
            .collect();
        if infrequent.is_empty() {
            return 0;
        }

        let chosen: HashSet<&WordId> = selected.iter().collect();
        let mut replacements: Vec<WordId> = pool
            .iter()
            .filter(|&w| !chosen.contains(w) && is_top(w))
            .cloned()
            .collect();

        let wanted = ((infrequent.len() as f64 * self.config.frequency_substitution_ratio)
            .floor() as usize)
            .max(1);
        let count = wanted.min(replacements.len()).min(infrequent.len());
        if count == 0 {
            return 0;
        }

        infrequent.shuffle(&mut self.rng);
        replacements.shuffle(&mut self.rng);
        for (&position, replacement) in infrequent.iter().zip(replacements).take(count) {
            tracing::debug!(from = %selected[position], to = %replacement, "frequency substitution");
            selected[position] = replacement;
        }
        count
    }
}

/// Drop duplicate candidates, keeping the first occurrence.
fn dedup(pool: &[WordId]) -> Vec<WordId> {
    let mut seen = HashSet::new();
    pool.iter()
        .filter(|w| seen.insert(*w))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DirectionalStat, KnowledgeEntry, Vocabulary, VocabularyWord};
    use chrono::Utc;
    use proptest::prelude::*;
    use std::collections::HashMap;

    fn pool(n: usize) -> Vec<WordId> {
        (0..n).map(|i| WordId::new(format!("w{:02}", i))).collect()
    }

    fn vocabulary_for(words: &[WordId], top: usize) -> Vocabulary {
        Vocabulary::new(words.iter().enumerate().map(|(i, w)| {
            let rank = if i < top { i as u32 + 1 } else { 5000 + i as u32 };
            VocabularyWord::new(w.clone()).with_rank(rank)
        }))
    }

    fn knowledge_with(scores: &[(&WordId, u8)]) -> KnowledgeDocument {
        let mut doc = KnowledgeDocument::empty(Utc::now());
        for (word, score) in scores {
            let mut entry = KnowledgeEntry::default();
            *entry.stat_mut(Direction::SourceToTarget, Mode::Standard) = DirectionalStat {
                score: *score,
                practice_count: 4,
                ..Default::default()
            };
            doc.entries.insert((*word).clone(), entry);
        }
        doc
    }

    fn request<'a>(
        pool: &'a [WordId],
        count: usize,
        history: &'a SelectionHistory,
        knowledge: &'a KnowledgeDocument,
        vocabulary: &'a Vocabulary,
    ) -> SelectionRequest<'a> {
        SelectionRequest {
            pool,
            count,
            history,
            knowledge,
            vocabulary,
            direction: Direction::SourceToTarget,
            mode: Mode::Standard,
            prioritize_frequency: false,
        }
    }

    fn counts(words: &[WordId]) -> HashMap<&WordId, usize> {
        let mut counts = HashMap::new();
        for word in words {
            *counts.entry(word).or_insert(0) += 1;
        }
        counts
    }

    #[test]
    fn test_small_pool_repeats_every_word() {
        let words = pool(10);
        let vocabulary = vocabulary_for(&words, 10);
        let history = SelectionHistory::default();
        let knowledge = KnowledgeDocument::default();
        let mut engine = SelectionEngine::with_seed(SelectionConfig::default(), 1);

        let outcome = engine.select(&request(&words, 21, &history, &knowledge, &vocabulary));

        assert_eq!(outcome.words.len(), 21);
        assert_eq!(outcome.repeats, 11);
        let counts = counts(&outcome.words);
        for word in &words {
            assert!(counts[word] >= 2, "{} appeared {} times", word, counts[word]);
        }
    }

    #[test]
    fn test_empty_pool_returns_empty() {
        let vocabulary = Vocabulary::default();
        let history = SelectionHistory::default();
        let knowledge = KnowledgeDocument::default();
        let mut engine = SelectionEngine::with_seed(SelectionConfig::default(), 1);

        let outcome = engine.select(&request(&[], 10, &history, &knowledge, &vocabulary));
        assert!(outcome.words.is_empty());
    }

    #[test]
    fn test_large_pool_selects_distinct_words() {
        let words = pool(50);
        let vocabulary = vocabulary_for(&words, 50);
        let history = SelectionHistory::default();
        let knowledge = KnowledgeDocument::default();
        let mut engine = SelectionEngine::with_seed(SelectionConfig::default(), 3);

        let outcome = engine.select(&request(&words, 20, &history, &knowledge, &vocabulary));
        assert_eq!(outcome.words.len(), 20);
        assert_eq!(counts(&outcome.words).len(), 20);
        assert_eq!(outcome.repeats, 0);
    }

    #[test]
    fn test_recent_words_limited_to_quota() {
        let words = pool(40);
        let vocabulary = vocabulary_for(&words, 40);
        let knowledge = KnowledgeDocument::default();
        let mut history = SelectionHistory::default();
        // previous session played w00..w19
        history.push(words[..20].to_vec(), 10, Utc::now());
        let mut engine = SelectionEngine::with_seed(SelectionConfig::default(), 5);

        let outcome = engine.select(&request(&words, 20, &history, &knowledge, &vocabulary));
        let recent = outcome
            .words
            .iter()
            .filter(|w| words[..20].contains(w))
            .count();
        // quota min(2, 20 / 10) = 2
        assert_eq!(recent, 2);
    }

    #[test]
    fn test_short_fresh_bucket_cascades() {
        let words = pool(12);
        let vocabulary = vocabulary_for(&words, 12);
        let knowledge = KnowledgeDocument::default();
        let mut history = SelectionHistory::default();
        history.push(words[..6].to_vec(), 10, Utc::now());
        history.push(words[6..10].to_vec(), 10, Utc::now());
        let mut engine = SelectionEngine::with_seed(SelectionConfig::default(), 9);

        let outcome = engine.select(&request(&words, 12, &history, &knowledge, &vocabulary));
        assert_eq!(outcome.words.len(), 12);
        assert_eq!(counts(&outcome.words).len(), 12);
    }

    #[test]
    fn test_knowledge_substitution_uses_weak_or_new_words() {
        let words = pool(8);
        let vocabulary = vocabulary_for(&words, 8);
        let mut scores: Vec<(&WordId, u8)> = words[..4].iter().map(|w| (w, 90)).collect();
        scores.push((&words[4], 10));
        scores.push((&words[5], 60));
        let knowledge = knowledge_with(&scores);

        let mut config = SelectionConfig::default();
        config.knowledge_substitution_ratio = 1.0;
        let mut engine = SelectionEngine::with_seed(config, 2);

        // with no recency quota at this size, the fresh bucket is exactly
        // the four mastered words
        let mut history = SelectionHistory::default();
        history.push(words[4..].to_vec(), 10, Utc::now());
        let outcome = engine.select(&request(&words, 4, &history, &knowledge, &vocabulary));

        assert_eq!(outcome.words.len(), 4);
        assert_eq!(outcome.knowledge_substitutions, 3);
        // w05 (score 60) is neither weak nor new
        assert!(!outcome.words.contains(&words[5]));
        assert!(outcome.words.contains(&words[4]));
        assert!(outcome.words.contains(&words[6]));
        assert!(outcome.words.contains(&words[7]));
    }

    #[test]
    fn test_frequency_substitution_raises_top_share() {
        let words = pool(30);
        // only w00..w09 are top-frequency
        let vocabulary = vocabulary_for(&words, 10);
        let knowledge = KnowledgeDocument::default();
        let mut history = SelectionHistory::default();
        history.push(words[..10].to_vec(), 10, Utc::now());

        let mut engine = SelectionEngine::with_seed(SelectionConfig::default(), 4);
        let mut req = request(&words, 10, &history, &knowledge, &vocabulary);
        req.prioritize_frequency = true;
        let outcome = engine.select(&req);

        // recency quota picks 1 top word, the rest come from the infrequent tail
        let top = outcome
            .words
            .iter()
            .filter(|w| words[..10].contains(w))
            .count();
        assert!(outcome.frequency_substitutions >= 1);
        assert_eq!(top, 1 + outcome.frequency_substitutions);
    }

    #[test]
    fn test_frequency_pass_disabled() {
        let words = pool(30);
        let vocabulary = vocabulary_for(&words, 10);
        let knowledge = KnowledgeDocument::default();
        let mut history = SelectionHistory::default();
        history.push(words[..10].to_vec(), 10, Utc::now());

        let mut engine = SelectionEngine::with_seed(SelectionConfig::default(), 4);
        let outcome = engine.select(&request(&words, 10, &history, &knowledge, &vocabulary));
        assert_eq!(outcome.frequency_substitutions, 0);
    }

    #[test]
    fn test_same_seed_same_selection() {
        let words = pool(30);
        let vocabulary = vocabulary_for(&words, 30);
        let history = SelectionHistory::default();
        let knowledge = KnowledgeDocument::default();

        let first = SelectionEngine::with_seed(SelectionConfig::default(), 42)
            .select(&request(&words, 12, &history, &knowledge, &vocabulary));
        let second = SelectionEngine::with_seed(SelectionConfig::default(), 42)
            .select(&request(&words, 12, &history, &knowledge, &vocabulary));
        assert_eq!(first, second);
    }

    proptest! {
        #[test]
        fn prop_select_returns_exact_count(
            pool_size in 1usize..40,
            count in 1usize..45,
            seed in any::<u64>(),
            played in 0usize..4,
        ) {
            let words = pool(pool_size);
            let vocabulary = vocabulary_for(&words, pool_size / 2);
            let knowledge = knowledge_with(
                &words.iter().step_by(3).map(|w| (w, 90u8)).collect::<Vec<_>>(),
            );
            let mut history = SelectionHistory::default();
            for i in 0..played {
                let session: Vec<WordId> = words.iter().skip(i).step_by(2).cloned().collect();
                history.push(session, 10, Utc::now());
            }

            let mut engine = SelectionEngine::with_seed(SelectionConfig::default(), seed);
            let mut req = request(&words, count, &history, &knowledge, &vocabulary);
            req.prioritize_frequency = seed % 2 == 0;
            let outcome = engine.select(&req);

            prop_assert_eq!(outcome.words.len(), count);
            prop_assert!(outcome.words.iter().all(|w| words.contains(w)));
            if count <= pool_size {
                prop_assert_eq!(counts(&outcome.words).len(), count);
            }
        }
    }
}
