//! Single-version migration steps.
//!
//! Each step is a pure function from one schema to the next. Steps leave
//! `history` and `meta` untouched unless introducing the new shape requires
//! changing them.

use std::collections::BTreeMap;

use crate::core::{
    DirectionPair, DirectionalStat, DocumentMeta, KnowledgeDocument, KnowledgeEntry, Mode,
    SessionRecord, VocabularyLookup, WordId,
};
use crate::migration::report::{MigrationDiagnostic, MigrationReport};
use crate::migration::schema::{DocumentV1, DocumentV2};

/// v1 → v2: introduce practice modes.
///
/// Existing stats become the `standard` mode; every historical session is
/// attributed to `standard` and counted in the per-mode session totals.
pub fn v1_to_v2(doc: DocumentV1) -> DocumentV2 {
    let entries = doc
        .words
        .into_iter()
        .map(|(surface, pair)| {
            let entry = KnowledgeEntry {
                standard: pair,
                simplified: DirectionPair::default(),
            };
            (surface, entry)
        })
        .collect();

    let history: Vec<SessionRecord> = doc
        .history
        .into_iter()
        .map(|record| SessionRecord {
            session_id: None,
            timestamp: record.timestamp,
            direction: record.direction,
            mode: Mode::Standard,
            items: record.items,
        })
        .collect();

    let mut meta = DocumentMeta {
        created_at: doc.meta.created_at,
        updated_at: doc.meta.updated_at,
        per_mode_session_counts: BTreeMap::new(),
    };
    if !history.is_empty() {
        meta.per_mode_session_counts
            .insert(Mode::Standard, history.len() as u32);
    }

    DocumentV2 {
        entries,
        history,
        meta,
    }
}

/// v2 → v3: re-key entries by sense-aware identifier.
///
/// For every legacy surface-form key the vocabulary is asked for all
/// canonical identifiers sharing that surface form:
/// - none: the word left the vocabulary; the entry is kept under its legacy
///   key and an unknown-word diagnostic is recorded.
/// - one: the entry moves to that identifier.
/// - several: practice cannot be attributed to a sense; the entry is dropped
///   and an ambiguous-word diagnostic is recorded.
///
/// Keys that already carry a sense qualifier are kept as they are.
pub fn v2_to_v3(
    doc: DocumentV2,
    vocabulary: &dyn VocabularyLookup,
    report: &mut MigrationReport,
) -> KnowledgeDocument {
    let mut entries: BTreeMap<WordId, KnowledgeEntry> = BTreeMap::new();

    for (key, entry) in doc.entries {
        let legacy = WordId::new(key);

        let target = if legacy.is_sense_qualified() {
            legacy.clone()
        } else {
            let senses = vocabulary.senses(legacy.as_str());
            match senses.as_slice() {
                [] => {
                    tracing::warn!(word_id = %legacy, "unknown word kept under legacy key");
                    report.push(MigrationDiagnostic::UnknownWord {
                        word_id: legacy.clone(),
                    });
                    legacy.clone()
                }
                [single] => single.id.clone(),
                several => {
                    let candidates: Vec<WordId> = several.iter().map(|w| w.id.clone()).collect();
                    tracing::warn!(
                        surface = %legacy,
                        senses = candidates.len(),
                        "ambiguous word, skipped"
                    );
                    report.push(MigrationDiagnostic::AmbiguousWord {
                        surface: legacy.as_str().to_string(),
                        candidates,
                    });
                    continue;
                }
            }
        };

        if target != legacy {
            report.remapped += 1;
        } else if vocabulary.word(target.as_str()).is_some() {
            report.unchanged += 1;
        }

        match entries.get_mut(&target) {
            Some(existing) => {
                tracing::warn!(from = %legacy, into = %target, "legacy entries collide, merging");
                merge_entry(existing, &entry);
                report.push(MigrationDiagnostic::Merged {
                    from: legacy,
                    into: target,
                });
            }
            None => {
                entries.insert(target, entry);
            }
        }
    }

    KnowledgeDocument {
        schema_version: 3,
        entries,
        history: doc.history,
        meta: doc.meta,
    }
}

fn merge_entry(into: &mut KnowledgeEntry, other: &KnowledgeEntry) {
    for (direction, mode, stat) in other.stats() {
        merge_stat(into.stat_mut(direction, mode), stat);
    }
}

/// Combine two stats for the same sense: counters add up, the score of the
/// more recently practiced side wins.
fn merge_stat(into: &mut DirectionalStat, other: &DirectionalStat) {
    if other.last_practiced_at > into.last_practiced_at {
        into.score = other.score;
    }
    into.practice_count += other.practice_count;
    into.first_try_count += other.first_try_count;
    into.second_try_count += other.second_try_count;
    into.third_try_count += other.third_try_count;
    into.failed_count += other.failed_count;

    into.first_practiced_at = match (into.first_practiced_at, other.first_practiced_at) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    };
    into.last_practiced_at = into.last_practiced_at.max(other.last_practiced_at);
    into.encounter_count = match (into.encounter_count, other.encounter_count) {
        (Some(a), Some(b)) => Some(a + b),
        (a, b) => a.or(b),
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Direction, SessionItem, Quality, Vocabulary, VocabularyWord};
    use crate::migration::schema::{MetaV1, SessionRecordV1};
    use chrono::{Duration, Utc};

    fn stat(score: u8, practice_count: u32) -> DirectionalStat {
        DirectionalStat {
            score,
            practice_count,
            ..Default::default()
        }
    }

    fn v2_with(keys: &[&str]) -> DocumentV2 {
        let mut entries = BTreeMap::new();
        for key in keys {
            let mut entry = KnowledgeEntry::default();
            entry.standard.source_to_target = stat(50, 2);
            entries.insert(key.to_string(), entry);
        }
        DocumentV2 {
            entries,
            history: vec![],
            meta: DocumentMeta::default(),
        }
    }

    fn vocabulary() -> Vocabulary {
        Vocabulary::new(vec![
            VocabularyWord::new("perro"),
            VocabularyWord::new("banco#bank"),
            VocabularyWord::new("tiempo#time"),
            VocabularyWord::new("tiempo#weather"),
        ])
    }

    #[test]
    fn test_v1_to_v2_moves_stats_to_standard() {
        let mut words = BTreeMap::new();
        words.insert(
            "perro".to_string(),
            DirectionPair {
                source_to_target: stat(70, 4),
                target_to_source: stat(20, 1),
            },
        );
        let v1 = DocumentV1 {
            words,
            history: vec![SessionRecordV1 {
                timestamp: Utc::now(),
                direction: Direction::SourceToTarget,
                items: vec![SessionItem {
                    word_id: WordId::new("perro"),
                    quality: Quality::Good,
                }],
            }],
            meta: MetaV1::default(),
        };

        let v2 = v1_to_v2(v1.clone());
        let entry = &v2.entries["perro"];
        assert_eq!(entry.standard.source_to_target.score, 70);
        assert_eq!(entry.standard.target_to_source.practice_count, 1);
        assert_eq!(entry.simplified, DirectionPair::default());

        assert_eq!(v2.history.len(), 1);
        assert_eq!(v2.history[0].mode, Mode::Standard);
        assert_eq!(v2.history[0].items, v1.history[0].items);
        assert_eq!(v2.meta.created_at, v1.meta.created_at);
        assert_eq!(v2.meta.per_mode_session_counts[&Mode::Standard], 1);
    }

    #[test]
    fn test_v2_to_v3_single_match_remaps() {
        let mut report = MigrationReport::new(2);
        let v3 = v2_to_v3(v2_with(&["banco", "perro"]), &vocabulary(), &mut report);

        assert!(v3.entries.contains_key("banco#bank"));
        assert!(v3.entries.contains_key("perro"));
        assert!(!v3.entries.contains_key("banco"));
        assert_eq!(report.remapped, 1);
        assert_eq!(report.unchanged, 1);
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn test_v2_to_v3_unknown_word_kept() {
        let mut report = MigrationReport::new(2);
        let v3 = v2_to_v3(v2_with(&["caballo"]), &vocabulary(), &mut report);

        assert!(v3.entries.contains_key("caballo"));
        assert_eq!(report.unknown_count(), 1);
    }

    #[test]
    fn test_v2_to_v3_ambiguous_dropped() {
        let mut report = MigrationReport::new(2);
        let v3 = v2_to_v3(v2_with(&["tiempo", "perro"]), &vocabulary(), &mut report);

        assert_eq!(v3.entries.len(), 1);
        assert!(!v3.entries.contains_key("tiempo#time"));
        assert!(!v3.entries.contains_key("tiempo#weather"));
        assert_eq!(report.ambiguous_count(), 1);
        match &report.diagnostics[0] {
            MigrationDiagnostic::AmbiguousWord { surface, candidates } => {
                assert_eq!(surface, "tiempo");
                assert_eq!(candidates.len(), 2);
            }
            other => panic!("unexpected diagnostic {:?}", other),
        }
    }

    #[test]
    fn test_v2_to_v3_keeps_sense_keys() {
        let mut report = MigrationReport::new(2);
        let v3 = v2_to_v3(v2_with(&["tiempo#weather"]), &vocabulary(), &mut report);

        assert!(v3.entries.contains_key("tiempo#weather"));
        assert_eq!(report.remapped, 0);
        assert_eq!(report.unchanged, 1);
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn test_v2_to_v3_merges_collisions() {
        let mut report = MigrationReport::new(2);
        // "banco" remaps onto an already sense-qualified key
        let v3 = v2_to_v3(
            v2_with(&["banco", "banco#bank"]),
            &vocabulary(),
            &mut report,
        );

        assert_eq!(v3.entries.len(), 1);
        assert_eq!(
            v3.entries["banco#bank"].standard.source_to_target.practice_count,
            4
        );
        assert_eq!(report.merged_count(), 1);
    }

    #[test]
    fn test_v2_to_v3_preserves_history_and_meta() {
        let mut doc = v2_with(&["perro"]);
        doc.history.push(SessionRecord {
            session_id: Some("s1".to_string()),
            timestamp: Utc::now(),
            direction: Direction::TargetToSource,
            mode: Mode::Simplified,
            items: vec![SessionItem {
                word_id: WordId::new("tiempo"),
                quality: Quality::Failed,
            }],
        });
        doc.meta.per_mode_session_counts.insert(Mode::Simplified, 1);

        let mut report = MigrationReport::new(2);
        let v3 = v2_to_v3(doc.clone(), &vocabulary(), &mut report);

        assert_eq!(v3.history, doc.history);
        assert_eq!(v3.meta, doc.meta);
    }

    #[test]
    fn test_merge_stat_prefers_recent_score() {
        let now = Utc::now();
        let mut older = DirectionalStat {
            score: 30,
            practice_count: 2,
            first_practiced_at: Some(now - Duration::days(10)),
            last_practiced_at: Some(now - Duration::days(5)),
            ..Default::default()
        };
        let newer = DirectionalStat {
            score: 75,
            practice_count: 3,
            first_practiced_at: Some(now - Duration::days(4)),
            last_practiced_at: Some(now),
            encounter_count: Some(2),
            ..Default::default()
        };

        merge_stat(&mut older, &newer);
        assert_eq!(older.score, 75);
        assert_eq!(older.practice_count, 5);
        assert_eq!(older.first_practiced_at, Some(now - Duration::days(10)));
        assert_eq!(older.last_practiced_at, Some(now));
        assert_eq!(older.encounter_count, Some(2));
    }
}
