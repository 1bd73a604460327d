//! Vocabulary lookup collaborator.
//!
//! The vocabulary is owned outside the knowledge core. Migration asks it
//! which canonical identifiers share a surface form; selection asks it for
//! frequency ranks.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::word::WordId;
use crate::error::{Result, VocabError};
use crate::util::read_to_string_limited;

/// CEFR proficiency level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CefrLevel {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

impl CefrLevel {
    /// Estimate a level from a corpus frequency rank.
    pub fn estimate_from_rank(rank: u32) -> Self {
        match rank {
            0..=500 => Self::A1,
            501..=1500 => Self::A2,
            1501..=3000 => Self::B1,
            3001..=5000 => Self::B2,
            5001..=8000 => Self::C1,
            _ => Self::C2,
        }
    }
}

impl fmt::Display for CefrLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::A1 => "A1",
            Self::A2 => "A2",
            Self::B1 => "B1",
            Self::B2 => "B2",
            Self::C1 => "C1",
            Self::C2 => "C2",
        };
        f.write_str(s)
    }
}

/// One canonical vocabulary item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyWord {
    pub id: WordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_rank: Option<u32>,
    #[serde(default, rename = "cefrLevel", skip_serializing_if = "Option::is_none")]
    pub cefr: Option<CefrLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl VocabularyWord {
    pub fn new(id: impl Into<WordId>) -> Self {
        Self {
            id: id.into(),
            frequency_rank: None,
            cefr: None,
            category: None,
        }
    }

    pub fn with_rank(mut self, rank: u32) -> Self {
        self.frequency_rank = Some(rank);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Explicit CEFR level, or the estimate from the frequency rank.
    pub fn effective_cefr(&self) -> Option<CefrLevel> {
        self.cefr
            .or_else(|| self.frequency_rank.map(CefrLevel::estimate_from_rank))
    }

    /// Whether the word ranks within the `limit` most frequent.
    pub fn is_within_top(&self, limit: u32) -> bool {
        self.frequency_rank.is_some_and(|rank| rank <= limit)
    }
}

/// Read-only access to the current vocabulary.
pub trait VocabularyLookup {
    /// All canonical identifiers whose surface form equals `surface`.
    fn senses(&self, surface: &str) -> Vec<&VocabularyWord>;

    /// Metadata for one identifier.
    fn word(&self, id: &str) -> Option<&VocabularyWord>;

    /// Whether the identifier is within the `limit` most frequent words.
    fn is_top_frequency(&self, id: &str, limit: u32) -> bool {
        self.word(id).is_some_and(|w| w.is_within_top(limit))
    }
}

#[derive(Debug, Deserialize)]
struct VocabularyFile {
    words: Vec<VocabularyWord>,
}

/// In-memory vocabulary indexed by identifier and by surface form.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    words: Vec<VocabularyWord>,
    by_id: HashMap<WordId, usize>,
    by_surface: HashMap<String, Vec<usize>>,
}

impl Vocabulary {
    /// Build a vocabulary from a word list. Later duplicates are ignored.
    pub fn new(words: impl IntoIterator<Item = VocabularyWord>) -> Self {
        let mut vocabulary = Self::default();
        for word in words {
            if vocabulary.by_id.contains_key(&word.id) {
                tracing::debug!(word_id = %word.id, "duplicate vocabulary entry ignored");
                continue;
            }
            let index = vocabulary.words.len();
            vocabulary.by_id.insert(word.id.clone(), index);
            vocabulary
                .by_surface
                .entry(word.id.surface().to_string())
                .or_default()
                .push(index);
            vocabulary.words.push(word);
        }
        vocabulary
    }

    /// Load a vocabulary JSON file (`{ "words": [...] }`).
    pub fn load(path: &Path) -> Result<Self> {
        let content = read_to_string_limited(path)?;
        let file: VocabularyFile = serde_json::from_str(&content).map_err(|e| {
            VocabError::vocabulary(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        Ok(Self::new(file.words))
    }

    /// Number of words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the vocabulary has no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// All words in file order.
    pub fn words(&self) -> &[VocabularyWord] {
        &self.words
    }

    /// Identifiers belonging to a category, in file order.
    pub fn pool_for_category(&self, category: &str) -> Vec<WordId> {
        self.words
            .iter()
            .filter(|w| w.category.as_deref() == Some(category))
            .map(|w| w.id.clone())
            .collect()
    }

    /// The `n` most frequent ranked words, most frequent first.
    pub fn top_ranked(&self, n: usize) -> Vec<&VocabularyWord> {
        let mut ranked: Vec<&VocabularyWord> = self
            .words
            .iter()
            .filter(|w| w.frequency_rank.is_some())
            .collect();
        ranked.sort_by_key(|w| w.frequency_rank);
        ranked.truncate(n);
        ranked
    }
}

impl VocabularyLookup for Vocabulary {
    fn senses(&self, surface: &str) -> Vec<&VocabularyWord> {
        self.by_surface
            .get(surface)
            .map(|indices| indices.iter().map(|&i| &self.words[i]).collect())
            .unwrap_or_default()
    }

    fn word(&self, id: &str) -> Option<&VocabularyWord> {
        self.by_id.get(id).map(|&i| &self.words[i])
    }
}
