//! Game command for wordhoard.
//!
//! Records a finished game: every graded word goes into the knowledge
//! document as one session, and the word sequence is appended to the
//! category's selection history.

use serde::Serialize;

use crate::config::Config;
use crate::core::{Direction, Mode, Quality, SessionItem, Vocabulary, VocabularyLookup, WordId};
use crate::error::{FailOpen, Result, VocabError};
use crate::knowledge::KnowledgeStore;
use crate::selection::SelectionHistoryStore;
use crate::storage::DocumentStore;

/// Parse a `word=quality` pair.
pub fn parse_result(spec: &str) -> Result<SessionItem> {
    let (word, quality) = spec.rsplit_once('=').ok_or_else(|| {
        VocabError::config(format!("expected word=quality, got '{}'", spec))
    })?;
    let word = word.trim();
    if word.is_empty() {
        return Err(VocabError::config(format!("missing word in '{}'", spec)));
    }
    let quality: Quality = quality.trim().parse().map_err(VocabError::config)?;
    Ok(SessionItem {
        word_id: WordId::new(word),
        quality,
    })
}

/// Options for the game command.
#[derive(Debug, Clone)]
pub struct GameOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    pub category: String,
    pub direction: Direction,
    pub mode: Mode,
    pub session_id: Option<String>,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            json: false,
            quiet: false,
            category: String::new(),
            direction: Direction::SourceToTarget,
            mode: Mode::Standard,
            session_id: None,
        }
    }
}

/// Score of one word after the game.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WordScore {
    pub word_id: WordId,
    pub quality: Quality,
    pub score: u8,
}

/// Output format for the game command.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameOutput {
    /// Whether the game was recorded.
    pub success: bool,
    pub category: String,
    pub scores: Vec<WordScore>,
    /// Words not in the vocabulary, left unrecorded.
    pub skipped: Vec<WordId>,
    /// Error message if recording failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GameOutput {
    /// Create a failed output.
    pub fn failure(category: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            category: category.into(),
            scores: Vec::new(),
            skipped: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// The game command implementation.
pub struct GameCommand<S: DocumentStore + Clone> {
    store: S,
    config: Config,
    vocabulary: Vocabulary,
}

impl<S: DocumentStore + Clone> GameCommand<S> {
    /// Create a new game command.
    pub fn new(store: S, config: Config, vocabulary: Vocabulary) -> Self {
        Self {
            store,
            config,
            vocabulary,
        }
    }

    /// Record the graded words of one game.
    pub fn run(&self, results: &[SessionItem], options: &GameOptions) -> GameOutput {
        let (known, skipped): (Vec<SessionItem>, Vec<SessionItem>) = results
            .iter()
            .cloned()
            .partition(|item| self.vocabulary.word(item.word_id.as_str()).is_some());
        for item in &skipped {
            tracing::warn!("{}, not recorded", VocabError::unknown_word(item.word_id.as_str()));
        }

        if known.is_empty() {
            return GameOutput::failure(&options.category, "no known words to record");
        }

        let mut knowledge =
            KnowledgeStore::open(self.store.clone(), &self.vocabulary, &self.config);
        if let Err(err) = knowledge.record_game(
            options.session_id.clone(),
            options.direction,
            &known,
            options.mode,
        ) {
            return GameOutput::failure(&options.category, err.to_string());
        }

        let played: Vec<WordId> = known.iter().map(|item| item.word_id.clone()).collect();
        SelectionHistoryStore::new(self.store.clone(), self.config.selection.history_depth)
            .record_session_completion(&played, &options.category)
            .fail_open_default("Failed to record selection history");

        let scores = known
            .iter()
            .map(|item| WordScore {
                word_id: item.word_id.clone(),
                quality: item.quality,
                score: knowledge
                    .document()
                    .stat(item.word_id.as_str(), options.direction, options.mode)
                    .map_or(0, |s| s.score),
            })
            .collect();

        GameOutput {
            success: true,
            category: options.category.clone(),
            scores,
            skipped: skipped.into_iter().map(|item| item.word_id).collect(),
            error: None,
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &GameOutput, options: &GameOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            self.format_human_readable(output)
        }
    }

    fn format_human_readable(&self, output: &GameOutput) -> String {
        if !output.success {
            return format!(
                "Game not recorded: {}\n",
                output.error.as_deref().unwrap_or("unknown error")
            );
        }

        let mut text = format!("Recorded {} words:\n", output.scores.len());
        for score in &output.scores {
            text.push_str(&format!(
                "  {:<24} {:<8} {:>3}\n",
                score.word_id.as_str(),
                score.quality.as_str(),
                score.score
            ));
        }
        if !output.skipped.is_empty() {
            let skipped: Vec<&str> = output.skipped.iter().map(WordId::as_str).collect();
            text.push_str(&format!("Skipped unknown: {}\n", skipped.join(", ")));
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::VocabularyWord;
    use crate::storage::{MemoryDocumentStore, KNOWLEDGE_KEY};
    use std::sync::Arc;

    fn vocabulary() -> Vocabulary {
        Vocabulary::new(vec![
            VocabularyWord::new("perro").with_category("animals"),
            VocabularyWord::new("gato").with_category("animals"),
        ])
    }

    fn options() -> GameOptions {
        GameOptions {
            category: "animals".to_string(),
            session_id: Some("g1".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_result() {
        let item = parse_result("tiempo#weather=good").unwrap();
        assert_eq!(item.word_id, WordId::new("tiempo#weather"));
        assert_eq!(item.quality, Quality::Good);

        assert!(parse_result("perro").is_err());
        assert!(parse_result("=good").is_err());
        assert!(parse_result("perro=great").is_err());
    }

    #[test]
    fn test_game_records_knowledge_and_history() {
        let store = Arc::new(MemoryDocumentStore::new());
        let cmd = GameCommand::new(Arc::clone(&store), Config::default(), vocabulary());
        let results = vec![
            parse_result("perro=perfect").unwrap(),
            parse_result("gato=failed").unwrap(),
        ];

        let output = cmd.run(&results, &options());
        assert!(output.success);
        assert_eq!(output.scores.len(), 2);
        assert_eq!(output.scores[0].score, 12);
        assert_eq!(output.scores[1].score, 0);

        assert!(store.exists(KNOWLEDGE_KEY).unwrap());
        let history = SelectionHistoryStore::new(Arc::clone(&store), 10).load("animals");
        assert_eq!(
            history.games,
            vec![vec![WordId::new("perro"), WordId::new("gato")]]
        );
    }

    #[test]
    fn test_game_skips_unknown_words() {
        let store = Arc::new(MemoryDocumentStore::new());
        let cmd = GameCommand::new(Arc::clone(&store), Config::default(), vocabulary());
        let results = vec![
            parse_result("perro=good").unwrap(),
            parse_result("caballo=good").unwrap(),
        ];

        let output = cmd.run(&results, &options());
        assert!(output.success);
        assert_eq!(output.scores.len(), 1);
        assert_eq!(output.skipped, vec![WordId::new("caballo")]);
    }

    #[test]
    fn test_game_with_only_unknown_words_fails() {
        let store = Arc::new(MemoryDocumentStore::new());
        let cmd = GameCommand::new(Arc::clone(&store), Config::default(), vocabulary());

        let output = cmd.run(&[parse_result("caballo=good").unwrap()], &options());
        assert!(!output.success);
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn test_format_human_readable() {
        let cmd = GameCommand::new(
            Arc::new(MemoryDocumentStore::new()),
            Config::default(),
            vocabulary(),
        );
        let opts = options();
        let output = cmd.run(&[parse_result("perro=hard").unwrap()], &opts);
        let text = cmd.format_output(&output, &opts);
        assert!(text.starts_with("Recorded 1 words:"));
        assert!(text.contains("perro"));
    }
}
