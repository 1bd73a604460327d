//! Select command for wordhoard.
//!
//! Picks the words of the next session for a category. Selection does not
//! record anything; the session is only written to the selection history
//! when the game command reports it finished.

use serde::Serialize;

use crate::config::Config;
use crate::core::{Direction, Mode, Vocabulary, WordId};
use crate::error::VocabError;
use crate::knowledge::KnowledgeStore;
use crate::selection::{SelectionEngine, SelectionHistoryStore, SelectionRequest};
use crate::storage::DocumentStore;

/// Options for the select command.
#[derive(Debug, Clone)]
pub struct SelectOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    pub category: String,
    pub count: usize,
    pub direction: Direction,
    pub mode: Mode,
    /// Fixed random seed.
    pub seed: Option<u64>,
    /// Skip the frequency substitution pass.
    pub no_frequency: bool,
    /// Also produce a spaced presentation queue with this many repetitions.
    pub spaced: Option<usize>,
}

impl Default for SelectOptions {
    fn default() -> Self {
        Self {
            json: false,
            quiet: false,
            category: String::new(),
            count: 10,
            direction: Direction::SourceToTarget,
            mode: Mode::Standard,
            seed: None,
            no_frequency: false,
            spaced: None,
        }
    }
}

/// Output format for the select command.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectOutput {
    /// Whether a selection was produced.
    pub success: bool,
    pub category: String,
    pub words: Vec<WordId>,
    /// Presentation order, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue: Option<Vec<WordId>>,
    pub knowledge_substitutions: usize,
    pub frequency_substitutions: usize,
    pub repeats: usize,
    /// Error message if selection failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SelectOutput {
    /// Create a failed output.
    pub fn failure(category: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            category: category.into(),
            words: Vec::new(),
            queue: None,
            knowledge_substitutions: 0,
            frequency_substitutions: 0,
            repeats: 0,
            error: Some(error.into()),
        }
    }
}

/// The select command implementation.
pub struct SelectCommand<S: DocumentStore + Clone> {
    store: S,
    config: Config,
    vocabulary: Vocabulary,
}

impl<S: DocumentStore + Clone> SelectCommand<S> {
    /// Create a new select command.
    pub fn new(store: S, config: Config, vocabulary: Vocabulary) -> Self {
        Self {
            store,
            config,
            vocabulary,
        }
    }

    /// Run the select command.
    pub fn run(&self, options: &SelectOptions) -> SelectOutput {
        let pool = self.vocabulary.pool_for_category(&options.category);
        if pool.is_empty() {
            let err = VocabError::empty_candidate_pool(&options.category);
            tracing::warn!("{}", err);
            return SelectOutput::failure(&options.category, err.to_string());
        }

        let knowledge = KnowledgeStore::open(self.store.clone(), &self.vocabulary, &self.config);
        let histories =
            SelectionHistoryStore::new(self.store.clone(), self.config.selection.history_depth);
        let history = histories.load(&options.category);

        let selection = self.config.selection.clone();
        let mut engine = match options.seed {
            Some(seed) => SelectionEngine::with_seed(selection, seed),
            None => SelectionEngine::new(selection),
        };

        let request = SelectionRequest {
            pool: &pool,
            count: options.count,
            history: &history,
            knowledge: knowledge.document(),
            vocabulary: &self.vocabulary,
            direction: options.direction,
            mode: options.mode,
            prioritize_frequency: self.config.selection.prioritize_frequency
                && !options.no_frequency,
        };
        let outcome = engine.select(&request);

        let queue = options.spaced.map(|repetitions| {
            engine.build_session_queue(
                &outcome.words,
                repetitions,
                self.config.spacing.min_distance,
            )
        });

        SelectOutput {
            success: true,
            category: options.category.clone(),
            words: outcome.words,
            queue,
            knowledge_substitutions: outcome.knowledge_substitutions,
            frequency_substitutions: outcome.frequency_substitutions,
            repeats: outcome.repeats,
            error: None,
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &SelectOutput, options: &SelectOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            self.format_human_readable(output)
        }
    }

    fn format_human_readable(&self, output: &SelectOutput) -> String {
        if !output.success {
            return format!(
                "Selection failed: {}\n",
                output.error.as_deref().unwrap_or("unknown error")
            );
        }

        let mut text = format!(
            "{} words for '{}':\n",
            output.words.len(),
            output.category
        );
        for word in &output.words {
            text.push_str(&format!("  {}\n", word));
        }
        if let Some(queue) = &output.queue {
            let order: Vec<&str> = queue.iter().map(WordId::as_str).collect();
            text.push_str(&format!("Queue: {}\n", order.join(" ")));
        }
        text.push_str(&format!(
            "Substitutions: {} knowledge, {} frequency; {} repeats\n",
            output.knowledge_substitutions, output.frequency_substitutions, output.repeats
        ));
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::VocabularyWord;
    use crate::selection::is_spaced;
    use crate::storage::MemoryDocumentStore;
    use std::sync::Arc;

    fn vocabulary() -> Vocabulary {
        Vocabulary::new((0..12).map(|i| {
            VocabularyWord::new(format!("animal{}", i))
                .with_rank(i + 1)
                .with_category("animals")
        }))
    }

    fn options(count: usize) -> SelectOptions {
        SelectOptions {
            category: "animals".to_string(),
            count,
            seed: Some(17),
            ..Default::default()
        }
    }

    #[test]
    fn test_select_basic() {
        let store = Arc::new(MemoryDocumentStore::new());
        let cmd = SelectCommand::new(Arc::clone(&store), Config::default(), vocabulary());

        let output = cmd.run(&options(8));
        assert!(output.success);
        assert_eq!(output.words.len(), 8);
        assert!(output.queue.is_none());
        // selection alone writes nothing
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn test_select_unknown_category() {
        let cmd = SelectCommand::new(
            Arc::new(MemoryDocumentStore::new()),
            Config::default(),
            vocabulary(),
        );
        let mut opts = options(5);
        opts.category = "food".to_string();

        let output = cmd.run(&opts);
        assert!(!output.success);
        assert!(output.error.unwrap().contains("empty candidate pool"));
    }

    #[test]
    fn test_select_with_queue() {
        let cmd = SelectCommand::new(
            Arc::new(MemoryDocumentStore::new()),
            Config::default(),
            vocabulary(),
        );
        let mut opts = options(6);
        opts.spaced = Some(2);

        let output = cmd.run(&opts);
        let queue = output.queue.unwrap();
        assert_eq!(queue.len(), 12);
        assert!(is_spaced(&queue, Config::default().spacing.min_distance));
    }

    #[test]
    fn test_select_same_seed_is_reproducible() {
        let cmd = SelectCommand::new(
            Arc::new(MemoryDocumentStore::new()),
            Config::default(),
            vocabulary(),
        );
        assert_eq!(cmd.run(&options(5)).words, cmd.run(&options(5)).words);
    }

    #[test]
    fn test_format_human_readable() {
        let cmd = SelectCommand::new(
            Arc::new(MemoryDocumentStore::new()),
            Config::default(),
            vocabulary(),
        );
        let opts = options(3);
        let output = cmd.run(&opts);
        let text = cmd.format_output(&output, &opts);
        assert!(text.starts_with("3 words for 'animals':"));
        assert!(text.contains("Substitutions:"));
    }
}
