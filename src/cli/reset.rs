//! Reset command for wordhoard.
//!
//! Explicitly wipes learner progress, or forgets a single word.

use serde::Serialize;

use crate::config::Config;
use crate::core::Vocabulary;
use crate::error::FailOpen;
use crate::knowledge::KnowledgeStore;
use crate::storage::{selection_history_key, DocumentStore};

/// Options for the reset command.
#[derive(Debug, Clone, Default)]
pub struct ResetOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Confirm a full reset.
    pub yes: bool,
    /// Forget only this word.
    pub word: Option<String>,
}

/// Output format for the reset command.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetOutput {
    /// Whether the command was successful.
    pub success: bool,
    /// Word that was forgotten, for single-word resets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forgotten: Option<String>,
    pub entries_removed: usize,
    pub histories_removed: usize,
    /// Error message if the reset failed or was refused.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResetOutput {
    /// Create a failed output.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            forgotten: None,
            entries_removed: 0,
            histories_removed: 0,
            error: Some(error.into()),
        }
    }
}

/// The reset command implementation.
pub struct ResetCommand<S: DocumentStore> {
    store: S,
    config: Config,
    vocabulary: Vocabulary,
}

impl<S: DocumentStore + Clone> ResetCommand<S> {
    /// Create a new reset command.
    pub fn new(store: S, config: Config, vocabulary: Vocabulary) -> Self {
        Self {
            store,
            config,
            vocabulary,
        }
    }

    /// Run the reset command.
    pub fn run(&self, options: &ResetOptions) -> ResetOutput {
        if let Some(word) = &options.word {
            return self.forget(word);
        }

        if !options.yes {
            return ResetOutput::failure("refusing to reset all progress without --yes");
        }

        let mut knowledge =
            KnowledgeStore::open(self.store.clone(), &self.vocabulary, &self.config);
        let entries_removed = knowledge.document().entries.len();
        if let Err(err) = knowledge.reset() {
            return ResetOutput::failure(err.to_string());
        }

        let histories_removed = self.clear_selection_histories();

        ResetOutput {
            success: true,
            forgotten: None,
            entries_removed,
            histories_removed,
            error: None,
        }
    }

    fn forget(&self, word: &str) -> ResetOutput {
        let mut knowledge =
            KnowledgeStore::open(self.store.clone(), &self.vocabulary, &self.config);
        match knowledge.forget(word) {
            Ok(removed) => ResetOutput {
                success: true,
                forgotten: Some(word.to_string()),
                entries_removed: usize::from(removed),
                histories_removed: 0,
                error: None,
            },
            Err(err) => ResetOutput::failure(err.to_string()),
        }
    }

    fn clear_selection_histories(&self) -> usize {
        let prefix = selection_history_key("");
        let keys = self
            .store
            .keys()
            .fail_open_default("Failed to list selection histories");

        let mut removed = 0;
        for key in keys.iter().filter(|k| k.starts_with(&prefix)) {
            match self.store.delete(key) {
                Ok(()) => removed += 1,
                Err(e) => tracing::warn!("Failed to delete {}: {}", key, e),
            }
        }
        removed
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &ResetOutput, options: &ResetOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            self.format_human_readable(output)
        }
    }

    fn format_human_readable(&self, output: &ResetOutput) -> String {
        if let Some(error) = &output.error {
            return format!("Reset failed: {}\n", error);
        }

        match &output.forgotten {
            Some(word) if output.entries_removed > 0 => format!("Forgot '{}'.\n", word),
            Some(word) => format!("No knowledge recorded for '{}'.\n", word),
            None => format!(
                "Reset {} entries and {} selection histories.\n",
                output.entries_removed, output.histories_removed
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::game::{parse_result, GameCommand, GameOptions};
    use crate::core::VocabularyWord;
    use crate::storage::{MemoryDocumentStore, KNOWLEDGE_KEY};
    use std::sync::Arc;

    fn vocabulary() -> Vocabulary {
        Vocabulary::new(vec![
            VocabularyWord::new("perro").with_category("animals"),
            VocabularyWord::new("gato").with_category("animals"),
        ])
    }

    fn played_store() -> Arc<MemoryDocumentStore> {
        let store = Arc::new(MemoryDocumentStore::new());
        let game = GameCommand::new(Arc::clone(&store), Config::default(), vocabulary());
        let results = vec![
            parse_result("perro=good").unwrap(),
            parse_result("gato=hard").unwrap(),
        ];
        let options = GameOptions {
            category: "animals".to_string(),
            ..Default::default()
        };
        assert!(game.run(&results, &options).success);
        store
    }

    #[test]
    fn test_reset_requires_confirmation() {
        let store = played_store();
        let writes = store.write_count();
        let cmd = ResetCommand::new(Arc::clone(&store), Config::default(), vocabulary());

        let output = cmd.run(&ResetOptions::default());
        assert!(!output.success);
        assert_eq!(store.write_count(), writes);
    }

    #[test]
    fn test_reset_all() {
        let store = played_store();
        let cmd = ResetCommand::new(Arc::clone(&store), Config::default(), vocabulary());
        let options = ResetOptions {
            yes: true,
            ..Default::default()
        };

        let output = cmd.run(&options);
        assert!(output.success);
        assert_eq!(output.entries_removed, 2);
        assert_eq!(output.histories_removed, 1);
        assert_eq!(store.keys().unwrap(), vec![KNOWLEDGE_KEY.to_string()]);

        let knowledge = KnowledgeStore::open(Arc::clone(&store), &vocabulary(), &Config::default());
        assert!(knowledge.document().entries.is_empty());
        assert!(knowledge.document().history.is_empty());
    }

    #[test]
    fn test_forget_one_word() {
        let store = played_store();
        let cmd = ResetCommand::new(Arc::clone(&store), Config::default(), vocabulary());
        let options = ResetOptions {
            word: Some("perro".to_string()),
            ..Default::default()
        };

        let output = cmd.run(&options);
        assert!(output.success);
        assert_eq!(output.entries_removed, 1);
        assert_eq!(cmd.format_output(&output, &options), "Forgot 'perro'.\n");

        let again = cmd.run(&options);
        assert_eq!(again.entries_removed, 0);

        let knowledge = KnowledgeStore::open(Arc::clone(&store), &vocabulary(), &Config::default());
        assert!(knowledge.get_entry("perro").is_none());
        assert!(knowledge.get_entry("gato").is_some());
    }
}
