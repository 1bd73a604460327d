//! Stats command for wordhoard.
//!
//! Displays knowledge statistics for one (direction, mode) pair and the
//! learner's coverage of the most frequent words.

use serde::Serialize;

use crate::config::Config;
use crate::core::{Direction, Mode, Vocabulary};
use crate::knowledge::{top_n_coverage, KnowledgeStore, KnowledgeSummary, TopNCoverage};
use crate::storage::DocumentStore;

/// Options for the stats command.
#[derive(Debug, Clone)]
pub struct StatsOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    pub direction: Direction,
    pub mode: Mode,
    /// Size of the frequency band for coverage.
    pub top: usize,
}

impl Default for StatsOptions {
    fn default() -> Self {
        Self {
            json: false,
            quiet: false,
            direction: Direction::SourceToTarget,
            mode: Mode::Standard,
            top: 1000,
        }
    }
}

/// Output format for the stats command.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsOutput {
    /// Whether stats were computed.
    pub success: bool,
    pub summary: KnowledgeSummary,
    pub coverage: TopNCoverage,
    /// Session records kept in the document.
    pub history_len: usize,
}

/// The stats command implementation.
pub struct StatsCommand<S: DocumentStore> {
    store: S,
    config: Config,
    vocabulary: Vocabulary,
}

impl<S: DocumentStore + Clone> StatsCommand<S> {
    /// Create a new stats command.
    pub fn new(store: S, config: Config, vocabulary: Vocabulary) -> Self {
        Self {
            store,
            config,
            vocabulary,
        }
    }

    /// Run the stats command.
    pub fn run(&self, options: &StatsOptions) -> StatsOutput {
        let knowledge = KnowledgeStore::open(self.store.clone(), &self.vocabulary, &self.config);
        let document = knowledge.document();

        StatsOutput {
            success: true,
            summary: knowledge.summary(options.direction, options.mode),
            coverage: top_n_coverage(
                document,
                &self.vocabulary,
                options.top,
                options.direction,
                options.mode,
            ),
            history_len: document.history.len(),
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &StatsOutput, options: &StatsOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            self.format_human_readable(output)
        }
    }

    fn format_human_readable(&self, output: &StatsOutput) -> String {
        let summary = &output.summary;
        let coverage = &output.coverage;
        let mut text = String::new();

        text.push_str(&format!(
            "Knowledge ({}, {})\n",
            summary.direction, summary.mode
        ));
        text.push_str(&format!("  Entries:    {}\n", summary.total_entries));
        text.push_str(&format!("  Practiced:  {}\n", summary.practiced));
        text.push_str(&format!("  Known:      {}\n", summary.known));
        text.push_str(&format!("  Mastered:   {}\n", summary.mastered));
        text.push_str(&format!("  Weak:       {}\n", summary.weak));
        text.push_str(&format!("  Mean score: {:.1}\n", summary.mean_score));
        text.push_str(&format!(
            "  Sessions:   {} ({} in history)\n",
            summary.sessions, output.history_len
        ));
        text.push_str(&format!(
            "Top {} coverage: {}/{} ({:.0}%)\n",
            coverage.n,
            coverage.known,
            coverage.considered,
            coverage.ratio * 100.0
        ));
        text
    }
}
