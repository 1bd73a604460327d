//! Migrate command for wordhoard.
//!
//! Runs the schema migration pipeline over the stored knowledge document
//! and reports what changed. With `dry_run` nothing is written.

use chrono::Utc;
use serde::Serialize;

use crate::config::Config;
use crate::core::{KnowledgeDocument, Vocabulary};
use crate::error::{FailOpen, Result};
use crate::knowledge::{KnowledgeStore, KNOWLEDGE_BACKUP_KEY};
use crate::migration::{migrate_str, MigrationReport};
use crate::storage::{DocumentStore, KNOWLEDGE_KEY};

/// Options for the migrate command.
#[derive(Debug, Clone, Default)]
pub struct MigrateOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Report without writing.
    pub dry_run: bool,
}

/// Output format for the migrate command.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrateOutput {
    /// Whether the document is now (or would be) at the current schema.
    pub success: bool,
    pub dry_run: bool,
    /// Absent when there was no document to migrate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<MigrationReport>,
    /// Error message if migration failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The migrate command implementation.
pub struct MigrateCommand<S: DocumentStore> {
    store: S,
    config: Config,
    vocabulary: Vocabulary,
}

impl<S: DocumentStore + Clone> MigrateCommand<S> {
    /// Create a new migrate command.
    pub fn new(store: S, config: Config, vocabulary: Vocabulary) -> Self {
        Self {
            store,
            config,
            vocabulary,
        }
    }

    /// Run the migrate command.
    pub fn run(&self, options: &MigrateOptions) -> MigrateOutput {
        let raw = self
            .store
            .get(KNOWLEDGE_KEY)
            .fail_open_default("Failed to read knowledge document");
        let Some(raw) = raw else {
            return MigrateOutput {
                success: true,
                dry_run: options.dry_run,
                report: None,
                error: None,
            };
        };

        let (document, report) = match migrate_str(&raw, &self.vocabulary) {
            Ok(migrated) => migrated,
            Err(err) => {
                let error = if options.dry_run {
                    err.to_string()
                } else {
                    match self.reset_malformed(&raw) {
                        Ok(()) => format!(
                            "{}; document reset, original kept as '{}'",
                            err, KNOWLEDGE_BACKUP_KEY
                        ),
                        Err(reset_err) => format!("{}; reset failed: {}", err, reset_err),
                    }
                };
                return MigrateOutput {
                    success: false,
                    dry_run: options.dry_run,
                    report: None,
                    error: Some(error),
                };
            }
        };

        if !options.dry_run && !report.is_noop() {
            let knowledge = KnowledgeStore::with_document(self.store.clone(), document, &self.config);
            if let Err(err) = knowledge.save() {
                return MigrateOutput {
                    success: false,
                    dry_run: false,
                    report: Some(report),
                    error: Some(err.to_string()),
                };
            }
        }

        MigrateOutput {
            success: true,
            dry_run: options.dry_run,
            report: Some(report),
            error: None,
        }
    }

    /// Keep the unreadable text under the backup key and start over.
    fn reset_malformed(&self, raw: &str) -> Result<()> {
        tracing::warn!("knowledge document is malformed, starting fresh");
        self.store.put(KNOWLEDGE_BACKUP_KEY, raw)?;
        KnowledgeStore::with_document(
            self.store.clone(),
            KnowledgeDocument::empty(Utc::now()),
            &self.config,
        )
        .save()
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &MigrateOutput, options: &MigrateOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            self.format_human_readable(output)
        }
    }

    fn format_human_readable(&self, output: &MigrateOutput) -> String {
        if let Some(error) = &output.error {
            return format!("Migration failed: {}\n", error);
        }
        let Some(report) = &output.report else {
            return "No knowledge document to migrate.\n".to_string();
        };
        if report.is_noop() {
            return format!("Knowledge document is current (schema v{}).\n", report.to_version);
        }

        let verb = if output.dry_run { "Would migrate" } else { "Migrated" };
        let mut text = format!(
            "{} schema v{} -> v{}: {} entries -> {}\n",
            verb,
            report.from_version,
            report.to_version,
            report.entries_before,
            report.entries_after
        );
        text.push_str(&format!(
            "  remapped {}, unchanged {}, unknown {}, ambiguous {}, merged {}\n",
            report.remapped,
            report.unchanged,
            report.unknown_count(),
            report.ambiguous_count(),
            report.merged_count()
        ));
        for diagnostic in &report.diagnostics {
            text.push_str(&format!("  - {}\n", diagnostic.describe()));
        }
        text
    }
}
