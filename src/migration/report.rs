//! Migration outcome reporting.

use serde::Serialize;

use crate::core::WordId;

/// One notable event during migration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum MigrationDiagnostic {
    /// The identifier is not in the current vocabulary; its entry was kept
    /// under the legacy key.
    UnknownWord { word_id: WordId },
    /// Several senses share the surface form; the entry was dropped.
    AmbiguousWord {
        surface: String,
        candidates: Vec<WordId>,
    },
    /// Two legacy entries resolved to the same identifier and were combined.
    Merged { from: WordId, into: WordId },
}

impl MigrationDiagnostic {
    pub fn describe(&self) -> String {
        match self {
            Self::UnknownWord { word_id } => {
                format!("unknown word '{}' kept under legacy key", word_id)
            }
            Self::AmbiguousWord {
                surface,
                candidates,
            } => {
                let ids: Vec<&str> = candidates.iter().map(WordId::as_str).collect();
                format!(
                    "ambiguous word '{}' skipped ({})",
                    surface,
                    ids.join(", ")
                )
            }
            Self::Merged { from, into } => format!("merged '{}' into '{}'", from, into),
        }
    }
}

/// Summary of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationReport {
    pub from_version: u32,
    pub to_version: u32,
    pub entries_before: usize,
    pub entries_after: usize,
    /// Entries moved to a different key.
    pub remapped: usize,
    /// Known entries whose key was already canonical.
    pub unchanged: usize,
    pub diagnostics: Vec<MigrationDiagnostic>,
}

impl MigrationReport {
    pub fn new(from_version: u32) -> Self {
        Self {
            from_version,
            to_version: from_version,
            entries_before: 0,
            entries_after: 0,
            remapped: 0,
            unchanged: 0,
            diagnostics: Vec::new(),
        }
    }

    pub fn push(&mut self, diagnostic: MigrationDiagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Whether the document was already current.
    pub fn is_noop(&self) -> bool {
        self.from_version == self.to_version
    }

    pub fn unknown_count(&self) -> usize {
        self.count(|d| matches!(d, MigrationDiagnostic::UnknownWord { .. }))
    }

    pub fn ambiguous_count(&self) -> usize {
        self.count(|d| matches!(d, MigrationDiagnostic::AmbiguousWord { .. }))
    }

    pub fn merged_count(&self) -> usize {
        self.count(|d| matches!(d, MigrationDiagnostic::Merged { .. }))
    }

    fn count(&self, predicate: impl Fn(&MigrationDiagnostic) -> bool) -> usize {
        self.diagnostics.iter().filter(|d| predicate(d)).count()
    }
}
