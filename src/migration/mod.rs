//! Knowledge document schema migration.
//!
//! [`migrate`] runs a persisted document of any supported version through
//! the chain of single-version steps until it reaches the current schema.
//! The pipeline is idempotent: a current document passes through unchanged.

pub mod report;
pub mod schema;
pub mod steps;

pub use report::{MigrationDiagnostic, MigrationReport};
pub use schema::{DocumentV1, DocumentV2, VersionedDocument, UNVERSIONED_SCHEMA};

use crate::core::{KnowledgeDocument, VocabularyLookup};

/// Upgrade a document to the current schema.
pub fn migrate(
    document: VersionedDocument,
    vocabulary: &dyn VocabularyLookup,
) -> (KnowledgeDocument, MigrationReport) {
    let mut report = MigrationReport::new(document.version());
    report.entries_before = document.entry_count();

    let mut current = document;
    let migrated = loop {
        current = match current {
            VersionedDocument::V1(doc) => {
                tracing::info!("migrating knowledge document v1 -> v2");
                VersionedDocument::V2(steps::v1_to_v2(doc))
            }
            VersionedDocument::V2(doc) => {
                tracing::info!("migrating knowledge document v2 -> v3");
                VersionedDocument::V3(steps::v2_to_v3(doc, vocabulary, &mut report))
            }
            VersionedDocument::V3(doc) => break doc,
        };
    };

    report.to_version = migrated.schema_version;
    report.entries_after = migrated.entries.len();

    if !report.is_noop() {
        tracing::info!(
            from = report.from_version,
            to = report.to_version,
            before = report.entries_before,
            after = report.entries_after,
            remapped = report.remapped,
            unknown = report.unknown_count(),
            ambiguous = report.ambiguous_count(),
            merged = report.merged_count(),
            "knowledge document migrated"
        );
    }

    (migrated, report)
}

/// Parse and upgrade a raw document.
pub fn migrate_str(
    raw: &str,
    vocabulary: &dyn VocabularyLookup,
) -> crate::error::Result<(KnowledgeDocument, MigrationReport)> {
    let parsed = VersionedDocument::parse(raw)?;
    Ok(migrate(parsed, vocabulary))
}
