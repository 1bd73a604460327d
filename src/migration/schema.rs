//! Historical knowledge document schemas.
//!
//! One type per schema version. A raw document is read into exactly one
//! [`VersionedDocument`] variant by its version tag; the pipeline then walks
//! the variants forward until it reaches the current schema.
//!
//! - v1: entries keyed by bare surface form, one stat per direction, no modes.
//! - v2: per-mode stats, still keyed by bare surface form.
//! - v3: sense-aware identifiers (current, [`KnowledgeDocument`]).

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::{
    DirectionPair, Direction, DocumentMeta, KnowledgeDocument, KnowledgeEntry, SessionItem,
    SessionRecord, KNOWLEDGE_SCHEMA_VERSION,
};
use crate::error::{Result, VocabError};

/// Version assumed for documents that carry no version field.
pub const UNVERSIONED_SCHEMA: u32 = 1;

/// v1 session record: no mode, no session id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecordV1 {
    pub timestamp: DateTime<Utc>,
    pub direction: Direction,
    #[serde(default)]
    pub items: Vec<SessionItem>,
}

/// v1 bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaV1 {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for MetaV1 {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            updated_at: now,
        }
    }
}

/// Schema v1: flat surface-form keys, per-direction stats only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentV1 {
    #[serde(default)]
    pub words: BTreeMap<String, DirectionPair>,
    #[serde(default)]
    pub history: Vec<SessionRecordV1>,
    #[serde(default)]
    pub meta: MetaV1,
}

/// Schema v2: per-mode stats keyed by bare surface form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentV2 {
    #[serde(default)]
    pub entries: BTreeMap<String, KnowledgeEntry>,
    #[serde(default)]
    pub history: Vec<SessionRecord>,
    #[serde(default)]
    pub meta: DocumentMeta,
}

/// A knowledge document at any supported schema version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionedDocument {
    V1(DocumentV1),
    V2(DocumentV2),
    V3(KnowledgeDocument),
}

impl VersionedDocument {
    /// Parse a persisted document, dispatching on its version tag.
    pub fn parse(raw: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| VocabError::malformed_document(e.to_string()))?;

        if !value.is_object() {
            return Err(VocabError::malformed_document(
                "document root is not an object",
            ));
        }

        let version = match value.get("schemaVersion") {
            None | Some(Value::Null) => UNVERSIONED_SCHEMA,
            Some(v) => v
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .ok_or_else(|| {
                    VocabError::malformed_document(format!("invalid schemaVersion: {}", v))
                })?,
        };

        let parsed = match version {
            1 => serde_json::from_value(value).map(Self::V1),
            2 => serde_json::from_value(value).map(Self::V2),
            3 => serde_json::from_value(value).map(Self::V3),
            n if n > KNOWLEDGE_SCHEMA_VERSION => {
                return Err(VocabError::malformed_document(format!(
                    "schema version {} is newer than supported version {}",
                    n, KNOWLEDGE_SCHEMA_VERSION
                )))
            }
            n => {
                return Err(VocabError::malformed_document(format!(
                    "unsupported schema version {}",
                    n
                )))
            }
        };

        parsed.map_err(|e| VocabError::malformed_document(format!("schema v{}: {}", version, e)))
    }

    /// The version tag of this document.
    pub fn version(&self) -> u32 {
        match self {
            Self::V1(_) => 1,
            Self::V2(_) => 2,
            Self::V3(doc) => doc.schema_version,
        }
    }

    /// Number of knowledge entries.
    pub fn entry_count(&self) -> usize {
        match self {
            Self::V1(doc) => doc.words.len(),
            Self::V2(doc) => doc.entries.len(),
            Self::V3(doc) => doc.entries.len(),
        }
    }

    /// Whether the document is already at the current schema.
    pub fn is_current(&self) -> bool {
        matches!(self, Self::V3(_))
    }
}

impl From<KnowledgeDocument> for VersionedDocument {
    fn from(doc: KnowledgeDocument) -> Self {
        Self::V3(doc)
    }
}
