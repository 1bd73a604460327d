//! Unified error types for wordhoard with fail-open philosophy.
//!
//! Nothing in the knowledge core should stop a practice session from
//! starting. Persistence and parse failures are logged and downgraded to
//! defaults at the component boundary; the worst case is degraded
//! personalization, never a refused session.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for wordhoard operations.
#[derive(Error, Debug)]
pub enum VocabError {
    /// I/O errors from document file operations.
    #[error("storage error at {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// JSON or TOML serialization errors.
    #[error("serialization error: {message}")]
    Serde { message: String },

    /// Configuration loading errors.
    #[error("config error: {message}")]
    Config { message: String },

    /// A persisted knowledge document could not be understood.
    #[error("malformed document: {message}")]
    MalformedDocument { message: String },

    /// An identifier no longer exists in the current vocabulary.
    #[error("unknown word: {word_id}")]
    UnknownWord { word_id: String },

    /// The vocabulary source could not be loaded.
    #[error("vocabulary error: {message}")]
    Vocabulary { message: String },

    /// Selection was requested from an empty candidate pool.
    #[error("empty candidate pool for category '{category}'")]
    EmptyCandidatePool { category: String },
}

/// A specialized Result type for wordhoard operations.
pub type Result<T> = std::result::Result<T, VocabError>;

impl VocabError {
    /// Create a storage error from an I/O error.
    pub fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }

    /// Create a serialization error.
    pub fn serde(message: impl Into<String>) -> Self {
        Self::Serde {
            message: message.into(),
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a malformed document error.
    pub fn malformed_document(message: impl Into<String>) -> Self {
        Self::MalformedDocument {
            message: message.into(),
        }
    }

    /// Create an unknown word error.
    pub fn unknown_word(word_id: impl Into<String>) -> Self {
        Self::UnknownWord {
            word_id: word_id.into(),
        }
    }

    /// Create a vocabulary error.
    pub fn vocabulary(message: impl Into<String>) -> Self {
        Self::Vocabulary {
            message: message.into(),
        }
    }

    /// Create an empty candidate pool error.
    pub fn empty_candidate_pool(category: impl Into<String>) -> Self {
        Self::EmptyCandidatePool {
            category: category.into(),
        }
    }

    /// Whether this error is downgraded to a default rather than surfaced.
    ///
    /// Configuration and vocabulary errors are caller mistakes and are
    /// reported; everything that concerns learner data fails open.
    pub fn is_fail_open(&self) -> bool {
        !matches!(self, Self::Config { .. } | Self::Vocabulary { .. })
    }
}

impl From<io::Error> for VocabError {
    fn from(err: io::Error) -> Self {
        Self::Storage {
            path: PathBuf::new(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for VocabError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde {
            message: err.to_string(),
        }
    }
}

/// Trait for fail-open error handling.
///
/// Log the error and return a safe default.
pub trait FailOpen<T> {
    /// Handle an error by logging a warning and returning the default value.
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default;

    /// Handle an error by logging a warning and returning the provided fallback.
    fn fail_open_with(self, context: &str, fallback: T) -> T;
}

impl<T> FailOpen<T> for Result<T> {
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default,
    {
        match self {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("{}: {} (fail-open: using default)", context, err);
                T::default()
            }
        }
    }

    fn fail_open_with(self, context: &str, fallback: T) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("{}: {} (fail-open: using fallback)", context, err);
                fallback
            }
        }
    }
}

/// Exit codes for the wordhoard CLI.
pub mod exit_codes {
    /// The command completed.
    pub const OK: i32 = 0;

    /// The command ran but reported a failure.
    pub const ERROR: i32 = 1;

    /// The process panicked.
    pub const CRASH: i32 = 3;
}
