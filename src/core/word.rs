//! Word identifiers and the small enums that key practice data.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Separator between surface form and sense in a sense-qualified identifier.
pub const SENSE_SEPARATOR: char = '#';

/// Canonical key for one word-sense pair.
///
/// Non-polysemous words use the bare surface form (`"perro"`); polysemous
/// words carry the sense after a `#` (`"tiempo#weather"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WordId(String);

impl WordId {
    /// Create an identifier from its string form.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Create a sense-qualified identifier.
    pub fn with_sense(surface: &str, sense: &str) -> Self {
        Self(format!("{}{}{}", surface, SENSE_SEPARATOR, sense))
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The surface form (everything before the first `#`).
    pub fn surface(&self) -> &str {
        match self.0.split_once(SENSE_SEPARATOR) {
            Some((surface, _)) => surface,
            None => &self.0,
        }
    }

    /// The sense qualifier, if any.
    pub fn sense(&self) -> Option<&str> {
        self.0.split_once(SENSE_SEPARATOR).map(|(_, sense)| sense)
    }

    /// Whether the identifier names a specific sense.
    pub fn is_sense_qualified(&self) -> bool {
        self.0.contains(SENSE_SEPARATOR)
    }
}

impl fmt::Display for WordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WordId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for WordId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for WordId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for WordId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Practice orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    /// Prompt in the studied language, answer in the learner's language.
    SourceToTarget,
    /// Prompt in the learner's language, answer in the studied language.
    TargetToSource,
}

impl Direction {
    /// Both directions, in storage order.
    pub const ALL: [Direction; 2] = [Direction::SourceToTarget, Direction::TargetToSource];

    /// Stable string form used in files and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SourceToTarget => "source-to-target",
            Self::TargetToSource => "target-to-source",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "source-to-target" | "forward" => Ok(Self::SourceToTarget),
            "target-to-source" | "reverse" => Ok(Self::TargetToSource),
            other => Err(format!(
                "unknown direction '{}' (expected source-to-target or target-to-source)",
                other
            )),
        }
    }
}

/// Independently scored practice context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Full answer entry.
    Standard,
    /// Reduced difficulty (multiple choice, hints).
    Simplified,
}

impl Mode {
    /// Every supported mode.
    pub const ALL: [Mode; 2] = [Mode::Standard, Mode::Simplified];

    /// Stable string form used in files and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Simplified => "simplified",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "simplified" => Ok(Self::Simplified),
            other => Err(format!(
                "unknown mode '{}' (expected standard or simplified)",
                other
            )),
        }
    }
}

/// Outcome classification of one practice attempt.
///
/// Ordered from best to worst; each level maps to a fixed score delta and
/// to one try-bucket counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    /// Correct on the first attempt.
    Perfect,
    /// Correct on the second attempt.
    Good,
    /// Correct on the third attempt.
    Hard,
    /// Not answered correctly.
    Failed,
}

impl Quality {
    /// Every quality level, best first.
    pub const ALL: [Quality; 4] = [
        Quality::Perfect,
        Quality::Good,
        Quality::Hard,
        Quality::Failed,
    ];

    /// Classify an answer by the attempt on which it succeeded.
    pub fn from_attempts(attempts: u32, solved: bool) -> Self {
        match (solved, attempts) {
            (true, 0..=1) => Self::Perfect,
            (true, 2) => Self::Good,
            (true, 3) => Self::Hard,
            _ => Self::Failed,
        }
    }

    /// Stable string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Perfect => "perfect",
            Self::Good => "good",
            Self::Hard => "hard",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Quality {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "perfect" | "1" => Ok(Self::Perfect),
            "good" | "2" => Ok(Self::Good),
            "hard" | "3" => Ok(Self::Hard),
            "failed" | "fail" | "0" => Ok(Self::Failed),
            other => Err(format!(
                "unknown quality '{}' (expected perfect, good, hard or failed)",
                other
            )),
        }
    }
}
