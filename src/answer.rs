//! Free-text answer grading.
//!
//! [`check_answer`] is a pure function: it compares a learner's input with
//! the expected answer after trimming and case-folding, tolerating short
//! inflectional suffixes and a single typo.

use std::fmt;

use serde::Serialize;

/// Longest suffix difference accepted as an inflected form.
const MAX_DECLENSION_SUFFIX: usize = 2;

/// Outcome of grading one answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnswerVerdict {
    /// Nothing was entered.
    Empty,
    Exact,
    /// One string extends the other by a short suffix.
    Declension,
    /// One insertion, deletion, or substitution away.
    Typo,
    /// Within typo distance, but exactly another valid answer.
    DifferentWord,
    Wrong,
}

impl AnswerVerdict {
    /// Whether the answer earns credit.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Exact | Self::Declension | Self::Typo)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Exact => "exact",
            Self::Declension => "declension",
            Self::Typo => "typo",
            Self::DifferentWord => "different-word",
            Self::Wrong => "wrong",
        }
    }
}

impl fmt::Display for AnswerVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grade `input` against `expected`.
///
/// `known_answers`, when given, lists every valid answer of the exercise;
/// an input within typo distance that is exactly one of the other answers
/// is rejected as a different word. An empty `expected` accepts nothing.
pub fn check_answer(input: &str, expected: &str, known_answers: Option<&[&str]>) -> AnswerVerdict {
    let input = normalize(input);
    let expected = normalize(expected);

    if input.is_empty() {
        return AnswerVerdict::Empty;
    }
    if expected.is_empty() {
        return AnswerVerdict::Wrong;
    }
    if input == expected {
        return AnswerVerdict::Exact;
    }
    if is_declension(&input, &expected) {
        return AnswerVerdict::Declension;
    }
    if within_one_edit(&input, &expected) {
        let is_other_answer = known_answers.is_some_and(|answers| {
            answers
                .iter()
                .map(|a| normalize(a))
                .any(|a| a == input && a != expected)
        });
        if is_other_answer {
            return AnswerVerdict::DifferentWord;
        }
        return AnswerVerdict::Typo;
    }
    AnswerVerdict::Wrong
}

fn normalize(s: &str) -> Vec<char> {
    s.trim().chars().flat_map(char::to_lowercase).collect()
}

fn is_declension(a: &[char], b: &[char]) -> bool {
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    !short.is_empty() && long.starts_with(short) && long.len() - short.len() <= MAX_DECLENSION_SUFFIX
}

/// Single left-to-right scan allowing at most one insertion, deletion, or
/// substitution.
fn within_one_edit(a: &[char], b: &[char]) -> bool {
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    if long.len() - short.len() > 1 {
        return false;
    }

    let (mut i, mut j) = (0, 0);
    let mut edited = false;
    while i < short.len() && j < long.len() {
        if short[i] == long[j] {
            i += 1;
            j += 1;
            continue;
        }
        if edited {
            return false;
        }
        edited = true;
        if short.len() == long.len() {
            i += 1;
        }
        j += 1;
    }
    true
}
