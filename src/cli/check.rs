//! Check command for wordhoard.
//!
//! Grades one free-text answer. Pure; touches no stored state.

use serde::Serialize;

use crate::answer::{check_answer, AnswerVerdict};

/// Options for the check command.
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Every valid answer of the exercise.
    pub known: Vec<String>,
}

/// Output format for the check command.
#[derive(Debug, Clone, Serialize)]
pub struct CheckOutput {
    /// Whether the check ran.
    pub success: bool,
    pub input: String,
    pub expected: String,
    pub verdict: AnswerVerdict,
    /// Whether the verdict earns credit.
    pub accepted: bool,
}

/// The check command implementation.
#[derive(Debug, Default)]
pub struct CheckCommand;

impl CheckCommand {
    pub fn new() -> Self {
        Self
    }

    /// Grade `input` against `expected`.
    pub fn run(&self, input: &str, expected: &str, options: &CheckOptions) -> CheckOutput {
        let known: Vec<&str> = options.known.iter().map(String::as_str).collect();
        let known = (!known.is_empty()).then_some(known.as_slice());
        let verdict = check_answer(input, expected, known);

        CheckOutput {
            success: true,
            input: input.to_string(),
            expected: expected.to_string(),
            verdict,
            accepted: verdict.is_accepted(),
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &CheckOutput, options: &CheckOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            let mark = if output.accepted { "accepted" } else { "rejected" };
            format!("{} ({})", output.verdict, mark)
        }
    }
}
