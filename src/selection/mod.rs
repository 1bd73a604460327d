//! Word selection for wordhoard.
//!
//! The [`SelectionEngine`] picks the words of the next session from a
//! category pool, using the category's [`SelectionHistory`], the current
//! knowledge document, and vocabulary frequency data. [`spacing`] orders a
//! chosen set for presentation.

pub mod engine;
pub mod history;
pub mod spacing;

pub use engine::{SelectionEngine, SelectionOutcome, SelectionRequest};
pub use history::{SelectionHistory, SelectionHistoryStore};
pub use spacing::{build_session_queue, is_spaced, space_queue};
