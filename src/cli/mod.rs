//! CLI commands for wordhoard.
//!
//! This module provides CLI commands for wordhoard, organized into:
//! - **Practice commands**: select, game, check (driving a session)
//! - **Progress commands**: stats, migrate, reset (inspecting stored state)

// Practice commands
pub mod check;
pub mod game;
pub mod select;

// Progress commands
pub mod migrate;
pub mod reset;
pub mod stats;

pub use check::CheckCommand;
pub use game::GameCommand;
pub use migrate::MigrateCommand;
pub use reset::ResetCommand;
pub use select::SelectCommand;
pub use stats::StatsCommand;
