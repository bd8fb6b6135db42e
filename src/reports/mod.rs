//! Rendering of view results
//!
//! Two generators are provided, each accessed through a `generate` function:
//! - **Console**: aligned plain-text tables with optional ANSI colors, degraded results flagged
//! - **JSON**: the serialized report, including where its data came from
//!
//! Both write into any [`core::fmt::Write`] so callers can capture output for testing.

mod console;
mod json;

pub use console::{ColorMode, ColorScheme, ConsoleView, generate as generate_console, generate_snapshot as generate_console_snapshot};
pub use json::generate as generate_json;

use clap::ValueEnum;

/// How results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables
    #[default]
    Console,

    /// Pretty-printed JSON
    Json,
}
