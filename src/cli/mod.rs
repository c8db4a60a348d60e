//! CLI support for clove-jmespath
//!
//! Provides programmatic access to the `clove-jp` commands so other tools can
//! run searches without spawning a process.

mod search;

pub use search::{describe_ast, execute_search, SearchOptions, SearchResult};

use std::io;

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    /// Expression failed to compile
    #[error("Syntax error: {0}")]
    Parse(#[from] crate::ParseError),

    /// Expression failed at runtime
    #[error("Evaluation error: {0}")]
    Eval(#[from] crate::EvalError),

    /// Input was not valid JSON
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No input provided. Use --input or pipe JSON to stdin.")]
    NoInput,
}
