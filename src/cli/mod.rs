//! CLI support for tql-lang
//!
//! Every command is exposed as a plain function so that other tools can
//! embed them without going through the binary.

mod check;
mod convert;
mod docs;
mod filter;

pub use check::{CheckOptions, CheckResult, execute_check};
pub use convert::{LowerOptions, execute_criteria, execute_lower, execute_raise};
pub use docs::{DocCategory, get_doc_category, get_docs_overview};
pub use filter::{FilterOptions, execute_filter, parse_records};

use std::io;

use thiserror::Error;

use crate::TqlError;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Tql(#[from] TqlError),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Nothing on the command line and nothing piped in.
    #[error("No {0} provided. Pass it as an argument or pipe it to stdin.")]
    NoInput(&'static str),

    #[error("Unknown policy: '{0}'. Expected generic, storage or runtime.")]
    UnknownPolicy(String),

    #[error("Unknown category: '{0}'\nRun 'tql docs' to see available categories.")]
    UnknownCategory(String),
}
