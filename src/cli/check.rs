//! Validate TQL queries

use super::CliError;
use crate::{TqlElement, parse};

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The TQL query to validate
    pub query: String,
    /// Print the AST as JSON instead of the canonical text
    pub json: bool,
}

/// Result of a check operation
#[derive(Debug)]
pub enum CheckResult {
    /// Canonical TQL text of the query
    Canonical(String),
    /// Serialized AST
    Ast(serde_json::Value),
}

/// Parse the query and report it in canonical form
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    let expr = parse(options.query.trim())?;

    if options.json {
        return Ok(CheckResult::Ast(serde_json::to_value(&expr)?));
    }
    Ok(CheckResult::Canonical(expr.to_query_string()))
}
