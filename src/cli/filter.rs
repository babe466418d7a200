//! Filter JSON records with a TQL query

use serde_json::Value;
use tracing::debug;

use super::CliError;
use crate::{RecordPredicate, parse};

/// Options for the filter command
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    /// The TQL query records must satisfy
    pub query: String,
    /// A JSON array, a single JSON object or JSON lines
    pub input: String,
}

/// Read records from a JSON array, a single value, or one value per line.
pub fn parse_records(input: &str) -> Result<Vec<Value>, CliError> {
    let trimmed = input.trim();
    if trimmed.starts_with('[') {
        return Ok(serde_json::from_str(trimmed)?);
    }

    let mut records = vec![];
    for record in serde_json::Deserializer::from_str(trimmed).into_iter::<Value>() {
        records.push(record?);
    }
    Ok(records)
}

/// Keep the records the query matches
pub fn execute_filter(options: &FilterOptions) -> Result<Vec<Value>, CliError> {
    let predicate = RecordPredicate::compile(&parse(options.query.trim())?)?;
    let records = parse_records(&options.input)?;
    let kept: Vec<Value> = predicate.filter(&records).cloned().collect();
    debug!(read = records.len(), kept = kept.len(), "filtered records");
    Ok(kept)
}
