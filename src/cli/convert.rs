//! Conversions between TQL, EL and criteria documents

use super::CliError;
use crate::{
    FieldTypes, LoweringPolicy, TqlElement, lower, parse, raise_str_with_policy, to_criteria,
};

/// Options for the lower command
#[derive(Debug, Clone, Default)]
pub struct LowerOptions {
    /// The TQL query to lower
    pub query: String,
    /// Policy name: generic, storage or runtime
    pub policy: String,
    /// Field type dictionary as a JSON object
    pub types: Option<String>,
}

fn policy(name: &str) -> Result<LoweringPolicy, CliError> {
    LoweringPolicy::by_name(name).ok_or_else(|| CliError::UnknownPolicy(name.to_string()))
}

/// Lower a TQL query and render the EL text
pub fn execute_lower(options: &LowerOptions) -> Result<String, CliError> {
    let policy = policy(&options.policy)?;
    let types = options
        .types
        .as_deref()
        .map(FieldTypes::from_json_str)
        .transpose()?;

    let expr = parse(options.query.trim())?;
    let el = lower(&expr, &policy, types.as_ref())?;
    Ok(el.to_string())
}

/// Raise EL text lowered under the named policy back into canonical TQL
pub fn execute_raise(el: &str, policy_name: &str) -> Result<String, CliError> {
    let policy = policy(policy_name)?;
    Ok(raise_str_with_policy(el.trim(), &policy)?.to_query_string())
}

/// Translate a TQL query into a criteria document
pub fn execute_criteria(query: &str, pretty: bool) -> Result<String, CliError> {
    let criteria = to_criteria(&parse(query.trim())?)?;
    let json = if pretty {
        serde_json::to_string_pretty(&criteria)?
    } else {
        serde_json::to_string(&criteria)?
    };
    Ok(json)
}
