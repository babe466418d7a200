use serde::{Deserialize, Serialize};

use super::{LiteralValue, TqlElement};

/// The subject of a predicate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    /// A named field, possibly a dotted path (`attributes.version`)
    Reference(String),
    /// Every field of the record (`*`)
    All,
}

impl Field {
    pub fn path(&self) -> Option<&str> {
        match self {
            Field::Reference(path) => Some(path),
            Field::All => None,
        }
    }
}

impl TqlElement for Field {
    fn to_query_string(&self) -> String {
        match self {
            Field::Reference(path) => path.clone(),
            Field::All => "*".to_string(),
        }
    }
}

/// `"*"` maps to [`Field::All`], anything else to a reference.
impl From<&str> for Field {
    fn from(path: &str) -> Self {
        if path == "*" {
            Field::All
        } else {
            Field::Reference(path.to_string())
        }
    }
}

impl From<String> for Field {
    fn from(path: String) -> Self {
        Field::from(path.as_str())
    }
}

/// Right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operand {
    Literal(LiteralValue),
    /// Another field of the same record
    Field(String),
}

impl TqlElement for Operand {
    fn to_query_string(&self) -> String {
        match self {
            Operand::Literal(literal) => literal.to_query_string(),
            Operand::Field(path) => path.clone(),
        }
    }
}

impl From<LiteralValue> for Operand {
    fn from(literal: LiteralValue) -> Self {
        Operand::Literal(literal)
    }
}
