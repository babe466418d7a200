use serde::{Deserialize, Serialize};

use super::TqlElement;

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOperator {
    /// Equal (`=`)
    Eq,
    /// Not equal (`!=`)
    Neq,
    /// Less than (`<`)
    Lt,
    /// Greater than (`>`)
    Gt,
    /// Less than or equal (`<=`)
    Let,
    /// Greater than or equal (`>=`)
    Get,
}

impl ComparisonOperator {
    /// TQL spelling of the operator.
    pub fn symbol(self) -> &'static str {
        match self {
            ComparisonOperator::Eq => "=",
            ComparisonOperator::Neq => "!=",
            ComparisonOperator::Lt => "<",
            ComparisonOperator::Gt => ">",
            ComparisonOperator::Let => "<=",
            ComparisonOperator::Get => ">=",
        }
    }

    /// `<`, `>`, `<=` and `>=`.
    pub fn is_ordering(self) -> bool {
        !matches!(self, ComparisonOperator::Eq | ComparisonOperator::Neq)
    }
}

impl TqlElement for ComparisonOperator {
    fn to_query_string(&self) -> String {
        self.symbol().to_string()
    }
}
