use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{TqlElement, quote};

/// Kind of a literal, decided by its lexical shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LiteralKind {
    Int,
    Decimal,
    Boolean,
    QuotedValue,
}

impl LiteralKind {
    pub fn is_numeric(self) -> bool {
        matches!(self, LiteralKind::Int | LiteralKind::Decimal)
    }
}

/// A literal operand together with its raw text.
///
/// Numbers keep the text they were written with so that canonical output
/// reproduces the input exactly (`99.20` stays `99.20`). For quoted values
/// `value` holds the unescaped content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LiteralValue {
    pub kind: LiteralKind,
    pub value: String,
}

impl LiteralValue {
    pub fn new(kind: LiteralKind, value: impl Into<String>) -> Self {
        LiteralValue {
            kind,
            value: value.into(),
        }
    }

    pub fn int(value: i64) -> Self {
        LiteralValue::new(LiteralKind::Int, value.to_string())
    }

    /// A decimal literal from its textual form, e.g. `"12.50"`.
    pub fn decimal(text: impl Into<String>) -> Self {
        LiteralValue::new(LiteralKind::Decimal, text)
    }

    pub fn boolean(value: bool) -> Self {
        LiteralValue::new(LiteralKind::Boolean, value.to_string())
    }

    pub fn quoted(value: impl Into<String>) -> Self {
        LiteralValue::new(LiteralKind::QuotedValue, value)
    }
}

impl TqlElement for LiteralValue {
    fn to_query_string(&self) -> String {
        match self.kind {
            LiteralKind::QuotedValue => quote(&self.value),
            _ => self.value.clone(),
        }
    }
}

impl From<i32> for LiteralValue {
    fn from(value: i32) -> Self {
        LiteralValue::int(i64::from(value))
    }
}

impl From<i64> for LiteralValue {
    fn from(value: i64) -> Self {
        LiteralValue::int(value)
    }
}

impl From<Decimal> for LiteralValue {
    fn from(value: Decimal) -> Self {
        LiteralValue::decimal(value.to_string())
    }
}

impl From<bool> for LiteralValue {
    fn from(value: bool) -> Self {
        LiteralValue::boolean(value)
    }
}

impl From<&str> for LiteralValue {
    fn from(value: &str) -> Self {
        LiteralValue::quoted(value)
    }
}

impl From<String> for LiteralValue {
    fn from(value: String) -> Self {
        LiteralValue::quoted(value)
    }
}
