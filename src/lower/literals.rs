//! Literal and operator mapping shared by every lowering policy.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::ast::{ComparisonOperator, LiteralKind, LiteralValue};
use crate::el::{CompareOp, ElLiteral, ElNode};
use crate::error::{Result, TqlError};

pub fn compare_op(operator: ComparisonOperator) -> CompareOp {
    match operator {
        ComparisonOperator::Eq => CompareOp::Eq,
        ComparisonOperator::Neq => CompareOp::Neq,
        ComparisonOperator::Lt => CompareOp::Lt,
        ComparisonOperator::Gt => CompareOp::Gt,
        ComparisonOperator::Let => CompareOp::Le,
        ComparisonOperator::Get => CompareOp::Ge,
    }
}

/// Picks the narrowest EL number type for an INT: `i32`, then `i64`,
/// then decimal.
pub fn integer_literal(text: &str) -> Result<ElLiteral> {
    if let Ok(n) = text.parse::<i32>() {
        return Ok(ElLiteral::Int(n));
    }
    if let Ok(n) = text.parse::<i64>() {
        return Ok(ElLiteral::Long(n));
    }
    Decimal::from_str(text)
        .map(ElLiteral::Decimal)
        .map_err(|_| TqlError::LiteralOverflow(text.to_string()))
}

pub fn lower_literal(literal: &LiteralValue) -> Result<ElNode> {
    let value = match literal.kind {
        LiteralKind::Int => integer_literal(&literal.value)?,
        LiteralKind::Decimal => Decimal::from_str(&literal.value)
            .map(ElLiteral::Decimal)
            .map_err(|_| TqlError::LiteralOverflow(literal.value.clone()))?,
        LiteralKind::Boolean => match literal.value.as_str() {
            "true" => ElLiteral::Boolean(true),
            "false" => ElLiteral::Boolean(false),
            other => {
                return Err(TqlError::Semantic(format!(
                    "'{}' is not a boolean literal",
                    other
                )));
            }
        },
        LiteralKind::QuotedValue => ElLiteral::String(literal.value.clone()),
    };
    Ok(ElNode::Literal(value))
}
