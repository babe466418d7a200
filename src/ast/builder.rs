//! Fluent construction of TQL queries.
//!
//! Every function returns a canonical `Or[And[...]]` tree, the same tree the
//! parser produces for the equivalent text:
//!
//! ```
//! use tql_lang::ast::builder::{and, eq, gt};
//! use tql_lang::parser::parse;
//!
//! let built = and([eq("country", "FR"), gt("age", 18)]);
//! assert_eq!(built, parse("country = 'FR' and age > 18").unwrap());
//! ```

use super::{ComparisonOperator, Expression, Field, LiteralValue, Operand};

fn query(predicate: Expression) -> Expression {
    Expression::disjunction([predicate])
}

/// Comparison with an arbitrary operator and operand.
pub fn compare(
    field: impl Into<Field>,
    operator: ComparisonOperator,
    value: impl Into<Operand>,
) -> Expression {
    query(Expression::Comparison {
        field: field.into(),
        operator,
        value: value.into(),
    })
}

fn literal(
    field: impl Into<Field>,
    operator: ComparisonOperator,
    value: impl Into<LiteralValue>,
) -> Expression {
    compare(field, operator, Operand::Literal(value.into()))
}

pub fn eq(field: impl Into<Field>, value: impl Into<LiteralValue>) -> Expression {
    literal(field, ComparisonOperator::Eq, value)
}

pub fn neq(field: impl Into<Field>, value: impl Into<LiteralValue>) -> Expression {
    literal(field, ComparisonOperator::Neq, value)
}

pub fn lt(field: impl Into<Field>, value: impl Into<LiteralValue>) -> Expression {
    literal(field, ComparisonOperator::Lt, value)
}

pub fn gt(field: impl Into<Field>, value: impl Into<LiteralValue>) -> Expression {
    literal(field, ComparisonOperator::Gt, value)
}

pub fn lte(field: impl Into<Field>, value: impl Into<LiteralValue>) -> Expression {
    literal(field, ComparisonOperator::Let, value)
}

pub fn gte(field: impl Into<Field>, value: impl Into<LiteralValue>) -> Expression {
    literal(field, ComparisonOperator::Get, value)
}

/// Compares two fields of the same record, e.g. `start < end`.
pub fn compare_fields(
    field: impl Into<Field>,
    operator: ComparisonOperator,
    other: impl Into<String>,
) -> Expression {
    compare(field, operator, Operand::Field(other.into()))
}

pub fn field_eq(field: impl Into<Field>, other: impl Into<String>) -> Expression {
    compare_fields(field, ComparisonOperator::Eq, other)
}

pub fn field_neq(field: impl Into<Field>, other: impl Into<String>) -> Expression {
    compare_fields(field, ComparisonOperator::Neq, other)
}

pub fn field_lt(field: impl Into<Field>, other: impl Into<String>) -> Expression {
    compare_fields(field, ComparisonOperator::Lt, other)
}

pub fn field_gt(field: impl Into<Field>, other: impl Into<String>) -> Expression {
    compare_fields(field, ComparisonOperator::Gt, other)
}

pub fn field_lte(field: impl Into<Field>, other: impl Into<String>) -> Expression {
    compare_fields(field, ComparisonOperator::Let, other)
}

pub fn field_gte(field: impl Into<Field>, other: impl Into<String>) -> Expression {
    compare_fields(field, ComparisonOperator::Get, other)
}

/// Closed range `field between [left, right]`.
pub fn between(
    field: impl Into<Field>,
    left: impl Into<LiteralValue>,
    right: impl Into<LiteralValue>,
) -> Expression {
    between_bounds(field, left, right, false, false)
}

/// Range with explicit open/closed ends.
pub fn between_bounds(
    field: impl Into<Field>,
    left: impl Into<LiteralValue>,
    right: impl Into<LiteralValue>,
    lower_open: bool,
    upper_open: bool,
) -> Expression {
    query(Expression::Between {
        field: field.into(),
        left: left.into(),
        right: right.into(),
        lower_open,
        upper_open,
    })
}

pub fn in_values<V: Into<LiteralValue>>(
    field: impl Into<Field>,
    values: impl IntoIterator<Item = V>,
) -> Expression {
    query(Expression::In {
        field: field.into(),
        values: values.into_iter().map(Into::into).collect(),
    })
}

pub fn contains(field: impl Into<Field>, value: impl Into<String>) -> Expression {
    query(Expression::Contains {
        field: field.into(),
        value: value.into(),
        case_sensitive: true,
    })
}

pub fn contains_ignore_case(field: impl Into<Field>, value: impl Into<String>) -> Expression {
    query(Expression::Contains {
        field: field.into(),
        value: value.into(),
        case_sensitive: false,
    })
}

/// Regex match, `field ~ 'regex'`.
pub fn matches(field: impl Into<Field>, regex: impl Into<String>) -> Expression {
    query(Expression::Matches {
        field: field.into(),
        regex: regex.into(),
    })
}

pub fn complies(field: impl Into<Field>, pattern: impl Into<String>) -> Expression {
    query(Expression::Complies {
        field: field.into(),
        pattern: pattern.into(),
    })
}

pub fn word_complies(field: impl Into<Field>, pattern: impl Into<String>) -> Expression {
    query(Expression::WordComplies {
        field: field.into(),
        pattern: pattern.into(),
    })
}

pub fn is_null(field: impl Into<Field>) -> Expression {
    query(Expression::IsNull(field.into()))
}

pub fn is_empty(field: impl Into<Field>) -> Expression {
    query(Expression::IsEmpty(field.into()))
}

pub fn is_valid(field: impl Into<Field>) -> Expression {
    query(Expression::IsValid(field.into()))
}

pub fn is_invalid(field: impl Into<Field>) -> Expression {
    query(Expression::IsInvalid(field.into()))
}

pub fn and(expressions: impl IntoIterator<Item = Expression>) -> Expression {
    query(Expression::conjunction(expressions))
}

pub fn or(expressions: impl IntoIterator<Item = Expression>) -> Expression {
    Expression::disjunction(expressions)
}

pub fn not(expression: Expression) -> Expression {
    query(Expression::negation(expression))
}
