//! Translation of TQL expressions into document-store query criteria.
//!
//! The output is a JSON document in the usual operator syntax:
//!
//! | TQL                          | Criteria                                      |
//! |------------------------------|-----------------------------------------------|
//! | `age = 18`                   | `{"age": 18}`                                 |
//! | `age >= 18`                  | `{"age": {"$gte": 18}}`                       |
//! | `start < end`                | `{"$expr": {"$lt": ["$start", "$end"]}}`      |
//! | `age between ]18, 65]`       | `{"age": {"$gt": 18, "$lte": 65}}`            |
//! | `code in [1, 2]`             | `{"code": {"$in": [1, 2]}}`                   |
//! | `name containsIgnoreCase 'a'`| `{"name": {"$regex": "a", "$options": "i"}}`  |
//! | `name is null`               | `{"name": null}`                              |
//! | `a and b` / `a or b`         | `{"$and": [..]}` / `{"$or": [..]}`            |
//! | `not (a)`                    | `{"$nor": [a]}`                               |

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::{Map, Value, json};
use tracing::{debug, instrument};

use crate::ast::{ComparisonOperator, Expression, Field, LiteralKind, LiteralValue, Operand};
use crate::error::{Result, TqlError};
use crate::pattern::{self, PatternKind};

/// Translates `expr` into a criteria document.
#[instrument(skip(expr))]
pub fn to_criteria(expr: &Expression) -> Result<Value> {
    let criteria = translate(expr)?;
    debug!("criteria for {}: {}", expr, criteria);
    Ok(criteria)
}

fn translate(expr: &Expression) -> Result<Value> {
    match expr {
        Expression::Or(branches) => composite(branches, "OR", "$or"),
        Expression::And(children) => composite(children, "AND", "$and"),
        Expression::Not(inner) => Ok(negate(translate(inner)?)),

        Expression::Comparison {
            field,
            operator,
            value,
        } => {
            let path = path(field, operator.symbol())?;
            match value {
                Operand::Literal(literal) => {
                    let value = literal_json(literal)?;
                    Ok(match operator {
                        ComparisonOperator::Eq => single(path, value),
                        op => single(path, single(operator_key(*op), value)),
                    })
                }
                Operand::Field(other) => Ok(single(
                    "$expr",
                    single(
                        operator_key(*operator),
                        json!([format!("${}", path), format!("${}", other)]),
                    ),
                )),
            }
        }

        Expression::Between {
            field,
            left,
            right,
            lower_open,
            upper_open,
        } => {
            let path = path(field, "between")?;
            let mut range = Map::new();
            range.insert(
                if *lower_open { "$gt" } else { "$gte" }.to_string(),
                literal_json(left)?,
            );
            range.insert(
                if *upper_open { "$lt" } else { "$lte" }.to_string(),
                literal_json(right)?,
            );
            Ok(single(path, Value::Object(range)))
        }

        Expression::In { field, values } => {
            let path = path(field, "in")?;
            let values = values
                .iter()
                .map(literal_json)
                .collect::<Result<Vec<_>>>()?;
            Ok(single(path, json!({ "$in": values })))
        }

        Expression::Contains {
            field,
            value,
            case_sensitive,
        } => {
            // An empty needle stays a regex and matches every value.
            let path = path(field, "contains")?;
            let mut condition = Map::new();
            condition.insert("$regex".to_string(), json!(regex::escape(value)));
            if !case_sensitive {
                condition.insert("$options".to_string(), json!("i"));
            }
            Ok(single(path, Value::Object(condition)))
        }

        Expression::Matches { field, regex } => regex_criteria(path(field, "~")?, regex),
        Expression::Complies { field, pattern } => {
            compiled_pattern(path(field, "complies")?, PatternKind::Character, pattern)
        }
        Expression::WordComplies { field, pattern } => {
            compiled_pattern(path(field, "wordComplies")?, PatternKind::Word, pattern)
        }

        Expression::IsNull(field) => Ok(single(path(field, "is null")?, Value::Null)),
        Expression::IsEmpty(field) => Ok(single(path(field, "is empty")?, json!(""))),
        Expression::IsValid(_) | Expression::IsInvalid(_) => Err(TqlError::Unsupported(
            "validity checks have no criteria equivalent".to_string(),
        )),
    }
}

fn composite(children: &[Expression], name: &'static str, key: &str) -> Result<Value> {
    match children {
        [] => Err(TqlError::EmptyComposite(name)),
        [only] => translate(only),
        _ => {
            let translated = children
                .iter()
                .map(translate)
                .collect::<Result<Vec<_>>>()?;
            Ok(single(key, Value::Array(translated)))
        }
    }
}

/// `$not` only applies to an operator expression on one field, so regex
/// conditions keep their field and everything else goes through `$nor`.
fn negate(criteria: Value) -> Value {
    if let Value::Object(map) = &criteria {
        if let Some((field, Value::Object(condition))) = single_entry(map) {
            if !field.starts_with('$') && condition.contains_key("$regex") {
                return single(field, json!({ "$not": condition }));
            }
        }
    }
    json!({ "$nor": [criteria] })
}

fn single_entry(map: &Map<String, Value>) -> Option<(&String, &Value)> {
    if map.len() == 1 { map.iter().next() } else { None }
}

fn single(key: impl Into<String>, value: Value) -> Value {
    let mut map = Map::new();
    map.insert(key.into(), value);
    Value::Object(map)
}

fn path<'a>(field: &'a Field, context: &str) -> Result<&'a str> {
    match field {
        Field::Reference(path) => Ok(path),
        Field::All => Err(TqlError::Wildcard(format!("in '{}' criteria", context))),
    }
}

fn operator_key(operator: ComparisonOperator) -> &'static str {
    match operator {
        ComparisonOperator::Eq => "$eq",
        ComparisonOperator::Neq => "$ne",
        ComparisonOperator::Lt => "$lt",
        ComparisonOperator::Gt => "$gt",
        ComparisonOperator::Let => "$lte",
        ComparisonOperator::Get => "$gte",
    }
}

fn regex_criteria(path: &str, regex: &str) -> Result<Value> {
    if regex.is_empty() {
        return Ok(single(path, json!("")));
    }
    Ok(single(path, json!({ "$regex": regex })))
}

fn compiled_pattern(path: &str, kind: PatternKind, pattern: &str) -> Result<Value> {
    if pattern.is_empty() {
        return Ok(single(path, json!("")));
    }
    regex_criteria(path, &pattern::to_regex(kind, pattern)?)
}

/// Converts a literal to its JSON value: INT to an integer (64-bit at
/// most), DECIMAL to a floating point number.
fn literal_json(literal: &LiteralValue) -> Result<Value> {
    let overflow = || TqlError::LiteralOverflow(literal.value.clone());
    match literal.kind {
        LiteralKind::Int => literal
            .value
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| overflow()),
        LiteralKind::Decimal => {
            let decimal = Decimal::from_str(&literal.value).map_err(|_| overflow())?;
            decimal
                .to_f64()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
                .ok_or_else(overflow)
        }
        LiteralKind::Boolean => Ok(Value::Bool(literal.value == "true")),
        LiteralKind::QuotedValue => Ok(Value::String(literal.value.clone())),
    }
}
