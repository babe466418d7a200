//! In-process evaluation of TQL expressions over JSON records.
//!
//! ```
//! use serde_json::json;
//! use tql_lang::parse;
//! use tql_lang::predicate::RecordPredicate;
//!
//! let query = parse("country = 'fr' and age between [18, 65]").unwrap();
//! let predicate = RecordPredicate::compile(&query).unwrap();
//!
//! assert!(predicate.matches(&json!({"country": "FR", "age": 30})));
//! assert!(!predicate.matches(&json!({"country": "FR", "age": 70})));
//! ```

use std::cmp::Ordering;
use std::str::FromStr;

use regex::Regex;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::ast::{ComparisonOperator, Expression, Field, Operand};
use crate::error::{Result, TqlError};
use crate::pattern::{self, PatternKind};

/// A compiled TQL expression that tests records.
///
/// Field paths are dotted (`address.city`); arrays on the way fan out, and a
/// leaf holds as soon as one of the values it reaches satisfies it. Missing
/// fields read as `null`. `*` stands for every leaf value of the record.
#[derive(Debug, Clone)]
pub struct RecordPredicate {
    root: Node,
}

#[derive(Debug, Clone)]
enum Node {
    Any(Vec<Node>),
    All(Vec<Node>),
    Not(Box<Node>),
    Leaf { field: Field, test: Test },
}

#[derive(Debug, Clone)]
enum Test {
    Compare {
        operator: ComparisonOperator,
        value: Operand,
    },
    Range {
        lower: Option<Decimal>,
        upper: Option<Decimal>,
        lower_open: bool,
        upper_open: bool,
    },
    In(Vec<String>),
    Contains {
        needle: String,
        case_sensitive: bool,
    },
    Regex(Regex),
    Null,
    Empty,
}

impl RecordPredicate {
    /// Compiles `expr`; regexes and patterns are compiled here once.
    #[instrument(skip(expr))]
    pub fn compile(expr: &Expression) -> Result<Self> {
        debug!("compiling predicate for {}", expr);
        Ok(RecordPredicate {
            root: compile(expr)?,
        })
    }

    pub fn matches(&self, record: &Value) -> bool {
        self.root.eval(record)
    }

    /// The records of `records` that match, in order.
    pub fn filter<'r>(&self, records: &'r [Value]) -> impl Iterator<Item = &'r Value> {
        records.iter().filter(move |record| self.matches(record))
    }
}

fn compile(expr: &Expression) -> Result<Node> {
    let leaf = |field: &Field, test: Test| {
        Ok(Node::Leaf {
            field: field.clone(),
            test,
        })
    };

    match expr {
        Expression::Or(branches) => Ok(Node::Any(composite(branches, "OR")?)),
        Expression::And(children) => Ok(Node::All(composite(children, "AND")?)),
        Expression::Not(inner) => Ok(Node::Not(Box::new(compile(inner)?))),

        Expression::Comparison {
            field,
            operator,
            value,
        } => leaf(
            field,
            Test::Compare {
                operator: *operator,
                value: value.clone(),
            },
        ),
        Expression::Between {
            field,
            left,
            right,
            lower_open,
            upper_open,
        } => leaf(
            field,
            Test::Range {
                lower: number(&left.value),
                upper: number(&right.value),
                lower_open: *lower_open,
                upper_open: *upper_open,
            },
        ),
        Expression::In { field, values } => leaf(
            field,
            Test::In(values.iter().map(|v| v.value.clone()).collect()),
        ),
        Expression::Contains {
            field,
            value,
            case_sensitive,
        } => leaf(
            field,
            Test::Contains {
                needle: if *case_sensitive {
                    value.clone()
                } else {
                    value.to_lowercase()
                },
                case_sensitive: *case_sensitive,
            },
        ),
        Expression::Matches { field, regex } => leaf(field, Test::Regex(full_match(regex)?)),
        Expression::Complies {
            field,
            pattern: text,
        } => leaf(
            field,
            Test::Regex(full_match(&pattern::to_regex(PatternKind::Character, text)?)?),
        ),
        Expression::WordComplies {
            field,
            pattern: text,
        } => leaf(
            field,
            Test::Regex(full_match(&pattern::to_regex(PatternKind::Word, text)?)?),
        ),
        Expression::IsNull(field) => leaf(field, Test::Null),
        Expression::IsEmpty(field) => leaf(field, Test::Empty),
        Expression::IsValid(_) | Expression::IsInvalid(_) => Err(TqlError::Unsupported(
            "validity checks need a type system and can't be evaluated on records".to_string(),
        )),
    }
}

fn composite(children: &[Expression], name: &'static str) -> Result<Vec<Node>> {
    if children.is_empty() {
        return Err(TqlError::EmptyComposite(name));
    }
    children.iter().map(compile).collect()
}

fn full_match(regex: &str) -> Result<Regex> {
    Regex::new(&format!("^(?:{})$", regex))
        .map_err(|e| TqlError::Pattern(format!("invalid regex '{}': {}", regex, e)))
}

impl Node {
    fn eval(&self, record: &Value) -> bool {
        match self {
            Node::Any(branches) => branches.iter().any(|node| node.eval(record)),
            Node::All(children) => children.iter().all(|node| node.eval(record)),
            Node::Not(inner) => !inner.eval(record),
            Node::Leaf { field, test } => {
                let values = resolve(record, field);
                values.iter().any(|value| test.holds(value, record))
            }
        }
    }
}

impl Test {
    fn holds(&self, value: &Value, record: &Value) -> bool {
        match self {
            Test::Compare {
                operator,
                value: Operand::Literal(literal),
            } => compare(*operator, value, &literal.value),
            Test::Compare {
                operator,
                value: Operand::Field(other),
            } => resolve(record, &Field::Reference(other.clone()))
                .iter()
                .any(|other| compare(*operator, value, &text(other))),
            Test::Range {
                lower,
                upper,
                lower_open,
                upper_open,
            } => match (value_number(value), lower, upper) {
                (Some(n), Some(lower), Some(upper)) => {
                    let above = if *lower_open { n > *lower } else { n >= *lower };
                    let below = if *upper_open { n < *upper } else { n <= *upper };
                    above && below
                }
                _ => false,
            },
            Test::In(candidates) => candidates
                .iter()
                .any(|candidate| equals(value, candidate)),
            Test::Contains {
                needle,
                case_sensitive,
            } => {
                let haystack = text(value);
                if *case_sensitive {
                    haystack.contains(needle.as_str())
                } else {
                    haystack.to_lowercase().contains(needle.as_str())
                }
            }
            Test::Regex(regex) => !value.is_null() && regex.is_match(&text(value)),
            Test::Null => value.is_null(),
            Test::Empty => text(value).is_empty(),
        }
    }
}

static NULL: Value = Value::Null;

/// Values reached by `field` in `record`; a missing field yields `null`.
fn resolve<'a>(record: &'a Value, field: &Field) -> Vec<&'a Value> {
    let path = match field {
        Field::All => {
            let mut leaves = vec![];
            collect_leaves(record, &mut leaves);
            return leaves;
        }
        Field::Reference(path) => path,
    };

    let mut current = vec![record];
    for segment in path.split('.') {
        current = current
            .into_iter()
            .flat_map(fan_out)
            .filter_map(|value| value.get(segment))
            .collect();
    }
    let values: Vec<&Value> = current.into_iter().flat_map(fan_out).collect();
    if values.is_empty() {
        vec![&NULL]
    } else {
        values
    }
}

fn fan_out(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    }
}

fn collect_leaves<'a>(value: &'a Value, out: &mut Vec<&'a Value>) {
    match value {
        Value::Object(map) => map.values().for_each(|v| collect_leaves(v, out)),
        Value::Array(items) => items.iter().for_each(|v| collect_leaves(v, out)),
        leaf => out.push(leaf),
    }
}

/// Text form of a record value; `null` reads as the empty string.
fn text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn number(text: &str) -> Option<Decimal> {
    let text = text.trim();
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

fn value_number(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => number(&n.to_string()),
        Value::String(s) => number(s),
        _ => None,
    }
}

/// Numbers compare by value, everything else by text ignoring case.
fn equals(value: &Value, literal: &str) -> bool {
    match (value_number(value), number(literal)) {
        (Some(a), Some(b)) => a == b,
        _ => text(value).to_lowercase() == literal.to_lowercase(),
    }
}

fn compare(operator: ComparisonOperator, value: &Value, literal: &str) -> bool {
    match operator {
        ComparisonOperator::Eq => equals(value, literal),
        ComparisonOperator::Neq => !equals(value, literal),
        ordering => {
            let (Some(a), Some(b)) = (value_number(value), number(literal)) else {
                return false;
            };
            let order = a.cmp(&b);
            match ordering {
                ComparisonOperator::Lt => order == Ordering::Less,
                ComparisonOperator::Gt => order == Ordering::Greater,
                ComparisonOperator::Let => order != Ordering::Greater,
                ComparisonOperator::Get => order != Ordering::Less,
                ComparisonOperator::Eq | ComparisonOperator::Neq => false,
            }
        }
    }
}
