//! Lowering of TQL expressions into the embedded expression language.
//!
//! A single translation function is driven by a [`LoweringPolicy`]. The
//! presets cover the three targets in use:
//!
//! | Policy  | `* is empty`                   | `contains` flag         | `a > 1`                                  |
//! |---------|--------------------------------|-------------------------|------------------------------------------|
//! | generic | error                          | only when ignoring case | `a > 1`                                  |
//! | storage | `hasEmpty(*)`                  | only when ignoring case | `a > 1`                                  |
//! | runtime | `isEmpty(f1) \|\| isEmpty(f2)` | always                  | `matches(a, '^-?\d+(\.\d+)?$') && a > 1` |

pub mod literals;
pub mod policy;

pub use policy::{CaseFlag, LoweringPolicy, NUMERIC_PATTERN, WildcardStrategy};

use tracing::{debug, instrument};

use crate::ast::{Expression, Field, Operand};
use crate::el::{ElLiteral, ElNode};
use crate::error::{Result, TqlError};
use crate::field_types::FieldTypes;
use crate::pattern::{self, PatternKind};
use literals::{compare_op, lower_literal};

/// Lowers `expr` into an EL tree.
///
/// `types` is only consulted by `is valid`/`is invalid` and by wildcard
/// expansion; everything else lowers without it.
#[instrument(skip(expr, types), fields(known_fields = ?types.map(FieldTypes::len)))]
pub fn lower(
    expr: &Expression,
    policy: &LoweringPolicy,
    types: Option<&FieldTypes>,
) -> Result<ElNode> {
    debug!("lowering {}", expr);
    Lowering { policy, types }.expression(expr)
}

/// Lowers with [`LoweringPolicy::generic`].
pub fn lower_generic(expr: &Expression, types: Option<&FieldTypes>) -> Result<ElNode> {
    lower(expr, &LoweringPolicy::generic(), types)
}

/// Lowers with [`LoweringPolicy::storage`].
pub fn lower_for_storage(expr: &Expression, types: Option<&FieldTypes>) -> Result<ElNode> {
    lower(expr, &LoweringPolicy::storage(), types)
}

/// Lowers with [`LoweringPolicy::runtime`].
pub fn lower_for_runtime(expr: &Expression, types: Option<&FieldTypes>) -> Result<ElNode> {
    lower(expr, &LoweringPolicy::runtime(), types)
}

/// The four checks that accept `*`.
#[derive(Debug, Clone, Copy)]
enum Check {
    Null,
    Empty,
    Valid,
    Invalid,
}

impl Check {
    fn function(self) -> &'static str {
        match self {
            Check::Null => "isNull",
            Check::Empty => "isEmpty",
            Check::Valid => "isValid",
            Check::Invalid => "isInvalid",
        }
    }

    fn needs_type(self) -> bool {
        matches!(self, Check::Valid | Check::Invalid)
    }

    fn keyword(self) -> &'static str {
        match self {
            Check::Null => "is null",
            Check::Empty => "is empty",
            Check::Valid => "is valid",
            Check::Invalid => "is invalid",
        }
    }
}

struct Lowering<'a> {
    policy: &'a LoweringPolicy,
    types: Option<&'a FieldTypes>,
}

impl Lowering<'_> {
    fn expression(&self, expr: &Expression) -> Result<ElNode> {
        match expr {
            Expression::Or(branches) => self.composite(branches, "OR", ElNode::Or),
            Expression::And(children) => self.composite(children, "AND", ElNode::And),
            Expression::Not(inner) => Ok(ElNode::Not(Box::new(self.expression(inner)?))),

            Expression::Comparison {
                field,
                operator,
                value,
            } => {
                let path = self.path(field, operator.symbol())?;
                let right = match value {
                    Operand::Literal(literal) => lower_literal(literal)?,
                    Operand::Field(other) => ElNode::path(other),
                };
                let comparison = ElNode::compare(compare_op(*operator), path.clone(), right);

                if !(self.policy.numeric_guard && operator.is_ordering()) {
                    return Ok(comparison);
                }
                match value {
                    Operand::Literal(literal) if literal.kind.is_numeric() => {
                        Ok(ElNode::And(vec![numeric_guard(path), comparison]))
                    }
                    Operand::Field(other) => Ok(ElNode::And(vec![
                        numeric_guard(path),
                        numeric_guard(ElNode::path(other)),
                        comparison,
                    ])),
                    Operand::Literal(_) => Ok(comparison),
                }
            }

            Expression::Between {
                field,
                left,
                right,
                lower_open,
                upper_open,
            } => {
                let mut args = vec![
                    self.path(field, "between")?,
                    lower_literal(left)?,
                    lower_literal(right)?,
                ];
                if *lower_open || *upper_open {
                    args.push(ElNode::boolean(*lower_open));
                    args.push(ElNode::boolean(*upper_open));
                }
                Ok(ElNode::call("between", args))
            }

            Expression::In { field, values } => {
                if values.is_empty() {
                    return Err(TqlError::Semantic(
                        "'in' needs at least one value".to_string(),
                    ));
                }
                let mut args = vec![self.path(field, "in")?];
                for value in values {
                    args.push(lower_literal(value)?);
                }
                Ok(ElNode::call("in", args))
            }

            Expression::Contains {
                field,
                value,
                case_sensitive,
            } => {
                let mut args = vec![self.path(field, "contains")?, ElNode::string(value)];
                match (self.policy.case_flag, *case_sensitive) {
                    (CaseFlag::Always, flag) => args.push(ElNode::boolean(flag)),
                    (CaseFlag::WhenInsensitive, false) => args.push(ElNode::boolean(false)),
                    (CaseFlag::WhenInsensitive, true) => {}
                }
                Ok(ElNode::call("contains", args))
            }

            Expression::Matches { field, regex } => Ok(ElNode::call(
                "matches",
                vec![self.path(field, "~")?, ElNode::string(regex)],
            )),
            Expression::Complies { field, pattern } => {
                self.pattern(field, "complies", PatternKind::Character, pattern)
            }
            Expression::WordComplies { field, pattern } => {
                self.pattern(field, "wordComplies", PatternKind::Word, pattern)
            }

            Expression::IsNull(field) => self.check(field, Check::Null),
            Expression::IsEmpty(field) => self.check(field, Check::Empty),
            Expression::IsValid(field) => self.check(field, Check::Valid),
            Expression::IsInvalid(field) => self.check(field, Check::Invalid),
        }
    }

    fn composite(
        &self,
        children: &[Expression],
        name: &'static str,
        build: fn(Vec<ElNode>) -> ElNode,
    ) -> Result<ElNode> {
        match children {
            [] => Err(TqlError::EmptyComposite(name)),
            [only] => self.expression(only),
            _ => {
                let lowered = children
                    .iter()
                    .map(|child| self.expression(child))
                    .collect::<Result<Vec<_>>>()?;
                Ok(build(lowered))
            }
        }
    }

    fn path(&self, field: &Field, context: &str) -> Result<ElNode> {
        match field {
            Field::Reference(path) => Ok(ElNode::path(path)),
            Field::All => Err(TqlError::Wildcard(format!("in '{}' predicates", context))),
        }
    }

    fn pattern(
        &self,
        field: &Field,
        context: &str,
        kind: PatternKind,
        pattern: &str,
    ) -> Result<ElNode> {
        let path = self.path(field, context)?;
        let regex = pattern::to_regex(kind, pattern)?;
        Ok(ElNode::call("matches", vec![path, ElNode::string(regex)]))
    }

    fn type_of(&self, field: &str) -> Result<ElNode> {
        let types = self.types.ok_or_else(|| TqlError::TypeNotFound {
            field: field.to_string(),
        })?;
        Ok(ElNode::string(types.require(field)?))
    }

    fn check(&self, field: &Field, check: Check) -> Result<ElNode> {
        let path = match field {
            Field::Reference(path) => path,
            Field::All => return self.wildcard(check),
        };

        let mut args = vec![ElNode::path(path)];
        if check.needs_type() {
            args.push(self.type_of(path)?);
        }
        Ok(ElNode::call(check.function(), args))
    }

    fn wildcard(&self, check: Check) -> Result<ElNode> {
        match (self.policy.wildcard, check) {
            (WildcardStrategy::Reject, _) => Err(TqlError::Wildcard(format!(
                "in '{}' by this policy",
                check.keyword()
            ))),
            (WildcardStrategy::Sentinel, Check::Empty) => {
                Ok(ElNode::call("hasEmpty", vec![ElNode::AllFields]))
            }
            (WildcardStrategy::Sentinel, Check::Invalid) => {
                Ok(ElNode::call("hasInvalid", vec![ElNode::AllFields]))
            }
            (WildcardStrategy::Sentinel, _) => Err(TqlError::Wildcard(format!(
                "in '{}' without field expansion",
                check.keyword()
            ))),
            (WildcardStrategy::Expand, _) => self.expand(check),
        }
    }

    fn expand(&self, check: Check) -> Result<ElNode> {
        let types = match self.types {
            Some(types) if !types.is_empty() => types,
            _ => {
                return Err(TqlError::Wildcard(format!(
                    "in '{}' without any known field to expand it to",
                    check.keyword()
                )));
            }
        };

        let calls: Vec<ElNode> = types
            .iter()
            .map(|(field, type_name)| {
                let mut args = vec![ElNode::path(field)];
                if check.needs_type() {
                    args.push(ElNode::string(type_name));
                }
                ElNode::call(check.function(), args)
            })
            .collect();
        debug!(fields = calls.len(), "expanded '* {}'", check.keyword());

        Ok(match check {
            Check::Valid => ElNode::And(calls),
            _ => ElNode::Or(calls),
        })
    }
}

fn numeric_guard(path: ElNode) -> ElNode {
    ElNode::call(
        "matches",
        vec![path, ElNode::Literal(ElLiteral::String(NUMERIC_PATTERN.to_string()))],
    )
}
