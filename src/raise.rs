//! Raising EL trees back into TQL.
//!
//! This is the inverse of [lowering](crate::lower): it understands the
//! vocabulary lowering produces and rejects every other EL construct with
//! [`TqlError::Unsupported`].
//!
//! ```
//! use tql_lang::ast::TqlElement;
//! use tql_lang::raise::raise_str;
//!
//! let query = raise_str("between(age, 18, 65, true, false) && !(isNull(name))").unwrap();
//! assert_eq!(
//!     query.to_query_string(),
//!     "((age between ]18, 65]) and (not ((name is null))))"
//! );
//! ```

use tracing::{debug, instrument};

use crate::ast::{ComparisonOperator, Expression, Field, LiteralKind, LiteralValue, Operand};
use crate::el::{CompareOp, ElLiteral, ElNode, parse_el};
use crate::error::{Result, TqlError};
use crate::lower::{LoweringPolicy, NUMERIC_PATTERN};
use crate::parser::check_between_bounds;

/// Raises an EL tree into a canonical `Or[And[...]]` expression.
///
/// Every call is kept as written, `matches` included. Trees lowered with
/// numeric guards go through [`raise_with_policy`] instead.
pub fn raise(node: &ElNode) -> Result<Expression> {
    raise_with_policy(node, &LoweringPolicy::generic())
}

/// Raises a tree lowered under `policy`.
///
/// When the policy guards numeric comparisons, every `&&` shaped exactly
/// like a guard group (`matches(p, NUMERIC) && p > 1`, or two guards then
/// `p < q`) reads back as the bare comparison. A `matches` anywhere else
/// is kept.
#[instrument(skip(node, policy), fields(numeric_guard = policy.numeric_guard))]
pub fn raise_with_policy(node: &ElNode, policy: &LoweringPolicy) -> Result<Expression> {
    debug!("raising {}", node);
    let raiser = Raiser {
        strip_guards: policy.numeric_guard,
    };
    Ok(Expression::disjunction([raiser.node(node)?]))
}

/// Parses EL text and raises it.
pub fn raise_str(el: &str) -> Result<Expression> {
    raise(&parse_el(el)?)
}

/// Parses EL text and raises it as lowered under `policy`.
pub fn raise_str_with_policy(el: &str, policy: &LoweringPolicy) -> Result<Expression> {
    raise_with_policy(&parse_el(el)?, policy)
}

fn unsupported(node: &ElNode) -> TqlError {
    TqlError::Unsupported(node.describe())
}

struct Raiser {
    strip_guards: bool,
}

impl Raiser {
    fn node(&self, node: &ElNode) -> Result<Expression> {
        match node {
            ElNode::Or(branches) => Ok(Expression::disjunction(
                branches
                    .iter()
                    .map(|branch| self.node(branch))
                    .collect::<Result<Vec<_>>>()?,
            )),
            ElNode::And(children) => {
                if self.strip_guards
                    && let Some(comparison) = guarded_comparison(children)
                {
                    return self.node(comparison);
                }
                Ok(Expression::conjunction(
                    children
                        .iter()
                        .map(|child| self.node(child))
                        .collect::<Result<Vec<_>>>()?,
                ))
            }
            ElNode::Not(inner) => self.negate(inner),
            ElNode::Compare { op, left, right } => comparison(*op, left, right),
            // `field = 123` reads as an assignment but means equality.
            ElNode::Assignment { target, value } => comparison(CompareOp::Eq, target, value),
            ElNode::Call { name, args } if name == "not" => {
                arity(name, args, 1, 1)?;
                self.negate(&args[0])
            }
            ElNode::Call { name, args } => call(name, args),
            ElNode::Path(_)
            | ElNode::AllFields
            | ElNode::Literal(_)
            | ElNode::Arithmetic { .. }
            | ElNode::Conditional { .. }
            | ElNode::Switch { .. }
            | ElNode::Array(_)
            | ElNode::Block(_) => Err(unsupported(node)),
        }
    }

    fn negate(&self, inner: &ElNode) -> Result<Expression> {
        match inner {
            ElNode::Path(_) | ElNode::Literal(_) | ElNode::AllFields => Err(
                TqlError::Unsupported(format!("'!' applied to {}", inner.describe())),
            ),
            _ => Ok(Expression::negation(self.node(inner)?)),
        }
    }
}

/// The path checked by a runtime numeric guard, if `node` is one.
fn numeric_guard_path(node: &ElNode) -> Option<&str> {
    match node {
        ElNode::Call { name, args } if name == "matches" => match args.as_slice() {
            [ElNode::Path(path), ElNode::Literal(ElLiteral::String(regex))]
                if regex == NUMERIC_PATTERN =>
            {
                Some(path)
            }
            _ => None,
        },
        _ => None,
    }
}

fn is_number(literal: &ElLiteral) -> bool {
    matches!(
        literal,
        ElLiteral::Int(_) | ElLiteral::Long(_) | ElLiteral::Decimal(_) | ElLiteral::Double(_)
    )
}

/// The comparison inside a guard group, as lowering emits it:
/// `[guard(p), p <op> number]` or `[guard(p), guard(q), p <op> q]`.
fn guarded_comparison(children: &[ElNode]) -> Option<&ElNode> {
    match children {
        [guard, comparison @ ElNode::Compare { op, left, right }] if op.is_ordering() => {
            let path = numeric_guard_path(guard)?;
            match (left.as_ref(), right.as_ref()) {
                (ElNode::Path(p), ElNode::Literal(literal)) if p == path && is_number(literal) => {
                    Some(comparison)
                }
                _ => None,
            }
        }
        [first, second, comparison @ ElNode::Compare { op, left, right }]
            if op.is_ordering() =>
        {
            let (p, q) = (numeric_guard_path(first)?, numeric_guard_path(second)?);
            match (left.as_ref(), right.as_ref()) {
                (ElNode::Path(l), ElNode::Path(r)) if l == p && r == q => Some(comparison),
                _ => None,
            }
        }
        _ => None,
    }
}

fn operator(op: CompareOp) -> ComparisonOperator {
    match op {
        CompareOp::Eq => ComparisonOperator::Eq,
        CompareOp::Neq => ComparisonOperator::Neq,
        CompareOp::Lt => ComparisonOperator::Lt,
        CompareOp::Gt => ComparisonOperator::Gt,
        CompareOp::Le => ComparisonOperator::Let,
        CompareOp::Ge => ComparisonOperator::Get,
    }
}

fn comparison(op: CompareOp, left: &ElNode, right: &ElNode) -> Result<Expression> {
    let (field, op, value) = match (left, right) {
        (ElNode::Path(_) | ElNode::AllFields, _) => (field(left)?, op, right),
        // `10 < age` is `age > 10`
        (ElNode::Literal(_), ElNode::Path(_)) => (field(right)?, op.flipped(), left),
        (ElNode::Literal(_), ElNode::Literal(_)) => {
            return Err(TqlError::Unsupported(format!(
                "comparison between two literals ({} {} {})",
                left,
                op.symbol(),
                right
            )));
        }
        (ElNode::Literal(_), other) | (other, _) => return Err(unsupported(other)),
    };

    let value = match value {
        ElNode::Literal(literal) => Operand::Literal(literal_value(literal)),
        ElNode::Path(path) => Operand::Field(path.clone()),
        other => return Err(unsupported(other)),
    };

    Ok(Expression::Comparison {
        field,
        operator: operator(op),
        value,
    })
}

fn field(node: &ElNode) -> Result<Field> {
    match node {
        ElNode::Path(path) => Ok(Field::Reference(path.clone())),
        ElNode::AllFields => Ok(Field::All),
        other => Err(TqlError::Semantic(format!(
            "expected a field, found {}",
            other.describe()
        ))),
    }
}

/// Formats a double the way it reads back: `999.0`, `123.456`.
fn double_text(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

/// Maps an EL literal onto the TQL literal kind lowering would have
/// started from.
pub fn literal_value(literal: &ElLiteral) -> LiteralValue {
    match literal {
        ElLiteral::Int(n) => LiteralValue::int(i64::from(*n)),
        ElLiteral::Long(n) => LiteralValue::int(*n),
        ElLiteral::Decimal(d) if d.scale() == 0 => {
            LiteralValue::new(LiteralKind::Int, d.to_string())
        }
        ElLiteral::Decimal(d) => LiteralValue::decimal(d.to_string()),
        ElLiteral::Double(d) => LiteralValue::decimal(double_text(*d)),
        ElLiteral::Boolean(b) => LiteralValue::boolean(*b),
        ElLiteral::String(s) => LiteralValue::quoted(s.clone()),
    }
}

fn literal_arg(function: &str, node: &ElNode) -> Result<LiteralValue> {
    match node {
        ElNode::Literal(literal) => Ok(literal_value(literal)),
        other => Err(TqlError::Semantic(format!(
            "'{}' expects literal values, found {}",
            function,
            other.describe()
        ))),
    }
}

fn string_arg(function: &str, node: &ElNode) -> Result<String> {
    match node {
        ElNode::Literal(ElLiteral::String(s)) => Ok(s.clone()),
        other => Err(TqlError::Semantic(format!(
            "'{}' expects a string, found {}",
            function,
            other.describe()
        ))),
    }
}

fn bool_arg(function: &str, node: &ElNode) -> Result<bool> {
    match node {
        ElNode::Literal(ElLiteral::Boolean(b)) => Ok(*b),
        other => Err(TqlError::Semantic(format!(
            "'{}' expects a boolean flag, found {}",
            function,
            other.describe()
        ))),
    }
}

fn arity(function: &str, args: &[ElNode], min: usize, max: usize) -> Result<()> {
    if args.len() < min || args.len() > max {
        let expected = if min == max {
            min.to_string()
        } else {
            format!("{} to {}", min, max)
        };
        return Err(TqlError::Semantic(format!(
            "'{}' expects {} argument(s), found {}",
            function,
            expected,
            args.len()
        )));
    }
    Ok(())
}

fn call(name: &str, args: &[ElNode]) -> Result<Expression> {
    match name {
        "isNull" | "isEmpty" => {
            arity(name, args, 1, 1)?;
            let field = field(&args[0])?;
            Ok(if name == "isNull" {
                Expression::IsNull(field)
            } else {
                Expression::IsEmpty(field)
            })
        }
        // The type argument is dropped: TQL resolves it again when lowering.
        "isValid" | "isInvalid" => {
            arity(name, args, 1, 2)?;
            let field = field(&args[0])?;
            Ok(if name == "isValid" {
                Expression::IsValid(field)
            } else {
                Expression::IsInvalid(field)
            })
        }
        "hasEmpty" | "hasInvalid" => {
            match args {
                [] | [ElNode::AllFields] => {}
                _ => {
                    return Err(TqlError::Semantic(format!(
                        "'{}' only applies to '*'",
                        name
                    )));
                }
            }
            Ok(if name == "hasEmpty" {
                Expression::IsEmpty(Field::All)
            } else {
                Expression::IsInvalid(Field::All)
            })
        }
        "matches" => {
            arity(name, args, 2, 2)?;
            Ok(Expression::Matches {
                field: field(&args[0])?,
                regex: string_arg(name, &args[1])?,
            })
        }
        "complies" | "wordComplies" => {
            arity(name, args, 2, 2)?;
            let field = field(&args[0])?;
            let pattern = string_arg(name, &args[1])?;
            Ok(if name == "complies" {
                Expression::Complies { field, pattern }
            } else {
                Expression::WordComplies { field, pattern }
            })
        }
        "contains" => {
            arity(name, args, 2, 3)?;
            let case_sensitive = match args.get(2) {
                Some(flag) => bool_arg(name, flag)?,
                None => true,
            };
            Ok(Expression::Contains {
                field: field(&args[0])?,
                value: string_arg(name, &args[1])?,
                case_sensitive,
            })
        }
        "between" => {
            arity(name, args, 3, 5)?;
            let left = literal_arg(name, &args[1])?;
            let right = literal_arg(name, &args[2])?;
            check_between_bounds(&left, &right)?;
            let lower_open = match args.get(3) {
                Some(flag) => bool_arg(name, flag)?,
                None => false,
            };
            let upper_open = match args.get(4) {
                Some(flag) => bool_arg(name, flag)?,
                None => false,
            };
            Ok(Expression::Between {
                field: field(&args[0])?,
                left,
                right,
                lower_open,
                upper_open,
            })
        }
        "in" | "isPresentIn" => {
            if args.len() < 2 {
                return Err(TqlError::Semantic(format!(
                    "'{}' expects a field and at least one value",
                    name
                )));
            }
            let values = args[1..]
                .iter()
                .map(|arg| literal_arg(name, arg))
                .collect::<Result<Vec<_>>>()?;
            Ok(Expression::In {
                field: field(&args[0])?,
                values,
            })
        }
        other => Err(TqlError::Unsupported(format!("function '{}'", other))),
    }
}
