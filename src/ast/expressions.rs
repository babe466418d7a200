use std::fmt;

use serde::{Deserialize, Serialize};

use super::{ComparisonOperator, Field, LiteralValue, Operand, TqlElement, quote};

/// A boolean-valued TQL expression.
///
/// Queries produced by the parser or the [builder](super::builder) are always
/// rooted at an [`Expression::Or`] whose children are [`Expression::And`]s.
/// Use [`Expression::conjunction`] and [`Expression::disjunction`] to keep
/// that shape when composing trees by hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    // Composition
    /// Disjunction of conjunctions
    ///
    /// # Example
    /// ```text
    /// (a = 1) or ((b = 2) and (c = 3))
    /// ```
    Or(Vec<Expression>),

    /// Conjunction of predicates, negations and nested disjunctions
    And(Vec<Expression>),

    /// Negation of a canonical `Or[And[...]]` tree
    ///
    /// # Example
    /// ```text
    /// (not ((field1 = 'value1')))
    /// ```
    Not(Box<Expression>),

    // Predicates
    /// Comparison against a literal or another field
    ///
    /// # Examples
    /// ```text
    /// age >= 18
    /// start < end
    /// ```
    Comparison {
        field: Field,
        operator: ComparisonOperator,
        value: Operand,
    },

    /// Range check; each bound is open or closed independently
    ///
    /// # Examples
    /// ```text
    /// age between [18, 65]      // closed
    /// age between ]18, 65[      // both open
    /// ```
    Between {
        field: Field,
        left: LiteralValue,
        right: LiteralValue,
        lower_open: bool,
        upper_open: bool,
    },

    /// Set membership
    ///
    /// # Example
    /// ```text
    /// code in [11, 22.22, true]
    /// ```
    In {
        field: Field,
        values: Vec<LiteralValue>,
    },

    /// Substring test
    ///
    /// # Examples
    /// ```text
    /// name contains 'oh'
    /// name containsIgnoreCase 'OH'
    /// ```
    Contains {
        field: Field,
        value: String,
        case_sensitive: bool,
    },

    /// Regular expression match (`~`)
    Matches { field: Field, regex: String },

    /// Character-class pattern (`complies 'Aaa 99'`)
    Complies { field: Field, pattern: String },

    /// Word pattern (`wordComplies '[Word] [digit]'`)
    WordComplies { field: Field, pattern: String },

    IsNull(Field),
    IsEmpty(Field),
    IsValid(Field),
    IsInvalid(Field),
}

impl Expression {
    /// Builds an `And`, splicing nested conjunctions and single-branch
    /// disjunctions into it.
    pub fn conjunction(children: impl IntoIterator<Item = Expression>) -> Expression {
        let mut flat = Vec::new();
        for child in children {
            push_conjunct(&mut flat, child);
        }
        Expression::And(flat)
    }

    /// Builds a canonical `Or[And[...]]`.
    ///
    /// Nested disjunctions are spliced, bare predicates are wrapped in a
    /// single-child `And`, and an `And` holding nothing but an `Or` is
    /// replaced by that `Or`'s branches.
    pub fn disjunction(children: impl IntoIterator<Item = Expression>) -> Expression {
        let mut flat = Vec::new();
        for child in children {
            push_disjunct(&mut flat, child);
        }
        Expression::Or(flat)
    }

    /// Builds a `Not` whose operand is in canonical form.
    pub fn negation(inner: Expression) -> Expression {
        Expression::Not(Box::new(Expression::disjunction([inner])))
    }

    /// True for every variant except `Or`, `And` and `Not`.
    pub fn is_predicate(&self) -> bool {
        !matches!(
            self,
            Expression::Or(_) | Expression::And(_) | Expression::Not(_)
        )
    }

    /// Subject field of a predicate.
    pub fn field(&self) -> Option<&Field> {
        match self {
            Expression::Comparison { field, .. }
            | Expression::Between { field, .. }
            | Expression::In { field, .. }
            | Expression::Contains { field, .. }
            | Expression::Matches { field, .. }
            | Expression::Complies { field, .. }
            | Expression::WordComplies { field, .. }
            | Expression::IsNull(field)
            | Expression::IsEmpty(field)
            | Expression::IsValid(field)
            | Expression::IsInvalid(field) => Some(field),
            Expression::Or(_) | Expression::And(_) | Expression::Not(_) => None,
        }
    }

    fn predicate_text(&self) -> String {
        match self {
            Expression::Comparison {
                field,
                operator,
                value,
            } => format!(
                "{} {} {}",
                field.to_query_string(),
                operator.symbol(),
                value.to_query_string()
            ),
            Expression::Between {
                field,
                left,
                right,
                lower_open,
                upper_open,
            } => format!(
                "{} between {}{}, {}{}",
                field.to_query_string(),
                if *lower_open { ']' } else { '[' },
                left.to_query_string(),
                right.to_query_string(),
                if *upper_open { '[' } else { ']' },
            ),
            Expression::In { field, values } => {
                let values: Vec<String> = values.iter().map(|v| v.to_query_string()).collect();
                format!("{} in [{}]", field.to_query_string(), values.join(", "))
            }
            Expression::Contains {
                field,
                value,
                case_sensitive,
            } => format!(
                "{} {} {}",
                field.to_query_string(),
                if *case_sensitive {
                    "contains"
                } else {
                    "containsIgnoreCase"
                },
                quote(value)
            ),
            Expression::Matches { field, regex } => {
                format!("{} ~ {}", field.to_query_string(), quote(regex))
            }
            Expression::Complies { field, pattern } => {
                format!("{} complies {}", field.to_query_string(), quote(pattern))
            }
            Expression::WordComplies { field, pattern } => {
                format!("{} wordComplies {}", field.to_query_string(), quote(pattern))
            }
            Expression::IsNull(field) => format!("{} is null", field.to_query_string()),
            Expression::IsEmpty(field) => format!("{} is empty", field.to_query_string()),
            Expression::IsValid(field) => format!("{} is valid", field.to_query_string()),
            Expression::IsInvalid(field) => format!("{} is invalid", field.to_query_string()),
            Expression::Or(_) | Expression::And(_) | Expression::Not(_) => self.to_query_string(),
        }
    }
}

fn push_conjunct(out: &mut Vec<Expression>, child: Expression) {
    match child {
        Expression::And(children) => {
            for c in children {
                push_conjunct(out, c);
            }
        }
        Expression::Or(mut branches) if branches.len() == 1 => {
            if let Some(only) = branches.pop() {
                push_conjunct(out, only);
            }
        }
        other => out.push(other),
    }
}

fn push_disjunct(out: &mut Vec<Expression>, child: Expression) {
    match child {
        Expression::Or(branches) => {
            for branch in branches {
                push_disjunct(out, branch);
            }
        }
        Expression::And(children) => match Expression::conjunction(children) {
            Expression::And(mut flat)
                if flat.len() == 1 && matches!(flat[0], Expression::Or(_)) =>
            {
                push_disjunct(out, flat.remove(0));
            }
            and => out.push(and),
        },
        other => out.push(Expression::And(vec![other])),
    }
}

impl TqlElement for Expression {
    fn to_query_string(&self) -> String {
        match self {
            Expression::Or(branches) => branches
                .iter()
                .map(|branch| match branch {
                    Expression::And(children) if children.len() > 1 => {
                        format!("({})", branch.to_query_string())
                    }
                    _ => branch.to_query_string(),
                })
                .collect::<Vec<_>>()
                .join(" or "),
            Expression::And(children) => children
                .iter()
                .map(|child| match child {
                    Expression::Or(branches) if branches.len() > 1 => {
                        format!("({})", child.to_query_string())
                    }
                    _ => child.to_query_string(),
                })
                .collect::<Vec<_>>()
                .join(" and "),
            Expression::Not(inner) => format!("(not ({}))", inner.to_query_string()),
            predicate => format!("({})", predicate.predicate_text()),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}
