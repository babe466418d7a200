//! # TQL - Abstract Syntax Tree
//!
//! This module defines the Abstract Syntax Tree (AST) for TQL, a small query
//! language for expressing record filters: comparisons, ranges, set
//! membership, pattern matching and null/empty/validity checks.
//!
//! ## Architecture Overview
//!
//! The AST module is organized into focused submodules:
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[operators]** - Comparison operators (`=`, `!=`, `<`, `>`, `<=`, `>=`)
//! - **[literals]** - Typed literal values (int, decimal, boolean, quoted)
//! - **[fields]** - Field references, the `*` wildcard and comparison operands
//! - **[expressions]** - Predicates and their boolean composition
//! - **[builder]** - Fluent construction of queries without parsing text
//!
//! ## Quick Start
//!
//! ```text
//! age >= 18 and (country = 'FR' or country = 'BE')
//! ```
//!
//! This query keeps adult records located in France or Belgium.
//!
//! ## Core Concepts
//!
//! ### Canonical Shape
//!
//! Every query is stored as a disjunction of conjunctions, even when it holds
//! a single predicate:
//!
//! ```text
//! name is empty        =>   Or[ And[ IsEmpty(name) ] ]
//! ```
//!
//! Backends can therefore always start from an `Or` whose children are `And`s.
//! Parenthesised groups are spliced into their parent when they add nothing,
//! so `a and (b and c)` and `a and b and c` produce the same tree.
//!
//! ### Canonical Text
//!
//! [`TqlElement::to_query_string`] renders the tree as TQL that parses back
//! into an equal tree:
//!
//! ```text
//! (firstName = 'John' and lastName = 'Doe') or firstName = 'Jacques'
//! =>
//! ((firstName = 'John') and (lastName = 'Doe')) or (firstName = 'Jacques')
//! ```
//!
//! ### Literal Kinds
//!
//! The kind of a literal is decided by its lexical shape: `12` is an INT,
//! `12.5` a DECIMAL, `true` a BOOLEAN and `'12'` a QUOTED_VALUE. The raw text
//! is kept, so `99.20` prints back as `99.20`.
//!
//! ### The Wildcard
//!
//! `*` stands for every known field. It parses anywhere a field may appear,
//! but backends only accept it in `is null`, `is empty`, `is valid` and
//! `is invalid`, and only when they have a way to express it.
//!
//! ## Examples
//!
//! ### Ranges
//!
//! ```text
//! price between [10, 20[        // 10 <= price < 20
//! ```
//!
//! ### Set Membership
//!
//! ```text
//! code in [11, 22.22, true]
//! ```
//!
//! ### Patterns
//!
//! ```text
//! name wordComplies '[Word] [Word]'
//! zip complies '99999'
//! ```
pub mod builder;
pub mod expressions;
pub mod fields;
pub mod literals;
pub mod operators;
pub mod tokens;

pub use expressions::Expression;
pub use fields::{Field, Operand};
pub use literals::{LiteralKind, LiteralValue};
pub use operators::ComparisonOperator;
pub use tokens::Token;

/// Common behaviour of every AST node.
pub trait TqlElement {
    /// Renders the node as canonical TQL text.
    ///
    /// For a whole query the output parses back into an equal tree.
    fn to_query_string(&self) -> String;
}

/// Quotes a string for TQL, escaping embedded single quotes.
pub(crate) fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "\\'"))
}
