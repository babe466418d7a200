//! The embedded expression language (EL) targeted by lowering.
//!
//! EL is a small C-like expression syntax evaluated by an external
//! interpreter. Only its tree shape and text form matter here:
//!
//! ```text
//! isEmpty(name) || (age >= 18 && contains(city, 'par', false))
//! ```
//!
//! - **[node]** - the tree ([`ElNode`]) and its text rendering
//! - **[lexer]** / **[parser]** - reading EL text back into a tree
//!
//! The parser accepts more than lowering ever produces (arithmetic,
//! conditionals, `switch`, blocks) so that raising can reject those
//! constructs with a precise error instead of a syntax error.
pub mod lexer;
pub mod node;
pub mod parser;

pub use node::{ArithOp, CompareOp, ElLiteral, ElNode};
pub use parser::parse_el;
