pub mod ast;
pub mod cli;
pub mod criteria;
pub mod el;
pub mod error;
pub mod field_types;
pub mod lexer;
pub mod lower;
pub mod parser;
pub mod pattern;
pub mod predicate;
pub mod raise;

pub use ast::{Expression, Field, LiteralKind, LiteralValue, Operand, TqlElement, Token};
pub use criteria::to_criteria;
pub use el::{ElNode, parse_el};
pub use error::{Position, Result, TqlError};
pub use field_types::FieldTypes;
pub use lexer::Lexer;
pub use lower::{LoweringPolicy, lower, lower_for_runtime, lower_for_storage, lower_generic};
pub use parser::{Parser, parse};
pub use predicate::RecordPredicate;
pub use raise::{raise, raise_str, raise_str_with_policy, raise_with_policy};
