//! Error types shared by the lexer, the parser and every backend.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A location in TQL or EL source text.
///
/// `line` and `column` are 1-based, `offset` counts characters from the
/// start of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Position {
    pub fn start() -> Self {
        Position {
            line: 1,
            column: 1,
            offset: 0,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Everything that can go wrong while parsing or translating a query.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TqlError {
    /// Malformed source text.
    #[error("syntax error at {position}: {message}")]
    Syntax { message: String, position: Position },

    /// Well-formed text that does not describe a valid query.
    #[error("semantic error: {0}")]
    Semantic(String),

    /// A field is missing from the field type dictionary.
    #[error("type not found for field '{field}'")]
    TypeNotFound { field: String },

    /// `*` used where the target cannot represent it.
    #[error("the wildcard '*' is not supported {0}")]
    Wildcard(String),

    /// A numeric literal that does not fit the target representation.
    #[error("numeric literal '{0}' overflows the target representation")]
    LiteralOverflow(String),

    /// An `and`/`or` without operands.
    #[error("{0} expression can't have zero sub-expressions")]
    EmptyComposite(&'static str),

    /// Unterminated or malformed `complies`/`wordComplies` pattern, or a
    /// regex the engine rejects.
    #[error("pattern error: {0}")]
    Pattern(String),

    /// A construct the chosen backend has no translation for.
    #[error("unsupported construct: {0}")]
    Unsupported(String),
}

impl TqlError {
    pub fn syntax(message: impl Into<String>, position: Position) -> Self {
        TqlError::Syntax {
            message: message.into(),
            position,
        }
    }

    /// True for errors raised while reading text, as opposed to translating it.
    pub fn is_syntax(&self) -> bool {
        matches!(self, TqlError::Syntax { .. })
    }
}

pub type Result<T> = std::result::Result<T, TqlError>;
