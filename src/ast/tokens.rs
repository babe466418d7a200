use std::fmt;

/// Lexical tokens of TQL.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    /// Integer literal, kept as written
    ///
    /// # Examples
    /// ```text
    /// 42
    /// -10
    /// ```
    Integer(String),

    /// Decimal literal, kept as written
    ///
    /// # Examples
    /// ```text
    /// 3.14
    /// 99.20
    /// ```
    Decimal(String),

    /// Single-quoted string with escapes already resolved
    ///
    /// # Examples
    /// ```text
    /// 'hello'
    /// 'O\'Reilly'
    /// ```
    Quoted(String),

    /// Boolean values
    ///
    /// # Examples
    /// ```text
    /// true
    /// false
    /// ```
    Boolean(bool),

    /// Field name, possibly a dotted path
    ///
    /// Must start with letter or underscore, followed by letters, digits,
    /// underscores or dots.
    ///
    /// # Examples
    /// ```text
    /// name
    /// attributes.version
    /// _id
    /// ```
    Identifier(String),

    /// The all-fields wildcard (`*`)
    Star,

    // Comparison
    /// Equal (`=`)
    Eq,
    /// Not equal (`!=`)
    NotEq,
    /// Less than (`<`)
    Lt,
    /// Greater than (`>`)
    Gt,
    /// Less than or equal (`<=`)
    LtEq,
    /// Greater than or equal (`>=`)
    GtEq,
    /// Regex match (`~`)
    Tilde,

    // Delimiters
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,

    // Keywords
    And,
    Or,
    Not,
    Between,
    In,
    Contains,
    ContainsIgnoreCase,
    Complies,
    WordComplies,
    Is,
    Null,
    Empty,
    Valid,
    Invalid,

    /// End of input
    Eof,
}

impl Token {
    /// Looks up a reserved word. Keywords are case sensitive.
    pub fn keyword(ident: &str) -> Option<Token> {
        let token = match ident {
            "and" => Token::And,
            "or" => Token::Or,
            "not" => Token::Not,
            "between" => Token::Between,
            "in" => Token::In,
            "contains" => Token::Contains,
            "containsIgnoreCase" => Token::ContainsIgnoreCase,
            "complies" => Token::Complies,
            "wordComplies" => Token::WordComplies,
            "is" => Token::Is,
            "null" => Token::Null,
            "empty" => Token::Empty,
            "valid" => Token::Valid,
            "invalid" => Token::Invalid,
            "true" => Token::Boolean(true),
            "false" => Token::Boolean(false),
            _ => return None,
        };
        Some(token)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Integer(n) | Token::Decimal(n) => write!(f, "number {}", n),
            Token::Quoted(s) => write!(f, "string '{}'", s),
            Token::Boolean(b) => write!(f, "'{}'", b),
            Token::Identifier(name) => write!(f, "field '{}'", name),
            Token::Star => write!(f, "'*'"),
            Token::Eq => write!(f, "'='"),
            Token::NotEq => write!(f, "'!='"),
            Token::Lt => write!(f, "'<'"),
            Token::Gt => write!(f, "'>'"),
            Token::LtEq => write!(f, "'<='"),
            Token::GtEq => write!(f, "'>='"),
            Token::Tilde => write!(f, "'~'"),
            Token::LParen => write!(f, "'('"),
            Token::RParen => write!(f, "')'"),
            Token::LBracket => write!(f, "'['"),
            Token::RBracket => write!(f, "']'"),
            Token::Comma => write!(f, "','"),
            Token::And => write!(f, "'and'"),
            Token::Or => write!(f, "'or'"),
            Token::Not => write!(f, "'not'"),
            Token::Between => write!(f, "'between'"),
            Token::In => write!(f, "'in'"),
            Token::Contains => write!(f, "'contains'"),
            Token::ContainsIgnoreCase => write!(f, "'containsIgnoreCase'"),
            Token::Complies => write!(f, "'complies'"),
            Token::WordComplies => write!(f, "'wordComplies'"),
            Token::Is => write!(f, "'is'"),
            Token::Null => write!(f, "'null'"),
            Token::Empty => write!(f, "'empty'"),
            Token::Valid => write!(f, "'valid'"),
            Token::Invalid => write!(f, "'invalid'"),
            Token::Eof => write!(f, "end of input"),
        }
    }
}
