use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::{Position, Result, TqlError};

const LONG_MIN_MAGNITUDE: &str = "9223372036854775808";

/// Lexical tokens of EL text.
#[derive(Debug, Clone, PartialEq)]
pub enum ElToken {
    Int(i32),
    Long(i64),
    /// `9223372036854775808L`, only valid right after a unary minus.
    LongMinMagnitude,
    Decimal(Decimal),
    Double(f64),
    Str(String),
    Boolean(bool),
    Identifier(String),

    // Keywords
    If,
    Else,
    ElseIf,
    Switch,
    Case,
    Default,

    // Operators
    EqEq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Assign,
    Bang,
    AndAnd,
    OrOr,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,

    // Delimiters
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Colon,
    Semicolon,

    Eof,
}

pub struct ElLexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    token_start: Position,
}

impl ElLexer {
    pub fn new(input: &str) -> Self {
        ElLexer {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            token_start: Position::start(),
        }
    }

    pub fn token_position(&self) -> Position {
        self.token_start
    }

    fn here(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
            offset: self.position,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        if self.current_char() == Some('\n') {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while self.current_char().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' || ch == '.' {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    fn read_string(&mut self, quote: char) -> Result<String> {
        let start = self.here();
        let mut result = String::new();
        self.advance(); // Consume opening quote

        loop {
            match self.current_char() {
                None => {
                    return Err(TqlError::syntax("unterminated string literal", start));
                }
                Some(c) if c == quote => {
                    self.advance();
                    return Ok(result);
                }
                Some('\\') => {
                    self.advance();
                    match self.current_char() {
                        Some(c) if c == quote => result.push(c),
                        Some(c) => {
                            result.push('\\');
                            result.push(c);
                        }
                        None => {
                            return Err(TqlError::syntax("unterminated string literal", start));
                        }
                    }
                    self.advance();
                }
                Some(c) => {
                    result.push(c);
                    self.advance();
                }
            }
        }
    }

    fn read_number(&mut self) -> Result<ElToken> {
        let start = self.here();
        let mut number = String::new();
        let mut is_decimal = false;

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                number.push(ch);
                self.advance();
            } else if ch == '.'
                && !is_decimal
                && self.peek_char(1).is_some_and(|c| c.is_ascii_digit())
            {
                is_decimal = true;
                number.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        let malformed = || TqlError::syntax(format!("malformed number '{}'", number), start);

        let suffix = self
            .current_char()
            .filter(|c| matches!(c, 'L' | 'l' | 'd' | 'D' | 'f' | 'F'))
            .filter(|_| !self.peek_char(1).is_some_and(|c| c.is_alphanumeric() || c == '_'));

        let token = match suffix {
            Some('L' | 'l') if !is_decimal => match number.parse::<i64>() {
                Ok(n) => ElToken::Long(n),
                Err(_) if number.trim_start_matches('0') == LONG_MIN_MAGNITUDE => {
                    ElToken::LongMinMagnitude
                }
                Err(_) => return Err(malformed()),
            },
            Some('L' | 'l') => return Err(malformed()),
            Some(_) => ElToken::Double(number.parse::<f64>().map_err(|_| malformed())?),
            None if is_decimal => {
                ElToken::Decimal(Decimal::from_str(&number).map_err(|_| malformed())?)
            }
            None => {
                if let Ok(n) = number.parse::<i32>() {
                    ElToken::Int(n)
                } else if let Ok(n) = number.parse::<i64>() {
                    ElToken::Long(n)
                } else {
                    ElToken::Decimal(
                        Decimal::from_str(&number)
                            .map_err(|_| TqlError::LiteralOverflow(number.clone()))?,
                    )
                }
            }
        };
        if suffix.is_some() {
            self.advance();
        }

        if self.current_char().is_some_and(|c| c.is_alphabetic() || c == '_') {
            return Err(malformed());
        }
        Ok(token)
    }

    fn single(&mut self, token: ElToken) -> Result<ElToken> {
        self.advance();
        Ok(token)
    }

    fn pair(&mut self, second: char, paired: ElToken, single: ElToken) -> Result<ElToken> {
        if self.peek_char(1) == Some(second) {
            self.advance();
            self.advance();
            Ok(paired)
        } else {
            self.single(single)
        }
    }

    fn doubled(&mut self, ch: char, token: ElToken) -> Result<ElToken> {
        if self.peek_char(1) == Some(ch) {
            self.advance();
            self.advance();
            Ok(token)
        } else {
            Err(TqlError::syntax(
                format!("unexpected '{}' (did you mean '{}{}'?)", ch, ch, ch),
                self.token_start,
            ))
        }
    }

    pub fn next_token(&mut self) -> Result<ElToken> {
        self.skip_whitespace();
        self.token_start = self.here();

        match self.current_char() {
            None => Ok(ElToken::Eof),
            Some('=') => self.pair('=', ElToken::EqEq, ElToken::Assign),
            Some('!') => self.pair('=', ElToken::NotEq, ElToken::Bang),
            Some('<') => self.pair('=', ElToken::LtEq, ElToken::Lt),
            Some('>') => self.pair('=', ElToken::GtEq, ElToken::Gt),
            Some('&') => self.doubled('&', ElToken::AndAnd),
            Some('|') => self.doubled('|', ElToken::OrOr),
            Some('+') => self.single(ElToken::Plus),
            Some('-') => self.single(ElToken::Minus),
            Some('*') => self.single(ElToken::Star),
            Some('/') => self.single(ElToken::Slash),
            Some('%') => self.single(ElToken::Percent),
            Some('(') => self.single(ElToken::LParen),
            Some(')') => self.single(ElToken::RParen),
            Some('[') => self.single(ElToken::LBracket),
            Some(']') => self.single(ElToken::RBracket),
            Some('{') => self.single(ElToken::LBrace),
            Some('}') => self.single(ElToken::RBrace),
            Some(',') => self.single(ElToken::Comma),
            Some(':') => self.single(ElToken::Colon),
            Some(';') => self.single(ElToken::Semicolon),
            Some(quote @ ('\'' | '"')) => Ok(ElToken::Str(self.read_string(quote)?)),
            Some(ch) if ch.is_ascii_digit() => self.read_number(),
            Some(ch) if ch.is_alphabetic() || ch == '_' => {
                let ident = self.read_identifier();
                Ok(match ident.as_str() {
                    "true" => ElToken::Boolean(true),
                    "false" => ElToken::Boolean(false),
                    "if" => ElToken::If,
                    "else" => ElToken::Else,
                    "elseif" => ElToken::ElseIf,
                    "switch" => ElToken::Switch,
                    "case" => ElToken::Case,
                    "default" => ElToken::Default,
                    _ => ElToken::Identifier(ident),
                })
            }
            Some(ch) => Err(TqlError::syntax(
                format!("unexpected character '{}'", ch),
                self.token_start,
            )),
        }
    }
}
