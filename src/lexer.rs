use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::warn;

use crate::ast::Token;
use crate::error::{Position, Result, TqlError};

pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    token_start: Position,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            token_start: Position::start(),
        }
    }

    /// Where the most recently returned token starts.
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
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
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

    /// Reads a single-quoted string.
    ///
    /// `\'` yields a quote, any other backslash pair is kept as written. The
    /// literal stops at the first unescaped quote; characters glued to that
    /// quote are dropped up to the next delimiter.
    fn read_quoted(&mut self) -> Result<String> {
        let start = self.here();
        let mut result = String::new();
        self.advance(); // Consume opening quote

        loop {
            match self.current_char() {
                None => {
                    return Err(TqlError::syntax(
                        "unterminated quoted string: missing closing quote",
                        start,
                    ));
                }
                Some('\'') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    match self.current_char() {
                        Some('\'') => result.push('\''),
                        Some(ch) => {
                            result.push('\\');
                            result.push(ch);
                        }
                        None => {
                            return Err(TqlError::syntax(
                                "unterminated quoted string: unexpected end of input after backslash",
                                start,
                            ));
                        }
                    }
                    self.advance();
                }
                Some(ch) => {
                    result.push(ch);
                    self.advance();
                }
            }
        }

        let mut discarded = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() || matches!(ch, ',' | '[' | ']' | ')') {
                break;
            }
            discarded.push(ch);
            self.advance();
        }
        if !discarded.is_empty() {
            warn!(
                literal = %result,
                discarded = %discarded,
                "characters after closing quote at {} ignored",
                start
            );
        }

        Ok(result)
    }

    fn read_number(&mut self) -> Result<Token> {
        let start = self.here();
        let mut number = String::new();
        let mut is_decimal = false;

        if self.current_char() == Some('-') {
            number.push('-');
            self.advance();
        }

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

        if self.current_char().is_some_and(|c| c.is_alphabetic() || c == '_') {
            return Err(TqlError::syntax(
                format!("malformed number '{}'", number),
                start,
            ));
        }

        // Anything beyond a 96-bit decimal is rejected here rather than
        // silently rounded by a backend.
        if Decimal::from_str(&number).is_err() {
            return Err(TqlError::LiteralOverflow(number));
        }

        Ok(if is_decimal {
            Token::Decimal(number)
        } else {
            Token::Integer(number)
        })
    }

    fn single(&mut self, token: Token) -> Result<Token> {
        self.advance();
        Ok(token)
    }

    fn pair(&mut self, second: char, paired: Token, single: Token) -> Result<Token> {
        if self.peek_char(1) == Some(second) {
            self.advance();
            self.advance();
            Ok(paired)
        } else {
            self.single(single)
        }
    }

    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace();
        self.token_start = self.here();

        match self.current_char() {
            None => Ok(Token::Eof),
            Some('*') => self.single(Token::Star),
            Some('=') => self.single(Token::Eq),
            Some('~') => self.single(Token::Tilde),
            Some(',') => self.single(Token::Comma),
            Some('(') => self.single(Token::LParen),
            Some(')') => self.single(Token::RParen),
            Some('[') => self.single(Token::LBracket),
            Some(']') => self.single(Token::RBracket),
            Some('<') => self.pair('=', Token::LtEq, Token::Lt),
            Some('>') => self.pair('=', Token::GtEq, Token::Gt),
            Some('!') => {
                if self.peek_char(1) == Some('=') {
                    self.advance();
                    self.advance();
                    Ok(Token::NotEq)
                } else {
                    Err(TqlError::syntax(
                        "unexpected '!' (did you mean '!=' or 'not'?)",
                        self.token_start,
                    ))
                }
            }
            Some('\'') => Ok(Token::Quoted(self.read_quoted()?)),
            Some('-') if self.peek_char(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.read_number()
            }
            Some(ch) if ch.is_ascii_digit() => self.read_number(),
            Some(ch) if ch.is_alphabetic() || ch == '_' => {
                let ident = self.read_identifier();
                Ok(Token::keyword(&ident).unwrap_or(Token::Identifier(ident)))
            }
            Some(ch) => Err(TqlError::syntax(
                format!("unexpected character '{}'", ch),
                self.token_start,
            )),
        }
    }
}

#[test]
fn test_keywords() {
    let mut lexer = Lexer::new("and or not is null empty valid invalid true false");
    assert_eq!(lexer.next_token().unwrap(), Token::And);
    assert_eq!(lexer.next_token().unwrap(), Token::Or);
    assert_eq!(lexer.next_token().unwrap(), Token::Not);
    assert_eq!(lexer.next_token().unwrap(), Token::Is);
    assert_eq!(lexer.next_token().unwrap(), Token::Null);
    assert_eq!(lexer.next_token().unwrap(), Token::Empty);
    assert_eq!(lexer.next_token().unwrap(), Token::Valid);
    assert_eq!(lexer.next_token().unwrap(), Token::Invalid);
    assert_eq!(lexer.next_token().unwrap(), Token::Boolean(true));
    assert_eq!(lexer.next_token().unwrap(), Token::Boolean(false));
    assert_eq!(lexer.next_token().unwrap(), Token::Eof);
}

#[test]
fn test_between_brackets() {
    let mut lexer = Lexer::new("age between ]18, 65[");
    assert_eq!(lexer.next_token().unwrap(), Token::Identifier("age".to_string()));
    assert_eq!(lexer.next_token().unwrap(), Token::Between);
    assert_eq!(lexer.next_token().unwrap(), Token::RBracket);
    assert_eq!(lexer.next_token().unwrap(), Token::Integer("18".to_string()));
    assert_eq!(lexer.next_token().unwrap(), Token::Comma);
    assert_eq!(lexer.next_token().unwrap(), Token::Integer("65".to_string()));
    assert_eq!(lexer.next_token().unwrap(), Token::LBracket);
    assert_eq!(lexer.next_token().unwrap(), Token::Eof);
}
