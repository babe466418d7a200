use crate::{
    ast::{ComparisonOperator, Expression, Field, LiteralKind, LiteralValue, Operand, Token},
    error::{Position, Result, TqlError},
    lexer::Lexer,
};
use std::mem;

/// Parses TQL text into a canonical `Or[And[...]]` expression.
pub fn parse(input: &str) -> Result<Expression> {
    Parser::new(Lexer::new(input))?.parse()
}

pub struct Parser {
    lexer: Lexer,
    current_token: Token,
    current_position: Position,
}

/// A bound or `in` value before it is checked to be a literal.
enum Value {
    Literal(LiteralValue),
    Identifier(String),
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Result<Self> {
        let current_token = lexer.next_token()?;
        let current_position = lexer.token_position();
        Ok(Parser {
            lexer,
            current_token,
            current_position,
        })
    }

    fn advance(&mut self) -> Result<()> {
        self.current_token = self.lexer.next_token()?;
        self.current_position = self.lexer.token_position();
        Ok(())
    }

    fn expect(&mut self, expected: Token) -> Result<()> {
        if !self.check(&expected) {
            return Err(self.unexpected(&format!("{}", expected)));
        }
        self.advance()
    }

    fn check(&self, token: &Token) -> bool {
        mem::discriminant(&self.current_token) == mem::discriminant(token)
    }

    fn unexpected(&self, wanted: &str) -> TqlError {
        TqlError::syntax(
            format!("expected {}, found {}", wanted, self.current_token),
            self.current_position,
        )
    }

    /// Parses a complete query; trailing tokens are an error.
    pub fn parse(&mut self) -> Result<Expression> {
        let expr = self.parse_or()?;
        if !self.check(&Token::Eof) {
            return Err(self.unexpected("'and', 'or' or end of input"));
        }
        Ok(expr)
    }

    fn parse_or(&mut self) -> Result<Expression> {
        let mut branches = vec![self.parse_and()?];
        while self.check(&Token::Or) {
            self.advance()?;
            branches.push(self.parse_and()?);
        }
        Ok(Expression::disjunction(branches))
    }

    fn parse_and(&mut self) -> Result<Expression> {
        let mut children = vec![self.parse_unary()?];
        while self.check(&Token::And) {
            self.advance()?;
            children.push(self.parse_unary()?);
        }
        Ok(Expression::conjunction(children))
    }

    fn parse_unary(&mut self) -> Result<Expression> {
        match self.current_token {
            Token::Not => {
                self.advance()?;
                let inner = self.parse_unary()?;
                Ok(Expression::negation(inner))
            }
            Token::LParen => {
                self.advance()?;
                let group = self.parse_or()?;
                self.expect(Token::RParen)?;
                Ok(group)
            }
            _ => self.parse_predicate(),
        }
    }

    fn parse_field(&mut self) -> Result<Field> {
        let field = match mem::replace(&mut self.current_token, Token::Eof) {
            Token::Identifier(path) => Field::Reference(path),
            Token::Star => Field::All,
            token => {
                self.current_token = token;
                return Err(self.unexpected("a field name or '*'"));
            }
        };
        self.advance()?;
        Ok(field)
    }

    fn parse_predicate(&mut self) -> Result<Expression> {
        let field = self.parse_field()?;

        let operator = match self.current_token {
            Token::Eq => Some(ComparisonOperator::Eq),
            Token::NotEq => Some(ComparisonOperator::Neq),
            Token::Lt => Some(ComparisonOperator::Lt),
            Token::Gt => Some(ComparisonOperator::Gt),
            Token::LtEq => Some(ComparisonOperator::Let),
            Token::GtEq => Some(ComparisonOperator::Get),
            _ => None,
        };
        if let Some(operator) = operator {
            self.advance()?;
            let value = match self.parse_value()? {
                Value::Literal(literal) => Operand::Literal(literal),
                Value::Identifier(path) => Operand::Field(path),
            };
            return Ok(Expression::Comparison {
                field,
                operator,
                value,
            });
        }

        match self.current_token {
            Token::Between => {
                self.advance()?;
                self.parse_between(field)
            }
            Token::In => {
                self.advance()?;
                self.parse_in(field)
            }
            Token::Tilde => {
                self.advance()?;
                let regex = self.parse_quoted()?;
                Ok(Expression::Matches { field, regex })
            }
            Token::Contains | Token::ContainsIgnoreCase => {
                let case_sensitive = self.check(&Token::Contains);
                self.advance()?;
                let value = self.parse_quoted()?;
                Ok(Expression::Contains {
                    field,
                    value,
                    case_sensitive,
                })
            }
            Token::Complies => {
                self.advance()?;
                let pattern = self.parse_quoted()?;
                Ok(Expression::Complies { field, pattern })
            }
            Token::WordComplies => {
                self.advance()?;
                let pattern = self.parse_quoted()?;
                Ok(Expression::WordComplies { field, pattern })
            }
            Token::Is => {
                self.advance()?;
                let expr = match self.current_token {
                    Token::Null => Expression::IsNull(field),
                    Token::Empty => Expression::IsEmpty(field),
                    Token::Valid => Expression::IsValid(field),
                    Token::Invalid => Expression::IsInvalid(field),
                    _ => return Err(self.unexpected("'null', 'empty', 'valid' or 'invalid'")),
                };
                self.advance()?;
                Ok(expr)
            }
            _ => Err(self.unexpected("an operator")),
        }
    }

    fn parse_quoted(&mut self) -> Result<String> {
        match mem::replace(&mut self.current_token, Token::Eof) {
            Token::Quoted(s) => {
                self.advance()?;
                Ok(s)
            }
            token => {
                self.current_token = token;
                Err(self.unexpected("a quoted string"))
            }
        }
    }

    /// A literal or a bare identifier; callers decide whether identifiers
    /// are acceptable.
    fn parse_value(&mut self) -> Result<Value> {
        let value = match mem::replace(&mut self.current_token, Token::Eof) {
            Token::Integer(n) => Value::Literal(LiteralValue::new(LiteralKind::Int, n)),
            Token::Decimal(n) => Value::Literal(LiteralValue::new(LiteralKind::Decimal, n)),
            Token::Boolean(b) => Value::Literal(LiteralValue::boolean(b)),
            Token::Quoted(s) => Value::Literal(LiteralValue::quoted(s)),
            Token::Identifier(name) => Value::Identifier(name),
            token => {
                self.current_token = token;
                return Err(self.unexpected("a literal or a field name"));
            }
        };
        self.advance()?;
        Ok(value)
    }

    fn parse_bound(&mut self) -> Result<LiteralValue> {
        match self.parse_value()? {
            Value::Identifier(name) => Err(TqlError::Semantic(format!(
                "'between' bounds must be literals, found field '{}'",
                name
            ))),
            Value::Literal(literal) => Ok(literal),
        }
    }

    fn parse_between(&mut self, field: Field) -> Result<Expression> {
        let lower_open = match self.current_token {
            Token::LBracket => false,
            Token::RBracket => true,
            _ => return Err(self.unexpected("'[' or ']'")),
        };
        self.advance()?;

        let left = self.parse_bound()?;
        self.expect(Token::Comma)?;
        let right = self.parse_bound()?;

        let upper_open = match self.current_token {
            Token::RBracket => false,
            Token::LBracket => true,
            _ => return Err(self.unexpected("']' or '['")),
        };
        self.advance()?;

        check_between_bounds(&left, &right)?;

        Ok(Expression::Between {
            field,
            left,
            right,
            lower_open,
            upper_open,
        })
    }

    fn parse_in(&mut self, field: Field) -> Result<Expression> {
        self.expect(Token::LBracket)?;

        let mut values = vec![];
        let mut identifiers = vec![];
        loop {
            match self.parse_value()? {
                Value::Literal(literal) => values.push(literal),
                Value::Identifier(name) => identifiers.push(name),
            }
            if self.check(&Token::Comma) {
                self.advance()?;
            } else {
                break;
            }
        }
        self.expect(Token::RBracket)?;

        if !identifiers.is_empty() {
            return Err(TqlError::Semantic(format!(
                "'in' values must be literals, found field(s) {}",
                identifiers.join(", ")
            )));
        }

        Ok(Expression::In { field, values })
    }
}

/// Bounds of `between` are numbers or strings, and both of the same family:
/// INT and DECIMAL mix, anything else must match exactly.
pub fn check_between_bounds(left: &LiteralValue, right: &LiteralValue) -> Result<()> {
    for bound in [left, right] {
        if bound.kind == LiteralKind::Boolean {
            return Err(TqlError::Semantic(format!(
                "'between' bounds can't be boolean, found {}",
                bound.value
            )));
        }
    }
    let compatible =
        left.kind == right.kind || (left.kind.is_numeric() && right.kind.is_numeric());
    if !compatible {
        return Err(TqlError::Semantic(format!(
            "'between' bounds must be of the same kind, found {:?} and {:?}",
            left.kind, right.kind
        )));
    }
    Ok(())
}
