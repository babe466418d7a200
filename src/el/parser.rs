use std::mem;

use super::lexer::{ElLexer, ElToken};
use super::node::{ArithOp, CompareOp, ElLiteral, ElNode};
use crate::error::{Position, Result, TqlError};

/// Parses EL text into a tree.
pub fn parse_el(input: &str) -> Result<ElNode> {
    ElParser::new(ElLexer::new(input))?.parse()
}

pub struct ElParser {
    lexer: ElLexer,
    current_token: ElToken,
    current_position: Position,
}

impl ElParser {
    pub fn new(mut lexer: ElLexer) -> Result<Self> {
        let current_token = lexer.next_token()?;
        let current_position = lexer.token_position();
        Ok(ElParser {
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

    fn check(&self, token: &ElToken) -> bool {
        mem::discriminant(&self.current_token) == mem::discriminant(token)
    }

    fn expect(&mut self, expected: ElToken) -> Result<()> {
        if !self.check(&expected) {
            return Err(TqlError::syntax(
                format!("expected {:?}, found {:?}", expected, self.current_token),
                self.current_position,
            ));
        }
        self.advance()
    }

    fn unexpected(&self) -> TqlError {
        TqlError::syntax(
            format!("unexpected token {:?}", self.current_token),
            self.current_position,
        )
    }

    pub fn parse(&mut self) -> Result<ElNode> {
        let node = self.parse_expression()?;
        if !self.check(&ElToken::Eof) {
            return Err(self.unexpected());
        }
        Ok(node)
    }

    fn parse_expression(&mut self) -> Result<ElNode> {
        let target = self.parse_or()?;
        if self.check(&ElToken::Assign) {
            self.advance()?;
            let value = self.parse_or()?;
            return Ok(ElNode::Assignment {
                target: Box::new(target),
                value: Box::new(value),
            });
        }
        Ok(target)
    }

    fn parse_or(&mut self) -> Result<ElNode> {
        let mut children = vec![self.parse_and()?];
        while self.check(&ElToken::OrOr) {
            self.advance()?;
            children.push(self.parse_and()?);
        }
        Ok(collapse(children, ElNode::Or))
    }

    fn parse_and(&mut self) -> Result<ElNode> {
        let mut children = vec![self.parse_comparison()?];
        while self.check(&ElToken::AndAnd) {
            self.advance()?;
            children.push(self.parse_comparison()?);
        }
        Ok(collapse(children, ElNode::And))
    }

    fn parse_comparison(&mut self) -> Result<ElNode> {
        let left = self.parse_additive()?;

        let op = match self.current_token {
            ElToken::EqEq => CompareOp::Eq,
            ElToken::NotEq => CompareOp::Neq,
            ElToken::Lt => CompareOp::Lt,
            ElToken::Gt => CompareOp::Gt,
            ElToken::LtEq => CompareOp::Le,
            ElToken::GtEq => CompareOp::Ge,
            _ => return Ok(left),
        };
        self.advance()?;
        let right = self.parse_additive()?;
        Ok(ElNode::compare(op, left, right))
    }

    fn parse_additive(&mut self) -> Result<ElNode> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = match self.current_token {
                ElToken::Plus => ArithOp::Add,
                ElToken::Minus => ArithOp::Sub,
                _ => break,
            };
            self.advance()?;
            let right = self.parse_multiplicative()?;
            left = ElNode::Arithmetic {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<ElNode> {
        let mut left = self.parse_unary()?;

        loop {
            let op = match self.current_token {
                ElToken::Star => ArithOp::Mul,
                ElToken::Slash => ArithOp::Div,
                ElToken::Percent => ArithOp::Mod,
                _ => break,
            };
            self.advance()?;
            let right = self.parse_unary()?;
            left = ElNode::Arithmetic {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<ElNode> {
        match self.current_token {
            ElToken::Bang => {
                self.advance()?;
                let operand = self.parse_unary()?;
                Ok(ElNode::Not(Box::new(operand)))
            }
            ElToken::Minus => {
                self.advance()?;
                if self.check(&ElToken::LongMinMagnitude) {
                    return self.literal(ElLiteral::Long(i64::MIN));
                }
                let operand = self.parse_unary()?;
                Ok(match operand {
                    ElNode::Literal(literal) if is_numeric(&literal) => {
                        ElNode::Literal(negate(literal))
                    }
                    // Represent as 0 - operand
                    other => ElNode::Arithmetic {
                        op: ArithOp::Sub,
                        left: Box::new(ElNode::Literal(ElLiteral::Int(0))),
                        right: Box::new(other),
                    },
                })
            }
            _ => self.parse_primary(),
        }
    }

    fn parse_primary(&mut self) -> Result<ElNode> {
        match mem::replace(&mut self.current_token, ElToken::Eof) {
            ElToken::Int(n) => self.literal(ElLiteral::Int(n)),
            ElToken::Long(n) => self.literal(ElLiteral::Long(n)),
            ElToken::Decimal(d) => self.literal(ElLiteral::Decimal(d)),
            ElToken::Double(d) => self.literal(ElLiteral::Double(d)),
            ElToken::Str(s) => self.literal(ElLiteral::String(s)),
            ElToken::Boolean(b) => self.literal(ElLiteral::Boolean(b)),
            ElToken::Star => {
                self.advance()?;
                Ok(ElNode::AllFields)
            }
            ElToken::Identifier(name) => {
                self.advance()?;
                if self.check(&ElToken::LParen) {
                    self.advance()?;
                    let args = self.parse_list(ElToken::RParen)?;
                    Ok(ElNode::Call { name, args })
                } else {
                    Ok(ElNode::Path(name))
                }
            }
            ElToken::LParen => {
                self.advance()?;
                let node = self.parse_expression()?;
                self.expect(ElToken::RParen)?;
                Ok(node)
            }
            ElToken::LBracket => {
                self.advance()?;
                Ok(ElNode::Array(self.parse_list(ElToken::RBracket)?))
            }
            ElToken::LBrace => {
                self.advance()?;
                self.parse_block()
            }
            ElToken::If => {
                self.advance()?;
                self.parse_conditional()
            }
            ElToken::Switch => {
                self.advance()?;
                self.parse_switch()
            }
            token => {
                self.current_token = token;
                Err(self.unexpected())
            }
        }
    }

    fn literal(&mut self, literal: ElLiteral) -> Result<ElNode> {
        self.advance()?;
        Ok(ElNode::Literal(literal))
    }

    /// Comma separated expressions up to `close`, which is consumed.
    fn parse_list(&mut self, close: ElToken) -> Result<Vec<ElNode>> {
        let mut items = vec![];
        while !self.check(&close) {
            items.push(self.parse_expression()?);
            if !self.check(&close) {
                self.expect(ElToken::Comma)?;
            }
        }
        self.expect(close)?;
        Ok(items)
    }

    /// Statements separated by `;` or `,` after an opening brace.
    fn parse_block(&mut self) -> Result<ElNode> {
        let mut items = vec![];
        while !self.check(&ElToken::RBrace) {
            items.push(self.parse_expression()?);
            if self.check(&ElToken::Semicolon) || self.check(&ElToken::Comma) {
                self.advance()?;
            } else {
                break;
            }
        }
        self.expect(ElToken::RBrace)?;
        Ok(ElNode::Block(items))
    }

    fn parse_condition(&mut self) -> Result<ElNode> {
        self.expect(ElToken::LParen)?;
        let condition = self.parse_expression()?;
        self.expect(ElToken::RParen)?;
        Ok(condition)
    }

    /// A braced block or a single expression.
    fn parse_branch(&mut self) -> Result<ElNode> {
        if self.check(&ElToken::LBrace) {
            self.advance()?;
            self.parse_block()
        } else {
            self.parse_expression()
        }
    }

    fn parse_conditional(&mut self) -> Result<ElNode> {
        let condition = self.parse_condition()?;
        let body = self.parse_branch()?;
        let mut branches = vec![(condition, body)];
        let mut otherwise = None;

        loop {
            if self.check(&ElToken::ElseIf) {
                self.advance()?;
            } else if self.check(&ElToken::Else) {
                self.advance()?;
                if self.check(&ElToken::If) {
                    self.advance()?;
                } else {
                    otherwise = Some(Box::new(self.parse_branch()?));
                    break;
                }
            } else {
                break;
            }
            let condition = self.parse_condition()?;
            let body = self.parse_branch()?;
            branches.push((condition, body));
        }

        Ok(ElNode::Conditional {
            branches,
            otherwise,
        })
    }

    fn parse_case_body(&mut self) -> Result<Vec<ElNode>> {
        let mut body = vec![self.parse_expression()?];
        while self.check(&ElToken::Comma) {
            self.advance()?;
            body.push(self.parse_expression()?);
        }
        Ok(body)
    }

    fn parse_switch(&mut self) -> Result<ElNode> {
        let subject = self.parse_condition()?;
        self.expect(ElToken::LBrace)?;

        let mut cases = vec![];
        let mut default = None;
        loop {
            if self.check(&ElToken::Case) {
                self.advance()?;
                let label = self.parse_unary()?;
                self.expect(ElToken::Colon)?;
                cases.push((label, self.parse_case_body()?));
            } else if self.check(&ElToken::Default) {
                self.advance()?;
                self.expect(ElToken::Colon)?;
                default = Some(self.parse_case_body()?);
            } else {
                break;
            }
        }
        self.expect(ElToken::RBrace)?;

        Ok(ElNode::Switch {
            subject: Box::new(subject),
            cases,
            default,
        })
    }
}

fn collapse(mut children: Vec<ElNode>, build: fn(Vec<ElNode>) -> ElNode) -> ElNode {
    if children.len() == 1 {
        children.remove(0)
    } else {
        build(children)
    }
}

fn is_numeric(literal: &ElLiteral) -> bool {
    matches!(
        literal,
        ElLiteral::Int(_) | ElLiteral::Long(_) | ElLiteral::Decimal(_) | ElLiteral::Double(_)
    )
}

fn negate(literal: ElLiteral) -> ElLiteral {
    match literal {
        ElLiteral::Int(n) => match n.checked_neg() {
            Some(negated) => ElLiteral::Int(negated),
            None => ElLiteral::Long(-i64::from(n)),
        },
        ElLiteral::Long(n) => match n.checked_neg() {
            Some(negated) => i32::try_from(negated)
                .map(ElLiteral::Int)
                .unwrap_or(ElLiteral::Long(negated)),
            None => ElLiteral::Decimal(-rust_decimal::Decimal::from(n)),
        },
        ElLiteral::Decimal(d) => ElLiteral::Decimal(-d),
        ElLiteral::Double(d) => ElLiteral::Double(-d),
        other => other,
    }
}
