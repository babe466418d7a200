use std::fmt;

use rust_decimal::Decimal;

/// Binary comparison operators of EL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// `==`
    Eq,
    /// `!=`
    Neq,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    Le,
    /// `>=`
    Ge,
}

impl CompareOp {
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Neq => "!=",
            CompareOp::Lt => "<",
            CompareOp::Gt => ">",
            CompareOp::Le => "<=",
            CompareOp::Ge => ">=",
        }
    }

    /// The operator with its operands swapped: `a < b` is `b > a`.
    pub fn flipped(self) -> Self {
        match self {
            CompareOp::Lt => CompareOp::Gt,
            CompareOp::Gt => CompareOp::Lt,
            CompareOp::Le => CompareOp::Ge,
            CompareOp::Ge => CompareOp::Le,
            op => op,
        }
    }

    pub fn is_ordering(self) -> bool {
        !matches!(self, CompareOp::Eq | CompareOp::Neq)
    }
}

/// Arithmetic operators. Lowering never emits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl ArithOp {
    pub fn symbol(self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
            ArithOp::Mod => "%",
        }
    }

    fn precedence(self) -> u8 {
        match self {
            ArithOp::Add | ArithOp::Sub => 4,
            ArithOp::Mul | ArithOp::Div | ArithOp::Mod => 5,
        }
    }
}

/// Typed EL literals.
#[derive(Debug, Clone, PartialEq)]
pub enum ElLiteral {
    /// 32-bit integer
    ///
    /// # Example
    /// ```text
    /// 123
    /// ```
    Int(i32),

    /// 64-bit integer, written with an `L` suffix
    ///
    /// # Example
    /// ```text
    /// 3000000000L
    /// ```
    Long(i64),

    /// Exact decimal, written as is
    ///
    /// # Example
    /// ```text
    /// 99.20
    /// ```
    Decimal(Decimal),

    /// Floating point number, written with a `d` suffix
    ///
    /// # Example
    /// ```text
    /// 999d
    /// ```
    Double(f64),

    Boolean(bool),

    /// Single-quoted string
    String(String),
}

impl fmt::Display for ElLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElLiteral::Int(n) => write!(f, "{}", n),
            ElLiteral::Long(n) => write!(f, "{}L", n),
            ElLiteral::Decimal(d) => write!(f, "{}", d),
            ElLiteral::Double(d) => write!(f, "{}d", d),
            ElLiteral::Boolean(b) => write!(f, "{}", b),
            ElLiteral::String(s) => write!(f, "'{}'", s.replace('\'', "\\'")),
        }
    }
}

/// A node of an EL expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum ElNode {
    /// Field path (`name`, `address.city`)
    Path(String),

    /// The all-fields marker (`*`), only meaningful as a function argument
    AllFields,

    Literal(ElLiteral),

    /// Function call
    ///
    /// # Example
    /// ```text
    /// between(age, 18, 65)
    /// ```
    Call { name: String, args: Vec<ElNode> },

    Compare {
        op: CompareOp,
        left: Box<ElNode>,
        right: Box<ElNode>,
    },

    /// `a && b && ...`
    And(Vec<ElNode>),

    /// `a || b || ...`
    Or(Vec<ElNode>),

    /// `!(a)`
    Not(Box<ElNode>),

    Arithmetic {
        op: ArithOp,
        left: Box<ElNode>,
        right: Box<ElNode>,
    },

    /// `if (c) a elseif (d) b else e`
    Conditional {
        branches: Vec<(ElNode, ElNode)>,
        otherwise: Option<Box<ElNode>>,
    },

    /// `switch (s) { case 'x': a, b default: c }`
    Switch {
        subject: Box<ElNode>,
        cases: Vec<(ElNode, Vec<ElNode>)>,
        default: Option<Vec<ElNode>>,
    },

    /// Array literal (`[1, 2, 3]`)
    Array(Vec<ElNode>),

    /// `target = value`
    Assignment {
        target: Box<ElNode>,
        value: Box<ElNode>,
    },

    /// `{ a; b }`
    Block(Vec<ElNode>),
}

impl ElNode {
    pub fn path(path: impl Into<String>) -> Self {
        ElNode::Path(path.into())
    }

    pub fn string(value: impl Into<String>) -> Self {
        ElNode::Literal(ElLiteral::String(value.into()))
    }

    pub fn boolean(value: bool) -> Self {
        ElNode::Literal(ElLiteral::Boolean(value))
    }

    pub fn call(name: impl Into<String>, args: Vec<ElNode>) -> Self {
        ElNode::Call {
            name: name.into(),
            args,
        }
    }

    pub fn compare(op: CompareOp, left: ElNode, right: ElNode) -> Self {
        ElNode::Compare {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Short name of the node kind, used in error messages.
    pub fn describe(&self) -> String {
        match self {
            ElNode::Path(path) => format!("path '{}'", path),
            ElNode::AllFields => "'*'".to_string(),
            ElNode::Literal(literal) => format!("literal {}", literal),
            ElNode::Call { name, .. } => format!("function '{}'", name),
            ElNode::Compare { op, .. } => format!("operator '{}'", op.symbol()),
            ElNode::And(_) => "operator '&&'".to_string(),
            ElNode::Or(_) => "operator '||'".to_string(),
            ElNode::Not(_) => "operator '!'".to_string(),
            ElNode::Arithmetic { op, .. } => format!("arithmetic operator '{}'", op.symbol()),
            ElNode::Conditional { .. } => "conditional 'if'".to_string(),
            ElNode::Switch { .. } => "'switch'".to_string(),
            ElNode::Array(_) => "array literal".to_string(),
            ElNode::Assignment { .. } => "assignment".to_string(),
            ElNode::Block(_) => "block".to_string(),
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            ElNode::Assignment { .. } => 0,
            ElNode::Or(_) => 1,
            ElNode::And(_) => 2,
            ElNode::Compare { .. } => 3,
            ElNode::Arithmetic { op, .. } => op.precedence(),
            _ => 7,
        }
    }

    fn write_operand(&self, f: &mut fmt::Formatter<'_>, min_precedence: u8) -> fmt::Result {
        if self.precedence() < min_precedence {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, nodes: &[ElNode], separator: &str) -> fmt::Result {
    for (i, node) in nodes.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{}", node)?;
    }
    Ok(())
}

impl fmt::Display for ElNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElNode::Path(path) => f.write_str(path),
            ElNode::AllFields => f.write_str("*"),
            ElNode::Literal(literal) => write!(f, "{}", literal),
            ElNode::Call { name, args } => {
                write!(f, "{}(", name)?;
                write_list(f, args, ", ")?;
                f.write_str(")")
            }
            ElNode::Compare { op, left, right } => {
                left.write_operand(f, 4)?;
                write!(f, " {} ", op.symbol())?;
                right.write_operand(f, 4)
            }
            ElNode::And(children) | ElNode::Or(children) => {
                let (separator, min) = match self {
                    ElNode::And(_) => (" && ", 3),
                    _ => (" || ", 2),
                };
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(separator)?;
                    }
                    child.write_operand(f, min)?;
                }
                Ok(())
            }
            ElNode::Not(inner) => write!(f, "!({})", inner),
            ElNode::Arithmetic { op, left, right } => {
                left.write_operand(f, op.precedence())?;
                write!(f, " {} ", op.symbol())?;
                right.write_operand(f, op.precedence() + 1)
            }
            ElNode::Conditional {
                branches,
                otherwise,
            } => {
                for (i, (condition, body)) in branches.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" else ")?;
                    }
                    write!(f, "if ({}) {{ {} }}", condition, body)?;
                }
                if let Some(otherwise) = otherwise {
                    write!(f, " else {{ {} }}", otherwise)?;
                }
                Ok(())
            }
            ElNode::Switch {
                subject,
                cases,
                default,
            } => {
                write!(f, "switch ({}) {{", subject)?;
                for (label, body) in cases {
                    write!(f, " case {}: ", label)?;
                    write_list(f, body, ", ")?;
                }
                if let Some(body) = default {
                    f.write_str(" default: ")?;
                    write_list(f, body, ", ")?;
                }
                f.write_str(" }")
            }
            ElNode::Array(items) => {
                f.write_str("[")?;
                write_list(f, items, ", ")?;
                f.write_str("]")
            }
            ElNode::Assignment { target, value } => write!(f, "{} = {}", target, value),
            ElNode::Block(items) => {
                f.write_str("{ ")?;
                write_list(f, items, "; ")?;
                f.write_str(" }")
            }
        }
    }
}
