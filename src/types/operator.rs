//! Operators recognised by the pixel language.

use std::fmt;

/// A binary (or unary) operator pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Member access; joins pixels into dotted sequences.
    Dot,
    Plus,
    Minus,
    Times,
    Divide,
    Modulo,
    Equality,
    Inequality,
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
    And,
    Or,
}

impl Operator {
    /// All operators, dot first.
    pub const ALL: [Operator; 14] = [
        Operator::Dot,
        Operator::Plus,
        Operator::Minus,
        Operator::Times,
        Operator::Divide,
        Operator::Modulo,
        Operator::Equality,
        Operator::Inequality,
        Operator::Greater,
        Operator::GreaterOrEqual,
        Operator::Less,
        Operator::LessOrEqual,
        Operator::And,
        Operator::Or,
    ];

    /// Colour scheme key for this operator.
    pub fn key(self) -> &'static str {
        match self {
            Operator::Dot => "op.dot",
            Operator::Plus => "op.plus",
            Operator::Minus => "op.minus",
            Operator::Times => "op.times",
            Operator::Divide => "op.divide",
            Operator::Modulo => "op.modulo",
            Operator::Equality => "op.equality",
            Operator::Inequality => "op.inequality",
            Operator::Greater => "op.greater",
            Operator::GreaterOrEqual => "op.greater_or_equal",
            Operator::Less => "op.less",
            Operator::LessOrEqual => "op.less_or_equal",
            Operator::And => "op.and",
            Operator::Or => "op.or",
        }
    }

    /// Symbol emitted in generated code.
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Dot => ".",
            Operator::Plus => "+",
            Operator::Minus => "-",
            Operator::Times => "*",
            Operator::Divide => "/",
            Operator::Modulo => "%",
            Operator::Equality => "==",
            Operator::Inequality => "!=",
            Operator::Greater => ">",
            Operator::GreaterOrEqual => ">=",
            Operator::Less => "<",
            Operator::LessOrEqual => "<=",
            Operator::And => "&&",
            Operator::Or => "||",
        }
    }

    pub fn is_dot(self) -> bool {
        self == Operator::Dot
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
