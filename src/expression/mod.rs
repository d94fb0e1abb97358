//! Expressions and their rendering as code.

mod parser;

pub use parser::ExpressionParser;

use std::fmt;

use crate::types::Operator;

/// The shape an expression is parsed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpressionType {
    String,
    Number,
    Boolean,
    FunctionCall,
    StructInit,
    Complex,
    Empty,
}

/// A piece of a string template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StringPart {
    /// Literal text, unescaped.
    Literal(String),
    /// Code spliced in with `${...}`.
    Reference(String),
}

/// A piece of an operator expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComplexPart {
    Operand(Expression),
    Operator(Operator),
}

/// A parsed expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    String(Vec<StringPart>),
    Number(String),
    Boolean(bool),
    /// `arguments` is `None` for a plain reference that is not invoked.
    FunctionCall {
        callee: String,
        arguments: Option<Vec<Expression>>,
    },
    StructInit {
        name: String,
        arguments: Vec<Expression>,
    },
    Complex(Vec<ComplexPart>),
    Empty,
}

impl Expression {
    pub fn kind(&self) -> ExpressionType {
        match self {
            Expression::String(_) => ExpressionType::String,
            Expression::Number(_) => ExpressionType::Number,
            Expression::Boolean(_) => ExpressionType::Boolean,
            Expression::FunctionCall { .. } => ExpressionType::FunctionCall,
            Expression::StructInit { .. } => ExpressionType::StructInit,
            Expression::Complex(_) => ExpressionType::Complex,
            Expression::Empty => ExpressionType::Empty,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Expression::Empty)
    }

    /// Render as code.
    pub fn code(&self) -> String {
        match self {
            Expression::String(parts) => {
                let mut code = String::from("\"");
                for part in parts {
                    match part {
                        StringPart::Literal(text) => escape_into(&mut code, text),
                        StringPart::Reference(reference) => {
                            code.push_str("${");
                            code.push_str(reference);
                            code.push('}');
                        }
                    }
                }
                code.push('"');
                code
            }
            Expression::Number(digits) => digits.clone(),
            Expression::Boolean(value) => value.to_string(),
            Expression::FunctionCall {
                callee,
                arguments: None,
            } => callee.clone(),
            Expression::FunctionCall {
                callee,
                arguments: Some(arguments),
            } => format!("{}({})", callee, join_arguments(arguments)),
            Expression::StructInit { name, arguments } => {
                format!("{}({})", name, join_arguments(arguments))
            }
            Expression::Complex(parts) => parts
                .iter()
                .map(|part| match part {
                    ComplexPart::Operand(operand) => operand.code(),
                    ComplexPart::Operator(operator) => operator.symbol().to_string(),
                })
                .filter(|code| !code.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
            Expression::Empty => String::new(),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code())
    }
}

fn join_arguments(arguments: &[Expression]) -> String {
    arguments
        .iter()
        .map(Expression::code)
        .collect::<Vec<_>>()
        .join(", ")
}

fn escape_into(code: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '"' => code.push_str("\\\""),
            '\\' => code.push_str("\\\\"),
            '$' => code.push_str("\\$"),
            '\n' => code.push_str("\\n"),
            '\r' => code.push_str("\\r"),
            '\t' => code.push_str("\\t"),
            c if c.is_control() => code.push_str(&format!("\\u{:04X}", c as u32)),
            c => code.push(c),
        }
    }
}
