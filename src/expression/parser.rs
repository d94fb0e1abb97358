use crate::diagnostic::ErrorKind;
use crate::reader::{ErrorTarget, PixelReader};
use crate::scope::{Scope, ScopeMember};
use crate::types::{Pixel, PixelSequence};

use super::{ComplexPart, Expression, ExpressionType, StringPart};

/// Parses the remaining pixels of a reader as one expression.
///
/// Problems are recorded on the reader; parsing always produces an
/// expression so generation can continue and report further errors.
pub struct ExpressionParser<'r, 'a, 's> {
    reader: &'r mut PixelReader<'a>,
    scope: &'s Scope,
}

impl<'r, 'a, 's> ExpressionParser<'r, 'a, 's> {
    pub fn new(reader: &'r mut PixelReader<'a>, scope: &'s Scope) -> Self {
        Self { reader, scope }
    }

    /// Classify the remaining pixels without consuming them.
    pub fn analyze(&mut self) -> ExpressionType {
        let start = self.reader.index();
        let mut pixels = Vec::new();
        while let Some(pixel) = self.reader.next() {
            pixels.push(pixel);
        }
        self.reader.set_index(start);

        self.classify(&pixels)
    }

    fn classify(&self, pixels: &[&Pixel]) -> ExpressionType {
        let Some(first) = pixels.first() else {
            return ExpressionType::Empty;
        };

        if pixels.iter().any(|p| p.is_operator()) {
            return ExpressionType::Complex;
        }
        if self.member(first).is_some_and(ScopeMember::is_struct) {
            return ExpressionType::StructInit;
        }
        if is_number(pixels) {
            return ExpressionType::Number;
        }
        if pixels
            .iter()
            .any(|p| p.is_character() && !p.is_numeric_character())
        {
            return ExpressionType::String;
        }
        if pixels.len() == 1 && first.is_boolean() {
            return ExpressionType::Boolean;
        }
        // Digits after a callee are its arguments
        if first.is_character() {
            ExpressionType::String
        } else {
            ExpressionType::FunctionCall
        }
    }

    /// Parse the remaining pixels as whatever they classify as.
    pub fn eval(&mut self) -> Expression {
        let kind = self.analyze();
        self.eval_as(kind)
    }

    /// Parse the remaining pixels as `kind`.
    ///
    /// Pixels the expression cannot use are reported, so the reader is
    /// always fully consumed afterwards.
    pub fn eval_as(&mut self, kind: ExpressionType) -> Expression {
        let expression = match kind {
            ExpressionType::String => self.string(),
            ExpressionType::Number => self.number(),
            ExpressionType::Boolean => self.boolean(),
            ExpressionType::FunctionCall => self.function_call(),
            ExpressionType::StructInit => self.struct_init(),
            ExpressionType::Complex => self.complex(),
            ExpressionType::Empty => Expression::Empty,
        };

        if let Some(pixel) = self.reader.peek() {
            let position = self.reader.index();
            self.reader.error(
                ErrorKind::UnexpectedToken,
                format!("Unexpected {} in expression", pixel),
                ErrorTarget::At(position),
            );
            self.reader.skip_to_end();
        }

        expression
    }

    fn string(&mut self) -> Expression {
        let mut parts = Vec::new();
        let mut literal = String::new();

        while let Some(pixel) = self.reader.peek() {
            if let Some(code) = pixel.character() {
                self.reader.next();
                // Code 0 is a boundary, not text
                if code == 0 {
                    flush(&mut parts, &mut literal);
                } else {
                    literal.push(char::from(code));
                }
                continue;
            }

            flush(&mut parts, &mut literal);
            let start = self.reader.index();
            let Some(sequence) = self.reader.next_sequence() else {
                break;
            };
            if self.check_resolves(sequence.first(), start) {
                parts.push(StringPart::Reference(self.sequence_code(&sequence)));
            }
        }
        flush(&mut parts, &mut literal);

        Expression::String(parts)
    }

    fn number(&mut self) -> Expression {
        let mut digits = String::new();
        while let Some(pixel) = self.reader.next() {
            match pixel.character() {
                Some(code) => digits.push(char::from(code)),
                None => self.reader.error(
                    ErrorKind::KindMismatch,
                    format!("{} is not part of a number", pixel),
                    ErrorTarget::Cursor,
                ),
            }
        }
        Expression::Number(digits)
    }

    fn boolean(&mut self) -> Expression {
        let Some(pixel) = self.reader.next() else {
            return Expression::Empty;
        };
        match pixel.boolean() {
            Some(value) => Expression::Boolean(value),
            None => {
                self.reader.error(
                    ErrorKind::KindMismatch,
                    format!("{} is not a boolean", pixel),
                    ErrorTarget::Cursor,
                );
                Expression::Empty
            }
        }
    }

    fn function_call(&mut self) -> Expression {
        let start = self.reader.index();
        let Some(sequence) = self.reader.next_sequence() else {
            return Expression::Empty;
        };
        let first = sequence.first();

        if !self.check_resolves(first, start) {
            self.reader.skip_to_end();
            return Expression::FunctionCall {
                callee: first.identifier(),
                arguments: None,
            };
        }

        let callee = self.sequence_code(&sequence);
        let target = if sequence.is_nested() {
            sequence.last()
        } else {
            first
        };
        let target_index = self.reader.index().saturating_sub(1);

        match self.member(target) {
            Some(member) if member.is_function() || (member.is_struct() && !sequence.is_nested()) => {
                let arguments = self.arguments();
                self.check_arity(member, &callee, arguments.len(), start);
                Expression::FunctionCall {
                    callee,
                    arguments: Some(arguments),
                }
            }
            _ => {
                if self.reader.has_next() {
                    self.reader.error(
                        ErrorKind::KindMismatch,
                        format!("{} is not a valid function", target),
                        ErrorTarget::At(target_index),
                    );
                    self.reader.skip_to_end();
                }
                Expression::FunctionCall {
                    callee,
                    arguments: None,
                }
            }
        }
    }

    fn struct_init(&mut self) -> Expression {
        let start = self.reader.index();
        let Some(pixel) = self.reader.next() else {
            return Expression::Empty;
        };
        let name = self
            .resolve_name(pixel)
            .unwrap_or_else(|| pixel.identifier());

        let Some(member) = self.member(pixel).filter(|m| m.is_struct()) else {
            self.reader.error(
                ErrorKind::KindMismatch,
                format!("{} is not a struct", pixel),
                ErrorTarget::At(start),
            );
            self.reader.skip_to_end();
            return Expression::StructInit {
                name,
                arguments: Vec::new(),
            };
        };

        let arguments = self.arguments();
        self.check_arity(member, &name, arguments.len(), start);
        Expression::StructInit { name, arguments }
    }

    fn complex(&mut self) -> Expression {
        let base = self.reader.index();
        let pixels = self.reader.remaining();
        let mut parts = Vec::new();
        let mut operand_start = base;
        let mut last_operator = None;

        for (offset, pixel) in pixels.iter().enumerate() {
            if let Some(operator) = pixel.operator() {
                let position = base + offset;
                parts.push(ComplexPart::Operand(self.parse_slice(operand_start, position)));
                parts.push(ComplexPart::Operator(operator));
                operand_start = position + 1;
                last_operator = Some((position, operator));
            }
        }

        let operand = self.parse_slice(operand_start, base + pixels.len());
        if let (true, Some((position, operator))) = (operand.is_empty(), last_operator) {
            self.reader.error(
                ErrorKind::MissingToken,
                format!("Operator {} has no right operand", operator),
                ErrorTarget::At(position),
            );
        }
        parts.push(ComplexPart::Operand(operand));
        self.reader.skip_to_end();

        Expression::Complex(parts)
    }

    /// Argument atoms up to the first empty one.
    fn arguments(&mut self) -> Vec<Expression> {
        let mut arguments = Vec::new();
        loop {
            let argument = self.argument();
            if argument.is_empty() {
                break;
            }
            arguments.push(argument);
        }
        arguments
    }

    /// One argument: a run of characters, a boolean, or a symbol sequence.
    fn argument(&mut self) -> Expression {
        let Some(pixel) = self.reader.peek() else {
            return Expression::Empty;
        };
        let start = self.reader.index();

        if pixel.is_character() {
            while self.reader.peek().is_some_and(Pixel::is_character) {
                self.reader.next();
            }
        } else if pixel.is_boolean() {
            self.reader.next();
        } else if pixel.is_operator() || pixel.is_dot() || pixel.is_statement() {
            return Expression::Empty;
        } else {
            self.skip_sequence();
        }

        let end = self.reader.index();
        self.parse_slice(start, end)
    }

    /// Parse `start..end` with a nested parser and keep its diagnostics.
    fn parse_slice(&mut self, start: usize, end: usize) -> Expression {
        let mut slice = self.reader.sliced(start, end);
        let expression = ExpressionParser::new(&mut slice, self.scope).eval();
        self.reader.absorb(slice);
        expression
    }

    /// Advance over a sequence without reporting; the slice parse reports.
    fn skip_sequence(&mut self) {
        if self.reader.next().is_none() {
            return;
        }
        while self.reader.peek().is_some_and(Pixel::is_dot) {
            self.reader.next();
            if self.reader.next().is_none() {
                break;
            }
        }
    }

    fn check_arity(&mut self, member: &ScopeMember, name: &str, found: usize, start: usize) {
        if member.is_applicable(found) {
            return;
        }
        let what = if member.is_struct() { "Struct" } else { "Function" };
        self.reader.error(
            ErrorKind::ArityMismatch,
            format!(
                "{} {} called with {} argument(s), expected {}",
                what,
                name,
                found,
                member.expected_arities()
            ),
            ErrorTarget::At(start),
        );
    }

    /// Report `pixel` unless it names something.
    fn check_resolves(&mut self, pixel: &Pixel, position: usize) -> bool {
        if self.resolve_name(pixel).is_some() {
            return true;
        }
        self.reader.error(
            ErrorKind::UnresolvedReference,
            format!("Unresolved reference {}", pixel),
            ErrorTarget::At(position),
        );
        false
    }

    fn member(&self, pixel: &Pixel) -> Option<&'s ScopeMember> {
        if pixel.is_symbol() || pixel.library().is_some() {
            self.scope.get(&pixel.hex())
        } else {
            None
        }
    }

    fn resolve_name(&self, pixel: &Pixel) -> Option<String> {
        if let Some(value) = pixel.boolean() {
            return Some(value.to_string());
        }
        self.member(pixel).map(|member| member.name().to_string())
    }

    /// `first.member.member` as code.
    fn sequence_code(&self, sequence: &PixelSequence) -> String {
        sequence
            .iter()
            .enumerate()
            .map(|(i, pixel)| {
                if i == 0 {
                    return self
                        .resolve_name(pixel)
                        .unwrap_or_else(|| pixel.identifier());
                }
                match self.member(pixel) {
                    Some(member) if pixel.library().is_some() => member.name().to_string(),
                    _ => pixel.identifier(),
                }
            })
            .collect::<Vec<_>>()
            .join(".")
    }
}

fn flush(parts: &mut Vec<StringPart>, literal: &mut String) {
    if !literal.is_empty() {
        parts.push(StringPart::Literal(std::mem::take(literal)));
    }
}

/// All character pixels, an optional leading `-`, and at least one digit.
fn is_number(pixels: &[&Pixel]) -> bool {
    let Some(codes) = pixels.iter().map(|p| p.character()).collect::<Option<Vec<u8>>>() else {
        return false;
    };
    let digits = match codes.split_first() {
        Some((&b'-', rest)) => rest,
        _ => &codes[..],
    };
    !digits.is_empty() && digits.iter().all(u8::is_ascii_digit)
}
