//! `return <?value>`, and `return return` as `break`.

use crate::diagnostic::ErrorKind;
use crate::expression::ExpressionParser;
use crate::reader::{ErrorTarget, PixelReader};

use super::{reject_trailing, Context, Generated, StatementKind};

pub(super) fn generate(reader: &mut PixelReader<'_>, context: &Context<'_>) -> Generated {
    match context.chain {
        1 => generate_return(reader, context),
        2 => generate_break(reader, context),
        chain => {
            reader.error(
                ErrorKind::UnexpectedToken,
                format!(
                    "return repeated {} times; use it once to return or twice to break",
                    chain
                ),
                ErrorTarget::First,
            );
            reader.skip_to_end();
            Generated::default()
        }
    }
}

fn generate_return(reader: &mut PixelReader<'_>, context: &Context<'_>) -> Generated {
    let value = ExpressionParser::new(reader, context.scope).eval();

    if context
        .scope
        .enclosing(|owner| owner == StatementKind::Declare)
        .is_none()
    {
        reader.error(
            ErrorKind::Structural,
            "return outside of a function",
            ErrorTarget::First,
        );
    }

    if value.is_empty() {
        Generated::code("return")
    } else {
        Generated::code(format!("return {}", value.code()))
    }
}

fn generate_break(reader: &mut PixelReader<'_>, context: &Context<'_>) -> Generated {
    reject_trailing(reader, StatementKind::Return);

    let in_loop = context
        .scope
        .enclosing(|owner| matches!(owner, StatementKind::ForEach | StatementKind::While))
        .is_some();
    if !in_loop {
        reader.error(
            ErrorKind::Structural,
            "break outside of a loop",
            ErrorTarget::First,
        );
    }

    Generated::code("break")
}
