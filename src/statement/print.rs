//! `print <?value>`

use crate::expression::ExpressionParser;
use crate::reader::PixelReader;

use super::{Context, Generated};

pub(super) fn generate(reader: &mut PixelReader<'_>, context: &Context<'_>) -> Generated {
    let value = ExpressionParser::new(reader, context.scope).eval();
    Generated::code(format!("println({})", value.code()))
}
