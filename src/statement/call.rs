//! `function.call <function> <arguments...>`

use crate::diagnostic::ErrorKind;
use crate::expression::{Expression, ExpressionParser, ExpressionType};
use crate::reader::{ErrorTarget, PixelReader};

use super::{Context, Generated, StatementKind};

pub(super) fn generate(reader: &mut PixelReader<'_>, context: &Context<'_>) -> Generated {
    let kind = StatementKind::Call;
    if !reader.has_next() {
        reader.error_with_syntax(
            ErrorKind::MissingToken,
            "function.call requires a function",
            ErrorTarget::Cursor,
            &kind.syntax().failed_at(1),
        );
        return Generated::default();
    }

    let callee_index = reader.index();
    let before = reader.diagnostics().len();
    let call = ExpressionParser::new(reader, context.scope).eval_as(ExpressionType::FunctionCall);

    // A resolved symbol that was never invoked
    if let Expression::FunctionCall {
        arguments: None, ..
    } = &call
    {
        if reader.diagnostics().len() == before {
            let message = match reader.pixels().get(callee_index) {
                Some(pixel) => format!("{} is not a valid function", pixel),
                None => "Not a valid function".to_string(),
            };
            reader.error(ErrorKind::KindMismatch, message, ErrorTarget::At(callee_index));
        }
    }

    Generated::code(call.code())
}
