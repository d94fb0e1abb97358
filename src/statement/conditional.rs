//! `if <condition>` and `else`.

use crate::diagnostic::ErrorKind;
use crate::expression::ExpressionParser;
use crate::reader::{ErrorTarget, PixelReader};

use super::{reject_trailing, require_body, Context, Generated, StatementKind};

pub(super) fn generate_if(reader: &mut PixelReader<'_>, context: &Context<'_>) -> Generated {
    let kind = StatementKind::If;
    let condition = ExpressionParser::new(reader, context.scope).eval();
    if condition.is_empty() {
        reader.error_with_syntax(
            ErrorKind::MissingToken,
            "if requires a condition",
            ErrorTarget::Cursor,
            &kind.syntax().failed_at(1),
        );
    }
    require_body(reader, context, kind);

    Generated::code(format!("if ({})", condition.code()))
}

pub(super) fn generate_else(reader: &mut PixelReader<'_>, context: &Context<'_>) -> Generated {
    let kind = StatementKind::Else;
    reject_trailing(reader, kind);
    require_body(reader, context, kind);

    Generated::code("else")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::Scope;
    use crate::statement::tests::{generate, symbol};
    use crate::types::{Colour, Pixel, PixelKind};

    fn truth() -> Pixel {
        Pixel::with_kind(Colour::rgb(0x66, 0xFF, 0x66), 0, 0, PixelKind::Boolean(true))
    }

    #[test]
    fn test_if() {
        let scope = Scope::global();
        let (generated, diagnostics) = generate(
            StatementKind::If,
            vec![truth()],
            Context::new(&scope).next(Some(StatementKind::Print)),
        );
        assert!(diagnostics.is_empty());
        assert_eq!(generated.code, "if (true)");
    }

    #[test]
    fn test_if_needs_condition_and_body() {
        let scope = Scope::global();
        let (_, diagnostics) = generate(StatementKind::If, vec![], Context::new(&scope));
        assert_eq!(diagnostics.count(ErrorKind::MissingToken), 2);
    }

    #[test]
    fn test_else_without_body() {
        let scope = Scope::global();
        let (_, diagnostics) = generate(
            StatementKind::Else,
            vec![],
            Context::new(&scope).next(Some(StatementKind::BlockClose)),
        );

        let diagnostic = diagnostics.iter().next().unwrap();
        assert_eq!(diagnostic.message, "else has no body");
        assert_eq!((diagnostic.x, diagnostic.y), (0, 0));
    }

    #[test]
    fn test_else_takes_nothing() {
        let scope = Scope::global();
        let (generated, diagnostics) = generate(
            StatementKind::Else,
            vec![symbol(1)],
            Context::new(&scope).next(Some(StatementKind::If)),
        );
        assert_eq!(generated.code, "else");
        assert_eq!(diagnostics.count(ErrorKind::UnexpectedToken), 1);
    }
}
