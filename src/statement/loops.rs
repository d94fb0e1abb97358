//! `foreach <collection>` and `while <?condition>`.

use crate::diagnostic::ErrorKind;
use crate::expression::ExpressionParser;
use crate::reader::{ErrorTarget, PixelReader};

use super::{require_body, Context, Generated, StatementKind};

pub(super) fn generate_foreach(reader: &mut PixelReader<'_>, context: &Context<'_>) -> Generated {
    let kind = StatementKind::ForEach;
    let collection = ExpressionParser::new(reader, context.scope).eval();
    if collection.is_empty() {
        reader.error_with_syntax(
            ErrorKind::MissingToken,
            "foreach requires a collection",
            ErrorTarget::Cursor,
            &kind.syntax().failed_at(1),
        );
    }
    if context.next != Some(StatementKind::BlockOpen) {
        reader.error(
            ErrorKind::MissingToken,
            "foreach must be followed by a block",
            ErrorTarget::First,
        );
    }

    Generated::code(format!("{}.forEach", collection.code()))
}

pub(super) fn generate_while(reader: &mut PixelReader<'_>, context: &Context<'_>) -> Generated {
    let condition = ExpressionParser::new(reader, context.scope).eval();
    require_body(reader, context, StatementKind::While);

    if condition.is_empty() {
        Generated::code("while (true)")
    } else {
        Generated::code(format!("while ({})", condition.code()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::{Scope, ScopeMember};
    use crate::statement::tests::{generate, symbol};

    #[test]
    fn test_foreach() {
        let mut scope = Scope::global();
        scope.define("AA0010", ScopeMember::Variable { name: "_AA0010".to_string() });

        let (generated, diagnostics) = generate(
            StatementKind::ForEach,
            vec![symbol(0xAA)],
            Context::new(&scope).next(Some(StatementKind::BlockOpen)),
        );
        assert!(diagnostics.is_empty());
        assert_eq!(generated.code, "_AA0010.forEach");
    }

    #[test]
    fn test_foreach_requires_block() {
        let mut scope = Scope::global();
        scope.define("AA0010", ScopeMember::Variable { name: "_AA0010".to_string() });

        let (_, diagnostics) = generate(
            StatementKind::ForEach,
            vec![symbol(0xAA)],
            Context::new(&scope).next(Some(StatementKind::Print)),
        );
        assert_eq!(diagnostics.count(ErrorKind::MissingToken), 1);
    }

    #[test]
    fn test_while_without_condition_loops_forever() {
        let scope = Scope::global();
        let (generated, diagnostics) = generate(
            StatementKind::While,
            vec![],
            Context::new(&scope).next(Some(StatementKind::BlockOpen)),
        );
        assert!(diagnostics.is_empty());
        assert_eq!(generated.code, "while (true)");
    }
}
