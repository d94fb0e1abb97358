//! `variable.set <name> <value>`: variable and function declarations.

use crate::diagnostic::ErrorKind;
use crate::expression::ExpressionParser;
use crate::reader::{ErrorTarget, PixelReader};
use crate::scope::ScopeMember;

use super::{read_name, Context, Generated, PendingFunction, StatementKind};

pub(super) fn generate(reader: &mut PixelReader<'_>, context: &Context<'_>) -> Generated {
    let kind = StatementKind::Declare;
    let name_index = reader.index();
    let Some(name) = read_name(reader, kind, 1) else {
        return Generated::default();
    };
    let key = name.hex();
    let identifier = name.identifier();
    let existing = context.scope.get(&key);

    if context.next == Some(StatementKind::BlockOpen) {
        if let Some(member) = existing {
            reader.error(
                ErrorKind::KindMismatch,
                format!("{} is already defined as a {}", name, member.describe()),
                ErrorTarget::At(name_index),
            );
        }
        if reader.has_next() {
            reader.error_with_syntax(
                ErrorKind::UnexpectedToken,
                "A function declaration takes no value",
                ErrorTarget::At(reader.index()),
                &kind.syntax().failed_at(2),
            );
            reader.skip_to_end();
        }

        return Generated {
            code: format!("fun {}", identifier),
            pending_function: existing.is_none().then(|| PendingFunction {
                key,
                name: identifier,
            }),
            ..Generated::default()
        };
    }

    let value = ExpressionParser::new(reader, context.scope).eval();
    if value.is_empty() {
        reader.error_with_syntax(
            ErrorKind::MissingToken,
            format!("{} needs a value", name),
            ErrorTarget::Cursor,
            &kind.syntax().failed_at(2),
        );
    }

    match existing {
        None => Generated::code(format!("var {} = {}", identifier, value.code())).define(
            key,
            ScopeMember::Variable {
                name: identifier.clone(),
            },
        ),
        Some(ScopeMember::Variable { name: bound }) => {
            Generated::code(format!("{} = {}", bound, value.code()))
        }
        Some(member) => {
            reader.error(
                ErrorKind::KindMismatch,
                format!("Cannot assign to {} {}", member.describe(), name),
                ErrorTarget::At(name_index),
            );
            Generated::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::{Overload, Scope};
    use crate::statement::tests::{character, generate, symbol};

    #[test]
    fn test_new_variable() {
        let scope = Scope::global();
        let (generated, diagnostics) = generate(
            StatementKind::Declare,
            vec![symbol(0xAA), character('H'), character('i')],
            Context::new(&scope),
        );

        assert!(diagnostics.is_empty());
        assert_eq!(generated.code, "var _AA0010 = \"Hi\"");
        assert_eq!(generated.definitions.len(), 1);
        assert_eq!(generated.definitions[0].0, "AA0010");
    }

    #[test]
    fn test_reassignment() {
        let mut scope = Scope::global();
        scope.define("AA0010", ScopeMember::Variable { name: "_AA0010".to_string() });

        let (generated, diagnostics) = generate(
            StatementKind::Declare,
            vec![symbol(0xAA), character('1')],
            Context::new(&scope),
        );
        assert!(diagnostics.is_empty());
        assert_eq!(generated.code, "_AA0010 = 1");
        assert!(generated.definitions.is_empty());
    }

    #[test]
    fn test_assigning_a_function_is_rejected() {
        let mut scope = Scope::global();
        scope.define(
            "AA0010",
            ScopeMember::Function {
                name: "_AA0010".to_string(),
                overloads: vec![Overload::arity(0)],
                library: false,
            },
        );

        let (_, diagnostics) = generate(
            StatementKind::Declare,
            vec![symbol(0xAA), character('1')],
            Context::new(&scope),
        );
        assert_eq!(diagnostics.count(ErrorKind::KindMismatch), 1);
    }

    #[test]
    fn test_missing_value() {
        let scope = Scope::global();
        let (_, diagnostics) = generate(
            StatementKind::Declare,
            vec![symbol(0xAA)],
            Context::new(&scope),
        );

        let diagnostic = diagnostics.iter().next().unwrap();
        assert_eq!(diagnostic.kind, ErrorKind::MissingToken);
        assert_eq!(
            diagnostic.syntax.as_deref(),
            Some("variable.set <name> <value>\n✓            ✓      ✗")
        );
    }

    #[test]
    fn test_function_declaration_is_pending() {
        let scope = Scope::global();
        let (generated, diagnostics) = generate(
            StatementKind::Declare,
            vec![symbol(0xAA)],
            Context::new(&scope).next(Some(StatementKind::BlockOpen)),
        );

        assert!(diagnostics.is_empty());
        assert_eq!(generated.code, "fun _AA0010");
        assert!(generated.definitions.is_empty());
        assert_eq!(
            generated.pending_function.map(|p| p.name),
            Some("_AA0010".to_string())
        );
    }

    #[test]
    fn test_redeclared_function_name_is_not_pending() {
        let mut scope = Scope::global();
        scope.define("AA0010", ScopeMember::Variable { name: "_AA0010".to_string() });

        let (generated, diagnostics) = generate(
            StatementKind::Declare,
            vec![symbol(0xAA)],
            Context::new(&scope).next(Some(StatementKind::BlockOpen)),
        );

        assert_eq!(diagnostics.count(ErrorKind::KindMismatch), 1);
        assert!(generated.pending_function.is_none());
        assert!(generated.definitions.is_empty());
    }

    #[test]
    fn test_function_declaration_takes_no_value() {
        let scope = Scope::global();
        let (_, diagnostics) = generate(
            StatementKind::Declare,
            vec![symbol(0xAA), character('1')],
            Context::new(&scope).next(Some(StatementKind::BlockOpen)),
        );
        assert_eq!(diagnostics.count(ErrorKind::UnexpectedToken), 1);
    }

    #[test]
    fn test_name_must_be_a_symbol() {
        let scope = Scope::global();
        let (_, diagnostics) = generate(
            StatementKind::Declare,
            vec![character('x'), character('1')],
            Context::new(&scope),
        );
        assert_eq!(diagnostics.count(ErrorKind::KindMismatch), 1);
    }
}
