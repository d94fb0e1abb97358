//! `lambda.open <?parameters...>` and `lambda.close`.

use crate::diagnostic::ErrorKind;
use crate::reader::{ErrorTarget, PixelReader};
use crate::scope::ScopeMember;

use super::{read_names, reject_trailing, Context, Generated, StatementKind};

pub(super) fn generate_open(reader: &mut PixelReader<'_>, context: &Context<'_>) -> Generated {
    let kind = StatementKind::BlockOpen;
    let names = read_names(reader, kind, 1);
    let identifiers: Vec<&str> = names.iter().map(|(_, name)| name.as_str()).collect();

    let code = if context.declares_function {
        let parameters: Vec<String> = identifiers
            .iter()
            .map(|name| format!("{}: Any?", name))
            .collect();
        format!("({}): Any? {{", parameters.join(", "))
    } else if context.previous == Some(StatementKind::ForEach) {
        if identifiers.is_empty() {
            "{".to_string()
        } else {
            format!("{{ {} ->", identifiers.join(", "))
        }
    } else {
        if !names.is_empty() {
            reader.error(
                ErrorKind::KindMismatch,
                "Block parameters are only allowed after a function declaration or foreach",
                ErrorTarget::At(1),
            );
        }
        "{".to_string()
    };

    let parameters = names
        .into_iter()
        .map(|(key, name)| (key, ScopeMember::Constant { name }))
        .collect();

    Generated {
        code,
        parameters,
        ..Generated::default()
    }
}

pub(super) fn generate_close(reader: &mut PixelReader<'_>, _context: &Context<'_>) -> Generated {
    reject_trailing(reader, StatementKind::BlockClose);
    Generated::code("}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::Scope;
    use crate::statement::tests::{generate, symbol};

    #[test]
    fn test_function_parameters() {
        let scope = Scope::global();
        let (generated, diagnostics) = generate(
            StatementKind::BlockOpen,
            vec![symbol(1), symbol(2)],
            Context::new(&scope)
                .previous(Some(StatementKind::Declare))
                .declares_function(true),
        );

        assert!(diagnostics.is_empty());
        assert_eq!(generated.code, "(_010010: Any?, _020010: Any?): Any? {");
        assert_eq!(generated.parameters.len(), 2);
        assert!(matches!(generated.parameters[0].1, ScopeMember::Constant { .. }));
    }

    #[test]
    fn test_foreach_parameter() {
        let scope = Scope::global();
        let (generated, _) = generate(
            StatementKind::BlockOpen,
            vec![symbol(1)],
            Context::new(&scope).previous(Some(StatementKind::ForEach)),
        );
        assert_eq!(generated.code, "{ _010010 ->");

        let (bare, _) = generate(
            StatementKind::BlockOpen,
            vec![],
            Context::new(&scope).previous(Some(StatementKind::ForEach)),
        );
        assert_eq!(bare.code, "{");
    }

    #[test]
    fn test_parameters_after_if_are_rejected() {
        let scope = Scope::global();
        let (generated, diagnostics) = generate(
            StatementKind::BlockOpen,
            vec![symbol(1)],
            Context::new(&scope).previous(Some(StatementKind::If)),
        );
        assert_eq!(generated.code, "{");
        assert_eq!(diagnostics.count(ErrorKind::KindMismatch), 1);
    }

    #[test]
    fn test_duplicate_parameter() {
        let scope = Scope::global();
        let (generated, diagnostics) = generate(
            StatementKind::BlockOpen,
            vec![symbol(1), symbol(1)],
            Context::new(&scope).declares_function(true),
        );
        assert_eq!(generated.parameters.len(), 1);
        assert_eq!(diagnostics.count(ErrorKind::KindMismatch), 1);
    }
}
