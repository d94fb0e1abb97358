//! `struct <name> <?members...>`

use crate::diagnostic::ErrorKind;
use crate::reader::{ErrorTarget, PixelReader};
use crate::scope::{Overload, Parameter, ScopeMember};

use super::{read_name, read_names, Context, Generated, StatementKind};

pub(super) fn generate(reader: &mut PixelReader<'_>, context: &Context<'_>) -> Generated {
    let kind = StatementKind::Struct;
    let name_index = reader.index();
    let Some(name) = read_name(reader, kind, 1) else {
        return Generated::default();
    };
    let key = name.hex();
    let identifier = name.identifier();

    if let Some(member) = context.scope.get(&key) {
        reader.error(
            ErrorKind::KindMismatch,
            format!("{} is already defined as a {}", name, member.describe()),
            ErrorTarget::At(name_index),
        );
    }

    let members = read_names(reader, kind, 2);
    let code = if members.is_empty() {
        format!("class {}", identifier)
    } else {
        let fields: Vec<String> = members
            .iter()
            .map(|(_, field)| format!("var {}: Any?", field))
            .collect();
        format!("class {}({})", identifier, fields.join(", "))
    };

    let constructor = Overload::new(
        members
            .into_iter()
            .map(|(_, field)| Parameter::named(field))
            .collect(),
    );

    Generated::code(code).define(
        key,
        ScopeMember::Struct {
            name: identifier,
            constructor,
        },
    )
}
