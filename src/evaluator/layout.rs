//! Line layout of generated code.

use crate::statement::{Spacing, StatementKind};

const INDENT: &str = "    ";

/// Accumulates generated code line by line.
#[derive(Debug, Default)]
pub(super) struct Layout {
    code: String,
    /// Kind of the statement emitted last.
    last: Option<StatementKind>,
    last_invalid: bool,
    /// The last statement asked for a blank line after it.
    blank_pending: bool,
}

impl Layout {
    /// Append one statement.
    ///
    /// `depth` is the scope depth the statement was generated at.
    pub(super) fn emit(
        &mut self,
        kind: StatementKind,
        previous: Option<StatementKind>,
        declares_function: bool,
        depth: usize,
        invalid: bool,
        code: &str,
    ) {
        let text = if invalid {
            format!("// {}: invalid statement", kind.key())
        } else {
            code.to_string()
        };

        let separator = match (invalid || self.last_invalid, self.last) {
            (false, Some(_)) => joiner(previous, kind, declares_function),
            _ => None,
        };

        match separator {
            Some(separator) => {
                self.code.push_str(separator);
                self.code.push_str(&text);
            }
            None if text.is_empty() => {}
            None => {
                if !self.code.is_empty() {
                    if self.wants_blank_line(kind) {
                        self.code.push('\n');
                    }
                    self.code.push('\n');
                }
                let level = if kind.options().closes_scope {
                    depth.saturating_sub(1)
                } else {
                    depth
                };
                self.code.push_str(&INDENT.repeat(level));
                self.code.push_str(&text);
                self.blank_pending = false;
            }
        }

        if separator.is_some() {
            self.blank_pending = false;
        }
        if matches!(kind.options().spacing, Spacing::After | Spacing::Both) {
            self.blank_pending = true;
        }
        self.last = Some(kind);
        self.last_invalid = invalid;
    }

    fn wants_blank_line(&self, kind: StatementKind) -> bool {
        let requested = self.blank_pending
            || matches!(kind.options().spacing, Spacing::Before | Spacing::Both);
        let after_header = self.last.is_some_and(|last| last.options().opens_any_scope());

        requested && !after_header && !kind.options().closes_scope
    }

    /// The finished code, newline-terminated unless empty.
    pub(super) fn finish(mut self) -> String {
        if !self.code.is_empty() {
            self.code.push('\n');
        }
        self.code
    }
}

/// Separator for a statement that continues the previous line.
fn joiner(
    previous: Option<StatementKind>,
    kind: StatementKind,
    declares_function: bool,
) -> Option<&'static str> {
    match (previous?, kind) {
        (StatementKind::Declare, StatementKind::BlockOpen) if declares_function => Some(""),
        (
            StatementKind::If | StatementKind::Else | StatementKind::ForEach | StatementKind::While,
            StatementKind::BlockOpen,
        ) => Some(" "),
        (StatementKind::Else, StatementKind::If) => Some(" "),
        (StatementKind::BlockClose, StatementKind::Else) => Some(" "),
        _ => None,
    }
}
