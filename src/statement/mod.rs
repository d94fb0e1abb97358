//! Statements: the closed set of keyword pixels and their code generation.
//!
//! Every statement starts with a keyword pixel. Generation reads the rest of
//! the statement's partition, reports problems on the reader, and returns a
//! [`Generated`] describing the code and the symbols the evaluator must bind.

mod block;
mod call;
mod conditional;
mod jump;
mod loops;
mod print;
mod structure;
mod variable;

use std::fmt;

use serde::Serialize;

use crate::diagnostic::{ErrorKind, Syntax};
use crate::reader::{ErrorTarget, PixelReader};
use crate::scope::{Overload, Parameter, Scope, ScopeMember};
use crate::types::{Colour, ColourScheme, Pixel};

/// Where a statement wants blank lines around it in formatted output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Spacing {
    Before,
    After,
    Both,
    None,
}

/// Fixed scope and layout behaviour of a statement kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatementOptions {
    pub opens_scope: bool,
    /// Opens a scope that lasts for the following statement only.
    pub opens_temporary_scope: bool,
    pub closes_scope: bool,
    /// Repeated keyword-only statements merge into one chained statement.
    pub allows_chaining: bool,
    pub spacing: Spacing,
}

impl StatementOptions {
    const PLAIN: Self = Self {
        opens_scope: false,
        opens_temporary_scope: false,
        closes_scope: false,
        allows_chaining: false,
        spacing: Spacing::None,
    };

    /// Whether the statement pushes any kind of scope.
    pub fn opens_any_scope(&self) -> bool {
        self.opens_scope || self.opens_temporary_scope
    }
}

/// Every statement of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatementKind {
    Declare,
    Call,
    If,
    Else,
    ForEach,
    While,
    Return,
    BlockOpen,
    BlockClose,
    Print,
    Struct,
}

impl StatementKind {
    /// All kinds in catalog registration order.
    pub const ALL: [StatementKind; 11] = [
        StatementKind::Declare,
        StatementKind::Call,
        StatementKind::If,
        StatementKind::Else,
        StatementKind::ForEach,
        StatementKind::While,
        StatementKind::Return,
        StatementKind::BlockOpen,
        StatementKind::BlockClose,
        StatementKind::Print,
        StatementKind::Struct,
    ];

    /// Colour scheme key of the keyword pixel.
    pub fn key(self) -> &'static str {
        match self {
            StatementKind::Declare => "variable.set",
            StatementKind::Call => "function.call",
            StatementKind::If => "if",
            StatementKind::Else => "else",
            StatementKind::ForEach => "foreach",
            StatementKind::While => "while",
            StatementKind::Return => "return",
            StatementKind::BlockOpen => "lambda.open",
            StatementKind::BlockClose => "lambda.close",
            StatementKind::Print => "print",
            StatementKind::Struct => "struct",
        }
    }

    pub fn options(self) -> StatementOptions {
        let plain = StatementOptions::PLAIN;
        match self {
            StatementKind::If | StatementKind::While => StatementOptions {
                opens_temporary_scope: true,
                spacing: Spacing::Before,
                ..plain
            },
            StatementKind::Else => StatementOptions {
                opens_temporary_scope: true,
                ..plain
            },
            StatementKind::ForEach => StatementOptions {
                spacing: Spacing::Before,
                ..plain
            },
            StatementKind::Return => StatementOptions {
                allows_chaining: true,
                ..plain
            },
            StatementKind::BlockOpen => StatementOptions {
                opens_scope: true,
                ..plain
            },
            StatementKind::BlockClose => StatementOptions {
                closes_scope: true,
                spacing: Spacing::After,
                ..plain
            },
            StatementKind::Struct => StatementOptions {
                spacing: Spacing::Both,
                ..plain
            },
            StatementKind::Declare | StatementKind::Call | StatementKind::Print => plain,
        }
    }

    /// Syntax template tokens, keyword first.
    pub fn syntax_tokens(self) -> &'static [&'static str] {
        match self {
            StatementKind::Declare => &["variable.set", "<name>", "<value>"],
            StatementKind::Call => &["function.call", "<function>", "<arguments...>"],
            StatementKind::If => &["if", "<condition>"],
            StatementKind::Else => &["else"],
            StatementKind::ForEach => &["foreach", "<collection>"],
            StatementKind::While => &["while", "<?condition>"],
            StatementKind::Return => &["return", "<?value>"],
            StatementKind::BlockOpen => &["lambda.open", "<?parameters...>"],
            StatementKind::BlockClose => &["lambda.close"],
            StatementKind::Print => &["print", "<?value>"],
            StatementKind::Struct => &["struct", "<name>", "<?members...>"],
        }
    }

    /// A fresh, unmarked syntax template.
    pub fn syntax(self) -> Syntax {
        Syntax::new(self.syntax_tokens())
    }

    /// Generate code for one statement.
    ///
    /// `reader` covers the statement's partition, keyword pixel included.
    pub fn generate(self, reader: &mut PixelReader<'_>, context: &Context<'_>) -> Generated {
        // Keyword
        reader.next();

        log::debug!(
            "Generating {} with {} pixel(s), chain {}",
            self.key(),
            reader.remaining().len(),
            context.chain
        );

        match self {
            StatementKind::Declare => variable::generate(reader, context),
            StatementKind::Call => call::generate(reader, context),
            StatementKind::If => conditional::generate_if(reader, context),
            StatementKind::Else => conditional::generate_else(reader, context),
            StatementKind::ForEach => loops::generate_foreach(reader, context),
            StatementKind::While => loops::generate_while(reader, context),
            StatementKind::Return => jump::generate(reader, context),
            StatementKind::BlockOpen => block::generate_open(reader, context),
            StatementKind::BlockClose => block::generate_close(reader, context),
            StatementKind::Print => print::generate(reader, context),
            StatementKind::Struct => structure::generate(reader, context),
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The statement kinds a language recognises, in lookup order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementCatalog {
    kinds: Vec<StatementKind>,
}

impl Default for StatementCatalog {
    fn default() -> Self {
        Self {
            kinds: StatementKind::ALL.to_vec(),
        }
    }
}

impl StatementCatalog {
    /// An empty catalog.
    pub fn empty() -> Self {
        Self { kinds: Vec::new() }
    }

    /// Append a kind. Kinds registered earlier win colour ties.
    pub fn register(mut self, kind: StatementKind) -> Self {
        if !self.kinds.contains(&kind) {
            self.kinds.push(kind);
        }
        self
    }

    /// The first registered kind whose colour matches.
    pub fn by_colour(&self, colour: Colour, scheme: &ColourScheme) -> Option<StatementKind> {
        self.kinds
            .iter()
            .copied()
            .find(|kind| scheme.matches(kind.key(), colour))
    }

    /// The kind of a keyword pixel.
    pub fn by_pixel(&self, pixel: &Pixel) -> Option<StatementKind> {
        pixel.statement().filter(|kind| self.kinds.contains(kind))
    }

    pub fn kinds(&self) -> &[StatementKind] {
        &self.kinds
    }
}

/// What a statement sees of its surroundings while generating.
#[derive(Debug, Clone, Copy)]
pub struct Context<'c> {
    pub scope: &'c Scope,
    pub previous: Option<StatementKind>,
    pub next: Option<StatementKind>,
    /// Number of merged keyword partitions; 1 unless the kind chains.
    pub chain: usize,
    /// The previous statement declared a function awaiting its parameters.
    pub declares_function: bool,
}

impl<'c> Context<'c> {
    pub fn new(scope: &'c Scope) -> Self {
        Self {
            scope,
            previous: None,
            next: None,
            chain: 1,
            declares_function: false,
        }
    }

    pub fn previous(mut self, previous: Option<StatementKind>) -> Self {
        self.previous = previous;
        self
    }

    pub fn next(mut self, next: Option<StatementKind>) -> Self {
        self.next = next;
        self
    }

    pub fn chain(mut self, chain: usize) -> Self {
        self.chain = chain;
        self
    }

    pub fn declares_function(mut self, declares_function: bool) -> Self {
        self.declares_function = declares_function;
        self
    }
}

/// A function whose signature is known only once its block opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFunction {
    /// Scope key (hex identity) of the name pixel.
    pub key: String,
    pub name: String,
}

impl PendingFunction {
    /// The function member, taking its parameters from the opening block.
    pub fn resolve(self, parameters: &[(String, ScopeMember)]) -> (String, ScopeMember) {
        let overload = Overload::new(
            parameters
                .iter()
                .map(|(_, member)| Parameter::named(member.name()))
                .collect(),
        );
        let member = ScopeMember::Function {
            name: self.name,
            overloads: vec![overload],
            library: false,
        };
        (self.key, member)
    }
}

/// The result of generating one statement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Generated {
    pub code: String,
    /// Symbols bound in the scope the statement appears in.
    pub definitions: Vec<(String, ScopeMember)>,
    /// Symbols bound in the scope the statement opens.
    pub parameters: Vec<(String, ScopeMember)>,
    pub pending_function: Option<PendingFunction>,
}

impl Generated {
    pub fn code(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..Self::default()
        }
    }

    pub fn define(mut self, key: impl Into<String>, member: ScopeMember) -> Self {
        self.definitions.push((key.into(), member));
        self
    }
}

/// Read the name pixel at template position `token`.
///
/// Names must be plain symbols; anything else is reported against the
/// statement's syntax template.
fn read_name<'a>(
    reader: &mut PixelReader<'a>,
    kind: StatementKind,
    token: usize,
) -> Option<&'a Pixel> {
    let Some(pixel) = reader.next() else {
        reader.error_with_syntax(
            ErrorKind::MissingToken,
            format!("{} requires a name", kind),
            ErrorTarget::Cursor,
            &kind.syntax().failed_at(token),
        );
        return None;
    };

    if !pixel.is_symbol() {
        reader.error_with_syntax(
            ErrorKind::KindMismatch,
            format!("{} cannot be used as a name", pixel),
            ErrorTarget::Cursor,
            &kind.syntax().failed_at(token),
        );
        return None;
    }

    Some(pixel)
}

/// Read the remaining pixels as distinct symbol names.
///
/// Returns `(key, identifier)` pairs; offenders are reported and skipped.
fn read_names(reader: &mut PixelReader<'_>, kind: StatementKind, token: usize) -> Vec<(String, String)> {
    let mut names: Vec<(String, String)> = Vec::new();

    while let Some(pixel) = reader.next() {
        if !pixel.is_symbol() {
            reader.error_with_syntax(
                ErrorKind::KindMismatch,
                format!("{} cannot be used as a name", pixel),
                ErrorTarget::Cursor,
                &kind.syntax().failed_at(token),
            );
            continue;
        }

        let key = pixel.hex();
        if names.iter().any(|(existing, _)| *existing == key) {
            reader.error(
                ErrorKind::KindMismatch,
                format!("{} is declared twice", pixel),
                ErrorTarget::Cursor,
            );
            continue;
        }
        names.push((key, pixel.identifier()));
    }

    names
}

/// Report any pixels left after a statement that takes nothing more.
fn reject_trailing(reader: &mut PixelReader<'_>, kind: StatementKind) {
    if let Some(pixel) = reader.next() {
        reader.error_with_syntax(
            ErrorKind::UnexpectedToken,
            format!("Unexpected {} after {}", pixel, kind),
            ErrorTarget::Cursor,
            &kind.syntax().failed_at(kind.syntax_tokens().len()),
        );
        reader.skip_to_end();
    }
}

/// Report a header statement with nothing to apply to.
fn require_body(reader: &mut PixelReader<'_>, context: &Context<'_>, kind: StatementKind) {
    if matches!(context.next, None | Some(StatementKind::BlockClose)) {
        reader.error(
            ErrorKind::MissingToken,
            format!("{} has no body", kind),
            ErrorTarget::First,
        );
    }
}
