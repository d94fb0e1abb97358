//! The evaluator: pixels in, code and diagnostics out.
//!
//! Evaluation runs in three steps:
//!
//! 1. The pixel array is subdivided into one partition per keyword pixel.
//! 2. Partitions become a queue of statements; repeated keyword-only
//!    partitions of a chaining statement merge into one entry.
//! 3. Each entry is generated in turn while the evaluator maintains the
//!    scope stack, the indentation and the joining of header lines.
//!
//! Evaluation never fails. Problems are reported as diagnostics, and any
//! diagnostic invalidates the evaluation.

mod layout;

use serde::Serialize;

use crate::diagnostic::{Diagnostic, Diagnostics, ErrorKind};
use crate::grid::Grid;
use crate::language::Language;
use crate::reader::{ErrorTarget, Partition, PixelReader};
use crate::scope::{Scope, ScopeOwner};
use crate::statement::{Context, PendingFunction, StatementKind};
use crate::types::PixelArray;

use layout::Layout;

/// The outcome of evaluating one program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evaluation {
    code: String,
    invalidated: bool,
    diagnostics: Diagnostics,
}

impl Evaluation {
    /// Generated code. Invalid statements appear as comments.
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Whether any statement was invalid. Invalidated code should not be used.
    pub fn is_invalidated(&self) -> bool {
        self.invalidated
    }
}

/// One queued statement.
struct Entry<'a> {
    kind: StatementKind,
    reader: PixelReader<'a>,
    chain: usize,
}

/// Evaluates programs of a [`Language`].
pub struct Evaluator<'l> {
    language: &'l Language,
    scope: Scope,
    layout: Layout,
    diagnostics: Diagnostics,
    invalidated: bool,
}

impl<'l> Evaluator<'l> {
    pub fn new(language: &'l Language) -> Self {
        Self {
            language,
            scope: Scope::global(),
            layout: Layout::default(),
            diagnostics: Diagnostics::new(),
            invalidated: false,
        }
    }

    /// Classify a grid and evaluate it.
    pub fn evaluate(self, grid: &Grid) -> Evaluation {
        let pixels = self.language.pixels(grid);
        self.evaluate_pixels(&pixels)
    }

    /// Evaluate classified pixels.
    pub fn evaluate_pixels(mut self, pixels: &PixelArray) -> Evaluation {
        self.scope = self.language.global_scope();

        let partitions = PixelReader::new(pixels.pixels()).subdivide();
        let queue = self.queue(partitions);
        log::debug!("Evaluating {} statement(s)", queue.len());

        self.run(queue);

        Evaluation {
            code: self.layout.finish(),
            invalidated: self.invalidated,
            diagnostics: self.diagnostics,
        }
    }

    fn queue<'a>(&mut self, partitions: Vec<Partition<'a>>) -> Vec<Entry<'a>> {
        let mut queue = Vec::with_capacity(partitions.len());
        let mut chain = 0;
        let mut partitions = partitions.into_iter().peekable();

        while let Some(partition) = partitions.next() {
            let Some(kind) = partition.statement else {
                let mut reader = partition.reader;
                reader.error(
                    ErrorKind::UnexpectedToken,
                    format!(
                        "{} pixel(s) before the first statement are not part of any statement",
                        reader.len()
                    ),
                    ErrorTarget::First,
                );
                self.collect(reader);
                continue;
            };

            chain += 1;
            let keyword_only = partition.reader.len() == 1;
            let continues = partitions
                .peek()
                .is_some_and(|next| next.statement == Some(kind));
            if kind.options().allows_chaining && keyword_only && continues {
                continue;
            }

            queue.push(Entry {
                kind,
                reader: partition.reader,
                chain,
            });
            chain = 0;
        }

        queue
    }

    fn run(&mut self, queue: Vec<Entry<'_>>) {
        let kinds: Vec<StatementKind> = queue.iter().map(|entry| entry.kind).collect();
        let mut pending: Option<PendingFunction> = None;

        for (i, entry) in queue.into_iter().enumerate() {
            let previous = i.checked_sub(1).map(|p| kinds[p]);
            let next = kinds.get(i + 1).copied();
            let Entry {
                kind,
                mut reader,
                chain,
            } = entry;

            self.settle(previous, Some(kind));

            let pending_function = pending.take();
            let declares_function = kind == StatementKind::BlockOpen && pending_function.is_some();

            if kind.options().closes_scope && !self.in_block() {
                log::warn!("{} closes a block that was never opened", kind);
                reader.error(
                    ErrorKind::Structural,
                    format!("{} has no open block to close", kind),
                    ErrorTarget::First,
                );
            }

            let depth = self.scope.depth();
            let context = Context::new(&self.scope)
                .previous(previous)
                .next(next)
                .chain(chain)
                .declares_function(declares_function);
            let generated = kind.generate(&mut reader, &context);

            let invalid = reader.is_invalidated();
            self.layout
                .emit(kind, previous, declares_function, depth, invalid, &generated.code);

            for (key, member) in generated.definitions {
                self.scope.define(key, member);
            }
            if let (true, Some(function)) = (declares_function, pending_function) {
                let (key, member) = function.resolve(&generated.parameters);
                self.scope.define(key, member);
            }
            pending = generated.pending_function;

            let owner = reader.pixels().first().map(|pixel| ScopeOwner {
                statement: owner_statement(kind, previous, declares_function),
                x: pixel.x,
                y: pixel.y,
            });
            let options = kind.options();
            if options.opens_scope {
                self.push(owner, false);
                for (key, member) in generated.parameters {
                    self.scope.define(key, member);
                }
            } else if options.opens_temporary_scope && takes_temporary_scope(kind, next) {
                self.push(owner, true);
            }

            self.collect(reader);
        }

        self.settle(kinds.last().copied(), None);
        self.close_remaining();
    }

    /// Pop what the previous statement left behind.
    ///
    /// A closing statement pops its block. A statement that opens nothing
    /// completes the body of every temporary scope above it, except that an
    /// `else` only completes the `if` it belongs to. A `foreach` or function
    /// declaration is completed by its block instead.
    fn settle(&mut self, previous: Option<StatementKind>, current: Option<StatementKind>) {
        let Some(previous) = previous else {
            return;
        };
        let options = previous.options();

        if options.closes_scope {
            self.pop_temporaries(usize::MAX);
            self.pop_block();
        }
        if options.opens_any_scope() {
            return;
        }

        match (current, options.closes_scope) {
            (Some(StatementKind::Else), true) => {}
            (Some(StatementKind::Else), false) => self.pop_temporaries(1),
            (Some(StatementKind::BlockOpen), false)
                if matches!(previous, StatementKind::ForEach | StatementKind::Declare) => {}
            _ => self.pop_temporaries(usize::MAX),
        }
    }

    fn push(&mut self, owner: Option<ScopeOwner>, temporary: bool) {
        let parent = std::mem::take(&mut self.scope);
        self.scope = if temporary {
            Scope::temporary(parent, owner)
        } else {
            Scope::child(parent, owner)
        };
        log::debug!(
            "Pushed {} scope, depth {}",
            if temporary { "temporary" } else { "block" },
            self.scope.depth()
        );
    }

    fn pop(&mut self) -> bool {
        let scope = std::mem::take(&mut self.scope);
        match scope.into_parent() {
            Ok(parent) => {
                self.scope = parent;
                log::debug!("Popped scope, depth {}", self.scope.depth());
                true
            }
            Err(root) => {
                self.scope = root;
                log::warn!("Scope underflow: only the global scope is left");
                false
            }
        }
    }

    fn pop_temporaries(&mut self, limit: usize) {
        let mut popped = 0;
        while popped < limit && self.scope.is_temporary() {
            self.pop();
            popped += 1;
        }
    }

    fn pop_block(&mut self) {
        if self.scope.is_global() {
            log::warn!("Scope underflow: no block to close");
            return;
        }
        self.pop();
    }

    /// Whether a block scope is open.
    fn in_block(&self) -> bool {
        self.scope
            .ancestors()
            .any(|scope| !scope.is_global() && !scope.is_temporary())
    }

    /// Report and discard every scope still open at the end.
    fn close_remaining(&mut self) {
        while !self.scope.is_global() {
            if !self.scope.is_temporary() {
                let (x, y) = self
                    .scope
                    .owner()
                    .map(|owner| (owner.x, owner.y))
                    .unwrap_or((0, 0));
                log::warn!("Block opened at ({}, {}) is never closed", x, y);
                let diagnostic = Diagnostic::new(
                    ErrorKind::Structural,
                    x,
                    y,
                    format!("Block opened at ({}, {}) is never closed", x, y),
                )
                .with_statement(Some(StatementKind::BlockOpen.key()));
                self.invalidated = true;
                self.diagnostics.push(diagnostic);
            }
            self.pop();
        }
    }

    fn collect(&mut self, reader: PixelReader<'_>) {
        self.invalidated |= reader.is_invalidated();
        self.diagnostics.merge(reader.into_diagnostics());
    }
}

/// The statement a new scope is attributed to.
fn owner_statement(
    kind: StatementKind,
    previous: Option<StatementKind>,
    declares_function: bool,
) -> StatementKind {
    if kind != StatementKind::BlockOpen {
        return kind;
    }
    if declares_function {
        return StatementKind::Declare;
    }
    match previous {
        Some(
            header @ (StatementKind::If
            | StatementKind::Else
            | StatementKind::ForEach
            | StatementKind::While),
        ) => header,
        _ => StatementKind::BlockOpen,
    }
}

/// Whether a header gets a single-statement scope for its body.
///
/// A following block replaces it, and so does the `if` of an `else if`.
fn takes_temporary_scope(kind: StatementKind, next: Option<StatementKind>) -> bool {
    match next {
        None | Some(StatementKind::BlockClose) => false,
        Some(next) if next.options().opens_scope => false,
        Some(StatementKind::If) => kind != StatementKind::Else,
        Some(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Colour;
    use pretty_assertions::assert_eq;

    fn keyword(language: &Language, key: &str) -> Colour {
        language
            .scheme()
            .get(key)
            .and_then(|property| property.first())
            .unwrap()
    }

    fn symbol(n: u8) -> Colour {
        Colour::rgb(n, 0x40, 0x80)
    }

    fn text(s: &str) -> Vec<Colour> {
        s.bytes().map(Colour::grey).collect()
    }

    /// One statement per row: a keyword followed by its pixels.
    fn row(language: &Language, key: &str, rest: Vec<Colour>) -> Vec<Colour> {
        let mut row = vec![keyword(language, key)];
        row.extend(rest);
        row
    }

    fn evaluate(language: &Language, rows: Vec<Vec<Colour>>) -> Evaluation {
        Evaluator::new(language).evaluate(&Grid::from_rows(rows))
    }

    #[test]
    fn test_declare_and_print() {
        let language = Language::default();
        let mut declare = vec![symbol(1)];
        declare.extend(text("Hi"));

        let evaluation = evaluate(
            &language,
            vec![
                row(&language, "variable.set", declare),
                row(&language, "print", vec![symbol(1)]),
            ],
        );

        assert!(!evaluation.is_invalidated(), "{:?}", evaluation.diagnostics());
        assert_eq!(evaluation.code(), "var _014080 = \"Hi\"\nprintln(_014080)\n");
    }

    #[test]
    fn test_unresolved_bare_call() {
        let language = Language::default();
        let evaluation = evaluate(
            &language,
            vec![row(&language, "function.call", vec![symbol(9)])],
        );

        assert!(evaluation.is_invalidated());
        assert_eq!(evaluation.code(), "// function.call: invalid statement\n");

        let diagnostics: Vec<_> = evaluation.diagnostics().iter().collect();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, ErrorKind::UnresolvedReference);
        assert_eq!((diagnostics[0].x, diagnostics[0].y), (1, 0));
        assert_eq!(diagnostics[0].statement, Some("function.call"));
    }

    #[test]
    fn test_if_else_chain() {
        let language = Language::default();
        let truth = keyword(&language, "bool.true");
        let falsity = keyword(&language, "bool.false");

        let evaluation = evaluate(
            &language,
            vec![
                row(&language, "if", vec![truth]),
                row(&language, "lambda.open", vec![]),
                row(&language, "print", text("a")),
                row(&language, "lambda.close", vec![]),
                row(&language, "else", vec![]),
                row(&language, "if", vec![falsity]),
                row(&language, "lambda.open", vec![]),
                row(&language, "print", text("b")),
                row(&language, "lambda.close", vec![]),
                row(&language, "else", vec![]),
                row(&language, "lambda.open", vec![]),
                row(&language, "print", text("c")),
                row(&language, "lambda.close", vec![]),
            ],
        );

        assert!(!evaluation.is_invalidated(), "{:?}", evaluation.diagnostics());
        insta::assert_snapshot!(evaluation.code().trim_end(), @r#"
if (true) {
    println("a")
} else if (false) {
    println("b")
} else {
    println("c")
}
"#);
    }

    #[test]
    fn test_function_declaration_and_call() {
        let language = Language::default();
        let function = symbol(0xF0);
        let parameter = symbol(0x0A);
        let mut call = vec![function];
        call.extend(text("5"));

        let evaluation = evaluate(
            &language,
            vec![
                row(&language, "variable.set", vec![function]),
                row(&language, "lambda.open", vec![parameter]),
                row(&language, "return", vec![parameter]),
                row(&language, "lambda.close", vec![]),
                row(&language, "function.call", call),
            ],
        );

        assert!(!evaluation.is_invalidated(), "{:?}", evaluation.diagnostics());
        insta::assert_snapshot!(evaluation.code().trim_end(), @r"
fun _F04080(_0A4080: Any?): Any? {
    return _0A4080
}

_F04080(5)
");
    }

    #[test]
    fn test_parameters_are_local_to_the_function() {
        let language = Language::default();
        let function = symbol(0xF0);

        let evaluation = evaluate(
            &language,
            vec![
                row(&language, "variable.set", vec![function]),
                row(&language, "lambda.open", vec![symbol(1), symbol(2)]),
                row(&language, "lambda.close", vec![]),
                row(&language, "function.call", vec![function, symbol(1)]),
            ],
        );

        assert!(evaluation.is_invalidated());
        // The parameter is out of scope after the block, and one argument is too few.
        assert_eq!(evaluation.diagnostics().count(ErrorKind::UnresolvedReference), 1);
        assert_eq!(evaluation.diagnostics().count(ErrorKind::ArityMismatch), 1);
    }

    #[test]
    fn test_single_statement_bodies_nest() {
        let language = Language::default();
        let truth = keyword(&language, "bool.true");

        let evaluation = evaluate(
            &language,
            vec![
                row(&language, "while", vec![truth]),
                row(&language, "if", vec![truth]),
                row(&language, "return", vec![]),
                row(&language, "return", vec![]),
                row(&language, "else", vec![]),
                row(&language, "print", text("x")),
                row(&language, "print", text("y")),
            ],
        );

        assert!(!evaluation.is_invalidated(), "{:?}", evaluation.diagnostics());
        insta::assert_snapshot!(evaluation.code().trim_end(), @r#"
while (true)
    if (true)
        break
    else
        println("x")
println("y")
"#);
    }

    #[test]
    fn test_foreach_with_parameter() {
        let language = Language::default();
        let list = symbol(0x11);
        let item = symbol(0x22);
        let mut declare = vec![list, keyword(&language, "stdlib.listOf")];
        declare.extend(text("1"));

        let evaluation = evaluate(
            &language,
            vec![
                row(&language, "variable.set", declare),
                row(&language, "foreach", vec![list]),
                row(&language, "lambda.open", vec![item]),
                row(&language, "print", vec![item]),
                row(&language, "lambda.close", vec![]),
            ],
        );

        assert!(!evaluation.is_invalidated(), "{:?}", evaluation.diagnostics());
        insta::assert_snapshot!(evaluation.code().trim_end(), @r"
var _114080 = listOf(1)

_114080.forEach { _224080 ->
    println(_224080)
}
");
    }

    #[test]
    fn test_block_after_header_body_stays_nested() {
        let language = Language::default();
        let list = symbol(0x11);
        let item = symbol(0x22);
        let mut declare = vec![list, keyword(&language, "stdlib.listOf")];
        declare.extend(text("1"));

        let evaluation = evaluate(
            &language,
            vec![
                row(&language, "variable.set", declare),
                row(&language, "if", vec![keyword(&language, "bool.true")]),
                row(&language, "foreach", vec![list]),
                row(&language, "lambda.open", vec![item]),
                row(&language, "print", vec![item]),
                row(&language, "lambda.close", vec![]),
                row(&language, "print", vec![list]),
            ],
        );

        assert!(!evaluation.is_invalidated(), "{:?}", evaluation.diagnostics());
        insta::assert_snapshot!(evaluation.code().trim_end(), @r"
var _114080 = listOf(1)

if (true)
    _114080.forEach { _224080 ->
        println(_224080)
    }

println(_114080)
");
    }

    #[test]
    fn test_function_declared_in_loop_body() {
        let language = Language::default();
        let function = symbol(0xF0);

        let evaluation = evaluate(
            &language,
            vec![
                row(&language, "while", vec![keyword(&language, "bool.true")]),
                row(&language, "variable.set", vec![function]),
                row(&language, "lambda.open", vec![]),
                row(&language, "return", vec![]),
                row(&language, "lambda.close", vec![]),
            ],
        );

        assert!(!evaluation.is_invalidated(), "{:?}", evaluation.diagnostics());
        insta::assert_snapshot!(evaluation.code().trim_end(), @r"
while (true)
    fun _F04080(): Any? {
        return
    }
");
    }

    #[test]
    fn test_function_declared_in_loop_body_is_local() {
        let language = Language::default();
        let function = symbol(0xF0);

        let evaluation = evaluate(
            &language,
            vec![
                row(&language, "while", vec![keyword(&language, "bool.true")]),
                row(&language, "variable.set", vec![function]),
                row(&language, "lambda.open", vec![]),
                row(&language, "lambda.close", vec![]),
                row(&language, "function.call", vec![function]),
            ],
        );

        assert!(evaluation.is_invalidated());
        assert_eq!(evaluation.diagnostics().count(ErrorKind::UnresolvedReference), 1);
    }

    #[test]
    fn test_struct_definition_and_init() {
        let language = Language::default();
        let point = symbol(0x50);
        let mut init = vec![symbol(0x51), point];
        init.extend(text("1"));
        init.extend([keyword(&language, "bool.true")]);

        let evaluation = evaluate(
            &language,
            vec![
                row(&language, "struct", vec![point, symbol(0x0A), symbol(0x0B)]),
                row(&language, "variable.set", init),
            ],
        );

        assert!(!evaluation.is_invalidated(), "{:?}", evaluation.diagnostics());
        insta::assert_snapshot!(evaluation.code().trim_end(), @r"
class _504080(var _0A4080: Any?, var _0B4080: Any?)

var _514080 = _504080(1, true)
");
    }

    #[test]
    fn test_unclosed_block() {
        let language = Language::default();
        let evaluation = evaluate(
            &language,
            vec![
                row(&language, "while", vec![]),
                row(&language, "lambda.open", vec![]),
                row(&language, "print", vec![]),
            ],
        );

        assert!(evaluation.is_invalidated());
        let diagnostic = evaluation.diagnostics().iter().next().unwrap();
        assert_eq!(diagnostic.kind, ErrorKind::Structural);
        assert_eq!((diagnostic.x, diagnostic.y), (0, 1));
    }

    #[test]
    fn test_stray_close() {
        let language = Language::default();
        let evaluation = evaluate(
            &language,
            vec![
                row(&language, "print", vec![]),
                row(&language, "lambda.close", vec![]),
            ],
        );

        assert!(evaluation.is_invalidated());
        assert_eq!(evaluation.diagnostics().count(ErrorKind::Structural), 1);
        assert_eq!(
            evaluation.code(),
            "println()\n// lambda.close: invalid statement\n"
        );
    }

    #[test]
    fn test_orphan_pixels() {
        let language = Language::default();
        let mut first = vec![symbol(1)];
        first.extend(row(&language, "print", vec![]));

        let evaluation = evaluate(&language, vec![first]);
        assert!(evaluation.is_invalidated());
        assert_eq!(evaluation.code(), "println()\n");
        assert_eq!(
            evaluation.diagnostics().count(ErrorKind::UnexpectedToken),
            1
        );
    }

    #[test]
    fn test_long_return_chain() {
        let language = Language::default();
        let evaluation = evaluate(
            &language,
            vec![
                row(&language, "while", vec![]),
                row(&language, "lambda.open", vec![]),
                row(&language, "return", vec![]),
                row(&language, "return", vec![]),
                row(&language, "return", vec![]),
                row(&language, "lambda.close", vec![]),
            ],
        );

        assert!(evaluation.is_invalidated());
        assert!(evaluation.code().contains("// return: invalid statement"));
    }

    #[test]
    fn test_empty_program() {
        let language = Language::default();
        let evaluation = evaluate(&language, vec![vec![Colour::WHITE; 4]]);
        assert!(!evaluation.is_invalidated());
        assert_eq!(evaluation.code(), "");
    }

    #[test]
    fn test_diagnostics_serialize() {
        let language = Language::default();
        let evaluation = evaluate(
            &language,
            vec![row(&language, "function.call", vec![symbol(9)])],
        );

        let json = serde_json::to_value(&evaluation).unwrap();
        assert_eq!(json["invalidated"], true);
        assert_eq!(json["diagnostics"][0]["kind"], "unresolved-reference");
        assert_eq!(json["diagnostics"][0]["x"], 1);
    }
}
