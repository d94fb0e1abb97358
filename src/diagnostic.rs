//! Diagnostics raised while evaluating a pixel program.
//!
//! Every diagnostic invalidates the evaluation: there is no warning level in
//! the core pipeline. Coordinates are pixel (x, y) positions in the source
//! image, and the token index counts pixels from the start of the owning
//! statement (the keyword pixel is token 0).

use std::fmt;

use serde::Serialize;

/// The class of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    /// A pixel used as a value or callee has no binding in scope.
    UnresolvedReference,
    /// An invocation's argument count satisfies no overload.
    ArityMismatch,
    /// A symbol is used where a different kind is required.
    KindMismatch,
    /// A required pixel is absent.
    MissingToken,
    /// A pixel appears where the grammar allows none.
    UnexpectedToken,
    /// Unbalanced or misplaced scopes.
    Structural,
}

impl ErrorKind {
    /// Machine-readable diagnostic code.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::UnresolvedReference => "pxl::unresolved-reference",
            ErrorKind::ArityMismatch => "pxl::arity-mismatch",
            ErrorKind::KindMismatch => "pxl::kind-mismatch",
            ErrorKind::MissingToken => "pxl::missing-token",
            ErrorKind::UnexpectedToken => "pxl::unexpected-token",
            ErrorKind::Structural => "pxl::structural",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Correctness of one syntax token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Correct,
    Incorrect,
    Unchecked,
}

impl Mark {
    fn symbol(self) -> char {
        match self {
            Mark::Correct => '✓',
            Mark::Incorrect => '✗',
            Mark::Unchecked => ' ',
        }
    }
}

/// A statement's syntax template with per-token correctness marks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Syntax {
    tokens: Vec<&'static str>,
    marks: Vec<Mark>,
}

impl Syntax {
    /// Create a template with every token unchecked.
    pub fn new(tokens: &[&'static str]) -> Self {
        Self {
            tokens: tokens.to_vec(),
            marks: vec![Mark::Unchecked; tokens.len()],
        }
    }

    /// Mark a token. Out-of-range indices are ignored.
    pub fn mark(&mut self, index: usize, mark: Mark) -> &mut Self {
        if let Some(slot) = self.marks.get_mut(index) {
            *slot = mark;
        }
        self
    }

    /// Mark tokens `0..index` correct and `index` incorrect.
    pub fn failed_at(mut self, index: usize) -> Self {
        for i in 0..index.min(self.marks.len()) {
            self.marks[i] = Mark::Correct;
        }
        self.mark(index, Mark::Incorrect);
        self
    }

    /// The template line, tokens separated by spaces.
    pub fn template(&self) -> String {
        self.tokens.join(" ")
    }

    /// The mark line, each mark aligned under the first character of its token.
    pub fn mark_line(&self) -> String {
        let mut line = String::new();
        for (token, mark) in self.tokens.iter().zip(&self.marks) {
            if !line.is_empty() {
                line.push(' ');
            }
            line.push(mark.symbol());
            let width = token.chars().count();
            line.extend(std::iter::repeat(' ').take(width.saturating_sub(1)));
        }
        line.trim_end().to_string()
    }
}

impl fmt::Display for Syntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.template(), self.mark_line())
    }
}

/// A single located diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: ErrorKind,
    /// Pixel column of the offending token.
    pub x: u32,
    /// Pixel row of the offending token.
    pub y: u32,
    /// 0-based token index within the owning statement.
    pub token_index: usize,
    /// Scheme key of the owning statement, if any.
    pub statement: Option<&'static str>,
    /// Human-readable message.
    pub message: String,
    /// Rendered syntax template and mark line.
    pub syntax: Option<String>,
}

impl Diagnostic {
    pub fn new(kind: ErrorKind, x: u32, y: u32, message: impl Into<String>) -> Self {
        Self {
            kind,
            x,
            y,
            token_index: 0,
            statement: None,
            message: message.into(),
            syntax: None,
        }
    }

    pub fn with_statement(mut self, statement: Option<&'static str>) -> Self {
        self.statement = statement;
        self
    }

    pub fn with_token_index(mut self, index: usize) -> Self {
        self.token_index = index;
        self
    }

    pub fn with_syntax(mut self, syntax: &Syntax) -> Self {
        self.syntax = Some(syntax.to_string());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error[{}] at ({}, {})", self.kind, self.x, self.y)?;
        if let Some(statement) = self.statement {
            write!(f, " in {} (token {})", statement, self.token_index)?;
        }
        write!(f, ": {}", self.message)?;
        if let Some(syntax) = &self.syntax {
            for line in syntax.lines() {
                write!(f, "\n    {}", line)?;
            }
        }
        Ok(())
    }
}

/// Collects diagnostics in the order they were raised.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    diagnostics: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Merge another collection into this one.
    pub fn merge(&mut self, other: Diagnostics) {
        self.diagnostics.extend(other.diagnostics);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    /// Count diagnostics of one kind.
    pub fn count(&self, kind: ErrorKind) -> usize {
        self.diagnostics.iter().filter(|d| d.kind == kind).count()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}
