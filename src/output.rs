//! Terminal output for the pxl CLI.
//!
//! Cargo-style status lines with right-aligned coloured verbs go to stderr.
//! Stdout carries generated code and JSON only.

use std::io::{self, IsTerminal, Write};
use std::path::Path;

use crate::diagnostic::Diagnostic;

/// ANSI escape codes.
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

/// Width for right-aligned verb column.
const VERB_WIDTH: usize = 12;

/// Terminal-aware status printer.
///
/// Prints Cargo-style status lines to stderr with optional ANSI colours.
/// Colour is enabled when stderr is a terminal.
pub struct Printer {
    color: bool,
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}

impl Printer {
    pub fn new() -> Self {
        Self {
            color: io::stderr().is_terminal(),
        }
    }

    /// Print a status line with a green bold verb.
    /// e.g. "   Compiling hello.png (12x3)"
    pub fn status(&self, verb: &str, message: &str) {
        self.print_line(GREEN, verb, message);
    }

    /// Print a success/completion line with a green bold verb.
    pub fn success(&self, verb: &str, message: &str) {
        self.print_line(GREEN, verb, message);
    }

    /// Print an informational line with a cyan bold verb.
    pub fn info(&self, verb: &str, message: &str) {
        self.print_line(CYAN, verb, message);
    }

    /// Print a warning line with a yellow bold verb.
    pub fn warning(&self, verb: &str, message: &str) {
        self.print_line(YELLOW, verb, message);
    }

    /// Print an error line with a red bold verb.
    pub fn error(&self, verb: &str, message: &str) {
        self.print_line(RED, verb, message);
    }

    /// Print one compiler diagnostic with its source location.
    ///
    /// ```text
    /// error[pxl::unresolved-reference]: hello.png:4:0: Unresolved reference #120010 at (4, 0)
    ///     print <?value>
    ///     ✓     ✗
    /// ```
    pub fn diagnostic(&self, path: &Path, diagnostic: &Diagnostic) {
        let mut stderr = io::stderr().lock();
        let _ = writeln!(stderr, "{}", self.format_diagnostic(path, diagnostic));
    }

    fn format_diagnostic(&self, path: &Path, diagnostic: &Diagnostic) -> String {
        let label = self.severity(&format!("error[{}]", diagnostic.kind), true);
        let location = self.cyan(&format!(
            "{}:{}:{}",
            display_path(path),
            diagnostic.x,
            diagnostic.y
        ));

        let mut line = format!("{}: {}: {}", label, location, diagnostic.message);
        if let Some(statement) = diagnostic.statement {
            line.push_str(&self.dim(&format!(
                " ({} token {})",
                statement, diagnostic.token_index
            )));
        }
        if let Some(syntax) = &diagnostic.syntax {
            for syntax_line in syntax.lines() {
                line.push_str("\n    ");
                line.push_str(&self.dim(syntax_line));
            }
        }
        line
    }

    /// Format a string as dim/grey.
    pub fn dim(&self, text: &str) -> String {
        if self.color {
            format!("{DIM}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    /// Format a string as cyan (for paths, info).
    pub fn cyan(&self, text: &str) -> String {
        if self.color {
            format!("{CYAN}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    /// Format a diagnostic severity label with colour.
    pub fn severity(&self, label: &str, is_error: bool) -> String {
        let color = if is_error { RED } else { YELLOW };
        if self.color {
            format!("{BOLD}{color}{label}{RESET}")
        } else {
            label.to_string()
        }
    }

    #[cfg(test)]
    fn plain() -> Self {
        Self { color: false }
    }

    fn print_line(&self, color: &str, verb: &str, message: &str) {
        let mut stderr = io::stderr().lock();
        if self.color {
            let _ = writeln!(
                stderr,
                "{BOLD}{color}{verb:>VERB_WIDTH$}{RESET} {message}"
            );
        } else {
            let _ = writeln!(stderr, "{verb:>VERB_WIDTH$} {message}");
        }
    }
}

/// Pluralize a count: `plural(1, "image", "images")` → "1 image".
pub fn plural(n: usize, singular: &str, pluralized: &str) -> String {
    if n == 1 {
        format!("{} {}", n, singular)
    } else {
        format!("{} {}", n, pluralized)
    }
}

/// Return a relative display path when possible, absolute otherwise.
pub fn display_path(path: &Path) -> String {
    if let Ok(cwd) = std::env::current_dir() {
        if let Ok(relative) = path.strip_prefix(&cwd) {
            let s = relative.display().to_string();
            if s.is_empty() {
                return ".".to_string();
            }
            return s;
        }
    }
    path.display().to_string()
}
