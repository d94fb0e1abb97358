//! The pixel reader: a cursor over whitespace-filtered pixels.
//!
//! Readers borrow their pixels, so slicing is cheap and never copies. A
//! reader collects the diagnostics raised while it is being consumed; once
//! any diagnostic is recorded the reader is invalidated for good.
//!
//! # Usage
//!
//! ```ignore
//! let mut reader = PixelReader::new(array.pixels());
//! for partition in reader.subdivide() {
//!     println!("{:?}: {} pixel(s)", partition.statement, partition.reader.len());
//! }
//! ```

mod partition;

pub use partition::Partition;

use crate::diagnostic::{Diagnostic, Diagnostics, ErrorKind, Syntax};
use crate::statement::StatementKind;
use crate::types::{Pixel, PixelSequence};

/// Which pixel a diagnostic points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorTarget {
    /// The pixel most recently consumed (or the next one, if none was).
    Cursor,
    /// The first pixel of the reader.
    First,
    /// The pixel at an index of the reader.
    At(usize),
}

/// A cursor over a slice of pixels.
#[derive(Debug, Clone)]
pub struct PixelReader<'a> {
    pixels: &'a [Pixel],
    /// Index of the next pixel `next` returns.
    index: usize,
    /// Token index of `pixels[0]` within the owning statement.
    origin: usize,
    /// Coordinate reported when there is no pixel to point at.
    anchor: (u32, u32),
    statement: Option<StatementKind>,
    invalidated: bool,
    diagnostics: Diagnostics,
}

impl<'a> PixelReader<'a> {
    /// Create a reader over pixels.
    pub fn new(pixels: &'a [Pixel]) -> Self {
        Self {
            pixels,
            index: 0,
            origin: 0,
            anchor: pixels.first().map(|p| (p.x, p.y)).unwrap_or((0, 0)),
            statement: None,
            invalidated: false,
            diagnostics: Diagnostics::new(),
        }
    }

    /// Create a reader owned by a statement.
    pub fn for_statement(pixels: &'a [Pixel], statement: Option<StatementKind>) -> Self {
        Self {
            statement,
            ..Self::new(pixels)
        }
    }

    /// Consume and return the next pixel.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<&'a Pixel> {
        let pixel = self.pixels.get(self.index)?;
        self.index += 1;
        Some(pixel)
    }

    /// The next pixel, without consuming it.
    pub fn peek(&self) -> Option<&'a Pixel> {
        self.pixels.get(self.index)
    }

    /// Cursor position.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Move the cursor, e.g. to roll back a lookahead. Clamped to the end.
    pub fn set_index(&mut self, index: usize) {
        self.index = index.min(self.pixels.len());
    }

    /// Move the cursor past the last pixel.
    pub fn skip_to_end(&mut self) {
        self.index = self.pixels.len();
    }

    pub fn has_next(&self) -> bool {
        self.index < self.pixels.len()
    }

    /// All pixels of the reader, consumed or not.
    pub fn pixels(&self) -> &'a [Pixel] {
        self.pixels
    }

    /// Pixels not yet consumed.
    pub fn remaining(&self) -> &'a [Pixel] {
        &self.pixels[self.index..]
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// The statement owning this reader.
    pub fn statement(&self) -> Option<StatementKind> {
        self.statement
    }

    /// Consume a pixel and any `.`-joined pixels that follow it.
    ///
    /// A non-dot pixel after the sequence is left unconsumed. Input ending
    /// right after a dot is reported and the sequence read so far returned.
    pub fn next_sequence(&mut self) -> Option<PixelSequence> {
        let first = self.next()?;
        let mut sequence = PixelSequence::new(first.clone());

        while self.peek().is_some_and(Pixel::is_dot) {
            self.next();
            match self.next() {
                Some(member) => sequence.push(member.clone()),
                None => {
                    self.error(
                        ErrorKind::MissingToken,
                        "Expected a member after the dot operator",
                        ErrorTarget::Cursor,
                    );
                    break;
                }
            }
        }

        Some(sequence)
    }

    /// An independent reader over `start..end`.
    ///
    /// The slice keeps this reader's statement and token numbering. Its
    /// diagnostics are returned to this reader with [`absorb`](Self::absorb).
    pub fn sliced(&self, start: usize, end: usize) -> PixelReader<'a> {
        let end = end.min(self.pixels.len());
        let start = start.min(end);
        let anchor = start
            .checked_sub(1)
            .and_then(|i| self.pixels.get(i))
            .or_else(|| self.pixels.get(start))
            .map(|p| (p.x, p.y))
            .unwrap_or(self.anchor);

        PixelReader {
            pixels: &self.pixels[start..end],
            index: 0,
            origin: self.origin + start,
            anchor,
            statement: self.statement,
            invalidated: false,
            diagnostics: Diagnostics::new(),
        }
    }

    /// Take over the diagnostics (and invalidation) of a slice.
    pub fn absorb(&mut self, other: PixelReader<'_>) {
        self.invalidated |= other.invalidated;
        self.diagnostics.merge(other.diagnostics);
    }

    /// Split into one partition per statement pixel.
    pub fn subdivide(&self) -> Vec<Partition<'a>> {
        partition::subdivide(self.pixels)
    }

    /// Record a diagnostic and invalidate the reader.
    pub fn error(&mut self, kind: ErrorKind, message: impl Into<String>, target: ErrorTarget) {
        let diagnostic = self.locate(kind, message.into(), target);
        self.record(diagnostic);
    }

    /// Record a diagnostic carrying a marked syntax template.
    pub fn error_with_syntax(
        &mut self,
        kind: ErrorKind,
        message: impl Into<String>,
        target: ErrorTarget,
        syntax: &Syntax,
    ) {
        let diagnostic = self.locate(kind, message.into(), target).with_syntax(syntax);
        self.record(diagnostic);
    }

    fn record(&mut self, diagnostic: Diagnostic) {
        log::debug!("Invalidated: {}", diagnostic);
        self.invalidated = true;
        self.diagnostics.push(diagnostic);
    }

    fn locate(&self, kind: ErrorKind, message: String, target: ErrorTarget) -> Diagnostic {
        let position = match target {
            ErrorTarget::First => 0,
            ErrorTarget::Cursor => self.index.saturating_sub(1),
            ErrorTarget::At(index) => index,
        };
        let (x, y) = self
            .pixels
            .get(position)
            .map(|p| (p.x, p.y))
            .unwrap_or(self.anchor);

        Diagnostic::new(kind, x, y, message)
            .with_statement(self.statement.map(StatementKind::key))
            .with_token_index(self.origin + position)
    }

    /// Whether any diagnostic was recorded. Never resets.
    pub fn is_invalidated(&self) -> bool {
        self.invalidated
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }
}
