//! Classified pixels, the tokens of the pixel language.

use std::fmt;

use crate::grid::Grid;
use crate::statement::{StatementCatalog, StatementKind};

use super::scheme::{ColourScheme, BOOL_FALSE, BOOL_TRUE, WHITESPACE};
use super::{Colour, Operator};

/// The classification of a single pixel.
///
/// Computed once when the pixel is read from the grid, in precedence order:
/// whitespace, boolean, dot, other operators, statements, library symbols,
/// grey characters, and finally plain symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PixelKind {
    Whitespace,
    Boolean(bool),
    Operator(Operator),
    Statement(StatementKind),
    /// A library symbol, by its full scheme key (e.g. `stdlib.sqrt`).
    Library(String),
    /// A grey pixel; the channel value is the character code.
    Character(u8),
    /// Any other colour: a user-defined name.
    Symbol,
}

/// A grid cell acting as a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pixel {
    pub colour: Colour,
    pub x: u32,
    pub y: u32,
    kind: PixelKind,
}

impl Pixel {
    /// Classify a colour at a coordinate.
    pub fn classify(
        colour: Colour,
        x: u32,
        y: u32,
        scheme: &ColourScheme,
        catalog: &StatementCatalog,
    ) -> Self {
        let kind = classify(colour, scheme, catalog);
        Self { colour, x, y, kind }
    }

    /// Build a pixel with a known classification.
    pub fn with_kind(colour: Colour, x: u32, y: u32, kind: PixelKind) -> Self {
        Self { colour, x, y, kind }
    }

    pub fn kind(&self) -> &PixelKind {
        &self.kind
    }

    pub fn is_whitespace(&self) -> bool {
        self.kind == PixelKind::Whitespace
    }

    /// The boolean literal this pixel encodes, if any.
    pub fn boolean(&self) -> Option<bool> {
        match self.kind {
            PixelKind::Boolean(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_boolean(&self) -> bool {
        self.boolean().is_some()
    }

    pub fn is_dot(&self) -> bool {
        self.kind == PixelKind::Operator(Operator::Dot)
    }

    /// The operator this pixel encodes, excluding the dot operator.
    pub fn operator(&self) -> Option<Operator> {
        match self.kind {
            PixelKind::Operator(op) if !op.is_dot() => Some(op),
            _ => None,
        }
    }

    pub fn is_operator(&self) -> bool {
        self.operator().is_some()
    }

    pub fn statement(&self) -> Option<StatementKind> {
        match self.kind {
            PixelKind::Statement(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn is_statement(&self) -> bool {
        self.statement().is_some()
    }

    /// The library scheme key, if this pixel is a library symbol.
    pub fn library(&self) -> Option<&str> {
        match &self.kind {
            PixelKind::Library(key) => Some(key),
            _ => None,
        }
    }

    /// The character code of a grey pixel.
    pub fn character(&self) -> Option<u8> {
        match self.kind {
            PixelKind::Character(code) => Some(code),
            _ => None,
        }
    }

    pub fn is_character(&self) -> bool {
        self.character().is_some()
    }

    /// Whether this is a grey pixel whose code is an ASCII digit.
    pub fn is_numeric_character(&self) -> bool {
        self.character().is_some_and(|c| c.is_ascii_digit())
    }

    /// Whether this pixel can name a user-defined symbol.
    pub fn is_symbol(&self) -> bool {
        self.kind == PixelKind::Symbol
    }

    /// Symbol table identity: two pixels with the same colour are the same symbol.
    pub fn hex(&self) -> String {
        self.colour.hex()
    }

    /// Identifier used for this pixel in generated code.
    pub fn identifier(&self) -> String {
        format!("_{}", self.hex())
    }
}

impl fmt::Display for Pixel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at ({}, {})", self.colour, self.x, self.y)
    }
}

fn classify(colour: Colour, scheme: &ColourScheme, catalog: &StatementCatalog) -> PixelKind {
    if colour.is_transparent() || colour == Colour::WHITE || scheme.matches(WHITESPACE, colour) {
        return PixelKind::Whitespace;
    }
    if scheme.matches(BOOL_TRUE, colour) {
        return PixelKind::Boolean(true);
    }
    if scheme.matches(BOOL_FALSE, colour) {
        return PixelKind::Boolean(false);
    }
    if scheme.matches(Operator::Dot.key(), colour) {
        return PixelKind::Operator(Operator::Dot);
    }
    if let Some(op) = Operator::ALL
        .iter()
        .skip(1)
        .find(|op| scheme.matches(op.key(), colour))
    {
        return PixelKind::Operator(*op);
    }
    if let Some(kind) = catalog.by_colour(colour, scheme) {
        return PixelKind::Statement(kind);
    }
    if let Some((key, _)) = scheme
        .library_symbols()
        .find(|(_, property)| property.matches(colour))
    {
        return PixelKind::Library(key.to_string());
    }
    if let Some(code) = colour.grayscale() {
        return PixelKind::Character(code);
    }
    PixelKind::Symbol
}

/// An immutable, whitespace-filtered, row-major sequence of pixels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PixelArray {
    pixels: Vec<Pixel>,
}

impl PixelArray {
    /// Build an array from pixels, dropping whitespace.
    pub fn new(pixels: impl IntoIterator<Item = Pixel>) -> Self {
        Self {
            pixels: pixels.into_iter().filter(|p| !p.is_whitespace()).collect(),
        }
    }

    /// Classify every cell of a grid, row by row.
    pub fn from_grid(grid: &Grid, scheme: &ColourScheme, catalog: &StatementCatalog) -> Self {
        Self::new(
            grid.cells()
                .map(|(x, y, colour)| Pixel::classify(colour, x, y, scheme, catalog)),
        )
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
}

/// Pixels joined by dot operators (the dots themselves are not stored).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelSequence {
    pixels: Vec<Pixel>,
}

impl PixelSequence {
    /// Start a sequence from its first pixel.
    pub fn new(first: Pixel) -> Self {
        Self {
            pixels: vec![first],
        }
    }

    pub fn push(&mut self, pixel: Pixel) {
        self.pixels.push(pixel);
    }

    pub fn first(&self) -> &Pixel {
        &self.pixels[0]
    }

    pub fn last(&self) -> &Pixel {
        &self.pixels[self.pixels.len() - 1]
    }

    /// A member-access chain (more than one pixel).
    pub fn is_nested(&self) -> bool {
        self.pixels.len() > 1
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pixel> {
        self.pixels.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;

    fn kind_of(colour: Colour) -> PixelKind {
        let language = Language::default();
        Pixel::classify(colour, 0, 0, language.scheme(), language.catalog())
            .kind()
            .clone()
    }

    #[test]
    fn test_whitespace_takes_priority() {
        assert_eq!(kind_of(Colour::WHITE), PixelKind::Whitespace);
        assert_eq!(kind_of(Colour::TRANSPARENT), PixelKind::Whitespace);
        assert_eq!(kind_of(Colour::new(0x99, 0x00, 0xFF, 0)), PixelKind::Whitespace);
    }

    #[test]
    fn test_classification() {
        assert_eq!(kind_of(Colour::rgb(0x66, 0xFF, 0x66)), PixelKind::Boolean(true));
        assert_eq!(kind_of(Colour::rgb(0x66, 0x66, 0xCC)), PixelKind::Operator(Operator::Dot));
        assert_eq!(kind_of(Colour::rgb(0xFF, 0x33, 0x00)), PixelKind::Operator(Operator::Plus));
        assert_eq!(
            kind_of(Colour::rgb(0x99, 0x00, 0xFF)),
            PixelKind::Statement(StatementKind::Declare)
        );
        assert_eq!(
            kind_of(Colour::rgb(0xCC, 0x66, 0xFF)),
            PixelKind::Library("stdlib.sqrt".to_string())
        );
        assert_eq!(kind_of(Colour::grey(b'7')), PixelKind::Character(b'7'));
        assert_eq!(kind_of(Colour::rgb(1, 2, 3)), PixelKind::Symbol);
    }

    #[test]
    fn test_numeric_character() {
        let digit = Pixel::with_kind(Colour::grey(b'4'), 0, 0, PixelKind::Character(b'4'));
        let letter = Pixel::with_kind(Colour::grey(b'a'), 0, 0, PixelKind::Character(b'a'));
        assert!(digit.is_numeric_character());
        assert!(letter.is_character());
        assert!(!letter.is_numeric_character());
    }

    #[test]
    fn test_dot_is_not_an_operator() {
        let dot = Pixel::with_kind(Colour::rgb(1, 1, 2), 0, 0, PixelKind::Operator(Operator::Dot));
        assert!(dot.is_dot());
        assert!(!dot.is_operator());
    }

    #[test]
    fn test_sequence_nesting() {
        let a = Pixel::with_kind(Colour::rgb(1, 0, 0), 0, 0, PixelKind::Symbol);
        let b = Pixel::with_kind(Colour::rgb(2, 0, 0), 1, 0, PixelKind::Symbol);

        let mut sequence = PixelSequence::new(a);
        assert!(!sequence.is_nested());

        sequence.push(b.clone());
        assert!(sequence.is_nested());
        assert_eq!(sequence.last(), &b);
    }

    #[test]
    fn test_array_filters_whitespace() {
        let array = PixelArray::new([
            Pixel::with_kind(Colour::WHITE, 0, 0, PixelKind::Whitespace),
            Pixel::with_kind(Colour::rgb(1, 0, 0), 1, 0, PixelKind::Symbol),
        ]);
        assert_eq!(array.len(), 1);
        assert_eq!(array.pixels()[0].x, 1);
    }

    #[test]
    fn test_identifier() {
        let pixel = Pixel::with_kind(Colour::rgb(0xAB, 0, 0x10), 3, 4, PixelKind::Symbol);
        assert_eq!(pixel.identifier(), "_AB0010");
        assert_eq!(pixel.to_string(), "#AB0010 at (3, 4)");
    }
}
