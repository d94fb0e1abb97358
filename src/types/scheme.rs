//! Colour schemes: the dictionary from symbolic names to pixel colours.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::parser::parse_scheme;
use crate::statement::StatementKind;

use super::{Colour, Operator};

/// Scheme key for whitespace pixels.
pub const WHITESPACE: &str = "whitespace";
/// Scheme key for the `true` literal.
pub const BOOL_TRUE: &str = "bool.true";
/// Scheme key for the `false` literal.
pub const BOOL_FALSE: &str = "bool.false";
/// Namespace prefix of the standard library.
pub const STDLIB_PREFIX: &str = "stdlib";

/// The bundled scheme. Any key a user scheme omits falls back to this.
pub const DEFAULT_SCHEME: &str = "\
# Whitespace (transparent and pure white pixels are always whitespace)
whitespace=FFFFFF

# Statements
variable.set=9900FF
function.call=33CC33
if=FFFF00
else=FF9900
foreach=00FF00
while=009900
return=FF00FF
lambda.open=0099FF
lambda.close=0066CC
print=FF0066
struct=996633

# Booleans
bool.true=66FF66
bool.false=FF6666

# Operators
op.dot=6666CC
op.plus=FF3300
op.minus=CC3300
op.times=993300
op.divide=663300
op.modulo=330000
op.equality=0000FF
op.inequality=0000CC
op.greater=000099
op.greater_or_equal=000066
op.less=3333FF
op.less_or_equal=3333CC
op.and=99CCFF
op.or=6699CC

# Standard library
stdlib.listOf=CC99FF
stdlib.sqrt=CC66FF
stdlib.random=CC33FF
stdlib.readLine=CC00FF
stdlib.size=9966FF
";

/// A set of colours that all mean the same symbol.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColoursProperty {
    /// Normalized hex identities (uppercase, no `#`), in declaration order.
    hexes: Vec<String>,
}

impl ColoursProperty {
    /// Create a property from colours.
    pub fn new(colours: impl IntoIterator<Item = Colour>) -> Self {
        let mut property = Self::default();
        for colour in colours {
            property.push(colour);
        }
        property
    }

    /// Create a property holding a single colour.
    pub fn single(colour: Colour) -> Self {
        Self::new([colour])
    }

    /// Parse a comma-separated list of hex colours.
    pub fn parse(value: &str) -> Result<Self> {
        let colours = value
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Colour::from_hex)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(colours))
    }

    fn push(&mut self, colour: Colour) {
        let hex = colour.hex();
        if !self.hexes.contains(&hex) {
            self.hexes.push(hex);
        }
    }

    /// Whether `colour` is one of the candidates.
    pub fn matches(&self, colour: Colour) -> bool {
        let hex = colour.hex();
        self.hexes.iter().any(|h| *h == hex)
    }

    /// Hex identities of all candidates.
    pub fn hexes(&self) -> &[String] {
        &self.hexes
    }

    /// The first candidate colour.
    pub fn first(&self) -> Option<Colour> {
        self.hexes.first().and_then(|h| Colour::from_hex(h).ok())
    }

    pub fn is_empty(&self) -> bool {
        self.hexes.is_empty()
    }
}

/// Named colour properties defining the visual grammar.
///
/// Fixed keys cover whitespace, statements, booleans and operators. Every
/// other key is a library symbol namespaced as `<prefix>.<name>`.
#[derive(Debug, Clone, Default)]
pub struct ColourScheme {
    entries: BTreeMap<String, ColoursProperty>,
}

impl ColourScheme {
    /// Create an empty scheme.
    pub fn new() -> Self {
        Self::default()
    }

    /// The bundled default scheme.
    pub fn default_scheme() -> Self {
        parse_scheme(DEFAULT_SCHEME).unwrap_or_default()
    }

    /// Parse a user scheme, falling back to the bundled defaults per key.
    pub fn from_source(source: &str) -> Result<Self> {
        let mut scheme = parse_scheme(source)?;
        scheme.merge_from(&Self::default_scheme());
        Ok(scheme)
    }

    /// Get the property for a key.
    pub fn get(&self, key: &str) -> Option<&ColoursProperty> {
        self.entries.get(key)
    }

    /// Set (or replace) the property for a key.
    pub fn set(&mut self, key: impl Into<String>, property: ColoursProperty) -> &mut Self {
        self.entries.insert(key.into(), property);
        self
    }

    /// Whether the property for `key` matches `colour`.
    pub fn matches(&self, key: &str, colour: Colour) -> bool {
        self.get(key).is_some_and(|p| p.matches(colour))
    }

    /// Copy every entry this scheme lacks from `other`.
    pub fn merge_from(&mut self, other: &ColourScheme) {
        for (key, property) in &other.entries {
            self.entries
                .entry(key.clone())
                .or_insert_with(|| property.clone());
        }
    }

    /// Entries under `prefix.`, with the prefix stripped.
    pub fn subsection(&self, prefix: &str) -> Vec<(&str, &ColoursProperty)> {
        let namespace = format!("{}.", prefix);
        self.entries
            .iter()
            .filter_map(|(key, property)| {
                key.strip_prefix(namespace.as_str())
                    .map(|name| (name, property))
            })
            .collect()
    }

    /// Library symbol entries (every key that is not a fixed grammar key).
    pub fn library_symbols(&self) -> impl Iterator<Item = (&str, &ColoursProperty)> {
        self.entries
            .iter()
            .filter(|(key, _)| !is_fixed_key(key))
            .map(|(key, property)| (key.as_str(), property))
    }

    /// All entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColoursProperty)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Whether `key` belongs to the fixed grammar rather than a library.
pub fn is_fixed_key(key: &str) -> bool {
    key == WHITESPACE
        || key == BOOL_TRUE
        || key == BOOL_FALSE
        || Operator::ALL.iter().any(|op| op.key() == key)
        || StatementKind::ALL.iter().any(|kind| kind.key() == key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_scheme_covers_fixed_keys() {
        let scheme = ColourScheme::default_scheme();
        assert!(scheme.get(WHITESPACE).is_some());
        for op in Operator::ALL {
            assert!(scheme.get(op.key()).is_some(), "missing {}", op.key());
        }
        for kind in StatementKind::ALL {
            assert!(scheme.get(kind.key()).is_some(), "missing {}", kind.key());
        }
    }

    #[test]
    fn test_default_colours_are_distinct_and_not_grey() {
        let scheme = ColourScheme::default_scheme();
        let mut seen = HashSet::new();
        for (key, property) in scheme.iter() {
            for hex in property.hexes() {
                assert!(seen.insert(hex.clone()), "{} reuses {}", key, hex);
                if key != WHITESPACE {
                    let colour = Colour::from_hex(hex).unwrap();
                    assert!(!colour.is_grayscale(), "{} is grey", key);
                }
            }
        }
    }

    #[test]
    fn test_property_matches_any_candidate() {
        let property = ColoursProperty::parse("#FF0000, 00ff00").unwrap();
        assert!(property.matches(Colour::rgb(255, 0, 0)));
        assert!(property.matches(Colour::rgb(0, 255, 0)));
        assert!(!property.matches(Colour::rgb(0, 0, 255)));
        assert_eq!(property.first(), Some(Colour::rgb(255, 0, 0)));
    }

    #[test]
    fn test_subsection() {
        let scheme = ColourScheme::default_scheme();
        let stdlib = scheme.subsection(STDLIB_PREFIX);
        let names: Vec<&str> = stdlib.iter().map(|(name, _)| *name).collect();
        assert!(names.contains(&"sqrt"));
        assert!(names.contains(&"listOf"));
        assert!(!names.iter().any(|n| n.starts_with("stdlib")));
    }

    #[test]
    fn test_library_symbols_exclude_grammar() {
        let scheme = ColourScheme::default_scheme();
        assert!(scheme.library_symbols().all(|(key, _)| key.starts_with("stdlib.")));
    }

    #[test]
    fn test_from_source_falls_back_per_key() {
        let scheme = ColourScheme::from_source("print=123456\n").unwrap();
        assert!(scheme.matches("print", Colour::rgb(0x12, 0x34, 0x56)));
        assert!(!scheme.matches("print", Colour::rgb(0xFF, 0x00, 0x66)));
        assert!(scheme.matches("if", Colour::rgb(255, 255, 0)));
    }
}
