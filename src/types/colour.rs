//! Colour type and parsing.

use std::fmt;
use std::str::FromStr;

use crate::error::{PxlError, Result};

/// An RGBA colour value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Colour {
    /// Create a new colour from RGBA components.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create a new opaque colour from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create an opaque grey whose channels all equal `value`.
    ///
    /// Grey pixels encode characters: the channel value is the character code.
    pub const fn grey(value: u8) -> Self {
        Self::rgb(value, value, value)
    }

    /// Fully transparent colour.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    /// Black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// White.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Parse a hex colour string.
    ///
    /// Supports formats:
    /// - `#RGB` (3 digits, expanded to 6)
    /// - `#RGBA` (4 digits, expanded to 8)
    /// - `#RRGGBB` (6 digits)
    /// - `#RRGGBBAA` (8 digits)
    ///
    /// The leading `#` is optional.
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.trim();
        let hex = s.strip_prefix('#').unwrap_or(s);

        if !hex.is_ascii() {
            return Err(invalid_hex(s));
        }

        match hex.len() {
            3 | 4 => {
                let digits = hex
                    .chars()
                    .map(parse_hex_digit)
                    .collect::<Result<Vec<u8>>>()?;
                let expand = |d: u8| d << 4 | d;
                let a = digits.get(3).copied().map(expand).unwrap_or(255);
                Ok(Self::new(
                    expand(digits[0]),
                    expand(digits[1]),
                    expand(digits[2]),
                    a,
                ))
            }
            6 | 8 => {
                let r = parse_hex_byte(&hex[0..2])?;
                let g = parse_hex_byte(&hex[2..4])?;
                let b = parse_hex_byte(&hex[4..6])?;
                let a = if hex.len() == 8 {
                    parse_hex_byte(&hex[6..8])?
                } else {
                    255
                };
                Ok(Self::new(r, g, b, a))
            }
            _ => Err(invalid_hex(s)),
        }
    }

    /// Uppercase hex identity without `#`: `RRGGBB`, or `RRGGBBAA` when not opaque.
    ///
    /// Two pixels with the same hex identity are the same symbol.
    pub fn hex(self) -> String {
        if self.is_opaque() {
            format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }

    /// Convert to RGBA tuple.
    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Check if the colour is fully transparent.
    pub fn is_transparent(self) -> bool {
        self.a == 0
    }

    /// Check if the colour is fully opaque.
    pub fn is_opaque(self) -> bool {
        self.a == 255
    }

    /// Check if all three channels are equal.
    pub fn is_grayscale(self) -> bool {
        self.r == self.g && self.g == self.b
    }

    /// The shared channel value of a grayscale colour.
    pub fn grayscale(self) -> Option<u8> {
        self.is_grayscale().then_some(self.r)
    }

    /// The colour on the opposite side of the hue wheel, alpha preserved.
    pub fn complementary(self) -> Self {
        use palette::{Hsl, IntoColor, Srgb};

        let rgb: Srgb<f32> = Srgb::new(
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        );

        let mut hsl: Hsl = rgb.into_color();
        hsl.hue += 180.0;

        let rgb_out: Srgb<f32> = hsl.into_color();
        Colour::new(
            (rgb_out.red * 255.0).round().clamp(0.0, 255.0) as u8,
            (rgb_out.green * 255.0).round().clamp(0.0, 255.0) as u8,
            (rgb_out.blue * 255.0).round().clamp(0.0, 255.0) as u8,
            self.a,
        )
    }
}

impl FromStr for Colour {
    type Err = PxlError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.hex())
    }
}

fn invalid_hex(s: &str) -> PxlError {
    PxlError::Parse {
        message: format!("Invalid hex colour: {}", s),
        help: Some("Use #RGB, #RGBA, #RRGGBB, or #RRGGBBAA format".to_string()),
    }
}

/// Parse a single hex digit.
fn parse_hex_digit(c: char) -> Result<u8> {
    c.to_digit(16)
        .map(|d| d as u8)
        .ok_or_else(|| PxlError::Parse {
            message: format!("Invalid hex digit: {}", c),
            help: None,
        })
}

/// Parse a two-character hex byte.
fn parse_hex_byte(s: &str) -> Result<u8> {
    u8::from_str_radix(s, 16).map_err(|_| PxlError::Parse {
        message: format!("Invalid hex byte: {}", s),
        help: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex_6digit() {
        let c = Colour::from_hex("#FF0000").unwrap();
        assert_eq!(c, Colour::rgb(255, 0, 0));

        let c = Colour::from_hex("1a1a2e").unwrap();
        assert_eq!(c, Colour::rgb(0x1a, 0x1a, 0x2e));
    }

    #[test]
    fn test_from_hex_short_forms() {
        assert_eq!(Colour::from_hex("#ABC").unwrap(), Colour::rgb(0xAA, 0xBB, 0xCC));
        assert_eq!(Colour::from_hex("#F008").unwrap(), Colour::new(255, 0, 0, 0x88));
    }

    #[test]
    fn test_from_hex_invalid() {
        assert!(Colour::from_hex("#GGG").is_err());
        assert!(Colour::from_hex("#12345").is_err());
        assert!(Colour::from_hex("").is_err());
        assert!(Colour::from_hex("ÄÄÄ").is_err());
    }

    #[test]
    fn test_hex_identity() {
        assert_eq!(Colour::rgb(255, 0, 16).hex(), "FF0010");
        assert_eq!(Colour::new(255, 0, 0, 128).hex(), "FF000080");
        assert_eq!(format!("{}", Colour::rgb(1, 2, 3)), "#010203");
    }

    #[test]
    fn test_grayscale() {
        assert_eq!(Colour::grey(72).grayscale(), Some(72));
        assert!(Colour::BLACK.is_grayscale());
        assert_eq!(Colour::rgb(1, 2, 3).grayscale(), None);
    }

    #[test]
    fn test_complementary() {
        assert_eq!(Colour::rgb(255, 0, 0).complementary(), Colour::rgb(0, 255, 255));
        assert_eq!(
            Colour::new(0, 0, 255, 40).complementary(),
            Colour::new(255, 255, 0, 40)
        );
    }

    #[test]
    fn test_constants() {
        assert!(Colour::TRANSPARENT.is_transparent());
        assert!(Colour::BLACK.is_opaque());
        assert_eq!(Colour::WHITE.grayscale(), Some(255));
    }
}
