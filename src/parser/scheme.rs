//! Colour scheme file parser.
//!
//! Scheme files are plain text, one entry per line:
//!
//! ```text
//! # comment
//! variable.set=9900FF
//! print=FF0066,FF0067
//! ```

use crate::error::{PxlError, Result};
use crate::types::{ColourScheme, ColoursProperty};

/// Parse scheme source into a scheme holding exactly the entries it defines.
///
/// Use [`ColourScheme::from_source`] to also fall back to the bundled defaults.
pub fn parse_scheme(source: &str) -> Result<ColourScheme> {
    let mut scheme = ColourScheme::new();

    for (index, line) in source.lines().enumerate() {
        let trimmed = line.trim();

        // Skip empty lines and comments
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let (key, value) = parse_scheme_line(trimmed, index + 1)?;
        scheme.set(key, value);
    }

    Ok(scheme)
}

/// Parse a `key=hex[,hex...]` line.
fn parse_scheme_line(line: &str, line_number: usize) -> Result<(String, ColoursProperty)> {
    let (key, value) = line.split_once('=').ok_or_else(|| PxlError::Parse {
        message: format!("Line {}: expected key=colour, got '{}'", line_number, line),
        help: Some("Scheme entries look like print=FF0066".to_string()),
    })?;

    let key = key.trim();
    if key.is_empty() {
        return Err(PxlError::Parse {
            message: format!("Line {}: empty scheme key", line_number),
            help: None,
        });
    }

    let property = ColoursProperty::parse(value).map_err(|e| PxlError::Parse {
        message: format!("Line {}: {} = {}: {}", line_number, key, value.trim(), e),
        help: Some("Use comma-separated hex colours, e.g. FF0000,#00FF00".to_string()),
    })?;

    if property.is_empty() {
        return Err(PxlError::Parse {
            message: format!("Line {}: no colours for {}", line_number, key),
            help: None,
        });
    }

    Ok((key.to_string(), property))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Colour;

    #[test]
    fn test_parse_entries_and_comments() {
        let scheme = parse_scheme("# header\n\nif=FFFF00\nprint = #FF0066, 00FF66\n").unwrap();
        assert_eq!(scheme.len(), 2);
        assert!(scheme.matches("if", Colour::rgb(255, 255, 0)));
        assert!(scheme.matches("print", Colour::rgb(0, 255, 0x66)));
    }

    #[test]
    fn test_parse_missing_equals() {
        let err = parse_scheme("if FFFF00").unwrap_err();
        assert!(err.to_string().contains("Line 1"));
    }

    #[test]
    fn test_parse_bad_colour() {
        assert!(parse_scheme("if=nothex").is_err());
        assert!(parse_scheme("if=").is_err());
        assert!(parse_scheme("=FFFFFF").is_err());
    }
}
