pub mod check;
pub mod compile;
pub mod completions;

use std::fs;
use std::path::Path;

use clap::{Parser, Subcommand};

use crate::error::{PxlError, Result};
use crate::language::Language;
use crate::types::ColourScheme;

/// pxl - Compile pixel images into code
#[derive(Parser, Debug)]
#[command(name = "pxl")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile an image into code
    Compile(compile::CompileArgs),

    /// Check images for errors without writing code
    Check(check::CheckArgs),

    /// Print a shell completion script
    Completions(completions::CompletionsArgs),
}

/// Build the language, reading a colour scheme file if one is given.
pub fn load_language(scheme: Option<&Path>) -> Result<Language> {
    let Some(path) = scheme else {
        return Ok(Language::default());
    };

    let source = fs::read_to_string(path).map_err(|e| PxlError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to read colour scheme: {}", e),
    })?;
    let scheme = ColourScheme::from_source(&source)?;
    log::debug!("Loaded {} scheme entries from {}", scheme.len(), path.display());

    Ok(Language::builder().scheme(scheme).build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Colour;

    #[test]
    fn test_load_default_language() {
        let language = load_language(None).unwrap();
        assert!(language.scheme().get("print").is_some());
    }

    #[test]
    fn test_load_scheme_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.scheme");
        fs::write(&path, "# custom\nprint=123456\n").unwrap();

        let language = load_language(Some(&path)).unwrap();
        assert!(language.scheme().matches("print", Colour::rgb(0x12, 0x34, 0x56)));
        assert!(language.scheme().get("if").is_some());
    }

    #[test]
    fn test_missing_scheme_file() {
        let result = load_language(Some(Path::new("/nonexistent/pxl.scheme")));
        assert!(matches!(result, Err(PxlError::Io { .. })));
    }
}
