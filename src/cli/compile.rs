//! Compile command implementation.
//!
//! Reads one image, evaluates it and writes the generated code.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::Args;

use crate::error::{PxlError, Result};
use crate::evaluator::{Evaluation, Evaluator};
use crate::grid::Grid;
use crate::output::{display_path, plural, Printer};

use super::load_language;

/// Compile an image into code
#[derive(Args, Debug)]
pub struct CompileArgs {
    /// Image to compile
    pub image: PathBuf,

    /// Colour scheme file (entries it lacks fall back to the defaults)
    #[arg(long)]
    pub scheme: Option<PathBuf>,

    /// Write code to this file instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Print the full evaluation (code and diagnostics) as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: CompileArgs, printer: &Printer) -> Result<()> {
    let language = load_language(args.scheme.as_deref())?;
    let grid = Grid::open(&args.image)?;

    printer.status(
        "Compiling",
        &format!(
            "{} ({}x{})",
            display_path(&args.image),
            grid.width(),
            grid.height()
        ),
    );

    let evaluation = Evaluator::new(&language).evaluate(&grid);

    if args.json {
        let json = to_json(&evaluation)?;
        write_output(args.output.as_deref(), &json)?;
        return Ok(());
    }

    for diagnostic in evaluation.diagnostics().iter() {
        printer.diagnostic(&args.image, diagnostic);
    }

    if evaluation.is_invalidated() {
        let count = evaluation.diagnostics().len();
        return Err(PxlError::Compile {
            message: format!(
                "{} has {}",
                display_path(&args.image),
                plural(count, "error", "errors")
            ),
            help: Some("Run with --json to inspect the partially generated code".to_string()),
        });
    }

    write_output(args.output.as_deref(), evaluation.code())?;
    if let Some(output) = &args.output {
        printer.success("Finished", &display_path(output));
    }

    Ok(())
}

fn to_json(evaluation: &Evaluation) -> Result<String> {
    serde_json::to_string_pretty(evaluation).map_err(|e| PxlError::Serialize {
        message: e.to_string(),
    })
}

fn write_output(path: Option<&Path>, text: &str) -> Result<()> {
    match path {
        Some(path) => fs::write(path, text).map_err(|e| PxlError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to write output: {}", e),
        }),
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;
    use crate::types::Colour;
    use tempfile::TempDir;

    fn keyword(key: &str) -> Colour {
        Language::default()
            .scheme()
            .get(key)
            .and_then(|property| property.first())
            .unwrap()
    }

    fn save(dir: &TempDir, name: &str, row: Vec<Colour>) -> PathBuf {
        let path = dir.path().join(name);
        Grid::from_row(row).save(&path).unwrap();
        path
    }

    fn args(image: PathBuf, output: Option<PathBuf>, json: bool) -> CompileArgs {
        CompileArgs {
            image,
            scheme: None,
            output,
            json,
        }
    }

    #[test]
    fn test_compile_to_file() {
        let dir = TempDir::new().unwrap();
        let mut row = vec![keyword("print")];
        row.extend("Hi".bytes().map(Colour::grey));
        let image = save(&dir, "hello.png", row);
        let output = dir.path().join("hello.kt");

        run(args(image, Some(output.clone()), false), &Printer::new()).unwrap();

        assert_eq!(fs::read_to_string(output).unwrap(), "println(\"Hi\")\n");
    }

    #[test]
    fn test_compile_invalid_image() {
        let dir = TempDir::new().unwrap();
        let image = save(
            &dir,
            "broken.png",
            vec![keyword("function.call"), Colour::rgb(1, 2, 3)],
        );
        let output = dir.path().join("broken.kt");

        let result = run(args(image, Some(output.clone()), false), &Printer::new());

        assert!(matches!(result, Err(PxlError::Compile { .. })));
        assert!(!output.exists());
    }

    #[test]
    fn test_compile_json() {
        let dir = TempDir::new().unwrap();
        let image = save(
            &dir,
            "broken.png",
            vec![keyword("function.call"), Colour::rgb(1, 2, 3)],
        );
        let output = dir.path().join("broken.json");

        run(args(image, Some(output.clone()), true), &Printer::new()).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(output).unwrap()).unwrap();
        assert_eq!(json["invalidated"], true);
        assert_eq!(json["diagnostics"][0]["kind"], "unresolved-reference");
    }

    #[test]
    fn test_missing_image() {
        let result = run(
            args(PathBuf::from("/nonexistent/missing.png"), None, false),
            &Printer::new(),
        );
        assert!(matches!(result, Err(PxlError::Image { .. })));
    }
}
