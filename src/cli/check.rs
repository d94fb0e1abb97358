//! Check command implementation.
//!
//! Evaluates every image it is given and reports diagnostics without
//! writing any code.

use std::path::{Path, PathBuf};

use clap::Args;
use walkdir::WalkDir;

use crate::error::{PxlError, Result};
use crate::evaluator::Evaluator;
use crate::grid::Grid;
use crate::language::Language;
use crate::output::{display_path, plural, Printer};

use super::load_language;

/// Check images for errors without writing code
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Images or directories to check (directories are searched for .png files)
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Colour scheme file (entries it lacks fall back to the defaults)
    #[arg(long)]
    pub scheme: Option<PathBuf>,
}

pub fn run(args: CheckArgs, printer: &Printer) -> Result<()> {
    let language = load_language(args.scheme.as_deref())?;
    let images = collect_images(&args.paths);
    if images.is_empty() {
        printer.warning("Skipped", "no .png images found");
        return Ok(());
    }

    let mut failed = 0;
    for image in &images {
        match check_image(&language, image, printer) {
            Ok(true) => printer.status("Checked", &display_path(image)),
            Ok(false) => {
                failed += 1;
                printer.error("Invalid", &display_path(image));
            }
            Err(e) => {
                failed += 1;
                printer.error("Failed", &e.to_string());
            }
        }
    }

    let summary = format!(
        "{}, {} invalid",
        plural(images.len(), "image", "images"),
        failed
    );
    if failed > 0 {
        return Err(PxlError::Compile {
            message: summary,
            help: None,
        });
    }

    printer.info("Finished", &summary);
    Ok(())
}

/// Evaluate one image, printing its diagnostics. Returns whether it is valid.
fn check_image(language: &Language, path: &Path, printer: &Printer) -> Result<bool> {
    let grid = Grid::open(path)?;
    let evaluation = Evaluator::new(language).evaluate(&grid);

    for diagnostic in evaluation.diagnostics().iter() {
        printer.diagnostic(path, diagnostic);
    }
    Ok(!evaluation.is_invalidated())
}

/// Expand directories into the `.png` files beneath them, in path order.
/// Files given directly are kept whatever their extension.
fn collect_images(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut images = Vec::new();

    for path in paths {
        if !path.is_dir() {
            images.push(path.clone());
            continue;
        }

        let mut found: Vec<PathBuf> = WalkDir::new(path)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| {
                p.extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
            })
            .collect();
        found.sort();
        log::debug!(
            "Found {} in {}",
            plural(found.len(), "image", "images"),
            path.display()
        );
        images.extend(found);
    }

    images
}
