//! The language configuration shared by every evaluation.
//!
//! A [`Language`] bundles the colour scheme, the statement catalog and the
//! libraries. It is built once and then only read.
//!
//! # Usage
//!
//! ```ignore
//! let language = Language::builder()
//!     .scheme(ColourScheme::from_source(&source)?)
//!     .library(geometry)
//!     .build();
//! let evaluation = Evaluator::new(&language).evaluate(&grid);
//! ```

use crate::grid::Grid;
use crate::library::Library;
use crate::scope::Scope;
use crate::statement::StatementCatalog;
use crate::types::{Colour, ColourScheme, Pixel, PixelArray};

/// Scheme, statements and libraries of one language.
#[derive(Debug, Clone)]
pub struct Language {
    scheme: ColourScheme,
    catalog: StatementCatalog,
    libraries: Vec<Library>,
}

impl Default for Language {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Language {
    pub fn builder() -> LanguageBuilder {
        LanguageBuilder::default()
    }

    pub fn scheme(&self) -> &ColourScheme {
        &self.scheme
    }

    pub fn catalog(&self) -> &StatementCatalog {
        &self.catalog
    }

    pub fn libraries(&self) -> &[Library] {
        &self.libraries
    }

    /// Classify a single colour at a position.
    pub fn pixel(&self, colour: Colour, x: u32, y: u32) -> Pixel {
        Pixel::classify(colour, x, y, &self.scheme, &self.catalog)
    }

    /// Classify every cell of a grid, dropping whitespace.
    pub fn pixels(&self, grid: &Grid) -> PixelArray {
        PixelArray::from_grid(grid, &self.scheme, &self.catalog)
    }

    /// A root scope holding every library function that has a colour.
    pub fn global_scope(&self) -> Scope {
        let mut scope = Scope::global();
        for library in &self.libraries {
            let count = library.register(&self.scheme, &mut scope);
            log::debug!("Registered {} function(s) from {}", count, library.name);
        }
        scope
    }
}

/// Builder for [`Language`].
#[derive(Debug, Default)]
pub struct LanguageBuilder {
    scheme: Option<ColourScheme>,
    catalog: Option<StatementCatalog>,
    libraries: Vec<Library>,
}

impl LanguageBuilder {
    /// Use `scheme`; keys it leaves out fall back to the default scheme.
    pub fn scheme(mut self, scheme: ColourScheme) -> Self {
        self.scheme = Some(scheme);
        self
    }

    pub fn catalog(mut self, catalog: StatementCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Add a library after the standard library.
    pub fn library(mut self, library: Library) -> Self {
        self.libraries.push(library);
        self
    }

    pub fn build(self) -> Language {
        let mut scheme = self.scheme.unwrap_or_default();
        scheme.merge_from(&ColourScheme::default_scheme());

        let mut libraries = vec![Library::standard()];
        libraries.extend(self.libraries);
        for library in &libraries {
            library.merge_colours_into(&mut scheme);
        }

        Language {
            scheme,
            catalog: self.catalog.unwrap_or_default(),
            libraries,
        }
    }
}
