//! Libraries: callable symbols provided outside the program.
//!
//! A library contributes functions (each with one or more overloads) and,
//! optionally, the colours of those functions. Colours live in the scheme
//! under the library's prefix, e.g. `stdlib.sqrt`.

use crate::scope::{Overload, Scope, ScopeMember};
use crate::types::scheme::STDLIB_PREFIX;
use crate::types::{ColourScheme, ColoursProperty};

/// A function exposed by a library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryFunction {
    /// Name under the library prefix in the colour scheme.
    pub name: String,
    /// Name emitted in generated code.
    pub target: String,
    pub overloads: Vec<Overload>,
}

/// A library descriptor.
#[derive(Debug, Clone)]
pub struct Library {
    pub name: String,
    /// Scheme namespace, without the trailing dot.
    pub prefix: String,
    functions: Vec<LibraryFunction>,
    /// Colours keyed by function name (without prefix).
    colours: ColourScheme,
}

impl Library {
    /// Create an empty library.
    pub fn new(name: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prefix: prefix.into(),
            functions: Vec::new(),
            colours: ColourScheme::new(),
        }
    }

    /// The standard library. Its colours ship in the default scheme.
    pub fn standard() -> Self {
        Self::new("standard", STDLIB_PREFIX)
            .function("listOf", "listOf", vec![Overload::variadic(0)])
            .function("sqrt", "sqrt", vec![Overload::arity(1)])
            .function("random", "Math.random", vec![Overload::arity(0)])
            .function("readLine", "readLine", vec![Overload::arity(0)])
            .function("size", "count", vec![Overload::arity(1)])
    }

    /// Add a function.
    pub fn function(
        mut self,
        name: impl Into<String>,
        target: impl Into<String>,
        overloads: Vec<Overload>,
    ) -> Self {
        self.functions.push(LibraryFunction {
            name: name.into(),
            target: target.into(),
            overloads,
        });
        self
    }

    /// Assign colours to a function of this library.
    pub fn colour(mut self, name: impl Into<String>, property: ColoursProperty) -> Self {
        self.colours.set(name, property);
        self
    }

    pub fn functions(&self) -> &[LibraryFunction] {
        &self.functions
    }

    /// Full scheme key of one of this library's names.
    pub fn key(&self, name: &str) -> String {
        format!("{}.{}", self.prefix, name)
    }

    /// Add this library's colours to `scheme` under its prefix.
    ///
    /// Entries already present in `scheme` win.
    pub fn merge_colours_into(&self, scheme: &mut ColourScheme) {
        let mut namespaced = ColourScheme::new();
        for (name, property) in self.colours.iter() {
            namespaced.set(self.key(name), property.clone());
        }
        scheme.merge_from(&namespaced);
    }

    /// Bind every coloured function in `scope`, once per colour.
    ///
    /// Returns the number of functions that have at least one colour.
    pub fn register(&self, scheme: &ColourScheme, scope: &mut Scope) -> usize {
        let mut registered = 0;

        for function in &self.functions {
            let Some(property) = scheme.get(&self.key(&function.name)) else {
                log::debug!(
                    "Library {}: {} has no colour and cannot be called",
                    self.name,
                    function.name
                );
                continue;
            };

            for hex in property.hexes() {
                scope.define(
                    hex.clone(),
                    ScopeMember::Function {
                        name: function.target.clone(),
                        overloads: function.overloads.clone(),
                        library: true,
                    },
                );
            }
            registered += 1;
        }

        registered
    }
}
