//! pxl - Compile pixel images into code
//!
//! A library for reading images whose pixels encode a small programming
//! language, and generating Kotlin-flavoured source from them.

pub mod cli;
pub mod diagnostic;
pub mod error;
pub mod evaluator;
pub mod expression;
pub mod grid;
pub mod language;
pub mod library;
pub mod output;
pub mod parser;
pub mod reader;
pub mod scope;
pub mod statement;
pub mod types;

pub use diagnostic::{Diagnostic, Diagnostics, ErrorKind};
pub use error::{PxlError, Result};
pub use evaluator::{Evaluation, Evaluator};
pub use expression::{Expression, ExpressionParser, ExpressionType};
pub use grid::Grid;
pub use language::{Language, LanguageBuilder};
pub use library::{Library, LibraryFunction};
pub use reader::{ErrorTarget, Partition, PixelReader};
pub use scope::{Overload, Parameter, Scope, ScopeMember, ScopeOwner};
pub use statement::{StatementCatalog, StatementKind};
pub use types::{Colour, ColourScheme, ColoursProperty, Operator, Pixel, PixelArray, PixelKind};
