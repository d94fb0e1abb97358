//! Parsers for pxl's text inputs.
//!
//! The only text format pxl reads is the colour scheme file; images are
//! decoded by [`crate::grid`].

pub mod scheme;

pub use scheme::parse_scheme;
