//! Core domain types for pxl.
//!
//! This module contains the fundamental types used throughout the pipeline:
//! - `Colour` - RGBA colour values
//! - `ColourScheme` - Named colour properties defining the visual grammar
//! - `Operator` - Operator pixels
//! - `Pixel` - A classified grid cell, plus arrays and dotted sequences of them

mod colour;
mod operator;
pub mod pixel;
pub mod scheme;

pub use colour::Colour;
pub use operator::Operator;
pub use pixel::{Pixel, PixelArray, PixelKind, PixelSequence};
pub use scheme::{ColourScheme, ColoursProperty};
