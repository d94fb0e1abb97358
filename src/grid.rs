//! Source images as rectangular colour grids.
//!
//! Decoding goes through the `image` crate; everything downstream only sees
//! a [`Grid`].

use std::path::Path;

use image::{ImageBuffer, Rgba, RgbaImage};

use crate::error::{PxlError, Result};
use crate::types::Colour;

/// A rectangular grid of colours, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<Colour>,
}

impl Grid {
    /// Create a grid filled with one colour.
    pub fn filled(width: u32, height: u32, colour: Colour) -> Self {
        Self {
            width,
            height,
            cells: vec![colour; (width * height) as usize],
        }
    }

    /// Build a grid from rows. Short rows are padded with transparent cells.
    pub fn from_rows(rows: Vec<Vec<Colour>>) -> Self {
        let height = rows.len() as u32;
        let width = rows.iter().map(Vec::len).max().unwrap_or(0) as u32;

        let mut cells = Vec::with_capacity((width * height) as usize);
        for mut row in rows {
            row.resize(width as usize, Colour::TRANSPARENT);
            cells.extend(row);
        }

        Self {
            width,
            height,
            cells,
        }
    }

    /// Lay colours out left to right in a single row.
    pub fn from_row(row: Vec<Colour>) -> Self {
        Self::from_rows(vec![row])
    }

    /// Decode an image file.
    pub fn open(path: &Path) -> Result<Self> {
        let img = image::open(path)
            .map_err(|e| PxlError::Image {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
            .to_rgba8();

        Ok(Self::from_image(&img))
    }

    /// Convert a decoded RGBA image.
    pub fn from_image(img: &RgbaImage) -> Self {
        let cells = img
            .pixels()
            .map(|p| Colour::new(p.0[0], p.0[1], p.0[2], p.0[3]))
            .collect();

        Self {
            width: img.width(),
            height: img.height(),
            cells,
        }
    }

    /// Encode the grid as a PNG file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut img: RgbaImage = ImageBuffer::new(self.width, self.height);
        for (x, y, colour) in self.cells() {
            img.put_pixel(x, y, Rgba(colour.to_rgba()));
        }

        img.save(path).map_err(|e| PxlError::Image {
            path: path.to_path_buf(),
            message: format!("Failed to write PNG: {}", e),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Colour at a coordinate.
    pub fn get(&self, x: u32, y: u32) -> Option<Colour> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells.get((y * self.width + x) as usize).copied()
    }

    /// Replace the colour at a coordinate. Out-of-range writes are ignored.
    pub fn set(&mut self, x: u32, y: u32, colour: Colour) {
        if x < self.width && y < self.height {
            self.cells[(y * self.width + x) as usize] = colour;
        }
    }

    /// Every cell with its coordinate, row by row.
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32, Colour)> + '_ {
        let width = self.width.max(1);
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &colour)| (i as u32 % width, i as u32 / width, colour))
    }
}
