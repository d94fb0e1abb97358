//! Splitting a program into one reader per statement.

use crate::statement::StatementKind;
use crate::types::Pixel;

use super::PixelReader;

/// The pixels of one statement, keyword pixel included.
#[derive(Debug, Clone)]
pub struct Partition<'a> {
    /// The owning statement; `None` only for pixels before the first keyword.
    pub statement: Option<StatementKind>,
    pub reader: PixelReader<'a>,
}

pub(super) fn subdivide(pixels: &[Pixel]) -> Vec<Partition<'_>> {
    let mut starts: Vec<usize> = pixels
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_statement())
        .map(|(i, _)| i)
        .collect();

    // Orphan pixels before the first keyword get a partition of their own
    if !pixels.is_empty() && starts.first() != Some(&0) {
        starts.insert(0, 0);
    }

    starts
        .iter()
        .enumerate()
        .map(|(n, &start)| {
            let end = starts.get(n + 1).copied().unwrap_or(pixels.len());
            let statement = pixels[start].statement();
            Partition {
                statement,
                reader: PixelReader::for_statement(&pixels[start..end], statement),
            }
        })
        .collect()
}
