//! CSV map loader.
//!
//! # CSV format
//!
//! No header.  One row per tile row (top to bottom), one field per tile:
//!
//! ```csv
//! .,.,.,#
//! .,~,.,#
//! .,.,.,.
//! ```
//!
//! | Symbol | Terrain          |
//! |--------|------------------|
//! | `.`    | `Terrain::Floor` |
//! | `#`    | `Terrain::Wall`  |
//! | `~`    | `Terrain::Water` |
//!
//! Surrounding whitespace is ignored.  Every row must have the same number of
//! fields; blank lines are skipped by the CSV reader.

use std::io::Read;
use std::path::Path;

use crate::grid::{Terrain, TileGrid, TileGridBuilder};
use crate::GridError;

/// Load a [`TileGrid`] from a CSV file.
pub fn load_grid_csv(path: &Path, tile_width: f64, tile_height: f64) -> Result<TileGrid, GridError> {
    let file = std::fs::File::open(path)
        .map_err(GridError::Io)?;
    load_grid_reader(file, tile_width, tile_height)
}

/// Like [`load_grid_csv`] but accepts any `Read` source.
///
/// Useful for testing (pass a byte slice) or maps embedded in the binary.
pub fn load_grid_reader<R: Read>(
    reader: R,
    tile_width: f64,
    tile_height: f64,
) -> Result<TileGrid, GridError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut cells: Vec<Terrain> = Vec::new();
    let mut width: Option<usize> = None;
    let mut height = 0usize;

    for (row, result) in csv_reader.records().enumerate() {
        let record = result.map_err(|e| GridError::Parse(e.to_string()))?;

        match width {
            None => width = Some(record.len()),
            Some(w) if w != record.len() => {
                return Err(GridError::Parse(format!(
                    "row {row} has {} tiles, expected {w}",
                    record.len()
                )));
            }
            Some(_) => {}
        }

        for (col, field) in record.iter().enumerate() {
            let terrain = Terrain::from_symbol(field).ok_or_else(|| {
                GridError::Parse(format!(
                    "unknown terrain {field:?} at row {row}, column {col}: expected '.', '#' or '~'"
                ))
            })?;
            cells.push(terrain);
        }
        height += 1;
    }

    let width = width.unwrap_or(0);
    TileGridBuilder::new(width as u32, height as u32)
        .tile_size(tile_width, tile_height)
        .cells(cells)
        .build()
}
