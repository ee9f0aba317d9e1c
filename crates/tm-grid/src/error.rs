//! Grid-subsystem error type.

use thiserror::Error;

use tm_core::TilePos;

/// Errors produced by `tm-grid`.  All of them are setup-time failures.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("tile size must be positive and finite, got {width}x{height}")]
    InvalidTileSize { width: f64, height: f64 },

    #[error("grid must have at least one tile, got {width}x{height}")]
    EmptyGrid { width: u32, height: u32 },

    #[error("tile {0} is outside the grid")]
    OutOfBounds(TilePos),

    #[error("map parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type GridResult<T> = Result<T, GridError>;
