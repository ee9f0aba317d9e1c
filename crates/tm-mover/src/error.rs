use thiserror::Error;

use tm_core::{EntityId, TilePos};
use tm_grid::GridError;

/// Setup-time failures.  Nothing in the per-tick path returns an error: no
/// path, reservation conflicts, and no-op destinations are states.
#[derive(Debug, Error)]
pub enum MoverError {
    #[error("body size must be positive and finite, got {width}x{height}")]
    InvalidBodySize { width: f64, height: f64 },

    #[error("speed must be positive and finite on both axes, got ({x}, {y})")]
    InvalidSpeed { x: f64, y: f64 },

    #[error("diagonal factor must be in (0, 1], got {0}")]
    InvalidDiagonalFactor(f64),

    #[error("entity {0} is following a route and cannot be placed")]
    InTransit(EntityId),

    #[error("tile {0} is blocked by terrain")]
    TileBlocked(TilePos),

    #[error("tile {tile} is reserved by {by:?}")]
    TileOccupied { tile: TilePos, by: Vec<EntityId> },

    #[error("grid error: {0}")]
    Grid(#[from] GridError),
}

pub type MoverResult<T> = Result<T, MoverError>;
