use thiserror::Error;

use tm_core::EntityId;
use tm_grid::GridError;
use tm_mover::MoverError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("world configuration error: {0}")]
    Config(String),

    #[error("no live mover with id {0}")]
    EntityNotFound(EntityId),

    #[error("mover error: {0}")]
    Mover(#[from] MoverError),

    #[error("grid error: {0}")]
    Grid(#[from] GridError),
}

pub type SimResult<T> = Result<T, SimError>;
