//! `tm-grid`: the tile grid and the collaborators a mover consults.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`grid`]        | `Grid` trait, `TileGrid`, `TileGridBuilder`, `Terrain`    |
//! | [`loader`]      | `load_grid_csv`, `load_grid_reader`                       |
//! | [`reservation`] | `ReservationTable`: one optional owner per tile           |
//! | [`planner`]     | `PathPlanner` trait, `Route`, `AStarPlanner`              |
//! | [`error`]       | `GridError`, `GridResult<T>`                              |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod error;
pub mod grid;
pub mod loader;
pub mod planner;
pub mod reservation;

#[cfg(test)]
mod tests;

pub use error::{GridError, GridResult};
pub use grid::{Grid, Terrain, TileGrid, TileGridBuilder};
pub use loader::{load_grid_csv, load_grid_reader};
pub use planner::{AStarPlanner, PathPlanner, Route};
pub use reservation::ReservationTable;
