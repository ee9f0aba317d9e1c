//! `tm-mover`: the tile-grid pathfinding-and-movement controller.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                          |
//! |-------------|-------------------------------------------------------------------|
//! | [`config`]  | `Body` (the owner), `Speed`, `MoverConfig`                        |
//! | [`motion`]  | `Velocity`, `movement_vector`: per-tick translation math          |
//! | [`state`]   | `MoverState`: per-entity route, cursor, flags; `MoveOutcome`      |
//! | [`mover`]   | `Mover`: destination requests, tick update, reservations          |
//! | [`error`]   | `MoverError`, `MoverResult<T>`                                    |
//!
//! # Movement model
//!
//! 1. [`Mover::set_destination`] asks the [`PathPlanner`][tm_grid::PathPlanner]
//!    for a [`Route`][tm_grid::Route] and reserves its first tile.
//! 2. Every tick, [`Mover::update`] moves the body toward `route[step]` at a
//!    per-axis speed, slowed by the diagonal factor when both axes move.
//! 3. On reaching a waypoint the body snaps onto it, the mover releases that
//!    tile, reserves the next one, and advances the cursor.  A blocked next
//!    tile is resolved locally: shared occupants get a cheap retry, unknown
//!    occupants force a replan, ignored occupants are walked through.
//! 4. A destination change while in flight is deferred to the next waypoint,
//!    so the body is never pulled off the grid mid-step.
//!
//! Collaborators come in through [`MoveContext`]; the controller holds no
//! reference to the grid, the reservation table, or the planner between
//! calls.

pub mod config;
pub mod error;
pub mod motion;
pub mod mover;
pub mod state;


pub use config::{Body, MoverConfig, Speed};
pub use error::{MoverError, MoverResult};
pub use motion::{movement_vector, Velocity, DIAGONAL_FACTOR};
pub use mover::{MoveContext, MoveView, Mover};
pub use state::{MoveOutcome, MoverState};
