//! `tm-core`: foundational types for the `tilemove` framework.
//!
//! This crate is a dependency of every other `tm-*` crate.  It intentionally
//! has no `tm-*` dependencies and minimal external ones (only `rand`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `EntityId`                                            |
//! | [`tile`]        | `TilePos`, `PixelPos`                                 |
//! | [`category`]    | `MoveCategory` enum                                   |
//! | [`time`]        | `Tick`, `FrameClock`, `WorldConfig`, `UpdateOrder`    |
//! | [`rng`]         | `SimRng` (scheduler-level)                            |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod category;
pub mod ids;
pub mod rng;
pub mod tile;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use category::MoveCategory;
pub use ids::EntityId;
pub use rng::SimRng;
pub use tile::{PixelPos, TilePos};
pub use time::{FrameClock, Tick, UpdateOrder, WorldConfig};
