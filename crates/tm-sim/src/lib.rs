//! `tm-sim`: the world scheduler for the tilemove framework.
//!
//! # Tick loop
//!
//! ```text
//! each tick:
//!   ① Order   live movers by ascending EntityId, or a fresh seeded
//!               shuffle when `UpdateOrder::Shuffled`.
//!   ② Update  for each mover in that order, build a MoveContext over the
//!               grid, the reservation table, and the planner, and call
//!               Mover::update(tick_secs).  Reservation hand-offs happen
//!               here, one mover at a time.
//!   ③ Report  WorldObserver::on_waypoint / on_arrival per outcome.
//!   ④ Advance FrameClock::advance.
//! ```
//!
//! Each mover sees the reservations left by the movers visited before it in
//! the same tick.  No two movers ever hold the same tile.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use tm_core::{TilePos, WorldConfig};
//! use tm_grid::{AStarPlanner, TileGrid};
//! use tm_mover::MoverConfig;
//! use tm_sim::{NoopObserver, WorldBuilder};
//!
//! let grid = TileGrid::open(20, 20, 32.0, 32.0)?;
//! let mut world = WorldBuilder::new(WorldConfig::default(), grid, AStarPlanner::default())
//!     .build()?;
//! let id = world.spawn(TilePos::new(0, 0), (32.0, 32.0), MoverConfig::default())?;
//! world.set_destination(id, TilePos::new(12, 7))?;
//! world.run_ticks(600, &mut NoopObserver);
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod world;


pub use builder::WorldBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, WorldObserver};
pub use world::World;
