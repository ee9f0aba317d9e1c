//! World observer trait for progress reporting and data collection.

use tm_core::{EntityId, Tick, TilePos};

/// Callbacks invoked by [`World::step`][crate::World::step] as movers update.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: arrival logger
///
/// ```rust,ignore
/// struct Arrivals(Vec<(EntityId, TilePos)>);
///
/// impl WorldObserver for Arrivals {
///     fn on_arrival(&mut self, _tick: Tick, id: EntityId, tile: TilePos) {
///         self.0.push((id, tile));
///     }
/// }
/// ```
pub trait WorldObserver {
    /// Called at the very start of each tick, before any mover updates.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// A mover landed exactly on a waypoint of its route.
    fn on_waypoint(&mut self, _tick: Tick, _id: EntityId, _tile: TilePos) {}

    /// A mover finished (or stopped) its route and is idle at `tile`.
    fn on_arrival(&mut self, _tick: Tick, _id: EntityId, _tile: TilePos) {}

    /// Called at the end of each tick.  `moving` is the number of movers that
    /// advanced or reached a waypoint this tick.
    fn on_tick_end(&mut self, _tick: Tick, _moving: usize) {}
}

/// A [`WorldObserver`] that does nothing.
pub struct NoopObserver;

impl WorldObserver for NoopObserver {}
