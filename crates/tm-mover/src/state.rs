//! Per-entity movement state.

use rustc_hash::FxHashSet;

use tm_core::{EntityId, TilePos};
use tm_grid::Route;

use crate::Velocity;

/// Everything a mover remembers between ticks.
///
/// A mover is **idle** (`route == None`), **advancing** toward
/// `route[step]`, or has just consumed its route, after which the next
/// update calls `arrive()` and it is idle again.
///
/// The flags are deferred actions rather than states of their own: each is
/// set by one tick and consumed by a later one.
///
/// Reservations live in the shared table, not here; `held` only records
/// which tile this mover believes it holds so teardown can release it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoverState {
    /// Current goal tile.
    pub destination: TilePos,

    /// The route being followed, if any.  Replaced wholesale on replan.
    pub route: Option<Route>,

    /// Index of the waypoint currently being approached.  Only grows, except
    /// that a replan resets it to 0.
    pub step: usize,

    /// Last movement vector applied, in pixels per second.
    pub velocity: Velocity,

    pub moving: bool,

    /// `true` until the first destination is requested, and again after
    /// every `arrive()`.
    pub destination_reached: bool,

    /// Set by `stop_moves`, by a blocked final tile, or by a failed plan;
    /// latched into `stopped` at the start of the next update.
    pub stop_requested: bool,

    /// Freezes the effective route length at `step`.
    pub stopped: bool,

    /// A new destination arrived mid-flight; replan at the next waypoint.
    pub replan_pending: bool,

    /// Sit out the next update, then re-check the next tile's reservation.
    pub skip_one_tick: bool,

    /// Re-run the reservation step for `(step, step + 1)` on the next update.
    pub recheck_reservation: bool,

    /// Entities whose occupancy never blocks this mover.
    pub ignored: FxHashSet<EntityId>,

    /// Entities allowed to share the next tile.  Cleared on arrival.
    pub shared: FxHashSet<EntityId>,

    /// Tile anchor this mover holds in the reservation table.
    pub held: Option<TilePos>,

    /// Number of planner calls made for destinations so far.
    pub plan_count: u32,
}

impl MoverState {
    /// A mover that has never been asked to go anywhere.
    pub fn idle(at: TilePos) -> Self {
        Self {
            destination:         at,
            route:               None,
            step:                0,
            velocity:            Velocity::ZERO,
            moving:              false,
            destination_reached: true,
            stop_requested:      false,
            stopped:             false,
            replan_pending:      false,
            skip_one_tick:       false,
            recheck_reservation: false,
            ignored:             FxHashSet::default(),
            shared:              FxHashSet::default(),
            held:                None,
            plan_count:          0,
        }
    }

    /// Route length the cursor may advance to: the cursor itself once
    /// stopped, otherwise the full route (0 without one).
    #[inline]
    pub fn effective_length(&self) -> usize {
        if self.stopped {
            self.step
        } else {
            self.route.as_ref().map_or(0, Route::len)
        }
    }
}

/// What one call to `Mover::update` did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// No route; nothing to do.
    Idle,
    /// Sat out this tick waiting for a reservation to settle.
    Waiting,
    /// Moved toward the current waypoint without reaching it.
    Moving,
    /// Landed exactly on this waypoint.
    ReachedWaypoint(TilePos),
    /// Route finished (or stopped); the mover is idle at this tile.
    Arrived(TilePos),
}
