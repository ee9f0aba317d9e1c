//! Simulation time model.
//!
//! # Design
//!
//! Time is a monotonically increasing `Tick` counter.  Each tick advances
//! every mover by a fixed `tick_secs` of simulated time:
//!
//!   elapsed_secs = tick * tick_secs
//!
//! Movers take `dt` in seconds, so a variable-step host can bypass
//! `FrameClock` and feed its own frame delta straight into `Mover::update`.

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── FrameClock ────────────────────────────────────────────────────────────────

/// Fixed-step clock driving the scheduler.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameClock {
    /// Simulated seconds per tick; the `dt` handed to every mover.
    pub tick_secs: f64,
    /// The current tick, advanced by `FrameClock::advance()` each iteration.
    pub current_tick: Tick,
}

impl FrameClock {
    pub fn new(tick_secs: f64) -> Self {
        Self { tick_secs, current_tick: Tick::ZERO }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = self.current_tick + 1;
    }

    /// Elapsed simulated seconds since tick 0.
    #[inline]
    pub fn elapsed_secs(&self) -> f64 {
        self.current_tick.0 as f64 * self.tick_secs
    }
}

impl fmt::Display for FrameClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.3} s)", self.current_tick, self.elapsed_secs())
    }
}

// ── UpdateOrder ───────────────────────────────────────────────────────────────

/// Order in which the scheduler visits movers within one tick.
///
/// Movers share the reservation table, so the order decides who wins a
/// contested tile.  Both orders are deterministic for a given seed.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UpdateOrder {
    /// Ascending `EntityId` every tick.
    #[default]
    Ascending,
    /// A fresh permutation every tick, drawn from the seeded `SimRng`.
    Shuffled,
}

// ── WorldConfig ───────────────────────────────────────────────────────────────

/// Top-level scheduler configuration.
///
/// Typically loaded from a TOML/JSON file by the application crate (with the
/// `serde` feature) and passed to `WorldBuilder`.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldConfig {
    /// Simulated seconds per tick.  Must be positive and finite.
    pub tick_secs: f64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Mover visiting order within a tick.
    pub update_order: UpdateOrder,
}

impl WorldConfig {
    /// Create a [`FrameClock`] from this configuration.
    pub fn make_clock(&self) -> FrameClock {
        FrameClock::new(self.tick_secs)
    }
}

impl Default for WorldConfig {
    /// 60 ticks per simulated second, seed 0, ascending order.
    fn default() -> Self {
        Self {
            tick_secs:    1.0 / 60.0,
            seed:         0,
            update_order: UpdateOrder::Ascending,
        }
    }
}
