//! The `World` struct and its tick loop.

use log::{debug, warn};

use tm_core::{EntityId, FrameClock, SimRng, Tick, TilePos, UpdateOrder, WorldConfig};
use tm_grid::{Grid, PathPlanner, ReservationTable};
use tm_mover::{Body, MoveContext, MoveOutcome, MoveView, Mover, MoverConfig};

use crate::{SimError, SimResult, WorldObserver};

/// Owns the grid, the reservation table, the planner, and every mover.
///
/// Movers never hold references to each other or to the table; each update
/// borrows the table through a fresh [`MoveContext`].  That makes the world
/// the single writer of reservations, and the per-tick visiting order the
/// only thing that decides who wins a contested tile.
///
/// Create via [`WorldBuilder`][crate::WorldBuilder].
pub struct World<G: Grid, P: PathPlanner> {
    /// Tick duration, seed, update order.
    pub config: WorldConfig,

    /// Current tick and simulated time.
    pub clock: FrameClock,

    pub grid: G,

    /// One optional owner per tile.  Written only through movers.
    pub reservations: ReservationTable,

    pub planner: P,

    /// Indexed by `EntityId`.  A despawned slot stays `None`; ids are never
    /// reused.
    pub movers: Vec<Option<Mover>>,

    /// Drives `UpdateOrder::Shuffled`.
    pub rng: SimRng,
}

impl<G: Grid, P: PathPlanner> World<G, P> {
    // ── Population ────────────────────────────────────────────────────────

    /// Create a mover of `size` pixels on `tile` and return its id.
    ///
    /// Ids are handed out sequentially.  A rejected spawn (bad config,
    /// blocked or occupied tile) does not use up an id.
    pub fn spawn(&mut self, tile: TilePos, size: (f64, f64), config: MoverConfig) -> SimResult<EntityId> {
        let id = EntityId::try_from(self.movers.len())
            .map_err(|_| SimError::Config("entity id space exhausted".into()))?;

        let mut mover = Mover::new(Body::new(id, size.0, size.1), config)?;
        let mut ctx = MoveContext::new(&self.grid, &mut self.reservations, &self.planner);
        if let Err(e) = mover.place(tile, &mut ctx) {
            warn!("spawn of {id} at {tile} rejected: {e}");
            return Err(e.into());
        }

        debug!("spawned {id} at {tile}");
        self.movers.push(Some(mover));
        Ok(id)
    }

    /// Remove a mover and release every tile it holds.
    pub fn despawn(&mut self, id: EntityId) -> SimResult<Mover> {
        let mut mover = self
            .movers
            .get_mut(id.index())
            .and_then(Option::take)
            .ok_or(SimError::EntityNotFound(id))?;
        let mut ctx = MoveContext::new(&self.grid, &mut self.reservations, &self.planner);
        mover.retire(&mut ctx);
        debug!("despawned {id}");
        Ok(mover)
    }

    /// Number of live movers.
    pub fn len(&self) -> usize {
        self.movers.iter().filter(|m| m.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn mover(&self, id: EntityId) -> Option<&Mover> {
        self.movers.get(id.index()).and_then(Option::as_ref)
    }

    /// Live movers in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Mover> {
        self.movers.iter().flatten()
    }

    // ── Per-mover controls ────────────────────────────────────────────────

    /// See [`Mover::set_destination`].
    pub fn set_destination(&mut self, id: EntityId, goal: TilePos) -> SimResult<bool> {
        let mover = Self::slot(&mut self.movers, id)?;
        let mut ctx = MoveContext::new(&self.grid, &mut self.reservations, &self.planner);
        Ok(mover.set_destination(goal, &mut ctx))
    }

    /// See [`Mover::is_path_available`].
    pub fn is_path_available(&self, id: EntityId, goal: TilePos) -> SimResult<bool> {
        let mover = self.mover(id).ok_or(SimError::EntityNotFound(id))?;
        let view = MoveView::new(&self.grid, &self.reservations, &self.planner);
        Ok(mover.is_path_available(goal, &view))
    }

    pub fn stop_moves(&mut self, id: EntityId) -> SimResult<()> {
        Self::slot(&mut self.movers, id)?.stop_moves();
        Ok(())
    }

    pub fn set_ignore_id(&mut self, id: EntityId, other: EntityId, on: bool) -> SimResult<()> {
        Self::slot(&mut self.movers, id)?.set_ignore_id(other, on);
        Ok(())
    }

    pub fn set_shared_ids<I: IntoIterator<Item = EntityId>>(&mut self, id: EntityId, ids: I) -> SimResult<()> {
        Self::slot(&mut self.movers, id)?.set_shared_ids(ids);
        Ok(())
    }

    // ── Tick loop ─────────────────────────────────────────────────────────

    /// Update every live mover once, then advance the clock.
    ///
    /// Returns each mover's outcome in the order the movers were visited.
    pub fn step<O: WorldObserver>(&mut self, observer: &mut O) -> Vec<(EntityId, MoveOutcome)> {
        let now = self.clock.current_tick;
        observer.on_tick_start(now);

        let mut order: Vec<usize> = (0..self.movers.len())
            .filter(|&i| self.movers[i].is_some())
            .collect();
        if self.config.update_order == UpdateOrder::Shuffled {
            self.rng.shuffle(&mut order);
        }

        let dt = self.clock.tick_secs;
        let mut outcomes = Vec::with_capacity(order.len());
        let mut moving = 0;
        for i in order {
            let Some(mover) = self.movers[i].as_mut() else {
                continue;
            };
            let mut ctx = MoveContext::new(&self.grid, &mut self.reservations, &self.planner);
            let outcome = mover.update(dt, &mut ctx);
            let id = mover.id();
            Self::notify(observer, now, id, outcome, &mut moving);
            outcomes.push((id, outcome));
        }

        observer.on_tick_end(now, moving);
        self.clock.advance();
        outcomes
    }

    /// Run exactly `n` ticks.
    pub fn run_ticks<O: WorldObserver>(&mut self, n: u64, observer: &mut O) {
        for _ in 0..n {
            self.step(observer);
        }
    }

    #[inline]
    pub fn current_tick(&self) -> Tick {
        self.clock.current_tick
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn slot(movers: &mut [Option<Mover>], id: EntityId) -> SimResult<&mut Mover> {
        movers
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(SimError::EntityNotFound(id))
    }

    fn notify<O: WorldObserver>(observer: &mut O, now: Tick, id: EntityId, outcome: MoveOutcome, moving: &mut usize) {
        match outcome {
            MoveOutcome::Moving => *moving += 1,
            MoveOutcome::ReachedWaypoint(tile) => {
                *moving += 1;
                observer.on_waypoint(now, id, tile);
            }
            MoveOutcome::Arrived(tile) => observer.on_arrival(now, id, tile),
            MoveOutcome::Idle | MoveOutcome::Waiting => {}
        }
    }
}
