//! The `Mover`: follows planned routes one tick at a time and keeps the
//! reservation table in step with its body.

use log::{debug, trace};
use rustc_hash::FxHashSet;

use tm_core::{EntityId, PixelPos, TilePos};
use tm_grid::{Grid, PathPlanner, ReservationTable, Route};

use crate::motion::{advance_axis, movement_vector};
use crate::{Body, MoveOutcome, MoverConfig, MoverError, MoverResult, MoverState, Velocity};

// ── MoveContext ───────────────────────────────────────────────────────────────

/// The collaborators a mover consults on each call.
///
/// Built by the scheduler per tick (or per call) from fields it owns.  The
/// reservation table is borrowed mutably because a mover releases and
/// reserves tiles as it advances; nothing else is written.
pub struct MoveContext<'a, G: Grid, P: PathPlanner> {
    pub grid:         &'a G,
    pub reservations: &'a mut ReservationTable,
    pub planner:      &'a P,
}

impl<'a, G: Grid, P: PathPlanner> MoveContext<'a, G, P> {
    pub fn new(grid: &'a G, reservations: &'a mut ReservationTable, planner: &'a P) -> Self {
        Self { grid, reservations, planner }
    }
}

/// Read-only counterpart of [`MoveContext`] for queries that plan without
/// committing anything.
pub struct MoveView<'a, G: Grid, P: PathPlanner> {
    pub grid:         &'a G,
    pub reservations: &'a ReservationTable,
    pub planner:      &'a P,
}

impl<'a, G: Grid, P: PathPlanner> MoveView<'a, G, P> {
    pub fn new(grid: &'a G, reservations: &'a ReservationTable, planner: &'a P) -> Self {
        Self { grid, reservations, planner }
    }
}

impl<G: Grid, P: PathPlanner> MoveContext<'_, G, P> {
    /// Reborrow as a [`MoveView`].
    pub fn view(&self) -> MoveView<'_, G, P> {
        MoveView::new(self.grid, &*self.reservations, self.planner)
    }
}

// ── Mover ─────────────────────────────────────────────────────────────────────

/// Moves one [`Body`] along planned routes.
///
/// # Type parameters on methods
///
/// `G: Grid` and `P: PathPlanner` are chosen per call through
/// [`MoveContext`], so one mover type serves any grid/planner pairing with no
/// dynamic dispatch.
#[derive(Debug, Clone)]
pub struct Mover {
    body:   Body,
    config: MoverConfig,
    state:  MoverState,
}

impl Mover {
    /// Validate `body` and `config` and create an idle mover.
    ///
    /// The body is not on the grid until [`place`](Self::place) is called.
    pub fn new(body: Body, config: MoverConfig) -> MoverResult<Self> {
        body.validate()?;
        config.validate()?;
        Ok(Self {
            body,
            config,
            state: MoverState::idle(TilePos::default()),
        })
    }

    // ── Queries ───────────────────────────────────────────────────────────

    #[inline]
    pub fn id(&self) -> EntityId {
        self.body.id
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn config(&self) -> &MoverConfig {
        &self.config
    }

    #[inline]
    pub fn position(&self) -> PixelPos {
        self.body.position
    }

    /// The tile containing the body's top-left corner.
    #[inline]
    pub fn current_tile<G: Grid>(&self, grid: &G) -> TilePos {
        grid.to_tile(self.body.position)
    }

    pub fn is_moving(&self) -> bool {
        self.state.moving
    }

    pub fn is_destination_reached(&self) -> bool {
        self.state.destination_reached
    }

    pub fn destination(&self) -> TilePos {
        self.state.destination
    }

    pub fn route(&self) -> Option<&Route> {
        self.state.route.as_ref()
    }

    pub fn step(&self) -> usize {
        self.state.step
    }

    pub fn effective_length(&self) -> usize {
        self.state.effective_length()
    }

    pub fn velocity(&self) -> Velocity {
        self.state.velocity
    }

    pub fn plan_count(&self) -> u32 {
        self.state.plan_count
    }

    pub fn is_stopped(&self) -> bool {
        self.state.stopped
    }

    pub fn is_replan_pending(&self) -> bool {
        self.state.replan_pending
    }

    pub fn held_tile(&self) -> Option<TilePos> {
        self.state.held
    }

    pub fn ignored_ids(&self) -> &FxHashSet<EntityId> {
        &self.state.ignored
    }

    pub fn shared_ids(&self) -> &FxHashSet<EntityId> {
        &self.state.shared
    }

    /// Footprint in tiles, at least 1x1.
    pub fn footprint<G: Grid>(&self, grid: &G) -> (u32, u32) {
        let w = (self.body.width / grid.tile_width()).ceil().max(1.0) as u32;
        let h = (self.body.height / grid.tile_height()).ceil().max(1.0) as u32;
        (w, h)
    }

    // ── Placement & teardown ──────────────────────────────────────────────

    /// Put an idle mover on `tile` and reserve it.
    ///
    /// # Errors
    ///
    /// Fails if the mover is following a route, the footprint leaves the
    /// grid or hits blocking terrain, or another entity holds any of it.
    pub fn place<G: Grid, P: PathPlanner>(
        &mut self,
        tile: TilePos,
        ctx:  &mut MoveContext<'_, G, P>,
    ) -> MoverResult<()> {
        if self.state.route.is_some() {
            return Err(MoverError::InTransit(self.body.id));
        }
        if !ctx.grid.contains(tile) {
            return Err(tm_grid::GridError::OutOfBounds(tile).into());
        }
        if self.terrain_blocks(tile, ctx.grid) {
            return Err(MoverError::TileBlocked(tile));
        }
        let (w, h) = self.footprint(ctx.grid);
        if !ctx.reservations.is_area_free(tile, w, h, self.body.id) {
            let by = self.others_in(tile, ctx.grid, ctx.reservations);
            return Err(MoverError::TileOccupied { tile, by });
        }

        self.body.position = ctx.grid.to_pixel(tile);
        self.reserve(tile, ctx);
        self.state.destination = tile;
        Ok(())
    }

    /// Owner teardown: drop the route and every reservation this mover holds.
    pub fn retire<G: Grid, P: PathPlanner>(&mut self, ctx: &mut MoveContext<'_, G, P>) {
        if let Some(held) = self.state.held {
            self.release(held, ctx);
        }
        let here = self.current_tile(ctx.grid);
        self.release(here, ctx);
        self.state.route = None;
        self.state.moving = false;
        self.state.velocity = Velocity::ZERO;
    }

    /// Copy of the path state, for persistence.  Reservations are not part
    /// of it.
    pub fn snapshot(&self) -> MoverState {
        self.state.clone()
    }

    /// Replace the path state with `state` and re-claim its held tile.
    pub fn restore<G: Grid, P: PathPlanner>(
        &mut self,
        state: MoverState,
        ctx:   &mut MoveContext<'_, G, P>,
    ) {
        if let Some(held) = self.state.held {
            self.release(held, ctx);
        }
        let held = state.held;
        self.state = state;
        self.state.held = None;
        if let Some(tile) = held {
            self.reserve(tile, ctx);
        }
    }

    /// Restore the body's pixel position alongside [`restore`](Self::restore).
    pub fn set_position(&mut self, position: PixelPos) {
        self.body.position = position;
    }

    // ── Controls ──────────────────────────────────────────────────────────

    /// Ask to travel to `goal`.
    ///
    /// Returns `true` only when a plan was made right now.  A goal equal to
    /// the current tile is ignored (`false`).  While a route is being
    /// followed the goal is stored and a replan is deferred to the next
    /// waypoint (`false`).  A plan that finds no path leaves the mover idle
    /// with a stop requested; it is not an error.
    pub fn set_destination<G: Grid, P: PathPlanner>(
        &mut self,
        goal: TilePos,
        ctx:  &mut MoveContext<'_, G, P>,
    ) -> bool {
        if goal == self.current_tile(ctx.grid) {
            return false;
        }
        self.state.destination = goal;

        if self.state.route.is_some() {
            self.state.replan_pending = true;
            return false;
        }

        self.state.stop_requested = false;
        self.state.stopped = false;
        self.state.skip_one_tick = false;
        self.state.recheck_reservation = false;
        self.plan(ctx);
        true
    }

    /// `true` if the planner can make progress toward `goal` from here.
    /// Does not change any state.
    pub fn is_path_available<G: Grid, P: PathPlanner>(
        &self,
        goal: TilePos,
        view: &MoveView<'_, G, P>,
    ) -> bool {
        let start = self.current_tile(view.grid);
        let blocked = |t: TilePos| self.is_blocked_for_self(t, view.grid, view.reservations);
        view.planner.find_path(start, goal, false, &blocked).is_some()
    }

    /// Stop at the current cursor.  Takes effect on the next update, which
    /// then arrives.  Cancels a deferred destination change made before
    /// this call; one made after it is planned for on arrival.
    pub fn stop_moves(&mut self) {
        self.state.stop_requested = true;
        self.state.replan_pending = false;
    }

    /// Add or remove `id` from the ignored set.  Tiles already reserved are
    /// unaffected.
    pub fn set_ignore_id(&mut self, id: EntityId, on: bool) {
        if on {
            self.state.ignored.insert(id);
        } else {
            self.state.ignored.remove(&id);
        }
    }

    /// Replace the shared set.  This mover's own id is never included.
    pub fn set_shared_ids<I: IntoIterator<Item = EntityId>>(&mut self, ids: I) {
        let own = self.body.id;
        self.state.shared = ids.into_iter().filter(|&id| id != own).collect();
    }

    // ── Tick ──────────────────────────────────────────────────────────────

    /// Advance by `dt` seconds.
    pub fn update<G: Grid, P: PathPlanner>(
        &mut self,
        dt:  f64,
        ctx: &mut MoveContext<'_, G, P>,
    ) -> MoveOutcome {
        if self.state.stop_requested {
            self.state.stop_requested = false;
            self.state.stopped = true;
        }

        if self.state.recheck_reservation {
            self.state.recheck_reservation = false;
            let step = self.state.step;
            self.update_reservation(step, step + 1, ctx);
        }

        if self.state.skip_one_tick {
            self.state.skip_one_tick = false;
            self.state.recheck_reservation = true;
            return MoveOutcome::Waiting;
        }

        let Some(route) = self.state.route.as_ref() else {
            return MoveOutcome::Idle;
        };

        if self.state.step < self.state.effective_length() {
            match route.get(self.state.step) {
                Some(target) => self.move_toward(dt, target, ctx),
                None         => self.arrive(ctx),
            }
        } else {
            self.arrive(ctx)
        }
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn move_toward<G: Grid, P: PathPlanner>(
        &mut self,
        dt:     f64,
        target: TilePos,
        ctx:    &mut MoveContext<'_, G, P>,
    ) -> MoveOutcome {
        let goal_px = ctx.grid.to_pixel(target);
        let pos = self.body.position;
        let v = movement_vector(pos, goal_px, self.config.speed, self.config.diagonal_factor);

        let (x, arrived_x) = advance_axis(pos.x, goal_px.x, v.x * dt);
        let (y, arrived_y) = advance_axis(pos.y, goal_px.y, v.y * dt);
        self.body.position = PixelPos::new(x, y);
        self.state.velocity = v;
        self.state.moving = true;

        if !(arrived_x && arrived_y) {
            return MoveOutcome::Moving;
        }

        self.body.position = goal_px;
        let old = self.state.step;
        let new = old + 1;
        trace!("{}: reached waypoint {} ({target})", self.body.id, old);
        self.update_reservation(old, new, ctx);

        let halted = self.state.stop_requested || self.state.stopped;
        let skip = self.state.skip_one_tick;
        if !halted && !skip {
            self.state.step = new;
        }
        if self.state.step > 0 && !skip && !halted && self.state.replan_pending {
            debug!("{}: replanning toward {}", self.body.id, self.state.destination);
            self.plan(ctx);
        }

        if skip {
            MoveOutcome::Waiting
        } else {
            MoveOutcome::ReachedWaypoint(target)
        }
    }

    /// Hand the reservation from `route[last]` to `route[next]`, or resolve
    /// the conflict if `route[next]` is taken.
    fn update_reservation<G: Grid, P: PathPlanner>(
        &mut self,
        last: usize,
        next: usize,
        ctx:  &mut MoveContext<'_, G, P>,
    ) {
        let max = self.state.effective_length();
        if next >= max {
            return;
        }
        let Some(route) = self.state.route.as_ref() else {
            return;
        };
        let (Some(from), Some(to)) = (route.get(last), route.get(next)) else {
            return;
        };

        let id = self.body.id;
        let (w, h) = self.footprint(ctx.grid);
        if ctx.reservations.is_area_free(to, w, h, id) {
            if !self.state.replan_pending {
                self.release(from, ctx);
                self.reserve(to, ctx);
            }
            return;
        }

        let others = self.others_in(to, ctx.grid, ctx.reservations);
        let all_in = |set: &FxHashSet<EntityId>| {
            !others.is_empty() && others.iter().all(|o| set.contains(o))
        };

        if next == max - 1 {
            if self.state.replan_pending {
                trace!("{id}: final tile {to} held by {others:?}; pending replan takes over");
            } else {
                debug!("{id}: final tile {to} held by {others:?}; stopping");
                self.state.stop_requested = true;
            }
        } else if all_in(&self.state.shared) {
            trace!("{id}: {to} held by shared {others:?}; retrying");
            let goal = self.state.destination;
            self.set_destination(goal, ctx);
            self.state.skip_one_tick = true;
        } else if !all_in(&self.state.ignored) {
            debug!("{id}: {to} held by {others:?}; requesting replan");
            let goal = self.state.destination;
            self.set_destination(goal, ctx);
        } else if !self.state.replan_pending {
            self.release(from, ctx);
            self.reserve(to, ctx);
        }
    }

    /// Plan from the current tile to `state.destination` and start
    /// following the result.
    fn plan<G: Grid, P: PathPlanner>(&mut self, ctx: &mut MoveContext<'_, G, P>) {
        let start = self.current_tile(ctx.grid);
        let goal = self.state.destination;
        let route = {
            let grid = ctx.grid;
            let table: &ReservationTable = &*ctx.reservations;
            let blocked = |t: TilePos| self.is_blocked_for_self(t, grid, table);
            ctx.planner.find_path(start, goal, true, &blocked)
        };

        self.state.plan_count += 1;
        self.state.step = 0;
        self.state.replan_pending = false;
        self.state.destination_reached = false;

        match route {
            Some(route) => {
                debug!("{}: route {start} -> {goal}, {} tiles", self.body.id, route.len());
                if let Some(first) = route.get(0) {
                    self.reserve(first, ctx);
                }
                self.state.route = Some(route);
            }
            None => {
                debug!("{}: no path {start} -> {goal}", self.body.id);
                self.state.route = None;
                self.state.stop_requested = true;
                self.state.moving = false;
                self.state.velocity = Velocity::ZERO;
            }
        }
    }

    /// Finish the current route.  A destination stored while the route was
    /// being stopped is planned for straight away.
    fn arrive<G: Grid, P: PathPlanner>(&mut self, ctx: &mut MoveContext<'_, G, P>) -> MoveOutcome {
        let here = self.current_tile(ctx.grid);
        debug!("{}: arrived at {here}", self.body.id);
        self.state.route = None;
        self.state.destination_reached = true;
        self.state.moving = false;
        self.state.velocity = Velocity::ZERO;
        self.state.shared.clear();

        let redirect = self.state.replan_pending && self.state.destination != here;
        self.state.replan_pending = false;
        if redirect {
            debug!("{}: planning toward stored goal {}", self.body.id, self.state.destination);
            self.state.stop_requested = false;
            self.state.stopped = false;
            self.state.skip_one_tick = false;
            self.state.recheck_reservation = false;
            self.plan(ctx);
        }
        MoveOutcome::Arrived(here)
    }

    /// Claim `tile`, letting go of whatever was held before.
    fn reserve<G: Grid, P: PathPlanner>(&mut self, tile: TilePos, ctx: &mut MoveContext<'_, G, P>) {
        if let Some(prev) = self.state.held {
            if prev != tile {
                self.release(prev, ctx);
            }
        }
        let (w, h) = self.footprint(ctx.grid);
        if ctx.reservations.reserve_area(tile, w, h, self.body.id) {
            self.state.held = Some(tile);
        } else {
            trace!("{}: could not reserve {tile}", self.body.id);
        }
    }

    fn release<G: Grid, P: PathPlanner>(&mut self, tile: TilePos, ctx: &mut MoveContext<'_, G, P>) {
        let (w, h) = self.footprint(ctx.grid);
        ctx.reservations.release_area(tile, w, h, self.body.id);
        if self.state.held == Some(tile) {
            self.state.held = None;
        }
    }

    fn terrain_blocks<G: Grid>(&self, tile: TilePos, grid: &G) -> bool {
        let (w, h) = self.footprint(grid);
        (0..h as i32).any(|dy| {
            (0..w as i32).any(|dx| grid.is_blocked(tile.offset(dx, dy), self.config.category))
        })
    }

    /// Other entities holding any tile of this mover's footprint at `tile`.
    fn others_in<G: Grid>(&self, tile: TilePos, grid: &G, table: &ReservationTable) -> Vec<EntityId> {
        let (w, h) = self.footprint(grid);
        table
            .occupants_in(tile, w, h)
            .into_iter()
            .filter(|&o| o != self.body.id)
            .collect()
    }

    /// The planner's blocking predicate, bound to this mover: terrain for
    /// its category, plus any reservation not owned by itself or an ignored
    /// entity.
    fn is_blocked_for_self<G: Grid>(&self, tile: TilePos, grid: &G, table: &ReservationTable) -> bool {
        self.terrain_blocks(tile, grid)
            || self
                .others_in(tile, grid, table)
                .iter()
                .any(|o| !self.state.ignored.contains(o))
    }
}
