//! Fluent builder for constructing a [`World`].

use tm_core::{SimRng, WorldConfig};
use tm_grid::{Grid, PathPlanner, ReservationTable};

use crate::{SimError, SimResult, World};

/// Fluent builder for [`World<G, P>`].
///
/// # Required inputs
///
/// - [`WorldConfig`]: tick duration, seed, update order
/// - `G: Grid`: the map (e.g. a [`tm_grid::TileGrid`])
/// - `P: PathPlanner`: the planner (e.g. [`tm_grid::AStarPlanner`])
///
/// # Optional inputs (have defaults)
///
/// | Method             | Default                    |
/// |--------------------|----------------------------|
/// | `.capacity(n)`     | No pre-allocated slots     |
///
/// # Example
///
/// ```rust,ignore
/// let grid = load_grid_csv(Path::new("map.csv"), 32.0, 32.0)?;
/// let mut world = WorldBuilder::new(WorldConfig::default(), grid, AStarPlanner::default())
///     .build()?;
/// let id = world.spawn(TilePos::new(1, 1), (32.0, 32.0), MoverConfig::default())?;
/// world.set_destination(id, TilePos::new(9, 4))?;
/// world.run_ticks(120, &mut NoopObserver);
/// ```
pub struct WorldBuilder<G: Grid, P: PathPlanner> {
    config:   WorldConfig,
    grid:     G,
    planner:  P,
    capacity: usize,
}

impl<G: Grid, P: PathPlanner> WorldBuilder<G, P> {
    pub fn new(config: WorldConfig, grid: G, planner: P) -> Self {
        Self { config, grid, planner, capacity: 0 }
    }

    /// Pre-allocate room for `n` movers.
    pub fn capacity(mut self, n: usize) -> Self {
        self.capacity = n;
        self
    }

    /// Validate the configuration and return an empty [`World`].
    pub fn build(self) -> SimResult<World<G, P>> {
        let secs = self.config.tick_secs;
        if !(secs.is_finite() && secs > 0.0) {
            return Err(SimError::Config(format!(
                "tick_secs must be positive and finite, got {secs}"
            )));
        }

        let reservations = ReservationTable::for_grid(&self.grid);
        Ok(World {
            clock:   self.config.make_clock(),
            rng:     SimRng::new(self.config.seed),
            config:  self.config,
            grid:    self.grid,
            reservations,
            planner: self.planner,
            movers:  Vec::with_capacity(self.capacity),
        })
    }
}
