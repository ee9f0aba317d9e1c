//! Planning trait and default A* implementation.
//!
//! # Pluggability
//!
//! Movers call planning through the [`PathPlanner`] trait, so applications
//! can swap in a custom search (jump-point search, cached flow fields, a
//! deadline-aware planner for very large maps) without touching the
//! controller.  The default [`AStarPlanner`] delegates the search itself to
//! the `pathfinding` crate.
//!
//! # Blocking predicate
//!
//! The planner knows nothing about terrain or other entities.  The caller
//! passes `blocked(tile)`, already bound to the requesting mover: it must
//! return `true` for every tile outside the grid, which is what keeps the
//! search finite.
//!
//! # Cost units
//!
//! Straight steps cost 10, diagonal steps 14 (≈ 10·√2), so the octile
//! heuristic stays integral and admissible.

use pathfinding::prelude::{astar, bfs_reach};

use tm_core::TilePos;

// ── Route ─────────────────────────────────────────────────────────────────────

/// An ordered list of tiles from the start tile (inclusive) to the goal.
///
/// Produced once by a planner and never mutated; a replan replaces it
/// wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    tiles: Vec<TilePos>,
    cost:  u32,
}

impl Route {
    pub fn new(tiles: Vec<TilePos>, cost: u32) -> Self {
        Self { tiles, cost }
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    #[inline]
    pub fn get(&self, step: usize) -> Option<TilePos> {
        self.tiles.get(step).copied()
    }

    pub fn tiles(&self) -> &[TilePos] {
        &self.tiles
    }

    /// Last tile of the route, i.e. where a mover following it ends up.
    pub fn last(&self) -> Option<TilePos> {
        self.tiles.last().copied()
    }

    /// Total search cost (10 per straight step, 14 per diagonal step).
    pub fn cost(&self) -> u32 {
        self.cost
    }
}

// ── PathPlanner trait ─────────────────────────────────────────────────────────

/// Pluggable route planner.
///
/// Implementations must be pure with respect to the requesting mover: the
/// only thing they learn about it is the `blocked` predicate.
pub trait PathPlanner {
    /// Plan a route from `start` to `goal`.
    ///
    /// With `exact = true` the route must end on `goal`; `None` means no such
    /// route exists.  With `exact = false` the planner may settle for the
    /// reachable tile closest to `goal`; `None` then means no progress toward
    /// `goal` is possible at all.
    ///
    /// `start` itself is never tested against `blocked`.
    fn find_path(
        &self,
        start:   TilePos,
        goal:    TilePos,
        exact:   bool,
        blocked: &dyn Fn(TilePos) -> bool,
    ) -> Option<Route>;
}

// ── AStarPlanner ──────────────────────────────────────────────────────────────

const STRAIGHT_COST: u32 = 10;
const DIAGONAL_COST: u32 = 14;

const ORTHOGONAL: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const DIAGONAL:   [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// A* over the implicit tile graph.
///
/// | Option           | Default  | Effect                                          |
/// |------------------|----------|-------------------------------------------------|
/// | `allow_diagonal` | `true`   | 8-connected instead of 4-connected              |
/// | `corner_cutting` | `false`  | allow a diagonal step past a blocked orthogonal |
/// | `search_limit`   | `65_536` | tiles visited by the closest-reachable fallback |
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AStarPlanner {
    pub allow_diagonal: bool,
    pub corner_cutting: bool,
    pub search_limit:   usize,
}

impl Default for AStarPlanner {
    fn default() -> Self {
        Self {
            allow_diagonal: true,
            corner_cutting: false,
            search_limit:   65_536,
        }
    }
}

impl AStarPlanner {
    /// 4-connected planner (no diagonal steps).
    pub fn orthogonal() -> Self {
        Self { allow_diagonal: false, ..Self::default() }
    }

    fn successors(&self, tile: TilePos, blocked: &dyn Fn(TilePos) -> bool) -> Vec<(TilePos, u32)> {
        let mut out = Vec::with_capacity(8);
        for (dx, dy) in ORTHOGONAL {
            let next = tile.offset(dx, dy);
            if !blocked(next) {
                out.push((next, STRAIGHT_COST));
            }
        }
        if self.allow_diagonal {
            for (dx, dy) in DIAGONAL {
                let next = tile.offset(dx, dy);
                if blocked(next) {
                    continue;
                }
                if !self.corner_cutting
                    && (blocked(tile.offset(dx, 0)) || blocked(tile.offset(0, dy)))
                {
                    continue;
                }
                out.push((next, DIAGONAL_COST));
            }
        }
        out
    }

    /// Octile distance when diagonals are allowed, Manhattan otherwise.
    fn heuristic(&self, from: TilePos, to: TilePos) -> u32 {
        let dx = from.x.abs_diff(to.x);
        let dy = from.y.abs_diff(to.y);
        if self.allow_diagonal {
            STRAIGHT_COST * dx.max(dy) + (DIAGONAL_COST - STRAIGHT_COST) * dx.min(dy)
        } else {
            STRAIGHT_COST * (dx + dy)
        }
    }

    fn search(&self, start: TilePos, goal: TilePos, blocked: &dyn Fn(TilePos) -> bool) -> Option<Route> {
        astar(
            &start,
            |&t| self.successors(t, blocked),
            |&t| self.heuristic(t, goal),
            |&t| t == goal,
        )
        .map(|(tiles, cost)| Route::new(tiles, cost))
    }

    /// The reachable tile closest to `goal` by heuristic distance.  Ties go
    /// to the tile discovered first (i.e. nearer to `start`).
    fn closest_reachable(&self, start: TilePos, goal: TilePos, blocked: &dyn Fn(TilePos) -> bool) -> TilePos {
        bfs_reach(start, |&t| {
            self.successors(t, blocked).into_iter().map(|(n, _)| n).collect::<Vec<_>>()
        })
        .take(self.search_limit)
        .min_by_key(|&t| self.heuristic(t, goal))
        .unwrap_or(start)
    }
}

impl PathPlanner for AStarPlanner {
    fn find_path(
        &self,
        start:   TilePos,
        goal:    TilePos,
        exact:   bool,
        blocked: &dyn Fn(TilePos) -> bool,
    ) -> Option<Route> {
        if start == goal {
            return Some(Route::new(vec![start], 0));
        }

        if let Some(route) = self.search(start, goal, blocked) {
            log::trace!("planned {start} -> {goal}: {} tiles, cost {}", route.len(), route.cost());
            return Some(route);
        }
        if exact {
            log::trace!("no route {start} -> {goal}");
            return None;
        }

        let nearest = self.closest_reachable(start, goal, blocked);
        if nearest == start {
            log::trace!("no progress possible from {start} toward {goal}");
            return None;
        }
        log::trace!("goal {goal} unreachable from {start}; settling for {nearest}");
        self.search(start, nearest, blocked)
    }
}
