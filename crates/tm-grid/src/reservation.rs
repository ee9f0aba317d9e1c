//! `ReservationTable`: which entity has claimed which tile.
//!
//! Movers claim the tile they are about to enter so that no other mover
//! enters it at the same time.  Each tile holds `Option<EntityId>`; `None`
//! is free.  Multi-tile entities claim a rectangular area anchored at its
//! top-left tile.
//!
//! # Single writer
//!
//! The table has no internal locking.  The scheduler updates movers one at a
//! time within a tick, and each mover always releases its old tile before
//! reserving the next, so a mover never holds two places at once.

use tm_core::{EntityId, TilePos};

use crate::grid::Grid;

/// Dense per-tile ownership map, the same shape as the grid it shadows.
#[derive(Clone, Debug)]
pub struct ReservationTable {
    width:  u32,
    height: u32,
    owners: Vec<Option<EntityId>>,
}

impl ReservationTable {
    /// An empty table of `width` x `height` tiles.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            owners: vec![None; width as usize * height as usize],
        }
    }

    /// An empty table matching `grid`'s dimensions.
    pub fn for_grid<G: Grid>(grid: &G) -> Self {
        Self::new(grid.width(), grid.height())
    }

    #[inline]
    fn index(&self, tile: TilePos) -> Option<usize> {
        let inside = tile.x >= 0
            && tile.y >= 0
            && (tile.x as u32) < self.width
            && (tile.y as u32) < self.height;
        inside.then(|| tile.y as usize * self.width as usize + tile.x as usize)
    }

    /// Every tile of the `w` x `h` area anchored at `tile`.
    fn area(tile: TilePos, w: u32, h: u32) -> impl Iterator<Item = TilePos> {
        (0..h as i32).flat_map(move |dy| (0..w as i32).map(move |dx| tile.offset(dx, dy)))
    }

    /// The owner of a single tile.  `None` when free or out of bounds.
    #[inline]
    pub fn occupant(&self, tile: TilePos) -> Option<EntityId> {
        self.index(tile).and_then(|i| self.owners[i])
    }

    /// `true` if every tile of the area is inside the table and either free
    /// or owned by `excluding`.
    pub fn is_area_free(&self, tile: TilePos, w: u32, h: u32, excluding: EntityId) -> bool {
        Self::area(tile, w, h).all(|t| match self.index(t) {
            None    => false,
            Some(i) => self.owners[i].is_none_or(|owner| owner == excluding),
        })
    }

    /// Distinct owners within the area, ascending.  Out-of-bounds tiles
    /// contribute nothing.
    pub fn occupants_in(&self, tile: TilePos, w: u32, h: u32) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = Self::area(tile, w, h)
            .filter_map(|t| self.occupant(t))
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Claim the whole area for `id`.
    ///
    /// All-or-nothing: succeeds only if every tile is in bounds and free or
    /// already owned by `id`.  Never takes a tile away from another owner.
    pub fn reserve_area(&mut self, tile: TilePos, w: u32, h: u32, id: EntityId) -> bool {
        if !self.is_area_free(tile, w, h, id) {
            return false;
        }
        for t in Self::area(tile, w, h) {
            if let Some(i) = self.index(t) {
                self.owners[i] = Some(id);
            }
        }
        true
    }

    /// Drop `id`'s claim on the area.  Tiles held by someone else (or by
    /// nobody) are left untouched, so releasing twice is harmless.
    pub fn release_area(&mut self, tile: TilePos, w: u32, h: u32, id: EntityId) {
        for t in Self::area(tile, w, h) {
            if let Some(i) = self.index(t) {
                if self.owners[i] == Some(id) {
                    self.owners[i] = None;
                }
            }
        }
    }

    /// Number of tiles currently claimed by anyone.
    pub fn reserved_count(&self) -> usize {
        self.owners.iter().filter(|o| o.is_some()).count()
    }

    /// Every tile currently claimed by `id`, row-major.
    pub fn tiles_of(&self, id: EntityId) -> Vec<TilePos> {
        self.owners
            .iter()
            .enumerate()
            .filter(|(_, o)| **o == Some(id))
            .map(|(i, _)| {
                let w = self.width as usize;
                TilePos::new((i % w) as i32, (i / w) as i32)
            })
            .collect()
    }
}
