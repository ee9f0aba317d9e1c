//! Tile grid representation and builder.
//!
//! # Data layout
//!
//! Terrain is stored row-major in a single `Vec<Terrain>`:
//!
//! ```text
//! terrain[ y * width + x ]
//! ```
//!
//! The grid is read-only from a mover's point of view except through
//! [`TileGrid::set_terrain`], which lets the host block or open tiles at
//! runtime.  Movers notice such changes on their next replan.

use tm_core::{MoveCategory, PixelPos, TilePos};

use crate::{GridError, GridResult};

// ── Terrain ───────────────────────────────────────────────────────────────────

/// What a tile is made of.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Terrain {
    #[default]
    Floor,
    Wall,
    Water,
}

impl Terrain {
    /// `true` if this terrain stops an entity of `category`.
    #[inline]
    pub fn blocks(self, category: MoveCategory) -> bool {
        match (self, category) {
            (_, MoveCategory::Flying)           => false,
            (Terrain::Floor, _)                 => false,
            (Terrain::Wall, _)                  => true,
            (Terrain::Water, MoveCategory::Ground) => true,
            (Terrain::Water, _)                 => false,
        }
    }

    /// Map-file symbol: `.` floor, `#` wall, `~` water.
    pub fn from_symbol(s: &str) -> Option<Terrain> {
        match s {
            "." => Some(Terrain::Floor),
            "#" => Some(Terrain::Wall),
            "~" => Some(Terrain::Water),
            _   => None,
        }
    }
}

// ── Grid contract ─────────────────────────────────────────────────────────────

/// Read-only view of a tile grid: dimensions, tile size, and the
/// per-category blocking predicate.
///
/// Implement this to drive movers over a map representation of your own;
/// [`TileGrid`] is the stock implementation.  Tile `(x, y)` has its pixel
/// origin at `(x * tile_width, y * tile_height)`.
pub trait Grid {
    /// Width in tiles.
    fn width(&self) -> u32;

    /// Height in tiles.
    fn height(&self) -> u32;

    /// Tile width in pixels.  Always positive.
    fn tile_width(&self) -> f64;

    /// Tile height in pixels.  Always positive.
    fn tile_height(&self) -> f64;

    /// `true` if terrain at `tile` stops `category`.  Tiles outside the grid
    /// are blocked for everyone.
    fn is_blocked(&self, tile: TilePos, category: MoveCategory) -> bool;

    #[inline]
    fn contains(&self, tile: TilePos) -> bool {
        tile.x >= 0
            && tile.y >= 0
            && (tile.x as u32) < self.width()
            && (tile.y as u32) < self.height()
    }

    /// The tile whose area contains pixel `pos`.
    #[inline]
    fn to_tile(&self, pos: PixelPos) -> TilePos {
        TilePos::new(
            (pos.x / self.tile_width()).floor() as i32,
            (pos.y / self.tile_height()).floor() as i32,
        )
    }

    /// Pixel origin (top-left corner) of `tile`.
    #[inline]
    fn to_pixel(&self, tile: TilePos) -> PixelPos {
        PixelPos::new(
            tile.x as f64 * self.tile_width(),
            tile.y as f64 * self.tile_height(),
        )
    }
}

// ── TileGrid ──────────────────────────────────────────────────────────────────

/// Rectangular tile map with one [`Terrain`] per cell.
///
/// Do not construct directly; use [`TileGridBuilder`] or
/// [`load_grid_csv`][crate::load_grid_csv].
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileGrid {
    width:       u32,
    height:      u32,
    tile_width:  f64,
    tile_height: f64,
    terrain:     Vec<Terrain>,
}

impl TileGrid {
    /// All-floor grid.  Shorthand for the builder with no terrain overrides.
    pub fn open(width: u32, height: u32, tile_width: f64, tile_height: f64) -> GridResult<Self> {
        TileGridBuilder::new(width, height)
            .tile_size(tile_width, tile_height)
            .build()
    }

    #[inline]
    fn index(&self, tile: TilePos) -> Option<usize> {
        self.contains(tile)
            .then(|| tile.y as usize * self.width as usize + tile.x as usize)
    }

    /// Terrain at `tile`, or `None` outside the grid.
    pub fn terrain(&self, tile: TilePos) -> Option<Terrain> {
        self.index(tile).map(|i| self.terrain[i])
    }

    /// Change the terrain of one tile at runtime.
    pub fn set_terrain(&mut self, tile: TilePos, terrain: Terrain) -> GridResult<()> {
        let i = self.index(tile).ok_or(GridError::OutOfBounds(tile))?;
        self.terrain[i] = terrain;
        Ok(())
    }
}

impl Grid for TileGrid {
    fn width(&self) -> u32 { self.width }
    fn height(&self) -> u32 { self.height }
    fn tile_width(&self) -> f64 { self.tile_width }
    fn tile_height(&self) -> f64 { self.tile_height }

    fn is_blocked(&self, tile: TilePos, category: MoveCategory) -> bool {
        match self.terrain(tile) {
            Some(t) => t.blocks(category),
            None    => true,
        }
    }
}

// ── TileGridBuilder ───────────────────────────────────────────────────────────

/// Construct a [`TileGrid`], then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use tm_core::TilePos;
/// use tm_grid::{Grid, Terrain, TileGridBuilder};
///
/// let grid = TileGridBuilder::new(4, 3)
///     .tile_size(32.0, 32.0)
///     .terrain(TilePos::new(1, 1), Terrain::Wall)
///     .build()
///     .unwrap();
/// assert_eq!(grid.width(), 4);
/// assert_eq!(grid.terrain(TilePos::new(1, 1)), Some(Terrain::Wall));
/// ```
pub struct TileGridBuilder {
    width:       u32,
    height:      u32,
    tile_width:  f64,
    tile_height: f64,
    cells:       Option<Vec<Terrain>>,
    overrides:   Vec<(TilePos, Terrain)>,
}

impl TileGridBuilder {
    /// Start a `width` x `height` grid of floor with 32 px square tiles.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            tile_width:  32.0,
            tile_height: 32.0,
            cells:       None,
            overrides:   Vec::new(),
        }
    }

    pub fn tile_size(mut self, width: f64, height: f64) -> Self {
        self.tile_width = width;
        self.tile_height = height;
        self
    }

    /// Set the terrain of one tile.  Out-of-bounds tiles fail at `build`.
    pub fn terrain(mut self, tile: TilePos, terrain: Terrain) -> Self {
        self.overrides.push((tile, terrain));
        self
    }

    /// Supply every cell at once, row-major.  Used by the map loader.
    pub(crate) fn cells(mut self, cells: Vec<Terrain>) -> Self {
        self.cells = Some(cells);
        self
    }

    /// Validate and produce the grid.
    pub fn build(self) -> GridResult<TileGrid> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(self.tile_width) || !valid(self.tile_height) {
            return Err(GridError::InvalidTileSize {
                width:  self.tile_width,
                height: self.tile_height,
            });
        }
        if self.width == 0 || self.height == 0 {
            return Err(GridError::EmptyGrid { width: self.width, height: self.height });
        }

        let len = self.width as usize * self.height as usize;
        let terrain = match self.cells {
            Some(cells) if cells.len() != len => {
                return Err(GridError::Parse(format!(
                    "expected {len} cells for a {}x{} grid, got {}",
                    self.width, self.height, cells.len()
                )));
            }
            Some(cells) => cells,
            None        => vec![Terrain::Floor; len],
        };

        let mut grid = TileGrid {
            width:       self.width,
            height:      self.height,
            tile_width:  self.tile_width,
            tile_height: self.tile_height,
            terrain,
        };
        for (tile, t) in self.overrides {
            grid.set_terrain(tile, t)?;
        }
        Ok(grid)
    }
}
