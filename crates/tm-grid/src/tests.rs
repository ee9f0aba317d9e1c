//! Unit tests for tm-grid.
//!
//! All tests use hand-built grids so they run without any map file.

#[cfg(test)]
mod helpers {
    use tm_core::{MoveCategory, TilePos};
    use crate::{Grid, ReservationTable, Terrain, TileGrid, TileGridBuilder};

    /// 5x3 grid with a wall column at x = 2, open only at y = 2.
    ///
    /// ```text
    /// . . # . .
    /// . . # . .
    /// . . . . .
    /// ```
    pub fn gate_grid() -> TileGrid {
        TileGridBuilder::new(5, 3)
            .tile_size(16.0, 16.0)
            .terrain(TilePos::new(2, 0), Terrain::Wall)
            .terrain(TilePos::new(2, 1), Terrain::Wall)
            .build()
            .unwrap()
    }

    /// Blocking predicate for a ground mover that treats every reserved tile
    /// as an obstacle.
    pub fn ground_blocked<'a>(
        grid: &'a TileGrid,
        table: &'a ReservationTable,
    ) -> impl Fn(TilePos) -> bool + 'a {
        move |t| grid.is_blocked(t, MoveCategory::Ground) || table.occupant(t).is_some()
    }
}

// ── Grid & builder ────────────────────────────────────────────────────────────

#[cfg(test)]
mod grid {
    use tm_core::{MoveCategory, PixelPos, TilePos};
    use crate::{Grid, GridError, Terrain, TileGrid, TileGridBuilder};

    #[test]
    fn open_grid_dimensions() {
        let g = TileGrid::open(4, 3, 32.0, 24.0).unwrap();
        assert_eq!(g.width(), 4);
        assert_eq!(g.height(), 3);
        assert_eq!(g.tile_width(), 32.0);
        assert_eq!(g.tile_height(), 24.0);
        assert_eq!(g.terrain(TilePos::new(3, 2)), Some(Terrain::Floor));
    }

    #[test]
    fn tile_pixel_conversion() {
        let g = TileGrid::open(10, 10, 32.0, 16.0).unwrap();
        assert_eq!(g.to_pixel(TilePos::new(3, 2)), PixelPos::new(96.0, 32.0));
        assert_eq!(g.to_tile(PixelPos::new(96.0, 32.0)), TilePos::new(3, 2));
        // Anywhere inside the tile maps back to it.
        assert_eq!(g.to_tile(PixelPos::new(127.9, 47.9)), TilePos::new(3, 2));
        assert_eq!(g.to_tile(PixelPos::new(-0.5, 0.0)), TilePos::new(-1, 0));
    }

    #[test]
    fn out_of_bounds_is_blocked_for_everyone() {
        let g = TileGrid::open(2, 2, 8.0, 8.0).unwrap();
        assert!(!g.contains(TilePos::new(2, 0)));
        assert!(g.is_blocked(TilePos::new(2, 0), MoveCategory::Flying));
        assert!(g.is_blocked(TilePos::new(0, -1), MoveCategory::Ground));
    }

    #[test]
    fn terrain_blocks_by_category() {
        assert!(Terrain::Wall.blocks(MoveCategory::Ground));
        assert!(Terrain::Wall.blocks(MoveCategory::Amphibious));
        assert!(!Terrain::Wall.blocks(MoveCategory::Flying));
        assert!(Terrain::Water.blocks(MoveCategory::Ground));
        assert!(!Terrain::Water.blocks(MoveCategory::Amphibious));
        assert!(!Terrain::Floor.blocks(MoveCategory::Ground));
    }

    #[test]
    fn set_terrain_at_runtime() {
        let mut g = TileGrid::open(3, 3, 8.0, 8.0).unwrap();
        g.set_terrain(TilePos::new(1, 1), Terrain::Water).unwrap();
        assert!(g.is_blocked(TilePos::new(1, 1), MoveCategory::Ground));
        assert!(matches!(
            g.set_terrain(TilePos::new(3, 0), Terrain::Wall),
            Err(GridError::OutOfBounds(_))
        ));
    }

    #[test]
    fn non_positive_tile_size_rejected() {
        let r = TileGridBuilder::new(2, 2).tile_size(0.0, 8.0).build();
        assert!(matches!(r, Err(GridError::InvalidTileSize { .. })));
        let r = TileGridBuilder::new(2, 2).tile_size(8.0, f64::NAN).build();
        assert!(matches!(r, Err(GridError::InvalidTileSize { .. })));
    }

    #[test]
    fn empty_grid_rejected() {
        let r = TileGridBuilder::new(0, 5).build();
        assert!(matches!(r, Err(GridError::EmptyGrid { .. })));
    }

    #[test]
    fn out_of_bounds_override_rejected() {
        let r = TileGridBuilder::new(2, 2)
            .terrain(TilePos::new(5, 5), Terrain::Wall)
            .build();
        assert!(matches!(r, Err(GridError::OutOfBounds(_))));
    }
}

// ── Map loader ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Write;

    use tm_core::TilePos;
    use crate::{load_grid_csv, load_grid_reader, Grid, GridError, Terrain};

    const MAP: &str = "\
.,.,#
.,~,#
.,., .
";

    #[test]
    fn reads_symbols_row_major() {
        let g = load_grid_reader(MAP.as_bytes(), 16.0, 16.0).unwrap();
        assert_eq!((g.width(), g.height()), (3, 3));
        assert_eq!(g.terrain(TilePos::new(2, 0)), Some(Terrain::Wall));
        assert_eq!(g.terrain(TilePos::new(1, 1)), Some(Terrain::Water));
        assert_eq!(g.terrain(TilePos::new(2, 2)), Some(Terrain::Floor));
    }

    #[test]
    fn ragged_rows_rejected() {
        let r = load_grid_reader(".,.\n.\n".as_bytes(), 16.0, 16.0);
        assert!(matches!(r, Err(GridError::Parse(_))));
    }

    #[test]
    fn unknown_symbol_rejected() {
        let r = load_grid_reader(".,X\n".as_bytes(), 16.0, 16.0);
        match r {
            Err(GridError::Parse(msg)) => assert!(msg.contains("\"X\""), "{msg}"),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn empty_input_is_an_empty_grid_error() {
        let r = load_grid_reader("".as_bytes(), 16.0, 16.0);
        assert!(matches!(r, Err(GridError::EmptyGrid { .. })));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MAP.as_bytes()).unwrap();
        let g = load_grid_csv(file.path(), 8.0, 8.0).unwrap();
        assert_eq!(g.tile_width(), 8.0);
        assert_eq!(g.terrain(TilePos::new(1, 1)), Some(Terrain::Water));
    }

    #[test]
    fn missing_file_is_io_error() {
        let r = load_grid_csv(std::path::Path::new("/definitely/not/here.csv"), 8.0, 8.0);
        assert!(matches!(r, Err(GridError::Io(_))));
    }
}

// ── Reservation table ─────────────────────────────────────────────────────────

#[cfg(test)]
mod reservation {
    use tm_core::{EntityId, TilePos};
    use crate::ReservationTable;

    const A: EntityId = EntityId(1);
    const B: EntityId = EntityId(2);

    #[test]
    fn reserve_and_query() {
        let mut t = ReservationTable::new(4, 4);
        assert!(t.reserve_area(TilePos::new(1, 1), 1, 1, A));
        assert_eq!(t.occupant(TilePos::new(1, 1)), Some(A));
        assert!(t.is_area_free(TilePos::new(1, 1), 1, 1, A), "own tile counts as free");
        assert!(!t.is_area_free(TilePos::new(1, 1), 1, 1, B));
        assert_eq!(t.reserved_count(), 1);
    }

    #[test]
    fn never_steals_another_owners_tile() {
        let mut t = ReservationTable::new(4, 4);
        assert!(t.reserve_area(TilePos::new(0, 0), 1, 1, A));
        assert!(!t.reserve_area(TilePos::new(0, 0), 1, 1, B));
        assert_eq!(t.occupant(TilePos::new(0, 0)), Some(A));
    }

    #[test]
    fn area_reservation_is_all_or_nothing() {
        let mut t = ReservationTable::new(4, 4);
        t.reserve_area(TilePos::new(2, 1), 1, 1, B);
        assert!(!t.reserve_area(TilePos::new(1, 1), 2, 2, A));
        assert_eq!(t.reserved_count(), 1);
        assert!(t.reserve_area(TilePos::new(0, 2), 2, 2, A));
        assert_eq!(t.tiles_of(A).len(), 4);
    }

    #[test]
    fn release_only_touches_own_tiles() {
        let mut t = ReservationTable::new(3, 1);
        t.reserve_area(TilePos::new(0, 0), 1, 1, A);
        t.reserve_area(TilePos::new(1, 0), 1, 1, B);
        t.release_area(TilePos::new(0, 0), 2, 1, A);
        assert_eq!(t.occupant(TilePos::new(0, 0)), None);
        assert_eq!(t.occupant(TilePos::new(1, 0)), Some(B));
        // Idempotent.
        t.release_area(TilePos::new(0, 0), 2, 1, A);
        assert_eq!(t.reserved_count(), 1);
    }

    #[test]
    fn out_of_bounds_is_never_free() {
        let mut t = ReservationTable::new(2, 2);
        assert!(!t.is_area_free(TilePos::new(1, 1), 2, 1, A));
        assert!(!t.reserve_area(TilePos::new(-1, 0), 1, 1, A));
        assert!(t.occupants_in(TilePos::new(-1, 0), 1, 1).is_empty());
    }

    #[test]
    fn occupants_are_distinct_and_sorted() {
        let mut t = ReservationTable::new(4, 1);
        t.reserve_area(TilePos::new(2, 0), 2, 1, B);
        t.reserve_area(TilePos::new(0, 0), 1, 1, A);
        assert_eq!(t.occupants_in(TilePos::new(0, 0), 4, 1), vec![A, B]);
    }
}

// ── Planner ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod planner {
    use tm_core::{EntityId, TilePos};
    use crate::{AStarPlanner, PathPlanner, ReservationTable, TileGrid};

    use super::helpers::{gate_grid, ground_blocked};

    #[test]
    fn straight_line_on_open_grid() {
        let grid = TileGrid::open(3, 2, 16.0, 16.0).unwrap();
        let table = ReservationTable::new(3, 2);
        let blocked = ground_blocked(&grid, &table);
        let route = AStarPlanner::default()
            .find_path(TilePos::new(0, 0), TilePos::new(2, 0), true, &blocked)
            .unwrap();
        assert_eq!(route.tiles(), &[TilePos::new(0, 0), TilePos::new(1, 0), TilePos::new(2, 0)]);
        assert_eq!(route.cost(), 20);
    }

    #[test]
    fn diagonal_step_is_taken_when_allowed() {
        let grid = TileGrid::open(3, 3, 16.0, 16.0).unwrap();
        let table = ReservationTable::new(3, 3);
        let blocked = ground_blocked(&grid, &table);
        let route = AStarPlanner::default()
            .find_path(TilePos::new(0, 0), TilePos::new(1, 1), true, &blocked)
            .unwrap();
        assert_eq!(route.tiles(), &[TilePos::new(0, 0), TilePos::new(1, 1)]);

        let route = AStarPlanner::orthogonal()
            .find_path(TilePos::new(0, 0), TilePos::new(1, 1), true, &blocked)
            .unwrap();
        assert_eq!(route.len(), 3);
    }

    #[test]
    fn routes_through_the_gate() {
        let grid = gate_grid();
        let table = ReservationTable::new(5, 3);
        let blocked = ground_blocked(&grid, &table);
        let route = AStarPlanner::default()
            .find_path(TilePos::new(0, 0), TilePos::new(4, 0), true, &blocked)
            .unwrap();
        assert_eq!(route.get(0), Some(TilePos::new(0, 0)));
        assert_eq!(route.last(), Some(TilePos::new(4, 0)));
        assert!(route.tiles().contains(&TilePos::new(2, 2)));
        // Consecutive tiles are neighbours.
        for pair in route.tiles().windows(2) {
            assert_eq!(pair[0].chebyshev(pair[1]), 1);
        }
    }

    #[test]
    fn no_corner_cutting_past_walls() {
        let grid = gate_grid();
        let table = ReservationTable::new(5, 3);
        let blocked = ground_blocked(&grid, &table);
        let route = AStarPlanner::default()
            .find_path(TilePos::new(1, 1), TilePos::new(3, 2), true, &blocked)
            .unwrap();
        // (1,1) -> (2,2) would cut the corner of the wall at (2,1).
        assert_eq!(route.get(1), Some(TilePos::new(1, 2)));
    }

    #[test]
    fn reserved_tiles_are_avoided() {
        let grid = gate_grid();
        let mut table = ReservationTable::new(5, 3);
        table.reserve_area(TilePos::new(2, 2), 1, 1, EntityId(9));
        let blocked = ground_blocked(&grid, &table);
        let planner = AStarPlanner::default();
        assert!(planner.find_path(TilePos::new(0, 0), TilePos::new(4, 0), true, &blocked).is_none());
    }

    #[test]
    fn inexact_settles_for_closest_reachable() {
        let grid = gate_grid();
        let mut table = ReservationTable::new(5, 3);
        table.reserve_area(TilePos::new(2, 2), 1, 1, EntityId(9));
        let blocked = ground_blocked(&grid, &table);
        let route = AStarPlanner::default()
            .find_path(TilePos::new(0, 2), TilePos::new(4, 0), false, &blocked)
            .unwrap();
        assert_eq!(route.last(), Some(TilePos::new(1, 0)));
    }

    #[test]
    fn inexact_without_progress_is_none() {
        let grid = TileGrid::open(1, 1, 16.0, 16.0).unwrap();
        let table = ReservationTable::new(1, 1);
        let blocked = ground_blocked(&grid, &table);
        let planner = AStarPlanner::default();
        assert!(planner.find_path(TilePos::new(0, 0), TilePos::new(5, 5), false, &blocked).is_none());
    }

    #[test]
    fn start_equals_goal_is_single_tile_route() {
        let grid = TileGrid::open(2, 2, 16.0, 16.0).unwrap();
        let table = ReservationTable::new(2, 2);
        let blocked = ground_blocked(&grid, &table);
        let route = AStarPlanner::default()
            .find_path(TilePos::new(1, 1), TilePos::new(1, 1), true, &blocked)
            .unwrap();
        assert_eq!(route.len(), 1);
        assert_eq!(route.cost(), 0);
    }
}
