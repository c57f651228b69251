use crate::listener::Subject;

use super::{Cell, Direction};

/// Cells per side of a competition maze.
pub const SIZE: usize = 16;

#[derive(Clone, Copy)]
enum Plane {
    Row,
    Col,
}

/// Bit-packed wall storage for a [`SIZE`] x [`SIZE`] maze.
///
/// `row_walls[x - 1]` holds the horizontal wall segments along column
/// x: bit (y - 1) is the wall on the south side of cell (x, y).
/// `col_walls[y - 1]` holds the vertical segments along row y: bit
/// (x - 1) is the wall on the east side of cell (x, y). A query for
/// the opposite side of the same grid line shifts the bit by one.
///
/// The outer perimeter is definitionally walled: boundary-facing
/// queries always report a wall and boundary-facing mutations are
/// no-ops.
pub struct WallGrid {
    row_walls: [u32; SIZE],
    col_walls: [u32; SIZE],
    events: Subject<Cell>,
}

impl Clone for WallGrid {
    /// Deep copy with no shared storage. Listeners stay behind; a
    /// clone starts with an empty registry.
    fn clone(&self) -> Self {
        Self {
            row_walls: self.row_walls,
            col_walls: self.col_walls,
            events: Subject::new(),
        }
    }
}

impl Default for WallGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl WallGrid {
    /// An empty maze, except for the one wall every legal maze is
    /// guaranteed to have: the wall east of the start cell.
    pub fn new() -> Self {
        let mut grid = Self {
            row_walls: [0; SIZE],
            col_walls: [0; SIZE],
            events: Subject::new(),
        };
        grid.set_wall(grid.start_cell(), Direction::East);
        grid
    }

    /// Rebuilds a grid from the flat interchange form
    /// `[row_walls..., col_walls...]`.
    pub fn from_bitmasks(masks: &[u32; 2 * SIZE]) -> Self {
        let mut grid = Self::new();
        for i in 0..SIZE {
            grid.row_walls[i] = masks[i];
            grid.col_walls[i] = masks[i + SIZE];
        }
        grid
    }

    /// The flat interchange form consumed by persistence code.
    pub fn to_bitmasks(&self) -> [u32; 2 * SIZE] {
        let mut masks = [0; 2 * SIZE];
        for i in 0..SIZE {
            masks[i] = self.row_walls[i];
            masks[i + SIZE] = self.col_walls[i];
        }
        masks
    }

    /// The bottom-left cell where every run begins.
    pub fn start_cell(&self) -> Cell {
        Cell::new(1, SIZE)
    }

    /// The four goal cells forming the center chamber.
    pub fn center_cells(&self) -> [Cell; 4] {
        let s1 = SIZE / 2;
        let s2 = s1 + 1;
        [
            Cell::new(s1, s1),
            Cell::new(s2, s1),
            Cell::new(s1, s2),
            Cell::new(s2, s2),
        ]
    }

    /// Change notifications, keyed by the cell whose wall changed.
    pub fn events(&self) -> Subject<Cell> {
        self.events.clone()
    }

    fn wall_bit(cell: Cell, direction: Direction) -> Option<(Plane, usize, u32)> {
        let (x, y) = (cell.x(), cell.y());
        if x < 1 || y < 1 || x > SIZE || y > SIZE {
            return None;
        }
        // Walls facing outside the grid are implied and immutable.
        let boundary = match direction {
            Direction::North => y == 1,
            Direction::East => x == SIZE,
            Direction::South => y == SIZE,
            Direction::West => x == 1,
        };
        if boundary {
            return None;
        }
        Some(match direction {
            Direction::North => (Plane::Row, x - 1, 1 << (y - 2)),
            Direction::South => (Plane::Row, x - 1, 1 << (y - 1)),
            Direction::West => (Plane::Col, y - 1, 1 << (x - 2)),
            Direction::East => (Plane::Col, y - 1, 1 << (x - 1)),
        })
    }

    /// Whether the given side of the given cell is walled. Boundary
    /// directions and out-of-range cells always report a wall.
    pub fn get_wall(&self, cell: Cell, direction: Direction) -> bool {
        match Self::wall_bit(cell, direction) {
            Some((Plane::Row, i, mask)) => self.row_walls[i] & mask != 0,
            Some((Plane::Col, i, mask)) => self.col_walls[i] & mask != 0,
            None => true,
        }
    }

    /// Adds a wall segment. No-op at boundaries and out of range.
    pub fn set_wall(&mut self, cell: Cell, direction: Direction) {
        if let Some((plane, i, mask)) = Self::wall_bit(cell, direction) {
            match plane {
                Plane::Row => self.row_walls[i] |= mask,
                Plane::Col => self.col_walls[i] |= mask,
            }
            self.events.notify(cell);
        }
    }

    /// Removes a wall segment. No-op at boundaries and out of range.
    pub fn clear_wall(&mut self, cell: Cell, direction: Direction) {
        if let Some((plane, i, mask)) = Self::wall_bit(cell, direction) {
            match plane {
                Plane::Row => self.row_walls[i] &= !mask,
                Plane::Col => self.col_walls[i] &= !mask,
            }
            self.events.notify(cell);
        }
    }

    /// Resets to the [`WallGrid::new`] state.
    pub fn clear(&mut self) {
        self.row_walls = [0; SIZE];
        self.col_walls = [0; SIZE];
        let start = self.start_cell();
        self.set_wall(start, Direction::East);
    }

    /// Number of walls present around the eight sides of the 2x2
    /// center block. A legal maze has exactly seven, leaving a single
    /// entrance.
    fn center_wall_count(&self) -> usize {
        let s1 = SIZE / 2;
        let s2 = s1 + 1;
        [
            (Cell::new(s2, s1), Direction::North),
            (Cell::new(s2, s1), Direction::East),
            (Cell::new(s1, s1), Direction::West),
            (Cell::new(s1, s1), Direction::North),
            (Cell::new(s2, s2), Direction::South),
            (Cell::new(s2, s2), Direction::East),
            (Cell::new(s1, s2), Direction::South),
            (Cell::new(s1, s2), Direction::West),
        ]
        .into_iter()
        .filter(|(cell, direction)| self.get_wall(*cell, *direction))
        .count()
    }

    /// Whether the four internal segments meeting at the exact center
    /// peg are all absent, forming the open center chamber.
    fn is_center_peg_open(&self) -> bool {
        let s1 = SIZE / 2;
        let s2 = s1 + 1;
        !self.get_wall(Cell::new(s1, s1), Direction::South)
            && !self.get_wall(Cell::new(s1, s1), Direction::East)
            && !self.get_wall(Cell::new(s2, s2), Direction::North)
            && !self.get_wall(Cell::new(s2, s2), Direction::West)
    }

    /// Whether the peg at the southeast corner of cell (x, y) has at
    /// least one of its four wall segments attached. Pegs on the
    /// outer perimeter always do, via the implied boundary walls.
    fn peg_has_wall(&self, x: usize, y: usize) -> bool {
        self.get_wall(Cell::new(x, y), Direction::South)
            || self.get_wall(Cell::new(x, y), Direction::East)
            || self.get_wall(Cell::new(x + 1, y + 1), Direction::North)
            || self.get_wall(Cell::new(x + 1, y + 1), Direction::West)
    }

    /// Checks the three structural rules of a valid competition maze,
    /// stopping at the first failure:
    ///
    /// 1. the start cell has its east wall and an open north wall;
    /// 2. the center chamber has exactly one entrance and an open
    ///    center peg;
    /// 3. every peg has at least one wall, except the center peg.
    pub fn is_legal(&self) -> bool {
        let start = self.start_cell();
        if !self.get_wall(start, Direction::East) || self.get_wall(start, Direction::North) {
            return false;
        }
        if self.center_wall_count() != 7 {
            return false;
        }
        if !self.is_center_peg_open() {
            return false;
        }
        let center = SIZE / 2;
        for x in 1..=SIZE {
            for y in 1..=SIZE {
                if (x, y) == (center, center) {
                    continue;
                }
                if !self.peg_has_wall(x, y) {
                    return false;
                }
            }
        }
        true
    }

    /// Diagnostic counterpart of [`WallGrid::is_legal`]: collects the
    /// peg coordinates (named by the cell each peg is the southeast
    /// corner of) that break a rule, instead of failing fast. A peg
    /// can appear more than once if it is bad for more than one
    /// reason.
    pub fn where_illegal(&self) -> Vec<Cell> {
        let mut bad = Vec::new();
        let s1 = SIZE / 2;
        let s2 = s1 + 1;

        let start = self.start_cell();
        if !self.get_wall(start, Direction::East) || self.get_wall(start, Direction::North) {
            bad.push(Cell::new(1, SIZE - 1));
        }

        if self.center_wall_count() != 7 {
            // All of the center pegs are connected.
            for (x, y) in [
                (s1 - 1, s1 - 1),
                (s1, s1 - 1),
                (s2, s1 - 1),
                (s1 - 1, s1),
                (s2, s1),
                (s1 - 1, s2),
                (s1, s2),
                (s2, s2),
            ] {
                bad.push(Cell::new(x, y));
            }
        }

        if !self.is_center_peg_open() {
            bad.push(Cell::new(s1, s1));
        }

        for x in 1..=SIZE {
            for y in 1..=SIZE {
                if (x, y) == (s1, s1) {
                    continue;
                }
                if !self.peg_has_wall(x, y) {
                    bad.push(Cell::new(x, y));
                }
            }
        }

        bad
    }

    /// Lower-level view of [`WallGrid::is_legal`] that judges a single
    /// peg, for editor assist. The peg is named by the cell it is the
    /// southeast corner of.
    pub fn is_peg_legal(&self, x: usize, y: usize) -> bool {
        if x < 1 || y < 1 || x > SIZE || y > SIZE {
            return false;
        }
        let s1 = SIZE / 2;
        if !self.peg_has_wall(x, y) {
            // The only peg allowed to stand free is the center peg.
            return (x, y) == (s1, s1);
        }
        if (x, y) == (1, SIZE) {
            let start = self.start_cell();
            return self.get_wall(start, Direction::East) && !self.get_wall(start, Direction::North);
        }
        if (x, y) == (s1, s1) {
            return false;
        }
        if (s1 - 2..=s1).contains(&x) && (s1 - 2..=s1).contains(&y) {
            return self.center_wall_count() == 7;
        }
        true
    }

    /// A small legal training maze carved programmatically: full
    /// shelves of horizontal walls joined into a serpentine corridor,
    /// with the center chamber opening to the west of cell (8, 9).
    /// Used by the CLI when no maze file is supplied and by tests.
    pub fn reference() -> Self {
        let mut grid = Self::new();
        let s1 = SIZE / 2;
        let s2 = s1 + 1;

        // Shelves between every pair of rows, except the door north
        // of the start cell required by the start rule.
        for x in 1..=SIZE {
            for y in 1..SIZE {
                if (x, y) == (1, SIZE - 1) {
                    continue;
                }
                grid.set_wall(Cell::new(x, y), Direction::South);
            }
        }

        // Open the four segments meeting at the center peg.
        grid.clear_wall(Cell::new(s1, s1), Direction::South);
        grid.clear_wall(Cell::new(s1, s1), Direction::East);
        grid.clear_wall(Cell::new(s2, s1), Direction::South);
        grid.clear_wall(Cell::new(s1, s2), Direction::East);

        // Seven of the eight center-block walls; the single entrance
        // stays open on the west side of (s1, s2).
        grid.set_wall(Cell::new(s1, s1), Direction::West);
        grid.set_wall(Cell::new(s2, s1), Direction::East);
        grid.set_wall(Cell::new(s2, s2), Direction::East);

        // Serpentine doors linking neighboring shelves at alternating
        // ends, so the start can reach the center.
        for y in 1..SIZE - 1 {
            let x = if y % 2 == 0 { 1 } else { SIZE };
            grid.clear_wall(Cell::new(x, y), Direction::South);
        }

        // The chamber walls split rows 8 and 9 in two, so each half
        // needs its own way in.
        grid.clear_wall(Cell::new(1, s2), Direction::South);
        grid.clear_wall(Cell::new(SIZE, s1), Direction::South);

        grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn walls_are_shared_between_adjacent_cells() {
        let mut grid = WallGrid::new();
        grid.set_wall(Cell::new(5, 5), Direction::North);
        assert!(grid.get_wall(Cell::new(5, 5), Direction::North));
        assert!(grid.get_wall(Cell::new(5, 4), Direction::South));

        grid.set_wall(Cell::new(3, 7), Direction::East);
        assert!(grid.get_wall(Cell::new(4, 7), Direction::West));

        grid.clear_wall(Cell::new(5, 4), Direction::South);
        assert!(!grid.get_wall(Cell::new(5, 5), Direction::North));
    }

    #[test]
    fn boundary_walls_are_present_and_immutable() {
        let mut grid = WallGrid::new();
        for i in 1..=SIZE {
            for (cell, direction) in [
                (Cell::new(i, 1), Direction::North),
                (Cell::new(i, SIZE), Direction::South),
                (Cell::new(1, i), Direction::West),
                (Cell::new(SIZE, i), Direction::East),
            ] {
                assert!(grid.get_wall(cell, direction), "{cell} {direction}");
                grid.clear_wall(cell, direction);
                assert!(grid.get_wall(cell, direction), "{cell} {direction}");
            }
        }
        // Out-of-range queries also read as walled.
        assert!(grid.get_wall(Cell::new(SIZE + 1, 1), Direction::North));
    }

    #[test]
    fn fresh_grid_is_not_legal() {
        let grid = WallGrid::new();
        assert!(grid.get_wall(grid.start_cell(), Direction::East));
        assert!(!grid.is_legal());
        assert!(!grid.where_illegal().is_empty());
    }

    #[test]
    fn reference_maze_is_legal() {
        let grid = WallGrid::reference();
        assert!(grid.is_legal());
        assert!(grid.where_illegal().is_empty());
    }

    #[test]
    fn disturbing_the_center_walls_breaks_legality() {
        let s1 = SIZE / 2;
        let s2 = s1 + 1;

        // Removing one of the seven center walls leaves six.
        let mut grid = WallGrid::reference();
        grid.clear_wall(Cell::new(s2, s1), Direction::East);
        assert!(!grid.is_legal());

        // Closing the entrance makes eight.
        let mut grid = WallGrid::reference();
        grid.set_wall(Cell::new(s1, s2), Direction::West);
        assert!(!grid.is_legal());
    }

    #[test]
    fn clear_resets_to_the_start_wall_only() {
        let mut grid = WallGrid::reference();
        grid.clear();
        let fresh = WallGrid::new();
        assert_eq!(grid.to_bitmasks(), fresh.to_bitmasks());
    }

    #[test]
    fn clone_is_independent() {
        let grid = WallGrid::reference();
        let mut copy = grid.clone();
        copy.set_wall(Cell::new(2, 2), Direction::East);
        assert!(copy.get_wall(Cell::new(2, 2), Direction::East));
        assert!(!grid.get_wall(Cell::new(2, 2), Direction::East));
    }

    #[test]
    fn bitmask_interchange_round_trips() {
        let grid = WallGrid::reference();
        let masks = grid.to_bitmasks();
        let rebuilt = WallGrid::from_bitmasks(&masks);
        assert_eq!(rebuilt.to_bitmasks(), masks);
        assert!(rebuilt.is_legal());
    }

    #[test]
    fn mutations_notify_listeners_with_the_cell() {
        let mut grid = WallGrid::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);
        grid.events()
            .add_listener(Arc::new(move |cell: &Cell| log.lock().unwrap().push(*cell)));

        grid.set_wall(Cell::new(4, 4), Direction::South);
        grid.clear_wall(Cell::new(4, 4), Direction::South);
        // Boundary mutation is a no-op and must stay silent.
        grid.set_wall(Cell::new(1, 1), Direction::North);

        assert_eq!(*seen.lock().unwrap(), vec![Cell::new(4, 4), Cell::new(4, 4)]);
    }

    #[test]
    fn single_peg_probe_matches_the_rules() {
        let grid = WallGrid::reference();
        let s1 = SIZE / 2;
        // Center peg is legally bare.
        assert!(grid.is_peg_legal(s1, s1));
        // A peg with walls away from the special areas is fine.
        assert!(grid.is_peg_legal(3, 3));
        // A bare peg anywhere else is not.
        let mut open = WallGrid::new();
        open.clear_wall(open.start_cell(), Direction::East);
        assert!(!open.is_peg_legal(3, 3));
        // Out of range is never legal.
        assert!(!grid.is_peg_legal(0, 5));
        assert!(!grid.is_peg_legal(5, SIZE + 1));
    }
}
