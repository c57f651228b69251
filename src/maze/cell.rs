use std::cmp::Ordering;
use std::fmt;

use super::Direction;

/// The coordinates of one cell/box of the maze.
///
/// The upper left cell is (1, 1); both coordinates are 1-based. Each
/// instance is immutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    x: usize,
    y: usize,
}

impl Cell {
    pub fn new(x: usize, y: usize) -> Self {
        debug_assert!(x >= 1, "x coordinate must be greater than 0");
        debug_assert!(y >= 1, "y coordinate must be greater than 0");
        Self { x, y }
    }

    pub fn x(self) -> usize {
        self.x
    }

    pub fn y(self) -> usize {
        self.y
    }

    /// A new cell with x changed by the given amount, or `None` when
    /// the result would fall off the 1-based coordinate plane.
    pub fn plus_x(self, dx: isize) -> Option<Self> {
        let x = self.x.checked_add_signed(dx)?;
        (x >= 1).then(|| Self::new(x, self.y))
    }

    /// A new cell with y changed by the given amount, or `None` when
    /// the result would fall off the 1-based coordinate plane.
    pub fn plus_y(self, dy: isize) -> Option<Self> {
        let y = self.y.checked_add_signed(dy)?;
        (y >= 1).then(|| Self::new(self.x, y))
    }

    /// The adjacent cell one unit away in the given direction.
    ///
    /// `None` means the neighbor would be off the low edge of the
    /// grid; callers treat that as "direction blocked", not a failure.
    /// High edges are the caller's business via [`Cell::is_in_range`].
    pub fn neighbor(self, direction: Direction) -> Option<Self> {
        let (dx, dy) = direction.delta();
        self.plus_x(dx)?.plus_y(dy)
    }

    /// Whether this cell lies inside a grid of the given dimensions.
    pub fn is_in_range(self, width: usize, height: usize) -> bool {
        self.x <= width && self.y <= height
    }
}

impl Ord for Cell {
    /// Reading order: left to right, top to bottom.
    fn cmp(&self, other: &Self) -> Ordering {
        self.y.cmp(&other.y).then(self.x.cmp(&other.x))
    }
}

impl PartialOrd for Cell {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbor_moves_one_unit() {
        let cell = Cell::new(3, 3);
        assert_eq!(cell.neighbor(Direction::North), Some(Cell::new(3, 2)));
        assert_eq!(cell.neighbor(Direction::South), Some(Cell::new(3, 4)));
        assert_eq!(cell.neighbor(Direction::East), Some(Cell::new(4, 3)));
        assert_eq!(cell.neighbor(Direction::West), Some(Cell::new(2, 3)));
    }

    #[test]
    fn neighbor_off_the_low_edge_is_none() {
        assert_eq!(Cell::new(1, 1).neighbor(Direction::North), None);
        assert_eq!(Cell::new(1, 1).neighbor(Direction::West), None);
        assert_eq!(Cell::new(1, 5).neighbor(Direction::West), None);
    }

    #[test]
    fn range_check_covers_both_axes() {
        assert!(Cell::new(16, 16).is_in_range(16, 16));
        assert!(!Cell::new(17, 16).is_in_range(16, 16));
        assert!(!Cell::new(16, 17).is_in_range(16, 16));
    }

    #[test]
    fn ordering_is_reading_order() {
        let mut cells = vec![Cell::new(2, 2), Cell::new(1, 1), Cell::new(3, 1)];
        cells.sort();
        assert_eq!(
            cells,
            vec![Cell::new(1, 1), Cell::new(3, 1), Cell::new(2, 2)]
        );
    }
}
