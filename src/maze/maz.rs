//! The flat `.maz` byte format found in online maze archives.
//!
//! One byte per cell, column-major with rows counted from the bottom:
//! byte `16 * (x - 1) + (16 - y)` holds the wall nibble of cell
//! (x, y), bit 0 north, bit 1 east, bit 2 south, bit 3 west. The
//! format stores every wall from both sides, so it is redundant, but
//! it is the format that is already out there.

use std::io::{Read, Write};

use super::grid::SIZE;
use super::{Cell, Direction, WallGrid};

const NORTH_BIT: u8 = 1;
const EAST_BIT: u8 = 1 << 1;
const SOUTH_BIT: u8 = 1 << 2;
const WEST_BIT: u8 = 1 << 3;

fn cell_index(x: usize, y: usize) -> usize {
    SIZE * (x - 1) + (SIZE - y)
}

/// Reads a maze from `.maz` bytes.
pub fn load_maz<R: Read>(mut reader: R) -> eyre::Result<WallGrid> {
    let mut bytes = [0u8; SIZE * SIZE];
    reader.read_exact(&mut bytes)?;

    let mut grid = WallGrid::new();
    for x in 1..=SIZE {
        for y in (1..=SIZE).rev() {
            let nibble = bytes[cell_index(x, y)];
            let cell = Cell::new(x, y);
            for (bit, direction) in [
                (NORTH_BIT, Direction::North),
                (EAST_BIT, Direction::East),
                (SOUTH_BIT, Direction::South),
                (WEST_BIT, Direction::West),
            ] {
                if nibble & bit != 0 {
                    grid.set_wall(cell, direction);
                } else {
                    grid.clear_wall(cell, direction);
                }
            }
        }
    }
    Ok(grid)
}

/// Writes a maze as `.maz` bytes.
pub fn save_maz<W: Write>(grid: &WallGrid, mut writer: W) -> eyre::Result<()> {
    let mut bytes = [0u8; SIZE * SIZE];
    for x in 1..=SIZE {
        for y in (1..=SIZE).rev() {
            let cell = Cell::new(x, y);
            let mut nibble = 0u8;
            for (bit, direction) in [
                (NORTH_BIT, Direction::North),
                (EAST_BIT, Direction::East),
                (SOUTH_BIT, Direction::South),
                (WEST_BIT, Direction::West),
            ] {
                if grid.get_wall(cell, direction) {
                    nibble |= bit;
                }
            }
            bytes[cell_index(x, y)] = nibble;
        }
    }
    writer.write_all(&bytes)?;
    Ok(())
}
