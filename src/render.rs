//! ASCII rendering of the maze and, optionally, the robot's journey.

use colored::Colorize;

use crate::maze::{Cell, Direction, SIZE, WallGrid};
use crate::robot::RobotPose;

/// Draws the grid as a block of text, one peg-and-wall line plus one
/// cell line per row. With a pose attached the robot shows up as a
/// heading arrow, the best run as markers, and visited cells as dots.
pub fn render_maze(grid: &WallGrid, pose: Option<&RobotPose>) -> String {
    let mut out = String::with_capacity((4 * SIZE + 2) * (2 * SIZE + 1));

    for y in 1..=SIZE {
        for x in 1..=SIZE {
            out.push('+');
            let segment = if grid.get_wall(Cell::new(x, y), Direction::North) {
                "---"
            } else {
                "   "
            };
            out.push_str(segment);
        }
        out.push_str("+\n");

        for x in 1..=SIZE {
            let cell = Cell::new(x, y);
            if grid.get_wall(cell, Direction::West) {
                out.push('|');
            } else {
                out.push(' ');
            }
            out.push(' ');
            out.push_str(&cell_glyph(grid, pose, cell));
            out.push(' ');
        }
        // The east perimeter always reads as walled.
        out.push_str("|\n");
    }

    for _ in 1..=SIZE {
        out.push_str("+---");
    }
    out.push_str("+\n");
    out
}

fn cell_glyph(grid: &WallGrid, pose: Option<&RobotPose>, cell: Cell) -> String {
    if let Some(pose) = pose {
        if pose.current_cell() == cell {
            let arrow = pose.direction().arrow().to_string();
            return arrow.as_str().red().bold().to_string();
        }
        if pose.best_run().contains(&cell) {
            return "o".green().to_string();
        }
        if pose.is_explored(cell) {
            return ".".blue().to_string();
        }
    }
    if grid.center_cells().contains(&cell) {
        return "*".yellow().to_string();
    }
    " ".to_string()
}
