use std::collections::BTreeSet;
use std::sync::Arc;

use crate::error::PoseError;
use crate::listener::Subject;
use crate::maze::{Cell, Direction, SIZE, WallGrid};

use super::RobotStep;

/// the robot's pose and journey through one maze run: current cell
/// and facing, the full move history, and the first/best run
/// snapshots. the wall grid is shared read-only
pub struct RobotPose {
    grid: Arc<WallGrid>,
    current: Cell,
    direction: Direction,
    /// every cell entered, in order, cycles and repeats included
    path_taken: Vec<Cell>,
    history: BTreeSet<Cell>,
    first_run: Vec<Cell>,
    best_run: Vec<Cell>,
    events: Subject<Cell>,
}

impl RobotPose {
    /// a fresh pose at the start cell, facing north
    pub fn new(grid: Arc<WallGrid>) -> Self {
        let start = grid.start_cell();
        let mut pose = Self {
            grid,
            current: start,
            direction: Direction::North,
            path_taken: Vec::with_capacity(128),
            history: BTreeSet::new(),
            first_run: Vec::new(),
            best_run: Vec::new(),
            events: Subject::new(),
        };
        pose.path_taken.push(start);
        pose.history.insert(start);
        pose
    }

    /// back to the start with empty histories
    pub fn reset(&mut self) {
        let start = self.grid.start_cell();
        self.current = start;
        self.direction = Direction::North;
        self.path_taken.clear();
        self.path_taken.push(start);
        self.history.clear();
        self.history.insert(start);
        self.first_run.clear();
        self.best_run.clear();
    }

    pub fn grid(&self) -> &WallGrid {
        &self.grid
    }

    pub fn maze_size(&self) -> (usize, usize) {
        (SIZE, SIZE)
    }

    pub fn current_cell(&self) -> Cell {
        self.current
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_wall_front(&self) -> bool {
        self.grid.get_wall(self.current, self.direction)
    }

    pub fn is_wall_back(&self) -> bool {
        self.grid.get_wall(self.current, self.direction.opposite())
    }

    pub fn is_wall_left(&self) -> bool {
        self.grid.get_wall(self.current, self.direction.left())
    }

    pub fn is_wall_right(&self) -> bool {
        self.grid.get_wall(self.current, self.direction.right())
    }

    pub fn path_taken(&self) -> &[Cell] {
        &self.path_taken
    }

    pub fn is_explored(&self, cell: Cell) -> bool {
        self.history.contains(&cell)
    }

    pub fn history(&self) -> &BTreeSet<Cell> {
        &self.history
    }

    /// path of the first start-to-center journey, empty until the
    /// center is first reached
    pub fn first_run(&self) -> &[Cell] {
        &self.first_run
    }

    /// shortest start-to-center run seen so far
    pub fn best_run(&self) -> &[Cell] {
        &self.best_run
    }

    /// the path segment since the robot last stood on the start cell
    pub fn current_run(&self) -> &[Cell] {
        let start = self.grid.start_cell();
        let from = self
            .path_taken
            .iter()
            .rposition(|cell| *cell == start)
            .unwrap_or(0);
        &self.path_taken[from..]
    }

    /// cell-entered notifications, plus west/north neighbor repaint
    /// hints for renderers that draw shared walls
    pub fn events(&self) -> Subject<Cell> {
        self.events.clone()
    }

    /// executes one discrete step against the wall grid; rotations
    /// always succeed, a blocked move is a fatal
    /// [`PoseError::WallCollision`] that leaves the pose untouched
    pub fn take_next_step(&mut self, step: RobotStep) -> Result<(), PoseError> {
        match step {
            RobotStep::RotateLeft => {
                self.direction = self.direction.left();
                Ok(())
            }
            RobotStep::RotateRight => {
                self.direction = self.direction.right();
                Ok(())
            }
            RobotStep::MoveForward => self.advance(self.direction),
            RobotStep::MoveBackward => self.advance(self.direction.opposite()),
        }
    }

    fn advance(&mut self, toward: Direction) -> Result<(), PoseError> {
        let blocked = PoseError::WallCollision {
            cell: self.current,
            direction: toward,
        };
        if self.grid.get_wall(self.current, toward) {
            return Err(blocked);
        }
        // the perimeter is always walled, so an open side implies an
        // in-range neighbor
        let next = self.current.neighbor(toward).ok_or(blocked)?;

        self.current = next;
        self.path_taken.push(next);
        self.history.insert(next);

        self.events.notify(next);
        if let Some(west) = next.plus_x(-1) {
            self.events.notify(west);
        }
        if let Some(north) = next.plus_y(-1) {
            self.events.notify(north);
        }

        self.record_goal_arrival();
        Ok(())
    }

    fn record_goal_arrival(&mut self) {
        if !self.grid.center_cells().contains(&self.current) {
            return;
        }
        if self.first_run.is_empty() {
            self.first_run = self.path_taken.clone();
            self.best_run = self.path_taken.clone();
        } else {
            let current = self.current_run();
            if self.best_run.len() > current.len() {
                self.best_run = current.to_vec();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pose_on(grid: WallGrid) -> RobotPose {
        RobotPose::new(Arc::new(grid))
    }

    #[test]
    fn there_and_back_returns_to_the_exact_start() {
        let mut pose = pose_on(WallGrid::new());
        let start = pose.current_cell();
        for step in [
            RobotStep::MoveForward,
            RobotStep::RotateRight,
            RobotStep::RotateRight,
            RobotStep::MoveForward,
            RobotStep::RotateRight,
            RobotStep::RotateRight,
        ] {
            pose.take_next_step(step).unwrap();
        }
        assert_eq!(pose.current_cell(), start);
        assert_eq!(pose.direction(), Direction::North);
    }

    #[test]
    fn rotations_never_touch_position_or_history() {
        let mut pose = pose_on(WallGrid::new());
        pose.take_next_step(RobotStep::RotateLeft).unwrap();
        pose.take_next_step(RobotStep::RotateRight).unwrap();
        pose.take_next_step(RobotStep::RotateRight).unwrap();
        assert_eq!(pose.direction(), Direction::East);
        assert_eq!(pose.path_taken().len(), 1);
        assert_eq!(pose.history().len(), 1);
    }

    #[test]
    fn collision_is_fatal_and_leaves_state_unmodified() {
        let mut grid = WallGrid::new();
        let start = grid.start_cell();
        grid.set_wall(start, Direction::North);
        let mut pose = pose_on(grid);

        let result = pose.take_next_step(RobotStep::MoveForward);
        assert_eq!(
            result,
            Err(PoseError::WallCollision {
                cell: start,
                direction: Direction::North,
            })
        );
        assert_eq!(pose.current_cell(), start);
        assert_eq!(pose.path_taken(), &[start]);
        assert_eq!(pose.history().len(), 1);
    }

    #[test]
    fn backward_moves_keep_the_facing() {
        let mut pose = pose_on(WallGrid::new());
        let start = pose.current_cell();
        pose.take_next_step(RobotStep::MoveForward).unwrap();
        pose.take_next_step(RobotStep::MoveBackward).unwrap();
        assert_eq!(pose.current_cell(), start);
        assert_eq!(pose.direction(), Direction::North);
        assert_eq!(pose.path_taken().len(), 3);
    }

    #[test]
    fn sensors_read_the_shared_grid() {
        let mut grid = WallGrid::new();
        let start = grid.start_cell();
        grid.set_wall(start, Direction::North);
        let pose = pose_on(grid);

        assert!(pose.is_wall_front());
        // East of the start cell holds the mandatory wall.
        assert!(pose.is_wall_right());
        // West and south are the grid boundary.
        assert!(pose.is_wall_left());
        assert!(pose.is_wall_back());
    }

    #[test]
    fn first_and_best_runs_snapshot_goal_arrivals() {
        // An open grid lets the robot walk straight to the center.
        let mut pose = pose_on(WallGrid::new());

        // North to row 8.
        for _ in 0..(SIZE - SIZE / 2) {
            pose.take_next_step(RobotStep::MoveForward).unwrap();
        }
        // East to column 8.
        pose.take_next_step(RobotStep::RotateRight).unwrap();
        for _ in 0..(SIZE / 2 - 1) {
            pose.take_next_step(RobotStep::MoveForward).unwrap();
        }

        assert!(!pose.first_run().is_empty());
        assert_eq!(pose.first_run(), pose.best_run());
        let first_len = pose.first_run().len();
        assert_eq!(first_len, pose.path_taken().len());

        // Wander one extra cell and come back: the first run must not
        // change, and the best run only improves.
        pose.take_next_step(RobotStep::MoveForward).unwrap();
        assert_eq!(pose.first_run().len(), first_len);
        assert!(pose.best_run().len() <= pose.path_taken().len());
    }

    #[test]
    fn current_run_starts_at_the_last_start_cell_visit() {
        let mut pose = pose_on(WallGrid::new());
        let start = pose.current_cell();
        pose.take_next_step(RobotStep::MoveForward).unwrap();
        pose.take_next_step(RobotStep::MoveBackward).unwrap();
        pose.take_next_step(RobotStep::MoveForward).unwrap();
        // Path is start, up, start, up: the current run begins at the
        // second start visit.
        assert_eq!(pose.current_run().len(), 2);
        assert_eq!(pose.current_run()[0], start);
    }
}
