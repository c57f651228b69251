use std::collections::VecDeque;

use crate::error::AiError;
use crate::maze::{Cell, Direction, SIZE, WallGrid};
use crate::robot::{RobotPose, RobotStep};

use super::NavigationStrategy;

/// distance sentinel for cells the wavefront has not reached
const USELESS: u16 = 1024;

/// which end of the maze the robot is currently driving toward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Goal {
    Center,
    Start,
}

impl Goal {
    fn toggled(self) -> Self {
        match self {
            Self::Center => Self::Start,
            Self::Start => Self::Center,
        }
    }
}

/// classical flood-fill maze solving
///
/// keeps a private map of sensed walls and a distance field relaxed
/// by a breadth-first wavefront from the current goal; each tick the
/// robot moves to the open neighbor with the smallest distance,
/// preferring its heading and then compass order. the goal alternates
/// between the center and the start across runs, so the robot maps on
/// the way in, returns, and can then speed-run on explored cells only
pub struct Floodfill {
    /// walls discovered so far, not the real maze
    map: WallGrid,
    /// distance to the current goal, indexed [x - 1][y - 1]
    distance: [[u16; SIZE]; SIZE],
    explored: [[bool; SIZE]; SIZE],
    queue: VecDeque<RobotStep>,
    turbo: bool,
    goal: Goal,
    speed_run: bool,
    /// set once the center has been reached and blocked out
    speed_run_capable: bool,
    initialized: bool,
}

impl Floodfill {
    pub fn new() -> Self {
        Self {
            map: WallGrid::new(),
            distance: [[USELESS; SIZE]; SIZE],
            explored: [[false; SIZE]; SIZE],
            queue: VecDeque::new(),
            turbo: false,
            goal: Goal::Center,
            speed_run: false,
            speed_run_capable: false,
            initialized: false,
        }
    }

    fn distance_at(&self, cell: Cell) -> u16 {
        self.distance[cell.x() - 1][cell.y() - 1]
    }

    fn set_distance(&mut self, cell: Cell, value: u16) {
        self.distance[cell.x() - 1][cell.y() - 1] = value;
    }

    fn is_explored(&self, cell: Cell) -> bool {
        self.explored[cell.x() - 1][cell.y() - 1]
    }

    fn in_range_neighbor(cell: Cell, direction: Direction) -> Option<Cell> {
        cell.neighbor(direction)
            .filter(|next| next.is_in_range(SIZE, SIZE))
    }

    /// records all four wall sensors into the private map; the back
    /// sensor matters after a backward move, where the opening the
    /// robot came through is in front of it
    fn record_walls(&mut self, pose: &RobotPose) {
        let here = pose.current_cell();
        let facing = pose.direction();
        if pose.is_wall_front() {
            self.map.set_wall(here, facing);
        }
        if pose.is_wall_back() {
            self.map.set_wall(here, facing.opposite());
        }
        if pose.is_wall_left() {
            self.map.set_wall(here, facing.left());
        }
        if pose.is_wall_right() {
            self.map.set_wall(here, facing.right());
        }
    }

    fn at_goal(&self, cell: Cell) -> bool {
        match self.goal {
            Goal::Start => cell == self.map.start_cell(),
            Goal::Center => self.map.center_cells().contains(&cell),
        }
    }

    /// seals the two internal chamber walls not adjacent to the
    /// approach cell, so later floods treat the chamber as one target
    fn block_out_center(&mut self, approach: Cell) {
        let s1 = SIZE / 2;
        let s2 = s1 + 1;
        let other_x = s1 + s2 - approach.x();
        let other_y = s1 + s2 - approach.y();
        self.map.set_wall(Cell::new(s1, other_y), Direction::East);
        self.map.set_wall(Cell::new(other_x, s1), Direction::South);
    }

    /// breadth-first wavefront from the goal cells outward through
    /// openings in the known map; in speed-run mode the wavefront
    /// only spreads across explored cells
    fn floodfill(&mut self) {
        self.distance = [[USELESS; SIZE]; SIZE];
        let mut frontier: VecDeque<Cell> = VecDeque::new();

        match self.goal {
            Goal::Start => {
                let start = self.map.start_cell();
                self.set_distance(start, 0);
                frontier.push_back(start);
            }
            Goal::Center => {
                for cell in self.map.center_cells() {
                    self.set_distance(cell, 0);
                    frontier.push_back(cell);
                }
            }
        }
        let speedy = self.goal == Goal::Center && self.speed_run && self.speed_run_capable;

        while let Some(cell) = frontier.pop_front() {
            let next_distance = self.distance_at(cell) + 1;
            for direction in Direction::ALL {
                if self.map.get_wall(cell, direction) {
                    continue;
                }
                // an open wall implies an in-range neighbor; the
                // perimeter always reads as walled
                let Some(neighbor) = Self::in_range_neighbor(cell, direction) else {
                    continue;
                };
                if next_distance < self.distance_at(neighbor)
                    && (!speedy || self.is_explored(neighbor))
                {
                    self.set_distance(neighbor, next_distance);
                    frontier.push_back(neighbor);
                }
            }
        }
    }

    /// the open neighbor with the strictly smallest distance,
    /// preferring the current heading, then compass priority.
    /// refloods once when the field has gone stale; a second miss
    /// means the goal is walled off in the known map
    fn best_direction(&mut self, pose: &RobotPose) -> Option<Direction> {
        if let Some(direction) = self.scan_neighbors(pose) {
            return Some(direction);
        }
        self.floodfill();
        self.scan_neighbors(pose)
    }

    fn scan_neighbors(&self, pose: &RobotPose) -> Option<Direction> {
        let here = pose.current_cell();
        let mut best_distance = self.distance_at(here);
        let mut best = None;
        for direction in std::iter::once(pose.direction()).chain(Direction::ALL) {
            if self.map.get_wall(here, direction) {
                continue;
            }
            let Some(neighbor) = Self::in_range_neighbor(here, direction) else {
                continue;
            };
            if self.distance_at(neighbor) < best_distance {
                best_distance = self.distance_at(neighbor);
                best = Some(direction);
            }
        }
        best
    }
}

impl Default for Floodfill {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationStrategy for Floodfill {
    fn initialize(&mut self, _pose: &RobotPose) -> Result<(), AiError> {
        self.map.clear();
        self.distance = [[USELESS; SIZE]; SIZE];
        self.explored = [[false; SIZE]; SIZE];
        self.queue.clear();
        self.turbo = false;
        self.goal = Goal::Center;
        self.speed_run_capable = false;
        self.initialized = true;
        Ok(())
    }

    fn next_step(&mut self, pose: &RobotPose) -> Result<RobotStep, AiError> {
        if !self.initialized {
            return Err(AiError::NotInitialized);
        }
        if let Some(queued) = self.queue.pop_front() {
            return Ok(queued);
        }

        let here = pose.current_cell();
        if !self.is_explored(here) {
            self.record_walls(pose);
            self.explored[here.x() - 1][here.y() - 1] = true;
        }

        if self.at_goal(here) {
            if self.goal == Goal::Center && !self.speed_run_capable {
                self.speed_run_capable = true;
                self.block_out_center(here);
            }
            self.goal = self.goal.toggled();
            self.floodfill();
        }

        let next_direction = self
            .best_direction(pose)
            .ok_or(AiError::GoalUnreachable)?;
        self.turbo = Self::in_range_neighbor(here, next_direction)
            .is_some_and(|neighbor| self.is_explored(neighbor));

        let facing = pose.direction();
        let next = if next_direction == facing {
            RobotStep::MoveForward
        } else if next_direction == facing.left() {
            self.queue.push_back(RobotStep::MoveForward);
            RobotStep::RotateLeft
        } else if next_direction == facing.right() {
            self.queue.push_back(RobotStep::MoveForward);
            RobotStep::RotateRight
        } else {
            RobotStep::MoveBackward
        };
        Ok(next)
    }

    fn is_in_turbo_mode(&self) -> bool {
        self.turbo
    }

    fn set_speed_run(&mut self, speed_run: bool) {
        self.speed_run = speed_run;
    }

    fn name(&self) -> &'static str {
        "Floodfill"
    }
}
