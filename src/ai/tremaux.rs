use std::collections::VecDeque;

use crate::error::AiError;
use crate::maze::{Cell, Direction, SIZE};
use crate::robot::{RobotPose, RobotStep};

use super::NavigationStrategy;

/// tremaux exploration: unwind a ball of string behind you
///
/// each visited cell records the direction leading back toward the
/// start; while a neighbor is still unthreaded the robot explores it
/// (right, then front, then left), otherwise it retraces along the
/// string, which is the only turbo branch
pub struct Tremaux {
    /// thread direction per cell, indexed [x - 1][y - 1]
    thread: [[Option<Direction>; SIZE]; SIZE],
    queue: VecDeque<RobotStep>,
    turbo: bool,
    initialized: bool,
}

impl Tremaux {
    pub fn new() -> Self {
        Self {
            thread: [[None; SIZE]; SIZE],
            queue: VecDeque::new(),
            turbo: false,
            initialized: false,
        }
    }

    fn thread_at(&self, cell: Cell) -> Option<Direction> {
        self.thread[cell.x() - 1][cell.y() - 1]
    }

    fn set_thread(&mut self, cell: Cell, back: Direction) {
        self.thread[cell.x() - 1][cell.y() - 1] = Some(back);
    }

    /// an off-grid neighbor counts as visited
    fn neighbor_unvisited(&self, pose: &RobotPose, direction: Direction) -> bool {
        let (width, height) = pose.maze_size();
        pose.current_cell()
            .neighbor(direction)
            .filter(|cell| cell.is_in_range(width, height))
            .is_some_and(|cell| self.thread_at(cell).is_none())
    }
}

impl Default for Tremaux {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationStrategy for Tremaux {
    fn initialize(&mut self, pose: &RobotPose) -> Result<(), AiError> {
        self.thread = [[None; SIZE]; SIZE];
        // the start cell threads north so a full retrace parks the
        // robot facing the way it started
        self.set_thread(pose.grid().start_cell(), Direction::North);
        self.queue.clear();
        self.turbo = false;
        self.initialized = true;
        Ok(())
    }

    fn next_step(&mut self, pose: &RobotPose) -> Result<RobotStep, AiError> {
        if !self.initialized {
            return Err(AiError::NotInitialized);
        }

        let here = pose.current_cell();
        if self.thread_at(here).is_none() {
            self.set_thread(here, pose.direction().opposite());
        }

        if let Some(queued) = self.queue.pop_front() {
            return Ok(queued);
        }

        let facing = pose.direction();
        let next = if !pose.is_wall_right() && self.neighbor_unvisited(pose, facing.right()) {
            self.turbo = false;
            self.queue.push_back(RobotStep::MoveForward);
            RobotStep::RotateRight
        } else if !pose.is_wall_front() && self.neighbor_unvisited(pose, facing) {
            self.turbo = false;
            RobotStep::MoveForward
        } else if !pose.is_wall_left() && self.neighbor_unvisited(pose, facing.left()) {
            self.turbo = false;
            self.queue.push_back(RobotStep::MoveForward);
            RobotStep::RotateLeft
        } else {
            // dead end or fully threaded: retrace the string
            self.turbo = true;
            // the thread was recorded when this cell was entered
            let back = self.thread_at(here).unwrap_or(facing.opposite());
            if back == facing {
                RobotStep::MoveForward
            } else if back == facing.left() {
                self.queue.push_back(RobotStep::MoveForward);
                RobotStep::RotateLeft
            } else if back == facing.right() {
                self.queue.push_back(RobotStep::MoveForward);
                RobotStep::RotateRight
            } else {
                self.queue.push_back(RobotStep::RotateRight);
                self.queue.push_back(RobotStep::MoveForward);
                RobotStep::RotateRight
            }
        };
        Ok(next)
    }

    fn is_in_turbo_mode(&self) -> bool {
        self.turbo
    }

    fn name(&self) -> &'static str {
        "Tremaux"
    }
}
