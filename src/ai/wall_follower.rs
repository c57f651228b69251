use std::collections::VecDeque;

use crate::error::AiError;
use crate::robot::{RobotPose, RobotStep};

use super::NavigationStrategy;

/// reflex policy hugging the left-hand wall: left if open, else
/// straight, else rotate right in place and look again next tick
pub struct LeftWallFollower {
    queue: VecDeque<RobotStep>,
    initialized: bool,
}

impl LeftWallFollower {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            initialized: false,
        }
    }
}

impl Default for LeftWallFollower {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationStrategy for LeftWallFollower {
    fn initialize(&mut self, _pose: &RobotPose) -> Result<(), AiError> {
        self.queue.clear();
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
        let next = if !pose.is_wall_left() {
            self.queue.push_back(RobotStep::MoveForward);
            RobotStep::RotateLeft
        } else if !pose.is_wall_front() {
            RobotStep::MoveForward
        } else {
            RobotStep::RotateRight
        };
        Ok(next)
    }

    fn name(&self) -> &'static str {
        "Left Wall Follower"
    }
}

/// mirror image of [`LeftWallFollower`]
pub struct RightWallFollower {
    queue: VecDeque<RobotStep>,
    initialized: bool,
}

impl RightWallFollower {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            initialized: false,
        }
    }
}

impl Default for RightWallFollower {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationStrategy for RightWallFollower {
    fn initialize(&mut self, _pose: &RobotPose) -> Result<(), AiError> {
        self.queue.clear();
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
        let next = if !pose.is_wall_right() {
            self.queue.push_back(RobotStep::MoveForward);
            RobotStep::RotateRight
        } else if !pose.is_wall_front() {
            RobotStep::MoveForward
        } else {
            RobotStep::RotateLeft
        };
        Ok(next)
    }

    fn name(&self) -> &'static str {
        "Right Wall Follower"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::WallGrid;
    use std::sync::Arc;

    #[test]
    fn stepping_before_initialize_is_a_configuration_error() {
        let pose = RobotPose::new(Arc::new(WallGrid::new()));
        let mut follower = LeftWallFollower::new();
        assert_eq!(follower.next_step(&pose), Err(AiError::NotInitialized));
    }

    #[test]
    fn prefers_left_then_forward_then_rotates_right() {
        // On a fresh grid the start cell has walls left (boundary)
        // and right (the mandatory start wall) with the front open.
        let pose = RobotPose::new(Arc::new(WallGrid::new()));
        let mut follower = LeftWallFollower::new();
        follower.initialize(&pose).unwrap();
        assert_eq!(follower.next_step(&pose).unwrap(), RobotStep::MoveForward);
    }

    #[test]
    fn a_left_turn_is_two_primitives_across_two_ticks() {
        // Facing east at the start, the open north side is on the
        // robot's left.
        let grid = Arc::new(WallGrid::new());
        let mut pose = RobotPose::new(Arc::clone(&grid));
        pose.take_next_step(RobotStep::RotateRight).unwrap();

        let mut follower = LeftWallFollower::new();
        follower.initialize(&pose).unwrap();
        assert_eq!(follower.next_step(&pose).unwrap(), RobotStep::RotateLeft);
        assert_eq!(follower.next_step(&pose).unwrap(), RobotStep::MoveForward);
    }
}
