//! navigation strategies: read the robot's wall sensors, emit one
//! discrete step per tick

mod floodfill;
mod tremaux;
mod wall_follower;

pub use floodfill::Floodfill;
pub use tremaux::Tremaux;
pub use wall_follower::{LeftWallFollower, RightWallFollower};

use crate::error::AiError;
use crate::robot::{RobotPose, RobotStep};

/// a pluggable navigation algorithm; strategies only ever see the
/// sensor and pose query surface, never the maze itself, so scripted
/// strategies can plug in through this same seam
pub trait NavigationStrategy {
    fn initialize(&mut self, pose: &RobotPose) -> Result<(), AiError>;

    /// returns exactly one primitive step; a decision that needs two
    /// (rotate, then advance) queues the second internally and
    /// returns it on the following call
    fn next_step(&mut self, pose: &RobotPose) -> Result<RobotStep, AiError>;

    /// whether the latest decision replays known territory, a
    /// playback-speed hint only
    fn is_in_turbo_mode(&self) -> bool {
        false
    }

    fn set_speed_run(&mut self, _speed_run: bool) {}

    fn name(&self) -> &'static str;
}
