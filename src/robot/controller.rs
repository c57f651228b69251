use std::sync::Arc;

use log::debug;

use crate::ai::NavigationStrategy;
use crate::error::{AiError, SimError};
use crate::maze::WallGrid;

use super::{RobotPose, RobotStep};

/// hard cap on steps before a run is declared over
pub const MAX_STEP_COUNT: u32 = 2000;

/// drives one navigation strategy against one pose, one step at a
/// time, and keeps the run statistics
pub struct RobotController {
    pose: RobotPose,
    ai: Box<dyn NavigationStrategy>,
    /// latched when the robot drives into a wall; the run is invalid
    /// from then on
    crashed: bool,
    move_count: u32,
    turn_count: u32,
}

impl RobotController {
    pub fn new(grid: Arc<WallGrid>, ai: Box<dyn NavigationStrategy>) -> Result<Self, AiError> {
        let mut controller = Self {
            pose: RobotPose::new(grid),
            ai,
            crashed: false,
            move_count: 0,
            turn_count: 0,
        };
        controller.initialize()?;
        Ok(controller)
    }

    /// resets the pose, the strategy memory, and all counters
    pub fn initialize(&mut self) -> Result<(), AiError> {
        self.pose.reset();
        self.ai.initialize(&self.pose)?;
        self.crashed = false;
        self.move_count = 0;
        self.turn_count = 0;
        Ok(())
    }

    /// asks the strategy for its next step and applies it
    pub fn next_step(&mut self) -> Result<RobotStep, SimError> {
        let step = self.ai.next_step(&self.pose)?;
        if let Err(crash) = self.pose.take_next_step(step) {
            self.crashed = true;
            debug!("run ended: {crash}");
            return Err(crash.into());
        }
        if step.is_turn() {
            self.turn_count += 1;
        } else {
            self.move_count += 1;
        }
        Ok(step)
    }

    /// crashed or out of steps
    pub fn is_done(&self) -> bool {
        self.crashed || self.step_count() > MAX_STEP_COUNT
    }

    pub fn crashed(&self) -> bool {
        self.crashed
    }

    /// total steps taken so far; turns count as a step
    pub fn step_count(&self) -> u32 {
        self.move_count + self.turn_count
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    pub fn pose(&self) -> &RobotPose {
        &self.pose
    }

    pub fn strategy_name(&self) -> &'static str {
        self.ai.name()
    }

    /// playback-speed hint, never a correctness flag
    pub fn is_in_turbo_mode(&self) -> bool {
        self.ai.is_in_turbo_mode()
    }

    pub fn set_speed_run(&mut self, speed_run: bool) {
        self.ai.set_speed_run(speed_run);
    }
}
