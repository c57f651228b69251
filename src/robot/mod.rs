mod controller;
mod pose;
mod step;

pub use controller::{MAX_STEP_COUNT, RobotController};
pub use pose::RobotPose;
pub use step::RobotStep;
