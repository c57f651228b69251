use thiserror::Error;

use crate::maze::{Cell, Direction};

/// Fatal motion-model failures. A collision means the driving
/// strategy tried to move through a sensed wall; the run is invalid
/// from that point and must be restarted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PoseError {
    #[error("robot crashed into the {direction} wall of cell {cell}")]
    WallCollision { cell: Cell, direction: Direction },
}

/// Failures inside a navigation strategy, fatal to that strategy
/// instance for the current run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AiError {
    #[error("strategy was not initialized before stepping")]
    NotInitialized,
    #[error("no open route to the goal in the discovered maze")]
    GoalUnreachable,
}

/// Anything that can end a simulation run early.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SimError {
    #[error(transparent)]
    Pose(#[from] PoseError),
    #[error(transparent)]
    Ai(#[from] AiError),
}
