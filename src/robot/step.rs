/// one discrete step taken by a robot; backward moves keep the facing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RobotStep {
    MoveForward,
    MoveBackward,
    RotateLeft,
    RotateRight,
}

impl RobotStep {
    pub fn is_turn(self) -> bool {
        matches!(self, Self::RotateLeft | Self::RotateRight)
    }
}
