mod cell;
mod direction;
mod grid;
pub mod maz;

pub use cell::Cell;
pub use direction::Direction;
pub use grid::{SIZE, WallGrid};
