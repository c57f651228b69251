use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;

use micromouse::ai::{
    Floodfill, LeftWallFollower, NavigationStrategy, RightWallFollower, Tremaux,
};
use micromouse::robot::MAX_STEP_COUNT;

#[derive(Parser, Debug)]
#[command(name = "micromouse")]
#[command(about = "Micromouse maze simulator with pluggable navigation strategies")]
pub struct Args {
    /// Sets the logger's verbosity level
    #[arg(short, long, value_name = "VERBOSITY", default_value_t = LevelFilter::Info)]
    pub verbosity: LevelFilter,

    /// Maze file to load (.maz format); built-in maze when omitted
    #[arg(short, long, value_name = "FILE")]
    pub maze: Option<PathBuf>,

    /// Delay between steps in milliseconds (0 = no delay)
    #[arg(short, long, default_value_t = 0)]
    pub delay: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one strategy against the maze
    Run {
        /// Navigation strategy to use
        #[arg(value_enum)]
        strategy: Strategy,

        /// Redraw the maze after every step
        #[arg(short, long)]
        watch: bool,

        /// Stop at the first center arrival instead of letting the
        /// strategy keep running
        #[arg(long)]
        until_goal: bool,

        /// Cap on total steps for the run
        #[arg(long, default_value_t = MAX_STEP_COUNT)]
        max_steps: u32,

        /// Restrict return trips to explored cells (flood-fill only)
        #[arg(long)]
        speed_run: bool,
    },

    /// Run every strategy on the same maze and compare performance
    Benchmark {
        /// Cap on total steps per strategy
        #[arg(long, default_value_t = MAX_STEP_COUNT)]
        max_steps: u32,
    },

    /// Check the maze against the competition legality rules
    Validate,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Strategy {
    /// Left-hand wall follower
    #[value(name = "left-wall")]
    LeftWall,

    /// Right-hand wall follower
    #[value(name = "right-wall")]
    RightWall,

    /// Tremaux's ball-of-string exploration
    Tremaux,

    /// Flood-fill distance field
    Floodfill,
}

impl Strategy {
    pub fn all() -> impl Iterator<Item = Self> {
        [Self::LeftWall, Self::RightWall, Self::Tremaux, Self::Floodfill].into_iter()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::LeftWall => "Left Wall Follower",
            Self::RightWall => "Right Wall Follower",
            Self::Tremaux => "Tremaux",
            Self::Floodfill => "Floodfill",
        }
    }

    pub fn build(&self) -> Box<dyn NavigationStrategy> {
        match self {
            Self::LeftWall => Box::new(LeftWallFollower::new()),
            Self::RightWall => Box::new(RightWallFollower::new()),
            Self::Tremaux => Box::new(Tremaux::new()),
            Self::Floodfill => Box::new(Floodfill::new()),
        }
    }
}
