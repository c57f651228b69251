mod cli;
mod logging;

use std::fs::File;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use eyre::{Result, WrapErr};
use log::{debug, info, warn};

use cli::{Args, Command, Strategy};
use logging::Logger;
use micromouse::maze::{WallGrid, maz};
use micromouse::render::render_maze;
use micromouse::robot::RobotController;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    Logger::init(args.verbosity);

    let grid = load_grid(&args)?;

    match args.command {
        Command::Run {
            strategy,
            watch,
            until_goal,
            max_steps,
            speed_run,
        } => {
            let options = RunOptions {
                delay: args.delay,
                watch,
                until_goal,
                max_steps,
                speed_run,
            };
            let outcome = run_strategy(grid, strategy, &options).await?;
            print_outcome(&outcome);
        }
        Command::Benchmark { max_steps } => {
            run_benchmark(grid, args.delay, max_steps).await?;
        }
        Command::Validate => validate(&grid),
    }

    Ok(())
}

fn load_grid(args: &Args) -> Result<WallGrid> {
    match &args.maze {
        Some(path) => {
            info!("loading maze: {}", path.display());
            let file =
                File::open(path).wrap_err_with(|| format!("opening {}", path.display()))?;
            maz::load_maz(file)
        }
        None => {
            debug!("using the built-in maze");
            Ok(WallGrid::reference())
        }
    }
}

struct RunOptions {
    delay: u64,
    watch: bool,
    until_goal: bool,
    max_steps: u32,
    speed_run: bool,
}

struct RunOutcome {
    strategy: &'static str,
    moves: u32,
    turns: u32,
    crashed: bool,
    first_run: usize,
    best_run: usize,
}

async fn run_strategy(
    grid: WallGrid,
    strategy: Strategy,
    options: &RunOptions,
) -> Result<RunOutcome> {
    info!("running {}", strategy.name());
    if options.delay > 0 {
        debug!("delay: {}ms", options.delay);
    }

    let grid = Arc::new(grid);
    let mut controller = RobotController::new(Arc::clone(&grid), strategy.build())?;
    controller.set_speed_run(options.speed_run);

    while !controller.is_done() && controller.step_count() < options.max_steps {
        if let Err(error) = controller.next_step() {
            warn!("{error}");
            break;
        }
        if options.watch {
            println!("{}", render_maze(&grid, Some(controller.pose())));
        }
        if options.until_goal && !controller.pose().first_run().is_empty() {
            info!("reached the center in {} steps", controller.step_count());
            break;
        }
        if options.delay > 0 {
            // Turbo steps replay known territory, so play them fast.
            let delay = if controller.is_in_turbo_mode() {
                options.delay / 4
            } else {
                options.delay
            };
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
    }

    Ok(RunOutcome {
        strategy: strategy.name(),
        moves: controller.move_count(),
        turns: controller.turn_count(),
        crashed: controller.crashed(),
        first_run: controller.pose().first_run().len(),
        best_run: controller.pose().best_run().len(),
    })
}

fn print_outcome(outcome: &RunOutcome) {
    if outcome.crashed {
        warn!("{} crashed into a wall", outcome.strategy);
    }
    info!(
        "finished: {} moves, {} turns",
        outcome.moves, outcome.turns
    );
    if outcome.first_run > 0 {
        info!("first run: {} cells", outcome.first_run);
        info!("best run: {} cells", outcome.best_run);
    } else {
        info!("the center was never reached");
    }
}

async fn run_benchmark(grid: WallGrid, delay: u64, max_steps: u32) -> Result<()> {
    info!("benchmarking all strategies");

    let mut completed = Vec::new();
    for strategy in Strategy::all() {
        let options = RunOptions {
            delay,
            watch: false,
            until_goal: false,
            max_steps,
            speed_run: true,
        };
        match run_strategy(grid.clone(), strategy, &options).await {
            Ok(outcome) => {
                print_outcome(&outcome);
                completed.push(outcome);
            }
            Err(e) => {
                log::error!("{} failed: {}", strategy.name(), e);
            }
        }
    }

    print_benchmark_summary(&completed);
    Ok(())
}

fn print_benchmark_summary(results: &[RunOutcome]) {
    info!("\nbenchmark results:");
    info!(
        "{:<22} {:>7} {:>7} {:>10} {:>9}",
        "strategy", "moves", "turns", "first run", "best run"
    );
    info!("{:-<60}", "");

    for outcome in results {
        info!(
            "{:<22} {:>7} {:>7} {:>10} {:>9}",
            outcome.strategy, outcome.moves, outcome.turns, outcome.first_run, outcome.best_run,
        );
    }

    if let Some(best) = results
        .iter()
        .filter(|outcome| outcome.best_run > 0)
        .min_by_key(|outcome| outcome.best_run)
    {
        info!("\nbest: {} ({} cells)", best.strategy, best.best_run);
    }
}

fn validate(grid: &WallGrid) {
    println!("{}", render_maze(grid, None));
    if grid.is_legal() {
        info!("maze is legal");
    } else {
        warn!("maze is not legal");
        for cell in grid.where_illegal() {
            warn!("offending peg at {cell}");
        }
    }
}
