#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter for generating, solving and stepping Maze Chase levels.
//!
//! Commands that take a level accept either a path to a TOML level file or a
//! `chase:v1:...` transfer string.

mod level_io;
mod level_transfer;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;
use maze_chase_core::{is_caught, AdversaryVariant, Cell, Direction, Level};
use maze_chase_system_escape::{SafePathSolver, SearchOutcome, SolverConfig};
use maze_chase_system_generation::{GenerationConfig, MazeGenerator};
use maze_chase_system_pursuit::advance_all_with_moves;
use maze_chase_world::{Maze, MazeGraph};

/// Generate and analyse Maze Chase levels.
#[derive(Debug, Parser)]
#[command(name = "maze-chase", about, version)]
struct Cli {
    /// Enable debug messages
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate a solvable level
    Generate(GenerateArgs),
    /// Print a safe path from the player to the exit
    Solve(SolveArgs),
    /// Print the direction of the first safe move
    Hint(SolveArgs),
    /// Move the player once and advance every adversary
    Step(StepArgs),
    /// Convert a TOML level file into a transfer string
    Encode {
        /// Level file to encode
        path: PathBuf,
    },
    /// Convert a transfer string into a TOML level
    Decode {
        /// Transfer string to decode
        value: String,
        /// Write the level to this file instead of standard output
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Args)]
struct GenerateArgs {
    /// TOML file with generator settings
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Side length of the maze
    #[arg(long)]
    size: Option<u32>,
    /// Number of adversaries
    #[arg(long)]
    adversaries: Option<usize>,
    /// Number of trap cells
    #[arg(long)]
    traps: Option<usize>,
    /// Place a closed gate
    #[arg(long, default_value_t = false)]
    gate: bool,
    /// Seed of the random stream
    #[arg(long)]
    seed: Option<u64>,
    /// Attempts made before giving up
    #[arg(long)]
    max_attempts: Option<u32>,
    /// Print a transfer string instead of TOML
    #[arg(long, default_value_t = false)]
    transfer: bool,
    /// Write the level to this file instead of standard output
    #[arg(short, long)]
    output: Option<PathBuf>,
    #[command(flatten)]
    solver: SolverArgs,
}

#[derive(Debug, Args)]
struct SolveArgs {
    /// Level file or transfer string
    level: String,
    #[command(flatten)]
    solver: SolverArgs,
}

#[derive(Debug, Args)]
struct SolverArgs {
    /// Maximum number of search expansions
    #[arg(long)]
    max_expansions: Option<usize>,
    /// Search without joint-state deduplication
    #[arg(long, default_value_t = false)]
    no_dedup: bool,
}

impl SolverArgs {
    fn apply(&self, base: SolverConfig) -> SolverConfig {
        SolverConfig {
            max_expansions: self.max_expansions.unwrap_or(base.max_expansions),
            deduplicate: base.deduplicate && !self.no_dedup,
        }
    }
}

#[derive(Debug, Args)]
struct StepArgs {
    /// Level file or transfer string
    level: String,
    /// Direction the player moves in
    #[arg(value_enum)]
    direction: MoveArg,
    /// Write the updated level to this file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum MoveArg {
    Up,
    Down,
    Left,
    Right,
}

impl From<MoveArg> for Direction {
    fn from(value: MoveArg) -> Self {
        match value {
            MoveArg::Up => Direction::Up,
            MoveArg::Down => Direction::Down,
            MoveArg::Left => Direction::Left,
            MoveArg::Right => Direction::Right,
        }
    }
}

/// Entry point for the Maze Chase command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    let filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    match cli.command {
        Command::Generate(args) => generate(&args),
        Command::Solve(args) => solve(&args),
        Command::Hint(args) => hint(&args),
        Command::Step(args) => step(&args),
        Command::Encode { path } => {
            let level = level_io::read_level(&path)?;
            println!("{}", level_transfer::encode(&level)?);
            Ok(())
        }
        Command::Decode { value, output } => {
            let level = level_io::load_level(&value)?;
            emit_level(&level, output.as_deref(), false)
        }
    }
}

fn generate(args: &GenerateArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => level_io::read_generation_config(path)?,
        None => GenerationConfig::default(),
    };
    if let Some(size) = args.size {
        config.size = size;
    }
    if let Some(adversaries) = args.adversaries {
        config.adversaries = adversaries;
    }
    if let Some(traps) = args.traps {
        config.traps = traps;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(max_attempts) = args.max_attempts {
        config.max_attempts = max_attempts;
    }
    config.gate |= args.gate;
    config.solver = args.solver.apply(config.solver);

    let generated = MazeGenerator::new(config)
        .generate()
        .context("level generation failed")?;
    info!(
        "generated level after {} attempts with a {}-move solution",
        generated.attempts,
        generated.solution.len().saturating_sub(1)
    );
    emit_level(&generated.level, args.output.as_deref(), args.transfer)
}

fn solve(args: &SolveArgs) -> Result<()> {
    let level = level_io::load_level(&args.level)?;
    match run_solver(&level, &args.solver) {
        SearchOutcome::Escaped(plan) => {
            let cells: Vec<String> = plan.path().iter().map(|cell| format_cell(*cell)).collect();
            println!("{} moves: {}", plan.moves(), cells.join(" -> "));
            Ok(())
        }
        SearchOutcome::Trapped => bail!("no safe path to the exit"),
        SearchOutcome::BudgetExhausted => {
            bail!("search budget exhausted; raise --max-expansions")
        }
    }
}

fn hint(args: &SolveArgs) -> Result<()> {
    let level = level_io::load_level(&args.level)?;
    match run_solver(&level, &args.solver) {
        SearchOutcome::Escaped(plan) => {
            match plan.first_move() {
                Some(direction) => println!("{}", direction_name(direction)),
                None => println!("already on the exit"),
            }
            Ok(())
        }
        SearchOutcome::Trapped => bail!("no safe move"),
        SearchOutcome::BudgetExhausted => {
            bail!("search budget exhausted; raise --max-expansions")
        }
    }
}

fn step(args: &StepArgs) -> Result<()> {
    let mut level = level_io::load_level(&args.level)?;
    let direction = Direction::from(args.direction);
    let maze = Maze::from_level(&level);

    let Some(target) = level.player.step(direction) else {
        bail!("the player cannot move {}", direction_name(direction));
    };
    if !MazeGraph::build(&maze).neighbors(level.player).contains(&target) {
        bail!(
            "a wall blocks the player moving {} from {}",
            direction_name(direction),
            format_cell(level.player)
        );
    }

    let outcomes = advance_all_with_moves(&maze, &level.adversaries, target);
    println!("player: {} -> {}", format_cell(level.player), format_cell(target));
    for (index, (adversary, outcome)) in level.adversaries.iter().zip(&outcomes).enumerate() {
        let moves: Vec<&str> = outcome.moves.iter().map(|move_| direction_name(*move_)).collect();
        println!(
            "adversary {} ({}): {} -> {} moves [{}] facing {}",
            index + 1,
            variant_name(adversary.variant),
            format_cell(adversary.position),
            format_cell(outcome.position),
            moves.join(", "),
            outcome.facing.map_or("-", direction_name)
        );
    }

    let adversaries = level
        .adversaries
        .iter()
        .zip(&outcomes)
        .map(|(adversary, outcome)| adversary.moved_to(outcome.position))
        .collect();
    level.player = target;
    level.adversaries = adversaries;

    if target == level.exit {
        println!("escaped");
    } else if is_caught(target, &level.adversaries) {
        println!("caught");
    }

    match &args.output {
        Some(path) => level_io::write_level(path, &level),
        None => Ok(()),
    }
}

fn run_solver(level: &Level, args: &SolverArgs) -> SearchOutcome {
    let solver = SafePathSolver::new(args.apply(SolverConfig::default()));
    solver.solve(
        &Maze::from_level(level),
        level.player,
        level.exit,
        &level.adversaries,
    )
}

fn emit_level(level: &Level, output: Option<&std::path::Path>, transfer: bool) -> Result<()> {
    if let Some(path) = output {
        return level_io::write_level(path, level);
    }
    if transfer {
        println!("{}", level_transfer::encode(level)?);
    } else {
        print!("{}", level_io::level_to_toml(level)?);
    }
    Ok(())
}

fn format_cell(cell: Cell) -> String {
    format!("({}, {})", cell.x(), cell.y())
}

const fn direction_name(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => "up",
        Direction::Down => "down",
        Direction::Left => "left",
        Direction::Right => "right",
    }
}

const fn variant_name(variant: AdversaryVariant) -> &'static str {
    match variant {
        AdversaryVariant::DumbVertical => "dumb-vertical",
        AdversaryVariant::DumbHorizontal => "dumb-horizontal",
        AdversaryVariant::SmartVertical => "smart-vertical",
        AdversaryVariant::SmartHorizontal => "smart-horizontal",
    }
}
