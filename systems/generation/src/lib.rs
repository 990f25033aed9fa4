#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Seeded level generator that only hands out solvable mazes.
//!
//! Each attempt carves a spanning tree with a randomized depth-first
//! backtracker, opens an exit stair on a random border, places the entities
//! and asks the escape solver whether the player can get out. Rejected
//! attempts are retried with the same random stream, so a seed always yields
//! the same level.

use log::debug;
use maze_chase_core::{
    Adversary, AdversaryVariant, Cell, Direction, Gate, Level, LevelError, WallGrid, WallToken,
};
use maze_chase_system_escape::{SafePathSolver, SearchOutcome, SolverConfig};
use maze_chase_world::{Maze, MazeGraph};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Smallest maze side length the generator accepts.
pub const MIN_SIZE: u32 = 2;
/// Largest maze side length the generator accepts.
pub const MAX_SIZE: u32 = 32;

/// Parameters controlling level generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Side length of the square maze.
    pub size: u32,
    /// Number of adversaries to place.
    pub adversaries: usize,
    /// Number of trap cells to place.
    pub traps: usize,
    /// Whether to place a closed gate.
    pub gate: bool,
    /// Walls knocked out after carving to create loops.
    pub extra_openings: usize,
    /// Minimum Manhattan distance between the player and every adversary.
    pub min_adversary_distance: u32,
    /// Attempts made before giving up.
    pub max_attempts: u32,
    /// Seed of the random stream.
    pub seed: u64,
    /// Solver used to validate each attempt.
    pub solver: SolverConfig,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            size: 6,
            adversaries: 1,
            traps: 0,
            gate: false,
            extra_openings: 3,
            min_adversary_distance: 3,
            max_attempts: 200,
            seed: 0,
            solver: SolverConfig::default(),
        }
    }
}

/// Level accepted by the generator together with its witness path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedLevel {
    /// The generated level.
    pub level: Level,
    /// Number of attempts it took, starting at 1.
    pub attempts: u32,
    /// Safe path from the player to the exit found during validation.
    pub solution: Vec<Cell>,
}

/// Reasons level generation can fail.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    /// Requested side length is outside the supported range.
    #[error("maze size {size} is outside {}..={}", MIN_SIZE, MAX_SIZE)]
    InvalidSize {
        /// Requested side length.
        size: u32,
    },
    /// More entities were requested than the maze has cells.
    #[error("{requested} entities do not fit into {cells} cells")]
    Overcrowded {
        /// Player, adversaries, traps and gate combined.
        requested: usize,
        /// Interior cells of the maze.
        cells: usize,
    },
    /// No attempt produced a solvable level.
    #[error("no solvable level after {attempts} attempts")]
    AttemptsExhausted {
        /// Attempts made.
        attempts: u32,
    },
}

#[derive(Debug, thiserror::Error)]
enum Rejection {
    #[error("only {placed} of {wanted} adversaries satisfy the distance rule")]
    Crowded { placed: usize, wanted: usize },
    #[error("no free cell left for the gate")]
    NoGateCell,
    #[error("{reached} of {cells} cells reachable from the player")]
    Disconnected { reached: usize, cells: usize },
    #[error("no safe path to the exit")]
    Unsolvable,
    #[error("solver budget exhausted")]
    Budget,
    #[error(transparent)]
    Invalid(#[from] LevelError),
}

/// Level generator driven by a [`GenerationConfig`].
#[derive(Clone, Copy, Debug, Default)]
pub struct MazeGenerator {
    config: GenerationConfig,
}

impl MazeGenerator {
    /// Creates a generator with the provided configuration.
    #[must_use]
    pub const fn new(config: GenerationConfig) -> Self {
        Self { config }
    }

    /// Configuration the generator runs with.
    #[must_use]
    pub const fn config(&self) -> GenerationConfig {
        self.config
    }

    /// Generates a level the player can escape from.
    pub fn generate(&self) -> Result<GeneratedLevel, GenerationError> {
        let size = self.config.size;
        if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
            return Err(GenerationError::InvalidSize { size });
        }
        let cells = (size as usize) * (size as usize);
        let requested =
            1 + self.config.adversaries + self.config.traps + usize::from(self.config.gate);
        if requested > cells {
            return Err(GenerationError::Overcrowded { requested, cells });
        }

        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        let solver = SafePathSolver::new(self.config.solver);
        for attempt in 1..=self.config.max_attempts {
            match self.attempt(&mut rng, &solver) {
                Ok((level, solution)) => {
                    debug!(
                        "generated {size}x{size} level after {attempt} attempts, solution has {} moves",
                        solution.len().saturating_sub(1)
                    );
                    return Ok(GeneratedLevel {
                        level,
                        attempts: attempt,
                        solution,
                    });
                }
                Err(rejection) => debug!("attempt {attempt} rejected: {rejection}"),
            }
        }

        Err(GenerationError::AttemptsExhausted {
            attempts: self.config.max_attempts,
        })
    }

    fn attempt(
        &self,
        rng: &mut ChaCha8Rng,
        solver: &SafePathSolver,
    ) -> Result<(Level, Vec<Cell>), Rejection> {
        let size = self.config.size;
        let mut walls = Walls::carve(size, rng);
        walls.knock_out(self.config.extra_openings, rng);
        let exit = walls.open_exit(rng);
        let grid = walls.into_grid();

        let mut cells: Vec<Cell> = grid.cells().collect();
        cells.shuffle(rng);
        let Some(player) = cells.pop() else {
            return Err(Rejection::Unsolvable);
        };

        let mut adversaries = Vec::with_capacity(self.config.adversaries);
        let mut free = Vec::with_capacity(cells.len());
        for cell in cells {
            if adversaries.len() < self.config.adversaries
                && cell.manhattan_distance(player) >= self.config.min_adversary_distance
            {
                let variant = AdversaryVariant::ALL[rng.gen_range(0..AdversaryVariant::ALL.len())];
                adversaries.push(Adversary::new(cell, variant));
            } else {
                free.push(cell);
            }
        }
        if adversaries.len() < self.config.adversaries {
            return Err(Rejection::Crowded {
                placed: adversaries.len(),
                wanted: self.config.adversaries,
            });
        }

        let traps: Vec<Cell> = free.iter().copied().take(self.config.traps).collect();
        let gate = if self.config.gate {
            let Some(cell) = free.get(self.config.traps) else {
                return Err(Rejection::NoGateCell);
            };
            Some(Gate::new(*cell, false))
        } else {
            None
        };

        let reached = MazeGraph::build(&Maze::new(&grid)).bfs(player).len();
        let cells = grid.cells().count();
        if reached != cells {
            return Err(Rejection::Disconnected { reached, cells });
        }

        let level = Level {
            grid,
            player,
            exit,
            adversaries,
            gate,
            traps,
        };
        level.validate()?;

        let outcome = solver.solve(
            &Maze::from_level(&level),
            level.player,
            level.exit,
            &level.adversaries,
        );
        match outcome {
            SearchOutcome::Escaped(plan) => Ok((level, plan.into_path())),
            SearchOutcome::Trapped => Err(Rejection::Unsolvable),
            SearchOutcome::BudgetExhausted => Err(Rejection::Budget),
        }
    }
}

/// Walled edges of every cell while carving, marked on both sides of each
/// shared edge.
struct Walls {
    size: u32,
    edges: Vec<[bool; 4]>,
}

impl Walls {
    fn sealed(size: u32) -> Self {
        let side = size as usize;
        Self {
            size,
            edges: vec![[true; 4]; side * side],
        }
    }

    fn carve(size: u32, rng: &mut ChaCha8Rng) -> Self {
        let mut walls = Self::sealed(size);
        let mut visited = vec![false; walls.edges.len()];
        let start = Cell::new(rng.gen_range(1..=size), rng.gen_range(1..=size));
        visited[walls.index(start)] = true;
        let mut stack = vec![start];

        while let Some(&current) = stack.last() {
            let unvisited: Vec<(Direction, Cell)> = Direction::ALL
                .into_iter()
                .filter_map(|direction| {
                    walls
                        .neighbor(current, direction)
                        .map(|neighbor| (direction, neighbor))
                })
                .filter(|(_, neighbor)| !visited[walls.index(*neighbor)])
                .collect();

            match unvisited.choose(rng) {
                Some(&(direction, next)) => {
                    walls.open(current, direction);
                    visited[walls.index(next)] = true;
                    stack.push(next);
                }
                None => {
                    let _ = stack.pop();
                }
            }
        }

        walls
    }

    fn knock_out(&mut self, count: usize, rng: &mut ChaCha8Rng) {
        for _ in 0..count {
            let cell = Cell::new(
                rng.gen_range(1..=self.size),
                rng.gen_range(1..=self.size),
            );
            let direction = Direction::ALL[rng.gen_range(0..Direction::ALL.len())];
            if self.neighbor(cell, direction).is_some() {
                self.open(cell, direction);
            }
        }
    }

    /// Opens a random border edge and returns the stair cell behind it.
    fn open_exit(&mut self, rng: &mut ChaCha8Rng) -> Cell {
        let side = Direction::ALL[rng.gen_range(0..Direction::ALL.len())];
        let along = rng.gen_range(1..=self.size);
        let beyond = self.size + 1;
        let (doorway, exit) = match side {
            Direction::Up => (Cell::new(along, 1), Cell::new(along, 0)),
            Direction::Down => (Cell::new(along, self.size), Cell::new(along, beyond)),
            Direction::Left => (Cell::new(1, along), Cell::new(0, along)),
            Direction::Right => (Cell::new(self.size, along), Cell::new(beyond, along)),
        };
        self.open(doorway, side);
        exit
    }

    fn into_grid(self) -> WallGrid {
        let mut grid = WallGrid::open(self.size);
        let cells: Vec<Cell> = grid.cells().collect();
        for cell in cells {
            let edges = self.edges[self.index(cell)];
            let token = WallToken::resolving(
                Direction::ALL
                    .into_iter()
                    .filter(|direction| edges[slot(*direction)]),
            );
            grid.set(cell, token);
        }
        grid
    }

    fn open(&mut self, cell: Cell, direction: Direction) {
        let index = self.index(cell);
        self.edges[index][slot(direction)] = false;
        if let Some(neighbor) = self.neighbor(cell, direction) {
            let index = self.index(neighbor);
            self.edges[index][slot(direction.opposite())] = false;
        }
    }

    fn neighbor(&self, cell: Cell, direction: Direction) -> Option<Cell> {
        cell.step(direction).filter(|next| {
            (1..=self.size).contains(&next.x()) && (1..=self.size).contains(&next.y())
        })
    }

    fn index(&self, cell: Cell) -> usize {
        (cell.y() as usize - 1) * self.size as usize + (cell.x() as usize - 1)
    }
}

const fn slot(direction: Direction) -> usize {
    match direction {
        Direction::Up => 0,
        Direction::Down => 1,
        Direction::Left => 2,
        Direction::Right => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carving_spans_every_cell() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let grid = Walls::carve(5, &mut rng).into_grid();

        let reached = MazeGraph::build(&Maze::new(&grid)).bfs(Cell::new(3, 3));
        assert_eq!(reached.len(), 25);
    }

    #[test]
    fn spanning_tree_has_one_edge_per_cell_but_one() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let grid = Walls::carve(4, &mut rng).into_grid();

        let graph = MazeGraph::build(&Maze::new(&grid));
        assert_eq!(graph.edge_count(), 2 * (16 - 1));
    }

    #[test]
    fn exit_is_a_stair_with_an_open_doorway() {
        for seed in 0..16 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut walls = Walls::carve(4, &mut rng);
            let exit = walls.open_exit(&mut rng);
            let grid = walls.into_grid();

            assert!(grid.is_stair(exit), "seed {seed}");
            assert!(
                Maze::new(&grid).with_exit(exit).exit_doorway().is_some(),
                "seed {seed}"
            );
        }
    }

    #[test]
    fn slots_are_distinct() {
        let mut slots: Vec<usize> = Direction::ALL.into_iter().map(slot).collect();
        slots.sort_unstable();
        slots.dedup();
        assert_eq!(slots.len(), 4);
    }
}
