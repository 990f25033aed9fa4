#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Breadth-first escape planner that accounts for adversaries reacting to
//! every player move.
//!
//! Search nodes pair a player cell with the adversary snapshot produced by the
//! pursuit system after the player arrived there. A node whose cell is
//! occupied by an adversary is pruned without expansion. The same solver backs
//! level validation (solvability only) and in-game hints (first move only).

use std::collections::{HashSet, VecDeque};

use log::debug;
use maze_chase_core::{is_caught, Adversary, Cell, Direction};
use maze_chase_system_pursuit::advance_all;
use maze_chase_world::{Maze, MazeGraph};
use serde::{Deserialize, Serialize};

/// Tuning knobs for [`SafePathSolver`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Maximum number of nodes expanded before the search gives up.
    pub max_expansions: usize,
    /// Skips nodes whose player cell and adversary positions were already
    /// queued.
    pub deduplicate: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_expansions: 250_000,
            deduplicate: true,
        }
    }
}

/// Winning path together with the adversaries' final reaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EscapePlan {
    path: Vec<Cell>,
    adversaries: Vec<Adversary>,
}

impl EscapePlan {
    /// Player cells from start to goal, both included.
    #[must_use]
    pub fn path(&self) -> &[Cell] {
        &self.path
    }

    /// Adversary snapshot after reacting to the final move.
    #[must_use]
    pub fn adversaries(&self) -> &[Adversary] {
        &self.adversaries
    }

    /// Number of player moves in the plan.
    #[must_use]
    pub fn moves(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    /// Direction of the first move, or `None` when the player already stands
    /// on the goal.
    #[must_use]
    pub fn first_move(&self) -> Option<Direction> {
        match self.path.as_slice() {
            [from, to, ..] => from.direction_to(*to),
            _ => None,
        }
    }

    /// Consumes the plan and returns the player path.
    #[must_use]
    pub fn into_path(self) -> Vec<Cell> {
        self.path
    }
}

/// Result of a single solver invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    /// A safe path reaches the goal.
    Escaped(EscapePlan),
    /// Every branch ends with the player caught or walled in.
    Trapped,
    /// The expansion budget ran out before the search concluded.
    BudgetExhausted,
}

impl SearchOutcome {
    /// Plan carried by a successful search.
    #[must_use]
    pub fn plan(&self) -> Option<&EscapePlan> {
        match self {
            Self::Escaped(plan) => Some(plan),
            Self::Trapped | Self::BudgetExhausted => None,
        }
    }

    /// Consumes the outcome and returns the plan of a successful search.
    #[must_use]
    pub fn into_plan(self) -> Option<EscapePlan> {
        match self {
            Self::Escaped(plan) => Some(plan),
            Self::Trapped | Self::BudgetExhausted => None,
        }
    }

    /// Reports whether the search found a safe path.
    #[must_use]
    pub const fn is_escape(&self) -> bool {
        matches!(self, Self::Escaped(_))
    }
}

#[derive(Debug)]
struct SearchNode {
    cell: Cell,
    parent: Option<usize>,
    adversaries: Vec<Adversary>,
}

/// Breadth-first planner over joint player and adversary states.
#[derive(Clone, Copy, Debug, Default)]
pub struct SafePathSolver {
    config: SolverConfig,
}

impl SafePathSolver {
    /// Creates a solver with the provided configuration.
    #[must_use]
    pub const fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Configuration the solver runs with.
    #[must_use]
    pub const fn config(&self) -> SolverConfig {
        self.config
    }

    /// Searches for a path from `start` to `goal` on which the player never
    /// shares a cell with an adversary.
    ///
    /// Adversaries advance once per player move, reacting to the cell the
    /// player moves into. Reaching the goal ends the search immediately; the
    /// returned snapshot includes the adversaries' reaction to that last move.
    #[must_use]
    pub fn solve(
        &self,
        maze: &Maze<'_>,
        start: Cell,
        goal: Cell,
        adversaries: &[Adversary],
    ) -> SearchOutcome {
        if is_caught(start, adversaries) {
            debug!(
                "escape search from ({}, {}) starts caught",
                start.x(),
                start.y()
            );
            return SearchOutcome::Trapped;
        }
        if start == goal {
            return SearchOutcome::Escaped(EscapePlan {
                path: vec![start],
                adversaries: adversaries.to_vec(),
            });
        }

        let graph = MazeGraph::build(maze);
        let mut nodes = vec![SearchNode {
            cell: start,
            parent: None,
            adversaries: adversaries.to_vec(),
        }];
        let mut queue = VecDeque::from([0_usize]);
        let mut visited: HashSet<(Cell, Vec<Cell>)> = HashSet::new();
        if self.config.deduplicate {
            let _ = visited.insert(joint_key(start, adversaries));
        }
        let mut expansions = 0_usize;

        while let Some(index) = queue.pop_front() {
            let (cell, current) = {
                let node = &nodes[index];
                (node.cell, node.adversaries.clone())
            };
            if is_caught(cell, &current) {
                continue;
            }
            if expansions >= self.config.max_expansions {
                debug!(
                    "escape search gave up after {expansions} expansions with {} nodes queued",
                    queue.len()
                );
                return SearchOutcome::BudgetExhausted;
            }
            expansions += 1;

            for &neighbor in graph.neighbors(cell) {
                let advanced = advance_all(maze, &current, neighbor);
                if neighbor == goal {
                    let mut path = trace_path(&nodes, index);
                    path.push(neighbor);
                    debug!(
                        "escape found with {} moves after {expansions} expansions",
                        path.len() - 1
                    );
                    return SearchOutcome::Escaped(EscapePlan {
                        path,
                        adversaries: advanced,
                    });
                }

                if self.config.deduplicate && !visited.insert(joint_key(neighbor, &advanced)) {
                    continue;
                }
                nodes.push(SearchNode {
                    cell: neighbor,
                    parent: Some(index),
                    adversaries: advanced,
                });
                queue.push_back(nodes.len() - 1);
            }
        }

        debug!(
            "escape search exhausted {} nodes without reaching ({}, {})",
            nodes.len(),
            goal.x(),
            goal.y()
        );
        SearchOutcome::Trapped
    }

    /// Direction of the first safe move toward `goal`, if any.
    #[must_use]
    pub fn hint(
        &self,
        maze: &Maze<'_>,
        player: Cell,
        goal: Cell,
        adversaries: &[Adversary],
    ) -> Option<Direction> {
        self.solve(maze, player, goal, adversaries)
            .plan()
            .and_then(EscapePlan::first_move)
    }
}

fn joint_key(cell: Cell, adversaries: &[Adversary]) -> (Cell, Vec<Cell>) {
    (
        cell,
        adversaries
            .iter()
            .map(|adversary| adversary.position)
            .collect(),
    )
}

fn trace_path(nodes: &[SearchNode], leaf: usize) -> Vec<Cell> {
    let mut path = Vec::new();
    let mut cursor = Some(leaf);
    while let Some(index) = cursor {
        let node = &nodes[index];
        path.push(node.cell);
        cursor = node.parent;
    }
    path.reverse();
    path
}
