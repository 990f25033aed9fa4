//! Complete level description handed to the engine by its callers.

use serde::{Deserialize, Serialize};

use crate::{Adversary, Cell, Gate, WallGrid};

/// Map plus entity placement for a single maze.
///
/// Traps are carried for the collision layer of the game and are never
/// consulted by the pursuit or escape systems.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    /// Wall tokens of every interior cell.
    pub grid: WallGrid,
    /// Cell the player starts on.
    pub player: Cell,
    /// Stair cell the player must reach.
    pub exit: Cell,
    /// Adversaries in their starting positions.
    #[serde(default)]
    pub adversaries: Vec<Adversary>,
    /// Optional gate overlaid on the wall topology.
    #[serde(default)]
    pub gate: Option<Gate>,
    /// Trap cells consumed by the collision layer.
    #[serde(default)]
    pub traps: Vec<Cell>,
}

impl Level {
    /// Checks that every entity lies where the engine expects it.
    pub fn validate(&self) -> Result<(), LevelError> {
        if !self.grid.contains(self.player) {
            return Err(LevelError::OutsideGrid {
                entity: "player",
                cell: self.player,
            });
        }
        if !self.grid.is_stair(self.exit) {
            return Err(LevelError::ExitNotStair(self.exit));
        }
        for adversary in &self.adversaries {
            if !self.grid.contains(adversary.position) {
                return Err(LevelError::OutsideGrid {
                    entity: "adversary",
                    cell: adversary.position,
                });
            }
        }
        if let Some(gate) = self.gate {
            if !self.grid.contains(gate.cell) {
                return Err(LevelError::OutsideGrid {
                    entity: "gate",
                    cell: gate.cell,
                });
            }
        }
        if let Some(trap) = self.traps.iter().find(|trap| !self.grid.contains(**trap)) {
            return Err(LevelError::OutsideGrid {
                entity: "trap",
                cell: *trap,
            });
        }
        Ok(())
    }
}

/// Reasons a grid or level description is rejected.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LevelError {
    /// The grid contains no rows.
    #[error("wall grid has no rows")]
    EmptyGrid,
    /// The grid is too large to address with 32-bit coordinates.
    #[error("wall grid with {0} rows exceeds the supported size")]
    GridTooLarge(usize),
    /// A row does not match the number of rows.
    #[error("row {row} holds {length} tokens but the grid needs {expected}")]
    NotSquare {
        /// 1-based index of the offending row.
        row: usize,
        /// Number of tokens found in the row.
        length: usize,
        /// Number of tokens every row must contain.
        expected: usize,
    },
    /// An entity lies outside the interior cells.
    #[error("{entity} at ({}, {}) lies outside the grid", .cell.x(), .cell.y())]
    OutsideGrid {
        /// Kind of entity that was misplaced.
        entity: &'static str,
        /// Cell the entity was placed on.
        cell: Cell,
    },
    /// The exit is not adjacent to exactly one side of the grid.
    #[error("exit ({}, {}) is not a stair cell next to the grid", .0.x(), .0.y())]
    ExitNotStair(Cell),
}
