#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wall topology and maze graph for Maze Chase.
//!
//! The functions in this crate answer one question: may an actor cross from a
//! cell to its neighbour? [`can_cross`] judges the wall tokens of both cells,
//! [`can_cross_gated`] additionally honours a closed gate, and [`Maze`] bundles
//! a grid with its gate and exit so systems can query a single value. The
//! [`navigation`] module lifts that predicate into a graph for traversal.

use maze_chase_core::{Cell, Direction, Gate, Level, WallGrid};

pub mod navigation;

pub use navigation::MazeGraph;

/// Reports whether an actor may step from `cell` in `direction`.
///
/// Both endpoints must be interior cells. The crossing is allowed only when the
/// current token leaves the facing edge open and the neighbouring token leaves
/// the opposite edge open. Stair cells are never reachable through this
/// predicate.
#[must_use]
pub fn can_cross(grid: &WallGrid, cell: Cell, direction: Direction) -> bool {
    let Some(current) = grid.token(cell) else {
        return false;
    };
    let Some(neighbor) = cell.step(direction) else {
        return false;
    };
    let Some(next) = grid.token(neighbor) else {
        return false;
    };

    !current.blocks(direction) && !next.blocks(direction.opposite())
}

/// Gate-aware variant of [`can_cross`].
///
/// A closed gate rejects vertical moves whose destination is the gate cell;
/// horizontal moves into the gate cell fall through to the wall tokens.
#[must_use]
pub fn can_cross_gated(
    grid: &WallGrid,
    cell: Cell,
    direction: Direction,
    gate: Option<&Gate>,
) -> bool {
    if !can_cross(grid, cell, direction) {
        return false;
    }

    match (gate, cell.step(direction)) {
        (Some(gate), Some(destination)) => !gate.blocks(destination, direction),
        _ => true,
    }
}

/// Read-only view bundling a wall grid with its gate and exit.
#[derive(Clone, Copy, Debug)]
pub struct Maze<'a> {
    grid: &'a WallGrid,
    gate: Option<Gate>,
    exit: Option<Cell>,
}

impl<'a> Maze<'a> {
    /// Captures a view over the provided grid without gate or exit.
    #[must_use]
    pub const fn new(grid: &'a WallGrid) -> Self {
        Self {
            grid,
            gate: None,
            exit: None,
        }
    }

    /// Captures the grid, gate and exit described by a level.
    #[must_use]
    pub fn from_level(level: &'a Level) -> Self {
        Self {
            grid: &level.grid,
            gate: level.gate,
            exit: Some(level.exit),
        }
    }

    /// Returns a copy of the view with the provided gate overlaid.
    #[must_use]
    pub const fn with_gate(mut self, gate: Option<Gate>) -> Self {
        self.gate = gate;
        self
    }

    /// Returns a copy of the view exiting through the provided stair cell.
    #[must_use]
    pub const fn with_exit(mut self, exit: Cell) -> Self {
        self.exit = Some(exit);
        self
    }

    /// Wall grid backing the view.
    #[must_use]
    pub const fn grid(&self) -> &'a WallGrid {
        self.grid
    }

    /// Gate overlaid on the view, if any.
    #[must_use]
    pub const fn gate(&self) -> Option<Gate> {
        self.gate
    }

    /// Stair cell the view exits through, if any.
    #[must_use]
    pub const fn exit(&self) -> Option<Cell> {
        self.exit
    }

    /// Reports whether an actor may step from `cell` in `direction`.
    #[must_use]
    pub fn can_cross(&self, cell: Cell, direction: Direction) -> bool {
        can_cross_gated(self.grid, cell, direction, self.gate.as_ref())
    }

    /// Interior cell adjacent to the exit and the direction leading out.
    ///
    /// Returns `None` when the view has no exit, the exit is not a stair cell,
    /// or the interior cell walls off the edge facing the stair.
    #[must_use]
    pub fn exit_doorway(&self) -> Option<(Cell, Direction)> {
        let exit = self.exit?;
        if !self.grid.is_stair(exit) {
            return None;
        }

        Direction::ALL.into_iter().find_map(|inward| {
            let doorway = exit.step(inward)?;
            let token = self.grid.token(doorway)?;
            let outward = inward.opposite();
            (!token.blocks(outward)).then_some((doorway, outward))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_chase_core::WallToken;

    fn token(spelling: &str) -> WallToken {
        spelling.parse().expect("valid token")
    }

    #[test]
    fn open_grid_allows_interior_moves_only() {
        let grid = WallGrid::open(3);
        assert!(can_cross(&grid, Cell::new(1, 1), Direction::Right));
        assert!(can_cross(&grid, Cell::new(1, 1), Direction::Down));
        assert!(!can_cross(&grid, Cell::new(1, 1), Direction::Up));
        assert!(!can_cross(&grid, Cell::new(1, 1), Direction::Left));
        assert!(!can_cross(&grid, Cell::new(3, 3), Direction::Right));
    }

    #[test]
    fn either_side_of_an_edge_blocks_the_crossing() {
        let mut grid = WallGrid::open(3);
        grid.set(Cell::new(2, 2), token("t"));
        assert!(!can_cross(&grid, Cell::new(2, 2), Direction::Up));
        assert!(!can_cross(&grid, Cell::new(2, 1), Direction::Down));

        grid.set(Cell::new(2, 2), WallToken::OPEN);
        grid.set(Cell::new(2, 1), token("br"));
        assert!(!can_cross(&grid, Cell::new(2, 2), Direction::Up));
        assert!(!can_cross(&grid, Cell::new(3, 1), Direction::Left));
        assert!(can_cross(&grid, Cell::new(2, 1), Direction::Left));
    }

    #[test]
    fn three_edge_token_blocks_all_but_named_edge() {
        let mut grid = WallGrid::open(3);
        grid.set(Cell::new(2, 2), token("t*"));
        assert!(can_cross(&grid, Cell::new(2, 2), Direction::Up));
        assert!(!can_cross(&grid, Cell::new(2, 2), Direction::Down));
        assert!(!can_cross(&grid, Cell::new(2, 2), Direction::Left));
        assert!(!can_cross(&grid, Cell::new(2, 2), Direction::Right));
    }

    #[test]
    fn closed_gate_blocks_vertical_entry_only() {
        let grid = WallGrid::open(3);
        let gate = Gate::new(Cell::new(2, 2), false);

        assert!(!can_cross_gated(
            &grid,
            Cell::new(2, 1),
            Direction::Down,
            Some(&gate)
        ));
        assert!(!can_cross_gated(
            &grid,
            Cell::new(2, 3),
            Direction::Up,
            Some(&gate)
        ));
        assert!(can_cross_gated(
            &grid,
            Cell::new(1, 2),
            Direction::Right,
            Some(&gate)
        ));
        assert!(can_cross_gated(
            &grid,
            Cell::new(2, 2),
            Direction::Down,
            Some(&gate)
        ));

        let opened = Gate::new(Cell::new(2, 2), true);
        assert!(can_cross_gated(
            &grid,
            Cell::new(2, 1),
            Direction::Down,
            Some(&opened)
        ));
    }

    #[test]
    fn exit_doorway_requires_open_facing_edge() {
        let mut grid = WallGrid::open(3);
        let maze = Maze::new(&grid).with_exit(Cell::new(4, 2));
        assert_eq!(
            maze.exit_doorway(),
            Some((Cell::new(3, 2), Direction::Right))
        );

        grid.set(Cell::new(3, 2), token("r"));
        let maze = Maze::new(&grid).with_exit(Cell::new(4, 2));
        assert_eq!(maze.exit_doorway(), None);
    }
}
