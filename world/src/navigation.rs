//! Maze graph built from the wall topology.

use std::collections::{BTreeSet, VecDeque};

use log::trace;
use maze_chase_core::{Cell, Direction};

use crate::Maze;

/// Dense adjacency lists over the grid and its surrounding stair ring.
///
/// Interior cells connect wherever [`Maze::can_cross`] allows the step. The
/// exit stair, when the maze declares one, connects to its doorway cell so the
/// player can leave the grid; adversaries never use this graph.
#[derive(Clone, Debug, Default)]
pub struct MazeGraph {
    size: u32,
    adjacency: Vec<Vec<Cell>>,
}

impl MazeGraph {
    /// Builds the graph for every interior cell of the maze.
    #[must_use]
    pub fn build(maze: &Maze<'_>) -> Self {
        let size = maze.grid().size();
        let side = usize::try_from(size).unwrap_or(0).saturating_add(2);
        let mut graph = Self {
            size,
            adjacency: vec![Vec::new(); side.saturating_mul(side)],
        };

        for cell in maze.grid().cells() {
            for direction in Direction::ALL {
                if !maze.can_cross(cell, direction) {
                    continue;
                }
                if let Some(neighbor) = cell.step(direction) {
                    graph.connect(cell, neighbor);
                }
            }
        }

        if let (Some(exit), Some((doorway, _))) = (maze.exit(), maze.exit_doorway()) {
            graph.connect(doorway, exit);
            graph.connect(exit, doorway);
        }

        trace!(
            "built maze graph for {size}x{size} grid with {} directed edges",
            graph.edge_count()
        );
        graph
    }

    /// Side length of the interior grid.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Cells reachable in one step from `cell`, in expansion order.
    #[must_use]
    pub fn neighbors(&self, cell: Cell) -> &[Cell] {
        self.index(cell)
            .and_then(|index| self.adjacency.get(index))
            .map_or(&[][..], Vec::as_slice)
    }

    /// Total number of directed edges in the graph.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    /// Cells reachable from `start` discovered breadth first.
    #[must_use]
    pub fn bfs(&self, start: Cell) -> BTreeSet<Cell> {
        let mut reached = BTreeSet::new();
        if self.index(start).is_none() {
            return reached;
        }

        let mut queue = VecDeque::from([start]);
        let _ = reached.insert(start);
        while let Some(cell) = queue.pop_front() {
            for &neighbor in self.neighbors(cell) {
                if reached.insert(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }

        reached
    }

    /// Cells reachable from `start` discovered depth first.
    #[must_use]
    pub fn dfs(&self, start: Cell) -> BTreeSet<Cell> {
        let mut reached = BTreeSet::new();
        if self.index(start).is_none() {
            return reached;
        }

        let mut stack = vec![start];
        while let Some(cell) = stack.pop() {
            if !reached.insert(cell) {
                continue;
            }
            stack.extend(
                self.neighbors(cell)
                    .iter()
                    .rev()
                    .filter(|neighbor| !reached.contains(*neighbor)),
            );
        }

        reached
    }

    /// Shortest path from `start` to `goal` ignoring adversaries.
    ///
    /// The returned path includes both endpoints.
    #[must_use]
    pub fn shortest_path(&self, start: Cell, goal: Cell) -> Option<Vec<Cell>> {
        let start_index = self.index(start)?;
        let _ = self.index(goal)?;

        let mut parents: Vec<Option<Cell>> = vec![None; self.adjacency.len()];
        let mut seen = vec![false; self.adjacency.len()];
        seen[start_index] = true;
        let mut queue = VecDeque::from([start]);

        while let Some(cell) = queue.pop_front() {
            if cell == goal {
                let mut path = vec![goal];
                let mut cursor = goal;
                while let Some(parent) = self.index(cursor).and_then(|index| parents[index]) {
                    path.push(parent);
                    cursor = parent;
                }
                path.reverse();
                return Some(path);
            }

            for &neighbor in self.neighbors(cell) {
                let Some(index) = self.index(neighbor) else {
                    continue;
                };
                if seen[index] {
                    continue;
                }
                seen[index] = true;
                parents[index] = Some(cell);
                queue.push_back(neighbor);
            }
        }

        None
    }

    fn connect(&mut self, from: Cell, to: Cell) {
        if let Some(edges) = self
            .index(from)
            .and_then(|index| self.adjacency.get_mut(index))
        {
            if !edges.contains(&to) {
                edges.push(to);
            }
        }
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        let bound = self.size.checked_add(1)?;
        if cell.x() > bound || cell.y() > bound {
            return None;
        }
        let side = usize::try_from(bound).ok()?.checked_add(1)?;
        let column = usize::try_from(cell.x()).ok()?;
        let row = usize::try_from(cell.y()).ok()?;
        row.checked_mul(side)?.checked_add(column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_chase_core::{WallGrid, WallToken};

    fn token(spelling: &str) -> WallToken {
        spelling.parse().expect("valid token")
    }

    #[test]
    fn neighbours_follow_wall_tokens() {
        let mut grid = WallGrid::open(3);
        grid.set(Cell::new(2, 2), token("tl"));
        let graph = MazeGraph::build(&Maze::new(&grid));

        assert_eq!(
            graph.neighbors(Cell::new(2, 2)),
            &[Cell::new(2, 3), Cell::new(3, 2)]
        );
        assert_eq!(graph.neighbors(Cell::new(9, 9)), &[] as &[Cell]);
    }

    #[test]
    fn exit_is_connected_through_doorway() {
        let grid = WallGrid::open(2);
        let graph = MazeGraph::build(&Maze::new(&grid).with_exit(Cell::new(1, 3)));

        assert!(graph.neighbors(Cell::new(1, 2)).contains(&Cell::new(1, 3)));
        assert_eq!(graph.neighbors(Cell::new(1, 3)), &[Cell::new(1, 2)]);
        assert_eq!(graph.bfs(Cell::new(2, 1)).len(), 5);
    }

    #[test]
    fn shortest_path_includes_endpoints() {
        let grid = WallGrid::open(3);
        let graph = MazeGraph::build(&Maze::new(&grid));

        let path = graph
            .shortest_path(Cell::new(1, 1), Cell::new(3, 1))
            .expect("path exists");
        assert_eq!(path, vec![Cell::new(1, 1), Cell::new(2, 1), Cell::new(3, 1)]);
        assert_eq!(
            graph.shortest_path(Cell::new(2, 2), Cell::new(2, 2)),
            Some(vec![Cell::new(2, 2)])
        );
    }
}
