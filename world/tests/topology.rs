use maze_chase_core::{Cell, Direction, Gate, WallGrid, WallToken};
use maze_chase_world::{can_cross, can_cross_gated, Maze, MazeGraph};

const TOKENS: [&str; 13] = [
    "", "t", "b", "l", "r", "tl", "tr", "bl", "br", "t*", "b*", "l*", "r*",
];

fn mixed_grid(size: u32) -> WallGrid {
    let mut grid = WallGrid::open(size);
    let cells: Vec<Cell> = grid.cells().collect();
    for (index, cell) in cells.into_iter().enumerate() {
        let spelling = TOKENS[(index * 7 + 3) % TOKENS.len()];
        let token: WallToken = spelling.parse().expect("valid token");
        grid.set(cell, token);
    }
    grid
}

#[test]
fn crossing_is_symmetric_across_every_edge() {
    let grid = mixed_grid(6);

    for cell in grid.cells() {
        for direction in Direction::ALL {
            if !can_cross(&grid, cell, direction) {
                continue;
            }
            let neighbor = cell.step(direction).expect("crossable step exists");
            assert!(
                can_cross(&grid, neighbor, direction.opposite()),
                "crossing {cell:?} {direction:?} is not mirrored from {neighbor:?}"
            );
        }
    }
}

#[test]
fn open_grid_is_fully_reachable() {
    let grid = WallGrid::open(5);
    let graph = MazeGraph::build(&Maze::new(&grid));

    let reached = graph.bfs(Cell::new(3, 3));
    assert_eq!(reached.len(), 25);
    assert!(grid.cells().all(|cell| reached.contains(&cell)));
    assert_eq!(graph.dfs(Cell::new(1, 1)), reached);
}

#[test]
fn moves_never_leave_the_grid() {
    let grid = WallGrid::open(4);

    for cell in grid.cells() {
        for direction in Direction::ALL {
            let Some(neighbor) = cell.step(direction) else {
                assert!(!can_cross(&grid, cell, direction));
                continue;
            };
            if !grid.contains(neighbor) {
                assert!(
                    !can_cross(&grid, cell, direction),
                    "{cell:?} may not cross {direction:?} into the stair ring"
                );
            }
        }
    }
}

#[test]
fn walled_off_region_is_not_reached() {
    let mut grid = WallGrid::open(3);
    let right_wall: WallToken = "r".parse().expect("valid token");
    for row in 1..=3 {
        grid.set(Cell::new(1, row), right_wall);
    }
    let graph = MazeGraph::build(&Maze::new(&grid));

    let reached = graph.bfs(Cell::new(1, 1));
    assert_eq!(reached.len(), 3);
    assert!(reached.iter().all(|cell| cell.x() == 1));
    assert_eq!(graph.shortest_path(Cell::new(1, 1), Cell::new(3, 3)), None);
}

#[test]
fn closed_gate_splits_a_single_column_corridor() {
    let mut grid = WallGrid::open(3);
    let sides: WallToken = "l".parse().expect("valid token");
    for row in 1..=3 {
        grid.set(Cell::new(2, row), sides);
        grid.set(Cell::new(3, row), sides);
    }
    let gate = Gate::new(Cell::new(1, 2), false);
    assert!(!can_cross_gated(&grid, Cell::new(1, 1), Direction::Down, Some(&gate)));

    let gated = Maze::new(&grid).with_gate(Some(gate));
    let graph = MazeGraph::build(&gated);
    assert!(!graph.bfs(Cell::new(1, 1)).contains(&Cell::new(1, 3)));

    let opened = Maze::new(&grid).with_gate(Some(Gate::new(Cell::new(1, 2), true)));
    let graph = MazeGraph::build(&opened);
    assert!(graph.bfs(Cell::new(1, 1)).contains(&Cell::new(1, 3)));
}
