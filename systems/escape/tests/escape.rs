use maze_chase_core::{is_caught, Adversary, AdversaryVariant, Cell, Direction, WallGrid, WallToken};
use maze_chase_system_escape::{SafePathSolver, SearchOutcome, SolverConfig};
use maze_chase_system_pursuit::advance_all;
use maze_chase_world::{Maze, MazeGraph};

fn token(spelling: &str) -> WallToken {
    spelling.parse().expect("valid token")
}

fn assert_adjacent(graph: &MazeGraph, path: &[Cell]) {
    for pair in path.windows(2) {
        assert!(
            graph.neighbors(pair[0]).contains(&pair[1]),
            "({}, {}) -> ({}, {}) is not an edge",
            pair[0].x(),
            pair[0].y(),
            pair[1].x(),
            pair[1].y()
        );
    }
}

/// 3x3 maze whose top row is walled off from the rest and guarded by a
/// vertical chaser that cannot leave it while the player stays below.
fn guarded_row() -> WallGrid {
    let mut grid = WallGrid::open(3);
    grid.set(Cell::new(2, 1), token("b"));
    grid
}

#[test]
fn open_grid_corner_to_corner_takes_four_moves() {
    let grid = WallGrid::open(3);
    let maze = Maze::new(&grid);
    let graph = MazeGraph::build(&maze);

    let outcome = SafePathSolver::default().solve(&maze, Cell::new(1, 1), Cell::new(3, 3), &[]);
    let plan = outcome.plan().expect("open grid is solvable");

    assert_eq!(plan.path().len(), 5);
    assert_eq!(plan.path().first(), Some(&Cell::new(1, 1)));
    assert_eq!(plan.path().last(), Some(&Cell::new(3, 3)));
    assert_adjacent(&graph, plan.path());
}

#[test]
fn occupied_start_fails() {
    let grid = WallGrid::open(3);
    let maze = Maze::new(&grid);

    for variant in AdversaryVariant::ALL {
        let outcome = SafePathSolver::default().solve(
            &maze,
            Cell::new(1, 1),
            Cell::new(3, 3),
            &[Adversary::new(Cell::new(1, 1), variant)],
        );
        assert_eq!(outcome, SearchOutcome::Trapped, "variant {variant:?}");
    }
}

#[test]
fn solution_without_adversaries_is_a_shortest_path() {
    let mut grid = WallGrid::open(4);
    grid.set(Cell::new(2, 1), token("b"));
    grid.set(Cell::new(2, 2), token("r"));
    grid.set(Cell::new(2, 3), token("r"));
    grid.set(Cell::new(3, 1), token("bl"));
    let exit = Cell::new(5, 4);
    let maze = Maze::new(&grid).with_exit(exit);
    let graph = MazeGraph::build(&maze);

    let expected = graph
        .shortest_path(Cell::new(1, 1), exit)
        .expect("exit reachable");
    let outcome = SafePathSolver::default().solve(&maze, Cell::new(1, 1), exit, &[]);
    let plan = outcome.plan().expect("exit reachable");

    assert_eq!(plan.path().len(), expected.len());
    assert_eq!(plan.path().last(), Some(&exit));
    assert_adjacent(&graph, plan.path());
}

#[test]
fn detours_around_a_guarded_cell() {
    let grid = guarded_row();
    let maze = Maze::new(&grid);
    let guard = [Adversary::new(Cell::new(2, 1), AdversaryVariant::DumbVertical)];

    let outcome = SafePathSolver::default().solve(&maze, Cell::new(1, 1), Cell::new(3, 3), &guard);
    let plan = outcome.plan().expect("detour exists");

    assert_eq!(plan.path().len(), 5);
    assert_eq!(plan.path()[1], Cell::new(1, 2));
    assert_eq!(plan.first_move(), Some(Direction::Down));
    assert_eq!(plan.adversaries(), &guard);
}

#[test]
fn replaying_a_plan_never_meets_an_adversary() {
    let grid = guarded_row();
    let maze = Maze::new(&grid);
    let start = vec![
        Adversary::new(Cell::new(2, 1), AdversaryVariant::DumbVertical),
        Adversary::new(Cell::new(3, 1), AdversaryVariant::SmartHorizontal),
    ];

    let outcome = SafePathSolver::default().solve(&maze, Cell::new(1, 2), Cell::new(3, 3), &start);
    let plan = outcome.plan().expect("safe path exists");

    let mut adversaries = start;
    let (goal, walk) = plan.path().split_last().expect("non-empty path");
    for &cell in walk.iter().skip(1) {
        adversaries = advance_all(&maze, &adversaries, cell);
        assert!(!is_caught(cell, &adversaries));
    }
    adversaries = advance_all(&maze, &adversaries, *goal);
    assert_eq!(adversaries, plan.adversaries());
}

#[test]
fn guarded_corridor_is_a_trap() {
    let mut grid = WallGrid::open(3);
    for x in 1..=3 {
        grid.set(Cell::new(x, 1), token("b"));
    }
    let maze = Maze::new(&grid);
    let guard = [Adversary::new(Cell::new(2, 1), AdversaryVariant::DumbHorizontal)];
    let solver = SafePathSolver::default();

    let outcome = solver.solve(&maze, Cell::new(1, 1), Cell::new(3, 1), &guard);
    assert_eq!(outcome, SearchOutcome::Trapped);
    assert!(!outcome.is_escape());
    assert_eq!(
        solver.hint(&maze, Cell::new(1, 1), Cell::new(3, 1), &guard),
        None
    );
}

#[test]
fn hint_points_along_the_detour() {
    let grid = guarded_row();
    let maze = Maze::new(&grid);
    let guard = [Adversary::new(Cell::new(2, 1), AdversaryVariant::DumbVertical)];

    let hint = SafePathSolver::default().hint(&maze, Cell::new(1, 1), Cell::new(3, 3), &guard);
    assert_eq!(hint, Some(Direction::Down));
}

#[test]
fn small_budget_gives_up() {
    let grid = WallGrid::open(5);
    let maze = Maze::new(&grid);
    let solver = SafePathSolver::new(SolverConfig {
        max_expansions: 1,
        ..SolverConfig::default()
    });

    let outcome = solver.solve(&maze, Cell::new(1, 1), Cell::new(5, 5), &[]);
    assert_eq!(outcome, SearchOutcome::BudgetExhausted);
    assert!(outcome.into_plan().is_none());
}

#[test]
fn search_without_deduplication_still_finds_short_paths() {
    let grid = WallGrid::open(3);
    let maze = Maze::new(&grid);
    let solver = SafePathSolver::new(SolverConfig {
        deduplicate: false,
        ..SolverConfig::default()
    });

    let outcome = solver.solve(&maze, Cell::new(1, 1), Cell::new(3, 3), &[]);
    let path = outcome.into_plan().expect("solvable").into_path();
    assert_eq!(path.len(), 5);
}

#[test]
fn walled_in_goal_is_unreachable() {
    let mut grid = WallGrid::open(3);
    grid.set(Cell::new(3, 3), token("tl"));
    let maze = Maze::new(&grid);

    let outcome = SafePathSolver::default().solve(&maze, Cell::new(1, 1), Cell::new(3, 3), &[]);
    assert_eq!(outcome, SearchOutcome::Trapped);
}
