#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic pursuit system that moves adversaries toward the player.
//!
//! Every adversary takes [`ADVERSARY_SPEED`] sub-steps per player move. The
//! four behaviour variants share one algorithm parameterised by the axis the
//! adversary closes first and whether a blocked step may fall back to the
//! other axis. All functions are pure: callers pass snapshots in and receive
//! new snapshots back.

use log::trace;
use maze_chase_core::{Adversary, AdversaryVariant, Axis, Cell, Direction, ADVERSARY_SPEED};
use maze_chase_world::Maze;

/// Outcome of a single adversary's turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdversaryMove {
    /// Cell the adversary occupies after the turn.
    pub position: Cell,
    /// Sub-steps actually taken, in order. Never longer than [`ADVERSARY_SPEED`].
    pub moves: Vec<Direction>,
    /// Direction the adversary should face once the turn is over.
    ///
    /// Equals the last entry of `moves` when the adversary moved. When it did
    /// not, this is the direction it last tried to chase in so animation layers
    /// can turn the sprite in place. `None` only when the adversary started the
    /// turn on the player.
    pub facing: Option<Direction>,
}

/// Axis priority and fallback rule derived from a behaviour variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PursuitProfile {
    /// Axis closed first.
    pub primary: Axis,
    /// Whether a blocked primary step retries along the other axis.
    pub fallback: bool,
}

impl From<AdversaryVariant> for PursuitProfile {
    fn from(variant: AdversaryVariant) -> Self {
        Self {
            primary: variant.primary_axis(),
            fallback: variant.falls_back(),
        }
    }
}

/// Computes one adversary's turn against the player's position.
#[must_use]
pub fn next_move(
    maze: &Maze<'_>,
    position: Cell,
    variant: AdversaryVariant,
    player: Cell,
) -> AdversaryMove {
    pursue(maze, position, PursuitProfile::from(variant), player)
}

/// Runs the shared pursuit algorithm for an explicit profile.
#[must_use]
pub fn pursue(
    maze: &Maze<'_>,
    start: Cell,
    profile: PursuitProfile,
    player: Cell,
) -> AdversaryMove {
    let mut position = start;
    let mut moves = Vec::with_capacity(ADVERSARY_SPEED);
    let mut chased = None;

    for _ in 0..ADVERSARY_SPEED {
        if position == player {
            break;
        }

        let (first, second) = match profile.primary.toward(position, player) {
            Some(direction) => {
                let fallback = if profile.fallback {
                    profile.primary.other().toward(position, player)
                } else {
                    None
                };
                (direction, fallback)
            }
            None => {
                let Some(direction) = profile.primary.other().toward(position, player) else {
                    break;
                };
                (direction, None)
            }
        };
        chased = Some(first);

        let taken = [Some(first), second]
            .into_iter()
            .flatten()
            .find(|direction| maze.can_cross(position, *direction));

        // An iteration without progress leaves the state unchanged, so the
        // remaining iterations could not move either.
        let Some(direction) = taken else {
            break;
        };
        let Some(next) = position.step(direction) else {
            break;
        };
        position = next;
        moves.push(direction);
    }

    let facing = moves.last().copied().or(chased);
    AdversaryMove {
        position,
        moves,
        facing,
    }
}

/// Advances every adversary by one player move.
///
/// Adversaries never block one another; only walls, the gate and the player's
/// position influence each move. Output order matches input order.
#[must_use]
pub fn advance_all(maze: &Maze<'_>, adversaries: &[Adversary], player: Cell) -> Vec<Adversary> {
    adversaries
        .iter()
        .map(|adversary| {
            let outcome = next_move(maze, adversary.position, adversary.variant, player);
            adversary.moved_to(outcome.position)
        })
        .collect()
}

/// Advances every adversary and keeps the per-adversary sub-steps.
///
/// Intended for animation layers that interpolate each sub-step.
#[must_use]
pub fn advance_all_with_moves(
    maze: &Maze<'_>,
    adversaries: &[Adversary],
    player: Cell,
) -> Vec<AdversaryMove> {
    let outcomes: Vec<AdversaryMove> = adversaries
        .iter()
        .map(|adversary| next_move(maze, adversary.position, adversary.variant, player))
        .collect();
    trace!(
        "advanced {} adversaries toward ({}, {})",
        outcomes.len(),
        player.x(),
        player.y()
    );
    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_chase_core::WallGrid;

    #[test]
    fn profile_mirrors_variant() {
        assert_eq!(
            PursuitProfile::from(AdversaryVariant::SmartHorizontal),
            PursuitProfile {
                primary: Axis::Horizontal,
                fallback: true,
            }
        );
        assert_eq!(
            PursuitProfile::from(AdversaryVariant::DumbVertical),
            PursuitProfile {
                primary: Axis::Vertical,
                fallback: false,
            }
        );
    }

    #[test]
    fn adversary_on_player_does_not_move() {
        let grid = WallGrid::open(4);
        let maze = Maze::new(&grid);
        let outcome = next_move(
            &maze,
            Cell::new(2, 2),
            AdversaryVariant::SmartVertical,
            Cell::new(2, 2),
        );

        assert_eq!(outcome.position, Cell::new(2, 2));
        assert!(outcome.moves.is_empty());
        assert_eq!(outcome.facing, None);
    }

    #[test]
    fn catching_the_player_stops_early() {
        let grid = WallGrid::open(4);
        let maze = Maze::new(&grid);
        let outcome = next_move(
            &maze,
            Cell::new(2, 2),
            AdversaryVariant::DumbHorizontal,
            Cell::new(3, 2),
        );

        assert_eq!(outcome.position, Cell::new(3, 2));
        assert_eq!(outcome.moves, vec![Direction::Right]);
    }

    #[test]
    fn aligned_adversary_chases_along_secondary_axis() {
        let grid = WallGrid::open(6);
        let maze = Maze::new(&grid);
        let outcome = next_move(
            &maze,
            Cell::new(5, 3),
            AdversaryVariant::DumbVertical,
            Cell::new(1, 3),
        );

        assert_eq!(outcome.position, Cell::new(3, 3));
        assert_eq!(outcome.moves, vec![Direction::Left, Direction::Left]);
        assert_eq!(outcome.facing, Some(Direction::Left));
    }

    #[test]
    fn primary_axis_switches_once_aligned() {
        let grid = WallGrid::open(6);
        let maze = Maze::new(&grid);
        let outcome = next_move(
            &maze,
            Cell::new(2, 3),
            AdversaryVariant::SmartVertical,
            Cell::new(4, 2),
        );

        assert_eq!(outcome.position, Cell::new(3, 2));
        assert_eq!(outcome.moves, vec![Direction::Up, Direction::Right]);
    }
}
