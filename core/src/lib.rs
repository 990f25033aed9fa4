#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Chase engine.
//!
//! This crate defines the value types that flow between the maze topology,
//! the pursuit systems, the escape solver and the adapters. Every type here is
//! an immutable snapshot: callers construct cells, tokens and adversary lists
//! from level data, hand copies to the pure systems, and receive fresh values
//! back. Nothing in this crate performs I/O.

use serde::{Deserialize, Serialize};

mod level;
mod wall;

pub use level::{Level, LevelError};
pub use wall::{WallGrid, WallToken, WallTokenError};

/// Number of sub-steps every adversary takes for each player move.
pub const ADVERSARY_SPEED: usize = 2;

/// Location of a single maze cell expressed as 1-based column and row.
///
/// Interior cells of an `N`x`N` maze satisfy `1 <= x <= N` and `1 <= y <= N`.
/// Cells one step outside that range are stair cells and only ever appear as
/// the maze exit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    x: u32,
    y: u32,
}

impl Cell {
    /// Creates a new cell coordinate.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// 1-based column of the cell.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// 1-based row of the cell.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }

    /// Returns the neighbouring cell in `direction`, if it is representable.
    ///
    /// Stepping left from column 0 or up from row 0 yields `None`.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<Cell> {
        match direction {
            Direction::Up => self.y.checked_sub(1).map(|y| Cell::new(self.x, y)),
            Direction::Down => self.y.checked_add(1).map(|y| Cell::new(self.x, y)),
            Direction::Left => self.x.checked_sub(1).map(|x| Cell::new(x, self.y)),
            Direction::Right => self.x.checked_add(1).map(|x| Cell::new(x, self.y)),
        }
    }

    /// Computes the Manhattan distance between two cells.
    #[must_use]
    pub fn manhattan_distance(self, other: Cell) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Direction leading from `self` to an orthogonally adjacent `other`.
    #[must_use]
    pub fn direction_to(self, other: Cell) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|direction| self.step(*direction) == Some(other))
    }

    /// Coordinate of the cell along the provided axis.
    #[must_use]
    pub const fn coordinate(&self, axis: Axis) -> u32 {
        match axis {
            Axis::Vertical => self.y,
            Axis::Horizontal => self.x,
        }
    }
}

/// Cardinal movement directions available to every actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// Every direction in the canonical expansion order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Column and row delta applied by a step in this direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    /// Direction pointing the other way along the same axis.
    #[must_use]
    pub const fn opposite(self) -> Direction {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Axis the direction travels along.
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::Up | Self::Down => Axis::Vertical,
            Self::Left | Self::Right => Axis::Horizontal,
        }
    }
}

/// Movement axis used to express pursuit priorities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Rows; travelled by [`Direction::Up`] and [`Direction::Down`].
    Vertical,
    /// Columns; travelled by [`Direction::Left`] and [`Direction::Right`].
    Horizontal,
}

impl Axis {
    /// The perpendicular axis.
    #[must_use]
    pub const fn other(self) -> Axis {
        match self {
            Self::Vertical => Self::Horizontal,
            Self::Horizontal => Self::Vertical,
        }
    }

    /// Direction along this axis that brings `from` closer to `to`.
    ///
    /// Returns `None` when both cells already share the coordinate.
    #[must_use]
    pub fn toward(self, from: Cell, to: Cell) -> Option<Direction> {
        let (current, target) = (from.coordinate(self), to.coordinate(self));
        match (self, current.cmp(&target)) {
            (_, std::cmp::Ordering::Equal) => None,
            (Self::Vertical, std::cmp::Ordering::Greater) => Some(Direction::Up),
            (Self::Vertical, std::cmp::Ordering::Less) => Some(Direction::Down),
            (Self::Horizontal, std::cmp::Ordering::Greater) => Some(Direction::Left),
            (Self::Horizontal, std::cmp::Ordering::Less) => Some(Direction::Right),
        }
    }
}

/// Pursuit heuristic followed by an adversary.
///
/// Numeric identifiers match the level format: `0` dumb-vertical,
/// `1` dumb-horizontal, `2` smart-vertical and `3` smart-horizontal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AdversaryVariant {
    /// Chases along rows first and freezes when that step is walled off.
    DumbVertical,
    /// Chases along columns first and freezes when that step is walled off.
    DumbHorizontal,
    /// Chases along rows first and sidesteps along columns when blocked.
    SmartVertical,
    /// Chases along columns first and sidesteps along rows when blocked.
    SmartHorizontal,
}

impl AdversaryVariant {
    /// All variants ordered by their numeric identifier.
    pub const ALL: [AdversaryVariant; 4] = [
        AdversaryVariant::DumbVertical,
        AdversaryVariant::DumbHorizontal,
        AdversaryVariant::SmartVertical,
        AdversaryVariant::SmartHorizontal,
    ];

    /// Axis the adversary tries to close first.
    #[must_use]
    pub const fn primary_axis(self) -> Axis {
        match self {
            Self::DumbVertical | Self::SmartVertical => Axis::Vertical,
            Self::DumbHorizontal | Self::SmartHorizontal => Axis::Horizontal,
        }
    }

    /// Whether a blocked primary step falls back to the secondary axis.
    #[must_use]
    pub const fn falls_back(self) -> bool {
        matches!(self, Self::SmartVertical | Self::SmartHorizontal)
    }

    /// Numeric identifier used by the level format.
    #[must_use]
    pub const fn id(self) -> u8 {
        match self {
            Self::DumbVertical => 0,
            Self::DumbHorizontal => 1,
            Self::SmartVertical => 2,
            Self::SmartHorizontal => 3,
        }
    }
}

/// Error raised when a numeric adversary variant identifier is unknown.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("adversary variant id {0} is not one of 0, 1, 2 or 3")]
pub struct UnknownVariant(pub u8);

impl TryFrom<u8> for AdversaryVariant {
    type Error = UnknownVariant;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|variant| variant.id() == value)
            .ok_or(UnknownVariant(value))
    }
}

/// Snapshot of a single adversary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Adversary {
    /// Cell currently occupied by the adversary.
    pub position: Cell,
    /// Pursuit heuristic the adversary follows.
    pub variant: AdversaryVariant,
}

impl Adversary {
    /// Creates a new adversary snapshot.
    #[must_use]
    pub const fn new(position: Cell, variant: AdversaryVariant) -> Self {
        Self { position, variant }
    }

    /// Returns a copy of the adversary moved to `position`.
    #[must_use]
    pub const fn moved_to(self, position: Cell) -> Self {
        Self {
            position,
            variant: self.variant,
        }
    }
}

/// Reports whether any adversary stands on `cell`.
#[must_use]
pub fn is_caught(cell: Cell, adversaries: &[Adversary]) -> bool {
    adversaries
        .iter()
        .any(|adversary| adversary.position == cell)
}

/// Optional gate overlaid on the wall topology.
///
/// A closed gate blocks vertical moves into its cell. Horizontal moves are not
/// affected, matching the placement convention of the level format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Gate {
    /// Cell the gate guards.
    pub cell: Cell,
    /// Whether the gate currently lets actors through.
    pub open: bool,
}

impl Gate {
    /// Creates a new gate description.
    #[must_use]
    pub const fn new(cell: Cell, open: bool) -> Self {
        Self { cell, open }
    }

    /// Reports whether the gate rejects a move in `direction` into `destination`.
    #[must_use]
    pub fn blocks(&self, destination: Cell, direction: Direction) -> bool {
        !self.open && direction.axis() == Axis::Vertical && destination == self.cell
    }
}
