//! Per-cell wall tokens and the square grid that stores them.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Cell, Direction, LevelError};

const TOP: u8 = 0b0001;
const BOTTOM: u8 = 0b0010;
const LEFT: u8 = 0b0100;
const RIGHT: u8 = 0b1000;
const SEALED: u8 = TOP | BOTTOM | LEFT | RIGHT;

/// Canonical spelling of every valid token.
const CANONICAL: [(&str, u8); 13] = [
    ("", 0),
    ("t", TOP),
    ("b", BOTTOM),
    ("l", LEFT),
    ("r", RIGHT),
    ("tl", TOP | LEFT),
    ("tr", TOP | RIGHT),
    ("bl", BOTTOM | LEFT),
    ("br", BOTTOM | RIGHT),
    ("t*", SEALED & !TOP),
    ("b*", SEALED & !BOTTOM),
    ("l*", SEALED & !LEFT),
    ("r*", SEALED & !RIGHT),
];

/// Describes which edges of a single cell are walled.
///
/// A token never seals all four edges and never carries exactly one opposite
/// pair (`tb` or `lr`). Three-edge tokens are spelled by the missing edge, so
/// `t*` walls the bottom, left and right edges.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WallToken {
    edges: u8,
}

impl WallToken {
    /// Token without any walls.
    pub const OPEN: WallToken = WallToken { edges: 0 };

    /// Builds a valid token from an arbitrary set of walled edges.
    ///
    /// Conflicts are resolved by dropping exactly one edge: a sealed cell loses
    /// its bottom edge, a `tb` pair keeps the top edge and an `lr` pair keeps
    /// the left edge. Top and left edges are never dropped.
    #[must_use]
    pub fn resolving<I>(walls: I) -> Self
    where
        I: IntoIterator<Item = Direction>,
    {
        let edges = walls
            .into_iter()
            .fold(0, |edges, direction| edges | edge_bit(direction));
        let edges = match edges {
            SEALED => SEALED & !BOTTOM,
            value if value == TOP | BOTTOM => TOP,
            value if value == LEFT | RIGHT => LEFT,
            value => value,
        };
        Self { edges }
    }

    /// Reports whether the edge facing `direction` is walled.
    #[must_use]
    pub const fn blocks(self, direction: Direction) -> bool {
        self.edges & edge_bit(direction) != 0
    }

    /// Reports whether the token carries no walls at all.
    #[must_use]
    pub const fn is_open(self) -> bool {
        self.edges == 0
    }

    /// Iterator over the walled edges in canonical direction order.
    pub fn walls(self) -> impl Iterator<Item = Direction> {
        Direction::ALL
            .into_iter()
            .filter(move |direction| self.blocks(*direction))
    }

    fn spelling(self) -> &'static str {
        CANONICAL
            .iter()
            .find(|(_, edges)| *edges == self.edges)
            .map_or("", |(spelling, _)| spelling)
    }
}

const fn edge_bit(direction: Direction) -> u8 {
    match direction {
        Direction::Up => TOP,
        Direction::Down => BOTTOM,
        Direction::Left => LEFT,
        Direction::Right => RIGHT,
    }
}

/// Reasons a token string is rejected.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum WallTokenError {
    /// The string walls all four edges of the cell.
    #[error("wall token '{0}' seals every edge of the cell")]
    Sealed(String),
    /// The string walls exactly one pair of opposite edges.
    #[error("wall token '{0}' walls two opposite edges and must be resolved first")]
    OppositeEdges(String),
    /// The string is not a recognised token.
    #[error("'{0}' is not a wall token")]
    Unknown(String),
}

impl FromStr for WallToken {
    type Err = WallTokenError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if let Some((_, edges)) = CANONICAL.iter().find(|(spelling, _)| *spelling == value) {
            return Ok(Self { edges: *edges });
        }

        let mut edges = 0;
        for symbol in value.chars() {
            let bit = match symbol {
                't' => TOP,
                'b' => BOTTOM,
                'l' => LEFT,
                'r' => RIGHT,
                _ => return Err(WallTokenError::Unknown(value.to_owned())),
            };
            if edges & bit != 0 {
                return Err(WallTokenError::Unknown(value.to_owned()));
            }
            edges |= bit;
        }

        if edges == SEALED {
            Err(WallTokenError::Sealed(value.to_owned()))
        } else if edges & (TOP | BOTTOM) == TOP | BOTTOM || edges & (LEFT | RIGHT) == LEFT | RIGHT
        {
            Err(WallTokenError::OppositeEdges(value.to_owned()))
        } else {
            Err(WallTokenError::Unknown(value.to_owned()))
        }
    }
}

impl TryFrom<String> for WallToken {
    type Error = WallTokenError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WallToken> for String {
    fn from(token: WallToken) -> Self {
        token.spelling().to_owned()
    }
}

impl fmt::Display for WallToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.spelling())
    }
}

/// Square grid of wall tokens addressed with 1-based cells.
///
/// Tokens are stored row-major. The grid serializes as a list of rows so level
/// files stay readable.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<WallToken>>", into = "Vec<Vec<WallToken>>")]
pub struct WallGrid {
    size: u32,
    tokens: Vec<WallToken>,
}

impl WallGrid {
    /// Creates a grid of the given size without any interior walls.
    #[must_use]
    pub fn open(size: u32) -> Self {
        let side = usize::try_from(size).unwrap_or(0);
        Self {
            size,
            tokens: vec![WallToken::OPEN; side.saturating_mul(side)],
        }
    }

    /// Builds a grid from rows of tokens, rejecting non-square input.
    pub fn from_rows(rows: Vec<Vec<WallToken>>) -> Result<Self, LevelError> {
        let expected = rows.len();
        if expected == 0 {
            return Err(LevelError::EmptyGrid);
        }
        let size = u32::try_from(expected).map_err(|_| LevelError::GridTooLarge(expected))?;

        let mut tokens = Vec::with_capacity(expected * expected);
        for (index, row) in rows.into_iter().enumerate() {
            if row.len() != expected {
                return Err(LevelError::NotSquare {
                    row: index + 1,
                    length: row.len(),
                    expected,
                });
            }
            tokens.extend(row);
        }

        Ok(Self { size, tokens })
    }

    /// Side length `N` of the grid.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Reports whether `cell` lies inside the `1..=N` range on both axes.
    #[must_use]
    pub const fn contains(&self, cell: Cell) -> bool {
        cell.x() >= 1 && cell.x() <= self.size && cell.y() >= 1 && cell.y() <= self.size
    }

    /// Reports whether `cell` is a stair cell hugging one side of the grid.
    ///
    /// Corners of the surrounding ring are not stairs because no interior cell
    /// is orthogonally adjacent to them.
    #[must_use]
    pub const fn is_stair(&self, cell: Cell) -> bool {
        let outside = self.size.saturating_add(1);
        let x_inside = cell.x() >= 1 && cell.x() <= self.size;
        let y_inside = cell.y() >= 1 && cell.y() <= self.size;
        let x_ring = cell.x() == 0 || cell.x() == outside;
        let y_ring = cell.y() == 0 || cell.y() == outside;
        (x_ring && y_inside) || (y_ring && x_inside)
    }

    /// Token stored for `cell`, or `None` outside the grid.
    #[must_use]
    pub fn token(&self, cell: Cell) -> Option<WallToken> {
        self.index(cell)
            .and_then(|index| self.tokens.get(index).copied())
    }

    /// Replaces the token stored for `cell`. Cells outside the grid are ignored.
    pub fn set(&mut self, cell: Cell, token: WallToken) {
        if let Some(slot) = self.index(cell).and_then(|index| self.tokens.get_mut(index)) {
            *slot = token;
        }
    }

    /// Iterator over every interior cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        let size = self.size;
        (1..=size).flat_map(move |y| (1..=size).map(move |x| Cell::new(x, y)))
    }

    /// Copies the tokens out as rows.
    #[must_use]
    pub fn rows(&self) -> Vec<Vec<WallToken>> {
        let side = usize::try_from(self.size).unwrap_or(0).max(1);
        self.tokens.chunks(side).map(<[WallToken]>::to_vec).collect()
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let side = usize::try_from(self.size).ok()?;
        let column = usize::try_from(cell.x() - 1).ok()?;
        let row = usize::try_from(cell.y() - 1).ok()?;
        row.checked_mul(side)?.checked_add(column)
    }
}

impl TryFrom<Vec<Vec<WallToken>>> for WallGrid {
    type Error = LevelError;

    fn try_from(rows: Vec<Vec<WallToken>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<WallGrid> for Vec<Vec<WallToken>> {
    fn from(grid: WallGrid) -> Self {
        grid.rows()
    }
}
