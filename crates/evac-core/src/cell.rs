//! Grid coordinates and cardinal headings.
//!
//! `Cell` uses unsigned `u32` coordinates and is 8 bytes, so it is passed by
//! value everywhere.
//!
//! Movement is 4-connected: agents step North, East, South or West.  `North`
//! decreases `y` (row 0 is the top edge, matching how layouts are drawn).

use std::fmt;

// ── Cell ──────────────────────────────────────────────────────────────────────

/// A discrete grid coordinate `(x, y)`.
///
/// Ordering is row-major (`y` first, then `x`) so sorted collections of cells
/// iterate the way a renderer scans the grid.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub x: u32,
    pub y: u32,
}

impl Cell {
    #[inline]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Manhattan (L1) distance in cells: the step count between two cells on
    /// an obstacle-free 4-connected grid.
    #[inline]
    pub fn manhattan(self, other: Cell) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Continuous `[x, y]` position of the cell centre.
    #[inline]
    pub fn center(self) -> [f32; 2] {
        [self.x as f32 + 0.5, self.y as f32 + 0.5]
    }

    /// The adjacent cell in direction `dir`.
    ///
    /// Returns `None` when the step would leave the non-negative quadrant.
    /// Upper bounds are the grid's business, not the cell's.
    #[inline]
    pub fn step(self, dir: Direction) -> Option<Cell> {
        let (dx, dy) = dir.delta();
        let x = self.x.checked_add_signed(dx)?;
        let y = self.y.checked_add_signed(dy)?;
        Some(Cell { x, y })
    }
}

impl Ord for Cell {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.y, self.x).cmp(&(other.y, other.x))
    }
}

impl PartialOrd for Cell {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl From<(u32, u32)> for Cell {
    #[inline]
    fn from((x, y): (u32, u32)) -> Self {
        Cell { x, y }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// ── Direction ─────────────────────────────────────────────────────────────────

/// One of the four cardinal headings.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// All headings in clockwise order starting from `North`.  Neighbour
    /// iteration uses this order everywhere so search results are stable.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// `(dx, dy)` unit offset.
    #[inline]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::East  => (1, 0),
            Direction::South => (0, 1),
            Direction::West  => (-1, 0),
        }
    }

    /// Rotate 90° clockwise.
    #[inline]
    pub fn rotate_cw(self) -> Direction {
        match self {
            Direction::North => Direction::East,
            Direction::East  => Direction::South,
            Direction::South => Direction::West,
            Direction::West  => Direction::North,
        }
    }

    /// Rotate 90° counter-clockwise.
    #[inline]
    pub fn rotate_ccw(self) -> Direction {
        match self {
            Direction::North => Direction::West,
            Direction::East  => Direction::North,
            Direction::South => Direction::East,
            Direction::West  => Direction::South,
        }
    }

    /// Heading that takes `from` to the 4-adjacent cell `to`.
    ///
    /// Returns `None` if the cells are equal or not 4-adjacent.
    pub fn between(from: Cell, to: Cell) -> Option<Direction> {
        if from.manhattan(to) != 1 {
            return None;
        }
        Direction::ALL.into_iter().find(|&d| from.step(d) == Some(to))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::North => "N",
            Direction::East  => "E",
            Direction::South => "S",
            Direction::West  => "W",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
