//! Static map representation and builder.
//!
//! # Data layout
//!
//! The map is a dense row-major layer of [`CellKind`], one byte per cell:
//!
//! ```text
//! kinds[ y * width + x ]
//! ```
//!
//! Membership tests (`is_blocked`, `is_exit`) are a bounds check plus one
//! indexed load.  Exits are additionally kept as a sorted `Vec<Cell>` because the
//! A* heuristic iterates them.
//!
//! # Revisions
//!
//! Every call to [`GridWorld::set_barriers`] bumps [`GridWorld::revision`].
//! Cached paths record the revision they were planned against; a mismatch
//! means the path must be re-validated before reuse.

use evac_core::{Cell, Direction};

use crate::{GridError, GridResult};

// ── CellKind ──────────────────────────────────────────────────────────────────

/// What occupies one grid cell.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellKind {
    #[default]
    Open,
    Barrier,
    Exit,
}

impl CellKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CellKind::Open    => "open",
            CellKind::Barrier => "barrier",
            CellKind::Exit    => "exit",
        }
    }
}

// ── GridWorld ─────────────────────────────────────────────────────────────────

/// The static map: dimensions, impassable cells, and exit cells.
///
/// Invariants (enforced by [`GridWorldBuilder`] and `set_barriers`):
/// barriers and exits are disjoint, and every barrier and exit is in bounds.
///
/// Do not construct directly; use [`GridWorldBuilder`].
#[derive(Clone, Debug)]
pub struct GridWorld {
    width:    u32,
    height:   u32,
    kinds:    Vec<CellKind>,
    exits:    Vec<Cell>,
    revision: u64,
}

impl GridWorld {
    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total number of cells (`width * height`).
    pub fn cell_count(&self) -> usize {
        self.kinds.len()
    }

    /// Number of barrier-layer replacements since construction.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // ── Indexing ──────────────────────────────────────────────────────────

    /// `true` if `cell` lies within `[0, width) × [0, height)`.
    #[inline]
    pub fn contains(&self, cell: Cell) -> bool {
        cell.x < self.width && cell.y < self.height
    }

    /// Row-major index of an in-bounds cell.
    #[inline]
    pub fn index(&self, cell: Cell) -> usize {
        cell.y as usize * self.width as usize + cell.x as usize
    }

    /// Inverse of [`index`](Self::index).
    #[inline]
    pub fn cell_at(&self, index: usize) -> Cell {
        let w = self.width as usize;
        Cell::new((index % w) as u32, (index / w) as u32)
    }

    fn check(&self, cell: Cell) -> GridResult<()> {
        if self.contains(cell) {
            Ok(())
        } else {
            Err(GridError::OutOfBounds { cell, width: self.width, height: self.height })
        }
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// The kind of `cell`, or `OutOfBounds`.
    pub fn kind(&self, cell: Cell) -> GridResult<CellKind> {
        self.check(cell)?;
        Ok(self.kinds[self.index(cell)])
    }

    pub fn is_blocked(&self, cell: Cell) -> GridResult<bool> {
        Ok(self.kind(cell)? == CellKind::Barrier)
    }

    pub fn is_exit(&self, cell: Cell) -> GridResult<bool> {
        Ok(self.kind(cell)? == CellKind::Exit)
    }

    /// In-bounds and not a barrier.  Never fails; out-of-bounds is simply
    /// not walkable.  Used by movement code that probes beyond the edge.
    #[inline]
    pub fn is_walkable(&self, cell: Cell) -> bool {
        self.contains(cell) && self.kinds[self.index(cell)] != CellKind::Barrier
    }

    /// In-bounds cardinal neighbours of `cell`, in N, E, S, W order.
    ///
    /// Barriers are included.
    pub fn neighbors4(&self, cell: Cell) -> GridResult<impl Iterator<Item = Cell> + '_> {
        self.check(cell)?;
        Ok(self.neighbors_in_bounds(cell))
    }

    /// Neighbour iteration without the bounds check on `cell` itself.  The
    /// planner only calls this on cells it has already validated.
    #[inline]
    pub(crate) fn neighbors_in_bounds(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |d| cell.step(d))
            .filter(move |&c| self.contains(c))
    }

    /// Exit cells in row-major order.
    pub fn exits(&self) -> &[Cell] {
        &self.exits
    }

    /// Barrier cells in row-major order.
    pub fn barriers(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells_of(CellKind::Barrier)
    }

    /// Cells that are neither barriers nor exits, in row-major order.
    pub fn open_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells_of(CellKind::Open)
    }

    fn cells_of(&self, kind: CellKind) -> impl Iterator<Item = Cell> + '_ {
        self.kinds
            .iter()
            .enumerate()
            .filter(move |(_, k)| **k == kind)
            .map(|(i, _)| self.cell_at(i))
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Replace the whole barrier layer.
    ///
    /// Every cell must be in bounds and must not be an exit.  On error the
    /// grid is left unchanged.  On success [`revision`](Self::revision) is
    /// incremented, even if the new set equals the old one.
    ///
    /// Callers running a simulation must route this through the simulation's
    /// structural-update call, never mid-tick.
    pub fn set_barriers<I>(&mut self, barriers: I) -> GridResult<()>
    where
        I: IntoIterator<Item = Cell>,
    {
        let mut next: Vec<CellKind> = self
            .kinds
            .iter()
            .map(|&k| if k == CellKind::Barrier { CellKind::Open } else { k })
            .collect();

        for cell in barriers {
            self.check(cell)?;
            let i = self.index(cell);
            if next[i] == CellKind::Exit {
                return Err(GridError::BarrierOnExit(cell));
            }
            next[i] = CellKind::Barrier;
        }

        self.kinds = next;
        self.revision += 1;
        Ok(())
    }
}

// ── GridWorldBuilder ──────────────────────────────────────────────────────────

/// Construct a [`GridWorld`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use evac_core::Cell;
/// use evac_grid::GridWorldBuilder;
///
/// let grid = GridWorldBuilder::new(10, 1)
///     .barrier(Cell::new(5, 0))
///     .exit(Cell::new(9, 0))
///     .build()
///     .unwrap();
/// assert!(grid.is_blocked(Cell::new(5, 0)).unwrap());
/// assert!(grid.is_exit(Cell::new(9, 0)).unwrap());
/// assert!(grid.is_blocked(Cell::new(10, 0)).is_err());
/// ```
pub struct GridWorldBuilder {
    width:    u32,
    height:   u32,
    barriers: Vec<Cell>,
    exits:    Vec<Cell>,
}

impl GridWorldBuilder {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, barriers: Vec::new(), exits: Vec::new() }
    }

    pub fn barrier(mut self, cell: Cell) -> Self {
        self.barriers.push(cell);
        self
    }

    pub fn barriers<I: IntoIterator<Item = Cell>>(mut self, cells: I) -> Self {
        self.barriers.extend(cells);
        self
    }

    pub fn exit(mut self, cell: Cell) -> Self {
        self.exits.push(cell);
        self
    }

    pub fn exits<I: IntoIterator<Item = Cell>>(mut self, cells: I) -> Self {
        self.exits.extend(cells);
        self
    }

    /// Validate and produce the grid.
    ///
    /// Duplicate cells are harmless.  Fails on zero dimensions, out-of-bounds
    /// cells, or a cell listed as both barrier and exit.
    pub fn build(self) -> GridResult<GridWorld> {
        let (width, height) = (self.width, self.height);
        if width == 0 || height == 0 {
            return Err(GridError::InvalidDimensions { width, height });
        }

        let mut grid = GridWorld {
            width,
            height,
            kinds:    vec![CellKind::Open; width as usize * height as usize],
            exits:    Vec::new(),
            revision: 0,
        };

        for &cell in &self.exits {
            grid.check(cell)?;
            let i = grid.index(cell);
            grid.kinds[i] = CellKind::Exit;
        }
        for &cell in &self.barriers {
            grid.check(cell)?;
            let i = grid.index(cell);
            if grid.kinds[i] == CellKind::Exit {
                return Err(GridError::BarrierOnExit(cell));
            }
            grid.kinds[i] = CellKind::Barrier;
        }

        let mut exits = self.exits;
        exits.sort_unstable();
        exits.dedup();
        grid.exits = exits;

        Ok(grid)
    }
}
