//! Planner trait and default A* implementation.
//!
//! # Pluggability
//!
//! The motion model calls planning via the [`PathPlanner`] trait, so
//! applications can swap in a different search (jump-point search, flow
//! fields) without touching the simulation core.
//!
//! # Cost model
//!
//! Movement is 4-connected and every step between two walkable cells costs
//! exactly 1.  Path length in cells is therefore the path cost, and Manhattan
//! distance to the nearest goal is an admissible, consistent heuristic.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use evac_core::Cell;

use crate::{GridError, GridResult, GridWorld};

// ── Path ──────────────────────────────────────────────────────────────────────

/// A planned route: the cells to visit, in order, after leaving the start.
///
/// The start cell is **not** included; the goal cell is the last element.
/// `len()` is the number of unit steps.  A path planned from a cell that is
/// already a goal is empty.
///
/// Paths are immutable once produced; a replan replaces the whole value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Path {
    cells: Vec<Cell>,
}

impl Path {
    pub fn from_cells(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of steps (cells) in the path.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// `true` if the start already was a goal.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The final cell, or `None` for an empty path.
    pub fn goal(&self) -> Option<Cell> {
        self.cells.last().copied()
    }

    #[inline]
    pub fn get(&self, i: usize) -> Option<Cell> {
        self.cells.get(i).copied()
    }

    /// First cell at or after position `from` that is no longer walkable.
    pub fn first_blocked(&self, grid: &GridWorld, from: usize) -> Option<Cell> {
        self.cells
            .iter()
            .skip(from)
            .copied()
            .find(|&c| !grid.is_walkable(c))
    }
}

// ── PathPlanner trait ─────────────────────────────────────────────────────────

/// Pluggable path planning engine.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so they can be shared across Rayon
/// worker threads when decisions are computed in parallel.  All search state
/// is created per call.
pub trait PathPlanner: Send + Sync {
    /// Shortest path from `start` to the nearest reachable exit.
    ///
    /// # Errors
    ///
    /// - `OutOfBounds` if `start` is outside the grid.
    /// - `InvalidStart` if `start` is a barrier.
    /// - `NoPathFound` if no exit is reachable (including a grid with no exits).
    fn plan(&self, grid: &GridWorld, start: Cell) -> GridResult<Path>;

    /// Shortest path from `start` to one specific `goal`.
    ///
    /// # Errors
    ///
    /// As [`plan`](Self::plan), plus `OutOfBounds` / `InvalidGoal` when `goal`
    /// is outside the grid or a barrier.
    fn plan_to(&self, grid: &GridWorld, start: Cell, goal: Cell) -> GridResult<Path>;
}

// ── AStarPlanner ──────────────────────────────────────────────────────────────

/// Classic A* over the 4-connected grid.
///
/// - **Heuristic**: minimum Manhattan distance over the goal set.
/// - **Open set**: `BinaryHeap` with lazy deletion.  Improving a cell's g
///   pushes a fresh entry; outdated entries are skipped when popped.
/// - **Tie-break**: lowest f, then highest g (deeper nodes are closer to a
///   goal), then insertion order.  The result is fully deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct AStarPlanner;

impl PathPlanner for AStarPlanner {
    fn plan(&self, grid: &GridWorld, start: Cell) -> GridResult<Path> {
        check_start(grid, start)?;
        astar(grid, start, grid.exits())
    }

    fn plan_to(&self, grid: &GridWorld, start: Cell, goal: Cell) -> GridResult<Path> {
        check_start(grid, start)?;
        if grid.is_blocked(goal)? {
            return Err(GridError::InvalidGoal(goal));
        }
        astar(grid, start, &[goal])
    }
}

fn check_start(grid: &GridWorld, start: Cell) -> GridResult<()> {
    if grid.is_blocked(start)? {
        return Err(GridError::InvalidStart(start));
    }
    Ok(())
}

// ── A* internals ──────────────────────────────────────────────────────────────

/// Per-cell search state.  Lives for one `astar` call.
#[derive(Clone, Copy, Default)]
struct PathNode {
    /// Best known cost from the start.  `None` = not reached yet.
    g:      Option<u32>,
    parent: Option<Cell>,
    closed: bool,
}

/// Heap entry.  `Ord` is arranged so the max-heap pops the best candidate.
#[derive(PartialEq, Eq)]
struct OpenEntry {
    f:    u32,
    g:    u32,
    seq:  u64,
    cell: Cell,
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .cmp(&self.f)
            .then_with(|| self.g.cmp(&other.g))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min Manhattan distance from `cell` to any goal.  `goals` is non-empty.
#[inline]
fn heuristic(cell: Cell, goals: &[Cell]) -> u32 {
    goals.iter().map(|&g| cell.manhattan(g)).min().unwrap_or(0)
}

/// `goals` must be sorted (row-major) so membership is a binary search.
fn astar(grid: &GridWorld, start: Cell, goals: &[Cell]) -> GridResult<Path> {
    if goals.is_empty() {
        return Err(GridError::NoPathFound { from: start });
    }
    if goals.binary_search(&start).is_ok() {
        return Ok(Path::default());
    }

    let mut nodes = vec![PathNode::default(); grid.cell_count()];
    let mut open: BinaryHeap<OpenEntry> = BinaryHeap::new();
    let mut seq: u64 = 0;

    nodes[grid.index(start)].g = Some(0);
    open.push(OpenEntry { f: heuristic(start, goals), g: 0, seq, cell: start });

    while let Some(OpenEntry { g, cell, .. }) = open.pop() {
        let node = nodes[grid.index(cell)];
        // Skip stale heap entries.
        if node.closed || node.g != Some(g) {
            continue;
        }
        if goals.binary_search(&cell).is_ok() {
            return Ok(reconstruct(grid, &nodes, start, cell));
        }
        nodes[grid.index(cell)].closed = true;

        let next_g = g + 1;
        for neighbor in grid.neighbors_in_bounds(cell) {
            if !grid.is_walkable(neighbor) {
                continue;
            }
            let slot = &mut nodes[grid.index(neighbor)];
            if slot.closed || slot.g.is_some_and(|known| known <= next_g) {
                continue;
            }
            slot.g = Some(next_g);
            slot.parent = Some(cell);
            seq += 1;
            open.push(OpenEntry {
                f: next_g + heuristic(neighbor, goals),
                g: next_g,
                seq,
                cell: neighbor,
            });
        }
    }

    Err(GridError::NoPathFound { from: start })
}

fn reconstruct(grid: &GridWorld, nodes: &[PathNode], start: Cell, goal: Cell) -> Path {
    let mut cells = Vec::new();
    let mut cur = goal;
    while cur != start {
        cells.push(cur);
        match nodes[grid.index(cur)].parent {
            Some(p) => cur = p,
            None => break,
        }
    }
    cells.reverse();
    Path { cells }
}
