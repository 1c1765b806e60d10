//! Fluent builder for constructing `AgentPool` + `AgentRngs` in one step.
//!
//! # Usage
//!
//! ```rust
//! use evac_agent::AgentPoolBuilder;
//! use evac_core::{Cell, SpawnDistribution};
//! use evac_grid::GridWorldBuilder;
//!
//! let grid = GridWorldBuilder::new(8, 8).exit(Cell::new(7, 7)).build().unwrap();
//! let (pool, rngs) = AgentPoolBuilder::new(/*seed=*/ 42, /*base_speed=*/ 1.0)
//!     .distribute(&grid, &SpawnDistribution::Uniform, 20)
//!     .unwrap()
//!     .build(&grid)
//!     .unwrap();
//!
//! assert_eq!(pool.len(), 20);
//! assert_eq!(rngs.len(), 20);
//! ```

use evac_core::{Cell, SimRng, SpawnDistribution, Tick};
use evac_grid::GridWorld;

use crate::{AgentError, AgentPool, AgentResult, AgentRngs};

/// Collects initial agent cells, then validates them against the grid.
///
/// Random placement draws from a `SimRng` seeded with the run seed, so the
/// same seed and grid always produce the same population.
pub struct AgentPoolBuilder {
    seed:       u64,
    base_speed: f32,
    rng:        SimRng,
    cells:      Vec<Cell>,
}

impl AgentPoolBuilder {
    /// Create a builder using `seed` as the global RNG seed.
    pub fn new(seed: u64, base_speed: f32) -> Self {
        Self {
            seed,
            base_speed,
            rng: SimRng::new(seed),
            cells: Vec::new(),
        }
    }

    /// Place one agent at `cell`.
    pub fn at(mut self, cell: Cell) -> Self {
        self.cells.push(cell);
        self
    }

    /// Place one agent at each of `cells`, in order.
    pub fn at_cells<I: IntoIterator<Item = Cell>>(mut self, cells: I) -> Self {
        self.cells.extend(cells);
        self
    }

    /// Place `count` agents according to `spawn`.
    ///
    /// Random variants sample open, non-exit cells with replacement (agents
    /// may share a cell).  `SpawnDistribution::Cells` ignores `count`.
    ///
    /// # Errors
    ///
    /// `NoSpawnCells` when a random variant has no candidate cell but
    /// `count > 0`.
    pub fn distribute(
        mut self,
        grid:  &GridWorld,
        spawn: &SpawnDistribution,
        count: usize,
    ) -> AgentResult<Self> {
        let candidates: Vec<Cell> = match spawn {
            SpawnDistribution::Cells { cells } => {
                self.cells.extend(cells.iter().copied());
                return Ok(self);
            }
            SpawnDistribution::Uniform => grid.open_cells().collect(),
            SpawnDistribution::Region { min, max } => grid
                .open_cells()
                .filter(|c| (min.x..=max.x).contains(&c.x) && (min.y..=max.y).contains(&c.y))
                .collect(),
        };

        if count > 0 && candidates.is_empty() {
            return Err(AgentError::NoSpawnCells(count));
        }
        for _ in 0..count {
            if let Some(&cell) = self.rng.choose(&candidates) {
                self.cells.push(cell);
            }
        }
        Ok(self)
    }

    /// Validate every cell and construct `AgentPool` and `AgentRngs`.
    ///
    /// # Errors
    ///
    /// `Grid(OutOfBounds)` for a cell outside the grid, `SpawnOnBarrier` for
    /// a barrier cell.
    pub fn build(self, grid: &GridWorld) -> AgentResult<(AgentPool, AgentRngs)> {
        let mut pool = AgentPool::new();
        for cell in self.cells {
            if grid.is_blocked(cell)? {
                return Err(AgentError::SpawnOnBarrier(cell));
            }
            pool.spawn(cell, self.base_speed, Tick::ZERO);
        }
        let rngs = AgentRngs::new(pool.capacity(), self.seed);
        Ok((pool, rngs))
    }
}
