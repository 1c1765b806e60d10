//! Fluent builder for constructing a [`Sim`].

use evac_agent::AgentPoolBuilder;
use evac_core::{Cell, EvacConfig};
use evac_grid::{GridWorldBuilder, PathPlanner};

use crate::{Sim, SimError, SimResult};

/// Fluent builder for [`Sim<P>`].
///
/// # Required inputs
///
/// - [`EvacConfig`] — grid layout, motion tunables, spawn rule, seed, …
/// - `P: PathPlanner` — the planning algorithm (e.g. [`evac_grid::AStarPlanner`])
///
/// # Optional inputs (have defaults)
///
/// | Method                   | Default                                  |
/// |--------------------------|------------------------------------------|
/// | `.initial_positions(v)`  | Placement from `config.spawn`            |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, AStarPlanner)
///     .initial_positions(vec![Cell::new(0, 0)])
///     .build()?;
/// sim.run(100, &mut NoopObserver)?;
/// ```
pub struct SimBuilder<P: PathPlanner> {
    config:    EvacConfig,
    planner:   P,
    positions: Option<Vec<Cell>>,
}

impl<P: PathPlanner> SimBuilder<P> {
    /// Create a builder with all required inputs.
    pub fn new(config: EvacConfig, planner: P) -> Self {
        Self { config, planner, positions: None }
    }

    /// Place one agent on each of `positions`, overriding `config.spawn`.
    ///
    /// When `config.agent_count` is non-zero the lengths must match.
    pub fn initial_positions(mut self, positions: Vec<Cell>) -> Self {
        self.positions = Some(positions);
        self
    }

    /// Validate the configuration, build the grid, place agents, and return
    /// a ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim<P>> {
        let config = self.config;
        config.validate()?;

        let grid = GridWorldBuilder::new(config.width, config.height)
            .barriers(config.barriers.iter().copied())
            .exits(config.exits.iter().copied())
            .build()?;

        // ── Place agents ──────────────────────────────────────────────────
        let placement = AgentPoolBuilder::new(config.seed, config.base_speed);
        let placement = match self.positions {
            Some(p) => {
                if config.agent_count != 0 && p.len() != config.agent_count {
                    return Err(SimError::AgentCountMismatch {
                        expected: config.agent_count,
                        got:      p.len(),
                        what:     "initial positions",
                    });
                }
                placement.at_cells(p)
            }
            None => placement.distribute(&grid, &config.spawn, config.agent_count)?,
        };
        let (agents, rngs) = placement.build(&grid)?;

        if grid.exits().is_empty() {
            tracing::warn!("grid has no exits; every agent will be stuck");
        }
        tracing::info!(
            agents = agents.len(),
            barriers = grid.barriers().count(),
            exits = grid.exits().len(),
            seed = config.seed,
            "simulation built"
        );

        Ok(Sim::from_parts(config, grid, agents, rngs, self.planner))
    }
}
