//! The `Sim` struct and its tick loop.

use evac_agent::{AgentPool, AgentRngs, AgentStatus, Decision, MotionContext, MotionParams, decide};
use evac_core::{AgentId, AgentRng, Cell, EvacConfig, SimClock, Tick};
use evac_grid::{GridWorld, PathPlanner, ProximityIndex};

use crate::{
    AgentView, EvacuationStats, ExitEvent, RunOutcome, SimError, SimObserver, SimResult,
    TickReport, WorldSnapshot,
};

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// `Sim<P>` owns the grid, the agent pool, and the planner, and drives the
/// tick loop:
///
/// 1. **Index**: rebuild the proximity index from live agents.
/// 2. **Decision phase** (optionally parallel with the `parallel` feature):
///    call [`decide`] for every live agent against the frozen state.
/// 3. **Apply phase** (sequential, ascending `AgentId` for determinism):
///    write each decision into the pool.
/// 4. **Removal**: agents now standing on an exit leave the pool and are
///    appended to the exit log.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<P: PathPlanner> {
    /// Run configuration the sim was built from.
    pub config: EvacConfig,

    /// Current tick and its mapping to wall time.
    pub clock: SimClock,

    /// Barrier and exit layout.  Change barriers only through
    /// [`replace_barriers`](Self::replace_barriers); a direct edit is
    /// rejected by the next `step`.
    pub grid: GridWorld,

    /// Agent state (SoA arrays).
    pub agents: AgentPool,

    /// Per-agent deterministic RNGs, separated for the split-borrow pattern.
    pub rngs: AgentRngs,

    /// The path planner.  Shared by every agent's decision.
    pub planner: P,

    /// Motion model tunables resolved from `config`.
    pub params: MotionParams,

    index:        ProximityIndex,
    exit_log:     Vec<ExitEvent>,
    acknowledged: u64,
}

impl<P: PathPlanner> Sim<P> {
    pub(crate) fn from_parts(
        config:  EvacConfig,
        grid:    GridWorld,
        agents:  AgentPool,
        rngs:    AgentRngs,
        planner: P,
    ) -> Self {
        Self {
            clock: SimClock::new(config.secs_per_tick),
            params: MotionParams::from_config(&config),
            acknowledged: grid.revision(),
            config,
            grid,
            agents,
            rngs,
            planner,
            index: ProximityIndex::new(),
            exit_log: Vec::new(),
        }
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Run until every agent has left or `max_ticks` steps have executed.
    ///
    /// Calls observer hooks at every tick boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, max_ticks: u64, observer: &mut O) -> SimResult<RunOutcome> {
        tracing::info!(
            agents = self.agents.len(),
            width = self.grid.width(),
            height = self.grid.height(),
            max_ticks,
            "evacuation run starting"
        );

        let mut ticks = 0;
        while !self.agents.is_empty() && ticks < max_ticks {
            self.step(observer)?;
            ticks += 1;
        }

        let outcome = if self.agents.is_empty() {
            RunOutcome::Evacuated { ticks }
        } else {
            RunOutcome::Incomplete {
                ticks,
                remaining: self.agents.len(),
                stuck: self.agents.stuck_ids().collect(),
            }
        };

        tracing::info!(%outcome, evacuated = self.exit_log.len(), "evacuation run finished");
        observer.on_sim_end(self.clock.current_tick, &outcome);
        Ok(outcome)
    }

    /// Execute exactly one tick.
    ///
    /// # Errors
    ///
    /// `StaleConfiguration` if the barrier layer was edited outside
    /// [`replace_barriers`](Self::replace_barriers).  `Planning` if the pool
    /// and grid disagree about an agent's cell; nothing is written in that
    /// case.  `Grid(OutOfBounds)` if an agent ends the tick off the grid.
    pub fn step<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<TickReport> {
        self.check_revision()?;

        let now = self.clock.current_tick;
        observer.on_tick_start(now);

        let first_exit = self.exit_log.len();
        let report = self.process_tick(now)?;

        for event in &self.exit_log[first_exit..] {
            observer.on_exit(event);
        }
        observer.on_tick_end(now, &report);
        let interval = self.config.snapshot_interval_ticks;
        if interval > 0 && now.0.is_multiple_of(interval) {
            observer.on_snapshot(now, &self.agents, &self.grid);
        }

        tracing::debug!(
            tick = now.0,
            moved = report.moved,
            exited = report.exited,
            replanned = report.replanned,
            deflected = report.deflected,
            stuck = report.stuck,
            remaining = report.remaining,
            "tick complete"
        );

        self.clock.advance();
        Ok(report)
    }

    /// Replace the whole barrier layer between ticks.
    ///
    /// # Errors
    ///
    /// - `BarrierOnAgent` if a new barrier covers a live agent.
    /// - `Grid(..)` for out-of-bounds cells or barriers on exits.
    /// - `StaleConfiguration` if the grid was already edited directly.
    ///
    /// The layout is unchanged on error.
    pub fn replace_barriers<I>(&mut self, barriers: I) -> SimResult<()>
    where
        I: IntoIterator<Item = Cell>,
    {
        self.check_revision()?;

        let mut barriers: Vec<Cell> = barriers.into_iter().collect();
        barriers.sort_unstable();
        barriers.dedup();
        if let Some((agent, cell)) = self
            .agents
            .positions()
            .find(|(_, cell)| barriers.binary_search(cell).is_ok())
        {
            return Err(SimError::BarrierOnAgent { agent, cell });
        }

        self.grid.set_barriers(barriers.iter().copied())?;
        self.acknowledged = self.grid.revision();
        tracing::info!(
            tick = self.clock.current_tick.0,
            barriers = barriers.len(),
            revision = self.acknowledged,
            "barrier layer replaced"
        );
        Ok(())
    }

    /// Add an agent at `cell` between ticks.  It takes part from the next
    /// `step`.
    pub fn spawn_agent(&mut self, cell: Cell) -> SimResult<AgentId> {
        if self.grid.is_blocked(cell)? {
            return Err(evac_agent::AgentError::SpawnOnBarrier(cell).into());
        }
        let agent = self.agents.spawn(cell, self.params.base_speed, self.clock.current_tick);
        self.rngs.ensure(self.agents.capacity());
        tracing::debug!(%agent, %cell, "agent spawned");
        Ok(agent)
    }

    /// Copy of every agent's visible state at the current tick boundary.
    pub fn snapshot(&self) -> WorldSnapshot {
        let agents = self
            .agents
            .agent_ids()
            .map(|a| {
                let i = a.index();
                AgentView {
                    id:     a,
                    cell:   self.agents.cell[i],
                    alive:  self.agents.status[i].is_alive(),
                    status: self.agents.status[i],
                    panic:  self.agents.panic[i],
                }
            })
            .collect();
        WorldSnapshot { tick: self.clock.current_tick, agents }
    }

    /// The barrier and exit layout.
    pub fn grid(&self) -> &GridWorld {
        &self.grid
    }

    /// Every exit so far, in tick order then ascending id.
    pub fn exit_log(&self) -> &[ExitEvent] {
        &self.exit_log
    }

    pub fn stats(&self) -> EvacuationStats {
        EvacuationStats::from_exit_log(&self.exit_log, self.agents.len(), &self.clock)
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn check_revision(&self) -> SimResult<()> {
        let found = self.grid.revision();
        if found != self.acknowledged {
            return Err(SimError::StaleConfiguration { acknowledged: self.acknowledged, found });
        }
        Ok(())
    }

    fn process_tick(&mut self, now: Tick) -> SimResult<TickReport> {
        // ── Phase 1: proximity index over current positions ───────────────
        self.index.rebuild(self.agents.samples());

        // ── Phase 2: decision phase (produce) ─────────────────────────────
        let decisions = self.compute_decisions()?;

        // ── Phase 3: apply phase (consume) ────────────────────────────────
        //
        // Decisions arrive in ascending AgentId order.  Sequential application
        // in this order keeps results deterministic even when the decision
        // phase ran in parallel.
        let mut report = TickReport { tick: now, ..TickReport::default() };
        for decision in decisions {
            self.note_decision(&decision, &mut report);
            self.agents.apply(decision);
        }

        // ── Phase 4: removal ──────────────────────────────────────────────
        for agent in self.exits_reached()? {
            let i = agent.index();
            self.agents.remove(agent, now)?;
            self.exit_log.push(ExitEvent {
                tick:         now,
                agent,
                cell:         self.agents.cell[i],
                travel_ticks: now.since(self.agents.spawn_tick[i]) + 1,
            });
            report.exited += 1;
        }

        report.stuck = self.agents.stuck_ids().count();
        report.remaining = self.agents.len();
        Ok(report)
    }

    /// Live agents standing on an exit, ascending.
    pub(crate) fn exits_reached(&self) -> SimResult<Vec<AgentId>> {
        let mut leaving = Vec::new();
        for (agent, cell) in self.agents.positions() {
            if self.grid.is_exit(cell)? {
                leaving.push(agent);
            }
        }
        Ok(leaving)
    }

    /// Compute decisions for all live agents, in ascending id order.
    ///
    /// With the `parallel` Cargo feature the calls run on Rayon's thread
    /// pool; each agent only touches its own RNG.
    fn compute_decisions(&mut self) -> SimResult<Vec<Decision>> {
        // Explicit field borrows so the borrow checker sees disjoint access.
        let agents = &self.agents;
        let rngs   = &mut self.rngs;
        let ctx = MotionContext::new(&self.grid, agents, &self.index, &self.planner, &self.params);

        let decide_one = |(agent, rng): (AgentId, &mut AgentRng)| {
            decide(agent, &ctx, rng).map_err(|source| SimError::Planning { agent, source })
        };

        #[cfg(not(feature = "parallel"))]
        {
            rngs.inner
                .iter_mut()
                .enumerate()
                .map(|(i, rng)| (AgentId::from_index(i), rng))
                .filter(|(agent, _)| agents.is_active(*agent))
                .map(decide_one)
                .collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            rngs.inner
                .par_iter_mut()
                .enumerate()
                .map(|(i, rng)| (AgentId::from_index(i), rng))
                .filter(|(agent, _)| agents.is_active(*agent))
                .map(decide_one)
                .collect()
        }
    }

    /// Fold one decision into the tick report and log status transitions.
    fn note_decision(&self, decision: &Decision, report: &mut TickReport) {
        let i = decision.agent.index();
        if decision.cell != self.agents.cell[i] {
            report.moved += 1;
        }
        report.replanned += usize::from(decision.replanned);
        report.deflected += usize::from(decision.deflected);

        let before = self.agents.status[i];
        match (before, decision.status) {
            (AgentStatus::Active, AgentStatus::Stuck { .. }) => {
                tracing::debug!(agent = %decision.agent, cell = %decision.cell, "agent has no route to an exit");
            }
            (AgentStatus::Stuck { retries: was, .. }, AgentStatus::Stuck { retries, .. })
                if self.params.max_plan_retries.is_some_and(|max| was < max && retries >= max) =>
            {
                tracing::warn!(
                    agent = %decision.agent,
                    retries,
                    "agent stopped replanning until the barrier layer changes"
                );
            }
            (AgentStatus::Stuck { .. }, AgentStatus::Active) => {
                tracing::debug!(agent = %decision.agent, "stuck agent found a route");
            }
            _ => {}
        }
    }
}
