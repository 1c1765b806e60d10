//! Core agent storage: `AgentPool` (SoA data) and `AgentRngs` (per-agent RNG).
//!
//! # Why two structs?
//!
//! The decision phase needs `&mut AgentRngs` (exclusive access to each
//! agent's RNG) and `&AgentPool` (shared read access to everyone's state)
//! simultaneously.  Keeping RNGs in a separate struct lets the borrow checker
//! see the two borrows as disjoint:
//!
//! ```ignore
//! // evac-sim tick loop (simplified):
//! let pool: &AgentPool = &sim.agents;
//! let decisions = sim.rngs.inner
//!     .iter_mut()
//!     .enumerate()
//!     .map(|(i, rng)| (AgentId::from_index(i), rng))
//!     .filter(|(agent, _)| pool.is_active(*agent))
//!     .map(|(agent, rng)| decide(agent, &ctx, rng))
//!     .collect::<Result<Vec<_>, _>>()?;
//! ```
//!
//! # Removal
//!
//! Rows are never compacted.  Removing an agent marks it `Exited` and drops
//! its cached path; its id is never reissued.  `len()` counts live agents,
//! `capacity()` counts ids ever issued.

use evac_core::{AgentId, AgentRng, Cell, Direction, Tick};
use evac_grid::AgentSample;

use crate::state::{AgentStatus, CachedPath, Decision, PathUpdate};
use crate::{AgentError, AgentResult};

// ── AgentRngs ─────────────────────────────────────────────────────────────────

/// Per-agent deterministic RNG state, separated from [`AgentPool`] to enable
/// simultaneous `&mut AgentRngs` + `&AgentPool` borrows in the decision phase.
pub struct AgentRngs {
    pub inner:   Vec<AgentRng>,
    global_seed: u64,
}

impl AgentRngs {
    /// Allocate and seed `count` per-agent RNGs from `global_seed`.
    pub fn new(count: usize, global_seed: u64) -> Self {
        let mut rngs = Self { inner: Vec::with_capacity(count), global_seed };
        rngs.ensure(count);
        rngs
    }

    /// Grow to `count` RNGs, seeding new ones from their ids.  Existing
    /// streams are untouched.
    pub fn ensure(&mut self, count: usize) {
        for i in self.inner.len()..count {
            self.inner.push(AgentRng::new(self.global_seed, AgentId::from_index(i)));
        }
    }

    /// Mutable reference to one agent's RNG.
    #[inline]
    pub fn get_mut(&mut self, agent: AgentId) -> &mut AgentRng {
        &mut self.inner[agent.index()]
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

// ── AgentPool ─────────────────────────────────────────────────────────────────

/// Structure-of-Arrays storage for all agent state.
///
/// Every `Vec` field has exactly `capacity()` elements; the `AgentId` value
/// is the index into all of them:
///
/// ```ignore
/// let cell = pool.cell[agent.index()];  // O(1), cache-friendly
/// ```
///
/// Fields are `pub` for read access on hot paths.  Writes go through
/// [`apply`](Self::apply), [`spawn`](Self::spawn) and
/// [`remove`](Self::remove) so the live count stays consistent.
#[derive(Default)]
pub struct AgentPool {
    /// Current cell.  For exited agents, the exit cell they left through.
    pub cell: Vec<Cell>,

    /// Cells per tick after the latest panic update.
    pub speed: Vec<f32>,

    /// Non-negative panic level.
    pub panic: Vec<f32>,

    /// Fractional movement budget carried between ticks, in `[0, 1)`.
    pub stride: Vec<f32>,

    /// Heading taken last tick.
    pub heading: Vec<Option<Direction>>,

    /// Heading the cached path implied last tick.
    pub path_heading: Vec<Option<Direction>>,

    /// Whether avoidance overrode path-following last tick.
    pub deflected: Vec<bool>,

    /// Ticks left before avoidance may fire again.
    pub avoid_cooldown: Vec<u32>,

    /// Cached route, if any.
    pub path: Vec<Option<CachedPath>>,

    pub status: Vec<AgentStatus>,

    /// Tick at which the agent entered the pool.
    pub spawn_tick: Vec<Tick>,

    live: usize,
}

impl AgentPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (non-exited) agents.
    #[inline]
    pub fn len(&self) -> usize {
        self.live
    }

    /// `true` if no live agents remain.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Number of ids ever issued (live + exited).
    #[inline]
    pub fn capacity(&self) -> usize {
        self.cell.len()
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Add an agent at `cell` moving at `base_speed`.  The caller is
    /// responsible for `cell` being walkable.
    pub fn spawn(&mut self, cell: Cell, base_speed: f32, tick: Tick) -> AgentId {
        let id = AgentId::from_index(self.cell.len());
        self.cell.push(cell);
        self.speed.push(base_speed);
        self.panic.push(0.0);
        self.stride.push(0.0);
        self.heading.push(None);
        self.path_heading.push(None);
        self.deflected.push(false);
        self.avoid_cooldown.push(0);
        self.path.push(None);
        self.status.push(AgentStatus::Active);
        self.spawn_tick.push(tick);
        self.live += 1;
        id
    }

    /// Mark `agent` exited at `tick` and drop its cached path.
    pub fn remove(&mut self, agent: AgentId, tick: Tick) -> AgentResult<()> {
        let status = self
            .status
            .get_mut(agent.index())
            .ok_or(AgentError::AgentNotFound(agent))?;
        if !status.is_alive() {
            return Err(AgentError::AlreadyExited(agent));
        }
        *status = AgentStatus::Exited { tick };
        self.path[agent.index()] = None;
        self.live -= 1;
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// `true` if `agent` exists and has not exited.
    #[inline]
    pub fn is_active(&self, agent: AgentId) -> bool {
        self.status.get(agent.index()).is_some_and(|s| s.is_alive())
    }

    #[inline]
    pub fn cell(&self, agent: AgentId) -> Option<Cell> {
        self.cell.get(agent.index()).copied()
    }

    #[inline]
    pub fn status(&self, agent: AgentId) -> Option<AgentStatus> {
        self.status.get(agent.index()).copied()
    }

    /// Ids of all issued agents in ascending order.
    pub fn agent_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        (0..self.capacity() as u32).map(AgentId)
    }

    /// Live agent ids in ascending order.
    pub fn active_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.agent_ids().filter(|&a| self.status[a.index()].is_alive())
    }

    /// `(id, cell)` for every live agent.
    pub fn positions(&self) -> impl Iterator<Item = (AgentId, Cell)> + '_ {
        self.active_ids().map(|a| (a, self.cell[a.index()]))
    }

    /// Live agents currently stuck.
    pub fn stuck_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.active_ids().filter(|&a| self.status[a.index()].is_stuck())
    }

    /// Proximity-index samples for every live agent.
    pub fn samples(&self) -> impl Iterator<Item = AgentSample> + '_ {
        self.active_ids().map(|a| AgentSample {
            id:    a,
            cell:  self.cell[a.index()],
            speed: self.speed[a.index()],
            panic: self.panic[a.index()],
        })
    }

    // ── Apply phase ───────────────────────────────────────────────────────

    /// Write one buffered decision.  Only call once every decision of the
    /// tick has been computed.
    pub fn apply(&mut self, decision: Decision) {
        let i = decision.agent.index();
        self.cell[i]           = decision.cell;
        self.speed[i]          = decision.speed;
        self.panic[i]          = decision.panic;
        self.stride[i]         = decision.stride;
        self.heading[i]        = decision.heading;
        self.path_heading[i]   = decision.path_heading;
        self.deflected[i]      = decision.deflected;
        self.avoid_cooldown[i] = decision.avoid_cooldown;
        self.status[i]         = decision.status;

        match decision.path {
            PathUpdate::Keep { cursor, revision } => {
                if let Some(cached) = self.path[i].as_mut() {
                    cached.cursor = cursor;
                    cached.revision = revision;
                }
            }
            PathUpdate::Replace(cached) => self.path[i] = Some(cached),
            PathUpdate::Clear => self.path[i] = None,
        }
    }
}
