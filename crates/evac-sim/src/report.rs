//! Values the tick loop hands back to callers and observers.

use std::fmt;

use evac_agent::AgentStatus;
use evac_core::{AgentId, Cell, Tick};

/// One agent leaving through an exit.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ExitEvent {
    /// Tick during which the agent reached the exit.
    pub tick:         Tick,
    pub agent:        AgentId,
    /// The exit cell used.
    pub cell:         Cell,
    /// Ticks the agent spent in the simulation, counting the exit tick.
    pub travel_ticks: u64,
}

/// Summary of one [`Sim::step`][crate::Sim::step].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TickReport {
    pub tick:      Tick,
    /// Agents whose cell changed.
    pub moved:     usize,
    /// Agents removed through an exit.
    pub exited:    usize,
    /// Agents that ran the planner.
    pub replanned: usize,
    /// Agents whose move was an avoidance detour.
    pub deflected: usize,
    /// Live agents without a path after this tick.
    pub stuck:     usize,
    /// Live agents after removals.
    pub remaining: usize,
}

/// How [`Sim::run`][crate::Sim::run] ended.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum RunOutcome {
    /// Every agent left.  `ticks` is the number of steps this run executed.
    Evacuated { ticks: u64 },
    /// The tick cap was reached with agents still inside.
    Incomplete {
        ticks:     u64,
        remaining: usize,
        /// Agents that had no route when the run stopped.
        stuck:     Vec<AgentId>,
    },
}

impl RunOutcome {
    pub fn ticks(&self) -> u64 {
        match self {
            RunOutcome::Evacuated { ticks } | RunOutcome::Incomplete { ticks, .. } => *ticks,
        }
    }

    pub fn is_evacuated(&self) -> bool {
        matches!(self, RunOutcome::Evacuated { .. })
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::Evacuated { ticks } => write!(f, "evacuated in {ticks} ticks"),
            RunOutcome::Incomplete { ticks, remaining, stuck } => write!(
                f,
                "incomplete after {ticks} ticks: {remaining} remaining, {} stuck",
                stuck.len()
            ),
        }
    }
}

// ── Snapshots ─────────────────────────────────────────────────────────────────

/// Read-only copy of one agent's externally visible state.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AgentView {
    pub id:     AgentId,
    pub cell:   Cell,
    pub alive:  bool,
    pub status: AgentStatus,
    pub panic:  f32,
}

/// Every agent ever issued, at one tick boundary.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct WorldSnapshot {
    /// The tick the next `step` will run.
    pub tick:   Tick,
    pub agents: Vec<AgentView>,
}

impl WorldSnapshot {
    /// Live agents only.
    pub fn alive(&self) -> impl Iterator<Item = &AgentView> + '_ {
        self.agents.iter().filter(|a| a.alive)
    }
}
