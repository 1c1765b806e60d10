//! Per-agent lifecycle state, cached routes, and buffered tick decisions.

use evac_core::{AgentId, Cell, Direction, Tick};
use evac_grid::{GridWorld, Path};

// ── AgentStatus ───────────────────────────────────────────────────────────────

/// Lifecycle of one agent.
///
/// ```text
/// Active ──NoPathFound──▶ Stuck ──plan succeeds──▶ Active
///   │
///   └──reaches exit──▶ Exited   (terminal)
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AgentStatus {
    /// Live and either following, seeking, or dodging along a path.
    #[default]
    Active,
    /// Live, but the last `retries` consecutive plans found no exit.
    /// `revision` is the grid revision of the most recent attempt.
    Stuck { retries: u32, revision: u64 },
    /// Removed from the pool at `tick`.
    Exited { tick: Tick },
}

impl AgentStatus {
    /// `true` for `Active` and `Stuck`.
    #[inline]
    pub fn is_alive(self) -> bool {
        !matches!(self, AgentStatus::Exited { .. })
    }

    #[inline]
    pub fn is_stuck(self) -> bool {
        matches!(self, AgentStatus::Stuck { .. })
    }

    /// Label for CSV columns and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            AgentStatus::Active       => "active",
            AgentStatus::Stuck { .. } => "stuck",
            AgentStatus::Exited { .. } => "exited",
        }
    }
}

impl std::fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── CachedPath ────────────────────────────────────────────────────────────────

/// A planned [`Path`] plus the agent's progress along it.
///
/// The path itself is never edited; only `cursor` advances.  `cursor` indexes
/// the next waypoint, so the agent is expected to stand on `origin` while
/// `cursor == 0` and on `path[cursor - 1]` afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedPath {
    pub path:     Path,
    pub cursor:   usize,
    /// Cell the path was planned from.
    pub origin:   Cell,
    /// Grid revision the path was last validated against.
    pub revision: u64,
}

impl CachedPath {
    pub fn new(path: Path, origin: Cell, revision: u64) -> Self {
        Self { path, cursor: 0, origin, revision }
    }

    /// The next cell to step onto, or `None` once the path is exhausted.
    #[inline]
    pub fn next_waypoint(&self) -> Option<Cell> {
        self.path.get(self.cursor)
    }

    /// Where the agent should be standing if it has not deviated.
    #[inline]
    pub fn expected_cell(&self) -> Cell {
        match self.cursor {
            0 => self.origin,
            n => self.path.get(n - 1).unwrap_or(self.origin),
        }
    }

    /// A path is fresh when the agent is still on it and none of the
    /// remaining cells has become a barrier since it was validated.
    ///
    /// Only re-scans the remaining cells when the grid revision moved.
    pub fn is_fresh(&self, grid: &GridWorld, current: Cell) -> bool {
        if current != self.expected_cell() {
            return false;
        }
        self.revision == grid.revision() || self.path.first_blocked(grid, self.cursor).is_none()
    }
}

// ── Decision ──────────────────────────────────────────────────────────────────

/// How an agent's cached path changes when its [`Decision`] is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathUpdate {
    /// Keep the current path, advancing the cursor and re-stamping the
    /// revision it was validated against.
    Keep { cursor: usize, revision: u64 },
    /// Install a freshly planned path.
    Replace(CachedPath),
    /// Drop any cached path.
    Clear,
}

/// Everything one agent decided during the read-only phase of a tick.
///
/// Decisions are buffered for the whole population and applied afterwards,
/// so no agent ever observes another agent's move from the same tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub agent:          AgentId,
    /// Cell after this tick's movement.
    pub cell:           Cell,
    pub speed:          f32,
    pub panic:          f32,
    /// Fractional movement budget carried to the next tick.
    pub stride:         f32,
    /// Heading actually taken (or intended, if the stride allowed no step).
    pub heading:        Option<Direction>,
    /// Heading the path alone would have produced.
    pub path_heading:   Option<Direction>,
    /// `true` when avoidance overrode path-following this tick.
    pub deflected:      bool,
    /// Ticks before avoidance may fire again.
    pub avoid_cooldown: u32,
    /// `true` when the planner ran for this agent this tick.
    pub replanned:      bool,
    pub path:           PathUpdate,
    pub status:         AgentStatus,
}
