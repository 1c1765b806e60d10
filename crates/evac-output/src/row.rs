//! Plain data row types written by output backends.

use evac_core::Direction;
use evac_grid::CellKind;

/// One non-open cell of the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutRow {
    /// Grid revision this layout belongs to.
    pub revision: u64,
    pub x:        u32,
    pub y:        u32,
    /// `Barrier` or `Exit`.
    pub kind:     CellKind,
}

/// A snapshot of one live agent at a given tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentSnapshotRow {
    pub tick:      u64,
    pub agent_id:  u32,
    pub x:         u32,
    pub y:         u32,
    /// `active` or `stuck`.
    pub status:    &'static str,
    pub speed:     f32,
    pub panic:     f32,
    /// Heading taken during the tick, if the agent tried to move.
    pub heading:   Option<Direction>,
    pub deflected: bool,
}

/// One agent leaving through an exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitEventRow {
    pub tick:         u64,
    pub agent_id:     u32,
    pub x:            u32,
    pub y:            u32,
    pub travel_ticks: u64,
}

/// Summary statistics for one simulation tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickSummaryRow {
    pub tick:         u64,
    pub elapsed_secs: f32,
    pub moved:        u64,
    pub exited:       u64,
    pub replanned:    u64,
    pub deflected:    u64,
    pub stuck:        u64,
    pub remaining:    u64,
}
