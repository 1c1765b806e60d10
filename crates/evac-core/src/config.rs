//! Fully resolved run configuration.
//!
//! The simulator never reads configuration sources itself.  Applications
//! load an `EvacConfig` from wherever they like (the demo uses JSON through
//! the `serde` feature) and hand the finished value to `evac-sim`.

use crate::{Cell, EvacError, EvacResult};

// ── SpawnDistribution ─────────────────────────────────────────────────────────

/// Where the initial agents are placed.
///
/// Random variants draw from the run's `SimRng`, so placement is reproducible
/// for a fixed seed.  Barrier and exit cells are never chosen.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum SpawnDistribution {
    /// Uniformly over every open, non-exit cell of the grid.
    #[default]
    Uniform,
    /// Uniformly over the open, non-exit cells of an inclusive rectangle.
    Region { min: Cell, max: Cell },
    /// Exactly these cells, one agent each.  `agent_count` is ignored.
    Cells { cells: Vec<Cell> },
}

// ── EvacConfig ────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EvacConfig {
    /// Grid width in cells.
    pub width: u32,
    /// Grid height in cells.
    pub height: u32,

    /// Initial impassable cells.
    pub barriers: Vec<Cell>,
    /// Exit cells.  Must not overlap `barriers`.
    pub exits: Vec<Cell>,

    /// Speed of a calm agent, in cells per tick.
    pub base_speed: f32,
    /// Radius (cells, Euclidean between centres) for panic averaging.
    pub panic_radius: f32,
    /// Radius within which an agent steers away from its closest neighbour.
    pub distance_preference: f32,
    /// Panic gained per unit of mean neighbour speed.
    pub panic_gain: f32,
    /// Optional ceiling on panic.  `None` leaves panic unbounded.
    pub max_panic: Option<f32>,
    /// Consecutive failed plans after which a stuck agent stops retrying until
    /// the barrier layer changes.  `None` retries every tick forever.
    pub max_plan_retries: Option<u32>,

    /// Number of agents to spawn (ignored by `SpawnDistribution::Cells`).
    pub agent_count: usize,
    /// Initial placement.
    pub spawn: SpawnDistribution,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Real seconds one tick represents; only used for reporting.
    pub secs_per_tick: f32,
    /// Emit an observer snapshot every N ticks.  0 disables snapshots.
    pub snapshot_interval_ticks: u64,
    /// Tick cap used by drivers that call `run` with the configured limit.
    pub max_ticks: u64,
}

impl Default for EvacConfig {
    fn default() -> Self {
        Self {
            width:                   0,
            height:                  0,
            barriers:                Vec::new(),
            exits:                   Vec::new(),
            base_speed:              1.0,
            panic_radius:            3.0,
            distance_preference:     1.0,
            panic_gain:              0.1,
            max_panic:               None,
            max_plan_retries:        None,
            agent_count:             0,
            spawn:                   SpawnDistribution::Uniform,
            seed:                    0,
            secs_per_tick:           1.0,
            snapshot_interval_ticks: 1,
            max_ticks:               1_000,
        }
    }
}

impl EvacConfig {
    /// Check scalar parameters.  Layout consistency (bounds, overlaps) is
    /// checked by the grid builder, which owns that knowledge.
    pub fn validate(&self) -> EvacResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(EvacError::Config(format!(
                "grid dimensions must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        check_positive("base_speed", self.base_speed)?;
        check_non_negative("panic_radius", self.panic_radius)?;
        check_non_negative("distance_preference", self.distance_preference)?;
        check_non_negative("panic_gain", self.panic_gain)?;
        if let Some(cap) = self.max_panic {
            check_non_negative("max_panic", cap)?;
        }
        check_positive("secs_per_tick", self.secs_per_tick)?;
        if let SpawnDistribution::Region { min, max } = &self.spawn {
            if min.x > max.x || min.y > max.y {
                return Err(EvacError::Config(format!(
                    "spawn region min {min} exceeds max {max}"
                )));
            }
        }
        Ok(())
    }
}

fn check_positive(name: &str, v: f32) -> EvacResult<()> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(EvacError::Config(format!("{name} must be finite and > 0, got {v}")))
    }
}

fn check_non_negative(name: &str, v: f32) -> EvacResult<()> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(EvacError::Config(format!("{name} must be finite and >= 0, got {v}")))
    }
}
