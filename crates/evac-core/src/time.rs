//! Simulation time model.
//!
//! Time is a monotonically increasing `Tick` counter.  One tick moves every
//! live agent once; the wall-clock meaning of a tick is only needed when
//! reporting evacuation times, so `SimClock` carries an optional
//! `secs_per_tick` scale and nothing else.
//!
//! Ticks are numbered from 0.  The step that runs while the clock reads
//! `Tick(t)` is "tick t"; after it completes the clock reads `Tick(t + 1)`,
//! which is also the number of steps executed so far.

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// Ticks elapsed from `earlier` to `self`.
    ///
    /// # Panics
    /// Panics in debug mode if `earlier > self`.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0 - earlier.0
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// The discrete step counter owned by the simulation for the run's lifetime.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Real seconds one tick represents (reporting only).  Default 1.0.
    pub secs_per_tick: f32,
    /// The tick the next `step` will execute.
    pub current_tick: Tick,
}

impl SimClock {
    pub fn new(secs_per_tick: f32) -> Self {
        Self {
            secs_per_tick,
            current_tick: Tick::ZERO,
        }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    /// Number of steps executed so far.
    #[inline]
    pub fn elapsed_ticks(&self) -> u64 {
        self.current_tick.0
    }

    /// Elapsed simulated seconds since tick 0.
    #[inline]
    pub fn elapsed_secs(&self) -> f32 {
        self.ticks_to_secs(self.current_tick.0)
    }

    /// Convert a tick count to simulated seconds.
    #[inline]
    pub fn ticks_to_secs(&self, ticks: u64) -> f32 {
        ticks as f32 * self.secs_per_tick
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.1} s)", self.current_tick, self.elapsed_secs())
    }
}
