//! Simulation observer trait for progress reporting and data collection.

use evac_agent::AgentPool;
use evac_core::Tick;
use evac_grid::GridWorld;

use crate::{ExitEvent, RunOutcome, TickReport};

/// Callbacks invoked by [`Sim::step`][crate::Sim::step] and
/// [`Sim::run`][crate::Sim::run] at key points in the tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter { interval: u64 }
///
/// impl SimObserver for ProgressPrinter {
///     fn on_tick_end(&mut self, tick: Tick, report: &TickReport) {
///         if tick.0 % self.interval == 0 {
///             println!("tick {tick}: {} agents left", report.remaining);
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called once per agent removed this tick, in ascending id order, before
    /// `on_tick_end`.
    fn on_exit(&mut self, _event: &ExitEvent) {}

    /// Called at the end of each tick with its summary.
    fn on_tick_end(&mut self, _tick: Tick, _report: &TickReport) {}

    /// Called at snapshot intervals (every `config.snapshot_interval_ticks`
    /// ticks), after the tick's moves and removals.
    ///
    /// Provides read-only access to the pool and grid so that output writers
    /// can record positions without the sim knowing any output format.
    fn on_snapshot(&mut self, _tick: Tick, _agents: &AgentPool, _grid: &GridWorld) {}

    /// Called once when [`Sim::run`][crate::Sim::run] returns successfully.
    fn on_sim_end(&mut self, _final_tick: Tick, _outcome: &RunOutcome) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
