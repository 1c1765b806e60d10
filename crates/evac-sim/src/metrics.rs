//! Evacuation statistics derived from the exit log.

use evac_core::SimClock;

use crate::ExitEvent;

/// Aggregate timing of a (possibly unfinished) evacuation.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EvacuationStats {
    /// Agents that have left.
    pub evacuated:         usize,
    /// Agents still inside.
    pub remaining:         usize,
    /// Steps executed so far.
    pub ticks_run:         u64,
    /// Ticks until the last agent left.  `None` while anyone remains.
    pub evacuation_ticks:  Option<u64>,
    /// `evacuation_ticks` in seconds, using the clock's tick length.
    pub evacuation_secs:   Option<f32>,
    pub mean_travel_ticks: Option<f32>,
    pub max_travel_ticks:  Option<u64>,
    /// Exits per tick, indexed by tick number.
    pub throughput:        Vec<usize>,
}

impl EvacuationStats {
    /// Summarise `log` (in tick order) for a run whose clock reads `clock`.
    pub fn from_exit_log(log: &[ExitEvent], remaining: usize, clock: &SimClock) -> Self {
        let ticks_run = clock.elapsed_ticks();

        let mut throughput = vec![0usize; ticks_run as usize];
        for event in log {
            if let Some(slot) = throughput.get_mut(event.tick.0 as usize) {
                *slot += 1;
            }
        }

        let evacuation_ticks = if remaining == 0 {
            Some(log.last().map_or(0, |e| e.tick.0 + 1))
        } else {
            None
        };

        let total: u64 = log.iter().map(|e| e.travel_ticks).sum();
        let mean_travel_ticks = (!log.is_empty()).then(|| total as f32 / log.len() as f32);

        Self {
            evacuated: log.len(),
            remaining,
            ticks_run,
            evacuation_ticks,
            evacuation_secs: evacuation_ticks.map(|t| clock.ticks_to_secs(t)),
            mean_travel_ticks,
            max_travel_ticks: log.iter().map(|e| e.travel_ticks).max(),
            throughput,
        }
    }

    /// Largest number of agents that left during a single tick.
    pub fn peak_throughput(&self) -> usize {
        self.throughput.iter().copied().max().unwrap_or(0)
    }
}
