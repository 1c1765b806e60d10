//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use evac_agent::AgentPool;
use evac_core::{EvacConfig, Tick};
use evac_grid::{CellKind, GridWorld};
use evac_sim::{ExitEvent, RunOutcome, SimObserver, TickReport};

use crate::row::{AgentSnapshotRow, ExitEventRow, LayoutRow, TickSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes layouts, agent snapshots, exit events, and
/// tick summaries to any [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
///
/// The layout is written whenever a snapshot sees a grid revision not yet
/// recorded, so barrier replacements show up in `layout.csv`.
pub struct SimOutputObserver<W: OutputWriter> {
    writer:          W,
    secs_per_tick:   f32,
    pending_exits:   Vec<ExitEventRow>,
    layout_revision: Option<u64>,
    last_error:      Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    /// Create an observer backed by `writer`, using `config` for tick-to-second
    /// conversion.
    pub fn new(writer: W, config: &EvacConfig) -> Self {
        Self {
            writer,
            secs_per_tick:   config.secs_per_tick,
            pending_exits:   Vec::new(),
            layout_revision: None,
            last_error:      None,
        }
    }

    /// Write the layout of `grid` now, unless this revision is already
    /// recorded.  Useful when snapshots are disabled.
    pub fn record_layout(&mut self, grid: &GridWorld) {
        if self.layout_revision == Some(grid.revision()) {
            return;
        }
        self.layout_revision = Some(grid.revision());

        let revision = grid.revision();
        let rows: Vec<LayoutRow> = grid
            .barriers()
            .map(|c| (c, CellKind::Barrier))
            .chain(grid.exits().iter().map(|&c| (c, CellKind::Exit)))
            .map(|(c, kind)| LayoutRow { revision, x: c.x, y: c.y, kind })
            .collect();

        let result = self.writer.write_layout(&rows);
        self.store_err(result);
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            tracing::warn!(error = %e, "simulation output write failed");
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_exit(&mut self, event: &ExitEvent) {
        self.pending_exits.push(ExitEventRow {
            tick:         event.tick.0,
            agent_id:     event.agent.0,
            x:            event.cell.x,
            y:            event.cell.y,
            travel_ticks: event.travel_ticks,
        });
    }

    fn on_tick_end(&mut self, tick: Tick, report: &TickReport) {
        if !self.pending_exits.is_empty() {
            let rows = std::mem::take(&mut self.pending_exits);
            let result = self.writer.write_exits(&rows);
            self.store_err(result);
        }

        let row = TickSummaryRow {
            tick:         tick.0,
            elapsed_secs: (tick.0 + 1) as f32 * self.secs_per_tick,
            moved:        report.moved as u64,
            exited:       report.exited as u64,
            replanned:    report.replanned as u64,
            deflected:    report.deflected as u64,
            stuck:        report.stuck as u64,
            remaining:    report.remaining as u64,
        };
        let result = self.writer.write_tick_summary(&row);
        self.store_err(result);
    }

    fn on_snapshot(&mut self, tick: Tick, agents: &AgentPool, grid: &GridWorld) {
        self.record_layout(grid);

        let rows: Vec<AgentSnapshotRow> = agents
            .active_ids()
            .map(|a| {
                let i = a.index();
                AgentSnapshotRow {
                    tick:      tick.0,
                    agent_id:  a.0,
                    x:         agents.cell[i].x,
                    y:         agents.cell[i].y,
                    status:    agents.status[i].as_str(),
                    speed:     agents.speed[i],
                    panic:     agents.panic[i],
                    heading:   agents.heading[i],
                    deflected: agents.deflected[i],
                }
            })
            .collect();

        if !rows.is_empty() {
            let result = self.writer.write_snapshots(&rows);
            self.store_err(result);
        }
    }

    fn on_sim_end(&mut self, _final_tick: Tick, _outcome: &RunOutcome) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
