//! The `OutputWriter` trait implemented by backend writers.

use crate::{AgentSnapshotRow, ExitEventRow, LayoutRow, OutputResult, TickSummaryRow};

/// Sink for the four kinds of simulation output.
///
/// Errors surface through the observer's
/// [`take_error`][crate::SimOutputObserver::take_error], since observer hooks
/// cannot return them.
pub trait OutputWriter {
    /// Write the barrier and exit cells of one grid revision.
    fn write_layout(&mut self, rows: &[LayoutRow]) -> OutputResult<()>;

    /// Write a batch of agent snapshots.
    fn write_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()>;

    /// Write a batch of exit events.
    fn write_exits(&mut self, rows: &[ExitEventRow]) -> OutputResult<()>;

    /// Write one tick summary row.
    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}
