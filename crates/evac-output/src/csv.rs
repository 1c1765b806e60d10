//! CSV output backend.
//!
//! Creates four files in the configured output directory:
//! - `layout.csv`
//! - `agent_snapshots.csv`
//! - `exit_events.csv`
//! - `tick_summaries.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{AgentSnapshotRow, ExitEventRow, LayoutRow, OutputResult, TickSummaryRow};

/// Writes simulation output to four CSV files.
pub struct CsvWriter {
    layout:    Writer<File>,
    snapshots: Writer<File>,
    exits:     Writer<File>,
    summaries: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Open (or create) the CSV files in `dir` and write the header rows.
    /// `dir` is created if missing.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut layout = Writer::from_path(dir.join("layout.csv"))?;
        layout.write_record(["revision", "x", "y", "kind"])?;

        let mut snapshots = Writer::from_path(dir.join("agent_snapshots.csv"))?;
        snapshots.write_record([
            "tick", "agent_id", "x", "y", "status", "speed", "panic", "heading", "deflected",
        ])?;

        let mut exits = Writer::from_path(dir.join("exit_events.csv"))?;
        exits.write_record(["tick", "agent_id", "x", "y", "travel_ticks"])?;

        let mut summaries = Writer::from_path(dir.join("tick_summaries.csv"))?;
        summaries.write_record([
            "tick", "elapsed_secs", "moved", "exited", "replanned", "deflected", "stuck", "remaining",
        ])?;

        Ok(Self {
            layout,
            snapshots,
            exits,
            summaries,
            finished: false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_layout(&mut self, rows: &[LayoutRow]) -> OutputResult<()> {
        for row in rows {
            self.layout.write_record(&[
                row.revision.to_string(),
                row.x.to_string(),
                row.y.to_string(),
                row.kind.as_str().to_owned(),
            ])?;
        }
        Ok(())
    }

    fn write_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.snapshots.write_record(&[
                row.tick.to_string(),
                row.agent_id.to_string(),
                row.x.to_string(),
                row.y.to_string(),
                row.status.to_owned(),
                format!("{:.3}", row.speed),
                format!("{:.3}", row.panic),
                row.heading.map(|d| d.as_str()).unwrap_or("").to_owned(),
                (row.deflected as u8).to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_exits(&mut self, rows: &[ExitEventRow]) -> OutputResult<()> {
        for row in rows {
            self.exits.write_record(&[
                row.tick.to_string(),
                row.agent_id.to_string(),
                row.x.to_string(),
                row.y.to_string(),
                row.travel_ticks.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            row.elapsed_secs.to_string(),
            row.moved.to_string(),
            row.exited.to_string(),
            row.replanned.to_string(),
            row.deflected.to_string(),
            row.stuck.to_string(),
            row.remaining.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.layout.flush()?;
        self.snapshots.flush()?;
        self.exits.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
