//! `evac-output` — simulation output writers for the rust_evac simulator.
//!
//! One backend is provided:
//!
//! | Backend | Files created                                                                  |
//! |---------|--------------------------------------------------------------------------------|
//! | CSV     | `layout.csv`, `agent_snapshots.csv`, `exit_events.csv`, `tick_summaries.csv`   |
//!
//! Backends implement [`OutputWriter`] and are driven by
//! [`SimOutputObserver`], which implements `evac_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use evac_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output")).unwrap();
//! let mut obs = SimOutputObserver::new(writer, &sim.config);
//! obs.record_layout(sim.grid());
//! sim.run(sim.config.max_ticks, &mut obs).unwrap();
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{AgentSnapshotRow, ExitEventRow, LayoutRow, TickSummaryRow};
pub use writer::OutputWriter;
