//! `evac-sim` — tick loop orchestrator for the rust_evac simulator.
//!
//! # Two-phase tick loop
//!
//! ```text
//! every step:
//!   ① Index     — rebuild the proximity index from live agent positions.
//!   ② Decide    — call motion::decide for each live agent against the
//!                 frozen grid, pool, and index (parallel with `parallel`).
//!   ③ Apply     — write decisions in ascending AgentId order.
//!   ④ Remove    — agents standing on an exit leave; ExitEvents are logged
//!                 at the current tick.
//! ```
//!
//! The barrier layer only changes between steps through
//! `Sim::replace_barriers`.  A direct edit of `sim.grid` is detected by the
//! next step and reported as `SimError::StaleConfiguration`.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs the decision phase on Rayon's thread pool.        |
//! | `serde`    | Derives `Serialize` on reports and statistics.         |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use evac_core::{Cell, EvacConfig};
//! use evac_grid::AStarPlanner;
//! use evac_sim::{NoopObserver, SimBuilder};
//!
//! let config = EvacConfig {
//!     width: 10, height: 1,
//!     exits: vec![Cell::new(9, 0)],
//!     agent_count: 1,
//!     ..EvacConfig::default()
//! };
//! let mut sim = SimBuilder::new(config, AStarPlanner).build()?;
//! let outcome = sim.run(100, &mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod metrics;
pub mod observer;
pub mod report;
pub mod sim;


pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use metrics::EvacuationStats;
pub use observer::{NoopObserver, SimObserver};
pub use report::{AgentView, ExitEvent, RunOutcome, TickReport, WorldSnapshot};
pub use sim::Sim;
