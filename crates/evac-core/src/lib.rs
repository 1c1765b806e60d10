//! `evac-core` — foundational types for the `rust_evac` evacuation simulator.
//!
//! This crate is a dependency of every other `evac-*` crate.  It has no
//! `evac-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                               |
//! |------------|--------------------------------------------------------|
//! | [`ids`]    | `AgentId`                                              |
//! | [`cell`]   | `Cell`, `Direction`                                    |
//! | [`time`]   | `Tick`, `SimClock`                                     |
//! | [`config`] | `EvacConfig`, `SpawnDistribution`                      |
//! | [`rng`]    | `AgentRng` (per-agent), `SimRng` (global)              |
//! | [`error`]  | `EvacError`, `EvacResult`                              |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod cell;
pub mod config;
pub mod error;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use cell::{Cell, Direction};
pub use config::{EvacConfig, SpawnDistribution};
pub use error::{EvacError, EvacResult};
pub use ids::AgentId;
pub use rng::{AgentRng, SimRng};
pub use time::{SimClock, Tick};
