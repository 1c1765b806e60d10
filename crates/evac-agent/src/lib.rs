//! `evac-agent` — Structure-of-Arrays agent pool and the motion model for the
//! `rust_evac` simulator.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                    |
//! |---------------|-------------------------------------------------------------|
//! | [`pool`]      | `AgentPool` (SoA arrays), `AgentRngs` (per-agent RNG)       |
//! | [`builder`]   | `AgentPoolBuilder` (initial placement)                      |
//! | [`state`]     | `AgentStatus`, `CachedPath`, `Decision`, `PathUpdate`       |
//! | [`motion`]    | `MotionParams`, `MotionContext`, `decide`                   |
//! | [`error`]     | `AgentError`, `AgentResult<T>`                              |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                      |
//! |---------|-------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `AgentStatus`.         |

pub mod builder;
pub mod error;
pub mod motion;
pub mod pool;
pub mod state;

#[cfg(test)]
mod tests;

pub use builder::AgentPoolBuilder;
pub use error::{AgentError, AgentResult};
pub use motion::{AVOIDANCE_COOLDOWN_TICKS, MotionContext, MotionParams, decide};
pub use pool::{AgentPool, AgentRngs};
pub use state::{AgentStatus, CachedPath, Decision, PathUpdate};
