//! `evac-grid` — static map, path planning, and proximity indexing.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`grid`]      | `GridWorld` (dense cell layer), `GridWorldBuilder`, `CellKind` |
//! | [`planner`]   | `PathPlanner` trait, `Path`, `AStarPlanner`               |
//! | [`proximity`] | `ProximityIndex` (R-tree), `AgentSample`, `AgentField`     |
//! | [`error`]     | `GridError`, `GridResult<T>`                              |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod error;
pub mod grid;
pub mod planner;
pub mod proximity;


pub use error::{GridError, GridResult};
pub use grid::{CellKind, GridWorld, GridWorldBuilder};
pub use planner::{AStarPlanner, Path, PathPlanner};
pub use proximity::{AgentField, AgentSample, ProximityIndex};
