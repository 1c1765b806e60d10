//! Framework error type.
//!
//! Sub-crates define their own error enums (`GridError`, `AgentError`,
//! `SimError`, …) and wrap `EvacError` where they surface configuration
//! problems.

use thiserror::Error;

/// The top-level error type for `evac-core`.
#[derive(Debug, Error)]
pub enum EvacError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `evac-core`.
pub type EvacResult<T> = Result<T, EvacError>;
