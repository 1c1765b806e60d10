//! Agent-subsystem error type.

use thiserror::Error;

use evac_core::{AgentId, Cell};
use evac_grid::GridError;

/// Errors produced by `evac-agent`.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("agent {0} not found")]
    AgentNotFound(AgentId),

    #[error("agent {0} has already exited")]
    AlreadyExited(AgentId),

    #[error("cannot spawn an agent on barrier cell {0}")]
    SpawnOnBarrier(Cell),

    #[error("no open cell available to spawn {0} agents")]
    NoSpawnCells(usize),

    #[error(transparent)]
    Grid(#[from] GridError),
}

pub type AgentResult<T> = Result<T, AgentError>;
