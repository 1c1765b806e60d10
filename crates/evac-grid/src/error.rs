//! Grid-subsystem error type.

use thiserror::Error;

use evac_core::Cell;

/// Errors produced by `evac-grid`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("cell {cell} is outside the {width}x{height} grid")]
    OutOfBounds { cell: Cell, width: u32, height: u32 },

    #[error("grid dimensions must be non-zero, got {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("cell {0} cannot be both a barrier and an exit")]
    BarrierOnExit(Cell),

    #[error("planning start {0} is a barrier")]
    InvalidStart(Cell),

    #[error("planning goal {0} is not reachable terrain")]
    InvalidGoal(Cell),

    #[error("no path from {from} to any exit")]
    NoPathFound { from: Cell },
}

pub type GridResult<T> = Result<T, GridError>;
