use evac_agent::AgentError;
use evac_core::{AgentId, Cell, EvacError};
use evac_grid::GridError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(#[from] EvacError),

    #[error("{what} length {got} does not match agent count {expected}")]
    AgentCountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Agent(#[from] AgentError),

    /// The planner rejected a live agent's own cell.  Only reachable if the
    /// pool and grid disagree, which the public API prevents.
    #[error("planning failed for agent {agent}: {source}")]
    Planning {
        agent:  AgentId,
        #[source]
        source: GridError,
    },

    /// The barrier layer was edited without going through
    /// `Sim::replace_barriers`.
    #[error("grid revision {found} was never acknowledged (last acknowledged {acknowledged}); use replace_barriers")]
    StaleConfiguration { acknowledged: u64, found: u64 },

    #[error("barrier at {cell} would cover live agent {agent}")]
    BarrierOnAgent { agent: AgentId, cell: Cell },
}

pub type SimResult<T> = Result<T, SimError>;
