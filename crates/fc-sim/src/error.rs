use fc_core::{ActorId, FcError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("population length {got} does not match actor count {expected}")]
    PopulationMismatch {
        expected: usize,
        got:      usize,
    },

    #[error("{0} panicked while using the facility")]
    ActorPanicked(ActorId),

    #[error(transparent)]
    Core(#[from] FcError),
}

pub type SimResult<T> = Result<T, SimError>;
