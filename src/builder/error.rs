//! Build errors for the machine builder.

use crate::error::FsmError;
use thiserror::Error;

/// Errors that can occur when building a state machine.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("No states defined. Add at least one state with .state() or .with_state()")]
    NoStates,

    #[error("Initial state '{name}' is not among the defined states")]
    UnknownInitialState { name: String },

    #[error("Transition '{source_state}' -> '{destination}' references an undefined state")]
    UnknownEndpoint {
        source_state: String,
        destination: String,
    },

    #[error(transparent)]
    Machine(#[from] FsmError),
}
