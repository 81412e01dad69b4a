//! Error types raised by the engine.

use thiserror::Error;

/// Error raised by caller-supplied guards, actions and lifecycle hooks.
///
/// The engine never inspects these; they travel back to the caller of
/// `update` or `reset` unchanged.
pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while defining or driving a machine.
#[derive(Debug, Error)]
pub enum FsmError {
    /// A state with the same name is already registered.
    #[error("Duplicated state '{name}'")]
    DuplicateState { name: String },

    /// A move targeted a state that is not registered.
    #[error("State '{name}' does not exist")]
    StateNotFound { name: String },

    /// `reset` was requested before any initial state was designated.
    #[error("No initial state defined")]
    Uninitialized,

    #[error(transparent)]
    Callback(#[from] CallbackError),
}
