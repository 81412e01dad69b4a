//! State trait and its optional capabilities.
//!
//! A state is identified by its name. Beyond the name, a state may expose
//! two independent capabilities which the engine discovers at runtime:
//!
//! - [`StateLifecycle`]: observe (and veto) becoming or resigning active
//! - [`Reset`]: clear internal memory when the machine is reset

use crate::error::CallbackError;
use std::fmt::Debug;

/// Capability for objects that hold memory the machine clears on `reset`.
///
/// Shared by states and transitions.
pub trait Reset {
    /// Forget whatever was accumulated since the last reset.
    fn reset(&mut self);
}

/// Capability for states that react to becoming or resigning active.
///
/// The context is `None` when the move happens during `reset`.
pub trait StateLifecycle<C> {
    /// Called right after the state became the current state.
    ///
    /// Returning `Ok(false)` makes the enclosing `update` or `reset` report
    /// failure, but the current state has already moved.
    fn did_become_active(&mut self, context: Option<&C>) -> Result<bool, CallbackError>;

    /// Called right before the state stops being the current state.
    ///
    /// Rejection is observed and logged but does not block the move.
    /// An error aborts the move and leaves this state current.
    fn will_resign_active(&mut self, context: Option<&C>) -> Result<bool, CallbackError>;
}

/// Trait for state machine states.
///
/// Only `name` is required. The capability queries default to `None`;
/// implementors that carry a capability return `Some(self)`.
///
/// # Example
///
/// ```rust
/// use stateloom::core::{Reset, State};
///
/// #[derive(Debug)]
/// struct Counting {
///     visits: u32,
/// }
///
/// impl Reset for Counting {
///     fn reset(&mut self) {
///         self.visits = 0;
///     }
/// }
///
/// impl State<()> for Counting {
///     fn name(&self) -> &str {
///         "counting"
///     }
///
///     fn as_reset_mut(&mut self) -> Option<&mut dyn Reset> {
///         Some(self)
///     }
/// }
///
/// let mut state = Counting { visits: 3 };
/// state.as_reset_mut().unwrap().reset();
/// assert_eq!(state.visits, 0);
/// ```
pub trait State<C>: Debug {
    /// Unique name of the state within a machine.
    fn name(&self) -> &str;

    /// Lifecycle hooks of this state, if it has any.
    fn as_lifecycle_mut(&mut self) -> Option<&mut dyn StateLifecycle<C>> {
        None
    }

    /// Memory cleared on `reset`, if the state keeps any.
    fn as_reset_mut(&mut self) -> Option<&mut dyn Reset> {
        None
    }
}

/// Plain named state with no capabilities.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamedState {
    name: String,
}

impl NamedState {
    /// Create a state with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl<C> State<C> for NamedState {
    fn name(&self) -> &str {
        &self.name
    }
}
