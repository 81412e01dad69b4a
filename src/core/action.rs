//! Actions bound to a state's entry or exit.

use crate::error::CallbackError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// When an action runs relative to its state's activation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Right after the state became current.
    OnBecomeActive,

    /// Right before the state stops being current.
    OnResignActive,
}

/// Side-effecting callable attached to a state.
///
/// The run mode is intrinsic to the action. Returning `Ok(false)` stops the
/// remaining actions of the same hook.
pub trait Action<C>: fmt::Debug {
    /// Hook this action belongs to.
    fn run_mode(&self) -> RunMode;

    /// Perform the action. `context` is `None` during `reset`.
    fn run(&mut self, context: Option<&C>) -> Result<bool, CallbackError>;
}

/// Type alias for caller-supplied action bodies.
pub type ActionFn<C> = Box<dyn FnMut(Option<&C>) -> Result<bool, CallbackError>>;

/// Action wrapping a closure.
///
/// # Example
///
/// ```rust
/// use stateloom::core::{Action, CallbackAction, RunMode};
///
/// let mut action = CallbackAction::on_become_active(|ctx: Option<&u32>| Ok(ctx == Some(&88)));
///
/// assert_eq!(action.run_mode(), RunMode::OnBecomeActive);
/// assert!(action.run(Some(&88)).unwrap());
/// assert!(!action.run(None).unwrap());
/// ```
pub struct CallbackAction<C> {
    mode: RunMode,
    body: ActionFn<C>,
}

impl<C> CallbackAction<C> {
    pub fn new<F>(mode: RunMode, body: F) -> Self
    where
        F: FnMut(Option<&C>) -> Result<bool, CallbackError> + 'static,
    {
        Self {
            mode,
            body: Box::new(body),
        }
    }

    pub fn on_become_active<F>(body: F) -> Self
    where
        F: FnMut(Option<&C>) -> Result<bool, CallbackError> + 'static,
    {
        Self::new(RunMode::OnBecomeActive, body)
    }

    pub fn on_resign_active<F>(body: F) -> Self
    where
        F: FnMut(Option<&C>) -> Result<bool, CallbackError> + 'static,
    {
        Self::new(RunMode::OnResignActive, body)
    }
}

impl<C> fmt::Debug for CallbackAction<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackAction")
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

impl<C> Action<C> for CallbackAction<C> {
    fn run_mode(&self) -> RunMode {
        self.mode
    }

    fn run(&mut self, context: Option<&C>) -> Result<bool, CallbackError> {
        (self.body)(context)
    }
}
