//! Transition trait and the inputs handed to its guard.

use super::flags::Flags;
use super::state::{Reset, State};
use crate::error::CallbackError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Stable identifier of a transition registered with a machine.
///
/// Both transition indices (by source and by destination) refer to the
/// transition through this id, so removal cannot leave one index stale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TransitionId(Uuid);

impl TransitionId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for TransitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything a guard may look at when deciding whether to fire.
///
/// `source` and `destination` are `None` when the transition names a state
/// that is not registered.
pub struct GuardInput<'a, C> {
    /// State the transition leaves.
    pub source: Option<&'a dyn State<C>>,
    /// State the transition enters.
    pub destination: Option<&'a dyn State<C>>,
    /// Context passed to `update`.
    pub context: &'a C,
    /// The machine's flags at evaluation time.
    pub flags: &'a Flags,
}

impl<C> GuardInput<'_, C> {
    pub fn source_name(&self) -> Option<&str> {
        self.source.map(|s| s.name())
    }

    pub fn destination_name(&self) -> Option<&str> {
        self.destination.map(|s| s.name())
    }
}

/// A directed, guarded edge between two named states.
///
/// Source and destination may be equal, producing a self-loop.
pub trait Transition<C>: fmt::Debug {
    /// Name of the state this transition leaves.
    fn source(&self) -> &str;

    /// Name of the state this transition enters.
    fn destination(&self) -> &str;

    /// Decide whether the transition fires for this update.
    ///
    /// Errors are not caught by the machine; they surface from `update`.
    fn can_apply(&mut self, input: &GuardInput<'_, C>) -> Result<bool, CallbackError>;

    /// Memory cleared on `reset`, if the transition keeps any.
    fn as_reset_mut(&mut self) -> Option<&mut dyn Reset> {
        None
    }
}
