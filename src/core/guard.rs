//! Built-in transitions.
//!
//! Each type here differs only in its guard:
//!
//! | Type | Fires when |
//! |---|---|
//! | [`AlwaysTransition`] | every call |
//! | [`LoopTransition`] | every call, source equals destination |
//! | [`OnceTransition`] | the first call after construction or reset |
//! | [`FlagTransition`] | a named flag has the expected value |
//! | [`CallbackTransition`] | a caller-supplied predicate accepts |

use super::state::Reset;
use super::transition::{GuardInput, Transition};
use crate::error::CallbackError;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
struct Endpoints {
    source: String,
    destination: String,
}

impl Endpoints {
    fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }
}

/// Unconditional transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlwaysTransition {
    endpoints: Endpoints,
}

impl AlwaysTransition {
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            endpoints: Endpoints::new(source, destination),
        }
    }
}

impl<C> Transition<C> for AlwaysTransition {
    fn source(&self) -> &str {
        &self.endpoints.source
    }

    fn destination(&self) -> &str {
        &self.endpoints.destination
    }

    fn can_apply(&mut self, _input: &GuardInput<'_, C>) -> Result<bool, CallbackError> {
        Ok(true)
    }
}

/// Unconditional self-transition.
///
/// Keeps the machine in place while still counting as a successful update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoopTransition {
    state: String,
}

impl LoopTransition {
    pub fn new(state: impl Into<String>) -> Self {
        Self {
            state: state.into(),
        }
    }
}

impl<C> Transition<C> for LoopTransition {
    fn source(&self) -> &str {
        &self.state
    }

    fn destination(&self) -> &str {
        &self.state
    }

    fn can_apply(&mut self, _input: &GuardInput<'_, C>) -> Result<bool, CallbackError> {
        Ok(true)
    }
}

/// Fires exactly once per reset cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OnceTransition {
    endpoints: Endpoints,
    fired: bool,
}

impl OnceTransition {
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            endpoints: Endpoints::new(source, destination),
            fired: false,
        }
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }
}

impl Reset for OnceTransition {
    fn reset(&mut self) {
        self.fired = false;
    }
}

impl<C> Transition<C> for OnceTransition {
    fn source(&self) -> &str {
        &self.endpoints.source
    }

    fn destination(&self) -> &str {
        &self.endpoints.destination
    }

    fn can_apply(&mut self, _input: &GuardInput<'_, C>) -> Result<bool, CallbackError> {
        if self.fired {
            return Ok(false);
        }
        self.fired = true;
        Ok(true)
    }

    fn as_reset_mut(&mut self) -> Option<&mut dyn Reset> {
        Some(self)
    }
}

/// Fires while a named flag holds the expected value.
///
/// An undefined flag counts as `false`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlagTransition {
    endpoints: Endpoints,
    flag: String,
    expected: bool,
}

impl FlagTransition {
    /// Fires while `flag` is `true`.
    pub fn set(
        flag: impl Into<String>,
        source: impl Into<String>,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            endpoints: Endpoints::new(source, destination),
            flag: flag.into(),
            expected: true,
        }
    }

    /// Fires while `flag` is `false` or undefined.
    pub fn unset(
        flag: impl Into<String>,
        source: impl Into<String>,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            expected: false,
            ..Self::set(flag, source, destination)
        }
    }

    pub fn flag(&self) -> &str {
        &self.flag
    }
}

impl<C> Transition<C> for FlagTransition {
    fn source(&self) -> &str {
        &self.endpoints.source
    }

    fn destination(&self) -> &str {
        &self.endpoints.destination
    }

    fn can_apply(&mut self, input: &GuardInput<'_, C>) -> Result<bool, CallbackError> {
        Ok(input.flags.is_set(&self.flag) == self.expected)
    }
}

/// Type alias for caller-supplied guard predicates.
pub type GuardFn<C> = Box<dyn FnMut(&GuardInput<'_, C>) -> Result<bool, CallbackError>>;

/// Fires when the wrapped predicate accepts.
pub struct CallbackTransition<C> {
    endpoints: Endpoints,
    predicate: GuardFn<C>,
}

impl<C> CallbackTransition<C> {
    pub fn new<F>(source: impl Into<String>, destination: impl Into<String>, predicate: F) -> Self
    where
        F: FnMut(&GuardInput<'_, C>) -> Result<bool, CallbackError> + 'static,
    {
        Self {
            endpoints: Endpoints::new(source, destination),
            predicate: Box::new(predicate),
        }
    }
}

impl<C> fmt::Debug for CallbackTransition<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackTransition")
            .field("source", &self.endpoints.source)
            .field("destination", &self.endpoints.destination)
            .finish_non_exhaustive()
    }
}

impl<C> Transition<C> for CallbackTransition<C> {
    fn source(&self) -> &str {
        &self.endpoints.source
    }

    fn destination(&self) -> &str {
        &self.endpoints.destination
    }

    fn can_apply(&mut self, input: &GuardInput<'_, C>) -> Result<bool, CallbackError> {
        (self.predicate)(input)
    }
}
