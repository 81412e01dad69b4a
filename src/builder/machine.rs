//! Builder for constructing state machines.

use crate::builder::error::BuildError;
use crate::core::{Action, NamedState, State, Transition};
use crate::machine::StateMachine;
use std::collections::HashSet;

/// Builder for constructing state machines with a fluent API.
///
/// # Example
///
/// ```rust
/// use stateloom::builder::MachineBuilder;
/// use stateloom::core::{AlwaysTransition, CallbackAction};
///
/// let mut machine = MachineBuilder::<u32>::new()
///     .state("idle")
///     .state("busy")
///     .transition(AlwaysTransition::new("idle", "busy"))
///     .transition(AlwaysTransition::new("busy", "idle"))
///     .action("busy", CallbackAction::on_become_active(|ctx| Ok(ctx.is_some())))
///     .build()
///     .unwrap();
///
/// assert!(machine.update(&1).unwrap());
/// assert_eq!(machine.current_state_name(), Some("busy"));
/// ```
pub struct MachineBuilder<C> {
    states: Vec<Box<dyn State<C>>>,
    transitions: Vec<Box<dyn Transition<C>>>,
    actions: Vec<(String, Box<dyn Action<C>>)>,
    initial: Option<String>,
    flags: Vec<(String, bool)>,
}

impl<C> MachineBuilder<C> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            transitions: Vec::new(),
            actions: Vec::new(),
            initial: None,
            flags: Vec::new(),
        }
    }

    /// Add a plain named state.
    pub fn state(self, name: impl Into<String>) -> Self {
        self.with_state(NamedState::new(name))
    }

    /// Add a custom state.
    pub fn with_state<S>(mut self, state: S) -> Self
    where
        S: State<C> + 'static,
    {
        self.states.push(Box::new(state));
        self
    }

    pub fn transition<T>(mut self, transition: T) -> Self
    where
        T: Transition<C> + 'static,
    {
        self.transitions.push(Box::new(transition));
        self
    }

    pub fn action<A>(mut self, state: impl Into<String>, action: A) -> Self
    where
        A: Action<C> + 'static,
    {
        self.actions.push((state.into(), Box::new(action)));
        self
    }

    /// Set the initial state. Defaults to the first state added.
    pub fn initial(mut self, name: impl Into<String>) -> Self {
        self.initial = Some(name.into());
        self
    }

    /// Seed a flag read by flag-guarded transitions.
    pub fn flag(mut self, name: impl Into<String>, value: bool) -> Self {
        self.flags.push((name.into(), value));
        self
    }

    /// Build the state machine.
    /// Returns an error if the definition is inconsistent.
    pub fn build(self) -> Result<StateMachine<C>, BuildError> {
        if self.states.is_empty() {
            return Err(BuildError::NoStates);
        }

        let names: HashSet<&str> = self.states.iter().map(|s| s.name()).collect();
        if let Some(name) = &self.initial {
            if !names.contains(name.as_str()) {
                return Err(BuildError::UnknownInitialState { name: name.clone() });
            }
        }
        if let Some(t) = self
            .transitions
            .iter()
            .find(|t| !names.contains(t.source()) || !names.contains(t.destination()))
        {
            return Err(BuildError::UnknownEndpoint {
                source_state: t.source().to_string(),
                destination: t.destination().to_string(),
            });
        }

        let mut machine = StateMachine::new();
        if let Some(name) = self.initial {
            machine.set_initial_state(name);
        }
        for state in self.states {
            machine.add_boxed_state(state)?;
        }
        for transition in self.transitions {
            machine.add_boxed_transition(transition);
        }
        for (state, action) in self.actions {
            machine.add_boxed_action(&state, action);
        }
        for (name, value) in self.flags {
            machine.flags_mut().set(name, value);
        }
        Ok(machine)
    }
}

impl<C> Default for MachineBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}
