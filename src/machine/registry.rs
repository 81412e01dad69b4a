//! Named state storage with initial and current state tracking.

use crate::core::State;
use crate::error::FsmError;
use std::collections::HashMap;

pub(crate) struct StateRegistry<C> {
    states: HashMap<String, Box<dyn State<C>>>,
    order: Vec<String>,
    initial: Option<String>,
    current: Option<String>,
    /// The current state after it was removed from the registry.
    detached: Option<Box<dyn State<C>>>,
}

impl<C> StateRegistry<C> {
    pub(crate) fn new() -> Self {
        Self {
            states: HashMap::new(),
            order: Vec::new(),
            initial: None,
            current: None,
            detached: None,
        }
    }

    /// Register a state. The first state ever registered becomes initial
    /// unless one was already designated.
    pub(crate) fn insert(&mut self, state: Box<dyn State<C>>) -> Result<(), FsmError> {
        let name = state.name().to_string();
        if self.states.contains_key(&name) {
            return Err(FsmError::DuplicateState { name });
        }
        if self.initial.as_deref().map_or(true, str::is_empty) {
            self.initial = Some(name.clone());
        }
        self.order.push(name.clone());
        self.states.insert(name, state);
        Ok(())
    }

    /// Drop a state. If it is the current state it stays current, detached
    /// from the registry, until the machine moves elsewhere.
    pub(crate) fn remove(&mut self, name: &str) -> bool {
        let Some(state) = self.states.remove(name) else {
            return false;
        };
        self.order.retain(|n| n != name);
        if self.detached.is_none() && self.current.as_deref() == Some(name) {
            self.detached = Some(state);
        }
        true
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.states.contains_key(name)
    }

    pub(crate) fn get(&self, name: &str) -> Option<&dyn State<C>> {
        self.states.get(name).map(|s| s.as_ref())
    }

    pub(crate) fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub(crate) fn len(&self) -> usize {
        self.states.len()
    }

    pub(crate) fn initial(&self) -> Option<&str> {
        self.initial.as_deref()
    }

    pub(crate) fn set_initial(&mut self, name: String) {
        self.initial = Some(name);
    }

    pub(crate) fn current_name(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub(crate) fn current(&self) -> Option<&dyn State<C>> {
        if let Some(state) = &self.detached {
            return Some(state.as_ref());
        }
        self.current.as_deref().and_then(|name| self.get(name))
    }

    pub(crate) fn current_mut(&mut self) -> Option<&mut dyn State<C>> {
        if let Some(state) = self.detached.as_mut() {
            return Some(state.as_mut());
        }
        let name = self.current.as_deref()?;
        match self.states.get_mut(name) {
            Some(state) => Some(state.as_mut()),
            None => None,
        }
    }

    /// Make `name` current, returning the previous current name.
    ///
    /// The caller checks that `name` is registered.
    pub(crate) fn activate(&mut self, name: &str) -> Option<String> {
        self.detached = None;
        self.current.replace(name.to_string())
    }

    pub(crate) fn reset_states(&mut self) {
        for state in self.states.values_mut() {
            if let Some(resettable) = state.as_reset_mut() {
                resettable.reset();
            }
        }
    }
}
