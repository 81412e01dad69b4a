//! Per-state action lists, one per run mode.

use crate::core::{Action, RunMode};
use crate::error::CallbackError;
use std::collections::HashMap;

struct ActionLists<C> {
    on_become_active: Vec<Box<dyn Action<C>>>,
    on_resign_active: Vec<Box<dyn Action<C>>>,
}

impl<C> ActionLists<C> {
    fn new() -> Self {
        Self {
            on_become_active: Vec::new(),
            on_resign_active: Vec::new(),
        }
    }

    fn list(&self, mode: RunMode) -> &[Box<dyn Action<C>>] {
        match mode {
            RunMode::OnBecomeActive => &self.on_become_active,
            RunMode::OnResignActive => &self.on_resign_active,
        }
    }

    fn list_mut(&mut self, mode: RunMode) -> &mut Vec<Box<dyn Action<C>>> {
        match mode {
            RunMode::OnBecomeActive => &mut self.on_become_active,
            RunMode::OnResignActive => &mut self.on_resign_active,
        }
    }
}

pub(crate) struct ActionTable<C> {
    lists: HashMap<String, ActionLists<C>>,
}

impl<C> ActionTable<C> {
    pub(crate) fn new() -> Self {
        Self {
            lists: HashMap::new(),
        }
    }

    /// Append an action to the list selected by its own run mode.
    pub(crate) fn add(&mut self, state: &str, action: Box<dyn Action<C>>) {
        let mode = action.run_mode();
        self.lists
            .entry(state.to_string())
            .or_insert_with(ActionLists::new)
            .list_mut(mode)
            .push(action);
    }

    /// Drop both lists for a state, returning how many actions were removed.
    pub(crate) fn remove_at(&mut self, state: &str) -> usize {
        self.lists.remove(state).map_or(0, |lists| {
            lists.on_become_active.len() + lists.on_resign_active.len()
        })
    }

    pub(crate) fn count(&self, state: &str, mode: RunMode) -> usize {
        self.lists.get(state).map_or(0, |lists| lists.list(mode).len())
    }

    /// Run the actions for `state` and `mode` in insertion order.
    ///
    /// Stops at the first action reporting `false` and reports `false` itself.
    pub(crate) fn run(
        &mut self,
        state: &str,
        mode: RunMode,
        context: Option<&C>,
    ) -> Result<bool, CallbackError> {
        let Some(lists) = self.lists.get_mut(state) else {
            return Ok(true);
        };
        for action in lists.list_mut(mode).iter_mut() {
            if !action.run(context)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
