//! State machine that composes the registry, the transition graph and the
//! action table.

use super::actions::ActionTable;
use super::graph::TransitionGraph;
use super::registry::StateRegistry;
use crate::core::{Action, Flags, GuardInput, RunMode, State, Transition, TransitionId};
use crate::error::FsmError;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

/// Endpoints of a registered transition, as reported by [`MachineSnapshot`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionSnapshot {
    pub id: TransitionId,
    pub source: String,
    pub destination: String,
}

/// Point-in-time description of a machine for diagnostics.
///
/// Guards and actions are code and are not part of the snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineSnapshot {
    pub states: Vec<String>,
    pub initial: Option<String>,
    pub current: Option<String>,
    pub transitions: Vec<TransitionSnapshot>,
    pub flags: Flags,
}

/// Passive, synchronous finite state machine.
///
/// Nothing happens until the caller invokes [`update`](Self::update) or
/// [`reset`](Self::reset). `C` is the context type handed to guards and
/// actions.
///
/// # Example
///
/// ```rust
/// use stateloom::core::{AlwaysTransition, NamedState, State};
/// use stateloom::StateMachine;
///
/// let mut machine = StateMachine::<()>::new();
/// machine.add_state(NamedState::new("draft")).unwrap();
/// machine.add_state(NamedState::new("prepared")).unwrap();
/// machine.add_transition(AlwaysTransition::new("draft", "prepared"));
///
/// assert_eq!(machine.current_state().unwrap().name(), "draft");
/// assert!(machine.update(&()).unwrap());
/// assert_eq!(machine.current_state().unwrap().name(), "prepared");
/// assert!(!machine.update(&()).unwrap());
/// ```
pub struct StateMachine<C> {
    registry: StateRegistry<C>,
    graph: TransitionGraph<C>,
    actions: ActionTable<C>,
    flags: Flags,
}

impl<C> StateMachine<C> {
    /// Create a machine with no states.
    pub fn new() -> Self {
        Self {
            registry: StateRegistry::new(),
            graph: TransitionGraph::new(),
            actions: ActionTable::new(),
            flags: Flags::new(),
        }
    }

    /// Register a state.
    ///
    /// The first state added to a machine without a designated initial
    /// state becomes the initial state.
    pub fn add_state<S>(&mut self, state: S) -> Result<&mut Self, FsmError>
    where
        S: State<C> + 'static,
    {
        self.add_boxed_state(Box::new(state))
    }

    /// Register an already boxed state.
    pub fn add_boxed_state(&mut self, state: Box<dyn State<C>>) -> Result<&mut Self, FsmError> {
        let name = state.name().to_string();
        self.registry.insert(state)?;
        debug!(state = %name, "state added");
        Ok(self)
    }

    /// Remove a state together with every transition leaving or entering
    /// it and every action bound to it. Returns `false` if it was absent.
    ///
    /// Neither the current state nor the initial state name is repaired.
    /// A removed current state stays current until the machine moves on,
    /// and a removed initial state makes the next `reset` fail.
    pub fn remove_state(&mut self, name: &str) -> bool {
        if !self.registry.contains(name) {
            return false;
        }
        let outgoing = self.graph.remove_from_source(name);
        let incoming = self.graph.remove_to_destination(name);
        let actions = self.actions.remove_at(name);
        self.registry.remove(name);
        debug!(
            state = %name,
            outgoing,
            incoming,
            actions,
            "state removed"
        );
        true
    }

    /// Look up a registered state by name.
    pub fn get_state(&self, name: &str) -> Option<&dyn State<C>> {
        self.registry.get(name)
    }

    /// Check whether a state with this name is registered.
    pub fn contains_state(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    /// Registered state names in insertion order.
    pub fn state_names(&self) -> impl Iterator<Item = &str> {
        self.registry.names()
    }

    /// Number of registered states.
    pub fn state_count(&self) -> usize {
        self.registry.len()
    }

    /// Choose the state the next `reset` moves to.
    ///
    /// The name is not validated here; an unknown name makes the next
    /// `reset` fail with [`FsmError::StateNotFound`].
    pub fn set_initial_state(&mut self, name: impl Into<String>) -> &mut Self {
        self.registry.set_initial(name.into());
        self
    }

    /// Name of the state `reset` moves to, if one is designated.
    pub fn initial_state(&self) -> Option<&str> {
        self.registry.initial()
    }

    /// The current state, resetting the machine first if it has none yet.
    pub fn current_state(&mut self) -> Result<&dyn State<C>, FsmError> {
        if self.registry.current().is_none() {
            self.reset()?;
        }
        self.registry.current().ok_or(FsmError::Uninitialized)
    }

    /// Name of the current state without triggering the lazy reset.
    pub fn current_state_name(&self) -> Option<&str> {
        self.registry.current_name()
    }

    /// Register a transition. Among transitions sharing a source, insertion
    /// order is evaluation priority.
    pub fn add_transition<T>(&mut self, transition: T) -> TransitionId
    where
        T: Transition<C> + 'static,
    {
        self.add_boxed_transition(Box::new(transition))
    }

    /// Register an already boxed transition.
    pub fn add_boxed_transition(&mut self, transition: Box<dyn Transition<C>>) -> TransitionId {
        let source = transition.source().to_string();
        let destination = transition.destination().to_string();
        let id = self.graph.insert(transition);
        debug!(%id, %source, %destination, "transition added");
        id
    }

    /// Remove a transition from both indices, handing it back to the caller.
    ///
    /// Identity is the id, not the endpoints: two transitions added
    /// separately with the same source and destination are distinct edges,
    /// and removing one leaves the other in place.
    pub fn remove_transition(&mut self, id: TransitionId) -> Option<Box<dyn Transition<C>>> {
        let removed = self.graph.remove(id);
        if removed.is_some() {
            debug!(%id, "transition removed");
        }
        removed
    }

    /// Remove every transition leaving `name`. Returns how many were removed.
    pub fn remove_transitions_from_source(&mut self, name: &str) -> usize {
        self.graph.remove_from_source(name)
    }

    /// Remove every transition entering `name`. Returns how many were removed.
    pub fn remove_transitions_to_destination(&mut self, name: &str) -> usize {
        self.graph.remove_to_destination(name)
    }

    /// Transitions leaving `name`, in evaluation order.
    pub fn transitions_from_source(&self, name: &str) -> &[TransitionId] {
        self.graph.from_source(name)
    }

    /// Transitions entering `name`, in insertion order.
    pub fn transitions_to_destination(&self, name: &str) -> &[TransitionId] {
        self.graph.to_destination(name)
    }

    /// Look up a transition by the id `add_transition` returned.
    pub fn transition(&self, id: TransitionId) -> Option<&dyn Transition<C>> {
        self.graph.get(id)
    }

    /// Number of registered transitions.
    pub fn transition_count(&self) -> usize {
        self.graph.len()
    }

    /// Bind an action to a state. The state does not need to exist yet.
    pub fn add_action<A>(&mut self, state: &str, action: A) -> &mut Self
    where
        A: Action<C> + 'static,
    {
        self.add_boxed_action(state, Box::new(action))
    }

    /// Bind an already boxed action to a state.
    pub fn add_boxed_action(&mut self, state: &str, action: Box<dyn Action<C>>) -> &mut Self {
        let mode = action.run_mode();
        self.actions.add(state, action);
        debug!(%state, ?mode, "action added");
        self
    }

    /// Remove both action lists of a state. Returns how many were removed.
    pub fn remove_actions_at(&mut self, state: &str) -> usize {
        self.actions.remove_at(state)
    }

    /// Number of actions bound to a state for the given hook.
    pub fn actions_at(&self, state: &str, mode: RunMode) -> usize {
        self.actions.count(state, mode)
    }

    /// Flags read by flag-guarded transitions.
    pub fn flags(&self) -> &Flags {
        &self.flags
    }

    /// Mutable access to the flags, for toggling them between updates.
    pub fn flags_mut(&mut self) -> &mut Flags {
        &mut self.flags
    }

    /// Evaluate the transitions leaving the current state and follow the
    /// first one whose guard accepts.
    ///
    /// Returns `Ok(false)` without moving when none accepts. When one does,
    /// returns the outcome of the destination's activation, which may be
    /// `false` even though the machine has already moved.
    pub fn update(&mut self, context: &C) -> Result<bool, FsmError> {
        let current = self.current_state()?.name().to_string();
        let candidates = self.graph.from_source(&current).to_vec();

        for id in candidates {
            let Some(transition) = self.graph.get_mut(id) else {
                continue;
            };
            let input = GuardInput {
                source: self.registry.get(transition.source()),
                destination: self.registry.get(transition.destination()),
                context,
                flags: &self.flags,
            };
            if input.destination.is_none() {
                warn!(
                    %id,
                    destination = %transition.destination(),
                    "transition targets an unregistered state"
                );
            }

            let accepted = transition.can_apply(&input)?;
            trace!(%id, state = %current, accepted, "guard evaluated");
            if accepted {
                let destination = transition.destination().to_string();
                return self.move_to(&destination, Some(context));
            }
        }
        Ok(false)
    }

    /// Move to the initial state, then clear the memory of every resettable
    /// state and transition.
    ///
    /// Returns the outcome of the initial state's activation.
    pub fn reset(&mut self) -> Result<bool, FsmError> {
        let initial = match self.registry.initial() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => return Err(FsmError::Uninitialized),
        };

        let activated = self.move_to(&initial, None)?;
        self.registry.reset_states();
        self.graph.reset_transitions();
        debug!(state = %initial, activated, "machine reset");
        Ok(activated)
    }

    /// Point-in-time description of the machine.
    pub fn snapshot(&self) -> MachineSnapshot {
        MachineSnapshot {
            states: self.registry.names().map(str::to_string).collect(),
            initial: self.registry.initial().map(str::to_string),
            current: self.registry.current_name().map(str::to_string),
            transitions: self
                .graph
                .ids()
                .iter()
                .filter_map(|id| {
                    self.graph.get(*id).map(|t| TransitionSnapshot {
                        id: *id,
                        source: t.source().to_string(),
                        destination: t.destination().to_string(),
                    })
                })
                .collect(),
            flags: self.flags.clone(),
        }
    }

    /// Step shared by `update` and `reset`.
    ///
    /// Moving to the state that is already current runs no hooks and
    /// succeeds. Otherwise the outgoing state resigns (its rejection is
    /// logged and ignored), the pointer moves, and the incoming state's
    /// activation decides the result.
    fn move_to(&mut self, target: &str, context: Option<&C>) -> Result<bool, FsmError> {
        if !self.registry.contains(target) {
            return Err(FsmError::StateNotFound {
                name: target.to_string(),
            });
        }
        if self.registry.current_name() == Some(target) {
            return Ok(true);
        }

        if self.registry.current().is_some() && !self.resign_current(context)? {
            warn!(
                from = self.registry.current_name().unwrap_or_default(),
                to = %target,
                "resignation rejected, moving anyway"
            );
        }

        let previous = self.registry.activate(target);
        debug!(
            from = previous.as_deref().unwrap_or_default(),
            to = %target,
            "state changed"
        );
        self.activate_current(context)
    }

    fn resign_current(&mut self, context: Option<&C>) -> Result<bool, FsmError> {
        let Some(state) = self.registry.current_mut() else {
            return Ok(false);
        };
        if let Some(lifecycle) = state.as_lifecycle_mut() {
            if !lifecycle.will_resign_active(context)? {
                return Ok(false);
            }
        }
        Ok(self
            .actions
            .run(state.name(), RunMode::OnResignActive, context)?)
    }

    fn activate_current(&mut self, context: Option<&C>) -> Result<bool, FsmError> {
        let Some(state) = self.registry.current_mut() else {
            return Ok(false);
        };
        if let Some(lifecycle) = state.as_lifecycle_mut() {
            if !lifecycle.did_become_active(context)? {
                return Ok(false);
            }
        }
        Ok(self
            .actions
            .run(state.name(), RunMode::OnBecomeActive, context)?)
    }
}

impl<C> Default for StateMachine<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        AlwaysTransition, CallbackAction, LoopTransition, NamedState, OnceTransition, Reset,
        StateLifecycle,
    };
    use crate::error::CallbackError;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    #[derive(Debug)]
    struct Picky {
        name: &'static str,
        accept_entry: bool,
        accept_exit: bool,
        log: Log,
    }

    impl StateLifecycle<u32> for Picky {
        fn did_become_active(&mut self, _context: Option<&u32>) -> Result<bool, CallbackError> {
            self.log.borrow_mut().push(format!("enter {}", self.name));
            Ok(self.accept_entry)
        }

        fn will_resign_active(&mut self, _context: Option<&u32>) -> Result<bool, CallbackError> {
            self.log.borrow_mut().push(format!("leave {}", self.name));
            Ok(self.accept_exit)
        }
    }

    impl State<u32> for Picky {
        fn name(&self) -> &str {
            self.name
        }

        fn as_lifecycle_mut(&mut self) -> Option<&mut dyn StateLifecycle<u32>> {
            Some(self)
        }
    }

    #[derive(Debug)]
    struct Resettable {
        resets: Rc<RefCell<u32>>,
    }

    impl Reset for Resettable {
        fn reset(&mut self) {
            *self.resets.borrow_mut() += 1;
        }
    }

    impl State<u32> for Resettable {
        fn name(&self) -> &str {
            "idle"
        }

        fn as_reset_mut(&mut self) -> Option<&mut dyn Reset> {
            Some(self)
        }
    }

    fn picky(name: &'static str, accept_entry: bool, accept_exit: bool, log: &Log) -> Picky {
        Picky {
            name,
            accept_entry,
            accept_exit,
            log: Rc::clone(log),
        }
    }

    #[test]
    fn reset_without_states_is_uninitialized() {
        let mut machine = StateMachine::<u32>::new();
        assert!(matches!(machine.reset(), Err(FsmError::Uninitialized)));
        assert!(matches!(machine.update(&0), Err(FsmError::Uninitialized)));
    }

    #[test]
    fn unknown_initial_state_is_not_found() {
        let mut machine = StateMachine::<u32>::new();
        machine.set_initial_state("draft");

        let err = machine.update(&0).unwrap_err();
        assert!(matches!(err, FsmError::StateNotFound { ref name } if name == "draft"));
    }

    #[test]
    fn current_state_is_established_lazily() {
        let mut machine = StateMachine::<u32>::new();
        machine.add_state(NamedState::new("draft")).unwrap();
        machine.add_state(NamedState::new("prepared")).unwrap();

        assert_eq!(machine.current_state_name(), None);
        assert_eq!(machine.current_state().unwrap().name(), "draft");
        assert_eq!(machine.current_state_name(), Some("draft"));
    }

    #[test]
    fn rejected_activation_still_moves() {
        let log = Log::default();
        let mut machine = StateMachine::<u32>::new();
        machine.add_state(picky("idle", true, true, &log)).unwrap();
        machine.add_state(picky("busy", false, true, &log)).unwrap();
        machine.add_transition(AlwaysTransition::new("idle", "busy"));
        machine.add_action(
            "busy",
            CallbackAction::on_become_active({
                let log = Rc::clone(&log);
                move |_| {
                    log.borrow_mut().push("busy action".to_string());
                    Ok(true)
                }
            }),
        );

        assert!(!machine.update(&1).unwrap());
        assert_eq!(machine.current_state_name(), Some("busy"));
        assert_eq!(*log.borrow(), ["enter idle", "leave idle", "enter busy"]);
    }

    #[test]
    fn rejected_resignation_does_not_block() {
        let log = Log::default();
        let mut machine = StateMachine::<u32>::new();
        machine.add_state(picky("idle", true, false, &log)).unwrap();
        machine.add_state(picky("busy", true, true, &log)).unwrap();
        machine.add_transition(AlwaysTransition::new("idle", "busy"));
        machine.add_action(
            "idle",
            CallbackAction::on_resign_active({
                let log = Rc::clone(&log);
                move |_| {
                    log.borrow_mut().push("idle exit action".to_string());
                    Ok(true)
                }
            }),
        );

        assert!(machine.update(&1).unwrap());
        assert_eq!(machine.current_state_name(), Some("busy"));
        assert_eq!(*log.borrow(), ["enter idle", "leave idle", "enter busy"]);
    }

    #[test]
    fn loop_transition_runs_no_hooks() {
        let log = Log::default();
        let mut machine = StateMachine::<u32>::new();
        machine.add_state(picky("idle", true, true, &log)).unwrap();
        machine.add_transition(LoopTransition::new("idle"));

        for _ in 0..4 {
            assert!(machine.update(&0).unwrap());
        }
        assert_eq!(machine.current_state().unwrap().name(), "idle");
        assert_eq!(*log.borrow(), ["enter idle"]);
    }

    #[test]
    fn reset_reaches_states_and_transitions() {
        let resets = Rc::new(RefCell::new(0));
        let mut machine = StateMachine::<u32>::new();
        machine
            .add_state(Resettable {
                resets: Rc::clone(&resets),
            })
            .unwrap();
        let once = machine.add_transition(OnceTransition::new("idle", "idle"));

        assert!(machine.reset().unwrap());
        assert_eq!(*resets.borrow(), 1);

        assert!(machine.update(&0).unwrap());
        assert!(!machine.update(&0).unwrap());

        machine.reset().unwrap();
        assert_eq!(*resets.borrow(), 2);
        assert!(machine.update(&0).unwrap());
        assert!(machine.transition(once).is_some());
    }

    #[test]
    fn transition_to_unregistered_state_fails() {
        let mut machine = StateMachine::<u32>::new();
        machine.add_state(NamedState::new("draft")).unwrap();
        machine.add_transition(AlwaysTransition::new("draft", "ghost"));

        let err = machine.update(&0).unwrap_err();
        assert!(matches!(err, FsmError::StateNotFound { ref name } if name == "ghost"));
        assert_eq!(machine.current_state_name(), Some("draft"));
    }

    #[test]
    fn removed_current_state_stays_current() {
        let log = Log::default();
        let mut machine = StateMachine::<u32>::new();
        machine.add_state(picky("idle", true, true, &log)).unwrap();
        machine.add_state(NamedState::new("busy")).unwrap();
        machine.add_transition(AlwaysTransition::new("idle", "busy"));
        machine.current_state().unwrap();

        assert!(machine.remove_state("idle"));
        assert!(!machine.remove_state("idle"));
        assert_eq!(machine.current_state().unwrap().name(), "idle");
        assert!(machine.transitions_from_source("idle").is_empty());
        assert!(!machine.update(&0).unwrap());

        let err = machine.reset().unwrap_err();
        assert!(matches!(err, FsmError::StateNotFound { ref name } if name == "idle"));

        machine.set_initial_state("busy");
        assert!(machine.reset().unwrap());
        assert_eq!(machine.current_state().unwrap().name(), "busy");
        assert_eq!(*log.borrow(), ["enter idle", "leave idle"]);
    }

    #[test]
    fn snapshot_lists_structure() {
        let mut machine = StateMachine::<u32>::new();
        machine.add_state(NamedState::new("draft")).unwrap();
        machine.add_state(NamedState::new("prepared")).unwrap();
        let id = machine.add_transition(AlwaysTransition::new("draft", "prepared"));
        machine.flags_mut().set("armed", true);
        machine.current_state().unwrap();

        let snapshot = machine.snapshot();
        assert_eq!(snapshot.states, ["draft", "prepared"]);
        assert_eq!(snapshot.initial.as_deref(), Some("draft"));
        assert_eq!(snapshot.current.as_deref(), Some("draft"));
        assert_eq!(
            snapshot.transitions,
            [TransitionSnapshot {
                id,
                source: "draft".to_string(),
                destination: "prepared".to_string(),
            }]
        );
        assert!(snapshot.flags.is_set("armed"));
    }
}
