//! Transition arena with by-source and by-destination indices.

use crate::core::{Transition, TransitionId};
use std::collections::HashMap;

pub(crate) struct TransitionGraph<C> {
    arena: HashMap<TransitionId, Box<dyn Transition<C>>>,
    order: Vec<TransitionId>,
    by_source: HashMap<String, Vec<TransitionId>>,
    by_destination: HashMap<String, Vec<TransitionId>>,
}

fn unlink(index: &mut HashMap<String, Vec<TransitionId>>, name: &str, id: TransitionId) {
    if let Some(ids) = index.get_mut(name) {
        if let Some(pos) = ids.iter().position(|i| *i == id) {
            ids.remove(pos);
        }
        if ids.is_empty() {
            index.remove(name);
        }
    }
}

impl<C> TransitionGraph<C> {
    pub(crate) fn new() -> Self {
        Self {
            arena: HashMap::new(),
            order: Vec::new(),
            by_source: HashMap::new(),
            by_destination: HashMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, transition: Box<dyn Transition<C>>) -> TransitionId {
        let id = TransitionId::new();
        self.by_source
            .entry(transition.source().to_string())
            .or_default()
            .push(id);
        self.by_destination
            .entry(transition.destination().to_string())
            .or_default()
            .push(id);
        self.order.push(id);
        self.arena.insert(id, transition);
        id
    }

    pub(crate) fn remove(&mut self, id: TransitionId) -> Option<Box<dyn Transition<C>>> {
        let transition = self.arena.remove(&id)?;
        unlink(&mut self.by_source, transition.source(), id);
        unlink(&mut self.by_destination, transition.destination(), id);
        self.order.retain(|i| *i != id);
        Some(transition)
    }

    pub(crate) fn remove_from_source(&mut self, name: &str) -> usize {
        let ids = self.from_source(name).to_vec();
        ids.into_iter().filter_map(|id| self.remove(id)).count()
    }

    pub(crate) fn remove_to_destination(&mut self, name: &str) -> usize {
        let ids = self.to_destination(name).to_vec();
        ids.into_iter().filter_map(|id| self.remove(id)).count()
    }

    pub(crate) fn from_source(&self, name: &str) -> &[TransitionId] {
        self.by_source.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub(crate) fn to_destination(&self, name: &str) -> &[TransitionId] {
        self.by_destination.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub(crate) fn get(&self, id: TransitionId) -> Option<&dyn Transition<C>> {
        self.arena.get(&id).map(|t| t.as_ref())
    }

    pub(crate) fn get_mut(&mut self, id: TransitionId) -> Option<&mut dyn Transition<C>> {
        match self.arena.get_mut(&id) {
            Some(transition) => Some(transition.as_mut()),
            None => None,
        }
    }

    /// Ids of every transition in insertion order.
    pub(crate) fn ids(&self) -> &[TransitionId] {
        &self.order
    }

    pub(crate) fn len(&self) -> usize {
        self.arena.len()
    }

    pub(crate) fn reset_transitions(&mut self) {
        for id in &self.order {
            if let Some(resettable) = self.arena.get_mut(id).and_then(|t| t.as_reset_mut()) {
                resettable.reset();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AlwaysTransition, LoopTransition, OnceTransition};

    fn graph() -> (TransitionGraph<()>, [TransitionId; 3]) {
        let mut graph = TransitionGraph::new();
        let t1 = graph.insert(Box::new(AlwaysTransition::new("idle", "process")));
        let t2 = graph.insert(Box::new(AlwaysTransition::new("process", "finish")));
        let t3 = graph.insert(Box::new(AlwaysTransition::new("finish", "idle")));
        (graph, [t1, t2, t3])
    }

    #[test]
    fn indexes_by_source_and_destination() {
        let (graph, [t1, t2, t3]) = graph();

        assert_eq!(graph.from_source("idle"), [t1]);
        assert_eq!(graph.to_destination("idle"), [t3]);
        assert_eq!(graph.from_source("process"), [t2]);
        assert_eq!(graph.to_destination("process"), [t1]);
        assert_eq!(graph.from_source("finish"), [t3]);
        assert_eq!(graph.to_destination("finish"), [t2]);
        assert!(graph.from_source("missing").is_empty());
    }

    #[test]
    fn source_order_is_insertion_order() {
        let mut graph = TransitionGraph::<()>::new();
        let a = graph.insert(Box::new(AlwaysTransition::new("draft", "prepared")));
        let b = graph.insert(Box::new(LoopTransition::new("draft")));
        let c = graph.insert(Box::new(AlwaysTransition::new("draft", "withdrawn")));

        assert_eq!(graph.from_source("draft"), [a, b, c]);
        assert_eq!(graph.ids(), [a, b, c]);
    }

    #[test]
    fn remove_updates_both_indices() {
        let (mut graph, [t1, t2, t3]) = graph();

        let removed = graph.remove(t1).expect("t1 registered");
        assert_eq!(removed.source(), "idle");
        assert!(graph.from_source("idle").is_empty());
        assert!(graph.to_destination("process").is_empty());
        assert_eq!(graph.ids(), [t2, t3]);

        assert!(graph.remove(t1).is_none());
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn bulk_removal_by_endpoint() {
        let (mut graph, [_, t2, _]) = graph();

        assert_eq!(graph.remove_from_source("idle"), 1);
        assert_eq!(graph.remove_to_destination("idle"), 1);

        assert_eq!(graph.from_source("process"), [t2]);
        assert_eq!(graph.to_destination("finish"), [t2]);
        assert!(graph.from_source("finish").is_empty());
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn self_loop_removal_clears_both_indices() {
        let mut graph = TransitionGraph::<()>::new();
        graph.insert(Box::new(LoopTransition::new("idle")));

        assert_eq!(graph.remove_from_source("idle"), 1);
        assert_eq!(graph.remove_to_destination("idle"), 0);
        assert!(graph.to_destination("idle").is_empty());
    }

    #[test]
    fn reset_reaches_resettable_transitions() {
        let mut graph = TransitionGraph::<()>::new();
        let id = graph.insert(Box::new(OnceTransition::new("draft", "prepared")));
        let flags = crate::core::Flags::new();
        let input = crate::core::GuardInput {
            source: None,
            destination: None,
            context: &(),
            flags: &flags,
        };

        let once = graph.get_mut(id).unwrap();
        assert!(once.can_apply(&input).unwrap());
        assert!(!once.can_apply(&input).unwrap());

        graph.reset_transitions();
        assert!(graph.get_mut(id).unwrap().can_apply(&input).unwrap());
    }
}
