//! Enter/exit transitions
//!
//! Keeps the overlap set of the current and the previous evaluation and
//! diffs them. Sets are ordered vectors so that event order is deterministic.

use std::collections::HashSet;

use crate::scene::Entity;

/// Entities that started and stopped overlapping in one evaluation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transition {
    /// `current - previous`, in current order
    pub entered: Vec<Entity>,
    /// `previous - current`, in previous order
    pub exited: Vec<Entity>,
}

impl Transition {
    /// True if nothing entered or exited
    pub fn is_empty(&self) -> bool {
        self.entered.is_empty() && self.exited.is_empty()
    }
}

/// Diff two overlap sets
pub fn diff_transitions(previous: &[Entity], current: &[Entity]) -> Transition {
    let previous_set: HashSet<Entity> = previous.iter().copied().collect();
    let current_set: HashSet<Entity> = current.iter().copied().collect();

    Transition {
        entered: current
            .iter()
            .copied()
            .filter(|e| !previous_set.contains(e))
            .collect(),
        exited: previous
            .iter()
            .copied()
            .filter(|e| !current_set.contains(e))
            .collect(),
    }
}

/// Overlap sets of the current and the previous evaluation
#[derive(Debug, Clone, Default)]
pub struct OverlapState {
    current: Vec<Entity>,
    previous: Vec<Entity>,
}

impl OverlapState {
    /// Create an empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Start an evaluation: current becomes previous, current is emptied
    pub fn begin_evaluation(&mut self) {
        std::mem::swap(&mut self.current, &mut self.previous);
        self.current.clear();
    }

    /// Store the overlap set of the running evaluation
    pub fn set_current(&mut self, current: Vec<Entity>) {
        self.current = current;
    }

    /// Diff previous against current
    pub fn transition(&self) -> Transition {
        diff_transitions(&self.previous, &self.current)
    }

    /// Overlap set of the latest evaluation
    pub fn current(&self) -> &[Entity] {
        &self.current
    }

    /// Overlap set of the evaluation before that
    pub fn previous(&self) -> &[Entity] {
        &self.previous
    }

    /// Whether `entity` overlapped in the latest evaluation
    pub fn is_overlapping(&self, entity: Entity) -> bool {
        self.current.contains(&entity)
    }

    /// Forget both sets
    pub fn clear(&mut self) {
        self.current.clear();
        self.previous.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn entities(n: usize) -> Vec<Entity> {
        let mut keys: SlotMap<Entity, ()> = SlotMap::with_key();
        (0..n).map(|_| keys.insert(())).collect()
    }

    #[test]
    fn test_diff_preserves_source_order() {
        let e = entities(5);
        let previous = vec![e[4], e[0], e[2]];
        let current = vec![e[3], e[2], e[1]];

        let transition = diff_transitions(&previous, &current);
        assert_eq!(transition.exited, vec![e[4], e[0]]);
        assert_eq!(transition.entered, vec![e[3], e[1]]);
    }

    #[test]
    fn test_identical_sets_produce_no_transition() {
        let e = entities(3);
        assert!(diff_transitions(&e, &e).is_empty());
        assert!(diff_transitions(&[], &[]).is_empty());
    }

    #[test]
    fn test_state_rolls_current_into_previous() {
        let e = entities(3);
        let mut state = OverlapState::new();

        state.begin_evaluation();
        state.set_current(vec![e[0], e[1]]);
        assert_eq!(state.transition().entered, vec![e[0], e[1]]);

        state.begin_evaluation();
        assert_eq!(state.previous(), &[e[0], e[1]]);
        assert!(state.current().is_empty());
        state.set_current(vec![e[1], e[2]]);

        let transition = state.transition();
        assert_eq!(transition.exited, vec![e[0]]);
        assert_eq!(transition.entered, vec![e[2]]);
        assert!(state.is_overlapping(e[2]));
        assert!(!state.is_overlapping(e[0]));

        state.clear();
        assert!(state.current().is_empty() && state.previous().is_empty());
    }
}
