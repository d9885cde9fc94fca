use crate::fsm::{format_state_set, StateId};

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt::Display,
};

/// DFA finite-state machine, built from an [`Nfa`](crate::Nfa) by subset construction.
///
/// The start state is always state `0`.
#[derive(Debug, Clone)]
pub struct Dfa {
    pub(super) states: Vec<State>,
    pub(super) alphabet: BTreeSet<char>,
}

#[derive(Debug, Clone)]
pub(super) struct State {
    pub(super) id: StateId,
    /// The set of NFA states this state represents.
    pub(super) nfa_states: BTreeSet<StateId>,
    pub(super) fin: bool,
    /// At most one destination per symbol. A missing entry is an implicit dead state.
    pub(super) transitions: BTreeMap<char, StateId>,
}

impl State {
    pub(super) fn new(id: StateId, nfa_states: BTreeSet<StateId>, fin: bool) -> Self {
        Self {
            id,
            nfa_states,
            fin,
            transitions: BTreeMap::new(),
        }
    }
}

impl Dfa {
    pub fn start_state(&self) -> StateId {
        0
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn alphabet(&self) -> &BTreeSet<char> {
        &self.alphabet
    }

    /// # Panics
    ///
    /// When the [`StateId`] does not exist in the DFA.
    pub fn is_final(&self, state_id: StateId) -> bool {
        self.get_state(state_id).fin
    }

    pub fn final_states(&self) -> impl Iterator<Item = StateId> + '_ {
        self.states.iter().filter(|s| s.fin).map(|s| s.id)
    }

    /// Returns the NFA states the DFA state was constructed from.
    ///
    /// # Panics
    ///
    /// When the [`StateId`] does not exist in the DFA.
    pub fn nfa_states(&self, state_id: StateId) -> &BTreeSet<StateId> {
        &self.get_state(state_id).nfa_states
    }

    /// Returns the destination of the transition on `input`, if there is one.
    ///
    /// # Panics
    ///
    /// When the [`StateId`] does not exist in the DFA.
    pub fn next(&self, state_id: StateId, input: char) -> Option<StateId> {
        self.get_state(state_id).transitions.get(&input).copied()
    }

    /// Returns an iterator over all transitions as `(source, symbol, destination)` triples.
    pub fn transitions(&self) -> impl Iterator<Item = (StateId, char, StateId)> + '_ {
        self.states.iter().flat_map(|State { id, transitions, .. }| {
            transitions.iter().map(move |(c, dest)| (*id, *c, *dest))
        })
    }

    fn get_state(&self, state_id: StateId) -> &State {
        self.states
            .get(state_id)
            .expect("requested state does not exist")
    }
}

impl Display for Dfa {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "DFA States: {}", self.len())?;
        writeln!(f, "Initial State: {}", self.start_state())?;
        writeln!(f, "Accept States: {}", format_state_set(self.final_states()))?;
        writeln!(f, "NFA Subsets:")?;
        for State { id, nfa_states, .. } in self.states.iter() {
            writeln!(f, "  {id} = {}", format_state_set(nfa_states.iter().copied()))?;
        }
        writeln!(f, "Transitions: {} total", self.transitions().count())?;
        for (from, c, to) in self.transitions() {
            writeln!(f, "  δ({from}, {c}) = {to}")?;
        }

        Ok(())
    }
}
