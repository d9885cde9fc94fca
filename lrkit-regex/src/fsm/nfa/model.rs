use crate::fsm::{format_state_set, StateId};

use std::{
    collections::{BTreeMap, BTreeSet, VecDeque},
    fmt::Display,
};

/// NFA finite-state machine.
#[derive(Debug, Clone, PartialEq)]
pub struct Nfa {
    pub(super) start_state: StateId,
    pub(super) states: Vec<State>,
}

/// A state in the NFA.
///
/// Note: The id of a state equals its index in [`Nfa::states`].
#[derive(Debug, Clone, PartialEq)]
pub(super) struct State {
    pub(super) id: StateId,
    /// Whether the state is final.
    pub(super) fin: bool,
    pub(super) transitions: Transitions,
}

// `BTreeMap` and `BTreeSet` keep iteration (and thus state numbering further down the pipeline)
// deterministic.
type Transitions = BTreeMap<Input, BTreeSet<StateId>>;

/// Input a transition of the NFA consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Input {
    Literal(char),
    /// Epsilon input, the transition can be made without consuming input.
    Eps,
}

impl Nfa {
    pub(super) fn builder() -> NfaBuilder {
        NfaBuilder::new()
    }

    pub fn start_state(&self) -> StateId {
        self.start_state
    }

    /// Returns the amount of states in the NFA.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Returns whether the state is final.
    ///
    /// # Panics
    ///
    /// When the [`StateId`] does not exist in the NFA.
    pub fn is_final(&self, state_id: StateId) -> bool {
        self.get_state(state_id).fin
    }

    pub fn final_states(&self) -> impl Iterator<Item = StateId> + '_ {
        self.states.iter().filter(|s| s.fin).map(|s| s.id)
    }

    /// Returns an iterator over all transitions as `(source, input, destination)` triples,
    /// ordered by source state.
    pub fn transitions(&self) -> impl Iterator<Item = (StateId, Input, StateId)> + '_ {
        self.states.iter().flat_map(|State { id, transitions, .. }| {
            transitions.iter().flat_map(move |(input, destinations)| {
                destinations.iter().map(move |dest| (*id, *input, *dest))
            })
        })
    }

    /// Returns every literal used by a transition of the NFA.
    pub fn alphabet(&self) -> BTreeSet<char> {
        self.states
            .iter()
            .flat_map(|s| s.transitions.keys())
            .filter_map(|input| match input {
                Input::Literal(c) => Some(*c),
                Input::Eps => None,
            })
            .collect()
    }

    /// Returns a read-only reference to the `State` in the NFA.
    ///
    /// # Panics
    ///
    /// When the [`StateId`] does not exist in the NFA.
    pub(super) fn get_state(&self, state_id: StateId) -> &State {
        self.states
            .get(state_id)
            .expect("requested state does not exist")
    }

    /// Returns the set of states reachable from the given states using only epsilon transitions,
    /// including the given states themselves.
    pub fn eps_closure(&self, states: impl IntoIterator<Item = StateId>) -> BTreeSet<StateId> {
        let mut result = BTreeSet::from_iter(states);
        let mut not_visited = VecDeque::from_iter(result.iter().copied());

        while let Some(state_id) = not_visited.pop_front() {
            let Some(destinations) = self.get_state(state_id).transitions.get(&Input::Eps) else {
                continue;
            };

            for state_id in destinations {
                if result.insert(*state_id) {
                    not_visited.push_back(*state_id)
                }
            }
        }

        result
    }

    /// Returns the states reachable from the given states by consuming `input`. Epsilon
    /// transitions are not followed.
    pub fn move_on(&self, states: &BTreeSet<StateId>, input: char) -> BTreeSet<StateId> {
        states
            .iter()
            .filter_map(|id| self.get_state(*id).transitions.get(&Input::Literal(input)))
            .flatten()
            .copied()
            .collect()
    }
}

impl State {
    fn with_id(id: StateId, fin: bool) -> Self {
        Self {
            id,
            fin,
            transitions: Transitions::new(),
        }
    }
}

/// Builder struct for the [`Nfa`].
pub(super) struct NfaBuilder {
    states: Vec<State>,
}

impl NfaBuilder {
    /// Creates a new [`NfaBuilder`] without any states.
    pub(super) fn new() -> Self {
        Self { states: Vec::new() }
    }

    /// Creates a new [`State`] for the NFA.
    pub(super) fn add_state(&mut self, fin: bool) -> StateId {
        let id = self.states.len();
        self.states.push(State::with_id(id, fin));
        id
    }

    /// Creates a transition between two states using their [`StateId`]s.
    ///
    /// # Panics
    ///
    /// When `start` is an invalid [`StateId`].
    pub(super) fn add_transition(&mut self, start: StateId, end: StateId, input: Input) {
        self.get_state_mut(start)
            .transitions
            .entry(input)
            .or_default()
            .insert(end);
    }

    /// # Panics
    ///
    /// When `state_id` is an invalid [`StateId`].
    pub(super) fn set_final(&mut self, state_id: StateId, fin: bool) {
        self.get_state_mut(state_id).fin = fin;
    }

    fn get_state_mut(&mut self, state_id: StateId) -> &mut State {
        self.states
            .get_mut(state_id)
            .expect("requested state does not exist")
    }

    /// Builds the [`Nfa`], checks whether all transitions are valid and whether the start state
    /// exists.
    pub(super) fn build(self, start_state: StateId) -> Nfa {
        let state_count = self.states.len();

        if self
            .states
            .iter()
            .flat_map(|s| s.transitions.values().flatten())
            .any(|dest| *dest >= state_count)
        {
            panic!("one or more destination states found that do not exist");
        }

        if start_state >= state_count {
            panic!("start state is not a valid state");
        }

        Nfa {
            start_state,
            states: self.states,
        }
    }
}

impl Display for Input {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Input::Literal(c) => write!(f, "{c}"),
            Input::Eps => write!(f, "ε"),
        }
    }
}

impl Display for Nfa {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "NFA States: {}", self.len())?;
        writeln!(f, "Initial State: {}", self.start_state)?;
        writeln!(f, "Accept States: {}", format_state_set(self.final_states()))?;
        writeln!(f, "Transitions: {} total", self.transitions().count())?;
        for (from, input, to) in self.transitions() {
            writeln!(f, "  δ({from}, {input}) = {to}")?;
        }

        Ok(())
    }
}
