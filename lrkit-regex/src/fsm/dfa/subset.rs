use super::model::{Dfa, State};
use crate::{fsm::StateId, Nfa};

use std::collections::{BTreeMap, BTreeSet, VecDeque};

impl From<&Nfa> for Dfa {
    /// Subset construction. DFA states are numbered in discovery order, starting with the epsilon
    /// closure of the NFA start state. Empty subsets are never materialized.
    fn from(nfa: &Nfa) -> Self {
        let alphabet = nfa.alphabet();

        let start = nfa.eps_closure([nfa.start_state()]);
        let mut state_ids = BTreeMap::from([(start.clone(), 0)]);
        let mut states = vec![State::new(0, start.clone(), contains_final(nfa, &start))];
        let mut pending = VecDeque::from([0]);

        while let Some(state_id) = pending.pop_front() {
            for c in alphabet.iter().copied() {
                let target = nfa.eps_closure(nfa.move_on(&states[state_id].nfa_states, c));
                if target.is_empty() {
                    continue;
                }

                let dest: StateId = match state_ids.get(&target) {
                    Some(dest) => *dest,
                    None => {
                        let dest = states.len();
                        let fin = contains_final(nfa, &target);
                        state_ids.insert(target.clone(), dest);
                        states.push(State::new(dest, target, fin));
                        pending.push_back(dest);
                        dest
                    }
                };

                states[state_id].transitions.insert(c, dest);
            }
        }

        log::debug!(
            "subset construction produced {} DFA states from {} NFA states",
            states.len(),
            nfa.len()
        );

        Self { states, alphabet }
    }
}

fn contains_final(nfa: &Nfa, states: &BTreeSet<StateId>) -> bool {
    states.iter().any(|id| nfa.is_final(*id))
}
