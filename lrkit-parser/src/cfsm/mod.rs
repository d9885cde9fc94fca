use self::state::StateIdGenerator;
use crate::Grammar;

use std::{collections::VecDeque, fmt::Display};

pub use self::{
    item::{Item, ItemSet},
    state::{State, StateId},
};

mod item;
mod state;

/// Characteristic finite-state machine: the canonical collection of LR(0) item sets, with the
/// transitions between them.
#[derive(Debug, Clone)]
pub struct Cfsm {
    start_state: StateId,
    /// States ordered by id, the id of a state equals its index.
    states: Vec<State>,
}

impl Cfsm {
    /// Builds the canonical collection, starting from the closure of `S' -> • S`.
    ///
    /// States are numbered in discovery order: pending states are processed first in first out,
    /// trying the variables and then the terminals in sorted order.
    pub fn from_grammar(grammar: &Grammar) -> Self {
        let mut state_id_generator = StateIdGenerator::default();

        let start_state = state_id_generator.next();
        let mut states = vec![State::new(start_state, ItemSet::start(grammar))];
        let mut pending_states = VecDeque::from([start_state]);

        while let Some(state_id) = pending_states.pop_front() {
            for symbol in grammar.iter_symbols() {
                let item_set = states[state_id].item_set().goto(grammar, &symbol);
                if item_set.is_empty() {
                    continue;
                }

                let dest_state = match states.iter().find(|s| s.has_item_set(&item_set)) {
                    Some(state) => state.id(),
                    None => {
                        let state = State::new(state_id_generator.next(), item_set);
                        let id = state.id();
                        states.push(state);
                        pending_states.push_back(id);
                        id
                    }
                };

                states[state_id].transitions.insert(symbol, dest_state);
            }
        }

        log::debug!("canonical collection has {} states", states.len());

        Self {
            start_state,
            states,
        }
    }

    pub fn start_state(&self) -> StateId {
        self.start_state
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// # Panics
    ///
    /// When the state does not exist.
    pub fn state(&self, id: StateId) -> &State {
        self.states.get(id).expect("requested state does not exist")
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Returns a value listing every state as `I<n>:` followed by its items.
    pub fn display<'a>(&'a self, grammar: &'a Grammar) -> impl Display + 'a {
        CfsmDisplay {
            cfsm: self,
            grammar,
        }
    }
}

struct CfsmDisplay<'a> {
    cfsm: &'a Cfsm,
    grammar: &'a Grammar,
}

impl Display for CfsmDisplay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for state in self.cfsm.states() {
            writeln!(f, "I{}:", state.id())?;
            for item in state.item_set().iter() {
                writeln!(f, "  {}", item.display(self.grammar))?;
            }
            for (symbol, dest) in state.transitions() {
                writeln!(f, "  on {symbol} -> I{dest}")?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Cfsm, ItemSet};
    use crate::{Grammar, Symbol};

    mod proptest;

    fn expression_grammar() -> Grammar {
        "E -> E + T | T\nT -> ( E ) | a".parse().unwrap()
    }

    #[test]
    fn canonical_collection() {
        let grammar = expression_grammar();
        let cfsm = Cfsm::from_grammar(&grammar);

        // I0, E' -> E •, E -> T •, T -> ( • E ), T -> a •, E -> E + • T, T -> ( E • ),
        // E -> E + T •, T -> ( E ) •
        assert_eq!(cfsm.len(), 9);
        assert_eq!(cfsm.start_state(), 0);
        assert_eq!(cfsm.state(0).item_set(), &ItemSet::start(&grammar));

        // variables are tried before terminals
        assert_eq!(
            cfsm.state(0).transitions().get(&Symbol::Variable("E".to_string())),
            Some(&1)
        );
        assert_eq!(
            cfsm.state(0).transitions().get(&Symbol::Variable("T".to_string())),
            Some(&2)
        );
    }

    #[test]
    fn states_pairwise_distinct() {
        let grammar = expression_grammar();
        let cfsm = Cfsm::from_grammar(&grammar);

        for (i, lhs) in cfsm.states().iter().enumerate() {
            assert_eq!(lhs.id(), i);
            for rhs in cfsm.states().iter().skip(i + 1) {
                assert_ne!(lhs.item_set(), rhs.item_set());
            }
        }
    }

    #[test]
    fn transitions_match_goto() {
        let grammar = expression_grammar();
        let cfsm = Cfsm::from_grammar(&grammar);

        for state in cfsm.states() {
            for (symbol, dest) in state.transitions() {
                assert_eq!(
                    &state.item_set().goto(&grammar, symbol),
                    cfsm.state(*dest).item_set()
                );
            }
        }
    }

    #[test]
    fn deterministic() {
        let grammar = expression_grammar();
        let lhs = Cfsm::from_grammar(&grammar);
        let rhs = Cfsm::from_grammar(&grammar);

        assert_eq!(
            lhs.display(&grammar).to_string(),
            rhs.display(&grammar).to_string()
        );
    }

    #[test]
    fn start_variable_named_s_is_expanded() {
        let grammar = "S -> a S | b".parse::<Grammar>().unwrap();
        let cfsm = Cfsm::from_grammar(&grammar);

        assert!(cfsm
            .state(0)
            .transitions()
            .contains_key(&Symbol::Variable("S".to_string())));
    }

    #[test]
    fn display() {
        let grammar = "S -> a".parse::<Grammar>().unwrap();
        let cfsm = Cfsm::from_grammar(&grammar);

        assert_eq!(
            cfsm.display(&grammar).to_string(),
            "I0:\n  S' -> • S\n  S -> • a\n  on a -> I2\n  on S -> I1\n\
             I1:\n  S' -> S •\n\
             I2:\n  S -> a •\n"
        );
    }
}
