use super::Nfa;
use crate::fsm::{Simulatable, Simulate, StateId};

use std::collections::BTreeSet;

/// Simulates an [`Nfa`] by tracking the set of all states it can be in.
pub struct NfaSimulator<'a> {
    nfa: &'a Nfa,
    current: BTreeSet<StateId>,
}

impl Simulatable for Nfa {
    type Simulator<'a> = NfaSimulator<'a>;

    fn to_simulator(&self) -> Self::Simulator<'_> {
        NfaSimulator {
            nfa: self,
            current: self.eps_closure([self.start_state()]),
        }
    }
}

impl Simulate for NfaSimulator<'_> {
    fn is_accepting(&self) -> bool {
        self.current.iter().any(|id| self.nfa.is_final(*id))
    }

    fn feed(&mut self, input: char) -> bool {
        self.current = self.nfa.eps_closure(self.nfa.move_on(&self.current, input));
        !self.current.is_empty()
    }
}
