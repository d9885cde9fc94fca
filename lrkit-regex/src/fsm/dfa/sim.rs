use super::{Dfa, MinimizedDfa};
use crate::fsm::{Simulatable, Simulate, StateId};

/// Simulates a [`Dfa`]. `None` is the implicit dead state.
pub struct DfaSimulator<'a> {
    dfa: &'a Dfa,
    current: Option<StateId>,
}

/// Simulates a [`MinimizedDfa`] over its blocks. `None` is the implicit dead state.
pub struct MinimizedDfaSimulator<'a> {
    dfa: &'a MinimizedDfa,
    current: Option<usize>,
}

impl Simulatable for Dfa {
    type Simulator<'a> = DfaSimulator<'a>;

    fn to_simulator(&self) -> Self::Simulator<'_> {
        DfaSimulator {
            dfa: self,
            current: (!self.is_empty()).then(|| self.start_state()),
        }
    }
}

impl Simulate for DfaSimulator<'_> {
    fn is_accepting(&self) -> bool {
        self.current.is_some_and(|id| self.dfa.is_final(id))
    }

    fn feed(&mut self, input: char) -> bool {
        self.current = self.current.and_then(|id| self.dfa.next(id, input));
        self.current.is_some()
    }
}

impl Simulatable for MinimizedDfa {
    type Simulator<'a> = MinimizedDfaSimulator<'a>;

    fn to_simulator(&self) -> Self::Simulator<'_> {
        MinimizedDfaSimulator {
            dfa: self,
            current: (!self.is_empty()).then(|| self.start_partition()),
        }
    }
}

impl Simulate for MinimizedDfaSimulator<'_> {
    fn is_accepting(&self) -> bool {
        self.current.is_some_and(|partition| self.dfa.is_accepting(partition))
    }

    fn feed(&mut self, input: char) -> bool {
        self.current = self
            .current
            .and_then(|partition| self.dfa.next(partition, input));
        self.current.is_some()
    }
}
