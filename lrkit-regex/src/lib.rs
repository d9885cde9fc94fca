//! Compiles simple regular expressions (literals, `|`, `*`, grouping) into a Thompson NFA, a
//! subset-constructed DFA and a minimized DFA, and matches strings against the result.

pub use automata::RegexAutomata;
pub use error::RegexError;
pub use fsm::{
    dfa::{Dfa, MinimizedDfa},
    nfa::{Input, Nfa},
    Simulatable, Simulate, StateId,
};
pub use regex::{Postfix, PostfixToken};

mod automata;
mod error;
mod fsm;
mod regex;
