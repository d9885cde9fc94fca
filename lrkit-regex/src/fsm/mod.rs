pub use traits::{Simulatable, Simulate};

pub(crate) mod dfa;
pub(crate) mod nfa;
mod traits;

/// Index of a state inside its automaton.
pub type StateId = usize;

/// Formats a set of states as `{0, 1, 2}`.
pub(crate) fn format_state_set(states: impl IntoIterator<Item = StateId>) -> String {
    let states = states
        .into_iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ");

    format!("{{{states}}}")
}
