use crate::{
    cfsm::{Cfsm, StateId},
    FollowSets, Grammar, Symbol, Terminal,
};

use std::{
    collections::{btree_map::Entry, BTreeMap},
    fmt::Display,
};

/// ACTION and GOTO tables, one row per [`Cfsm`] state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTable {
    action: Vec<BTreeMap<Terminal, Action>>,
    goto: Vec<BTreeMap<String, StateId>>,
    /// Column headers: the terminals followed by [`Terminal::Eof`].
    terminals: Vec<Terminal>,
    /// Column headers: every variable except the augmented start variable.
    variables: Vec<String>,
}

/// Entry of the ACTION table. An empty cell is the absence of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Shift(StateId),
    /// Reduce by the production with this index.
    Reduce(usize),
    Accept,
}

/// Decides on which lookaheads a completed item reduces.
pub(crate) trait ReducePolicy {
    fn lookaheads(&self, grammar: &Grammar, head: &str) -> Vec<Terminal>;
}

/// LR(0): reduce on every lookahead.
pub(crate) struct Lr0;

/// SLR(1): reduce only on the lookaheads in the FOLLOW set of the head.
pub(crate) struct Slr1<'a> {
    pub(crate) follow: &'a FollowSets,
}

impl ReducePolicy for Lr0 {
    fn lookaheads(&self, grammar: &Grammar, _head: &str) -> Vec<Terminal> {
        grammar.iter_lookaheads().collect()
    }
}

impl ReducePolicy for Slr1<'_> {
    fn lookaheads(&self, _grammar: &Grammar, head: &str) -> Vec<Terminal> {
        self.follow
            .get(head)
            .map(|follow| follow.iter().cloned().collect())
            .unwrap_or_default()
    }
}

impl ParseTable {
    /// Fills the tables from the items of every state:
    ///
    /// - `A -> x • t y`: shift `t` to the transition target,
    /// - `A -> x • B y`: GOTO on `B` to the transition target,
    /// - `S' -> S •`: accept on end of input,
    /// - `A -> w •`: reduce on the lookaheads chosen by the policy.
    ///
    /// Shift and accept always take the cell. A reduce only takes an empty cell, so when
    /// several complete items compete the lowest production index wins.
    pub(crate) fn new(grammar: &Grammar, cfsm: &Cfsm, policy: &dyn ReducePolicy) -> Self {
        let mut table = Self {
            action: vec![BTreeMap::new(); cfsm.len()],
            goto: vec![BTreeMap::new(); cfsm.len()],
            terminals: grammar.iter_lookaheads().collect(),
            variables: grammar
                .variables()
                .iter()
                .filter(|v| *v != grammar.augmented_start_variable())
                .cloned()
                .collect(),
        };

        for state in cfsm.states() {
            let state_id = state.id();

            for item in state.item_set().iter() {
                let production = grammar.production(item.production());

                match item.cursor_symbol(grammar) {
                    Some(s @ Symbol::Terminal(t)) => {
                        // body of the form `A -> x •t y`
                        let dest_state = *state
                            .transitions()
                            .get(s)
                            .expect("no transition found for symbol");
                        table.insert_action(
                            state_id,
                            Terminal::T(t.clone()),
                            Action::Shift(dest_state),
                        );
                    }
                    Some(s @ Symbol::Variable(v)) => {
                        // body of the form `A -> x •B y`
                        let dest_state = *state
                            .transitions()
                            .get(s)
                            .expect("no transition found for symbol");
                        table.insert_goto(state_id, v, dest_state);
                    }
                    None if production.head() == grammar.augmented_start_variable() => {
                        table.insert_action(state_id, Terminal::Eof, Action::Accept);
                    }
                    None => {
                        // body of the form `A -> w •`
                        for lookahead in policy.lookaheads(grammar, production.head()) {
                            table.insert_action(
                                state_id,
                                lookahead,
                                Action::Reduce(production.index()),
                            );
                        }
                    }
                    Some(Symbol::Epsilon) => {
                        unreachable!("cursor should not be able to read epsilon")
                    }
                }
            }
        }

        table
    }

    fn insert_action(&mut self, state: StateId, terminal: Terminal, action: Action) {
        let row = self
            .action
            .get_mut(state)
            .expect("table has a row for every state");

        match (row.entry(terminal), action) {
            (Entry::Vacant(entry), _) => {
                entry.insert(action);
            }
            (Entry::Occupied(entry), Action::Reduce(_)) => {
                if *entry.get() != action {
                    log::debug!(
                        "state {state}: dropping {action} on `{}`, cell already holds {}",
                        entry.key(),
                        entry.get()
                    );
                }
            }
            (Entry::Occupied(mut entry), _) => {
                if *entry.get() != action {
                    log::debug!(
                        "state {state}: {action} on `{}` replaces {}",
                        entry.key(),
                        entry.get()
                    );
                }
                entry.insert(action);
            }
        }
    }

    fn insert_goto(&mut self, state: StateId, variable: &str, new_state: StateId) {
        let old_dest_state = self
            .goto
            .get_mut(state)
            .expect("table has a row for every state")
            .insert(variable.to_string(), new_state);

        #[cfg(debug_assertions)]
        {
            if let Some(old_dest_state) = old_dest_state {
                assert!(
                    old_dest_state == new_state,
                    "goto conflict should not be possible"
                );
            }
        }
    }

    /// Returns the ACTION entry, `None` for an empty cell.
    pub fn action(&self, state: StateId, terminal: &Terminal) -> Option<Action> {
        self.action.get(state)?.get(terminal).copied()
    }

    /// Returns the GOTO entry, `None` for an empty cell.
    pub fn goto(&self, state: StateId, variable: &str) -> Option<StateId> {
        self.goto.get(state)?.get(variable).copied()
    }

    /// Returns the non-empty ACTION cells of a state.
    pub fn actions(&self, state: StateId) -> Option<&BTreeMap<Terminal, Action>> {
        self.action.get(state)
    }

    /// Returns the non-empty GOTO cells of a state.
    pub fn gotos(&self, state: StateId) -> Option<&BTreeMap<String, StateId>> {
        self.goto.get(state)
    }

    /// Amount of rows (states).
    pub fn len(&self) -> usize {
        self.action.len()
    }

    pub fn is_empty(&self) -> bool {
        self.action.is_empty()
    }

    pub fn terminals(&self) -> &[Terminal] {
        &self.terminals
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// States with an accept action.
    pub fn accept_states(&self) -> impl Iterator<Item = StateId> + '_ {
        self.action
            .iter()
            .enumerate()
            .filter(|(_, row)| row.values().any(|a| *a == Action::Accept))
            .map(|(state, _)| state)
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Shift(state) => write!(f, "s{state}"),
            Action::Reduce(production) => write!(f, "r{production}"),
            Action::Accept => write!(f, "acc"),
        }
    }
}

impl Display for ParseTable {
    /// Renders the table as aligned text, ACTION columns first.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let header = std::iter::once(String::from("State"))
            .chain(self.terminals.iter().map(ToString::to_string))
            .chain(self.variables.iter().cloned())
            .collect::<Vec<_>>();

        let rows = (0..self.len()).map(|state| {
            std::iter::once(state.to_string())
                .chain(self.terminals.iter().map(|t| {
                    self.action(state, t)
                        .map(|a| a.to_string())
                        .unwrap_or_default()
                }))
                .chain(self.variables.iter().map(|v| {
                    self.goto(state, v)
                        .map(|s| s.to_string())
                        .unwrap_or_default()
                }))
                .collect::<Vec<_>>()
        });

        for row in std::iter::once(header).chain(rows) {
            let line = row
                .iter()
                .map(|cell| format!("{cell:<6}"))
                .collect::<String>();
            writeln!(f, "{}", line.trim_end())?;
        }

        Ok(())
    }
}
