use super::item::ItemSet;
use crate::Symbol;

use std::collections::BTreeMap;

/// Represents a [state](https://en.wikipedia.org/wiki/LR_parser#Finite_state_machine)
/// in the [`Cfsm`] containing an [`ItemSet`] and transitions based on symbols
/// to other states.
///
/// [`Cfsm`]: super::Cfsm
#[derive(Debug, Clone)]
pub struct State {
    id: StateId,
    item_set: ItemSet,
    pub(super) transitions: BTreeMap<Symbol, StateId>,
}

pub type StateId = usize;

impl State {
    /// Constructs a new [`State`] with the given id and [`ItemSet`].
    pub(super) fn new(id: StateId, item_set: ItemSet) -> Self {
        Self {
            id,
            item_set,
            transitions: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> StateId {
        self.id
    }

    pub fn item_set(&self) -> &ItemSet {
        &self.item_set
    }

    /// Transitions to other [`State`]s, on variables (GOTO) and terminals (shift).
    pub fn transitions(&self) -> &BTreeMap<Symbol, StateId> {
        &self.transitions
    }

    /// Checks whether two [`State`]s have the same [`ItemSet`].
    ///
    /// This is needed because [`State`] implements [`PartialEq`] and [`Eq`]
    /// based on the id and not the contents of the [`State`].
    pub(super) fn has_item_set(&self, item_set: &ItemSet) -> bool {
        self.item_set == *item_set
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for State {}

/// Generator struct for the [`StateId`].
#[derive(Default)]
pub(super) struct StateIdGenerator {
    current: StateId,
}

impl StateIdGenerator {
    /// Returns the next [`StateId`] available.
    pub(super) fn next(&mut self) -> StateId {
        let result = self.current;
        self.current += 1;
        result
    }
}
