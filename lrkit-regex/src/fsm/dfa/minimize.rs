use super::Dfa;
use crate::fsm::{format_state_set, StateId};

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt::Display,
};

/// Minimized DFA, represented as a partition of the states of a [`Dfa`].
///
/// Each block of the partition is a state of the minimized DFA. Blocks are referred to by their
/// index.
#[derive(Debug, Clone)]
pub struct MinimizedDfa {
    partitions: Vec<BTreeSet<StateId>>,
    /// Index of the block every DFA state belongs to.
    partition_of: Vec<usize>,
    start_partition: usize,
    accepting: BTreeSet<usize>,
    /// `(source, symbol) -> destination`, at most one destination per key.
    transitions: BTreeMap<(usize, char), usize>,
}

impl From<&Dfa> for MinimizedDfa {
    /// Partition refinement starting from `[non-accepting, accepting]` (empty blocks omitted).
    /// A block is split when its members disagree on the destination block of a symbol, where a
    /// missing transition counts as its own destination. Refinement stops after a pass without
    /// splits.
    fn from(dfa: &Dfa) -> Self {
        let (accepting, rejecting): (BTreeSet<_>, BTreeSet<_>) =
            (0..dfa.len()).partition(|id| dfa.is_final(*id));

        let mut partitions = [rejecting, accepting]
            .into_iter()
            .filter(|block| !block.is_empty())
            .collect::<Vec<_>>();
        let mut partition_of = index_partitions(&partitions, dfa.len());

        loop {
            let mut changed = false;
            let mut refined = Vec::with_capacity(partitions.len());

            for block in partitions {
                match split(&block, dfa, &partition_of) {
                    Some(blocks) => {
                        changed = true;
                        refined.extend(blocks);
                    }
                    None => refined.push(block),
                }
            }

            partitions = refined;
            partition_of = index_partitions(&partitions, dfa.len());

            if !changed {
                break;
            }
        }

        let transitions = partitions
            .iter()
            .enumerate()
            .filter_map(|(index, block)| block.first().map(|state| (index, *state)))
            .flat_map(move |(index, representative)| {
                dfa.alphabet().iter().filter_map(move |c| {
                    dfa.next(representative, *c)
                        .map(|dest| ((index, *c), dest))
                })
            })
            .map(|(key, dest)| (key, partition_of[dest]))
            .collect();

        let accepting = partitions
            .iter()
            .enumerate()
            .filter(|(_, block)| block.iter().any(|id| dfa.is_final(*id)))
            .map(|(index, _)| index)
            .collect();

        log::debug!(
            "minimized {} DFA states into {} partitions",
            dfa.len(),
            partitions.len()
        );

        Self {
            start_partition: partition_of[dfa.start_state()],
            partitions,
            partition_of,
            accepting,
            transitions,
        }
    }
}

/// Splits the block on the first symbol for which its members reach different blocks. Returns
/// `None` when the block is stable.
fn split(
    block: &BTreeSet<StateId>,
    dfa: &Dfa,
    partition_of: &[usize],
) -> Option<Vec<BTreeSet<StateId>>> {
    if block.len() < 2 {
        return None;
    }

    for c in dfa.alphabet() {
        // `None` (no transition) orders before every block index.
        let mut groups: BTreeMap<Option<usize>, BTreeSet<StateId>> = BTreeMap::new();
        for state in block {
            let dest = dfa.next(*state, *c).map(|dest| partition_of[dest]);
            groups.entry(dest).or_default().insert(*state);
        }

        if groups.len() > 1 {
            return Some(groups.into_values().collect());
        }
    }

    None
}

fn index_partitions(partitions: &[BTreeSet<StateId>], state_count: usize) -> Vec<usize> {
    let mut partition_of = vec![0; state_count];
    for (index, block) in partitions.iter().enumerate() {
        for state in block {
            partition_of[*state] = index;
        }
    }

    partition_of
}

impl MinimizedDfa {
    pub fn start_partition(&self) -> usize {
        self.start_partition
    }

    /// Returns the amount of states (blocks) of the minimized DFA.
    pub fn len(&self) -> usize {
        self.partitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }

    pub fn partitions(&self) -> &[BTreeSet<StateId>] {
        &self.partitions
    }

    /// Returns the block the DFA state belongs to.
    ///
    /// # Panics
    ///
    /// When the [`StateId`] does not exist in the DFA this was minimized from.
    pub fn partition_of(&self, state_id: StateId) -> usize {
        self.partition_of[state_id]
    }

    pub fn is_accepting(&self, partition: usize) -> bool {
        self.accepting.contains(&partition)
    }

    pub fn accepting_partitions(&self) -> impl Iterator<Item = usize> + '_ {
        self.accepting.iter().copied()
    }

    pub fn next(&self, partition: usize, input: char) -> Option<usize> {
        self.transitions.get(&(partition, input)).copied()
    }

    /// Returns an iterator over all transitions as `(source, symbol, destination)` triples.
    pub fn transitions(&self) -> impl Iterator<Item = (usize, char, usize)> + '_ {
        self.transitions
            .iter()
            .map(|((from, c), to)| (*from, *c, *to))
    }
}

impl Display for MinimizedDfa {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Minimized DFA States: {}", self.len())?;
        writeln!(f, "Initial State: {}", self.start_partition)?;
        writeln!(
            f,
            "Accept States: {}",
            format_state_set(self.accepting_partitions())
        )?;
        writeln!(f, "Partitions:")?;
        for (index, block) in self.partitions.iter().enumerate() {
            writeln!(f, "  {index} = {}", format_state_set(block.iter().copied()))?;
        }
        writeln!(f, "Transitions: {} total", self.transitions.len())?;
        for (from, c, to) in self.transitions() {
            writeln!(f, "  δ({from}, {c}) = {to}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::MinimizedDfa;
    use crate::{
        fsm::{nfa::Compiler, Simulatable},
        Dfa, Postfix,
    };

    fn automata(regex: &str) -> (Dfa, MinimizedDfa) {
        let nfa = Compiler::compile(&Postfix::new(regex).unwrap()).unwrap();
        let dfa = Dfa::from(&nfa);
        let minimized = MinimizedDfa::from(&dfa);
        (dfa, minimized)
    }

    #[test]
    fn merges_equivalent_states() {
        // the states after `a` and after `b` are both final without transitions
        let (dfa, minimized) = automata("a|b");

        assert_eq!(dfa.len(), 3);
        assert_eq!(minimized.len(), 2);
        assert_eq!(minimized.partition_of(1), minimized.partition_of(2));
        assert_eq!(minimized.transitions().count(), 2);
    }

    #[test]
    fn classic_abb() {
        let (dfa, minimized) = automata("(a|b)*abb");

        assert_eq!(dfa.len(), 5);
        assert_eq!(minimized.len(), 4);
        assert_eq!(minimized.accepting_partitions().count(), 1);
    }

    #[test]
    fn partitions_cover_every_state_once() {
        let (dfa, minimized) = automata("(ab|a)*b(c|d)*");

        let mut states = minimized
            .partitions()
            .iter()
            .flatten()
            .copied()
            .collect::<Vec<_>>();
        states.sort();

        assert_eq!(states, (0..dfa.len()).collect::<Vec<_>>());
    }

    #[test]
    fn start_partition_contains_start_state() {
        let (dfa, minimized) = automata("a*b");

        assert!(minimized.partitions()[minimized.start_partition()].contains(&dfa.start_state()));
    }

    #[test]
    fn preserves_language() {
        let (dfa, minimized) = automata("(a|b)*abb");

        for input in ["", "a", "abb", "aabb", "babb", "abab", "abba", "bbabb"] {
            assert_eq!(dfa.matches(input), minimized.matches(input), "{input}");
        }
    }

    #[test]
    fn describe() {
        let (_, minimized) = automata("a|b");
        let description = minimized.to_string();

        assert!(description.starts_with("Minimized DFA States: 2\nInitial State: 0\n"));
        assert!(description.contains("  1 = {1, 2}\n"));
        assert!(description.contains("  δ(0, a) = 1\n"));
    }
}
