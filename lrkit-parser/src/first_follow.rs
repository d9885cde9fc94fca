use crate::{Grammar, Symbol, Terminal};

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt::Display,
};

/// FIRST set of every variable. Elements are terminals and possibly [`Symbol::Epsilon`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirstSets {
    sets: BTreeMap<String, BTreeSet<Symbol>>,
}

/// FOLLOW set of every variable. [`Terminal::Eof`] follows the start variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowSets {
    sets: BTreeMap<String, BTreeSet<Terminal>>,
}

impl FirstSets {
    /// Computes the FIRST sets by iterating over all productions until no set changes.
    pub fn new(grammar: &Grammar) -> Self {
        let mut first = Self {
            sets: grammar
                .variables()
                .iter()
                .map(|v| (v.clone(), BTreeSet::new()))
                .collect(),
        };

        let mut changed = true;
        while changed {
            changed = false;

            for production in grammar.productions() {
                let body_first = first.of_body(production.body());
                let set = first.sets.entry(production.head().to_string()).or_default();
                let len = set.len();
                set.extend(body_first);
                changed |= len != set.len();
            }
        }

        first
    }

    pub fn get(&self, variable: &str) -> Option<&BTreeSet<Symbol>> {
        self.sets.get(variable)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &BTreeSet<Symbol>)> {
        self.sets.iter()
    }

    /// FIRST of a single symbol.
    pub fn of_symbol(&self, symbol: &Symbol) -> BTreeSet<Symbol> {
        match symbol {
            Symbol::Variable(v) => self.sets.get(v).cloned().unwrap_or_default(),
            s @ (Symbol::Terminal(_) | Symbol::Epsilon) => BTreeSet::from([s.clone()]),
        }
    }

    /// FIRST of a sequence of symbols. Contains [`Symbol::Epsilon`] when every symbol can derive
    /// the empty string, which includes the empty sequence.
    pub fn of_body(&self, symbols: &[Symbol]) -> BTreeSet<Symbol> {
        let mut result = BTreeSet::new();

        for symbol in symbols {
            let mut first = self.of_symbol(symbol);
            let nullable = first.remove(&Symbol::Epsilon);
            result.extend(first);

            if !nullable {
                return result;
            }
        }

        result.insert(Symbol::Epsilon);
        result
    }
}

impl FollowSets {
    /// Computes the FOLLOW sets by iterating over all productions until no set changes.
    pub fn new(grammar: &Grammar, first: &FirstSets) -> Self {
        let mut sets: BTreeMap<String, BTreeSet<Terminal>> = grammar
            .variables()
            .iter()
            .map(|v| (v.clone(), BTreeSet::new()))
            .collect();

        // `S' -> S` carries the end marker over to the start variable.
        sets.entry(grammar.augmented_start_variable().to_string())
            .or_default()
            .insert(Terminal::Eof);

        let mut changed = true;
        while changed {
            changed = false;

            for production in grammar.productions() {
                let body = production.body();

                for (index, symbol) in body.iter().enumerate() {
                    let Symbol::Variable(variable) = symbol else {
                        continue;
                    };

                    let mut additions = BTreeSet::new();
                    for s in first.of_body(&body[index + 1..]) {
                        match s {
                            Symbol::Terminal(t) => {
                                additions.insert(Terminal::T(t));
                            }
                            Symbol::Epsilon => {
                                // the rest of the body can vanish, so whatever follows the head
                                // follows the variable
                                additions.extend(
                                    sets.get(production.head()).cloned().unwrap_or_default(),
                                );
                            }
                            Symbol::Variable(_) => {
                                unreachable!("variables should not exist in a first set")
                            }
                        }
                    }

                    let set = sets.entry(variable.clone()).or_default();
                    let len = set.len();
                    set.extend(additions);
                    changed |= len != set.len();
                }
            }
        }

        Self { sets }
    }

    pub fn get(&self, variable: &str) -> Option<&BTreeSet<Terminal>> {
        self.sets.get(variable)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &BTreeSet<Terminal>)> {
        self.sets.iter()
    }
}

fn format_set<T: Display>(set: &BTreeSet<T>) -> String {
    set.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl Display for FirstSets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (variable, set) in self.sets.iter() {
            writeln!(f, "FIRST({variable}) = {{{}}}", format_set(set))?;
        }

        Ok(())
    }
}

impl Display for FollowSets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (variable, set) in self.sets.iter() {
            writeln!(f, "FOLLOW({variable}) = {{{}}}", format_set(set))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{FirstSets, FollowSets};
    use crate::{Grammar, Symbol, Terminal};

    use std::collections::BTreeSet;

    fn t(name: &str) -> Symbol {
        Symbol::Terminal(name.to_string())
    }

    fn lookaheads<const N: usize>(names: [&str; N]) -> BTreeSet<Terminal> {
        names
            .into_iter()
            .map(|name| match name {
                "#" => Terminal::Eof,
                name => Terminal::from(name),
            })
            .collect()
    }

    // E -> T X, X -> + T X | ε, T -> F Y, Y -> * F Y | ε, F -> ( E ) | i
    fn expression_grammar() -> Grammar {
        "E -> T X\nX -> + T X | ε\nT -> F Y\nY -> * F Y | ε\nF -> ( E ) | i"
            .parse()
            .unwrap()
    }

    #[test]
    fn first() {
        let grammar = expression_grammar();
        let first = FirstSets::new(&grammar);

        let expected = BTreeSet::from([t("("), t("i")]);
        assert_eq!(first.get("E"), Some(&expected));
        assert_eq!(first.get("T"), Some(&expected));
        assert_eq!(first.get("F"), Some(&expected));
        assert_eq!(first.get("X"), Some(&BTreeSet::from([t("+"), Symbol::Epsilon])));
        assert_eq!(first.get("Y"), Some(&BTreeSet::from([t("*"), Symbol::Epsilon])));
    }

    #[test]
    fn first_of_body() {
        let grammar = expression_grammar();
        let first = FirstSets::new(&grammar);

        assert_eq!(first.of_body(&[]), BTreeSet::from([Symbol::Epsilon]));
        assert_eq!(
            first.of_body(&[Symbol::Variable("X".to_string()), t("i")]),
            BTreeSet::from([t("+"), t("i")])
        );
    }

    #[test]
    fn follow() {
        let grammar = expression_grammar();
        let first = FirstSets::new(&grammar);
        let follow = FollowSets::new(&grammar, &first);

        assert_eq!(follow.get("E"), Some(&lookaheads([")", "#"])));
        assert_eq!(follow.get("X"), Some(&lookaheads([")", "#"])));
        assert_eq!(follow.get("T"), Some(&lookaheads(["+", ")", "#"])));
        assert_eq!(follow.get("Y"), Some(&lookaheads(["+", ")", "#"])));
        assert_eq!(follow.get("F"), Some(&lookaheads(["+", "*", ")", "#"])));
    }

    #[test]
    fn follow_of_start_contains_end_marker() {
        let grammar = "S -> a S b | c".parse::<Grammar>().unwrap();
        let follow = FollowSets::new(&grammar, &FirstSets::new(&grammar));

        assert!(follow.get("S").unwrap().contains(&Terminal::Eof));
    }

    #[test]
    fn describe() {
        let grammar = "S -> a".parse::<Grammar>().unwrap();
        let first = FirstSets::new(&grammar);
        let follow = FollowSets::new(&grammar, &first);

        assert_eq!(first.to_string(), "FIRST(S) = {a}\nFIRST(S') = {a}\n");
        assert_eq!(follow.to_string(), "FOLLOW(S) = {#}\nFOLLOW(S') = {#}\n");
    }
}
