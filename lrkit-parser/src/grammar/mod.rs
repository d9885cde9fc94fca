use crate::{Body, GrammarError, Symbol, Terminal};

use std::{collections::BTreeSet, fmt::Display};

mod reader;

/// Context-free grammar, augmented with the production `S' -> S` at index `0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
    /// Start variable as written in the grammar.
    start_variable: String,
    /// Head of production `0`, the start variable followed by `'`.
    augmented_start_variable: String,
    /// Productions in input order, the index of a production is its position.
    productions: Vec<Production>,
    variables: BTreeSet<String>,
    terminals: BTreeSet<String>,
}

/// A single `head -> body` alternative of the [`Grammar`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Production {
    index: usize,
    head: String,
    body: Body,
}

impl Grammar {
    /// Creates a new `GrammarBuilder`.
    pub fn builder() -> GrammarBuilder {
        GrammarBuilder::new()
    }

    pub fn start_variable(&self) -> &str {
        &self.start_variable
    }

    pub fn augmented_start_variable(&self) -> &str {
        &self.augmented_start_variable
    }

    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    /// # Panics
    ///
    /// When no production with the index exists.
    pub fn production(&self, index: usize) -> &Production {
        self.productions
            .get(index)
            .expect("production index out of range")
    }

    /// Returns every production with the given head, in input order.
    pub fn rules_for<'a>(&'a self, head: &'a str) -> impl Iterator<Item = &'a Production> + 'a {
        self.productions.iter().filter(move |p| p.head == head)
    }

    /// Returns the sorted set of variables, including the augmented start variable.
    pub fn variables(&self) -> &BTreeSet<String> {
        &self.variables
    }

    /// Returns the sorted set of terminals, without the end-of-input marker.
    pub fn terminals(&self) -> &BTreeSet<String> {
        &self.terminals
    }

    /// Returns every lookahead: the terminals in sorted order followed by [`Terminal::Eof`].
    pub fn iter_lookaheads(&self) -> impl Iterator<Item = Terminal> + '_ {
        self.terminals
            .iter()
            .map(|t| Terminal::T(t.clone()))
            .chain(std::iter::once(Terminal::Eof))
    }

    /// Returns every grammar symbol a state can transition on: the variables (without the
    /// augmented start variable) followed by the terminals, both in sorted order.
    pub fn iter_symbols(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.variables
            .iter()
            .filter(|v| **v != self.augmented_start_variable)
            .map(|v| Symbol::Variable(v.clone()))
            .chain(self.terminals.iter().map(|t| Symbol::Terminal(t.clone())))
    }

    /// Whether the lookahead is known to the grammar. [`Terminal::Eof`] is always known.
    pub fn is_terminal(&self, terminal: &Terminal) -> bool {
        match terminal {
            Terminal::T(t) => self.terminals.contains(t),
            Terminal::Eof => true,
        }
    }
}

impl Production {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn head(&self) -> &str {
        &self.head
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Amount of symbols a reduce by this production pops. Epsilons do not count.
    pub fn arity(&self) -> usize {
        self.body
            .iter()
            .filter(|s| !matches!(s, Symbol::Epsilon))
            .count()
    }

    /// The production without whitespace, e.g. `E->E+T`.
    pub fn compact(&self) -> String {
        let body = self.body.iter().map(Symbol::name).collect::<String>();
        format!("{}->{}", self.head, body)
    }
}

impl Display for Production {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let body = self
            .body
            .iter()
            .map(Symbol::name)
            .collect::<Vec<_>>()
            .join(" ");
        write!(f, "{} -> {}", self.head, body)
    }
}

impl Display for Grammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for production in self.productions.iter() {
            writeln!(f, "{}: {}", production.index, production)?;
        }

        Ok(())
    }
}

/// Builder struct for the [`Grammar`].
#[derive(Debug, Default)]
pub struct GrammarBuilder {
    start_variable: Option<String>,
    rules: Vec<(String, Body)>,
}

impl GrammarBuilder {
    /// Creates a new [`GrammarBuilder`] with no `start_variable` and no rules.
    fn new() -> Self {
        Self::default()
    }

    /// Sets the `start_variable` of the [`Grammar`]. When it is never set, the head of the first
    /// rule is used.
    pub fn with_start_variable(mut self, variable: impl Into<String>) -> Self {
        self.set_start_variable(variable);
        self
    }

    /// Adds a rule to the [`Grammar`].
    pub fn with_rule(mut self, variable: impl Into<String>, body: impl Into<Body>) -> Self {
        self.add_rule(variable, body);
        self
    }

    /// Adds a set of rules with the same head to the [`Grammar`].
    pub fn with_rules<B>(
        mut self,
        variable: impl Into<String>,
        bodies: impl IntoIterator<Item = B>,
    ) -> Self
    where
        B: Into<Body>,
    {
        self.add_rules(variable, bodies);
        self
    }

    /// Sets the `start_variable` of the [`Grammar`].
    pub fn set_start_variable(&mut self, variable: impl Into<String>) {
        self.start_variable = Some(variable.into());
    }

    pub fn has_start_variable(&self) -> bool {
        self.start_variable.is_some()
    }

    /// Adds a rule to the [`Grammar`]. Returns `false` when the exact rule was already added.
    pub fn add_rule(&mut self, variable: impl Into<String>, body: impl Into<Body>) -> bool {
        let body = body.into();
        // default empty bodies to `Symbol::Epsilon`
        let body = if !body.is_empty() {
            body
        } else {
            Body::from([Symbol::Epsilon])
        };

        let rule = (variable.into(), body);
        if self.rules.contains(&rule) {
            return false;
        }

        self.rules.push(rule);
        true
    }

    /// Adds a set of rules with the same head to the [`Grammar`].
    pub fn add_rules<B>(
        &mut self,
        variable: impl Into<String>,
        bodies: impl IntoIterator<Item = B>,
    ) where
        B: Into<Body>,
    {
        let variable = variable.into();
        bodies.into_iter().for_each(|b| {
            let _ = self.add_rule(variable.clone(), b);
        });
    }

    /// Builds the [`Grammar`], injecting the augmented start production at index `0`.
    pub fn build(self) -> Result<Grammar, GrammarError> {
        let Some(first_head) = self.rules.first().map(|(head, _)| head.clone()) else {
            return Err(GrammarError::NoProductions);
        };

        let start_variable = self.start_variable.unwrap_or(first_head);
        let augmented_start_variable = format!("{start_variable}'");

        let productions = std::iter::once((
            augmented_start_variable.clone(),
            Body::from([Symbol::Variable(start_variable.clone())]),
        ))
        .chain(self.rules)
        .enumerate()
        .map(|(index, (head, body))| Production { index, head, body })
        .collect::<Vec<_>>();

        let mut variables = BTreeSet::new();
        let mut terminals = BTreeSet::new();

        for Production { head, body, .. } in productions.iter() {
            variables.insert(head.clone());

            for symbol in body {
                match symbol {
                    Symbol::Variable(v) => {
                        variables.insert(v.clone());
                    }
                    Symbol::Terminal(t) => {
                        terminals.insert(t.clone());
                    }
                    Symbol::Epsilon => (),
                }
            }
        }

        for variable in variables.iter() {
            if !productions.iter().any(|p| p.head == *variable) {
                log::warn!("variable `{variable}` has no production associated with it");
            }
        }

        log::debug!(
            "built grammar with {} productions, {} variables and {} terminals",
            productions.len(),
            variables.len(),
            terminals.len()
        );

        Ok(Grammar {
            start_variable,
            augmented_start_variable,
            productions,
            variables,
            terminals,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Grammar;
    use crate::{GrammarError, Symbol, Terminal};

    use std::collections::BTreeSet;

    fn v(name: &str) -> Symbol {
        Symbol::Variable(name.to_string())
    }

    fn t(name: &str) -> Symbol {
        Symbol::Terminal(name.to_string())
    }

    mod grammar_construction {
        use super::{t, v, Grammar, GrammarError, Symbol};

        #[test]
        fn augmented_start() {
            let grammar = Grammar::builder()
                .with_rule("E", [v("E"), t("+"), v("T")])
                .with_rule("E", [v("T")])
                .with_rule("T", [t("a")])
                .build()
                .unwrap();

            assert_eq!(grammar.start_variable(), "E");
            assert_eq!(grammar.augmented_start_variable(), "E'");
            assert_eq!(grammar.production(0).head(), "E'");
            assert_eq!(grammar.production(0).body(), &vec![v("E")]);
            assert_eq!(grammar.productions().len(), 4);
            assert_eq!(grammar.production(1).index(), 1);
        }

        #[test]
        fn explicit_start_variable() {
            let grammar = Grammar::builder()
                .with_start_variable("S")
                .with_rule("A", [t("a")])
                .with_rule("S", [v("A")])
                .build()
                .unwrap();

            assert_eq!(grammar.production(0).to_string(), "S' -> S");
        }

        #[test]
        fn empty_body() {
            let grammar = Grammar::builder()
                .with_rule("A", Vec::<Symbol>::new())
                .build()
                .unwrap();

            assert_eq!(grammar.production(1).body(), &vec![Symbol::Epsilon]);
            assert_eq!(grammar.production(1).arity(), 0);
            assert_eq!(grammar.production(1).to_string(), "A -> ε");
        }

        #[test]
        fn duplicate_rule() {
            let mut builder = Grammar::builder();

            assert!(builder.add_rule("A", [t("a")]));
            assert!(!builder.add_rule("A", [t("a")]));
            assert_eq!(builder.build().unwrap().productions().len(), 2);
        }

        #[test]
        fn no_rules() {
            assert_eq!(Grammar::builder().build(), Err(GrammarError::NoProductions));
        }

        #[test]
        fn multi_rule() {
            let grammar = Grammar::builder()
                .with_rules("T", [vec![t("("), v("E"), t(")")], vec![t("a")]])
                .with_rule("E", [v("T")])
                .build()
                .unwrap();

            assert_eq!(grammar.rules_for("T").count(), 2);
            assert_eq!(grammar.production(1).compact(), "T->(E)");
        }
    }

    #[test]
    fn symbol_sets() {
        let grammar = Grammar::builder()
            .with_rule("E", [v("E"), t("+"), v("T")])
            .with_rule("E", [v("T")])
            .with_rule("T", [t("id")])
            .build()
            .unwrap();

        assert_eq!(
            grammar.variables(),
            &BTreeSet::from(["E".to_string(), "E'".to_string(), "T".to_string()])
        );
        assert_eq!(
            grammar.terminals(),
            &BTreeSet::from(["+".to_string(), "id".to_string()])
        );
        assert_eq!(
            grammar.iter_lookaheads().collect::<Vec<_>>(),
            vec![Terminal::from("+"), Terminal::from("id"), Terminal::Eof]
        );
        assert_eq!(
            grammar.iter_symbols().collect::<Vec<_>>(),
            vec![v("E"), v("T"), t("+"), t("id")]
        );
        assert!(grammar.is_terminal(&Terminal::Eof));
        assert!(!grammar.is_terminal(&Terminal::from("x")));
    }
}
