use crate::{
    fsm::{nfa::Compiler, Simulatable},
    Dfa, MinimizedDfa, Nfa, Postfix, RegexError,
};

use std::{collections::BTreeSet, fmt::Display, str::FromStr};

/// Every automaton built from a single regex: the Thompson NFA, the subset-constructed DFA and
/// the minimized DFA used for matching.
#[derive(Debug, Clone)]
pub struct RegexAutomata {
    pattern: String,
    postfix: Postfix,
    nfa: Nfa,
    dfa: Dfa,
    minimized: MinimizedDfa,
}

impl RegexAutomata {
    /// Runs the entire pipeline on the pattern.
    pub fn compile(pattern: &str) -> Result<Self, RegexError> {
        let postfix = Postfix::new(pattern)?;
        let nfa = Compiler::compile(&postfix)?;
        let dfa = Dfa::from(&nfa);
        let minimized = MinimizedDfa::from(&dfa);

        log::debug!(
            "compiled `{pattern}` (postfix `{postfix}`): {} NFA, {} DFA, {} minimized states",
            nfa.len(),
            dfa.len(),
            minimized.len()
        );

        Ok(Self {
            pattern: pattern.to_string(),
            postfix,
            nfa,
            dfa,
            minimized,
        })
    }

    /// Returns whether the entire input is in the language of the regex, using the minimized DFA.
    pub fn is_match(&self, input: &str) -> bool {
        let accepted = self.minimized.matches(input);
        log::trace!("`{input}` matched against `{}`: {accepted}", self.pattern);
        accepted
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn postfix(&self) -> &Postfix {
        &self.postfix
    }

    pub fn alphabet(&self) -> &BTreeSet<char> {
        self.postfix.alphabet()
    }

    pub fn nfa(&self) -> &Nfa {
        &self.nfa
    }

    pub fn dfa(&self) -> &Dfa {
        &self.dfa
    }

    pub fn minimized(&self) -> &MinimizedDfa {
        &self.minimized
    }
}

impl FromStr for RegexAutomata {
    type Err = RegexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::compile(s)
    }
}

impl Display for RegexAutomata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let alphabet = self.alphabet().iter().collect::<String>();

        writeln!(f, "Regex: {}", self.pattern)?;
        writeln!(f, "Alphabet: {alphabet}")?;
        writeln!(f, "Explicit: {}", self.postfix.explicit())?;
        writeln!(f, "Postfix: {}", self.postfix)?;
        writeln!(f)?;
        writeln!(f, "{}", self.nfa)?;
        writeln!(f, "{}", self.dfa)?;
        write!(f, "{}", self.minimized)
    }
}
