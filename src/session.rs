use std::{fmt::Write, str::FromStr};

use log::{debug, info};
use lrkit_parser::{Parser, Trace, Variant};
use lrkit_regex::RegexAutomata;

use crate::{error::ParseAutomatonError, Error, Graph};

/// Selects one of the automata held by a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Automaton {
    /// Canonical collection of LR(0) item sets of the current grammar.
    Cfsm,
    Nfa,
    Dfa,
    MinimizedDfa,
}

/// Owns the automata built by the caller.
///
/// Every build replaces the previous result of the same kind, so parse and match calls always
/// run against the most recent successful build. Sessions share nothing, callers needing
/// isolation between requests create one session per request.
#[derive(Debug, Default)]
pub struct Session {
    parser: Option<Parser>,
    regex: Option<RegexAutomata>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the grammar text, builds its canonical collection and parse table for the given
    /// variant and keeps the resulting parser for [`Session::parse_input`].
    ///
    /// A failed build leaves the session without a parser.
    pub fn build_grammar_table(&mut self, text: &str, variant: Variant) -> Result<&Parser, Error> {
        self.parser = None;

        let parser = Parser::from_text(text, variant)?;
        info!(
            "built {} parser with {} productions and {} states",
            variant,
            parser.grammar().productions().len(),
            parser.cfsm().len()
        );

        Ok(self.parser.insert(parser))
    }

    /// Simulates the current parser on whitespace separated tokens.
    pub fn parse_input(&self, input: &str) -> Result<Trace, Error> {
        let parser = self.parser.as_ref().ok_or(Error::NoGrammar)?;
        let trace = parser.parse(input);
        debug!(
            "parsed `{}` in {} steps, accepted: {}",
            input,
            trace.steps().len(),
            trace.accepted()
        );

        Ok(trace)
    }

    /// Compiles the pattern into its NFA, DFA and minimized DFA and keeps them for
    /// [`Session::match_string`].
    ///
    /// A failed compilation leaves the session without a regex.
    pub fn compile_regex(&mut self, pattern: &str) -> Result<&RegexAutomata, Error> {
        self.regex = None;

        let automata = RegexAutomata::compile(pattern)?;
        info!(
            "compiled `{}`: {} NFA states, {} DFA states, {} minimized states",
            pattern,
            automata.nfa().len(),
            automata.dfa().len(),
            automata.minimized().len()
        );

        Ok(self.regex.insert(automata))
    }

    /// Matches the whole input against the current regex.
    pub fn match_string(&self, input: &str) -> Result<bool, Error> {
        let regex = self.regex.as_ref().ok_or(Error::NoRegex)?;
        Ok(regex.is_match(input))
    }

    pub fn parser(&self) -> Option<&Parser> {
        self.parser.as_ref()
    }

    pub fn regex(&self) -> Option<&RegexAutomata> {
        self.regex.as_ref()
    }

    /// Textual summary of an automaton.
    ///
    /// The canonical collection summary also lists the grammar, the FIRST/FOLLOW sets (SLR(1)
    /// only) and the parse table.
    pub fn describe(&self, automaton: Automaton) -> Result<String, Error> {
        match automaton {
            Automaton::Cfsm => {
                let parser = self.parser.as_ref().ok_or(Error::NoGrammar)?;
                Ok(describe_parser(parser))
            }
            Automaton::Nfa => Ok(self.current_regex()?.nfa().to_string()),
            Automaton::Dfa => Ok(self.current_regex()?.dfa().to_string()),
            Automaton::MinimizedDfa => Ok(self.current_regex()?.minimized().to_string()),
        }
    }

    /// Node/edge description of an automaton, for an external renderer.
    pub fn graph(&self, automaton: Automaton) -> Result<Graph, Error> {
        match automaton {
            Automaton::Cfsm => {
                let parser = self.parser.as_ref().ok_or(Error::NoGrammar)?;
                Ok(Graph::from(parser))
            }
            Automaton::Nfa => Ok(Graph::from(self.current_regex()?.nfa())),
            Automaton::Dfa => Ok(Graph::from(self.current_regex()?.dfa())),
            Automaton::MinimizedDfa => Ok(Graph::from(self.current_regex()?.minimized())),
        }
    }

    fn current_regex(&self) -> Result<&RegexAutomata, Error> {
        self.regex.as_ref().ok_or(Error::NoRegex)
    }
}

fn describe_parser(parser: &Parser) -> String {
    let mut description = String::new();

    // Note: Writing into a `String` never fails.
    let _ = writeln!(description, "Grammar:\n{}", parser.grammar());
    if let (Some(first), Some(follow)) = (parser.first_sets(), parser.follow_sets()) {
        let _ = writeln!(description, "{first}\n{follow}");
    }
    let _ = writeln!(
        description,
        "Canonical collection:\n{}",
        parser.cfsm().display(parser.grammar())
    );
    let _ = write!(description, "{} table:\n{}", parser.variant(), parser.table());

    description
}

impl FromStr for Automaton {
    type Err = ParseAutomatonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cfsm" | "lr" | "items" => Ok(Self::Cfsm),
            "nfa" => Ok(Self::Nfa),
            "dfa" => Ok(Self::Dfa),
            "min" | "mindfa" | "minimized" => Ok(Self::MinimizedDfa),
            _ => Err(ParseAutomatonError(s.to_string())),
        }
    }
}
