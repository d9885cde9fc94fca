use lrkit_parser::GrammarError;
use lrkit_regex::RegexError;

/// Errors returned by the [`Session`](crate::Session) operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("invalid grammar: {0}")]
    Grammar(#[from] GrammarError),
    #[error("invalid regex: {0}")]
    Regex(#[from] RegexError),
    #[error("no grammar has been built yet")]
    NoGrammar,
    #[error("no regex has been compiled yet")]
    NoRegex,
}

/// Error returned when parsing an unknown [`Automaton`](crate::Automaton) name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown automaton `{0}`, expected one of `cfsm`, `nfa`, `dfa` or `min`")]
pub struct ParseAutomatonError(pub String);
