//! LR(0) and SLR(1) parser construction from textual grammars, along with a step-by-step parse
//! simulator.

use std::fmt::Display;

pub use cfsm::{Cfsm, Item, ItemSet, State, StateId};
pub use error::{GrammarError, ParseVariantError};
pub use first_follow::{FirstSets, FollowSets};
pub use grammar::{Grammar, GrammarBuilder, Production};
pub use parser::{
    table::{Action, ParseTable},
    trace::{Step, StepAction, StepError, Trace},
    Parser, Variant,
};

mod cfsm;
mod error;
mod first_follow;
mod grammar;
mod parser;

/// Represents a single symbol in the body of a production.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol {
    Terminal(String),
    Variable(String),
    // Note: The end-of-input marker is not a `Symbol`, it only exists as a lookahead
    // (`Terminal::Eof`).
    Epsilon,
}

/// Lookahead of the parser: either a terminal of the grammar or the end of the input.
///
/// `Eof` orders after every terminal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Terminal {
    T(String),
    Eof,
}

/// List of [`Symbol`]s a variable maps to.
pub type Body = Vec<Symbol>;

impl Symbol {
    /// Classifies a token by the naming convention: a single uppercase letter is a variable,
    /// anything else is a terminal.
    pub fn classify(token: impl Into<String>) -> Self {
        let token = token.into();
        let mut chars = token.chars();

        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_uppercase() => Symbol::Variable(token),
            _ => Symbol::Terminal(token),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Symbol::Terminal(name) | Symbol::Variable(name) => name,
            Symbol::Epsilon => "ε",
        }
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Display for Terminal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Terminal::T(name) => write!(f, "{name}"),
            Terminal::Eof => write!(f, "#"),
        }
    }
}

impl From<&str> for Terminal {
    fn from(value: &str) -> Self {
        Self::T(value.to_string())
    }
}
