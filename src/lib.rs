//! Educational compiler construction toolkit: LR(0)/SLR(1) parser generation from textual
//! grammars and regex compilation into NFA, DFA and minimized DFA.
//!
//! The [`Session`] owns the most recently built parser and regex automata and exposes the
//! build, parse, match and describe operations on them.

pub use error::{Error, ParseAutomatonError};
pub use graph::{Edge, EdgeStyle, Graph, Node, NodeShape};
pub use session::{Automaton, Session};

pub use lrkit_parser as parser;
pub use lrkit_regex as regex;

mod error;
mod graph;
mod session;
