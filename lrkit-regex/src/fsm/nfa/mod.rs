pub use model::{Input, Nfa};

pub(crate) use compiler::Compiler;

mod compiler;
mod model;
mod sim;
