/// Errors produced while compiling a regex into its automata.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegexError {
    #[error("regex is empty")]
    Empty,
    #[error("illegal character `{character}` at position {position}")]
    InvalidCharacter { character: char, position: usize },
    #[error("unbalanced parenthesis at position {position}")]
    UnbalancedParenthesis { position: usize },
    #[error("operator `{operator}` at position {position} is missing an operand")]
    MissingOperand { operator: char, position: usize },
    #[error("{count} unconnected fragments remain after compiling the regex")]
    DanglingOperands { count: usize },
}
