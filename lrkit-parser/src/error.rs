/// Errors produced while reading a grammar.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GrammarError {
    #[error("grammar contains no valid production")]
    NoProductions,
    #[error("line {line}: `{head}` is not a valid variable (expected a single uppercase letter)")]
    InvalidHead { line: usize, head: String },
}

/// Error returned when parsing an unknown [`Variant`](crate::Variant) name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown parser variant `{0}`, expected `lr0` or `slr1`")]
pub struct ParseVariantError(pub String);
