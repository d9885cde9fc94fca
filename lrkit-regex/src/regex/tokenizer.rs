use std::{iter::Enumerate, str::Chars};

/// Regex tokenizer.
///
/// Every character of the input is exactly one token. Only ASCII letters and digits are valid
/// literals.
pub(crate) struct Tokenizer<'a> {
    iter: Enumerate<Chars<'a>>,
}

/// Regex token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token {
    pub(crate) kind: TokenKind,
    /// Character position of the token in the input.
    pub(crate) pos: usize,
}

/// Regex token kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Literal(char),
    Operator(OperatorKind),
    /// Explicit concatenation. Never produced by the [`Tokenizer`], only inserted afterwards.
    Concat,
    Invalid(char),
}

/// Regex operator kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OperatorKind {
    LeftParen,
    RightParen,
    Asterisk,
    Vertical,
}

impl<'a> Tokenizer<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        Self {
            iter: input.chars().enumerate(),
        }
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let (pos, ch) = self.iter.next()?;

        let kind = match ch {
            '(' => TokenKind::Operator(OperatorKind::LeftParen),
            ')' => TokenKind::Operator(OperatorKind::RightParen),
            '*' => TokenKind::Operator(OperatorKind::Asterisk),
            '|' => TokenKind::Operator(OperatorKind::Vertical),
            c if c.is_ascii_alphanumeric() => TokenKind::Literal(c),
            c => TokenKind::Invalid(c),
        };

        Some(Token { kind, pos })
    }
}

impl Token {
    /// Whether an explicit concatenation belongs between `self` and the token following it.
    pub(crate) fn concatenates_with(&self, next: &Token) -> bool {
        use OperatorKind::*;

        let left_open = matches!(
            self.kind,
            TokenKind::Operator(LeftParen) | TokenKind::Operator(Vertical)
        );
        let right_closed = matches!(
            next.kind,
            TokenKind::Operator(RightParen)
                | TokenKind::Operator(Vertical)
                | TokenKind::Operator(Asterisk)
        );

        !left_open && !right_closed
    }
}

impl OperatorKind {
    pub(crate) fn as_char(&self) -> char {
        match self {
            OperatorKind::LeftParen => '(',
            OperatorKind::RightParen => ')',
            OperatorKind::Asterisk => '*',
            OperatorKind::Vertical => '|',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{OperatorKind::*, Token, TokenKind, Tokenizer};

    fn kinds(input: &str) -> Vec<TokenKind> {
        Tokenizer::new(input).map(|Token { kind, .. }| kind).collect()
    }

    #[test]
    fn tokenize_operators_and_literals() {
        assert_eq!(
            kinds("(a|B)*9"),
            vec![
                TokenKind::Operator(LeftParen),
                TokenKind::Literal('a'),
                TokenKind::Operator(Vertical),
                TokenKind::Literal('B'),
                TokenKind::Operator(RightParen),
                TokenKind::Operator(Asterisk),
                TokenKind::Literal('9'),
            ]
        );
    }

    #[test]
    fn tokenize_invalid() {
        let tokens = Tokenizer::new("a+é").collect::<Vec<_>>();

        assert_eq!(tokens[1].kind, TokenKind::Invalid('+'));
        assert_eq!(tokens[1].pos, 1);
        assert_eq!(tokens[2].kind, TokenKind::Invalid('é'));
    }

    #[test]
    fn concatenation_boundaries() {
        let tokens = Tokenizer::new("a(b)*|c").collect::<Vec<_>>();
        let concats = tokens
            .windows(2)
            .map(|w| w[0].concatenates_with(&w[1]))
            .collect::<Vec<_>>();

        // a( (b b) )* *| |c
        assert_eq!(concats, vec![true, false, false, false, false, false]);
    }
}
