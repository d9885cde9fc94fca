use super::tokenizer::{OperatorKind, Token, TokenKind, Tokenizer};
use crate::RegexError;

use std::{collections::BTreeSet, fmt::Display};

/// Regex in postfix (reverse polish) notation, with concatenation made explicit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Postfix {
    /// Tokens in postfix order, along with their position in the source regex.
    tokens: Vec<(PostfixToken, usize)>,
    /// The infix regex with explicit concatenation operators (`.`).
    explicit: String,
    /// Every literal used in the regex.
    alphabet: BTreeSet<char>,
}

/// Token of a [`Postfix`] regex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostfixToken {
    Literal(char),
    Concat,
    Alternation,
    Star,
}

impl Postfix {
    /// Validates the regex, inserts explicit concatenation and converts the result to postfix
    /// notation using the shunting-yard algorithm.
    pub fn new(regex: &str) -> Result<Self, RegexError> {
        let tokens = validate(regex)?;
        let alphabet = tokens
            .iter()
            .filter_map(|t| match t.kind {
                TokenKind::Literal(c) => Some(c),
                _ => None,
            })
            .collect();

        let tokens = insert_concatenation(tokens);
        let explicit = tokens.iter().map(Token::as_char).collect();
        let tokens = to_postfix(tokens)?;

        log::debug!("regex `{regex}` has explicit form `{explicit}`");

        Ok(Self {
            tokens,
            explicit,
            alphabet,
        })
    }

    /// Returns an iterator over the tokens in postfix order.
    pub fn iter(&self) -> impl Iterator<Item = PostfixToken> + '_ {
        self.tokens.iter().map(|(token, _)| *token)
    }

    pub(crate) fn iter_with_positions(&self) -> impl Iterator<Item = (PostfixToken, usize)> + '_ {
        self.tokens.iter().copied()
    }

    /// Returns the infix regex with explicit concatenation operators.
    pub fn explicit(&self) -> &str {
        &self.explicit
    }

    pub fn alphabet(&self) -> &BTreeSet<char> {
        &self.alphabet
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Rejects the empty regex and every character that is neither an ASCII letter, an ASCII digit
/// nor one of `(`, `)`, `|` and `*`.
fn validate(regex: &str) -> Result<Vec<Token>, RegexError> {
    if regex.is_empty() {
        return Err(RegexError::Empty);
    }

    Tokenizer::new(regex)
        .map(|token| match token.kind {
            TokenKind::Invalid(character) => Err(RegexError::InvalidCharacter {
                character,
                position: token.pos,
            }),
            _ => Ok(token),
        })
        .collect()
}

fn insert_concatenation(tokens: Vec<Token>) -> Vec<Token> {
    let mut result = Vec::with_capacity(tokens.len() * 2);
    let mut iter = tokens.into_iter().peekable();

    while let Some(token) = iter.next() {
        result.push(token);

        if let Some(next) = iter.peek() {
            if token.concatenates_with(next) {
                result.push(Token {
                    kind: TokenKind::Concat,
                    pos: next.pos,
                });
            }
        }
    }

    result
}

fn to_postfix(tokens: Vec<Token>) -> Result<Vec<(PostfixToken, usize)>, RegexError> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut operators: Vec<Token> = Vec::new();

    for token in tokens {
        match token.kind {
            TokenKind::Literal(c) => output.push((PostfixToken::Literal(c), token.pos)),
            TokenKind::Operator(OperatorKind::LeftParen) => operators.push(token),
            TokenKind::Operator(OperatorKind::RightParen) => loop {
                match operators.pop() {
                    Some(Token {
                        kind: TokenKind::Operator(OperatorKind::LeftParen),
                        ..
                    }) => break,
                    Some(operator) => output.push(operator.into_postfix()),
                    None => {
                        return Err(RegexError::UnbalancedParenthesis {
                            position: token.pos,
                        })
                    }
                }
            },
            TokenKind::Operator(_) | TokenKind::Concat => {
                while let Some(top) = operators.last() {
                    if top.precedence() < token.precedence() {
                        break;
                    }
                    output.push(operators.pop().expect("top was peeked").into_postfix());
                }
                operators.push(token);
            }
            TokenKind::Invalid(_) => unreachable!("invalid tokens are rejected during validation"),
        }
    }

    while let Some(operator) = operators.pop() {
        if let TokenKind::Operator(OperatorKind::LeftParen) = operator.kind {
            return Err(RegexError::UnbalancedParenthesis {
                position: operator.pos,
            });
        }
        output.push(operator.into_postfix());
    }

    Ok(output)
}

impl Token {
    /// Operator precedence, the left parenthesis binds weakest so it is never popped by an
    /// operator.
    fn precedence(&self) -> u8 {
        match self.kind {
            TokenKind::Operator(OperatorKind::Asterisk) => 3,
            TokenKind::Concat => 2,
            TokenKind::Operator(OperatorKind::Vertical) => 1,
            _ => 0,
        }
    }

    fn as_char(&self) -> char {
        match self.kind {
            TokenKind::Literal(c) | TokenKind::Invalid(c) => c,
            TokenKind::Operator(operator) => operator.as_char(),
            TokenKind::Concat => '.',
        }
    }

    fn into_postfix(self) -> (PostfixToken, usize) {
        let token = match self.kind {
            TokenKind::Literal(c) => PostfixToken::Literal(c),
            TokenKind::Concat => PostfixToken::Concat,
            TokenKind::Operator(OperatorKind::Vertical) => PostfixToken::Alternation,
            TokenKind::Operator(OperatorKind::Asterisk) => PostfixToken::Star,
            kind => unreachable!("{kind:?} has no postfix representation"),
        };

        (token, self.pos)
    }
}

impl PostfixToken {
    pub(crate) fn as_char(&self) -> char {
        match self {
            PostfixToken::Literal(c) => *c,
            PostfixToken::Concat => '.',
            PostfixToken::Alternation => '|',
            PostfixToken::Star => '*',
        }
    }
}

impl Display for PostfixToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl Display for Postfix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.iter().try_for_each(|token| write!(f, "{token}"))
    }
}
