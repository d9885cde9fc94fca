use super::model::{Input, Nfa, NfaBuilder};
use crate::{fsm::StateId, Postfix, PostfixToken, RegexError};

/// Thompson construction of an [`Nfa`] from a [`Postfix`] regex.
pub(crate) struct Compiler {
    nfa: NfaBuilder,
    /// Stack of partially built automata, each with a single entry and a single exit state.
    fragments: Vec<Fragment>,
}

#[derive(Debug, Clone, Copy)]
struct Fragment {
    start: StateId,
    end: StateId,
}

impl Compiler {
    fn new() -> Self {
        Self {
            nfa: Nfa::builder(),
            fragments: Vec::new(),
        }
    }

    /// Compiles the postfix regex. The exit state of the remaining fragment becomes the only
    /// final state.
    pub(crate) fn compile(postfix: &Postfix) -> Result<Nfa, RegexError> {
        let mut compiler = Self::new();

        for (token, position) in postfix.iter_with_positions() {
            compiler.handle_token(token, position)?;
        }

        compiler.finish()
    }

    fn handle_token(&mut self, token: PostfixToken, position: usize) -> Result<(), RegexError> {
        let fragment = match token {
            PostfixToken::Literal(c) => {
                let start = self.nfa.add_state(false);
                let end = self.nfa.add_state(false);
                self.nfa.add_transition(start, end, Input::Literal(c));

                Fragment { start, end }
            }
            PostfixToken::Concat => {
                let rhs = self.pop_operand(token, position)?;
                let lhs = self.pop_operand(token, position)?;
                self.nfa.add_transition(lhs.end, rhs.start, Input::Eps);

                Fragment {
                    start: lhs.start,
                    end: rhs.end,
                }
            }
            PostfixToken::Alternation => {
                let rhs = self.pop_operand(token, position)?;
                let lhs = self.pop_operand(token, position)?;
                let start = self.nfa.add_state(false);
                let end = self.nfa.add_state(false);

                self.nfa.add_transition(start, lhs.start, Input::Eps);
                self.nfa.add_transition(start, rhs.start, Input::Eps);
                self.nfa.add_transition(lhs.end, end, Input::Eps);
                self.nfa.add_transition(rhs.end, end, Input::Eps);

                Fragment { start, end }
            }
            PostfixToken::Star => {
                let inner = self.pop_operand(token, position)?;
                let start = self.nfa.add_state(false);
                let end = self.nfa.add_state(false);

                self.nfa.add_transition(inner.end, inner.start, Input::Eps);
                self.nfa.add_transition(start, inner.start, Input::Eps);
                self.nfa.add_transition(start, end, Input::Eps);
                self.nfa.add_transition(inner.end, end, Input::Eps);

                Fragment { start, end }
            }
        };

        self.fragments.push(fragment);

        Ok(())
    }

    fn pop_operand(&mut self, token: PostfixToken, position: usize) -> Result<Fragment, RegexError> {
        self.fragments.pop().ok_or(RegexError::MissingOperand {
            operator: token.as_char(),
            position,
        })
    }

    fn finish(mut self) -> Result<Nfa, RegexError> {
        match self.fragments.len() {
            0 => Err(RegexError::Empty),
            1 => {
                let Fragment { start, end } = self.fragments[0];
                self.nfa.set_final(end, true);
                let nfa = self.nfa.build(start);

                log::debug!("compiled NFA with {} states", nfa.len());

                Ok(nfa)
            }
            count => Err(RegexError::DanglingOperands { count }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Compiler;
    use crate::{fsm::Simulatable, Input, Nfa, Postfix, RegexError};

    fn compile(regex: &str) -> Result<Nfa, RegexError> {
        Compiler::compile(&Postfix::new(regex)?)
    }

    #[test]
    fn literal() {
        let nfa = compile("a").unwrap();

        assert_eq!(nfa.len(), 2);
        assert_eq!(nfa.start_state(), 0);
        assert_eq!(nfa.final_states().collect::<Vec<_>>(), vec![1]);
        assert_eq!(
            nfa.transitions().collect::<Vec<_>>(),
            vec![(0, Input::Literal('a'), 1)]
        );
    }

    #[test]
    fn concat() {
        let nfa = compile("ab").unwrap();

        assert_eq!(nfa.len(), 4);
        assert_eq!(nfa.start_state(), 0);
        assert_eq!(nfa.final_states().collect::<Vec<_>>(), vec![3]);
        assert!(nfa.transitions().any(|t| t == (1, Input::Eps, 2)));
    }

    #[test]
    fn alternation() {
        let nfa = compile("a|b").unwrap();

        assert_eq!(nfa.len(), 6);
        assert_eq!(nfa.start_state(), 4);
        assert_eq!(nfa.final_states().collect::<Vec<_>>(), vec![5]);
        assert_eq!(nfa.transitions().filter(|(_, i, _)| *i == Input::Eps).count(), 4);
    }

    #[test]
    fn star() {
        let nfa = compile("a*").unwrap();

        assert_eq!(nfa.len(), 4);
        assert_eq!(nfa.start_state(), 2);
        assert_eq!(nfa.final_states().collect::<Vec<_>>(), vec![3]);
        assert!(nfa.transitions().any(|t| t == (1, Input::Eps, 0)));
        assert!(nfa.transitions().any(|t| t == (2, Input::Eps, 3)));
    }

    #[test]
    fn exactly_one_final_state() {
        for regex in ["a", "ab|c", "(a|b)*abb", "a**", "((a))"] {
            assert_eq!(compile(regex).unwrap().final_states().count(), 1, "{regex}");
        }
    }

    #[test]
    fn missing_operand() {
        assert_eq!(
            compile("a|"),
            Err(RegexError::MissingOperand {
                operator: '|',
                position: 1
            })
        );
        assert!(matches!(
            compile("*a"),
            Err(RegexError::MissingOperand { operator: '*', .. })
        ));
        assert!(matches!(
            compile("a()"),
            Err(RegexError::MissingOperand { operator: '.', .. })
        ));
    }

    #[test]
    fn empty_group() {
        assert_eq!(compile("()"), Err(RegexError::Empty));
    }

    #[test]
    fn simulate() {
        let nfa = compile("(a|b)*abb").unwrap();

        assert!(nfa.matches("abb"));
        assert!(nfa.matches("babb"));
        assert!(!nfa.matches("ab"));
        assert!(!nfa.matches("abbc"));
    }
}
