use self::{
    table::{Action, Lr0, ParseTable, ReducePolicy, Slr1},
    trace::{Step, StepAction, StepError, Trace},
};
use crate::{
    cfsm::{Cfsm, StateId},
    FirstSets, FollowSets, Grammar, GrammarError, ParseVariantError, Terminal,
};

use std::{fmt::Display, str::FromStr};

pub(crate) mod table;
pub(crate) mod trace;

/// Flavour of the generated parser.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Variant {
    /// Complete items reduce on every lookahead, the symbol stack starts empty.
    #[default]
    Lr0,
    /// Complete items reduce on the FOLLOW set of their head, the symbol stack starts with the
    /// end marker.
    Slr1,
}

/// Parser generated from a [`Grammar`]: its canonical collection, parse table and, for
/// [`Variant::Slr1`], the FIRST and FOLLOW sets the table was built from.
#[derive(Debug, Clone)]
pub struct Parser {
    variant: Variant,
    grammar: Grammar,
    cfsm: Cfsm,
    first_follow: Option<(FirstSets, FollowSets)>,
    table: ParseTable,
}

impl Parser {
    pub fn new(grammar: Grammar, variant: Variant) -> Self {
        let cfsm = Cfsm::from_grammar(&grammar);

        let (first_follow, table) = match variant {
            Variant::Lr0 => (None, Self::build_table(&grammar, &cfsm, &Lr0)),
            Variant::Slr1 => {
                let first = FirstSets::new(&grammar);
                let follow = FollowSets::new(&grammar, &first);
                let table = Self::build_table(&grammar, &cfsm, &Slr1 { follow: &follow });
                (Some((first, follow)), table)
            }
        };

        Self {
            variant,
            grammar,
            cfsm,
            first_follow,
            table,
        }
    }

    /// Reads the grammar from text and generates the parser.
    pub fn from_text(text: &str, variant: Variant) -> Result<Self, GrammarError> {
        Ok(Self::new(text.parse()?, variant))
    }

    fn build_table(grammar: &Grammar, cfsm: &Cfsm, policy: &dyn ReducePolicy) -> ParseTable {
        let table = ParseTable::new(grammar, cfsm, policy);
        log::debug!("built parse table with {} states", table.len());
        table
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn cfsm(&self) -> &Cfsm {
        &self.cfsm
    }

    pub fn table(&self) -> &ParseTable {
        &self.table
    }

    /// FIRST sets, only computed for [`Variant::Slr1`].
    pub fn first_sets(&self) -> Option<&FirstSets> {
        self.first_follow.as_ref().map(|(first, _)| first)
    }

    /// FOLLOW sets, only computed for [`Variant::Slr1`].
    pub fn follow_sets(&self) -> Option<&FollowSets> {
        self.first_follow.as_ref().map(|(_, follow)| follow)
    }

    /// Simulates the parser on whitespace separated input tokens. The end marker is appended
    /// implicitly.
    ///
    /// Rejections are recorded as the last step of the [`Trace`] instead of being returned as
    /// errors.
    pub fn parse(&self, input: &str) -> Trace {
        let input = input
            .split_whitespace()
            .map(Terminal::from)
            .chain(std::iter::once(Terminal::Eof))
            .collect::<Vec<_>>();

        let mut states = vec![self.cfsm.start_state()];
        let mut symbols = self.variant.initial_symbols();
        let mut position = 0;
        let mut steps = Vec::new();

        // reductions since the last shift
        let mut reductions = 0;
        let mut reduction_limit = self.reduction_limit(states.len());

        let accepted = loop {
            let action = match input.get(position) {
                None => StepAction::Error(StepError::UnexpectedEnd),
                Some(_) if reductions > reduction_limit => {
                    StepAction::Error(StepError::ReductionCycle)
                }
                Some(lookahead) => {
                    let state = *states.last().expect("state stack is never empty");
                    self.next_action(state, lookahead)
                }
            };

            let step = Step {
                number: steps.len() + 1,
                states: states.clone(),
                symbols: symbols.clone(),
                input: input.get(position..).unwrap_or_default().to_vec(),
                action: action.clone(),
            };
            log::trace!("{step}");
            steps.push(step);

            match action {
                StepAction::Shift(dest_state) => {
                    states.push(dest_state);
                    symbols.push(input[position].to_string());
                    position += 1;

                    reductions = 0;
                    reduction_limit = self.reduction_limit(states.len());
                }
                StepAction::Reduce { production, .. } => {
                    let dest_state = self.reduce(production, &mut states, &mut symbols);
                    states.push(dest_state);
                    reductions += 1;
                }
                StepAction::Accept => break true,
                StepAction::Error(_) => break false,
            }
        };

        Trace::new(steps, accepted)
    }

    /// Upper bound on the reductions between two shifts. Every grammar without a derivation
    /// `A =>+ A` stays far below it.
    fn reduction_limit(&self, depth: usize) -> usize {
        (depth + 1) * (self.cfsm.len() + self.grammar.productions().len())
    }

    fn next_action(&self, state: StateId, lookahead: &Terminal) -> StepAction {
        if !self.grammar.is_terminal(lookahead) {
            return StepAction::Error(StepError::InvalidSymbol);
        }

        match self.table.action(state, lookahead) {
            None => StepAction::Error(StepError::NoAction),
            Some(Action::Shift(dest_state)) => StepAction::Shift(dest_state),
            Some(Action::Reduce(production)) => StepAction::Reduce {
                production,
                rule: self.grammar.production(production).compact(),
            },
            Some(Action::Accept) => StepAction::Accept,
        }
    }

    /// Pops the body of the production off both stacks, pushes its head and returns the GOTO
    /// target of the exposed state. Epsilon productions pop nothing.
    fn reduce(
        &self,
        production: usize,
        states: &mut Vec<StateId>,
        symbols: &mut Vec<String>,
    ) -> StateId {
        let production = self.grammar.production(production);
        let arity = production.arity();

        states.truncate(
            states
                .len()
                .checked_sub(arity)
                .expect("state stack holds the body being reduced"),
        );
        symbols.truncate(symbols.len().saturating_sub(arity));
        symbols.push(production.head().to_string());

        let exposed_state = *states.last().expect("state stack is never empty");
        self.table
            .goto(exposed_state, production.head())
            .expect("could not find variable in goto table")
    }
}

impl Variant {
    fn initial_symbols(&self) -> Vec<String> {
        match self {
            Variant::Lr0 => Vec::new(),
            Variant::Slr1 => vec![Terminal::Eof.to_string()],
        }
    }
}

impl FromStr for Variant {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lr0" | "lr(0)" => Ok(Variant::Lr0),
            "slr1" | "slr(1)" | "slr" => Ok(Variant::Slr1),
            _ => Err(ParseVariantError(s.to_string())),
        }
    }
}

impl Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Variant::Lr0 => write!(f, "LR(0)"),
            Variant::Slr1 => write!(f, "SLR(1)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Parser, StepAction, StepError, Variant};
    use crate::{ParseVariantError, Terminal};

    const EXPRESSIONS: &str = "E -> E + T | T\nT -> ( E ) | a";

    fn actions(parser: &Parser, input: &str) -> Vec<String> {
        parser
            .parse(input)
            .steps()
            .iter()
            .map(|step| step.action.to_string())
            .collect()
    }

    #[test]
    fn accept_lr0() {
        let parser = Parser::from_text(EXPRESSIONS, Variant::Lr0).unwrap();
        let trace = parser.parse("a + a");

        assert!(trace.accepted());
        assert_eq!(
            actions(&parser, "a + a"),
            vec![
                "shift 4",
                "reduce T->a",
                "reduce E->T",
                "shift 5",
                "shift 4",
                "reduce T->a",
                "reduce E->E+T",
                "accept"
            ]
        );
    }

    #[test]
    fn accept_slr1() {
        let parser = Parser::from_text(EXPRESSIONS, Variant::Slr1).unwrap();
        let trace = parser.parse("( a + a ) + a");

        assert!(trace.accepted());
        assert_eq!(trace.last().unwrap().action, StepAction::Accept);
    }

    #[test]
    fn stack_snapshots() {
        let parser = Parser::from_text(EXPRESSIONS, Variant::Slr1).unwrap();
        let trace = parser.parse("a");
        let steps = trace.steps();

        assert_eq!(steps[0].number, 1);
        assert_eq!(steps[0].states, vec![0]);
        assert_eq!(steps[0].symbols, vec!["#"]);
        assert_eq!(steps[0].input, vec![Terminal::from("a"), Terminal::Eof]);

        assert_eq!(steps[1].states, vec![0, 4]);
        assert_eq!(steps[1].symbols, vec!["#", "a"]);
        assert_eq!(steps[1].input, vec![Terminal::Eof]);

        // after `T -> a` and `E -> T`
        assert_eq!(steps[3].states, vec![0, 1]);
        assert_eq!(steps[3].symbols, vec!["#", "E"]);
        assert_eq!(steps[3].action, StepAction::Accept);
    }

    #[test]
    fn lr0_symbol_stack_starts_empty() {
        let parser = Parser::from_text(EXPRESSIONS, Variant::Lr0).unwrap();
        let trace = parser.parse("a");

        assert!(trace.steps()[0].symbols.is_empty());
    }

    #[test]
    fn invalid_symbol() {
        let parser = Parser::from_text(EXPRESSIONS, Variant::Slr1).unwrap();
        let trace = parser.parse("a * a");

        assert!(!trace.accepted());
        assert_eq!(
            trace.last().unwrap().action,
            StepAction::Error(StepError::InvalidSymbol)
        );
        assert_eq!(trace.last().unwrap().action.to_string(), "error (invalid symbol)");
    }

    #[test]
    fn no_action() {
        let parser = Parser::from_text(EXPRESSIONS, Variant::Slr1).unwrap();
        let trace = parser.parse("a a");

        assert!(!trace.accepted());
        assert_eq!(
            trace.last().unwrap().action,
            StepAction::Error(StepError::NoAction)
        );
    }

    #[test]
    fn empty_input_rejected() {
        let parser = Parser::from_text(EXPRESSIONS, Variant::Slr1).unwrap();
        let trace = parser.parse("");

        assert!(!trace.accepted());
        assert_eq!(trace.steps().len(), 1);
        assert_eq!(trace.steps()[0].input, vec![Terminal::Eof]);
    }

    #[test]
    fn epsilon_reduce_pops_nothing() {
        let parser = Parser::from_text("S -> A b\nA -> ε", Variant::Slr1).unwrap();
        let trace = parser.parse("b");
        let steps = trace.steps();

        assert!(trace.accepted());
        assert_eq!(steps[0].action.to_string(), "reduce A->ε");
        // the reduce only pushes the goto target on top of the untouched stacks
        assert_eq!(steps[1].states[..steps[0].states.len()], steps[0].states[..]);
        assert_eq!(steps[1].states.len(), steps[0].states.len() + 1);
        assert_eq!(steps[1].symbols, vec!["#", "A"]);
    }

    #[test]
    fn shift_reduce_conflict_keeps_shift() {
        // `E -> T • * E` and `E -> T •` share a state, LR(0) keeps the shift on `*`
        let text = "E -> T * E | T\nT -> a";
        for variant in [Variant::Lr0, Variant::Slr1] {
            let parser = Parser::from_text(text, variant).unwrap();
            assert!(parser.parse("a * a").accepted(), "{variant}");
            assert!(!parser.parse("a *").accepted(), "{variant}");
        }
    }

    #[test]
    fn reduction_cycle_is_rejected() {
        // `S -> A -> S` lets LR(0) reduce forever on any lookahead but the end marker
        let parser = Parser::from_text("S -> A\nA -> S | a", Variant::Lr0).unwrap();

        assert!(parser.parse("a").accepted());

        let trace = parser.parse("a a");
        assert!(!trace.accepted());
        assert_eq!(
            trace.last().unwrap().action,
            StepAction::Error(StepError::ReductionCycle)
        );
    }

    #[test]
    fn first_follow_only_for_slr1() {
        let lr0 = Parser::from_text(EXPRESSIONS, Variant::Lr0).unwrap();
        let slr1 = Parser::from_text(EXPRESSIONS, Variant::Slr1).unwrap();

        assert!(lr0.first_sets().is_none());
        assert!(slr1.follow_sets().unwrap().get("E").unwrap().contains(&Terminal::Eof));
    }

    #[test]
    fn variant_from_str() {
        assert_eq!("lr0".parse::<Variant>(), Ok(Variant::Lr0));
        assert_eq!("SLR1".parse::<Variant>(), Ok(Variant::Slr1));
        assert_eq!(
            "lalr".parse::<Variant>(),
            Err(ParseVariantError("lalr".to_string()))
        );
    }
}
