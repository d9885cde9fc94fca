use crate::{cfsm::StateId, Terminal};

use std::fmt::Display;

/// Step-by-step record of a parse simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trace {
    steps: Vec<Step>,
    accepted: bool,
}

/// Configuration of the parser before an action, along with the action taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Step number, starting at `1`.
    pub number: usize,
    pub states: Vec<StateId>,
    pub symbols: Vec<String>,
    /// Remaining input, including the current lookahead.
    pub input: Vec<Terminal>,
    pub action: StepAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepAction {
    Shift(StateId),
    Reduce {
        production: usize,
        /// The production in compact form, e.g. `E->E+T`.
        rule: String,
    },
    Accept,
    Error(StepError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepError {
    /// The lookahead is not a terminal of the grammar.
    InvalidSymbol,
    /// The ACTION cell for the lookahead is empty.
    NoAction,
    /// The input ran out before the parser accepted.
    UnexpectedEnd,
    /// The parser kept reducing without consuming input, only possible for cyclic grammars.
    ReductionCycle,
}

impl Trace {
    pub(crate) fn new(steps: Vec<Step>, accepted: bool) -> Self {
        Self { steps, accepted }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Whether the last step is an accept.
    pub fn accepted(&self) -> bool {
        self.accepted
    }

    pub fn last(&self) -> Option<&Step> {
        self.steps.last()
    }
}

impl Display for StepError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepError::InvalidSymbol => write!(f, "invalid symbol"),
            StepError::NoAction => write!(f, "no action"),
            StepError::UnexpectedEnd => write!(f, "unexpected end of input"),
            StepError::ReductionCycle => write!(f, "reduction cycle"),
        }
    }
}

impl Display for StepAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepAction::Shift(state) => write!(f, "shift {state}"),
            StepAction::Reduce { rule, .. } => write!(f, "reduce {rule}"),
            StepAction::Accept => write!(f, "accept"),
            StepAction::Error(error) => write!(f, "error ({error})"),
        }
    }
}

impl Step {
    fn columns(&self) -> [String; 5] {
        [
            self.number.to_string(),
            join(&self.states),
            join(&self.symbols),
            join(&self.input),
            self.action.to_string(),
        ]
    }
}

fn join<T: Display>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

impl Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.columns().join(" | "))
    }
}

impl Display for Trace {
    /// Renders the trace as a table with aligned columns.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let header = ["Step", "States", "Symbols", "Input", "Action"].map(String::from);
        let rows = std::iter::once(header)
            .chain(self.steps.iter().map(Step::columns))
            .collect::<Vec<_>>();

        let mut widths = [0; 5];
        for row in rows.iter() {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        for row in rows.iter() {
            let line = row
                .iter()
                .zip(widths)
                .map(|(cell, width)| format!("{cell:<width$}"))
                .collect::<Vec<_>>()
                .join("  ");
            writeln!(f, "{}", line.trim_end())?;
        }

        Ok(())
    }
}
