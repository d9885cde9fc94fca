/// Finite-state machine run, consuming input one character at a time.
pub trait Simulate {
    /// Returns whether the finite-state machine is in an accepting configuration.
    fn is_accepting(&self) -> bool;

    /// Feeds a single character to the finite-state machine. Returns `false` when no transition
    /// exists for it, after which every continuation is rejected.
    fn feed(&mut self, input: char) -> bool;

    /// Simulates the finite-state machine from start to finish and returns whether it accepts the
    /// input.
    fn run(mut self, input: &str) -> bool
    where
        Self: Sized,
    {
        input.chars().all(|c| self.feed(c)) && self.is_accepting()
    }
}

/// Finite-state machine which can be simulated.
pub trait Simulatable {
    type Simulator<'a>: Simulate
    where
        Self: 'a;

    /// Returns a simulator positioned at the start state.
    fn to_simulator(&self) -> Self::Simulator<'_>;

    /// Returns whether the finite-state machine accepts the entire input.
    fn matches(&self, input: &str) -> bool {
        self.to_simulator().run(input)
    }
}
