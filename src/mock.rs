use std::fmt::Display;

use crate::{Guesser, Hint, NumberRange, Strategy};

/// A strategy that replays a fixed list of guesses, then repeats the last one.
#[derive(Debug, Clone)]
pub(crate) struct Mock {
    guesses: Option<Vec<i64>>,
}

impl Mock {
    pub(crate) fn new(guesses: impl Into<Option<Vec<i64>>>) -> Self {
        Self {
            guesses: guesses.into(),
        }
    }
}

impl Strategy for Mock {
    fn start(&self, range: NumberRange) -> Box<dyn Guesser> {
        let guesses = match &self.guesses {
            None => return Box::new(MockGuesser::new(range)),
            Some(v) => v.clone(),
        };

        Box::new(MockGuesser { guesses, next: 0 })
    }

    fn version(&self) -> &'static str {
        "1.2.4"
    }
}

impl Display for Mock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Mock {:?}", self.guesses)
    }
}

#[derive(Debug)]
struct MockGuesser {
    guesses: Vec<i64>,
    next: usize,
}

impl Guesser for MockGuesser {
    fn new(range: NumberRange) -> Self {
        MockGuesser {
            guesses: vec![range.low()],
            next: 0,
        }
    }

    fn generate_guess(&mut self) -> i64 {
        let guess = self.guesses[self.next.min(self.guesses.len() - 1)];
        self.next += 1;
        guess
    }

    fn receive_hint(&mut self, _hint: Hint) {}
}
