use std::fmt::Display;

use guessing_rs::{Guesser, Hint, NumberRange, Strategy};

/// A strategy that counts up from the bottom of the range.
///
/// It ignores the hints, so it takes `secret - low + 1` guesses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Sequential;

impl Strategy for Sequential {
    fn start(&self, range: NumberRange) -> Box<dyn Guesser> {
        Box::new(SequentialGuesser::new(range))
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }
}

impl Display for Sequential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "guessing_strategies::Sequential")
    }
}

/// The per-game state of [`Sequential`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SequentialGuesser {
    next: i64,
}

impl Guesser for SequentialGuesser {
    /// Creates a guesser that starts at the bottom of `range`.
    fn new(range: NumberRange) -> Self {
        SequentialGuesser { next: range.low() }
    }

    fn generate_guess(&mut self) -> i64 {
        self.next
    }

    fn receive_hint(&mut self, hint: Hint) {
        // Only a miss moves on; the secret is above the guess, so this
        // cannot overflow.
        if hint != Hint::Hit {
            self.next += 1;
        }
    }
}
