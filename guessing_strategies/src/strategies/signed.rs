use std::fmt::Display;

use guessing_rs::{Guesser, Hint, NumberRange, Strategy};

/// A strategy that starts in the middle of the range and walks toward the
/// secret one step at a time.
///
/// It uses the direction of each hint but not what the hint rules out, so
/// it needs up to about half the width of the range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SignedSequential;

impl Strategy for SignedSequential {
    fn start(&self, range: NumberRange) -> Box<dyn Guesser> {
        Box::new(SignedSequentialGuesser::new(range))
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }
}

impl Display for SignedSequential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "guessing_strategies::SignedSequential")
    }
}

/// The per-game state of [`SignedSequential`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SignedSequentialGuesser {
    current: i64,
}

impl Guesser for SignedSequentialGuesser {
    /// Creates a guesser that starts at `floor((low + high) / 2)`.
    fn new(range: NumberRange) -> Self {
        let middle = (range.low() as i128 + range.high() as i128).div_euclid(2);
        SignedSequentialGuesser {
            current: middle as i64,
        }
    }

    fn generate_guess(&mut self) -> i64 {
        self.current
    }

    fn receive_hint(&mut self, hint: Hint) {
        match hint {
            Hint::Lower => self.current -= 1,
            Hint::Higher => self.current += 1,
            Hint::Hit => {}
        }
    }
}
