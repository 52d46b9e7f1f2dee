//! Binary search, the reference strategy every other strategy is measured
//! against.

use std::fmt::Display;

use crate::{
    game::{Hint, NumberRange},
    guesser::{Guesser, Strategy},
};

/// A strategy that always guesses the middle of what is still possible.
///
/// No strategy does better in the worst case: on a range of width `W` it
/// never needs more than [`NumberRange::worst_case_rounds()`] guesses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BinarySearch;

impl Strategy for BinarySearch {
    fn start(&self, range: NumberRange) -> Box<dyn Guesser> {
        Box::new(BinarySearchGuesser::new(range))
    }

    fn version(&self) -> &'static str {
        "1.0.0"
    }
}

impl Display for BinarySearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "guessing_rs::BinarySearch")
    }
}

/// Where a [`BinarySearchGuesser`] is in the guess/hint cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// The next call must be [`generate_guess()`](Guesser::generate_guess()).
    AwaitingGuess,

    /// A guess was made and the next call must be
    /// [`receive_hint()`](Guesser::receive_hint()).
    AwaitingHint,

    /// The secret was hit; the guesser takes no further calls.
    Terminated,
}

/// The per-game state of [`BinarySearch`].
///
/// The guesser keeps an inclusive interval `[lo, hi]` that always contains
/// the secret. Each guess is the midpoint `lo + (hi - lo) / 2`, rounded
/// down, and each hint removes the guess and everything on the wrong side of
/// it.
///
/// # Panics
///
/// The guess/hint cycle is enforced: asking for a guess while a hint is
/// outstanding or after a hit, or handing over a hint nobody asked for,
/// panics.
///
/// # Examples
///
/// ```rust
/// use guessing_rs::{guesser::BinarySearchGuesser, Guesser, Hint, NumberRange};
///
/// let mut guesser = BinarySearchGuesser::new(NumberRange::new(1, 100)?);
/// assert_eq!(guesser.generate_guess(), 50);
/// guesser.receive_hint(Hint::Lower);
/// assert_eq!(guesser.belief(), (1, 49));
/// assert_eq!(guesser.generate_guess(), 25);
/// #
/// # Ok::<_, guessing_rs::GuessError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BinarySearchGuesser {
    lo: i64,
    hi: i64,
    last_guess: i64,
    phase: Phase,
}

impl BinarySearchGuesser {
    /// The interval `(lo, hi)` the secret is still known to be in.
    pub fn belief(&self) -> (i64, i64) {
        (self.lo, self.hi)
    }

    /// Where the guesser is in the guess/hint cycle.
    pub fn phase(&self) -> Phase {
        self.phase
    }
}

// Computed in i128 so that ranges wider than i64::MAX do not overflow.
fn midpoint(lo: i64, hi: i64) -> i64 {
    let (lo, hi) = (lo as i128, hi as i128);
    (lo + (hi - lo) / 2) as i64
}

impl Guesser for BinarySearchGuesser {
    /// Creates a guesser that believes the secret could be anywhere in `range`.
    fn new(range: NumberRange) -> Self {
        BinarySearchGuesser {
            lo: range.low(),
            hi: range.high(),
            last_guess: range.low(),
            phase: Phase::AwaitingGuess,
        }
    }

    fn generate_guess(&mut self) -> i64 {
        assert_eq!(
            self.phase,
            Phase::AwaitingGuess,
            "a guess was requested out of turn"
        );

        self.last_guess = midpoint(self.lo, self.hi);
        self.phase = Phase::AwaitingHint;
        self.last_guess
    }

    fn receive_hint(&mut self, hint: Hint) {
        assert_eq!(
            self.phase,
            Phase::AwaitingHint,
            "a hint arrived without a guess"
        );

        self.phase = match hint {
            Hint::Lower => {
                self.hi = self.last_guess - 1;
                Phase::AwaitingGuess
            }
            Hint::Higher => {
                self.lo = self.last_guess + 1;
                Phase::AwaitingGuess
            }
            Hint::Hit => Phase::Terminated,
        };
    }
}
