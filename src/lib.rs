#![doc = include_str!("../README.md")]

// Required to rename serde
#[cfg(feature = "serde")]
extern crate serde_crate as serde;

use thiserror::Error;

pub mod game;
pub use game::{Game, Hint, NumberRange};

pub mod guesser;
pub use guesser::{BinarySearch, Guesser, Strategy};

pub mod harness;
pub use harness::{play_until_hit, Harness};

pub mod perf;
pub use perf::{Perf, Summary};

mod stats;

#[cfg(test)]
mod mock;

/// A [`Result`](std::result::Result) defaulting to [`GuessError`].
pub type Result<T, E = GuessError> = std::result::Result<T, E>;

/// The errors that `guessing_rs` can produce.
#[derive(Debug, Error)]
pub enum GuessError {
    #[error("game encountered error")]
    Game {
        #[from]
        kind: GameError,
    },

    #[error("general IO error")]
    Printing(#[from] std::io::Error),

    #[error("cannot compare a strategy with itself")]
    SelfComparison,

    #[error("could not run statistics on these samples")]
    Stats,

    #[cfg(feature = "serde")]
    #[error("trouble serializing summary")]
    Serde(#[from] serde_json::Error),

    #[error("the test harness encountered an error")]
    Harness {
        #[from]
        kind: HarnessError,
    },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    /// The lower bound of a range is above its upper bound.
    #[error("the range [{low}, {high}] is empty")]
    InvalidRange { low: i64, high: i64 },

    /// The secret handed to [`Game::new()`] lies outside the game's range.
    #[error("the secret {secret} is outside the range {range}")]
    InvalidSecret { secret: i64, range: NumberRange },

    /// A guess passed to [`Game::evaluate()`] lies outside the game's range.
    ///
    /// Such a guess can never be correct, so it always points at a bug in
    /// the strategy that produced it.
    #[error("the guess {guess} is outside the range {range}")]
    OutOfRangeGuess { guess: i64, range: NumberRange },
}

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("no strategies have been added to the harness")]
    NoStrategiesAdded,

    #[error("a baseline was requested before any strategy was added")]
    NoBaselineCandidate,

    #[error("no ranges have been configured for the harness")]
    NoRangesConfigured,

    #[error("the harness is configured to play zero games per range")]
    NoTrialsConfigured,

    /// A strategy broke the rules of the game while being tested.
    #[error("the strategy {strategy} broke the rules")]
    StrategyFailed {
        strategy: String,
        #[source]
        kind: GameError,
    },
}
