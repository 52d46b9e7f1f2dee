//! Tools for defining guessing strategies.
//!
//! A strategy is split in two halves. The [`Strategy`] is the configured,
//! shareable description that the [test harness](crate::Harness) holds on to.
//! Each time a game starts, the strategy builds a fresh [`Guesser`] for that
//! game's range, and the guesser carries whatever it believes about the
//! secret until the game ends.

use std::fmt::{Debug, Display};

use crate::game::{Hint, NumberRange};

pub mod binary;
pub use binary::{BinarySearch, BinarySearchGuesser};

/// The player side of one game.
///
/// Guessers are driven in strict alternation: one call to
/// [`generate_guess()`](Guesser::generate_guess()), then exactly one call to
/// [`receive_hint()`](Guesser::receive_hint()) with the hint for that guess,
/// and so on until the hint is [`Hint::Hit`]. Asking for another guess after
/// a hit is a bug in the caller.
///
/// # Examples
///
/// A guesser that walks down from the top of the range:
///
/// ```rust
/// use guessing_rs::{Guesser, Hint, NumberRange};
///
/// #[derive(Debug)]
/// struct Countdown {
///     next: i64,
/// }
///
/// impl Guesser for Countdown {
///     fn new(range: NumberRange) -> Self {
///         Countdown { next: range.high() }
///     }
///
///     fn generate_guess(&mut self) -> i64 {
///         self.next
///     }
///
///     fn receive_hint(&mut self, hint: Hint) {
///         if hint == Hint::Lower {
///             self.next -= 1;
///         }
///     }
/// }
///
/// let mut guesser = Countdown::new(NumberRange::new(1, 3)?);
/// assert_eq!(guesser.generate_guess(), 3);
/// guesser.receive_hint(Hint::Lower);
/// assert_eq!(guesser.generate_guess(), 2);
/// #
/// # Ok::<_, guessing_rs::GuessError>(())
/// ```
pub trait Guesser: Debug {
    /// Sets up the belief about the secret for a game played on `range`,
    /// before the first guess is requested.
    fn new(range: NumberRange) -> Self
    where
        Self: Sized;

    /// Produces the next guess.
    ///
    /// The guess must always lie inside the range the guesser was built for.
    fn generate_guess(&mut self) -> i64;

    /// Learns from the hint the game gave for the most recent guess.
    fn receive_hint(&mut self, hint: Hint);
}

/// Trait defining a guessing strategy.
///
/// To write a strategy, define a [`Guesser`] that holds the per-game state,
/// then a small struct implementing this trait that builds one for each game.
/// The test harness uses [`Display`] to format the name of the strategy, so
/// do not use linebreaks.
///
/// ```rust
/// use std::fmt::Display;
///
/// use guessing_rs::{Guesser, Hint, NumberRange, Strategy};
///
/// #[derive(Debug)]
/// struct Lowest {
///     next: i64,
/// }
///
/// impl Guesser for Lowest {
///     fn new(range: NumberRange) -> Self {
///         Lowest { next: range.low() }
///     }
///
///     fn generate_guess(&mut self) -> i64 {
///         self.next
///     }
///
///     fn receive_hint(&mut self, _hint: Hint) {
///         self.next += 1;
///     }
/// }
///
/// #[derive(Debug)]
/// struct Counting;
///
/// impl Strategy for Counting {
///     fn start(&self, range: NumberRange) -> Box<dyn Guesser> {
///         Box::new(Lowest::new(range))
///     }
///
///     fn version(&self) -> &'static str {
///         "0.1.0"
///     }
/// }
///
/// impl Display for Counting {
///     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
///         write!(f, "Counting")
///     }
/// }
/// ```
pub trait Strategy: Display + Debug + Sync {
    /// Builds a fresh guesser for a game played on `range`.
    fn start(&self, range: NumberRange) -> Box<dyn Guesser>;

    /// Provides a version for this strategy.
    ///
    /// You should ensure that this changes each time you update the logic of
    /// the strategy in order to produce meaningful comparisons.
    fn version(&self) -> &'static str;
}
