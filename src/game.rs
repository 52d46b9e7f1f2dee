//! The game itself: the range, the hints, and the host holding the secret.

use std::{cmp::Ordering, fmt::Display};

use rand::Rng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{GameError, Result};

/// An inclusive range of integers that a secret is chosen from.
///
/// Construction is validated, so every instance satisfies `low <= high`.
///
/// # Examples
///
/// ```rust
/// use guessing_rs::NumberRange;
///
/// let range = NumberRange::new(1, 100)?;
/// assert!(range.contains(1) && range.contains(100));
/// assert_eq!(range.width(), 100);
///
/// assert!(NumberRange::new(10, 1).is_err());
/// #
/// # Ok::<_, guessing_rs::GuessError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(
        crate = "serde_crate",
        try_from = "RawRange",
        into = "RawRange"
    )
)]
pub struct NumberRange {
    low: i64,
    high: i64,
}

impl NumberRange {
    /// Creates a new range from its inclusive bounds.
    ///
    /// Returns an error if `low > high`.
    pub fn new(low: i64, high: i64) -> Result<Self> {
        if low <= high {
            Ok(NumberRange { low, high })
        } else {
            Err(GameError::InvalidRange { low, high }.into())
        }
    }

    pub(crate) const fn new_unchecked(low: i64, high: i64) -> Self {
        NumberRange { low, high }
    }

    /// The smallest number in the range.
    pub fn low(&self) -> i64 {
        self.low
    }

    /// The largest number in the range.
    pub fn high(&self) -> i64 {
        self.high
    }

    /// Returns true if `n` lies inside the range.
    pub fn contains(&self, n: i64) -> bool {
        self.low <= n && n <= self.high
    }

    /// The number of integers in the range.
    ///
    /// Saturates at [`u64::MAX`] for the full `i64` range.
    pub fn width(&self) -> u64 {
        self.high.abs_diff(self.low).saturating_add(1)
    }

    /// The most guesses binary search ever needs on this range.
    ///
    /// This is `floor(log2(width)) + 1`, the number of bits in the width.
    /// Unlike [`width()`](Self::width()) it does not saturate.
    /// A range of width two already needs two guesses when the secret is
    /// the upper bound.
    ///
    /// ```rust
    /// # use guessing_rs::NumberRange;
    /// assert_eq!(NumberRange::new(5, 5)?.worst_case_rounds(), 1);
    /// assert_eq!(NumberRange::new(1, 2)?.worst_case_rounds(), 2);
    /// assert_eq!(NumberRange::new(1, 100)?.worst_case_rounds(), 7);
    /// # Ok::<_, guessing_rs::GuessError>(())
    /// ```
    pub fn worst_case_rounds(&self) -> u32 {
        let width = self.high.abs_diff(self.low) as u128 + 1;
        u128::BITS - width.leading_zeros()
    }

    /// Picks a number uniformly from the range.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
        rng.gen_range(self.low..=self.high)
    }
}

impl TryFrom<(i64, i64)> for NumberRange {
    type Error = crate::GuessError;

    fn try_from((low, high): (i64, i64)) -> Result<Self> {
        NumberRange::new(low, high)
    }
}

/// The unvalidated wire form of a [`NumberRange`].
#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
#[serde(crate = "serde_crate")]
struct RawRange {
    low: i64,
    high: i64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawRange> for NumberRange {
    type Error = crate::GuessError;

    fn try_from(raw: RawRange) -> Result<Self> {
        NumberRange::new(raw.low, raw.high)
    }
}

#[cfg(feature = "serde")]
impl From<NumberRange> for RawRange {
    fn from(range: NumberRange) -> Self {
        RawRange {
            low: range.low,
            high: range.high,
        }
    }
}

impl Display for NumberRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.low, self.high)
    }
}

/// The answer a [`Game`] gives to a guess.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub enum Hint {
    /// The secret is lower than the guess.
    Lower,

    /// The secret is higher than the guess.
    Higher,

    /// The guess is the secret.
    Hit,
}

impl Hint {
    /// Builds the hint for a guess given `secret.cmp(&guess)`.
    pub fn from_ordering(secret_vs_guess: Ordering) -> Self {
        match secret_vs_guess {
            Ordering::Less => Hint::Lower,
            Ordering::Greater => Hint::Higher,
            Ordering::Equal => Hint::Hit,
        }
    }
}

impl Display for Hint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            Hint::Lower => '-',
            Hint::Higher => '+',
            Hint::Hit => '!',
        };
        write!(f, "{}", symbol)
    }
}

/// A single round of the guessing game.
///
/// The game owns the secret and is the only thing that can see it. Strategies
/// learn about the secret through the [`Hint`]s returned by
/// [`evaluate()`](Game::evaluate()).
///
/// # Examples
///
/// ```rust
/// use guessing_rs::{Game, Hint, NumberRange};
///
/// let mut game = Game::new(NumberRange::new(1, 10)?, 1)?;
///
/// assert!(game.evaluate(0).is_err());
/// assert_eq!(game.evaluate(5)?, Hint::Lower);
/// assert_eq!(game.evaluate(1)?, Hint::Hit);
/// assert_eq!(game.rounds_played(), 2);
/// #
/// # Ok::<_, guessing_rs::GuessError>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Game {
    range: NumberRange,
    secret: i64,
    rounds: u32,
    last_hint: Option<Hint>,
}

impl Game {
    /// Creates a new game with a chosen secret.
    ///
    /// Returns an error if the secret lies outside `range`.
    pub fn new(range: NumberRange, secret: i64) -> Result<Self> {
        if !range.contains(secret) {
            return Err(GameError::InvalidSecret { secret, range }.into());
        }

        Ok(Game {
            range,
            secret,
            rounds: 0,
            last_hint: None,
        })
    }

    /// Creates a new game whose secret is drawn uniformly from `range`.
    pub fn with_random_secret<R: Rng + ?Sized>(range: NumberRange, rng: &mut R) -> Self {
        Game {
            range,
            secret: range.sample(rng),
            rounds: 0,
            last_hint: None,
        }
    }

    /// Compares `guess` to the secret and returns a hint about it.
    ///
    /// Every accepted guess counts as one round. A guess outside the range
    /// is rejected with [`GameError::OutOfRangeGuess`] and does not count.
    pub fn evaluate(&mut self, guess: i64) -> Result<Hint> {
        if !self.range.contains(guess) {
            return Err(GameError::OutOfRangeGuess {
                guess,
                range: self.range,
            }
            .into());
        }

        self.rounds += 1;
        let hint = Hint::from_ordering(self.secret.cmp(&guess));
        self.last_hint = Some(hint);
        Ok(hint)
    }

    /// The range the secret was chosen from.
    pub fn range(&self) -> NumberRange {
        self.range
    }

    /// The number of guesses evaluated so far.
    pub fn rounds_played(&self) -> u32 {
        self.rounds
    }

    /// The hint given for the most recent guess, if any.
    pub fn last_hint(&self) -> Option<Hint> {
        self.last_hint
    }

    /// Returns true once the secret has been guessed.
    pub fn is_over(&self) -> bool {
        self.last_hint == Some(Hint::Hit)
    }
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::GuessError;

    fn range() -> impl Strategy<Value = NumberRange> {
        (-1_000_i64..1_000, 0_i64..500)
            .prop_map(|(low, len)| NumberRange::new_unchecked(low, low + len))
    }

    fn range_and_secret() -> impl Strategy<Value = (NumberRange, i64)> {
        range().prop_flat_map(|r| (Just(r), r.low()..=r.high()))
    }

    #[test]
    fn empty_range_is_rejected() {
        assert!(matches!(
            NumberRange::new(3, 2),
            Err(GuessError::Game {
                kind: GameError::InvalidRange { low: 3, high: 2 }
            })
        ));
        assert!(NumberRange::try_from((7, 7)).is_ok());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserializing_validates_bounds() -> Result<()> {
        let range: NumberRange = serde_json::from_str(r#"{"low":1,"high":5}"#)?;
        assert_eq!(range, NumberRange::new(1, 5)?);
        assert_eq!(serde_json::to_string(&range)?, r#"{"low":1,"high":5}"#);

        assert!(serde_json::from_str::<NumberRange>(r#"{"low":5,"high":1}"#).is_err());
        Ok(())
    }

    #[test]
    fn width_and_bound() -> Result<()> {
        assert_eq!(NumberRange::new(-10, 4)?.width(), 15);
        assert_eq!(NumberRange::new(i64::MIN, i64::MAX)?.width(), u64::MAX);
        assert_eq!(NumberRange::new(1, 3)?.worst_case_rounds(), 2);
        assert_eq!(NumberRange::new(1, 4)?.worst_case_rounds(), 3);
        assert_eq!(NumberRange::new(0, 1023)?.worst_case_rounds(), 11);
        Ok(())
    }

    #[test]
    fn secret_outside_range() -> Result<()> {
        let range = NumberRange::new(1, 10)?;
        for secret in [0, 11, i64::MIN, i64::MAX] {
            assert!(matches!(
                Game::new(range, secret),
                Err(GuessError::Game {
                    kind: GameError::InvalidSecret { .. }
                })
            ));
        }
        Ok(())
    }

    #[test]
    fn guess_below_range_then_hit() -> Result<()> {
        let mut game = Game::new(NumberRange::new(1, 10)?, 1)?;

        assert!(matches!(
            game.evaluate(0),
            Err(GuessError::Game {
                kind: GameError::OutOfRangeGuess { guess: 0, .. }
            })
        ));
        assert_eq!(game.rounds_played(), 0);
        assert_eq!(game.last_hint(), None);

        assert_eq!(game.evaluate(1)?, Hint::Hit);
        assert_eq!(game.rounds_played(), 1);
        assert!(game.is_over());
        Ok(())
    }

    #[test]
    fn last_hint_tracks_state() -> Result<()> {
        let mut game = Game::new(NumberRange::new(0, 9)?, 4)?;
        assert!(!game.is_over());
        game.evaluate(9)?;
        assert_eq!(game.last_hint(), Some(Hint::Lower));
        game.evaluate(0)?;
        assert_eq!(game.last_hint(), Some(Hint::Higher));
        assert!(!game.is_over());
        Ok(())
    }

    #[test]
    fn random_secret_is_in_range() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(7);
        let range = NumberRange::new(-25, -1)?;
        for _ in 0..200 {
            let mut game = Game::with_random_secret(range, &mut rng);
            let hits = (range.low()..=range.high())
                .filter(|&g| matches!(game.evaluate(g), Ok(Hint::Hit)))
                .count();
            assert_eq!(hits, 1);
        }
        Ok(())
    }

    #[test]
    fn hint_symbols() {
        assert_eq!(Hint::Lower.to_string(), "-");
        assert_eq!(Hint::Higher.to_string(), "+");
        assert_eq!(Hint::Hit.to_string(), "!");
    }

    proptest! {
        #[test]
        fn hints_match_ordering((range, secret) in range_and_secret(), offset in 0_i64..500) {
            let guess = range.low() + offset % range.width() as i64;
            let mut game = Game::new(range, secret)?;
            let hint = game.evaluate(guess)?;

            prop_assert_eq!(hint == Hint::Hit, guess == secret);
            prop_assert_eq!(hint == Hint::Lower, secret < guess);
            prop_assert_eq!(hint == Hint::Higher, secret > guess);
        }

        #[test]
        fn out_of_range_always_rejected(
            (range, secret) in range_and_secret(),
            distance in 1_i64..1_000
        ) {
            let mut game = Game::new(range, secret)?;
            let below = game.evaluate(range.low() - distance);
            let above = game.evaluate(range.high() + distance);

            let is_out_of_range = |r: &Result<Hint>| {
                matches!(
                    r,
                    Err(GuessError::Game {
                        kind: GameError::OutOfRangeGuess { .. }
                    })
                )
            };
            prop_assert!(is_out_of_range(&below));
            prop_assert!(is_out_of_range(&above));
            prop_assert_eq!(game.rounds_played(), 0);
        }

        #[test]
        fn evaluating_never_changes_range_or_secret(
            (range, secret) in range_and_secret(),
            guesses in prop::collection::vec(-1_500_i64..1_500, 0..50)
        ) {
            let mut game = Game::new(range, secret)?;
            let mut accepted = 0;
            for guess in guesses {
                if game.evaluate(guess).is_ok() {
                    accepted += 1;
                }
            }

            prop_assert_eq!(game.range(), range);
            prop_assert_eq!(game.rounds_played(), accepted);
            prop_assert_eq!(game.evaluate(secret)?, Hint::Hit);
        }
    }
}
