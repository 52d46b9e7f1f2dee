use std::fmt::Display;

use guessing_rs::{Guesser, Hint, NumberRange, Strategy};
use rand::{rngs::StdRng, SeedableRng};

/// A strategy that guesses a random number every turn.
///
/// It remembers nothing and ignores every hint, so it can guess the same
/// wrong number over and over. On a range of width `W` it needs `W` guesses
/// on average.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Random;

impl Strategy for Random {
    fn start(&self, range: NumberRange) -> Box<dyn Guesser> {
        Box::new(RandomGuesser::new(range))
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }
}

impl Display for Random {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "guessing_strategies::Random")
    }
}

/// The per-game state of [`Random`]: just a random number generator.
#[derive(Debug, Clone)]
pub struct RandomGuesser {
    range: NumberRange,
    rng: StdRng,
}

impl RandomGuesser {
    /// Creates a guesser drawing from the given generator.
    pub fn with_rng(range: NumberRange, rng: StdRng) -> Self {
        RandomGuesser { range, rng }
    }
}

impl Guesser for RandomGuesser {
    /// Creates a guesser drawing from entropy.
    fn new(range: NumberRange) -> Self {
        Self::with_rng(range, StdRng::from_entropy())
    }

    fn generate_guess(&mut self) -> i64 {
        self.range.sample(&mut self.rng)
    }

    fn receive_hint(&mut self, _hint: Hint) {}
}

#[cfg(test)]
mod test {
    use guessing_rs::{play_until_hit, Game};

    use super::*;

    #[test]
    fn guesses_stay_in_range() -> guessing_rs::Result<()> {
        let range = NumberRange::new(-10, 4)?;
        let mut guesser = RandomGuesser::with_rng(range, StdRng::seed_from_u64(11));
        for _ in 0..1_000 {
            let guess = guesser.generate_guess();
            assert!(range.contains(guess));
            guesser.receive_hint(Hint::Lower);
        }
        Ok(())
    }

    #[test]
    fn eventually_hits() -> guessing_rs::Result<()> {
        let range = NumberRange::new(0, 39)?;
        for secret in [0, 17, 39] {
            let mut game = Game::new(range, secret)?;
            let mut guesser = RandomGuesser::with_rng(range, StdRng::seed_from_u64(secret as u64));
            assert!(play_until_hit(&mut game, &mut guesser, 10_000)?.is_some());
        }
        Ok(())
    }
}
