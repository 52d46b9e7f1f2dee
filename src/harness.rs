//! The test harness for running guessing strategies.

use std::ops::Deref;

use indicatif::ParallelProgressIterator;
use log::{debug, trace, warn};
use rand::{rngs::StdRng, SeedableRng};
use rayon::prelude::*;

use crate::{
    game::{Game, Hint, NumberRange},
    guesser::{Guesser, Strategy},
    perf::Perf,
    GuessError, HarnessError, Result, Summary,
};

/// The ranges the harness tests on unless told otherwise.
pub const DEFAULT_RANGES: [NumberRange; 9] = [
    NumberRange::new_unchecked(3, 4),
    NumberRange::new_unchecked(10, 15),
    NumberRange::new_unchecked(0, 9),
    NumberRange::new_unchecked(-10, 4),
    NumberRange::new_unchecked(100, 119),
    NumberRange::new_unchecked(-25, -1),
    NumberRange::new_unchecked(1000, 1029),
    NumberRange::new_unchecked(0, 39),
    NumberRange::new_unchecked(-100, -51),
];

/// How many guesses a strategy gets before a game is abandoned.
pub const DEFAULT_ROUND_LIMIT: u32 = 10_000;

/// Plays one game to the end.
///
/// Asks `guesser` for a guess, has `game` evaluate it, and hands the hint
/// back, until the hint is [`Hint::Hit`] or `limit` guesses have been made.
/// Returns the number of rounds the game took, or `None` if the guesser
/// ran out of guesses.
///
/// A guess outside the game's range stops the game with
/// [`GameError::OutOfRangeGuess`](crate::GameError::OutOfRangeGuess).
///
/// # Examples
///
/// ```rust
/// use guessing_rs::{guesser::BinarySearchGuesser, play_until_hit, Game, Guesser, NumberRange};
///
/// let range = NumberRange::new(1, 100)?;
/// let mut game = Game::new(range, 24)?;
/// let mut guesser = BinarySearchGuesser::new(range);
///
/// assert_eq!(play_until_hit(&mut game, &mut guesser, 100)?, Some(7));
/// assert!(game.is_over());
/// #
/// # Ok::<_, guessing_rs::GuessError>(())
/// ```
pub fn play_until_hit<G: Guesser + ?Sized>(
    game: &mut Game,
    guesser: &mut G,
    limit: u32,
) -> Result<Option<u32>> {
    for _ in 0..limit {
        let guess = guesser.generate_guess();
        let hint = game.evaluate(guess)?;
        trace!("{}? {}", guess, hint);
        guesser.receive_hint(hint);

        if hint == Hint::Hit {
            return Ok(Some(game.rounds_played()));
        }
    }

    Ok(None)
}

/// A test harness that can run many strategies on many games.
///
/// When you want to test your strategies, create a new test harness
/// with [`new()`](Harness::new()). You can then configure it using various
/// methods. Note that these configuration methods consume the existing
/// [`Harness`] and return a new one.
///
/// Every strategy plays the same secrets, so their results can be compared
/// game for game. Each game gets its own [`Game`] and its own
/// [`Guesser`], and games run in parallel.
///
/// # Examples
///
/// ```rust
/// # use guessing_rs::harness::Harness;
/// use guessing_rs::BinarySearch;
///
/// let harness = Harness::new()
///     .quiet()
///     .add_strategy(Box::new(BinarySearch))
///     .trials(50)
///     .seed(42);
///
/// let record = harness.run()?;
/// assert_eq!(record[0].num_tried(), 50 * 9);
/// #
/// # Ok::<_, guessing_rs::GuessError>(())
/// ```
#[derive(Debug)]
pub struct Harness {
    strategies: Vec<Box<dyn Strategy>>,
    ranges: Vec<NumberRange>,
    trials: usize,
    round_limit: u32,
    seed: Option<u64>,
    verbose: bool,
    baseline: Option<usize>,
    orphan_baseline: bool,
}

impl Default for Harness {
    fn default() -> Self {
        Harness {
            strategies: Vec::new(),
            ranges: DEFAULT_RANGES.to_vec(),
            trials: 500,
            round_limit: DEFAULT_ROUND_LIMIT,
            seed: None,
            verbose: false,
            baseline: None,
            orphan_baseline: false,
        }
    }
}

impl Harness {
    /// Creates a new test harness with default configuration.
    ///
    /// Defaults:
    /// 1. tests no strategies
    /// 2. quiet mode
    /// 3. plays 500 games on each of [`DEFAULT_RANGES`]
    /// 4. gives up on a game after [`DEFAULT_ROUND_LIMIT`] guesses
    /// 5. picks secrets from entropy
    /// 6. does not compare against a baseline
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the harness verbose while testing.
    ///
    /// As of right now, this consists of a progress bar and nothing else.
    pub fn verbose(self) -> Self {
        Harness {
            verbose: true,
            ..self
        }
    }

    /// Makes the harness silent while testing.
    pub fn quiet(self) -> Self {
        Harness {
            verbose: false,
            ..self
        }
    }

    /// Adds a strategy to the harness for testing.
    pub fn add_strategy(self, strat: Box<dyn Strategy>) -> Self {
        let mut strategies = self.strategies;
        strategies.push(strat);
        Harness { strategies, ..self }
    }

    /// Adds a [`Vec`] of strategies to the harness for testing.
    pub fn add_strategies(self, strats: Vec<Box<dyn Strategy>>) -> Self {
        let mut strategies = self.strategies;
        strategies.extend(strats);
        Harness { strategies, ..self }
    }

    /// Adds a strategy to the harness for testing and sets it as the baseline
    /// for comparison.
    pub fn add_baseline(self, strat: Box<dyn Strategy>) -> Self {
        self.add_strategy(strat).and_baseline()
    }

    /// Sets the most recently added strategy as the baseline for comparisons.
    ///
    /// Calling this before any strategy is added makes [`run()`](Self::run())
    /// fail with [`HarnessError::NoBaselineCandidate`].
    pub fn and_baseline(self) -> Self {
        match self.strategies.len().checked_sub(1) {
            Some(i) => Harness {
                baseline: Some(i),
                ..self
            },
            None => Harness {
                orphan_baseline: true,
                ..self
            },
        }
    }

    /// Replaces the ranges the harness plays on.
    pub fn ranges(self, ranges: impl IntoIterator<Item = NumberRange>) -> Self {
        Harness {
            ranges: ranges.into_iter().collect(),
            ..self
        }
    }

    /// Sets the number of games played on each range.
    ///
    /// Zero makes [`run()`](Self::run()) fail with
    /// [`HarnessError::NoTrialsConfigured`].
    pub fn trials(self, trials: usize) -> Self {
        Harness { trials, ..self }
    }

    /// Sets how many guesses a strategy gets before a game is abandoned.
    pub fn round_limit(self, round_limit: u32) -> Self {
        Harness {
            round_limit,
            ..self
        }
    }

    /// Picks the secrets from a seeded generator so runs can be repeated.
    pub fn seed(self, seed: u64) -> Self {
        Harness {
            seed: Some(seed),
            ..self
        }
    }

    /// Chooses the secret of every game, grouped with the index of its range.
    fn secrets(&self) -> Vec<(usize, i64)> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut secrets = Vec::with_capacity(self.ranges.len() * self.trials);
        for (i, range) in self.ranges.iter().enumerate() {
            for _ in 0..self.trials {
                secrets.push((i, range.sample(&mut rng)));
            }
        }
        secrets
    }

    /// Runs the harness and produces performances for each strategy.
    ///
    /// The [`Perf`]s will be in the same order as the strategies were added
    /// to the harness.
    pub fn run(&self) -> Result<Record> {
        if self.strategies.is_empty() {
            return Err(HarnessError::NoStrategiesAdded.into());
        }
        if self.orphan_baseline {
            return Err(HarnessError::NoBaselineCandidate.into());
        }
        if self.ranges.is_empty() {
            return Err(HarnessError::NoRangesConfigured.into());
        }
        if self.trials == 0 {
            return Err(HarnessError::NoTrialsConfigured.into());
        }

        let secrets = self.secrets();
        let mut perfs = Vec::with_capacity(self.strategies.len());

        for strategy in &self.strategies {
            debug!("playing {} games with {}", secrets.len(), strategy);

            let play = |&(i, secret): &(usize, i64)| {
                self.run_inner(strategy.as_ref(), self.ranges[i], secret)
                    .map(|outcome| (i, outcome))
            };
            let outcomes = if self.verbose {
                secrets
                    .par_iter()
                    .progress_count(secrets.len() as u64)
                    .map(play)
                    .collect::<Result<Vec<_>>>()?
            } else {
                secrets.par_iter().map(play).collect::<Result<Vec<_>>>()?
            };

            let mut perf = Perf::new(strategy.as_ref(), &self.ranges);
            for (i, outcome) in outcomes {
                perf.record(i, outcome);
            }

            if perf.num_missed() > 0 {
                warn!(
                    "{} gave up on {} of {} games after {} guesses",
                    strategy,
                    perf.num_missed(),
                    perf.num_tried(),
                    self.round_limit
                );
            }
            perfs.push(perf);
        }

        Ok(Record::new(perfs, self.baseline))
    }

    fn run_inner(
        &self,
        strategy: &dyn Strategy,
        range: NumberRange,
        secret: i64,
    ) -> Result<Option<u32>> {
        let mut game = Game::new(range, secret)?;
        let mut guesser = strategy.start(range);

        play_until_hit(&mut game, guesser.as_mut(), self.round_limit).map_err(|e| match e {
            GuessError::Game { kind } => {
                debug!("{} failed on {}: {}", strategy, range, kind);
                HarnessError::StrategyFailed {
                    strategy: strategy.to_string(),
                    kind,
                }
                .into()
            }
            other => other,
        })
    }

    /// Runs the harness (see [`run()`](Harness::run())) and prints performance
    /// summaries of each strategy.
    pub fn run_and_summarize(&self) -> Result<Record> {
        let record = self.run()?;
        for perf in record.iter() {
            println!("{}", perf);
        }
        Ok(record)
    }
}

/// The performances produced by one run of the [`Harness`].
#[derive(Debug, Clone, Default)]
pub struct Record {
    perfs: Vec<Perf>,
    baseline: Option<usize>,
}

impl Deref for Record {
    type Target = [Perf];

    fn deref(&self) -> &Self::Target {
        &self.perfs
    }
}

impl Record {
    fn new(perfs: Vec<Perf>, baseline: impl Into<Option<usize>>) -> Self {
        Self {
            perfs,
            baseline: baseline.into(),
        }
    }

    /// Gets the performance every other strategy is compared against.
    pub fn baseline(&self) -> Option<&Perf> {
        self.baseline.map(|n| &self.perfs[n])
    }

    /// Prints a summary of every strategy to stdout.
    ///
    /// When a baseline was set, every other strategy is compared against it.
    pub fn print_report(&self) -> Result<()> {
        if let Some(baseline) = self.baseline() {
            let baseline_summary = baseline.to_summary();

            for perf in self.perfs.iter() {
                let summary = perf.to_summary();
                match summary.print(
                    Summary::print_options()
                        .compare(&baseline_summary)
                        .ranges(true)
                        .histogram(true),
                ) {
                    Ok(()) => {}
                    Err(GuessError::SelfComparison) => {
                        summary.print(Summary::print_options().ranges(true).histogram(true))?
                    }
                    Err(e) => return Err(e),
                }
            }
        } else {
            for perf in self.perfs.iter() {
                let summary = perf.to_summary();
                summary.print(Summary::print_options().ranges(true).histogram(true))?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{guesser::BinarySearchGuesser, mock::Mock, BinarySearch, GameError};

    #[test]
    fn play_scenarios() -> Result<()> {
        let cases = [((1, 100), 24, 7), ((5, 5), 5, 1), ((1, 2), 2, 2), ((1, 2), 1, 1)];
        for ((low, high), secret, rounds) in cases {
            let range = NumberRange::new(low, high)?;
            let mut game = Game::new(range, secret)?;
            let mut guesser = BinarySearchGuesser::new(range);
            assert_eq!(play_until_hit(&mut game, &mut guesser, 100)?, Some(rounds));
            assert_eq!(game.rounds_played(), rounds);
        }
        Ok(())
    }

    fn play_fresh<G: Guesser>(range: NumberRange, secret: i64) -> Result<Option<u32>> {
        let mut game = Game::new(range, secret)?;
        play_until_hit(&mut game, &mut G::new(range), 100)
    }

    #[test]
    fn guessers_built_from_a_range() -> Result<()> {
        let range = NumberRange::new(-8, 7)?;
        assert_eq!(play_fresh::<BinarySearchGuesser>(range, -1)?, Some(1));
        assert_eq!(play_fresh::<BinarySearchGuesser>(range, 7)?, Some(5));
        Ok(())
    }

    #[test]
    fn play_gives_up_at_limit() -> Result<()> {
        let range = NumberRange::new(0, 9)?;
        let mut game = Game::new(range, 9)?;
        let mut guesser = Mock::new(vec![0]).start(range);
        assert_eq!(play_until_hit(&mut game, guesser.as_mut(), 25)?, None);
        assert_eq!(game.rounds_played(), 25);
        assert!(!game.is_over());
        Ok(())
    }

    #[test]
    fn play_reports_out_of_range() -> Result<()> {
        let range = NumberRange::new(1, 10)?;
        let mut game = Game::new(range, 1)?;
        let mut guesser = Mock::new(vec![5, 0, 1]).start(range);
        assert!(matches!(
            play_until_hit(&mut game, guesser.as_mut(), 10),
            Err(GuessError::Game {
                kind: GameError::OutOfRangeGuess { guess: 0, .. }
            })
        ));
        assert_eq!(game.rounds_played(), 1);
        Ok(())
    }

    #[test]
    fn empty_harness() {
        assert!(matches!(
            Harness::new().run(),
            Err(GuessError::Harness {
                kind: HarnessError::NoStrategiesAdded
            })
        ));
    }

    #[test]
    fn baseline_before_strategies() {
        let harness = Harness::new()
            .and_baseline()
            .add_strategy(Box::new(BinarySearch));
        assert!(matches!(
            harness.run(),
            Err(GuessError::Harness {
                kind: HarnessError::NoBaselineCandidate
            })
        ));
    }

    #[test]
    fn no_ranges() {
        let harness = Harness::new()
            .add_strategy(Box::new(BinarySearch))
            .ranges(Vec::new());
        assert!(matches!(
            harness.run(),
            Err(GuessError::Harness {
                kind: HarnessError::NoRangesConfigured
            })
        ));
    }

    #[test]
    fn zero_trials() {
        let harness = Harness::new()
            .add_baseline(Box::new(BinarySearch))
            .trials(0);
        assert!(matches!(
            harness.run(),
            Err(GuessError::Harness {
                kind: HarnessError::NoTrialsConfigured
            })
        ));
    }

    #[test]
    fn report_prints_with_and_without_baseline() -> Result<()> {
        let harness = Harness::new()
            .add_strategy(Box::new(Mock::new(vec![0, 1, 2, 3])))
            .add_strategy(Box::new(BinarySearch))
            .ranges([NumberRange::new(0, 3)?])
            .trials(20)
            .seed(2)
            .quiet();

        harness.run()?.print_report()?;
        harness.and_baseline().run()?.print_report()?;
        Ok(())
    }

    #[test]
    fn binary_search_stays_within_bound() -> Result<()> {
        let record = Harness::new()
            .add_strategy(Box::new(BinarySearch))
            .trials(200)
            .seed(1)
            .run()?;

        assert_eq!(record.len(), 1);
        let perf = &record[0];
        assert_eq!(perf.num_tried(), 200 * DEFAULT_RANGES.len() as u32);
        assert_eq!(perf.num_missed(), 0);
        for range in perf.ranges() {
            assert!(range.within_bound(), "{:?}", range);
        }
        Ok(())
    }

    #[test]
    fn same_secrets_for_every_strategy() -> Result<()> {
        let record = Harness::new()
            .add_baseline(Box::new(BinarySearch))
            .add_strategy(Box::new(BinarySearch))
            .ranges([NumberRange::new(-50, 50)?])
            .trials(100)
            .seed(9)
            .run()?;

        let mut first = record[0].ranges()[0].rounds().to_vec();
        let mut second = record[1].ranges()[0].rounds().to_vec();
        first.sort_unstable();
        second.sort_unstable();
        assert_eq!(first, second);
        assert_eq!(record.baseline(), Some(&record[0]));
        Ok(())
    }

    #[test]
    fn seeded_runs_repeat() -> Result<()> {
        let harness = Harness::new()
            .add_strategy(Box::new(Mock::new(vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9])))
            .ranges([NumberRange::new(0, 9)?])
            .trials(50)
            .seed(3);

        let mut a = harness.run()?[0].ranges()[0].rounds().to_vec();
        let mut b = harness.run()?[0].ranges()[0].rounds().to_vec();
        a.sort_unstable();
        b.sort_unstable();
        assert_eq!(a, b);
        Ok(())
    }

    #[test]
    fn misses_are_counted() -> Result<()> {
        let record = Harness::new()
            .add_strategy(Box::new(Mock::new(vec![0])))
            .ranges([NumberRange::new(0, 0)?, NumberRange::new(1, 1)?])
            .trials(10)
            .round_limit(3)
            .run();

        // The mock guesses 0, which is outside the second range.
        assert!(matches!(
            record,
            Err(GuessError::Harness {
                kind: HarnessError::StrategyFailed {
                    kind: GameError::OutOfRangeGuess { guess: 0, .. },
                    ..
                }
            })
        ));

        let record = Harness::new()
            .add_strategy(Box::new(Mock::new(vec![0])))
            .ranges([NumberRange::new(0, 0)?, NumberRange::new(0, 1)?])
            .trials(40)
            .round_limit(3)
            .seed(5)
            .run()?;

        let perf = &record[0];
        assert_eq!(perf.ranges()[0].num_missed(), 0);
        assert_eq!(perf.ranges()[0].rounds(), &[1; 40][..]);
        assert_eq!(
            perf.ranges()[1].num_finished() + perf.ranges()[1].num_missed(),
            40
        );
        assert!(perf.ranges()[1].rounds().iter().all(|&r| r == 1));
        Ok(())
    }
}
