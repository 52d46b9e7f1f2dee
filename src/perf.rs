//! Evaluating and comparing strategies.

use std::{fmt::Display, io::Write, ops::Deref};

use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use fishers_exact::{fishers_exact, FishersExactPvalues};
use itertools::{Itertools, MinMaxResult};
use owo_colors::{AnsiColors, OwoColorize, Stream};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    game::NumberRange,
    guesser::Strategy,
    stats::WelchsT,
    GuessError, Result,
};

const ALPHA: f64 = 0.05;

/// The games one strategy played on one range.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct RangePerf {
    range: NumberRange,
    rounds: Vec<u32>,
    missed: u32,
}

impl RangePerf {
    pub(crate) fn new(range: NumberRange) -> Self {
        RangePerf {
            range,
            rounds: Vec::new(),
            missed: 0,
        }
    }

    /// Records one game: `Some(rounds)` if it ended in a hit, `None` if the
    /// strategy ran into the round limit.
    pub(crate) fn record(&mut self, outcome: Option<u32>) {
        match outcome {
            Some(rounds) => self.rounds.push(rounds),
            None => self.missed += 1,
        }
    }

    /// Gets the range these games were played on.
    pub fn range(&self) -> NumberRange {
        self.range
    }

    /// Gets the number of rounds each finished game took.
    pub fn rounds(&self) -> &[u32] {
        &self.rounds
    }

    /// Gets the number of games played on this range.
    pub fn num_tried(&self) -> u32 {
        self.rounds.len() as u32 + self.missed
    }

    /// Gets the number of games that ended in a hit.
    pub fn num_finished(&self) -> u32 {
        self.rounds.len() as u32
    }

    /// Gets the number of games abandoned at the round limit.
    pub fn num_missed(&self) -> u32 {
        self.missed
    }

    /// Gets the average number of rounds over the finished games.
    pub fn mean_rounds(&self) -> Option<f32> {
        if self.rounds.is_empty() {
            None
        } else {
            Some(self.rounds.iter().map(|&r| r as f32).sum::<f32>() / self.rounds.len() as f32)
        }
    }

    /// Gets the fewest and the most rounds any finished game took.
    pub fn min_max_rounds(&self) -> Option<(u32, u32)> {
        match self.rounds.iter().copied().minmax() {
            MinMaxResult::NoElements => None,
            MinMaxResult::OneElement(r) => Some((r, r)),
            MinMaxResult::MinMax(min, max) => Some((min, max)),
        }
    }

    /// Returns true if no game took longer than binary search could.
    pub fn within_bound(&self) -> bool {
        let bound = self.range.worst_case_rounds();
        self.missed == 0 && self.rounds.iter().all(|&r| r <= bound)
    }
}

/// A record of one strategy's games after run by the
/// [test harness](crate::Harness).
///
/// This struct can provide statistics about the games on its own, but it
/// is recommended to produce [`Summary`] first to cache the computations.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Perf {
    strategy_name: String,
    ranges: Vec<RangePerf>,
}

impl Perf {
    /// Creates a new empty performance record.
    pub(crate) fn new(strat: &dyn Strategy, ranges: &[NumberRange]) -> Self {
        Perf {
            strategy_name: format!("{} v{}", strat, strat.version()),
            ranges: ranges.iter().copied().map(RangePerf::new).collect(),
        }
    }

    pub(crate) fn record(&mut self, range_index: usize, outcome: Option<u32>) {
        self.ranges[range_index].record(outcome);
    }

    /// Gets the name of the strategy that produced this performance record.
    pub fn strategy_name(&self) -> &str {
        &self.strategy_name
    }

    /// Gets the games grouped by the range they were played on.
    pub fn ranges(&self) -> &[RangePerf] {
        &self.ranges
    }

    /// Gets the number of games played by the strategy.
    pub fn num_tried(&self) -> u32 {
        self.ranges.iter().map(RangePerf::num_tried).sum()
    }

    /// Gets the number of games that ended in a hit.
    pub fn num_finished(&self) -> u32 {
        self.ranges.iter().map(RangePerf::num_finished).sum()
    }

    /// Gets the number of games abandoned at the round limit.
    pub fn num_missed(&self) -> u32 {
        self.num_tried() - self.num_finished()
    }

    /// Gets the fraction of games that ended in a hit.
    pub fn frac_finished(&self) -> f32 {
        (self.num_finished() as f32) / (self.num_tried() as f32)
    }

    /// Gets the number of rounds across all finished games.
    pub fn cumulative_rounds(&self) -> u64 {
        self.ranges
            .iter()
            .flat_map(|r| r.rounds.iter())
            .map(|&r| r as u64)
            .sum()
    }

    /// Gets the average number of rounds needed to hit.
    ///
    /// This does not include games the strategy abandoned.
    pub fn mean_rounds(&self) -> f32 {
        (self.cumulative_rounds() as f32) / (self.num_finished() as f32)
    }

    /// Prints the strategy's summary and then a table breaking its games
    /// down by range.
    pub fn print(&self) -> Result<()> {
        let summary = self.to_summary();
        summary.print(Summary::print_options().ranges(true))
    }

    /// Converts this performance record to a pre-calculated summary.
    pub fn to_summary(&self) -> Summary {
        let rows = self
            .ranges
            .iter()
            .map(|r| {
                let (min_rounds, max_rounds) = match r.min_max_rounds() {
                    Some((min, max)) => (Some(min), Some(max)),
                    None => (None, None),
                };
                RangeRow {
                    range: r.range,
                    num_tried: r.num_tried(),
                    num_missed: r.num_missed(),
                    mean_rounds: r.mean_rounds(),
                    min_rounds,
                    max_rounds,
                    bound: r.range.worst_case_rounds(),
                }
            })
            .collect();

        let histogram: Histogram = self
            .ranges
            .iter()
            .flat_map(|r| r.rounds.iter().copied())
            .collect();
        debug_assert_eq!(histogram.iter().sum::<u32>(), self.num_finished());

        Summary {
            strategy_name: &self.strategy_name,
            num_tried: self.num_tried(),
            num_finished: self.num_finished(),
            cumulative_rounds: self.cumulative_rounds(),
            rows,
            histogram,
        }
    }
}

impl Display for Perf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_summary())
    }
}

/// One line of a [`Summary`]: how a strategy did on one range.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub struct RangeRow {
    pub range: NumberRange,
    pub num_tried: u32,
    pub num_missed: u32,
    pub mean_rounds: Option<f32>,
    pub min_rounds: Option<u32>,
    pub max_rounds: Option<u32>,
    /// The worst case of binary search on this range.
    pub bound: u32,
}

/// A summary of a strategy's performance generated by the
/// [test harness](crate::Harness).
///
/// It is recommended to convert the [`Perf`] struct to this via the
/// [`Perf::to_summary()`] method when you want to use the performance to run
/// statistics.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub struct Summary<'a> {
    strategy_name: &'a str,
    num_tried: u32,
    num_finished: u32,
    cumulative_rounds: u64,
    rows: Vec<RangeRow>,
    histogram: Histogram,
}

impl<'a> Summary<'a> {
    /// Gets the name of the strategy that produced this performance record.
    pub fn strategy_name(&self) -> &'a str {
        self.strategy_name
    }

    /// Gets the number of games played by the strategy.
    pub fn num_tried(&self) -> u32 {
        self.num_tried
    }

    /// Gets the number of games that ended in a hit.
    pub fn num_finished(&self) -> u32 {
        self.num_finished
    }

    /// Gets the number of games abandoned at the round limit.
    pub fn num_missed(&self) -> u32 {
        self.num_tried - self.num_finished
    }

    /// Gets the fraction of games that ended in a hit.
    pub fn frac_finished(&self) -> f32 {
        (self.num_finished as f32) / (self.num_tried as f32)
    }

    /// Gets the number of rounds across all finished games.
    pub fn cumulative_rounds(&self) -> u64 {
        self.cumulative_rounds
    }

    /// Gets the average number of rounds needed to hit.
    pub fn mean_rounds(&self) -> f32 {
        (self.cumulative_rounds as f32) / (self.num_finished as f32)
    }

    /// Gets the per-range breakdown, in the order the ranges were configured.
    pub fn rows(&self) -> &[RangeRow] {
        &self.rows
    }

    /// Gets how many finished games took each number of rounds.
    pub fn histogram(&self) -> &Histogram {
        &self.histogram
    }

    /// Runs the statistical comparison of this summary against `baseline`.
    ///
    /// Fails with [`GuessError::SelfComparison`] if the two are the same.
    pub fn compare<'b>(&self, baseline: &Summary<'b>) -> Result<Comparison<'a, 'b>> {
        if self == baseline {
            return Err(GuessError::SelfComparison);
        }

        Ok(Comparison::compare(self.clone(), baseline.clone()))
    }

    /// Renders the summary as pretty-printed JSON.
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Builds a table with one row per range.
    pub fn table(&self) -> Table {
        let mut table = Table::new();
        if !table.is_tty() {
            table.set_table_width(80);
        } else {
            table.load_preset(UTF8_FULL);
        }
        table.set_header(vec!["range", "games", "missed", "mean", "min", "max", "bound"]);

        let or_dash = |v: Option<u32>| v.map_or_else(|| "-".to_string(), |v| v.to_string());
        for row in &self.rows {
            let mut max = Cell::new(or_dash(row.max_rounds));
            if matches!(row.max_rounds, Some(m) if m > row.bound) {
                max = max.fg(Color::Red);
            }
            let mut missed = Cell::new(row.num_missed);
            if row.num_missed > 0 {
                missed = missed.fg(Color::Red);
            }

            table.add_row(vec![
                Cell::new(row.range),
                Cell::new(row.num_tried),
                missed,
                Cell::new(
                    row.mean_rounds
                        .map_or_else(|| "-".to_string(), |m| format!("{:.2}", m)),
                ),
                Cell::new(or_dash(row.min_rounds)),
                max,
                Cell::new(row.bound),
            ]);
        }

        table
    }

    /// Prints the summary to stdout.
    ///
    /// What is printed besides the totals is controlled by `options`; see
    /// [`print_options()`](Self::print_options()).
    pub fn print(&self, options: SummaryPrintOptions) -> Result<()> {
        let mut stdout = std::io::stdout();
        writeln!(stdout, "{:-^80}", self.strategy_name)?;

        match options.compare {
            Some(baseline) => {
                let comparison = self.compare(&baseline)?;

                writeln!(
                    stdout,
                    "Played {} games and comp. with {}, {} games",
                    self.num_tried(),
                    baseline.strategy_name(),
                    baseline.num_tried()
                )?;

                if comparison.finished_significant() {
                    writeln!(
                        stdout,
                        "Hit {} times, or {:.1}% ({:+.1}%), and gave up {} times, {}",
                        self.num_finished(),
                        self.frac_finished() * 100.,
                        (comparison.frac_finished_diff() * 100.).if_supports_color(
                            Stream::Stdout,
                            |text| {
                                if comparison.frac_finished_diff().is_sign_positive() {
                                    text.color(AnsiColors::Green)
                                } else {
                                    text.color(AnsiColors::Red)
                                }
                            }
                        ),
                        self.num_missed(),
                        "a sig. diff.".if_supports_color(Stream::Stdout, |text| text.bold())
                    )?;
                } else {
                    writeln!(
                        stdout,
                        "Hit {} times, or {:.1}% ({:+.1}%), and gave up {} times, not a sig. diff.",
                        self.num_finished(),
                        self.frac_finished() * 100.,
                        comparison.frac_finished_diff() * 100.,
                        self.num_missed()
                    )?;
                }

                if comparison.rounds_significant() {
                    writeln!(
                        stdout,
                        "Hits took {:.2} ({:+.2}) rounds on average, {}",
                        self.mean_rounds(),
                        comparison
                            .mean_rounds_diff()
                            .if_supports_color(Stream::Stdout, |text| {
                                if comparison.mean_rounds_diff().is_sign_negative() {
                                    text.color(AnsiColors::Green)
                                } else {
                                    text.color(AnsiColors::Red)
                                }
                            }),
                        "a sig. diff.".if_supports_color(Stream::Stdout, |text| text.bold())
                    )?;
                } else {
                    writeln!(
                        stdout,
                        "Hits took {:.2} ({:+.2}) rounds on average, not a sig. diff.",
                        self.mean_rounds(),
                        comparison.mean_rounds_diff(),
                    )?;
                }
            }
            None => {
                writeln!(stdout, "Played {} games", self.num_tried())?;
                writeln!(
                    stdout,
                    "Hit {} times, or {:.1}%, and gave up {} times",
                    self.num_finished(),
                    self.frac_finished() * 100.,
                    self.num_missed()
                )?;
                writeln!(
                    stdout,
                    "Hits took {:.2} rounds on average",
                    self.mean_rounds()
                )?;
            }
        }

        if options.ranges {
            writeln!(stdout, "{}", self.table())?;
        }

        if options.histogram {
            write!(stdout, "{}", self.histogram)?;
        }

        Ok(())
    }

    /// Starts a set of options for [`print()`](Self::print()), with nothing
    /// extra switched on.
    pub fn print_options() -> SummaryPrintOptions<'a> {
        SummaryPrintOptions::default()
    }
}

/// What [`Summary::print()`] shows besides the totals.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SummaryPrintOptions<'a> {
    compare: Option<Summary<'a>>,
    histogram: bool,
    ranges: bool,
}

impl<'a> SummaryPrintOptions<'a> {
    /// Creates options that print only the totals.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compares against `baseline` and marks the significant differences.
    pub fn compare(self, baseline: &Summary<'a>) -> Self {
        Self {
            compare: Some(baseline.clone()),
            ..self
        }
    }

    /// Prints a bar chart of how many rounds the hits took.
    pub fn histogram(self, histogram: bool) -> Self {
        Self { histogram, ..self }
    }

    /// Prints the table breaking the games down by range.
    pub fn ranges(self, ranges: bool) -> Self {
        Self { ranges, ..self }
    }
}

impl<'a> Display for Summary<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{:-^80}", self.strategy_name)?;
        writeln!(f, "Played {} games", self.num_tried())?;

        writeln!(
            f,
            "Hit {} times, or {:.1}%, and gave up {} times",
            self.num_finished(),
            self.frac_finished() * 100.,
            self.num_missed()
        )?;

        writeln!(f, "Hits took {:.2} rounds on average", self.mean_rounds())?;

        Ok(())
    }
}

/// A strategy's [`Summary`] held up against a baseline's.
///
/// The fraction of games finished is compared with Fisher's exact test and
/// the number of rounds with Welch's t-test. Either test is skipped when the
/// samples do not support it.
#[derive(Debug, Clone)]
pub struct Comparison<'a, 'b> {
    this: Summary<'a>,
    baseline: Summary<'b>,
    finished: Option<FishersExactPvalues>,
    rounds: Option<WelchsT<f64>>,
}

impl<'a, 'b> Comparison<'a, 'b> {
    pub fn compare(this: Summary<'a>, baseline: Summary<'b>) -> Self {
        let rounds = WelchsT::two_sample(
            this.histogram.samples(),
            baseline.histogram.samples(),
            ALPHA,
        )
        .ok();

        let finished = fishers_exact(&[
            this.num_finished(),
            baseline.num_finished(),
            this.num_missed(),
            baseline.num_missed(),
        ])
        .ok();

        Self {
            this,
            baseline,
            finished,
            rounds,
        }
    }

    pub fn tries_eq(&self) -> bool {
        self.this.num_tried == self.baseline.num_tried
    }

    pub fn finished_significant(&self) -> bool {
        matches!(&self.finished, Some(f) if f.two_tail_pvalue < ALPHA)
    }

    pub fn rounds_significant(&self) -> bool {
        matches!(&self.rounds, Some(t) if t.is_significant())
    }

    /// The p-value of the test on mean rounds, if it could be run.
    pub fn rounds_p_value(&self) -> Option<f64> {
        self.rounds.as_ref().map(|t| t.p)
    }

    pub fn num_missed_diff(&self) -> Option<i64> {
        if self.tries_eq() {
            Some(self.this.num_missed() as i64 - self.baseline.num_missed() as i64)
        } else {
            None
        }
    }

    pub fn frac_finished_diff(&self) -> f32 {
        self.this.frac_finished() - self.baseline.frac_finished()
    }

    pub fn mean_rounds_diff(&self) -> f32 {
        self.this.mean_rounds() - self.baseline.mean_rounds()
    }
}

/// How many finished games took each number of rounds.
///
/// The first bin counts games won on the first guess, the second bin games
/// won on the second, and so on.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub struct Histogram {
    bins: Vec<u32>,
}

impl Histogram {
    fn samples(&self) -> impl Iterator<Item = f64> + Clone + '_ {
        self.bins
            .iter()
            .enumerate()
            .flat_map(|(i, &n)| std::iter::repeat((i + 1) as f64).take(n as usize))
    }
}

impl FromIterator<u32> for Histogram {
    fn from_iter<T: IntoIterator<Item = u32>>(iter: T) -> Self {
        let mut bins = Vec::new();
        for rounds in iter.into_iter().filter(|&r| r > 0) {
            let i = rounds as usize - 1;
            if bins.len() <= i {
                bins.resize(i + 1, 0);
            }
            bins[i] += 1;
        }
        Histogram { bins }
    }
}

impl Deref for Histogram {
    type Target = [u32];

    fn deref(&self) -> &Self::Target {
        &self.bins
    }
}

impl Display for Histogram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let max = match self.iter().max() {
            Some(&max) if max > 0 => max,
            _ => return Ok(()),
        };
        let label = self.bins.len().to_string().len();
        let digits = max.to_string().len();
        // "label |" + " (count)" must fit in 80 columns alongside the bar
        let count_per_mark = (max as f32 / (80 - label - digits - 5) as f32).max(1.0);

        for (i, &bin) in self.bins.iter().enumerate().filter(|(_, bin)| **bin > 0) {
            write!(f, "{:>label$} |", i + 1)?;
            let marks = (bin as f32 / count_per_mark).floor() as usize;
            writeln!(f, "{:■>marks$} ({})", "", bin)?;
        }

        Ok(())
    }
}
