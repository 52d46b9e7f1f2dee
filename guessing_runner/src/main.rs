use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use guessing_rs::{harness::Harness, BinarySearch, NumberRange, Strategy};
use guessing_strategies::{Random, Sequential, SignedSequential};
use log::info;

#[derive(Parser)]
#[command(
    name = "guessing_runner",
    about = "Plays number guessing strategies against each other and compares them",
    version
)]
struct Cli {
    /// Games played on each range
    #[arg(short, long, default_value_t = 500)]
    trials: usize,

    /// Seed for picking secrets, for repeatable runs
    #[arg(short, long)]
    seed: Option<u64>,

    /// Guesses a strategy gets before a game is abandoned
    #[arg(short, long, default_value_t = guessing_rs::harness::DEFAULT_ROUND_LIMIT)]
    limit: u32,

    /// Strategy every other one is compared against
    #[arg(short, long, value_enum, default_value_t = Choice::Binary)]
    baseline: Choice,

    /// Ranges to play on, as LOW:HIGH (defaults to the classic nine)
    #[arg(short, long = "range", value_parser = parse_range)]
    ranges: Vec<NumberRange>,

    /// Hide the progress bar
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
enum Choice {
    Binary,
    Random,
    Sequential,
    Signed,
}

impl Choice {
    fn strategy(self) -> Box<dyn Strategy> {
        match self {
            Choice::Binary => Box::new(BinarySearch),
            Choice::Random => Box::new(Random),
            Choice::Sequential => Box::new(Sequential),
            Choice::Signed => Box::new(SignedSequential),
        }
    }
}

fn parse_range(s: &str) -> Result<NumberRange> {
    let Some((low, high)) = s.split_once(':') else {
        bail!("expected LOW:HIGH, got {s:?}");
    };
    Ok(NumberRange::new(low.trim().parse()?, high.trim().parse()?)?)
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut harness = Harness::new()
        .trials(cli.trials)
        .round_limit(cli.limit)
        .add_baseline(cli.baseline.strategy());

    for choice in Choice::value_variants() {
        if *choice != cli.baseline {
            harness = harness.add_strategy(choice.strategy());
        }
    }
    if !cli.ranges.is_empty() {
        harness = harness.ranges(cli.ranges);
    }
    if let Some(seed) = cli.seed {
        harness = harness.seed(seed);
    }
    harness = if cli.quiet { harness.quiet() } else { harness.verbose() };

    info!("running {} games per range", cli.trials);
    let record = harness.run()?;
    record.print_report()?;

    Ok(())
}
