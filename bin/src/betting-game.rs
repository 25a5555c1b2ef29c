use anyhow::{anyhow, Result};
use betting_game_driver::{
    CandidateOrder, CandidateSource, Driver, DriverConfig, NarrowingDriver, Progress, Search,
    SearchDriver, SearchSummary,
};
use betting_game_solvers::elimination::{
    dedupe, sort_results, Triple, TurnPolicy, Value, VerifierStrategy,
};
use clap::{ArgAction, Parser, ValueEnum};
use serde::Serialize;
use tracing::Level;

/// Arguments for the `betting-game` binary.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Verbosity level (0-4)
    #[arg(long, short, help = "Verbosity level (0-4)", action = ArgAction::Count, env = "VERBOSITY")]
    v: u8,

    /// The largest starting amount any player may hold.
    #[arg(long, short, default_value_t = 255, env = "BETTING_GAME_BOUND")]
    bound: Value,

    /// The number of turns the game must last under every order of resting players.
    #[arg(long, short, default_value_t = 12, env = "BETTING_GAME_TURNS")]
    turns: u32,

    /// The number of concurrent workers.
    #[arg(long, short, default_value_t = 8, env = "BETTING_GAME_WORKERS")]
    workers: usize,

    /// Which arrangements of each triple to enumerate.
    #[arg(long, value_enum, default_value_t = OrderArg::Unordered)]
    ordering: OrderArg,

    /// Whether the game may end on the final turn itself.
    #[arg(long, value_enum, default_value_t = PolicyArg::Strict)]
    policy: PolicyArg,

    /// How rest sequences are produced.
    #[arg(long, value_enum, default_value_t = StrategyArg::Precomputed)]
    strategy: StrategyArg,

    /// Cheaper turn counts to filter candidates with before the final turn count.
    #[arg(long, value_delimiter = ',')]
    prefilter: Vec<u32>,

    /// Re-verify these triples (`a,b,c`) instead of enumerating the whole space.
    #[arg(long = "candidate")]
    candidates: Vec<Triple>,

    /// Print the final listing as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OrderArg {
    Unordered,
    NonDecreasing,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PolicyArg {
    Strict,
    FinalTurnTie,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum StrategyArg {
    OnTheFly,
    Precomputed,
}

impl From<OrderArg> for CandidateOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Unordered => CandidateOrder::Unordered,
            OrderArg::NonDecreasing => CandidateOrder::NonDecreasing,
        }
    }
}

impl From<PolicyArg> for TurnPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Strict => TurnPolicy::Strict,
            PolicyArg::FinalTurnTie => TurnPolicy::FinalTurnTie,
        }
    }
}

impl From<StrategyArg> for VerifierStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::OnTheFly => VerifierStrategy::OnTheFly,
            StrategyArg::Precomputed => VerifierStrategy::Precomputed,
        }
    }
}

/// The final listing printed with `--json`.
#[derive(Serialize)]
struct Report<'a> {
    summary: &'a SearchSummary,
    results: &'a [Triple],
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse the command arguments
    let Args {
        v,
        bound,
        turns,
        workers,
        ordering,
        policy,
        strategy,
        prefilter,
        candidates,
        json,
    } = Args::parse();

    // Initialize the tracing subscriber
    init_tracing_subscriber(v)?;

    // Create the driver config.
    let source = if candidates.is_empty() {
        CandidateSource::Enumerate(ordering.into())
    } else {
        CandidateSource::Explicit(candidates)
    };
    let driver_config = DriverConfig::new(bound, turns, workers)
        .with_policy(policy.into())
        .with_strategy(strategy.into())
        .with_candidates(source)
        .with_prefilter(prefilter);
    tracing::info!(target: "betting-game-cli", "Driver config created successfully.");

    // Create the driver; every configuration error surfaces here, before any work starts.
    let search = if driver_config.prefilter.is_empty() {
        SearchDriver::try_new(driver_config).await?.start().await?
    } else {
        NarrowingDriver::try_new(driver_config).await?.start().await?
    };
    tracing::debug!(target: "betting-game-cli", "Search dispatched, streaming results...");

    let (results, summary) = report(search, bound).await?;

    if json {
        let listing = serde_json::to_string_pretty(&Report {
            summary: &summary,
            results: &results,
        })?;
        println!("{}", listing);
    } else {
        println!("calculationTime({:?})", summary.elapsed);
        println!("Results:");
        for triple in &results {
            println!("{}", triple);
        }
    }

    Ok(())
}

/// Prints progress and results as they arrive, then returns the canonical, sorted listing.
///
/// # Arguments
/// * `search` - The running [Search].
/// * `bound` - The value bound, used to turn completed rows into a percentage.
///
/// # Returns
/// * `Result<(Vec<Triple>, SearchSummary)>` - The listing and the run summary.
async fn report(mut search: Search, bound: Value) -> Result<(Vec<Triple>, SearchSummary)> {
    let mut results = Vec::new();
    let mut rows_done: u64 = 0;
    let mut progress_open = true;

    loop {
        tokio::select! {
            found = search.results.recv() => match found {
                Some(triple) => {
                    println!("Valid: {}", triple);
                    results.push(triple);
                }
                None => break,
            },
            event = search.progress.recv(), if progress_open => match event {
                Some(event) => print_progress(event, &mut rows_done, bound),
                None => progress_open = false,
            },
        }
    }
    while let Ok(event) = search.progress.try_recv() {
        print_progress(event, &mut rows_done, bound);
    }

    let needs_dedupe = search.needs_dedupe();
    let summary = search.join().await?;
    let mut results = if needs_dedupe {
        dedupe(results)
    } else {
        results
    };
    sort_results(&mut results);
    Ok((results, summary))
}

fn print_progress(event: Progress, rows_done: &mut u64, bound: Value) {
    match event {
        Progress::Row { p1, .. } => {
            *rows_done += 1;
            println!(
                "Percent Complete: {} ({})",
                *rows_done * 100 / bound as u64,
                p1
            );
        }
        Progress::Batch { worker, verified } => {
            println!("Verified {} candidates (worker {})", verified, worker);
        }
    }
}

/// Initializes the tracing subscriber
///
/// # Arguments
/// * `verbosity_level` - The verbosity level (0-4)
///
/// # Returns
/// * `Result<()>` - Ok if successful, Err otherwise.
fn init_tracing_subscriber(verbosity_level: u8) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(match verbosity_level {
            0 => Level::ERROR,
            1 => Level::WARN,
            2 => Level::INFO,
            3 => Level::DEBUG,
            _ => Level::TRACE,
        })
        .finish();
    tracing::subscriber::set_global_default(subscriber).map_err(|e| anyhow!(e))
}
