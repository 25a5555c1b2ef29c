//! The `drivers` module contains implementations of the [Driver] trait.

use crate::{
    types::{SearchState, SearchSummary, Shard},
    utils,
    worker::Worker,
    CandidateSource, Driver, DriverConfig, Progress, Search,
};
use anyhow::{anyhow, ensure, Result};
use async_trait::async_trait;
use betting_game_solvers::elimination::{build_verifier, Triple, Verifier};
use std::{future::Future, sync::Arc, time::Instant};
use tokio::sync::{mpsc, watch};

/// A verifier shared read-only by every worker of a search.
type SharedVerifier = Arc<dyn Verifier + Send + Sync>;

/// The [SearchDriver] verifies every candidate of its [CandidateSource] at a single turn count.
pub struct SearchDriver {
    /// The configuration for the driver.
    pub config: DriverConfig,
    verifier: SharedVerifier,
}

impl SearchDriver {
    /// Creates a [SearchDriver] around an already built verifier, e.g. one whose sequence table
    /// is shared with another search at the same turn count.
    pub fn with_verifier(config: DriverConfig, verifier: SharedVerifier) -> Result<Self> {
        config.validate()?;
        ensure!(
            verifier.turns() == config.turns && verifier.policy() == config.policy,
            "Verifier is built for {} turns ({:?}), configuration asks for {} turns ({:?})",
            verifier.turns(),
            verifier.policy(),
            config.turns,
            config.policy
        );
        Ok(Self { config, verifier })
    }
}

#[async_trait]
impl Driver for SearchDriver {
    async fn try_new(config: DriverConfig) -> Result<Self> {
        config.validate()?;
        ensure!(
            config.prefilter.is_empty(),
            "Prefilter stages {:?} are only run by the NarrowingDriver",
            config.prefilter
        );
        let verifier = prepare_verifier(&config).await?;
        Ok(Self { config, verifier })
    }

    async fn start(self) -> Result<Search> {
        let Self { config, verifier } = self;
        tracing::info!(target: "search-driver", "Starting search: bound {}, {} turns ({:?}), {} workers", config.bound, config.turns, config.policy, config.workers);
        let shards = utils::shards(&config.candidates, config.bound, config.workers);
        Ok(spawn_search(
            config.result_capacity,
            config.needs_dedupe(),
            move |results, progress, state| async move {
                dispatch(
                    verifier,
                    shards,
                    results,
                    progress,
                    &state,
                    config.turns,
                    Instant::now(),
                )
                .await
            },
        ))
    }
}

/// The [NarrowingDriver] runs the configured prefilter turn counts first, carrying only their
/// survivors forward, and streams the survivors of the final turn count.
pub struct NarrowingDriver {
    /// The configuration for the driver.
    pub config: DriverConfig,
    verifier: SharedVerifier,
}

#[async_trait]
impl Driver for NarrowingDriver {
    async fn try_new(config: DriverConfig) -> Result<Self> {
        config.validate()?;
        let verifier = prepare_verifier(&config).await?;
        Ok(Self { config, verifier })
    }

    async fn start(self) -> Result<Search> {
        let Self { config, verifier } = self;
        tracing::info!(target: "narrowing-driver", "Starting narrowing search: stages {:?} then {} turns", config.prefilter, config.turns);
        Ok(spawn_search(
            config.result_capacity,
            config.needs_dedupe(),
            move |results, progress, state| async move {
                let outcome = narrow(config, verifier, results, progress, &state).await;
                state.send_replace(SearchState::Done);
                outcome
            },
        ))
    }
}

/// Runs each prefilter stage to completion, then dispatches the final stage on the outer
/// streams.
async fn narrow(
    config: DriverConfig,
    verifier: SharedVerifier,
    results: mpsc::Sender<Triple>,
    progress: mpsc::UnboundedSender<Progress>,
    state: &watch::Sender<SearchState>,
) -> Result<SearchSummary> {
    let started = Instant::now();
    let mut candidates = config.candidates.clone();
    for &turns in &config.prefilter {
        let stage = DriverConfig {
            turns,
            candidates,
            prefilter: Vec::new(),
            ..config.clone()
        };
        let mut search = SearchDriver::try_new(stage).await?.start().await?;
        let mut survivors = Vec::new();
        while let Some(triple) = search.results.recv().await {
            survivors.push(triple);
        }
        let summary = search.join().await?;
        tracing::info!(target: "narrowing-driver", "Stage of {} turns: {} of {} candidates survive", turns, summary.passed, summary.examined);
        candidates = CandidateSource::Explicit(survivors);
    }

    let shards = utils::shards(&candidates, config.bound, config.workers);
    dispatch(
        verifier,
        shards,
        results,
        progress,
        state,
        config.turns,
        started,
    )
    .await
}

/// Builds the verifier on a blocking thread; a precomputed sequence table can take a while.
async fn prepare_verifier(config: &DriverConfig) -> Result<SharedVerifier> {
    let (turns, policy, strategy) = (config.turns, config.policy, config.strategy);
    tokio::task::spawn_blocking(move || build_verifier(turns, policy, strategy))
        .await
        .map_err(|e| anyhow!("Verifier construction failed: {}", e))?
}

/// Opens the result, progress, and state channels and spawns `coordinator` on them.
fn spawn_search<F, Fut>(capacity: usize, dedupe: bool, coordinator: F) -> Search
where
    F: FnOnce(
        mpsc::Sender<Triple>,
        mpsc::UnboundedSender<Progress>,
        watch::Sender<SearchState>,
    ) -> Fut,
    Fut: Future<Output = Result<SearchSummary>> + Send + 'static,
{
    let (results_tx, results) = mpsc::channel(capacity);
    let (progress_tx, progress) = mpsc::unbounded_channel();
    let (state_tx, state) = watch::channel(SearchState::Dispatching);
    let handle = tokio::spawn(coordinator(results_tx, progress_tx, state_tx));
    Search {
        results,
        progress,
        dedupe,
        state,
        handle,
    }
}

/// Hands one shard to each worker and waits for all of them.
///
/// The coordinator gives up its own senders once every worker holds a clone, so the result
/// stream closes exactly when the last worker returns.
async fn dispatch(
    verifier: SharedVerifier,
    shards: Vec<Shard>,
    results: mpsc::Sender<Triple>,
    progress: mpsc::UnboundedSender<Progress>,
    state: &watch::Sender<SearchState>,
    turns: u32,
    started: Instant,
) -> Result<SearchSummary> {
    state.send_replace(SearchState::Dispatching);
    let workers = shards.len();
    let mut handles = Vec::with_capacity(workers);
    for (id, shard) in shards.into_iter().enumerate() {
        let worker = Worker {
            id,
            verifier: Arc::clone(&verifier),
            results: results.clone(),
            progress: progress.clone(),
        };
        handles.push(tokio::task::spawn_blocking(move || worker.run(shard)));
    }
    drop(results);
    drop(progress);
    state.send_replace(SearchState::Draining);
    tracing::debug!(target: "search-driver", "Dispatched {} shards, draining", workers);

    let mut summary = SearchSummary {
        turns,
        examined: 0,
        passed: 0,
        elapsed: Default::default(),
    };
    let mut failure = None;
    for handle in handles {
        match handle.await {
            Ok(Ok(report)) => {
                summary.examined += report.examined;
                summary.passed += report.passed;
            }
            Ok(Err(e)) => {
                tracing::error!(target: "search-driver", "Worker failed: {}", e);
                failure.get_or_insert(e);
            }
            Err(e) => {
                tracing::error!(target: "search-driver", "Worker panicked: {}", e);
                failure.get_or_insert(anyhow!("Worker panicked: {}", e));
            }
        }
    }
    summary.elapsed = started.elapsed();
    state.send_replace(SearchState::Done);
    tracing::info!(target: "search-driver", "Search of {} turns done: {} of {} candidates survive in {:?}", turns, summary.passed, summary.examined, summary.elapsed);

    match failure {
        Some(e) => Err(e),
        None => Ok(summary),
    }
}
