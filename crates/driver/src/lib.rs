#![doc = include_str!("../README.md")]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use betting_game_solvers::elimination::{dedupe, Triple};
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};

mod config;
pub use config::{CandidateOrder, CandidateSource, DriverConfig};

mod types;
pub use types::{Progress, SearchState, SearchSummary};

mod drivers;
pub use drivers::{NarrowingDriver, SearchDriver};

mod utils;
mod worker;

/// The [Driver] trait defines the interface for the search loops ran by the `betting-game`
/// binary.
#[async_trait]
pub trait Driver {
    /// Creates a new [Driver] with the given configuration. Every configuration error is
    /// reported here, before any worker exists.
    async fn try_new(config: DriverConfig) -> Result<Self>
    where
        Self: Sized;

    /// Dispatches the workers and returns a [Search] handle without waiting for them.
    async fn start(self) -> Result<Search>;
}

/// The [Search] struct is the consumer's handle on a running search.
#[derive(Debug)]
pub struct Search {
    /// Surviving triples, in arrival order. Closed once every worker has finished.
    pub results: mpsc::Receiver<Triple>,
    /// Progress events from the workers of the final stage.
    pub progress: mpsc::UnboundedReceiver<Progress>,
    /// Whether results arrive once per permutation.
    pub(crate) dedupe: bool,
    pub(crate) state: watch::Receiver<SearchState>,
    pub(crate) handle: JoinHandle<Result<SearchSummary>>,
}

impl Search {
    /// Returns the current [SearchState].
    pub fn state(&self) -> SearchState {
        *self.state.borrow()
    }

    /// Returns a receiver that observes every [SearchState] transition.
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.clone()
    }

    /// Returns `true` if the results must be passed through [dedupe] for a canonical listing.
    pub fn needs_dedupe(&self) -> bool {
        self.dedupe
    }

    /// Waits for every worker to finish, discarding results that have not been received yet.
    pub async fn join(mut self) -> Result<SearchSummary> {
        while self.results.recv().await.is_some() {}
        self.handle
            .await
            .map_err(|e| anyhow!("Search coordinator failed: {}", e))?
    }

    /// Drains the result stream, waits for every worker, and returns the results, deduplicated
    /// when the search enumerated every permutation.
    pub async fn collect(mut self) -> Result<(Vec<Triple>, SearchSummary)> {
        let mut results = Vec::new();
        while let Some(triple) = self.results.recv().await {
            results.push(triple);
        }
        let dedupe_results = self.dedupe;
        let summary = self.join().await?;
        if dedupe_results {
            results = dedupe(results);
        }
        Ok((results, summary))
    }
}
