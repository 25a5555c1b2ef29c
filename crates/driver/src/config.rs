//! The `config` module contains the [DriverConfig].

use anyhow::{ensure, Result};
use betting_game_solvers::elimination::{
    sequence_count, Triple, TurnPolicy, Value, VerifierStrategy, MAX_TABLE_TURNS,
};
use serde::{Deserialize, Serialize};

/// The [CandidateOrder] selects which arrangements of a triple are enumerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CandidateOrder {
    /// Every `(p1, p2, p3)` in `[1, bound]^3`. Each winning multiset is reported once per
    /// permutation, so results need deduplication for a canonical listing.
    #[default]
    Unordered,
    /// Only `p1 <= p2 <= p3`. Each winning multiset is reported exactly once.
    NonDecreasing,
}

/// The [CandidateSource] describes the space of triples handed to the workers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CandidateSource {
    /// Enumerate the whole space up to the configured bound.
    Enumerate(CandidateOrder),
    /// Re-verify an explicit list of triples.
    Explicit(Vec<Triple>),
}

impl Default for CandidateSource {
    fn default() -> Self {
        Self::Enumerate(CandidateOrder::default())
    }
}

/// The [DriverConfig] struct contains the configuration for the [Driver](crate::Driver)
/// implementations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverConfig {
    /// The largest starting amount any player may hold.
    pub bound: Value,
    /// The number of turns every rest sequence must survive.
    pub turns: u32,
    /// The number of concurrent workers.
    pub workers: usize,
    /// What counts as surviving `turns` turns.
    pub policy: TurnPolicy,
    /// How rest sequences are produced for each candidate.
    pub strategy: VerifierStrategy,
    /// Capacity of the result channel. Workers block once this many results are unread.
    pub result_capacity: usize,
    /// The candidates to verify.
    pub candidates: CandidateSource,
    /// Cheaper turn counts, ascending and below `turns`, whose survivors alone are carried to
    /// the next stage. Only honored by the [NarrowingDriver](crate::NarrowingDriver).
    pub prefilter: Vec<u32>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            bound: 255,
            turns: 12,
            workers: 8,
            policy: TurnPolicy::default(),
            strategy: VerifierStrategy::default(),
            result_capacity: 1000,
            candidates: CandidateSource::default(),
            prefilter: Vec::new(),
        }
    }
}

impl DriverConfig {
    /// Creates a new [DriverConfig] with the given configuration.
    pub fn new(bound: Value, turns: u32, workers: usize) -> Self {
        Self {
            bound,
            turns,
            workers,
            ..Default::default()
        }
    }

    /// Sets the [TurnPolicy].
    pub fn with_policy(mut self, policy: TurnPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the [VerifierStrategy].
    pub fn with_strategy(mut self, strategy: VerifierStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the [CandidateSource].
    pub fn with_candidates(mut self, candidates: CandidateSource) -> Self {
        self.candidates = candidates;
        self
    }

    /// Sets the prefilter turn counts.
    pub fn with_prefilter(mut self, prefilter: Vec<u32>) -> Self {
        self.prefilter = prefilter;
        self
    }

    /// Sets the result channel capacity.
    pub fn with_result_capacity(mut self, result_capacity: usize) -> Self {
        self.result_capacity = result_capacity;
        self
    }

    /// Returns `true` if results arrive once per permutation and must be deduplicated.
    pub fn needs_dedupe(&self) -> bool {
        matches!(
            self.candidates,
            CandidateSource::Enumerate(CandidateOrder::Unordered)
        )
    }

    /// Checks the configuration before any work is dispatched.
    ///
    /// ### Returns
    /// - `Ok(())`: The configuration is usable.
    /// - `Err(anyhow::Error)`: A precondition is violated, or the bound and turn count would
    ///   overflow the working integer widths.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.bound >= 1, "The value bound must be at least 1");
        // Every component stays below the starting total, which is at most `3 * bound`.
        ensure!(
            self.bound.checked_mul(3).is_some(),
            "A value bound of {} lets the total of a triple overflow a {}-bit value",
            self.bound,
            Value::BITS
        );
        ensure!(self.workers >= 1, "At least one worker is required");
        ensure!(
            self.result_capacity >= 1,
            "The result channel needs a capacity of at least 1"
        );
        sequence_count(self.turns)?;
        if self.strategy == VerifierStrategy::Precomputed {
            ensure!(
                self.turns <= MAX_TABLE_TURNS,
                "The precomputed strategy supports at most {} turns, got {}",
                MAX_TABLE_TURNS,
                self.turns
            );
        }
        if let CandidateSource::Explicit(triples) = &self.candidates {
            if let Some(outside) = triples.iter().find(|t| !t.within(self.bound)) {
                anyhow::bail!(
                    "Candidate {} lies outside [1, {}]",
                    outside,
                    self.bound
                );
            }
        }
        ensure!(
            self.prefilter.windows(2).all(|w| w[0] < w[1]),
            "Prefilter turn counts must be strictly ascending: {:?}",
            self.prefilter
        );
        ensure!(
            self.prefilter.iter().all(|&t| t < self.turns),
            "Prefilter turn counts must be below the final turn count {}: {:?}",
            self.turns,
            self.prefilter
        );
        Ok(())
    }
}
