use betting_game_solvers::elimination::{Triple, Value};
use serde::{Deserialize, Serialize};
use std::{ops::Range, time::Duration};

use crate::CandidateOrder;

/// The [SearchState] enum tracks the lifecycle of a [Search](crate::Search).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchState {
    /// Workers are being created and handed their shards.
    Dispatching,
    /// Every shard has been handed out; workers are finishing and results may still arrive.
    Draining,
    /// Every worker has finished and the result stream is closed.
    Done,
}

/// A [Progress] event reported by a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Progress {
    /// Every candidate with leading amount `p1` has been verified.
    Row {
        /// The reporting worker.
        worker: usize,
        /// The completed leading amount.
        p1: Value,
    },
    /// A worker finished its slice of an explicit candidate list.
    Batch {
        /// The reporting worker.
        worker: usize,
        /// The number of candidates in the slice.
        verified: usize,
    },
}

/// The [SearchSummary] is returned once every worker has finished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSummary {
    /// The turn count of the final stage.
    pub turns: u32,
    /// The number of candidates verified in the final stage.
    pub examined: u64,
    /// The number of candidates that survived the final stage.
    pub passed: u64,
    /// Wall-clock time of the whole run.
    pub elapsed: Duration,
}

/// The [Shard] enum is the unit of work handed to a single worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Shard {
    /// A contiguous range of leading amounts, each paired with its full `p2 x p3` space.
    Rows {
        /// The leading amounts, half-open.
        p1: Range<Value>,
        /// The value bound.
        bound: Value,
        /// Which arrangements to enumerate.
        order: CandidateOrder,
    },
    /// A contiguous slice of an explicit candidate list.
    Explicit(Vec<Triple>),
}

/// The outcome of a single worker's shard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct WorkerReport {
    pub examined: u64,
    pub passed: u64,
}
