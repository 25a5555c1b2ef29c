//! The `worker` module runs the verifier over a single [Shard] on a blocking thread.

use crate::{
    types::{Shard, WorkerReport},
    utils, Progress,
};
use anyhow::{anyhow, Result};
use betting_game_solvers::elimination::{Triple, Verifier};
use std::sync::Arc;
use tokio::sync::mpsc;

/// A [Worker] owns the sending halves of the result and progress streams for the lifetime of
/// its shard. Dropping the last worker closes the result stream.
pub(crate) struct Worker {
    /// Index of the worker, for progress events and logs.
    pub id: usize,
    /// The verifier shared read-only by every worker.
    pub verifier: Arc<dyn Verifier + Send + Sync>,
    /// Surviving triples.
    pub results: mpsc::Sender<Triple>,
    /// Progress events. Unbounded so an unread stream never stalls a worker.
    pub progress: mpsc::UnboundedSender<Progress>,
}

impl Worker {
    /// Verifies every candidate of the shard in ascending order. Must be run on a blocking
    /// thread: sends block while the result channel is full.
    pub fn run(self, shard: Shard) -> Result<WorkerReport> {
        let mut report = WorkerReport::default();
        match shard {
            Shard::Rows { p1, bound, order } => {
                tracing::debug!(target: "search-driver", "Worker {} verifying p1 in {:?}", self.id, p1);
                for lead in p1 {
                    for triple in utils::row(lead, bound, order) {
                        self.verify(triple, &mut report)?;
                    }
                    let _ = self.progress.send(Progress::Row {
                        worker: self.id,
                        p1: lead,
                    });
                }
            }
            Shard::Explicit(triples) => {
                tracing::debug!(target: "search-driver", "Worker {} verifying {} explicit candidates", self.id, triples.len());
                let verified = triples.len();
                for triple in triples {
                    self.verify(triple, &mut report)?;
                }
                let _ = self.progress.send(Progress::Batch {
                    worker: self.id,
                    verified,
                });
            }
        }
        tracing::debug!(target: "search-driver", "Worker {} finished: {} examined, {} passed", self.id, report.examined, report.passed);
        Ok(report)
    }

    fn verify(&self, triple: Triple, report: &mut WorkerReport) -> Result<()> {
        report.examined += 1;
        if self.verifier.all_survive(&triple) {
            report.passed += 1;
            tracing::trace!(target: "search-driver", "Worker {} found {}", self.id, triple);
            self.results.blocking_send(triple).map_err(|_| {
                anyhow!(
                    "Result stream closed before worker {} finished its shard",
                    self.id
                )
            })?;
        }
        Ok(())
    }
}
