//! Batch fan-out over independent items.
//!
//! Each item is computed by the same pure, single-item job; batching only
//! spreads jobs over a rayon pool. Results come back in input order and one
//! failing item never affects the others.

use rayon::prelude::*;
use tracing::{info, warn};

use clinicops_core::ItemId;

use crate::error::ForecastError;
use crate::job::IntelligenceJob;

/// Outcome of one job in a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome<T> {
    pub item_id: ItemId,
    pub result: Result<T, ForecastError>,
}

impl<T> BatchOutcome<T> {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Run `jobs` on up to `parallelism` worker threads.
///
/// `parallelism` is clamped to `1..=jobs.len()`; the pool is local to the
/// call, not rayon's global one.
pub fn compute_batch<J>(jobs: &[J], parallelism: usize) -> Vec<BatchOutcome<J::Output>>
where
    J: IntelligenceJob,
{
    if jobs.is_empty() {
        return Vec::new();
    }

    let workers = parallelism.clamp(1, jobs.len());
    info!(jobs = jobs.len(), workers, "forecast batch started");

    let outcomes: Vec<BatchOutcome<J::Output>> =
        match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
            Ok(pool) => pool.install(|| jobs.par_iter().map(run_one::<J>).collect()),
            Err(e) => {
                warn!(error = %e, "worker pool unavailable, running batch inline");
                jobs.iter().map(run_one::<J>).collect()
            }
        };

    let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
    info!(jobs = outcomes.len(), failed, "forecast batch finished");
    outcomes
}

fn run_one<J: IntelligenceJob>(job: &J) -> BatchOutcome<J::Output> {
    let item_id = job.item_id();
    let result = job.run();
    if let Err(e) = &result {
        warn!(item = %item_id, error = %e, "item forecast failed");
    }
    BatchOutcome { item_id, result }
}
