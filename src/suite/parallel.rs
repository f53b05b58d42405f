//! Worker-pool execution for parallel suites
//!
//! Cases fan out over the blocking thread pool, bounded by a semaphore sized
//! to the suite's worker count. Case bodies are synchronous, so each case runs
//! wholly on one pool thread and thread-local output capture stays exclusive
//! to it. Before/after-each hooks run on whichever worker executes the case;
//! there is no ordering guarantee between different cases' hooks. One case's
//! fault never aborts its siblings or the pool.

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;
use tokio::task;
use tracing::{debug, error};

use super::{run_hook, Hooks};
use crate::case::{CaseState, TestCase};
use crate::stats::{Statistics, Tally};

/// Run all still-pending cases concurrently and hand them back in
/// registration order, folding the outcome counters into `stats`.
pub(super) async fn run_cases(
    cases: Vec<TestCase>,
    workers: usize,
    hooks: Hooks,
    stats: &mut Statistics,
) -> Vec<TestCase> {
    let total = cases.len();
    let semaphore = Arc::new(Semaphore::new(workers.max(1)));
    let tally = Arc::new(Tally::default());

    let mut handles = Vec::with_capacity(total);
    for (index, case) in cases.into_iter().enumerate() {
        let semaphore = Arc::clone(&semaphore);
        let tally = Arc::clone(&tally);
        let hooks = hooks.clone();

        handles.push(tokio::spawn(async move {
            // The semaphore is never closed, so acquisition cannot fail.
            let _permit = semaphore
                .acquire_owned()
                .await
                .expect("worker semaphore closed");

            task::spawn_blocking(move || {
                let mut case = case;
                if case.state() == CaseState::NotRun {
                    debug!(case = %case.name(), "dispatching case to worker");
                    run_hook(hooks.before_each.as_ref(), "before_each");
                    case.execute();
                    tally.record(case.state());
                    run_hook(hooks.after_each.as_ref(), "after_each");
                }
                (index, case)
            })
            .await
        }));
    }

    let mut finished: Vec<(usize, TestCase)> = Vec::with_capacity(total);
    for joined in join_all(handles).await {
        match joined {
            Ok(Ok(slot)) => finished.push(slot),
            Ok(Err(e)) | Err(e) => error!(error = %e, "worker task lost"),
        }
    }
    finished.sort_by_key(|(index, _)| *index);

    tally.fold_into(stats);
    finished.into_iter().map(|(_, case)| case).collect()
}
