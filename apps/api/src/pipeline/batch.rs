//! Batch orchestrator — runs one evaluation operation over many candidates at once.
//!
//! Every call is issued before any is awaited (`join_all`), so the batch takes
//! as long as its slowest call. Results are merged back by input position,
//! never by completion order. A failing call leaves its candidate untouched and
//! does not stop the others. There are no retries: a retry is a new batch.

use std::future::Future;
use std::time::Instant;

use futures::future::{join_all, OptionFuture};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::evaluation::{EvalError, EvalErrorKind};
use crate::models::Candidate;

/// One item the operation could not evaluate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchFailure {
    /// None for CV parsing, where no candidate exists yet.
    pub candidate_id: Option<Uuid>,
    /// Candidate name, or the file name for CV parsing.
    pub name: String,
    pub kind: EvalErrorKind,
    pub message: String,
}

/// Result of one batch run over a snapshot.
#[derive(Debug, Clone)]
pub struct BatchOutcome<T> {
    /// The snapshot with each success merged in. Same length and order as the input.
    pub candidates: Vec<Candidate>,
    /// Candidates the operation was invoked for.
    pub attempted: usize,
    /// Candidates with a new result.
    pub updated: usize,
    pub failures: Vec<BatchFailure>,
    /// Raw successes by candidate id, in input order.
    pub results: Vec<(Uuid, T)>,
}

impl<T> BatchOutcome<T> {
    /// Something was attempted and nothing succeeded.
    pub fn all_failed(&self) -> bool {
        self.attempted > 0 && self.updated == 0
    }

    /// Response body once the results are stored; `candidates` is the stored collection.
    pub fn into_report(self, candidates: Vec<Candidate>) -> BatchReport {
        BatchReport {
            attempted: self.attempted,
            updated: self.updated,
            failures: self.failures,
            candidates,
        }
    }
}

/// What a batch endpoint returns.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub attempted: usize,
    pub updated: usize,
    pub failures: Vec<BatchFailure>,
    pub candidates: Vec<Candidate>,
}

/// Runs `op` for every candidate and merges each success with `merge`.
pub async fn run_batch<T, F, Fut, M>(
    label: &str,
    candidates: Vec<Candidate>,
    op: F,
    merge: M,
) -> BatchOutcome<T>
where
    T: Clone,
    F: Fn(Candidate) -> Fut,
    Fut: Future<Output = Result<T, EvalError>>,
    M: Fn(Candidate, T) -> Candidate,
{
    run_batch_where(label, candidates, |_| true, op, merge).await
}

/// Like `run_batch`, but candidates failing `eligible` pass through untouched
/// and are not counted as attempted.
pub async fn run_batch_where<T, P, F, Fut, M>(
    label: &str,
    candidates: Vec<Candidate>,
    eligible: P,
    op: F,
    merge: M,
) -> BatchOutcome<T>
where
    T: Clone,
    P: Fn(&Candidate) -> bool,
    F: Fn(Candidate) -> Fut,
    Fut: Future<Output = Result<T, EvalError>>,
    M: Fn(Candidate, T) -> Candidate,
{
    let started = Instant::now();

    let calls = candidates
        .iter()
        .map(|c| OptionFuture::from(eligible(c).then(|| op(c.clone()))));
    let results = join_all(calls).await;

    let mut merged = Vec::with_capacity(candidates.len());
    let mut attempted = 0;
    let mut failures = Vec::new();
    let mut successes = Vec::new();

    for (candidate, result) in candidates.into_iter().zip(results) {
        match result {
            None => merged.push(candidate),
            Some(Ok(value)) => {
                attempted += 1;
                successes.push((candidate.id, value.clone()));
                merged.push(merge(candidate, value));
            }
            Some(Err(err)) => {
                attempted += 1;
                warn!(
                    "{} failed for candidate {} ({}): {}",
                    label, candidate.id, candidate.profile.name, err
                );
                failures.push(BatchFailure {
                    candidate_id: Some(candidate.id),
                    name: candidate.profile.name.clone(),
                    kind: err.kind(),
                    message: err.to_string(),
                });
                merged.push(candidate);
            }
        }
    }

    let updated = successes.len();
    info!(
        "{} batch: {}/{} candidates updated in {}ms",
        label,
        updated,
        attempted,
        started.elapsed().as_millis()
    );

    BatchOutcome {
        candidates: merged,
        attempted,
        updated,
        failures,
        results: successes,
    }
}

/// Runs `op` over arbitrary inputs concurrently; results come back in input order.
/// Used where no candidate exists yet, e.g. CV parsing.
pub async fn fan_out<I, T, F, Fut>(inputs: Vec<I>, op: F) -> Vec<Result<T, EvalError>>
where
    F: Fn(I) -> Fut,
    Fut: Future<Output = Result<T, EvalError>>,
{
    join_all(inputs.into_iter().map(op)).await
}
