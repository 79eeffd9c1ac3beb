//! Compute and collect stages
//!
//! `compute` drains one job into its own partial grouping; `collect` folds the
//! partials, in job order, into the final result. Merging partials in job
//! order gives the same grouping as concatenating every job's pairs and
//! grouping once.

use super::group::GroupedResult;
use super::job::BoxedJob;
use crate::error::{common, Result};
use std::hash::Hash;
use std::time::{Duration, Instant};
use tracing::trace;

/// Point in time after which a running job is abandoned
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    at: Instant,
    budget: Duration,
}

impl Deadline {
    pub fn after(budget: Duration) -> Self {
        Self {
            at: Instant::now() + budget,
            budget,
        }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    pub fn expired(&self) -> bool {
        Instant::now() >= self.at
    }
}

/// Run one job to completion and group its pairs.
///
/// Any failure, including one halfway through the pair stream, discards the
/// partial grouping so a failed job contributes nothing.
pub fn compute<K, V>(job: BoxedJob<K, V>, deadline: Option<Deadline>) -> Result<GroupedResult<K, V>>
where
    K: Eq + Hash + Clone,
{
    let id = job.id();
    let pairs = job.execute().map_err(|e| e.into_job_error(&id))?;

    let mut partial = GroupedResult::new();
    for pair in pairs {
        if let Some(deadline) = deadline {
            if deadline.expired() {
                return Err(common::job_timeout(&id, deadline.budget()));
            }
        }
        let (key, value) = pair.map_err(|e| e.into_job_error(&id))?.into_parts();
        partial.push(key, value);
    }

    trace!(
        job = %id,
        keys = partial.len(),
        pairs = partial.total_values(),
        "Job drained"
    );
    Ok(partial)
}

/// Fold partial groupings, in the order given, into one result
pub fn collect<K, V, I>(partials: I) -> GroupedResult<K, V>
where
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = GroupedResult<K, V>>,
{
    partials
        .into_iter()
        .fold(GroupedResult::new(), |mut acc, partial| {
            acc.merge(partial);
            acc
        })
}
