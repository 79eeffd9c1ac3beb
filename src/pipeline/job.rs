//! Units of work
//!
//! A job owns everything it needs to produce its pairs. Executing a job
//! consumes it, so each job runs at most once, and the pair sequence it
//! hands back is a plain iterator: lazy, finite and single-pass.

use super::pair::Pair;
use crate::error::Result;

/// Lazy sequence of pairs produced by one job execution
pub type PairStream<K, V> = Box<dyn Iterator<Item = Result<Pair<K, V>>> + Send>;

/// Lazy sequence of jobs produced by a strategy's emission policy
pub type JobStream<K, V> = Box<dyn Iterator<Item = BoxedJob<K, V>> + Send>;

pub type BoxedJob<K, V> = Box<dyn Job<K, V>>;

/// One independent unit of input
///
/// Jobs must not share mutable state with each other; the scheduler is free
/// to run them on different threads.
pub trait Job<K, V>: Send {
    /// Human-readable identity used in logs and run reports
    fn id(&self) -> String;

    /// Start the job, returning its pair sequence.
    ///
    /// An `Err` here means the source could not be opened at all; an `Err`
    /// item inside the stream means it failed part-way through.
    fn execute(self: Box<Self>) -> Result<PairStream<K, V>>;
}

/// Job built from a closure, for synthetic inputs
pub struct FnJob<F> {
    id: String,
    run: F,
}

impl<F> FnJob<F> {
    pub fn new(id: impl Into<String>, run: F) -> Self {
        Self { id: id.into(), run }
    }
}

impl<K, V, F> Job<K, V> for FnJob<F>
where
    F: FnOnce() -> Result<PairStream<K, V>> + Send,
{
    fn id(&self) -> String {
        self.id.clone()
    }

    fn execute(self: Box<Self>) -> Result<PairStream<K, V>> {
        (self.run)()
    }
}
