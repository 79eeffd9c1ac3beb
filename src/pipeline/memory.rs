//! In-memory strategy
//!
//! Jobs are fixed lists of pairs and the grouped result is captured instead
//! of written anywhere. Jobs can be told to fail on open, fail part-way
//! through, or stall between pairs, which makes every scheduler path
//! reachable without touching the filesystem.

use super::group::GroupedResult;
use super::job::{Job, JobStream, PairStream};
use super::pair::Pair;
use super::strategy::Strategy;
use crate::error::{ErrorCode, PipelineError, Result};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// A synthetic job over a fixed list of pairs
#[derive(Debug, Clone)]
pub struct MemoryJob<K, V> {
    id: String,
    pairs: Vec<(K, V)>,
    fail_open: bool,
    fail_after: Option<usize>,
    delay: Option<Duration>,
}

impl<K, V> MemoryJob<K, V> {
    pub fn new(id: impl Into<String>, pairs: Vec<(K, V)>) -> Self {
        Self {
            id: id.into(),
            pairs,
            fail_open: false,
            fail_after: None,
            delay: None,
        }
    }

    /// Fail before producing any pair, like an unreadable file
    pub fn failing(mut self) -> Self {
        self.fail_open = true;
        self
    }

    /// Yield `count` pairs, then fail
    pub fn failing_after(mut self, count: usize) -> Self {
        self.fail_after = Some(count);
        self
    }

    /// Sleep before every pair
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

impl<K, V> Job<K, V> for MemoryJob<K, V>
where
    K: Send + 'static,
    V: Send + 'static,
{
    fn id(&self) -> String {
        self.id.clone()
    }

    fn execute(self: Box<Self>) -> Result<PairStream<K, V>> {
        let MemoryJob {
            id,
            pairs,
            fail_open,
            fail_after,
            delay,
        } = *self;

        if fail_open {
            return Err(PipelineError::job_with_code(
                ErrorCode::JOB_READ_FAILED,
                "source unavailable",
                Some(id),
            ));
        }

        let stream = pairs.into_iter().enumerate().map(move |(i, (key, value))| {
            if let Some(delay) = delay {
                std::thread::sleep(delay);
            }
            match fail_after {
                Some(limit) if i >= limit => Err(PipelineError::job_with_code(
                    ErrorCode::JOB_READ_FAILED,
                    format!("source failed after {} pairs", limit),
                    Some(id.clone()),
                )),
                _ => Ok(Pair::new(key, value)),
            }
        });
        Ok(Box::new(stream))
    }
}

/// Shared view of every grouped result a `MemoryStrategy` was handed
pub struct OutputSink<K, V> {
    inner: Arc<Mutex<Vec<GroupedResult<K, V>>>>,
}

impl<K, V> Clone for OutputSink<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> OutputSink<K, V> {
    fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<GroupedResult<K, V>>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Number of times `output` has been called
    pub fn runs(&self) -> usize {
        self.lock().len()
    }

    /// Remove and return the most recent result
    pub fn take_last(&self) -> Option<GroupedResult<K, V>> {
        self.lock().pop()
    }

    fn push(&self, grouped: GroupedResult<K, V>) {
        self.lock().push(grouped);
    }
}

/// Strategy that emits `MemoryJob`s and captures its output
pub struct MemoryStrategy<K, V> {
    jobs: Vec<MemoryJob<K, V>>,
    fail_emission: bool,
    fail_output: bool,
    sink: OutputSink<K, V>,
}

impl<K, V> MemoryStrategy<K, V> {
    pub fn new(jobs: Vec<MemoryJob<K, V>>) -> Self {
        Self {
            jobs,
            fail_emission: false,
            fail_output: false,
            sink: OutputSink::new(),
        }
    }

    /// Make `emit` report an enumeration error
    pub fn with_failing_emission(mut self) -> Self {
        self.fail_emission = true;
        self
    }

    /// Make `output` report a write error
    pub fn with_failing_output(mut self) -> Self {
        self.fail_output = true;
        self
    }

    pub fn sink(&self) -> OutputSink<K, V> {
        self.sink.clone()
    }
}

impl<K, V> Strategy<K, V> for MemoryStrategy<K, V>
where
    K: Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn name(&self) -> String {
        "memory".to_string()
    }

    fn emit(&self) -> Result<JobStream<K, V>> {
        if self.fail_emission {
            return Err(PipelineError::enumeration(
                ErrorCode::STORAGE_NOT_FOUND,
                "synthetic inputs unavailable",
                None,
            ));
        }
        let jobs: Vec<_> = self.jobs.clone();
        Ok(Box::new(
            jobs.into_iter()
                .map(|job| Box::new(job) as Box<dyn Job<K, V>>),
        ))
    }

    fn output(&self, grouped: GroupedResult<K, V>) -> Result<()> {
        if self.fail_output {
            return Err(PipelineError::output("synthetic sink rejected the result", None));
        }
        self.sink.push(grouped);
        Ok(())
    }
}
