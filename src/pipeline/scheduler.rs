//! Four-stage orchestrator: emit, execute, group, output
//!
//! Jobs run on tokio's blocking pool with at most `workers` in flight. Each
//! job is grouped on its own and the partial results are merged in emission
//! order, so the final grouping does not depend on the worker count.

use super::group::GroupedResult;
use super::job::BoxedJob;
use super::report::{JobFailure, RunReport};
use super::stage::{self, Deadline};
use super::strategy::Strategy;
use crate::error::{common, ErrorCode, PipelineError, Result};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// What to do when a single job fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Log the failure, record it in the report and keep going
    #[default]
    Skip,
    /// Stop the run and return the job's error; nothing is output
    Abort,
}

/// Execution knobs for a scheduler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerOptions {
    pub workers: usize,
    pub job_timeout: Option<Duration>,
    pub failure_policy: FailurePolicy,
    pub show_progress: bool,
}

impl Default for SchedulerOptions {
    fn default() -> Self {
        Self {
            workers: 1,
            job_timeout: None,
            failure_policy: FailurePolicy::Skip,
            show_progress: false,
        }
    }
}

/// Drives one strategy through a full run
pub struct Scheduler<K, V> {
    strategy: Option<Arc<dyn Strategy<K, V>>>,
    options: SchedulerOptions,
}

impl<K, V> Scheduler<K, V>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Send + 'static,
{
    pub fn new(strategy: impl Strategy<K, V> + 'static) -> Self {
        Self {
            strategy: Some(Arc::new(strategy)),
            options: SchedulerOptions::default(),
        }
    }

    /// A scheduler with no strategy yet; `run` fails until one is set
    pub fn unconfigured() -> Self {
        Self {
            strategy: None,
            options: SchedulerOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SchedulerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn set_strategy(&mut self, strategy: impl Strategy<K, V> + 'static) {
        self.strategy = Some(Arc::new(strategy));
    }

    pub fn options(&self) -> &SchedulerOptions {
        &self.options
    }

    /// Run the strategy once: emit, execute, group, output
    pub async fn run(&self) -> Result<RunReport> {
        let strategy = self.strategy.clone().ok_or_else(common::strategy_missing)?;
        let started = Instant::now();
        let mut report = RunReport::new(strategy.name());

        info!(
            strategy = %report.strategy,
            workers = self.options.workers,
            "Starting pipeline run"
        );

        let jobs = emit_jobs(Arc::clone(&strategy), &mut report).await?;
        report.jobs_emitted = jobs.len();

        let partials = self.execute(jobs, &mut report).await?;

        let grouped = stage::collect(partials);
        report.pairs = grouped.total_values();
        report.keys = grouped.len();
        debug!(keys = report.keys, pairs = report.pairs, "Grouping complete");

        write_output(strategy, grouped).await?;

        report.elapsed = started.elapsed();
        info!(
            jobs = report.jobs_emitted,
            failed = report.jobs_failed,
            keys = report.keys,
            elapsed = ?report.elapsed,
            "Pipeline run finished"
        );
        Ok(report)
    }

    async fn execute(
        &self,
        jobs: Vec<BoxedJob<K, V>>,
        report: &mut RunReport,
    ) -> Result<Vec<GroupedResult<K, V>>> {
        let progress = self.progress_bar(jobs.len());
        let timeout = self.options.job_timeout;
        let workers = self.options.workers.max(1);

        let mut outcomes = stream::iter(jobs)
            .map(|job| {
                let progress = progress.clone();
                async move {
                    let id = job.id();
                    debug!(job = %id, "Executing job");
                    let outcome = run_job(job, &id, timeout).await;
                    progress.inc(1);
                    (id, outcome)
                }
            })
            .buffered(workers);

        let mut partials = Vec::new();
        while let Some((id, outcome)) = outcomes.next().await {
            match outcome {
                Ok(partial) => {
                    debug!(job = %id, keys = partial.len(), "Job finished");
                    report.jobs_succeeded += 1;
                    partials.push(partial);
                }
                Err(e) => match self.options.failure_policy {
                    FailurePolicy::Skip => {
                        warn!(job = %id, "Skipping failed job: {}", e.user_message());
                        report.record_failure(JobFailure::from_error(&id, &e));
                    }
                    FailurePolicy::Abort => {
                        progress.abandon();
                        return Err(e);
                    }
                },
            }
        }

        progress.finish_and_clear();
        Ok(partials)
    }

    fn progress_bar(&self, total: usize) -> ProgressBar {
        if !self.options.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(total as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} jobs")
        {
            pb.set_style(style.progress_chars("█▓▒░ "));
        }
        pb
    }
}

/// Enumerate the strategy's jobs off the async runtime.
///
/// An enumeration failure is recorded and yields zero jobs.
async fn emit_jobs<K, V>(
    strategy: Arc<dyn Strategy<K, V>>,
    report: &mut RunReport,
) -> Result<Vec<BoxedJob<K, V>>>
where
    K: Send + 'static,
    V: Send + 'static,
{
    let enumerated =
        tokio::task::spawn_blocking(move || strategy.emit().map(|jobs| jobs.collect::<Vec<_>>()))
            .await
            .map_err(|e| PipelineError::other("job enumeration task failed").with_source(e))?;

    match enumerated {
        Ok(jobs) => {
            debug!(count = jobs.len(), "Enumerated jobs");
            Ok(jobs)
        }
        Err(e) => {
            warn!("Continuing with no jobs: {}", e.user_message());
            report.emission_error = Some(e.user_message());
            Ok(Vec::new())
        }
    }
}

/// Execute one job on the blocking pool, bounded by its timeout.
///
/// A timed-out job keeps its blocking thread until its current read returns;
/// the pair loop notices the deadline and stops, and its result is dropped.
async fn run_job<K, V>(
    job: BoxedJob<K, V>,
    id: &str,
    timeout: Option<Duration>,
) -> Result<GroupedResult<K, V>>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Send + 'static,
{
    let deadline = timeout.map(Deadline::after);
    let handle = tokio::task::spawn_blocking(move || stage::compute(job, deadline));

    let joined = match timeout {
        Some(budget) => match tokio::time::timeout(budget, handle).await {
            Ok(joined) => joined,
            Err(_) => return Err(common::job_timeout(id, budget)),
        },
        None => handle.await,
    };

    joined.map_err(|e| {
        PipelineError::job_with_code(
            ErrorCode::JOB_PANICKED,
            "job worker stopped unexpectedly",
            Some(id.to_string()),
        )
        .with_source(e)
    })?
}

async fn write_output<K, V>(
    strategy: Arc<dyn Strategy<K, V>>,
    grouped: GroupedResult<K, V>,
) -> Result<()>
where
    K: Send + 'static,
    V: Send + 'static,
{
    tokio::task::spawn_blocking(move || strategy.output(grouped))
        .await
        .map_err(|e| PipelineError::output("output task failed", None).with_source(e))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::memory::{MemoryJob, MemoryStrategy};

    fn words(id: &str, items: &[(&'static str, &'static str)]) -> MemoryJob<String, String> {
        MemoryJob::new(
            id,
            items
                .iter()
                .map(|&(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[tokio::test]
    async fn test_run_without_strategy_is_config_error() {
        let scheduler: Scheduler<String, String> = Scheduler::unconfigured();
        let err = scheduler.run().await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::CONFIG_MISSING_REQUIRED);
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn test_set_strategy_enables_run() {
        let strategy = MemoryStrategy::new(vec![words("a", &[("k", "v")])]);
        let sink = strategy.sink();

        let mut scheduler: Scheduler<String, String> = Scheduler::unconfigured();
        scheduler.set_strategy(strategy);
        let report = scheduler.run().await.unwrap();

        assert_eq!(report.jobs_emitted, 1);
        assert_eq!(sink.runs(), 1);
    }

    #[tokio::test]
    async fn test_run_groups_across_jobs() {
        let strategy = MemoryStrategy::new(vec![
            words("one", &[("eirt", "tier"), ("aahlp", "alpha")]),
            words("two", &[("eirt", "rite")]),
        ]);
        let sink = strategy.sink();

        let report = Scheduler::new(strategy).run().await.unwrap();
        let grouped = sink.take_last().unwrap();

        assert_eq!(report.jobs_succeeded, 2);
        assert_eq!(report.pairs, 3);
        assert_eq!(report.keys, 2);
        assert_eq!(
            grouped.get(&"eirt".to_string()).unwrap(),
            &["tier".to_string(), "rite".to_string()]
        );
        assert_eq!(grouped.count(&"aahlp".to_string()), 1);
    }

    #[tokio::test]
    async fn test_failed_job_is_skipped() {
        let strategy = MemoryStrategy::new(vec![
            words("good", &[("a", "x")]),
            words("bad", &[("a", "y"), ("b", "z")]).failing_after(1),
            words("unreadable", &[("c", "w")]).failing(),
        ]);
        let sink = strategy.sink();

        let report = Scheduler::new(strategy).run().await.unwrap();
        let grouped = sink.take_last().unwrap();

        assert_eq!(report.jobs_succeeded, 1);
        assert_eq!(report.jobs_failed, 2);
        assert_eq!(report.failures[0].job, "bad");
        assert_eq!(grouped.count(&"a".to_string()), 1);
        assert_eq!(grouped.len(), 1);
    }

    #[tokio::test]
    async fn test_abort_policy_stops_run() {
        let strategy = MemoryStrategy::new(vec![
            words("good", &[("a", "x")]),
            words("bad", &[("b", "y")]).failing(),
        ]);
        let sink = strategy.sink();

        let options = SchedulerOptions {
            failure_policy: FailurePolicy::Abort,
            ..SchedulerOptions::default()
        };
        let err = Scheduler::new(strategy)
            .with_options(options)
            .run()
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::JOB_READ_FAILED);
        assert_eq!(sink.runs(), 0);
    }

    #[tokio::test]
    async fn test_emission_failure_outputs_empty_result() {
        let strategy: MemoryStrategy<String, String> =
            MemoryStrategy::new(vec![words("never", &[("a", "b")])]).with_failing_emission();
        let sink = strategy.sink();

        let report = Scheduler::new(strategy).run().await.unwrap();

        assert!(report.emission_error.is_some());
        assert_eq!(report.jobs_emitted, 0);
        assert!(sink.take_last().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_output_failure_is_fatal() {
        let strategy = MemoryStrategy::new(vec![words("a", &[("k", "v")])]).with_failing_output();
        let err = Scheduler::new(strategy).run().await.unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[tokio::test]
    async fn test_worker_count_does_not_change_grouping() {
        let jobs: Vec<_> = (0..8)
            .map(|i| {
                let pairs = (0..20)
                    .map(|j| (format!("k{}", j % 5), format!("{}-{}", i, j)))
                    .collect();
                MemoryJob::new(format!("job-{}", i), pairs)
                    .with_delay(Duration::from_micros(((8 - i) * 50) as u64))
            })
            .collect();

        let sequential = MemoryStrategy::new(jobs.clone());
        let sequential_sink = sequential.sink();
        Scheduler::new(sequential).run().await.unwrap();

        let parallel = MemoryStrategy::new(jobs);
        let parallel_sink = parallel.sink();
        let options = SchedulerOptions {
            workers: 4,
            ..SchedulerOptions::default()
        };
        Scheduler::new(parallel)
            .with_options(options)
            .run()
            .await
            .unwrap();

        assert_eq!(sequential_sink.take_last(), parallel_sink.take_last());
    }

    #[tokio::test]
    async fn test_slow_job_times_out() {
        let strategy = MemoryStrategy::new(vec![
            words("fast", &[("a", "x")]),
            words("slow", &[("b", "y"), ("b", "z")]).with_delay(Duration::from_millis(200)),
        ]);
        let sink = strategy.sink();
        let options = SchedulerOptions {
            job_timeout: Some(Duration::from_millis(50)),
            ..SchedulerOptions::default()
        };

        let report = Scheduler::new(strategy)
            .with_options(options)
            .run()
            .await
            .unwrap();

        assert_eq!(report.jobs_failed, 1);
        assert_eq!(report.failures[0].code, ErrorCode::JOB_TIMEOUT);
        assert_eq!(sink.take_last().unwrap().count(&"b".to_string()), 0);
    }

    #[tokio::test]
    async fn test_scheduler_is_reusable() {
        let strategy = MemoryStrategy::new(vec![words("a", &[("k", "1"), ("k", "2")])]);
        let sink = strategy.sink();
        let scheduler = Scheduler::new(strategy);

        scheduler.run().await.unwrap();
        let first = sink.take_last().unwrap();
        scheduler.run().await.unwrap();
        let second = sink.take_last().unwrap();

        assert_eq!(first, second);
    }
}
