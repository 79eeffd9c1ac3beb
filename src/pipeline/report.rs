//! Run statistics

use crate::error::PipelineError;
use humantime_serde::re::humantime::format_duration;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// A job that contributed nothing to the run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobFailure {
    pub job: String,
    pub code: u16,
    pub message: String,
}

impl JobFailure {
    pub fn from_error(job: impl Into<String>, error: &PipelineError) -> Self {
        Self {
            job: job.into(),
            code: error.code(),
            message: error.user_message(),
        }
    }
}

/// Summary of one scheduler run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    pub strategy: String,
    pub jobs_emitted: usize,
    pub jobs_succeeded: usize,
    pub jobs_failed: usize,
    pub pairs: usize,
    pub keys: usize,
    pub emission_error: Option<String>,
    pub failures: Vec<JobFailure>,
    #[serde(with = "humantime_serde")]
    pub elapsed: Duration,
}

impl RunReport {
    pub fn new(strategy: impl Into<String>) -> Self {
        Self {
            strategy: strategy.into(),
            ..Self::default()
        }
    }

    pub fn record_failure(&mut self, failure: JobFailure) {
        self.jobs_failed += 1;
        self.failures.push(failure);
    }

    /// True when every emitted job succeeded and emission itself worked
    pub fn is_clean(&self) -> bool {
        self.emission_error.is_none() && self.jobs_failed == 0
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Strategy:       {}", self.strategy)?;
        writeln!(
            f,
            "Jobs:           {} emitted, {} succeeded, {} failed",
            self.jobs_emitted, self.jobs_succeeded, self.jobs_failed
        )?;
        writeln!(f, "Pairs grouped:  {}", self.pairs)?;
        writeln!(f, "Distinct keys:  {}", self.keys)?;
        let elapsed = Duration::from_millis(self.elapsed.as_millis() as u64);
        writeln!(f, "Elapsed:        {}", format_duration(elapsed))?;
        if let Some(err) = &self.emission_error {
            writeln!(f, "Emission error: {}", err)?;
        }
        for failure in &self.failures {
            writeln!(
                f,
                "  [E{:04}] {}: {}",
                failure.code, failure.job, failure.message
            )?;
        }
        Ok(())
    }
}
