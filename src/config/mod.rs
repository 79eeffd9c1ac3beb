//! Pipeline configuration
//!
//! Values come from an optional TOML file and are then overridden by command
//! line flags. Every field has a default, so an empty file is a valid
//! configuration.

use crate::anagrams::{DEFAULT_EXTENSION, DEFAULT_MIN_TOKEN_LENGTH};
use crate::error::{common, Result};
use crate::pipeline::{FailurePolicy, SchedulerOptions};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub mod loader;

pub use loader::{ConfigLoader, ConfigOverrides};

/// Where the counts are written when nothing else is configured
pub const DEFAULT_OUTPUT: &str = "output/count_anagrams.txt";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Output artifact path
    pub output: PathBuf,

    /// Input file extension, without the leading dot
    pub extension: String,

    /// Words must be strictly longer than this
    pub min_token_length: usize,

    /// Jobs executed at the same time
    pub workers: usize,

    /// Per-job time budget
    #[serde(with = "humantime_serde")]
    pub job_timeout: Option<Duration>,

    pub failure_policy: FailurePolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT),
            extension: DEFAULT_EXTENSION.to_string(),
            min_token_length: DEFAULT_MIN_TOKEN_LENGTH,
            workers: 1,
            job_timeout: None,
            failure_policy: FailurePolicy::Skip,
        }
    }
}

impl PipelineConfig {
    /// Reject values the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(common::invalid_value("workers", "must be at least 1"));
        }
        if self.extension.is_empty() {
            return Err(common::invalid_value("extension", "must not be empty"));
        }
        if self.extension.contains(['.', '/', '\\']) {
            return Err(common::invalid_value(
                "extension",
                format!(
                    "'{}' must be a bare extension such as 'txt'",
                    self.extension
                ),
            ));
        }
        if self.job_timeout.is_some_and(|t| t.is_zero()) {
            return Err(common::invalid_value("job_timeout", "must be greater than zero"));
        }
        if self.output.as_os_str().is_empty() {
            return Err(common::invalid_value("output", "must not be empty"));
        }
        Ok(())
    }

    pub fn scheduler_options(&self, show_progress: bool) -> SchedulerOptions {
        SchedulerOptions {
            workers: self.workers,
            job_timeout: self.job_timeout,
            failure_policy: self.failure_policy,
            show_progress,
        }
    }
}
