use super::PipelineConfig;
use crate::error::{common, ErrorExt, Result};
use crate::pipeline::FailurePolicy;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tracing::debug;

/// Values given on the command line; `None` leaves the file value alone
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub output: Option<PathBuf>,
    pub extension: Option<String>,
    pub min_token_length: Option<usize>,
    pub workers: Option<usize>,
    pub job_timeout: Option<Duration>,
    pub fail_fast: bool,
}

impl ConfigOverrides {
    pub fn apply(&self, mut config: PipelineConfig) -> PipelineConfig {
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        if let Some(extension) = &self.extension {
            config.extension = extension.clone();
        }
        if let Some(min) = self.min_token_length {
            config.min_token_length = min;
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if self.job_timeout.is_some() {
            config.job_timeout = self.job_timeout;
        }
        if self.fail_fast {
            config.failure_policy = FailurePolicy::Abort;
        }
        config
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load the file (if any), apply overrides, and validate the result
    pub async fn load(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<PipelineConfig> {
        let base = match path {
            Some(path) => Self::load_file(path).await?,
            None => PipelineConfig::default(),
        };
        let config = overrides.apply(base);
        config.validate()?;
        debug!(?config, "Resolved configuration");
        Ok(config)
    }

    pub async fn load_file(path: &Path) -> Result<PipelineConfig> {
        if !fs::try_exists(path).await.unwrap_or(false) {
            return Err(common::config_not_found(path));
        }
        let content = fs::read_to_string(path)
            .await
            .to_config_error(format!("cannot read {}", path.display()))?;
        Self::parse(&content).map_err(|e| e.with_context(path.display()))
    }

    pub fn parse(content: &str) -> Result<PipelineConfig> {
        Ok(toml::from_str(content)?)
    }
}
