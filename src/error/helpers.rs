use super::{ErrorCode, PipelineError};
use std::path::PathBuf;

/// Extension trait for convenient error conversion
pub trait ErrorExt<T> {
    /// Convert to PipelineError with specific error type
    fn to_config_error(self, message: impl Into<String>) -> Result<T, PipelineError>;
    fn to_output_error(self, message: impl Into<String>, path: Option<PathBuf>)
        -> Result<T, PipelineError>;
    fn to_job_error(self, message: impl Into<String>, job: &str) -> Result<T, PipelineError>;
}

impl<T, E> ErrorExt<T> for Result<T, E>
where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    fn to_config_error(self, message: impl Into<String>) -> Result<T, PipelineError> {
        self.map_err(|e| PipelineError::config(message).with_source(e))
    }

    fn to_output_error(
        self,
        message: impl Into<String>,
        path: Option<PathBuf>,
    ) -> Result<T, PipelineError> {
        self.map_err(|e| PipelineError::output(message, path).with_source(e))
    }

    fn to_job_error(self, message: impl Into<String>, job: &str) -> Result<T, PipelineError> {
        self.map_err(|e| {
            PipelineError::job_with_code(ErrorCode::JOB_READ_FAILED, message, Some(job.to_string()))
                .with_source(e)
        })
    }
}

/// Helper functions for common error scenarios
pub mod common {
    use super::*;
    use std::path::Path;
    use std::time::Duration;

    /// The scheduler was asked to run without a strategy
    pub fn strategy_missing() -> PipelineError {
        PipelineError::config_with_code(
            ErrorCode::CONFIG_MISSING_REQUIRED,
            "no strategy configured",
            Some("strategy".to_string()),
        )
    }

    /// Create a not found error for configuration
    pub fn config_not_found(path: impl AsRef<Path>) -> PipelineError {
        PipelineError::config_with_code(
            ErrorCode::CONFIG_NOT_FOUND,
            format!("Configuration file not found: {}", path.as_ref().display()),
            None,
        )
    }

    /// Create an invalid value error for a configuration field
    pub fn invalid_value(field: &str, reason: impl Into<String>) -> PipelineError {
        PipelineError::config_with_code(
            ErrorCode::CONFIG_INVALID_VALUE,
            reason,
            Some(field.to_string()),
        )
    }

    /// The input root does not exist
    pub fn root_not_found(path: impl AsRef<Path>) -> PipelineError {
        PipelineError::enumeration(
            ErrorCode::STORAGE_NOT_FOUND,
            "input root does not exist",
            Some(path.as_ref().to_path_buf()),
        )
    }

    /// The input root exists but is not a directory
    pub fn root_not_directory(path: impl AsRef<Path>) -> PipelineError {
        PipelineError::enumeration(
            ErrorCode::STORAGE_NOT_A_DIRECTORY,
            "input root is not a directory",
            Some(path.as_ref().to_path_buf()),
        )
    }

    /// A job did not finish within its deadline
    pub fn job_timeout(job: &str, timeout: Duration) -> PipelineError {
        PipelineError::job_with_code(
            ErrorCode::JOB_TIMEOUT,
            format!("timed out after {:?}", timeout),
            Some(job.to_string()),
        )
    }
}
