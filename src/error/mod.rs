use std::fmt::Display;
use std::path::PathBuf;
use thiserror::Error;

pub mod codes;
pub mod helpers;

pub use codes::ErrorCode;
pub use helpers::{common, ErrorExt};

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// The unified error type for the pipeline
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("[E{code:04}] Configuration error: {message}")]
    Config {
        code: u16,
        message: String,
        field: Option<String>,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("[E{code:04}] Enumeration error: {message}")]
    Enumeration {
        code: u16,
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("[E{code:04}] Job error: {message}")]
    Job {
        code: u16,
        message: String,
        job: Option<String>,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("[E{code:04}] Output error: {message}")]
    Output {
        code: u16,
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("[E{code:04}] {message}")]
    Other {
        code: u16,
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },
}

impl PipelineError {
    /// Create a configuration error with default code
    pub fn config(message: impl Into<String>) -> Self {
        Self::config_with_code(ErrorCode::CONFIG_GENERIC, message, None)
    }

    /// Create a configuration error with specific code and offending field
    pub fn config_with_code(code: u16, message: impl Into<String>, field: Option<String>) -> Self {
        Self::Config {
            code,
            message: message.into(),
            field,
            source: None,
        }
    }

    /// Create an enumeration error for the given input root
    pub fn enumeration(code: u16, message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::Enumeration {
            code,
            message: message.into(),
            path,
            source: None,
        }
    }

    /// Create a job error with default code
    pub fn job(message: impl Into<String>) -> Self {
        Self::job_with_code(ErrorCode::JOB_GENERIC, message, None)
    }

    /// Create a job error with specific code and job id
    pub fn job_with_code(code: u16, message: impl Into<String>, job: Option<String>) -> Self {
        Self::Job {
            code,
            message: message.into(),
            job,
            source: None,
        }
    }

    /// Create an output error for the given artifact path
    pub fn output(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::Output {
            code: ErrorCode::STORAGE_WRITE_FAILED,
            message: message.into(),
            path,
            source: None,
        }
    }

    /// Create a generic other error
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            code: ErrorCode::OTHER_GENERIC,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error to this error
    pub fn with_source(mut self, source: impl Into<BoxedSource>) -> Self {
        match &mut self {
            Self::Config { source: src, .. }
            | Self::Enumeration { source: src, .. }
            | Self::Job { source: src, .. }
            | Self::Output { source: src, .. }
            | Self::Other { source: src, .. } => {
                *src = Some(source.into());
            }
        }
        self
    }

    /// Add context to the error message
    pub fn with_context(mut self, context: impl Display) -> Self {
        match &mut self {
            Self::Config { message, .. }
            | Self::Enumeration { message, .. }
            | Self::Job { message, .. }
            | Self::Output { message, .. }
            | Self::Other { message, .. } => {
                *message = format!("{}: {}", message, context);
            }
        }
        self
    }

    /// Attach the id of the job this error belongs to
    pub fn for_job(mut self, job_id: impl Into<String>) -> Self {
        if let Self::Job { job: ref mut j, .. } = self {
            *j = Some(job_id.into());
        }
        self
    }

    /// Re-tag an error (usually a converted I/O error) as a job failure
    pub fn into_job_error(self, job_id: &str) -> Self {
        match self {
            Self::Job { .. } => self.for_job(job_id),
            other => {
                let message = other.user_message();
                Self::job_with_code(ErrorCode::JOB_READ_FAILED, message, Some(job_id.to_string()))
                    .with_source(other)
            }
        }
    }

    /// Get the process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config { .. } => 2,
            Self::Enumeration { .. } => 3,
            Self::Output { .. } => 4,
            Self::Job { .. } => 5,
            Self::Other { .. } => 1,
        }
    }

    /// Get the error code
    pub fn code(&self) -> u16 {
        match self {
            Self::Config { code, .. }
            | Self::Enumeration { code, .. }
            | Self::Job { code, .. }
            | Self::Output { code, .. }
            | Self::Other { code, .. } => *code,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Config { message, field, .. } => match field {
                Some(f) => format!("Configuration problem with '{}': {}", f, message),
                None => format!("Configuration problem: {}", message),
            },
            Self::Enumeration { message, path, .. } => match path {
                Some(p) => format!("Cannot list inputs under {}: {}", p.display(), message),
                None => format!("Cannot list inputs: {}", message),
            },
            Self::Job { message, job, .. } => match job {
                Some(j) => format!("Job '{}' failed: {}", j, message),
                None => format!("Job failed: {}", message),
            },
            Self::Output { message, path, .. } => match path {
                Some(p) => format!("Cannot write {}: {}", p.display(), message),
                None => format!("Output error: {}", message),
            },
            Self::Other { message, .. } => message.clone(),
        }
    }

    /// Whether the run can carry on after this error
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Job { .. } | Self::Enumeration { .. })
    }
}

/// Type alias for Results using PipelineError
pub type Result<T> = std::result::Result<T, PipelineError>;

impl From<std::io::Error> for PipelineError {
    fn from(err: std::io::Error) -> Self {
        use std::io::ErrorKind;

        let (code, message) = match err.kind() {
            ErrorKind::NotFound => (ErrorCode::STORAGE_NOT_FOUND, "File or directory not found"),
            ErrorKind::PermissionDenied => {
                (ErrorCode::STORAGE_PERMISSION_DENIED, "Permission denied")
            }
            ErrorKind::InvalidData => (ErrorCode::STORAGE_INVALID_DATA, "Invalid data"),
            ErrorKind::TimedOut => (ErrorCode::STORAGE_IO_ERROR, "Operation timed out"),
            _ => (ErrorCode::STORAGE_IO_ERROR, "IO operation failed"),
        };

        PipelineError::Other {
            code,
            message: message.to_string(),
            source: None,
        }
        .with_source(err)
    }
}

impl From<toml::de::Error> for PipelineError {
    fn from(err: toml::de::Error) -> Self {
        PipelineError::config_with_code(ErrorCode::CONFIG_INVALID_TOML, "Invalid TOML syntax", None)
            .with_source(err)
    }
}
