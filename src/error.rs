use std::process::ExitStatus;

pub type ConvoyResult<T> = Result<T, ConvoyError>;

#[derive(Debug, thiserror::Error)]
pub enum ConvoyError {
    #[error("command failed: {command}")]
    CommandFailed { command: String, status: ExitStatus },

    #[error("command not found: {0}")]
    CommandNotFound(String),

    #[error("prerequisite missing: {0}")]
    PrerequisiteMissing(String),

    #[error("AWS API error: {0}")]
    AwsApi(String),

    #[error("expected at most one running environment, found {0}")]
    SlotConflict(usize),

    #[error("environment '{0}' matches neither slot suffix")]
    UnknownSlot(String),

    #[error("no environment named '{0}'")]
    EnvironmentNotFound(String),

    #[error("environment variable missing: {0}")]
    EnvMissing(String),

    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
