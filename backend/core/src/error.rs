use thiserror::Error;

use crate::types::RunStatus;

/// Top-level error type for the codedesk runtime.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("assistant service error: {0}")]
    Service(String),

    #[error("Run {0}")]
    RunFailed(RunStatus),

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
