use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QmarkError {
    /// Anchor message or channel is gone. Fatal to the report.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Upstream throttled the request; retry after the given delay.
    #[error("Rate limited, retry after {}s", retry_after.as_secs())]
    RateLimited { retry_after: Duration },

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Bot error: {0}")]
    Bot(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl QmarkError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, QmarkError::RateLimited { .. })
    }
}

pub type Result<T> = std::result::Result<T, QmarkError>;
