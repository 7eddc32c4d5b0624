//! Error types for calendar syncing.

use thiserror::Error;

/// Errors that can occur while syncing a calendar subscription.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Bad input, nothing was fetched or written
    #[error("{0}")]
    Validation(String),

    #[error("Failed to fetch calendar: {0}")]
    Fetch(String),

    #[error("Failed to parse calendar: {0}")]
    Parse(String),

    #[error("Calendar sync failed: {0}")]
    Operation(#[from] anyhow::Error),
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return SyncError::Fetch(format!("request timed out: {}", err));
        }
        SyncError::Fetch(err.to_string())
    }
}

pub type SyncResult<T> = Result<T, SyncError>;
