// Error types for the offshell cache worker

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("store error: {0}")]
    Store(String),

    #[error("precache failed for {url}: {reason}")]
    Precache { url: String, reason: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("invalid lifecycle transition: {from} -> {to}")]
    InvalidTransition { from: &'static str, to: &'static str },

    #[error("internal error: {0}")]
    Internal(String),
}

impl WorkerError {
    /// True for failures the router may recover from by falling back to a
    /// stored entry (transport-level fetch failures, not storage errors).
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, WorkerError::Network(_) | WorkerError::Http(_))
    }
}

pub type Result<T> = std::result::Result<T, WorkerError>;
