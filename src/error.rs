//! Error taxonomy for a single report generation run.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    /// Token exchange failed; nothing else was attempted.
    #[error("authentication failed: {0}")]
    Auth(String),
    /// Transport error, timeout, non-success status or unreadable body.
    #[error("request failed: {0}")]
    Fetch(String),
    /// The response parsed but lacked a field the report depends on.
    #[error("unexpected response shape: {0}")]
    Schema(String),
}

impl ReportError {
    /// Classify a reqwest failure. Timeouts keep their own wording so the
    /// per-day messages shown to the user say what actually happened.
    pub fn from_transport(context: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ReportError::Fetch(format!("{context}: timed out"))
        } else {
            ReportError::Fetch(format!("{context}: {err}"))
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
