//! Small shared helpers for the HTTP collaborators

use reqwest::StatusCode;
use std::time::Duration;

/// Whether an HTTP status is worth retrying
pub fn should_retry(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Whether a transport-level error is worth retrying
pub fn is_transient(err: &reqwest::Error) -> bool {
    err.is_connect() || err.is_timeout() || err.is_request() || err.is_body()
}

/// Exponential backoff delay for the given retry attempt (1-based)
pub fn retry_backoff(attempt: usize) -> Duration {
    let capped = attempt.min(5) as u32;
    Duration::from_millis(500 * (1 << capped))
}
