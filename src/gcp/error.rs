//! Error type for Compute Engine calls.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::gcp::gce::types::OperationError;

#[derive(Error, Debug)]
pub enum ComputeError {
    /// The request never produced an HTTP response (DNS, connect, timeout).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API returned status {status}: {body}")]
    Api { status: u16, body: String },

    /// The response body was not the JSON we expected.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The token endpoint rejected the assertion.
    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("failed to sign token assertion: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The operation reached `DONE` but carries an error payload.
    #[error("operation {name} failed: {error}")]
    OperationFailed { name: String, error: OperationError },

    #[error("operation {name} did not finish within {timeout:?}")]
    OperationTimeout { name: String, timeout: Duration },
}

pub type Result<T> = std::result::Result<T, ComputeError>;

impl ComputeError {
    /// Returns true for failures worth retrying: transport errors, rate
    /// limiting (429) and server errors (5xx).
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            ComputeError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            ComputeError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Returns true if this is a "not found" error (404)
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, ComputeError::Api { status: 404, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(status: u16) -> ComputeError {
        ComputeError::Api {
            status,
            body: String::new(),
        }
    }

    #[test]
    fn server_errors_and_throttling_are_transient() {
        assert!(api(500).is_transient());
        assert!(api(503).is_transient());
        assert!(api(429).is_transient());
    }

    #[test]
    fn client_errors_are_permanent() {
        assert!(!api(400).is_transient());
        assert!(!api(403).is_transient());
        assert!(!api(404).is_transient());
        assert!(api(404).is_not_found());
        assert!(
            !ComputeError::OperationTimeout {
                name: "op".to_string(),
                timeout: Duration::from_secs(1),
            }
            .is_transient()
        );
    }
}
