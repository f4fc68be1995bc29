// src/core/errors.rs

use crate::core::models::ScannerType;
use std::time::Duration;
use thiserror::Error;

/// Everything that can stop a single strategy of the dispatch chain.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScanError {
    /// No API key is stored for the scanner type.
    #[error("No API key configured for {0} scanning")]
    MissingCredential(ScannerType),

    /// The request never produced an HTTP response.
    #[error("Network error: {0}")]
    Transport(String),

    /// The upstream answered with a non-2xx status.
    #[error("API Error ({status}): {message}")]
    UpstreamRejected { status: u16, message: String },

    /// The upstream answered 2xx but the body carries an `error` field.
    #[error("API Error: {0}")]
    EmbeddedError(String),

    /// The upstream answered 2xx with a body we cannot read.
    #[error("Unexpected response: {0}")]
    MalformedResponse(String),

    /// The host lacks what the strategy needs (e.g. no usable network stack).
    #[error("Local network discovery is not available: {0}")]
    CapabilityUnavailable(String),

    #[error("Could not determine local IP address within {}ms", .0.as_millis())]
    DiscoveryTimeout(Duration),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl ScanError {
    /// Terminal errors stop the chain instead of falling through to the next strategy.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ScanError::MissingCredential(_) | ScanError::InvalidRequest(_))
    }
}

impl From<reqwest::Error> for ScanError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ScanError::Transport(format!("request timed out: {e}"))
        } else {
            ScanError::Transport(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credential_mentions_api_key() {
        let message = ScanError::MissingCredential(ScannerType::Port).to_string();
        assert!(message.contains("API key"));
        assert!(message.contains("port"));
    }

    #[test]
    fn only_credential_and_request_errors_are_terminal() {
        assert!(ScanError::MissingCredential(ScannerType::Network).is_terminal());
        assert!(ScanError::InvalidRequest("bad".into()).is_terminal());
        assert!(!ScanError::Transport("refused".into()).is_terminal());
        assert!(!ScanError::UpstreamRejected { status: 500, message: "x".into() }.is_terminal());
    }

    #[test]
    fn timeout_message_reports_milliseconds() {
        let message = ScanError::DiscoveryTimeout(Duration::from_secs(5)).to_string();
        assert_eq!(message, "Could not determine local IP address within 5000ms");
    }
}
