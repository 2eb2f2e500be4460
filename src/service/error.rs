//! Errors returned by the auth capability.

use std::time::Duration;

use thiserror::Error;

/// Failure of a login or register call.
#[derive(Debug, Error)]
pub enum CapabilityError {
    /// Failed to reach the auth service
    #[error("Connection failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// The response body could not be decoded
    #[error("Invalid response: {0}")]
    Decode(String),

    /// The call did not complete in time
    #[error("Request timeout after {after:?}")]
    Timeout { after: Duration },
}

impl CapabilityError {
    /// Short error kind for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            CapabilityError::Transport(_) => "transport",
            CapabilityError::Rejected { .. } => "rejected",
            CapabilityError::Decode(_) => "decode",
            CapabilityError::Timeout { .. } => "timeout",
        }
    }
}
