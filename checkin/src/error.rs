//! Error types for the check-in client.
//!
//! Only failures to obtain a usable server reply are errors. A well-formed
//! reply with `success: false` is a normal outcome and is represented by
//! [`MutationOutcome::Rejected`](crate::types::MutationOutcome::Rejected).

use thiserror::Error;

/// Result type for remote calls
pub type CheckinResult<T> = Result<T, CheckinError>;

/// Errors produced while talking to the remote service
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CheckinError {
    /// The request could not be sent or the connection failed
    #[error("Request failed: {0}")]
    Transport(String),

    /// The response body was not the expected JSON
    #[error("Response parsing failed: {0}")]
    Decode(String),

    /// Non-success status without a decodable body
    #[error("API error (status {status}): {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// A mutation was requested for an empty identifier; nothing was sent
    #[error("Empty identifier, request not sent")]
    EmptyInput,
}

impl CheckinError {
    /// Whether the error came from the network layer rather than the caller.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        !matches!(self, Self::EmptyInput)
    }
}
