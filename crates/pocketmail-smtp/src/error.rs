//! Error types for submission-protocol operations.
//!
//! Deliberately small: protocol-level refusals are `Ok(false)` returns,
//! so the only errors this crate raises come from the transport.

/// Result type alias for submission-protocol operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Submission-protocol error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport-level failure.
    #[error("network error: {0}")]
    Net(#[from] pocketmail_net::Error),
}
