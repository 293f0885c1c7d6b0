//! Error types for message decoding.

use std::string::FromUtf8Error;

/// Result type alias for message decoding.
pub type Result<T> = std::result::Result<T, Error>;

/// Message decoding error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid transfer-encoded content.
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),

    /// Base64 decode error.
    #[error("Base64 decode error: {0}")]
    Base64Decode(#[from] base64::DecodeError),

    /// UTF-8 decode error.
    #[error("UTF-8 decode error: {0}")]
    Utf8Decode(#[from] FromUtf8Error),
}
