//! Error types for connection establishment and transport I/O.

use std::io;

use crate::transport::TransportKind;

/// Result type alias for network operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Network error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error on the underlying stream.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// TLS error.
    #[error("TLS error: {0}")]
    Tls(#[from] rustls::Error),

    /// Hostname cannot be used as a TLS server name.
    #[error("Invalid hostname: {0}")]
    InvalidHostname(String),

    /// A gateway transport kind was permitted but no gateway address is configured.
    #[error("No gateway configured for {0}")]
    GatewayUnconfigured(TransportKind),

    /// The preference bitmask permits no transport kind at all.
    #[error("No transport kinds permitted")]
    NoTransportsPermitted,

    /// Every permitted transport kind failed (or the sequence aborted).
    /// Wraps the last captured cause.
    #[error("No usable transport: {source}")]
    ConnectionUnavailable {
        /// The error captured from the last attempt.
        #[source]
        source: Box<Error>,
    },

    /// The connection was already closed by its owner.
    #[error("Connection is closed")]
    Closed,
}

impl Error {
    /// Wraps the last attempt's error into a terminal `ConnectionUnavailable`.
    #[must_use]
    pub fn unavailable(last: Self) -> Self {
        Self::ConnectionUnavailable {
            source: Box::new(last),
        }
    }

    /// Returns true if this is the terminal all-transports-failed error.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::ConnectionUnavailable { .. })
    }

    /// Returns true if this error aborts the whole failover sequence:
    /// no later transport kind can succeed either.
    #[must_use]
    pub const fn aborts_selection(&self) -> bool {
        matches!(self, Self::InvalidHostname(_))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_wraps_last_cause() {
        let last = Error::GatewayUnconfigured(TransportKind::WapGateway);
        let err = Error::unavailable(last);
        assert!(err.is_unavailable());
        assert!(err.to_string().contains("WAP gateway"));
    }

    #[test]
    fn invalid_hostname_aborts() {
        assert!(Error::InvalidHostname("bad host".into()).aborts_selection());
        assert!(!Error::Closed.aborts_selection());
    }
}
