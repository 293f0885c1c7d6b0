//! Error types for the session workers.

use thiserror::Error;

/// Errors that can end a mail session.
#[derive(Debug, Error)]
pub enum Error {
    /// Connection layer failure.
    #[error("Network error: {0}")]
    Net(#[from] pocketmail_net::Error),

    /// Retrieval command was rejected by the server.
    #[error("Retrieval error: {0}")]
    Retrieval(#[from] pocketmail_pop::Error),

    /// Submission command was refused. Refusals arrive as boolean results
    /// from the protocol crate; this variant exists so the worker can
    /// report which step the server turned down.
    #[error("Submission command {command} was refused by the server")]
    Refused {
        /// Verb of the refused command.
        command: String,
    },
}

impl From<pocketmail_smtp::Error> for Error {
    fn from(e: pocketmail_smtp::Error) -> Self {
        match e {
            pocketmail_smtp::Error::Net(e) => Self::Net(e),
        }
    }
}

impl Error {
    /// Refusal of the named submission command.
    #[must_use]
    pub fn refused(command: impl Into<String>) -> Self {
        Self::Refused {
            command: command.into(),
        }
    }

    /// Whether this error should end the session outright. Credential
    /// rejections are recoverable by asking the user again; everything
    /// else is not.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Net(_) => true,
            Self::Retrieval(e) => e.is_fatal(),
            Self::Refused { command } => !command.eq_ignore_ascii_case("AUTH"),
        }
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
