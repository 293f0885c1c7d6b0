//! Error types for retrieval-protocol operations.

/// Result type alias for retrieval-protocol operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Retrieval-protocol error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport-level failure, distinguishable from protocol rejections.
    #[error("network error: {0}")]
    Net(#[from] pocketmail_net::Error),

    /// The server's status line signaled failure.
    #[error("command rejected: {line}")]
    CommandRejected {
        /// The full status line as received.
        line: String,
        /// Whether this rejection ends the session. Non-fatal rejections
        /// (authentication) are recoverable with new credentials.
        fatal: bool,
    },
}

impl Error {
    /// Builds a rejection for the given command, classifying fatality from
    /// the fixed rule table: rejections of authentication commands are
    /// non-fatal, everything else is fatal.
    #[must_use]
    pub fn rejected(command: Option<&str>, line: String) -> Self {
        let fatal = !command.is_some_and(is_auth_command);
        Self::CommandRejected { line, fatal }
    }

    /// Returns true if this error should terminate the session.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        match self {
            Self::CommandRejected { fatal, .. } => *fatal,
            Self::Net(_) => true,
        }
    }
}

/// Authentication command verbs, whose rejections are retryable.
fn is_auth_command(command: &str) -> bool {
    let verb = command.split(' ').next().unwrap_or("");
    verb.eq_ignore_ascii_case("USER")
        || verb.eq_ignore_ascii_case("PASS")
        || verb.eq_ignore_ascii_case("APOP")
}
