//! Background session workers.
//!
//! Each worker runs one complete protocol session on a spawned tokio task
//! and reports progress and results over an unbounded channel. The
//! consumer loop owns the receiving end; dropping it abandons the output
//! but lets the task run its session to completion.

mod fetch;
mod submit;

pub use fetch::spawn_fetch;
pub use submit::{Envelope, spawn_submit};

use pocketmail_mime::MessagePart;
use pocketmail_net::TransportAttempt;

/// Progress and result events posted by a session worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A transport failover step changed state. Each attempt is reported
    /// once as pending and once with its final outcome.
    Transport(TransportAttempt),
    /// A message was retrieved and turned into a displayable part tree.
    Fetched {
        /// Message number that was retrieved.
        number: u32,
        /// Parsed body, ready for the renderer.
        part: MessagePart,
    },
    /// The session ended early. `fatal` distinguishes errors that should
    /// terminate the session from ones a collaborator can recover from,
    /// such as prompting for new credentials.
    Failed {
        /// Human-readable description of the failure.
        error: String,
        /// Whether the failure ends the session outright.
        fatal: bool,
    },
    /// The session completed and the connection was closed.
    Finished {
        /// Total bytes written over the connection.
        bytes_sent: u64,
        /// Total bytes read over the connection.
        bytes_received: u64,
    },
}
