//! # pocketmail-pop
//!
//! Retrieval-protocol (POP3) command engine.
//!
//! The engine runs request/response cycles over an already-open
//! [`pocketmail_net::Connection`]:
//!
//! - [`Client::execute_single`]: one command line, one status line
//! - [`Client::execute_multi_line`]: status line, then a lazy stream of
//!   body lines terminated by the lone `.` sentinel, with `..` → `.`
//!   transparency unescaping applied as each line arrives
//! - the ordinary command surface (USER/PASS, STAT, LIST, UIDL, RETR,
//!   TOP, DELE, NOOP, CAPA, QUIT) expressed over those primitives
//!
//! Status lines that signal failure raise [`Error::CommandRejected`]
//! carrying a fatal/non-fatal flag: authentication rejections are
//! retryable with new credentials, everything else ends the session.
//!
//! Numeric replies are parsed leniently; an unparsable count is zero,
//! never an error. Capability discovery follows the same policy: a
//! rejected CAPA yields an empty map.
//!
//! ```ignore
//! use pocketmail_pop::Client;
//!
//! let mut client = Client::new(conn);
//! client.read_greeting().await?;
//! client.login("user", "secret").await?;
//! let (count, _size) = client.stat().await?;
//! let body = client.retr(1).await?;
//! client.quit().await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod client;
mod error;
pub mod response;

pub use client::{BodyLines, Client};
pub use error::{Error, Result};
pub use response::{Capability, CommandResult, ListEntry, Status, UidlEntry};
