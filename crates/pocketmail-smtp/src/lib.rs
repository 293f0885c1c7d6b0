//! # pocketmail-smtp
//!
//! Submission-protocol (SMTP) command engine.
//!
//! Unlike the retrieval engine, a refused command here is an ordinary
//! return value: every `execute_*` operation yields `Ok(false)` when the
//! server says no, and errors are reserved for the transport. Callers
//! check booleans, not exceptions, for this protocol family.
//!
//! The extended greeting uses this family's framing (a fixed 4-character
//! status prefix per line, final line marked by a space in the fourth
//! column) rather than the retrieval engine's dot sentinel. Outbound
//! message payloads get the mirror transparency rule: a payload line
//! beginning with `.` is doubled on the wire so the receiver's single
//! unescape restores it, and the terminator's structural dot is never
//! itself re-escaped.
//!
//! ```ignore
//! use pocketmail_smtp::Client;
//!
//! let mut client = Client::new(conn);
//! client.read_greeting().await?;
//! client.execute_extended_greeting("handset.example").await?;
//! if client.execute_auth_plain("user", "secret").await? {
//!     client.execute_mail("user@example.com").await?;
//!     client.execute_recipient("to@example.net").await?;
//!     client.execute_data(b"Subject: hi\r\n\r\nhello\r\n").await?;
//! }
//! client.execute_quit().await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod client;
pub mod codec;
mod error;

pub use client::Client;
pub use error::{Error, Result};
