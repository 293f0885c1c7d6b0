//! # pocketmail-net
//!
//! Network layer for the pocketmail protocol engine: transport selection
//! with ordered failover, and the buffered [`Connection`] the protocol
//! crates drive.
//!
//! ## Transport failover
//!
//! A handset can reach a mail server over several network paths (Wi-Fi,
//! direct cellular TCP, a carrier gateway, a WAP gateway). The caller
//! states which paths are permitted via [`TransportPrefs`]; [`open`]
//! tries them in fixed priority order and hands back the first
//! connection that comes up. Every step of the failover is reported
//! synchronously through a callback as a [`TransportAttempt`].
//!
//! ```ignore
//! use pocketmail_net::{open, Config, TransportPrefs};
//!
//! let config = Config::builder("mail.example.com", 110).tls(false).build();
//! let conn = open(&config, TransportPrefs::ALL, |attempt| {
//!     println!("{attempt:?}");
//! })
//! .await?;
//! ```
//!
//! ## Connection
//!
//! [`Connection`] owns a single physical stream (plain TCP or TLS via
//! rustls), exposes CRLF line primitives, and accounts every byte that
//! was actually sent or received. It is generic over the underlying
//! stream so protocol tests can drive it with a scripted mock.
//!
//! ## Modules
//!
//! - [`config`]: Target server and gateway configuration
//! - [`connection`]: Buffered connection with transfer accounting
//! - [`selector`]: Ordered transport failover
//! - [`stream`]: Plain/TLS stream plumbing
//! - [`transport`]: Transport kinds, preference bitmask, attempt records

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod config;
pub mod connection;
mod error;
pub mod selector;
pub mod stream;
pub mod transport;

pub use config::{Config, ConfigBuilder, Gateway};
pub use connection::Connection;
pub use error::{Error, Result};
pub use selector::{Dial, TcpDialer, open, open_with};
pub use stream::MailStream;
pub use transport::{AttemptOutcome, TransportAttempt, TransportKind, TransportPrefs};
