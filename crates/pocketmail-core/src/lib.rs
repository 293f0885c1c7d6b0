//! # pocketmail-core
//!
//! High-level mail session workers.
//!
//! This crate ties the protocol engines together: a [`Settings`] value
//! describes one server, [`spawn_fetch`] retrieves a message over the
//! retrieval protocol, and [`spawn_submit`] sends one over the submission
//! protocol. Each worker runs on its own tokio task, owns its connection
//! for the whole session, and reports progress as [`SessionEvent`]s over
//! an unbounded channel to the single consumer loop.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod error;
pub mod service;
pub mod settings;

pub use error::{Error, Result};
pub use service::{Envelope, SessionEvent, spawn_fetch, spawn_submit};
pub use settings::{GatewayAddress, Settings};
