//! # pocketmail-mime
//!
//! Message structure model and renderer.
//!
//! A fetched message body is described by a [`MessagePart`] tree: leaf
//! text, leaf opaque content, or a composite holding ordered children.
//! [`render`] flattens that tree depth-first, left-to-right into the
//! ordered sequence of [`RenderedElement`]s a screen can display.
//!
//! ```
//! use pocketmail_mime::{MessagePart, RenderedElement, render};
//!
//! let tree = MessagePart::multi(
//!     "mixed",
//!     vec![
//!         MessagePart::text("plain", "some text"),
//!         MessagePart::unsupported("image", "png"),
//!     ],
//! );
//! let elements = render(&tree);
//! assert_eq!(elements.len(), 2);
//! assert_eq!(elements[0], RenderedElement::Text("some text".into()));
//! ```
//!
//! [`Section`] carries the metadata the retrieval protocol reports for
//! one body section (type, subtype, size, transfer encoding);
//! [`build_part`] turns a section plus its fetched body into a leaf
//! part, honoring the caller's size threshold before any decoding.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod encoding;
mod error;
mod part;
mod section;

pub use error::{Error, Result};
pub use part::{MessagePart, RenderedElement, render};
pub use section::{Section, TransferEncoding, build_part};
