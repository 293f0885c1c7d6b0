//! Section metadata and the part builder.
//!
//! A retrieval session hands back section metadata (type, subtype, size,
//! transfer encoding) and a raw body; [`build_part`] turns the pair into a
//! [`MessagePart`] suitable for rendering.

use crate::encoding::{decode_base64, decode_quoted_printable};
use crate::error::Result;
use crate::part::MessagePart;

/// Content transfer encoding of a section body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferEncoding {
    /// Plain ASCII, no decoding needed.
    #[default]
    SevenBit,
    /// Raw octets, no decoding needed.
    EightBit,
    /// Base64 (RFC 2045).
    Base64,
    /// Quoted-Printable (RFC 2045).
    QuotedPrintable,
}

impl TransferEncoding {
    /// Parses a transfer-encoding header value.
    ///
    /// Unknown values fall back to `SevenBit` rather than failing; an
    /// undecodable body still surfaces later as an unsupported part, so a
    /// strict parse here would only reject content we could have shown.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "8bit" | "binary" => Self::EightBit,
            "base64" => Self::Base64,
            "quoted-printable" => Self::QuotedPrintable,
            _ => Self::SevenBit,
        }
    }
}

/// Metadata describing one body section before its content is decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Top-level content type (e.g. `text`).
    pub kind: String,
    /// Content subtype (e.g. `plain`).
    pub subtype: String,
    /// Declared size in bytes.
    pub size: usize,
    /// Transfer encoding of the body.
    pub encoding: TransferEncoding,
}

impl Section {
    /// Section metadata with the given type, subtype and size.
    #[must_use]
    pub fn new(
        kind: impl Into<String>,
        subtype: impl Into<String>,
        size: usize,
        encoding: TransferEncoding,
    ) -> Self {
        Self {
            kind: kind.into(),
            subtype: subtype.into(),
            size,
            encoding,
        }
    }

    fn is_text(&self) -> bool {
        self.kind.eq_ignore_ascii_case("text")
    }
}

/// Builds a displayable part from section metadata and its raw body.
///
/// A section is rendered as text only when all of the following hold: its
/// declared size is within `max_size`, its type is `text/*`, its transfer
/// encoding decodes, and the decoded bytes are valid UTF-8. Anything else
/// becomes an unsupported part so the renderer can still name it.
#[must_use]
pub fn build_part(section: &Section, body: &str, max_size: usize) -> MessagePart {
    if section.size > max_size || !section.is_text() {
        return MessagePart::unsupported(section.kind.clone(), section.subtype.clone());
    }

    if matches!(
        section.encoding,
        TransferEncoding::SevenBit | TransferEncoding::EightBit
    ) {
        return MessagePart::text(section.subtype.clone(), body);
    }

    match decode_text(section, body) {
        Ok(content) => MessagePart::text(section.subtype.clone(), content),
        Err(e) => {
            tracing::debug!(
                kind = %section.kind,
                subtype = %section.subtype,
                error = %e,
                "section body failed to decode"
            );
            MessagePart::unsupported(section.kind.clone(), section.subtype.clone())
        }
    }
}

/// Undoes the transfer encoding and checks the result is valid UTF-8.
fn decode_text(section: &Section, body: &str) -> Result<String> {
    let decoded = match section.encoding {
        TransferEncoding::SevenBit | TransferEncoding::EightBit => body.as_bytes().to_vec(),
        TransferEncoding::Base64 => decode_base64(body)?,
        TransferEncoding::QuotedPrintable => decode_quoted_printable(body)?,
    };
    Ok(String::from_utf8(decoded)?)
}
