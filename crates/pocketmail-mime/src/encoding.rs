//! Transfer-encoding decoders for message bodies.
//!
//! Base64 is handled by the `base64` crate; Quoted-Printable (RFC 2045)
//! is decoded here directly.

use crate::error::{Error, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Decodes Base64 body data.
///
/// Whitespace is stripped first, since wire bodies arrive folded into
/// lines the encoder is not expected to accept.
///
/// # Errors
///
/// Returns an error if the input is not valid Base64.
pub fn decode_base64(data: &str) -> Result<Vec<u8>> {
    let compact: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    STANDARD.decode(compact).map_err(Into::into)
}

/// Decodes Quoted-Printable body data (RFC 2045).
///
/// Soft line breaks (`=` at end of line) are removed; `=XX` sequences
/// become the byte they name.
///
/// # Errors
///
/// Returns an error if an escape sequence is incomplete or not hex.
pub fn decode_quoted_printable(data: &str) -> Result<Vec<u8>> {
    let mut result = Vec::with_capacity(data.len());
    let bytes = data.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'=' {
            result.push(bytes[i]);
            i += 1;
            continue;
        }

        // Soft line break: '=' immediately before CRLF or bare LF.
        match bytes.get(i + 1) {
            Some(b'\r') if bytes.get(i + 2) == Some(&b'\n') => {
                i += 3;
                continue;
            }
            Some(b'\n') => {
                i += 2;
                continue;
            }
            _ => {}
        }

        let hex = bytes
            .get(i + 1..i + 3)
            .ok_or_else(|| Error::InvalidEncoding("incomplete escape sequence".to_string()))?;
        let hex = std::str::from_utf8(hex)
            .map_err(|_| Error::InvalidEncoding("non-ASCII escape sequence".to_string()))?;
        let byte = u8::from_str_radix(hex, 16)
            .map_err(|e| Error::InvalidEncoding(format!("invalid hex escape: {e}")))?;
        result.push(byte);
        i += 3;
    }

    Ok(result)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn base64_round_trip() {
        let decoded = decode_base64("SGVsbG8sIFdvcmxkIQ==").unwrap();
        assert_eq!(decoded, b"Hello, World!");
    }

    #[test]
    fn base64_tolerates_folded_lines() {
        let decoded = decode_base64("SGVs\r\nbG8s\r\nIFdvcmxkIQ==").unwrap();
        assert_eq!(decoded, b"Hello, World!");
    }

    #[test]
    fn base64_rejects_garbage() {
        assert!(decode_base64("not base64!").is_err());
    }

    #[test]
    fn quoted_printable_plain_text_passes_through() {
        let decoded = decode_quoted_printable("Hello, World!").unwrap();
        assert_eq!(decoded, b"Hello, World!");
    }

    #[test]
    fn quoted_printable_decodes_hex_escapes() {
        let decoded = decode_quoted_printable("H=C3=A9llo").unwrap();
        assert_eq!(String::from_utf8(decoded).unwrap(), "H\u{e9}llo");
    }

    #[test]
    fn quoted_printable_removes_soft_breaks() {
        let decoded = decode_quoted_printable("Hello=\r\nWorld").unwrap();
        assert_eq!(decoded, b"HelloWorld");
        let decoded = decode_quoted_printable("Hello=\nWorld").unwrap();
        assert_eq!(decoded, b"HelloWorld");
    }

    #[test]
    fn quoted_printable_rejects_truncated_escape() {
        assert!(decode_quoted_printable("oops=4").is_err());
        assert!(decode_quoted_printable("oops=ZZ").is_err());
    }
}
