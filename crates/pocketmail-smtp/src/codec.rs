//! Wire codec helpers: reply framing and outbound dot transparency.

/// Length of the fixed status prefix on every reply line (`250 ` / `250-`).
const STATUS_PREFIX_LEN: usize = 4;

/// Terminator for a DATA payload. Its leading dot is structural and is
/// never dot-stuffed.
pub const DATA_TERMINATOR: &[u8] = b".\r\n";

/// Returns true for the final line of a reply: the fourth column holds a
/// space instead of the continuation `-`. Lines too short to carry a
/// continuation marker are treated as final rather than looping forever.
#[must_use]
pub fn is_final_line(line: &str) -> bool {
    line.as_bytes()
        .get(STATUS_PREFIX_LEN - 1)
        .is_none_or(|b| *b == b' ')
}

/// Strips the fixed 4-character status prefix from a reply line. Lossy
/// decoding of a malformed reply can put a multi-byte replacement char
/// across the prefix boundary, so the cut falls back to empty rather
/// than slicing mid-character.
#[must_use]
pub fn strip_status_prefix(line: &str) -> &str {
    line.get(STATUS_PREFIX_LEN..).unwrap_or("")
}

/// Applies the outbound transparency rule to a message payload: each line
/// beginning with `.` gains one more so the receiver's single unescape
/// restores the original; other lines pass through unmodified. Line
/// endings are normalized to CRLF and the final line is CRLF-terminated,
/// ready for the [`DATA_TERMINATOR`] to follow.
#[must_use]
pub fn encode_dot_stuffed(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload.len() + 16);
    let mut lines = payload.split(|&b| b == b'\n').peekable();
    while let Some(line) = lines.next() {
        // A trailing newline leaves one empty segment at the end; that is
        // not an extra payload line.
        if line.is_empty() && lines.peek().is_none() {
            break;
        }
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        if line.first() == Some(&b'.') {
            out.push(b'.');
        }
        out.extend_from_slice(line);
        out.extend_from_slice(b"\r\n");
    }
    out
}
