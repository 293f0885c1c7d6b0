//! Retrieval-protocol response classification and lenient reply parsing.

use std::collections::HashMap;

/// Marker that opens a failing status line.
pub const FAILURE_MARKER: &str = "-ERR";

/// Sentinel line terminating a multi-line response.
pub const SENTINEL: &[u8] = b".";

/// Status derived from the status line's leading marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The command was accepted.
    Ok,
    /// The command was rejected.
    Err,
}

/// A classified single-line response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    /// Success or failure, from the status line's marker.
    pub status: Status,
    /// The raw status line as received.
    pub line: String,
}

impl CommandResult {
    /// Classifies a status line: failure iff it begins with the failure
    /// marker, success otherwise.
    #[must_use]
    pub fn classify(line: String) -> Self {
        let status = if line.starts_with(FAILURE_MARKER) {
            Status::Err
        } else {
            Status::Ok
        };
        Self { status, line }
    }

    /// Returns true for an accepted command.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self.status, Status::Ok)
    }
}

/// Reverses the dot-transparency escape on one received body line: a line
/// beginning with `.` had it doubled on the wire, so exactly one leading
/// `.` is removed. Must be applied exactly once per received line.
#[must_use]
pub fn unescape_line(line: &[u8]) -> &[u8] {
    if line.first() == Some(&b'.') {
        &line[1..]
    } else {
        line
    }
}

/// The nth whitespace-free token of a status line (0 = the marker).
fn nth_token(line: &str, n: usize) -> Option<&str> {
    line.split(' ').filter(|t| !t.is_empty()).nth(n)
}

/// Extracts the numeric token between the first and second space.
/// On any parse failure the result is zero, a deliberate leniency,
/// not an error path.
#[must_use]
pub fn parse_count(line: &str) -> u64 {
    nth_token(line, 1).and_then(|t| t.parse().ok()).unwrap_or(0)
}

/// Like [`parse_count`] but for the token after it (e.g. the size field
/// of a STAT reply). Same leniency.
#[must_use]
pub fn parse_second_count(line: &str) -> u64 {
    nth_token(line, 2).and_then(|t| t.parse().ok()).unwrap_or(0)
}

/// A capability advertised by the server: either a bare flag or a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capability {
    /// Flag-only capability (e.g. `TOP`).
    Flag,
    /// Capability with an argument string (e.g. `EXPIRE NEVER`).
    Value(String),
}

/// Parses CAPA body lines into a name → capability mapping. A line's
/// first token names the capability; anything after it is its value.
#[must_use]
pub fn parse_capabilities<I, L>(lines: I) -> HashMap<String, Capability>
where
    I: IntoIterator<Item = L>,
    L: AsRef<str>,
{
    let mut caps = HashMap::new();
    for line in lines {
        let line = line.as_ref().trim_end();
        let mut split = line.splitn(2, ' ');
        let Some(name) = split.next().filter(|n| !n.is_empty()) else {
            continue;
        };
        let cap = match split.next().map(str::trim).filter(|v| !v.is_empty()) {
            Some(value) => Capability::Value(value.to_string()),
            None => Capability::Flag,
        };
        caps.insert(name.to_string(), cap);
    }
    caps
}

/// One LIST entry: message number and size in octets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    /// Message number.
    pub number: u32,
    /// Size in octets.
    pub size: u64,
}

impl ListEntry {
    /// Parses a LIST body line; entries with an unparsable message number
    /// are dropped by the caller (`None`), sizes degrade to zero.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let mut split = line.split_whitespace();
        let number = split.next()?.parse().ok()?;
        let size = split.next().and_then(|t| t.parse().ok()).unwrap_or(0);
        Some(Self { number, size })
    }
}

/// One UIDL entry: message number and unique id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UidlEntry {
    /// Message number.
    pub number: u32,
    /// Server-assigned unique id.
    pub id: String,
}

impl UidlEntry {
    /// Parses a UIDL body line.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let mut split = line.split_whitespace();
        let number = split.next()?.parse().ok()?;
        let id = split.next().unwrap_or("").to_string();
        Some(Self { number, id })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn classify_by_failure_marker() {
        assert!(CommandResult::classify("+OK ready".into()).is_ok());
        assert!(!CommandResult::classify("-ERR no".into()).is_ok());
        // Anything that does not open with the failure marker is success.
        assert!(CommandResult::classify("* odd banner".into()).is_ok());
    }

    #[test]
    fn parse_count_takes_second_token() {
        assert_eq!(parse_count("+OK 42 messages"), 42);
        assert_eq!(parse_count("+OK 3 120"), 3);
        assert_eq!(parse_second_count("+OK 3 120"), 120);
    }

    #[test]
    fn parse_count_degrades_to_zero() {
        assert_eq!(parse_count("+OK"), 0);
        assert_eq!(parse_count("+OK many messages"), 0);
        assert_eq!(parse_count(""), 0);
        assert_eq!(parse_second_count("+OK 3"), 0);
    }

    #[test]
    fn unescape_strips_exactly_one_dot() {
        assert_eq!(unescape_line(b"..line"), b".line");
        assert_eq!(unescape_line(b"...."), b"...");
        assert_eq!(unescape_line(b"line"), b"line");
        assert_eq!(unescape_line(b""), b"");
    }

    #[test]
    fn capabilities_split_flag_and_value() {
        let caps = parse_capabilities(["EXPIRE NEVER", "TOP"]);
        assert_eq!(caps.len(), 2);
        assert_eq!(caps.get("EXPIRE"), Some(&Capability::Value("NEVER".into())));
        assert_eq!(caps.get("TOP"), Some(&Capability::Flag));
    }

    #[test]
    fn capability_value_keeps_the_remainder() {
        let caps = parse_capabilities(["SASL PLAIN LOGIN"]);
        assert_eq!(
            caps.get("SASL"),
            Some(&Capability::Value("PLAIN LOGIN".into()))
        );
    }

    #[test]
    fn list_and_uidl_entries_parse_leniently() {
        assert_eq!(
            ListEntry::parse("1 1205"),
            Some(ListEntry {
                number: 1,
                size: 1205
            })
        );
        assert_eq!(
            ListEntry::parse("2 huge"),
            Some(ListEntry { number: 2, size: 0 })
        );
        assert_eq!(ListEntry::parse("junk 5"), None);

        assert_eq!(
            UidlEntry::parse("3 whqtswO00VBw418f9t5JxYwZ"),
            Some(UidlEntry {
                number: 3,
                id: "whqtswO00VBw418f9t5JxYwZ".into()
            })
        );
    }
}
