//! Retrieval session worker.
//!
//! Opens a connection through the transport selector, runs a retrieval
//! session for one message, parses the raw body into a part tree, and
//! posts the results as [`SessionEvent`]s.

use pocketmail_mime::{MessagePart, Section, TransferEncoding, build_part};
use pocketmail_net::selector;
use pocketmail_pop::Client;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::error::Result;
use crate::service::SessionEvent;
use crate::settings::Settings;

/// Spawns a worker that retrieves one message.
///
/// The returned receiver yields transport progress, then either a
/// `Fetched` event or a `Failed` event, and a `Finished` event with the
/// transfer totals when the session closed cleanly.
#[must_use]
pub fn spawn_fetch(settings: Settings, number: u32) -> UnboundedReceiver<SessionEvent> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        if let Err(e) = run(&settings, number, &tx).await {
            tracing::warn!(number, error = %e, "fetch session failed");
            let fatal = e.is_fatal();
            let _ = tx.send(SessionEvent::Failed {
                error: e.to_string(),
                fatal,
            });
        }
    });
    rx
}

async fn run(
    settings: &Settings,
    number: u32,
    tx: &UnboundedSender<SessionEvent>,
) -> Result<()> {
    let config = settings.net_config();
    let conn = selector::open(&config, settings.prefs(), |attempt| {
        let _ = tx.send(SessionEvent::Transport(attempt.clone()));
    })
    .await?;

    let mut client = Client::new(conn);
    client.read_greeting().await?;
    if settings.has_credentials() {
        client.login(&settings.username, &settings.password).await?;
    }

    let raw = client.retr(number).await?;
    let part = parse_message(&raw, settings.max_body_size);
    let _ = tx.send(SessionEvent::Fetched { number, part });

    client.quit().await?;
    let (bytes_sent, bytes_received) = client.transfer_totals();
    client.close().await?;
    let _ = tx.send(SessionEvent::Finished {
        bytes_sent,
        bytes_received,
    });
    Ok(())
}

/// Parses a raw retrieved message into a part tree.
///
/// Handles single-part bodies and nested multipart structures; anything
/// that cannot be decoded or displayed comes back as an unsupported leaf
/// so the renderer can still name it.
#[must_use]
pub fn parse_message(raw: &[u8], max_body_size: usize) -> MessagePart {
    let text = String::from_utf8_lossy(raw);
    let (headers, body) = split_headers_body(&text);
    parse_entity(headers, body, max_body_size)
}

fn parse_entity(headers: &str, body: &str, max_body_size: usize) -> MessagePart {
    let content_type = header_value(headers, "content-type").unwrap_or("text/plain");
    let (kind, subtype) = split_content_type(content_type);

    if kind.eq_ignore_ascii_case("multipart") {
        let Some(boundary) = extract_boundary(content_type) else {
            return MessagePart::unsupported(kind, subtype);
        };
        let children = split_multipart(body, &boundary)
            .into_iter()
            .map(|piece| {
                let (h, b) = split_headers_body(&piece);
                parse_entity(h, b, max_body_size)
            })
            .collect();
        return MessagePart::multi(subtype, children);
    }

    let encoding =
        TransferEncoding::parse(header_value(headers, "content-transfer-encoding").unwrap_or(""));
    let section = Section::new(kind, subtype, body.len(), encoding);
    build_part(&section, body, max_body_size)
}

/// Splits an entity at the first blank line.
fn split_headers_body(entity: &str) -> (&str, &str) {
    if let Some(idx) = entity.find("\r\n\r\n") {
        (&entity[..idx], &entity[idx + 4..])
    } else if let Some(idx) = entity.find("\n\n") {
        (&entity[..idx], &entity[idx + 2..])
    } else {
        (entity, "")
    }
}

/// Looks up a header value, ignoring continuation lines.
fn header_value<'a>(headers: &'a str, name: &str) -> Option<&'a str> {
    for line in headers.lines() {
        if line.starts_with(' ') || line.starts_with('\t') {
            continue;
        }
        if let Some((header, value)) = line.split_once(':')
            && header.trim().eq_ignore_ascii_case(name)
        {
            return Some(value.trim());
        }
    }
    None
}

/// Splits a content-type value into its type and subtype, dropping any
/// parameters.
fn split_content_type(value: &str) -> (String, String) {
    let media = value.split(';').next().unwrap_or(value).trim();
    media.split_once('/').map_or_else(
        || ("text".to_string(), "plain".to_string()),
        |(kind, subtype)| {
            (
                kind.trim().to_ascii_lowercase(),
                subtype.trim().to_ascii_lowercase(),
            )
        },
    )
}

/// Extracts the boundary parameter from a content-type value.
fn extract_boundary(value: &str) -> Option<String> {
    let lower = value.to_ascii_lowercase();
    let idx = lower.find("boundary=")?;
    let rest = &value[idx + "boundary=".len()..];
    if let Some(quoted) = rest.strip_prefix('"') {
        let end = quoted.find('"')?;
        Some(quoted[..end].to_string())
    } else {
        let end = rest
            .find(|c: char| c.is_whitespace() || c == ';')
            .unwrap_or(rest.len());
        Some(rest[..end].to_string())
    }
}

/// Splits a multipart body on its boundary delimiter, dropping the
/// preamble, epilogue, and closing delimiter.
fn split_multipart(body: &str, boundary: &str) -> Vec<String> {
    let delimiter = format!("--{boundary}");
    let mut parts = Vec::new();
    let mut pieces = body.split(&delimiter);

    // Everything before the first delimiter is preamble.
    pieces.next();
    for piece in pieces {
        // The closing delimiter leaves a piece starting with "--".
        if piece.starts_with("--") {
            break;
        }
        let trimmed = piece.trim_matches(['\r', '\n']);
        if !trimmed.is_empty() {
            parts.push(trimmed.to_string());
        }
    }
    parts
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const MAX: usize = 64 * 1024;

    #[test]
    fn plain_message_becomes_a_text_leaf() {
        let raw = b"Subject: hi\r\nContent-Type: text/plain\r\n\r\nhello there\r\n";
        let part = parse_message(raw, MAX);
        assert_eq!(part, MessagePart::text("plain", "hello there\r\n"));
    }

    #[test]
    fn missing_content_type_defaults_to_text_plain() {
        let raw = b"Subject: hi\r\n\r\nbody\r\n";
        let part = parse_message(raw, MAX);
        assert_eq!(part, MessagePart::text("plain", "body\r\n"));
    }

    #[test]
    fn quoted_printable_body_is_decoded() {
        let raw = b"Content-Type: text/plain\r\n\
                    Content-Transfer-Encoding: quoted-printable\r\n\
                    \r\n\
                    caf=C3=A9";
        let part = parse_message(raw, MAX);
        assert_eq!(part, MessagePart::text("plain", "caf\u{e9}"));
    }

    #[test]
    fn multipart_message_becomes_a_tree() {
        let raw = b"Content-Type: multipart/mixed; boundary=\"sep\"\r\n\
                    \r\n\
                    preamble\r\n\
                    --sep\r\n\
                    Content-Type: text/plain\r\n\
                    \r\n\
                    some text\r\n\
                    --sep\r\n\
                    Content-Type: image/png\r\n\
                    Content-Transfer-Encoding: base64\r\n\
                    \r\n\
                    aGVsbG8=\r\n\
                    --sep--\r\n\
                    epilogue\r\n";
        let part = parse_message(raw, MAX);
        let MessagePart::Multi { subtype, children } = part else {
            panic!("expected a multipart tree");
        };
        assert_eq!(subtype, "mixed");
        assert_eq!(children.len(), 2);
        assert_eq!(children[0], MessagePart::text("plain", "some text"));
        assert_eq!(children[1], MessagePart::unsupported("image", "png"));
    }

    #[test]
    fn nested_multipart_recurses() {
        let raw = b"Content-Type: multipart/mixed; boundary=outer\r\n\
                    \r\n\
                    --outer\r\n\
                    Content-Type: multipart/alternative; boundary=inner\r\n\
                    \r\n\
                    --inner\r\n\
                    Content-Type: text/plain\r\n\
                    \r\n\
                    inner text\r\n\
                    --inner--\r\n\
                    \r\n\
                    --outer--\r\n";
        let part = parse_message(raw, MAX);
        let MessagePart::Multi { children, .. } = &part else {
            panic!("expected a multipart tree");
        };
        let MessagePart::Multi { subtype, children } = &children[0] else {
            panic!("expected a nested multipart");
        };
        assert_eq!(subtype, "alternative");
        assert_eq!(children[0], MessagePart::text("plain", "inner text"));
    }

    #[test]
    fn oversize_body_is_reported_not_decoded() {
        let raw = b"Content-Type: text/plain\r\n\r\n0123456789";
        let part = parse_message(raw, 4);
        assert_eq!(part, MessagePart::unsupported("text", "plain"));
    }

    #[test]
    fn multipart_without_boundary_is_unsupported() {
        let raw = b"Content-Type: multipart/mixed\r\n\r\nbody\r\n";
        let part = parse_message(raw, MAX);
        assert_eq!(part, MessagePart::unsupported("multipart", "mixed"));
    }
}
