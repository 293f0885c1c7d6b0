//! Retrieval-protocol client: command cycles over an open connection.

use std::collections::HashMap;

use pocketmail_net::Connection;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::error::{Error, Result};
use crate::response::{
    Capability, CommandResult, ListEntry, SENTINEL, UidlEntry, parse_capabilities, parse_count,
    parse_second_count, unescape_line,
};

/// Retrieval-protocol session over an exclusively-owned connection.
///
/// The client owns the [`Connection`] for the session's lifetime and is
/// responsible for closing it.
pub struct Client<S> {
    conn: Connection<S>,
}

impl<S> Client<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Takes ownership of an open connection.
    #[must_use]
    pub const fn new(conn: Connection<S>) -> Self {
        Self { conn }
    }

    /// Awaits the server greeting (a pending status line, no command sent).
    ///
    /// # Errors
    ///
    /// Returns [`Error::CommandRejected`] for a failing greeting, or a
    /// transport error.
    pub async fn read_greeting(&mut self) -> Result<CommandResult> {
        self.execute_single(None).await
    }

    /// Executes one single-line command cycle.
    ///
    /// With `Some(command)` the command line is sent first; `None` skips
    /// the send and just reads an already-pending response. The reply is
    /// a success unless it begins with the failure marker, in which case
    /// a [`Error::CommandRejected`] carrying the full line is raised,
    /// fatal or not per the fixed classification of the failing command.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CommandRejected`] on a failing status line, or a
    /// transport error.
    pub async fn execute_single(&mut self, command: Option<&str>) -> Result<CommandResult> {
        if let Some(command) = command {
            tracing::debug!(command = redact(command), "sending command");
            self.conn.write_line(command).await.map_err(Error::Net)?;
        }
        let line = self.conn.read_line().await.map_err(Error::Net)?;
        let result = CommandResult::classify(line);
        if result.is_ok() {
            Ok(result)
        } else {
            Err(Error::rejected(command, result.line))
        }
    }

    /// Executes a multi-line command cycle: status line first, then body
    /// lines streamed lazily until the sentinel.
    ///
    /// The returned [`BodyLines`] is finite and non-restartable; each
    /// response line is consumed exactly once as it arrives off the wire.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CommandRejected`] if the status line fails, or a
    /// transport error.
    pub async fn execute_multi_line(&mut self, command: &str) -> Result<BodyLines<'_, S>> {
        self.execute_single(Some(command)).await?;
        Ok(BodyLines {
            conn: &mut self.conn,
            done: false,
        })
    }

    /// USER then PASS. Rejections here are non-fatal: the caller may
    /// retry with new credentials on the same flow.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CommandRejected`] (non-fatal) on bad credentials.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<()> {
        self.execute_single(Some(&format!("USER {username}"))).await?;
        self.execute_single(Some(&format!("PASS {password}"))).await?;
        Ok(())
    }

    /// STAT: message count and total mailbox size. Unparsable numbers
    /// degrade to zero.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CommandRejected`] or a transport error.
    pub async fn stat(&mut self) -> Result<(u64, u64)> {
        let result = self.execute_single(Some("STAT")).await?;
        Ok((parse_count(&result.line), parse_second_count(&result.line)))
    }

    /// LIST: message numbers and sizes. Body lines that do not carry a
    /// parsable message number are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CommandRejected`] or a transport error.
    pub async fn list(&mut self) -> Result<Vec<ListEntry>> {
        let lines = self.execute_multi_line("LIST").await?.collect().await?;
        Ok(lines
            .iter()
            .filter_map(|l| ListEntry::parse(&String::from_utf8_lossy(l)))
            .collect())
    }

    /// UIDL: message numbers and unique ids.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CommandRejected`] or a transport error.
    pub async fn uidl(&mut self) -> Result<Vec<UidlEntry>> {
        let lines = self.execute_multi_line("UIDL").await?.collect().await?;
        Ok(lines
            .iter()
            .filter_map(|l| UidlEntry::parse(&String::from_utf8_lossy(l)))
            .collect())
    }

    /// RETR: the full message, body lines joined with CRLF.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CommandRejected`] or a transport error.
    pub async fn retr(&mut self, number: u32) -> Result<Vec<u8>> {
        self.execute_multi_line(&format!("RETR {number}"))
            .await?
            .concat()
            .await
    }

    /// TOP: headers plus the first `lines` body lines.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CommandRejected`] or a transport error.
    pub async fn top(&mut self, number: u32, lines: u32) -> Result<Vec<u8>> {
        self.execute_multi_line(&format!("TOP {number} {lines}"))
            .await?
            .concat()
            .await
    }

    /// DELE: marks a message for deletion.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CommandRejected`] or a transport error.
    pub async fn dele(&mut self, number: u32) -> Result<()> {
        self.execute_single(Some(&format!("DELE {number}"))).await?;
        Ok(())
    }

    /// NOOP keep-alive.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CommandRejected`] or a transport error.
    pub async fn noop(&mut self) -> Result<()> {
        self.execute_single(Some("NOOP")).await?;
        Ok(())
    }

    /// CAPA: capability discovery. A rejected CAPA means the server does
    /// not support discovery; that is an empty map, not an error.
    ///
    /// # Errors
    ///
    /// Returns a transport error only.
    pub async fn capabilities(&mut self) -> Result<HashMap<String, Capability>> {
        match self.execute_multi_line("CAPA").await {
            Ok(body) => {
                let lines = body.collect().await?;
                let text: Vec<String> = lines
                    .iter()
                    .map(|l| String::from_utf8_lossy(l).into_owned())
                    .collect();
                Ok(parse_capabilities(&text))
            }
            Err(Error::CommandRejected { .. }) => Ok(HashMap::new()),
            Err(e) => Err(e),
        }
    }

    /// QUIT. The server's answer is read but a rejection at this point is
    /// ignored; the session is over either way.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the command cannot be sent.
    pub async fn quit(&mut self) -> Result<()> {
        self.conn.write_line("QUIT").await.map_err(Error::Net)?;
        let _ = self.conn.read_line().await;
        Ok(())
    }

    /// Transfer totals of the owned connection.
    #[must_use]
    pub const fn transfer_totals(&self) -> (u64, u64) {
        (self.conn.bytes_sent(), self.conn.bytes_received())
    }

    /// Releases the underlying connection.
    #[must_use]
    pub fn into_connection(self) -> Connection<S> {
        self.conn
    }

    /// Closes the underlying connection.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the shutdown fails.
    pub async fn close(mut self) -> Result<()> {
        self.conn.close().await.map_err(Error::Net)
    }
}

/// Lazy stream of multi-line response body lines.
///
/// Lines arrive decoded: the terminating sentinel is consumed and never
/// yielded, and the `..` → `.` transparency rule is already reversed.
/// The stream is finite and cannot be re-iterated; it reads straight
/// off the wire.
pub struct BodyLines<'a, S> {
    conn: &'a mut Connection<S>,
    done: bool,
}

impl<S> BodyLines<'_, S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// The next body line, or `None` once the sentinel has been consumed.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the line cannot be read.
    pub async fn next(&mut self) -> Result<Option<Vec<u8>>> {
        if self.done {
            return Ok(None);
        }
        let line = self.conn.read_line_bytes().await.map_err(Error::Net)?;
        if line == SENTINEL {
            self.done = true;
            return Ok(None);
        }
        Ok(Some(unescape_line(&line).to_vec()))
    }

    /// Drains the stream into a vector of lines.
    ///
    /// # Errors
    ///
    /// Returns a transport error if a line cannot be read.
    pub async fn collect(mut self) -> Result<Vec<Vec<u8>>> {
        let mut lines = Vec::new();
        while let Some(line) = self.next().await? {
            lines.push(line);
        }
        Ok(lines)
    }

    /// Drains the stream into one buffer, lines joined with CRLF.
    ///
    /// # Errors
    ///
    /// Returns a transport error if a line cannot be read.
    pub async fn concat(mut self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        while let Some(line) = self.next().await? {
            out.extend_from_slice(&line);
            out.extend_from_slice(b"\r\n");
        }
        Ok(out)
    }
}

/// Hides the credential argument of PASS in logs.
fn redact(command: &str) -> &str {
    if command
        .split(' ')
        .next()
        .is_some_and(|verb| verb.eq_ignore_ascii_case("PASS"))
    {
        "PASS ****"
    } else {
        command
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn redact_hides_pass_argument() {
        assert_eq!(redact("PASS hunter2"), "PASS ****");
        assert_eq!(redact("pass hunter2"), "PASS ****");
        assert_eq!(redact("USER bob"), "USER bob");
    }
}
