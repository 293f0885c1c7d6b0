//! Submission-protocol client: boolean-result command cycles.

use base64::Engine;
use pocketmail_net::Connection;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::codec::{DATA_TERMINATOR, encode_dot_stuffed, is_final_line, strip_status_prefix};
use crate::error::Result;

/// Submission-protocol session over an exclusively-owned connection.
///
/// Every operation returns the server's verdict as a boolean; the only
/// `Err` paths are transport failures.
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

    /// Awaits the service banner. True iff it opens with `220`.
    ///
    /// # Errors
    ///
    /// Returns a transport error.
    pub async fn read_greeting(&mut self) -> Result<bool> {
        let line = self.read_reply().await?;
        Ok(line.starts_with("220"))
    }

    /// Sends the extended greeting and collects the server's capability
    /// lines: continuation lines are read until one carries a space in
    /// the fourth column, and each line comes back with its fixed
    /// 4-character status prefix stripped.
    ///
    /// A refusal is not an error here; the caller simply receives the
    /// refusal text and decides what to negotiate without.
    ///
    /// # Errors
    ///
    /// Returns a transport error.
    pub async fn execute_extended_greeting(&mut self, domain: &str) -> Result<Vec<String>> {
        self.conn.write_line(&format!("EHLO {domain}")).await?;
        let mut lines = Vec::new();
        loop {
            let line = self.conn.read_line().await?;
            let last = is_final_line(&line);
            lines.push(strip_status_prefix(&line).to_string());
            if last {
                break;
            }
        }
        Ok(lines)
    }

    /// MAIL FROM. True iff the reply opens with `250`.
    ///
    /// # Errors
    ///
    /// Returns a transport error.
    pub async fn execute_mail(&mut self, address: &str) -> Result<bool> {
        self.command_bool(&format!("MAIL FROM:<{address}>"), "250")
            .await
    }

    /// RCPT TO. True iff the reply opens with `250`.
    ///
    /// # Errors
    ///
    /// Returns a transport error.
    pub async fn execute_recipient(&mut self, address: &str) -> Result<bool> {
        self.command_bool(&format!("RCPT TO:<{address}>"), "250")
            .await
    }

    /// DATA: asks for the continuation, streams the dot-stuffed payload
    /// and the structural terminator, and reports the final verdict.
    ///
    /// If the continuation code is not `354` the payload is never sent
    /// and the result is false.
    ///
    /// # Errors
    ///
    /// Returns a transport error.
    pub async fn execute_data(&mut self, payload: &[u8]) -> Result<bool> {
        self.conn.write_line("DATA").await?;
        let line = self.read_reply().await?;
        if !line.starts_with("354") {
            tracing::debug!(reply = %line, "DATA continuation refused");
            return Ok(false);
        }

        self.conn.write_all(&encode_dot_stuffed(payload)).await?;
        self.conn.write_all(DATA_TERMINATOR).await?;

        let line = self.read_reply().await?;
        Ok(line.starts_with("250"))
    }

    /// AUTH PLAIN with a single base64 credential blob
    /// (`\0user\0pass`). True iff the reply opens with `235`.
    ///
    /// # Errors
    ///
    /// Returns a transport error.
    pub async fn execute_auth_plain(&mut self, username: &str, password: &str) -> Result<bool> {
        let credentials = format!("\0{username}\0{password}");
        let encoded =
            base64::engine::general_purpose::STANDARD.encode(credentials.as_bytes());
        self.command_bool(&format!("AUTH PLAIN {encoded}"), "235")
            .await
    }

    /// RSET. True iff the reply opens with `250`.
    ///
    /// # Errors
    ///
    /// Returns a transport error.
    pub async fn execute_reset(&mut self) -> Result<bool> {
        self.command_bool("RSET", "250").await
    }

    /// QUIT. True iff the reply opens with `221`.
    ///
    /// # Errors
    ///
    /// Returns a transport error.
    pub async fn execute_quit(&mut self) -> Result<bool> {
        self.command_bool("QUIT", "221").await
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
        self.conn.close().await.map_err(Into::into)
    }

    /// One command, one reply, verdict by status-code prefix.
    async fn command_bool(&mut self, command: &str, code: &str) -> Result<bool> {
        self.conn.write_line(command).await?;
        let line = self.read_reply().await?;
        Ok(line.starts_with(code))
    }

    /// Reads a full (possibly multi-line) reply, returning its final line,
    /// the one carrying the verdict.
    async fn read_reply(&mut self) -> Result<String> {
        loop {
            let line = self.conn.read_line().await?;
            if is_final_line(&line) {
                return Ok(line);
            }
        }
    }
}
