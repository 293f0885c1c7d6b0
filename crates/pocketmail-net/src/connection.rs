//! Buffered mail connection with transfer accounting.

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

use crate::{Error, Result};

/// A single physical stream to a mail server.
///
/// Owned exclusively by whichever protocol session is using it, and closed
/// by that owner. Generic over the underlying stream so protocol tests can
/// substitute a scripted mock for the real socket.
///
/// Byte counters cover successful I/O only and never decrease.
pub struct Connection<S> {
    reader: BufReader<S>,
    url: String,
    tls: bool,
    bytes_sent: u64,
    bytes_received: u64,
    open: bool,
}

impl<S> std::fmt::Debug for Connection<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("url", &self.url)
            .field("tls", &self.tls)
            .field("bytes_sent", &self.bytes_sent)
            .field("bytes_received", &self.bytes_received)
            .field("open", &self.open)
            .finish_non_exhaustive()
    }
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wraps an established stream. `url` is the resolved connection URL,
    /// set once here and never changed.
    #[must_use]
    pub fn new(stream: S, url: impl Into<String>, tls: bool) -> Self {
        Self {
            reader: BufReader::new(stream),
            url: url.into(),
            tls,
            bytes_sent: 0,
            bytes_received: 0,
            open: true,
        }
    }

    /// Resolved connection URL (e.g. `ssl://mail.example.com:995`).
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns true if the stream is TLS-encrypted.
    #[must_use]
    pub const fn is_tls(&self) -> bool {
        self.tls
    }

    /// Cumulative bytes successfully written.
    #[must_use]
    pub const fn bytes_sent(&self) -> u64 {
        self.bytes_sent
    }

    /// Cumulative bytes successfully read.
    #[must_use]
    pub const fn bytes_received(&self) -> u64 {
        self.bytes_received
    }

    /// Reads one line as raw bytes, with the trailing CRLF (or bare LF)
    /// stripped. EOF before any terminator is an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Closed`] if the connection was closed locally, or
    /// an I/O error from the transport.
    pub async fn read_line_bytes(&mut self) -> Result<Vec<u8>> {
        if !self.open {
            return Err(Error::Closed);
        }
        let mut buf = Vec::new();
        let n = self.reader.read_until(b'\n', &mut buf).await?;
        if n == 0 {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "connection closed by peer",
            )));
        }
        self.bytes_received += n as u64;
        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }
        Ok(buf)
    }

    /// Reads one line as text (lossy UTF-8), terminator stripped.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Connection::read_line_bytes`].
    pub async fn read_line(&mut self) -> Result<String> {
        let bytes = self.read_line_bytes().await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Writes a command line followed by CRLF and flushes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Closed`] if the connection was closed locally, or
    /// an I/O error from the transport.
    pub async fn write_line(&mut self, line: &str) -> Result<()> {
        self.write_all(line.as_bytes()).await?;
        self.write_all(b"\r\n").await
    }

    /// Writes raw bytes and flushes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Closed`] if the connection was closed locally, or
    /// an I/O error from the transport.
    pub async fn write_all(&mut self, data: &[u8]) -> Result<()> {
        if !self.open {
            return Err(Error::Closed);
        }
        let stream = self.reader.get_mut();
        stream.write_all(data).await?;
        stream.flush().await?;
        self.bytes_sent += data.len() as u64;
        Ok(())
    }

    /// Shuts the stream down. Any read or write afterwards fails with
    /// [`Error::Closed`]; closing twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the shutdown fails.
    pub async fn close(&mut self) -> Result<()> {
        if !self.open {
            return Ok(());
        }
        self.open = false;
        self.reader.get_mut().shutdown().await?;
        Ok(())
    }
}
