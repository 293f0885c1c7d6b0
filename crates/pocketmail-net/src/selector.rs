//! Ordered transport failover.
//!
//! [`open`] walks the permitted transport kinds in priority order, dialing
//! each at most once, and reports every step synchronously through the
//! caller's attempt callback. The first kind that comes up wins; if none
//! does, the caller gets [`Error::ConnectionUnavailable`] wrapping the last
//! cause. Retrying the whole sequence later is the caller's business, not
//! this module's.

use tokio::io::{AsyncRead, AsyncWrite};

use crate::config::Config;
use crate::connection::Connection;
use crate::stream::{MailStream, connect_plain, connect_tls};
use crate::transport::{AttemptOutcome, TransportAttempt, TransportKind, TransportPrefs};
use crate::{Error, Result};

/// Dials one transport kind. The seam exists so tests can script
/// failures per kind without touching the network.
pub trait Dial {
    /// Stream type produced by a successful dial.
    type Stream: AsyncRead + AsyncWrite + Unpin;

    /// Attempts to establish this transport kind.
    fn dial(
        &mut self,
        kind: TransportKind,
        config: &Config,
    ) -> impl Future<Output = Result<Self::Stream>>;
}

/// Production dialer: TCP (optionally TLS) to the target server, or to the
/// configured gateway address for gateway kinds.
#[derive(Debug, Default, Clone, Copy)]
pub struct TcpDialer;

impl Dial for TcpDialer {
    type Stream = MailStream;

    async fn dial(&mut self, kind: TransportKind, config: &Config) -> Result<MailStream> {
        let (host, port) = if kind.is_gateway() {
            let gateway = config
                .gateway_for(kind)
                .ok_or(Error::GatewayUnconfigured(kind))?;
            (gateway.host.clone(), gateway.port)
        } else {
            (config.host.clone(), config.port)
        };

        let connect = async {
            if config.tls {
                connect_tls(&host, port, &config.host).await
            } else {
                connect_plain(&host, port).await
            }
        };

        match tokio::time::timeout(config.connect_timeout, connect).await {
            Ok(result) => result,
            Err(_) => Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                "connect timed out",
            ))),
        }
    }
}

/// Opens a connection using the production [`TcpDialer`].
///
/// # Errors
///
/// Returns [`Error::ConnectionUnavailable`] wrapping the last captured
/// cause when every permitted kind fails or the sequence aborts.
pub async fn open<F>(
    config: &Config,
    prefs: TransportPrefs,
    observer: F,
) -> Result<Connection<MailStream>>
where
    F: FnMut(&TransportAttempt),
{
    open_with(config, prefs, &mut TcpDialer, observer).await
}

/// Opens a connection through a caller-supplied dialer.
///
/// For each permitted kind, the observer sees the attempt record in
/// `Pending` state before the dial, then again with the final outcome.
/// No kind is dialed twice within one call.
///
/// # Errors
///
/// Returns [`Error::ConnectionUnavailable`] wrapping the last captured
/// cause when every permitted kind fails or the sequence aborts.
pub async fn open_with<D, F>(
    config: &Config,
    prefs: TransportPrefs,
    dialer: &mut D,
    mut observer: F,
) -> Result<Connection<D::Stream>>
where
    D: Dial,
    F: FnMut(&TransportAttempt),
{
    let mut last: Option<Error> = None;
    let mut number = 0u32;

    for kind in prefs.iter() {
        number += 1;
        let mut attempt = TransportAttempt::new(kind, number);
        observer(&attempt);

        match dialer.dial(kind, config).await {
            Ok(stream) => {
                let url = config.resolved_url(kind);
                attempt.outcome = AttemptOutcome::Succeeded { url: url.clone() };
                observer(&attempt);
                tracing::info!(kind = kind.name(), url = %url, "transport selected");
                return Ok(Connection::new(stream, url, config.tls));
            }
            Err(e) if e.aborts_selection() => {
                attempt.outcome = AttemptOutcome::Aborted;
                attempt.error = Some(e.to_string());
                observer(&attempt);
                tracing::warn!(kind = kind.name(), error = %e, "transport selection aborted");
                return Err(Error::unavailable(e));
            }
            Err(e) => {
                attempt.outcome = AttemptOutcome::Failed;
                attempt.error = Some(e.to_string());
                observer(&attempt);
                tracing::warn!(kind = kind.name(), error = %e, "transport attempt failed");
                last = Some(e);
            }
        }
    }

    Err(Error::unavailable(
        last.unwrap_or(Error::NoTransportsPermitted),
    ))
}
