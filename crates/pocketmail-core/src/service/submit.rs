//! Submission session worker.
//!
//! Runs one complete submission sequence: greeting, extended greeting,
//! optional authentication, envelope, payload, quit. Refusals arrive
//! from the protocol crate as boolean results and are reported here as
//! `Failed` events naming the refused command.

use pocketmail_net::selector;
use pocketmail_smtp::Client;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::error::{Error, Result};
use crate::service::SessionEvent;
use crate::settings::Settings;

/// Domain announced in the extended greeting.
const CLIENT_DOMAIN: &str = "localhost";

/// Sender and recipients for one outgoing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Reverse-path address.
    pub from: String,
    /// Forward-path addresses, in sending order.
    pub to: Vec<String>,
}

impl Envelope {
    /// Envelope with the given sender and no recipients yet.
    #[must_use]
    pub fn new(from: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: Vec::new(),
        }
    }

    /// Adds a recipient.
    #[must_use]
    pub fn to(mut self, recipient: impl Into<String>) -> Self {
        self.to.push(recipient.into());
        self
    }
}

/// Spawns a worker that submits one message.
///
/// The returned receiver yields transport progress, a `Failed` event if
/// any step was refused or errored, and a `Finished` event with transfer
/// totals when the session closed cleanly.
#[must_use]
pub fn spawn_submit(
    settings: Settings,
    envelope: Envelope,
    payload: Vec<u8>,
) -> UnboundedReceiver<SessionEvent> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        if let Err(e) = run(&settings, &envelope, &payload, &tx).await {
            tracing::warn!(error = %e, "submit session failed");
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
    envelope: &Envelope,
    payload: &[u8],
    tx: &UnboundedSender<SessionEvent>,
) -> Result<()> {
    let config = settings.net_config();
    let conn = selector::open(&config, settings.prefs(), |attempt| {
        let _ = tx.send(SessionEvent::Transport(attempt.clone()));
    })
    .await?;

    let mut client = Client::new(conn);
    if !client.read_greeting().await? {
        return Err(Error::refused("greeting"));
    }

    let extensions = client.execute_extended_greeting(CLIENT_DOMAIN).await?;
    tracing::debug!(count = extensions.len(), "server announced extensions");

    if settings.has_credentials()
        && !client
            .execute_auth_plain(&settings.username, &settings.password)
            .await?
    {
        client.execute_quit().await?;
        client.close().await?;
        return Err(Error::refused("AUTH"));
    }

    if !client.execute_mail(&envelope.from).await? {
        return Err(Error::refused("MAIL"));
    }
    for recipient in &envelope.to {
        if !client.execute_recipient(recipient).await? {
            return Err(Error::refused("RCPT"));
        }
    }
    if !client.execute_data(payload).await? {
        return Err(Error::refused("DATA"));
    }

    client.execute_quit().await?;
    let (bytes_sent, bytes_received) = client.transfer_totals();
    client.close().await?;
    let _ = tx.send(SessionEvent::Finished {
        bytes_sent,
        bytes_received,
    });
    Ok(())
}
