//! End-to-end session worker tests against scripted loopback servers.

#![allow(clippy::unwrap_used)]

use pocketmail_core::{Envelope, SessionEvent, Settings, spawn_fetch, spawn_submit};
use pocketmail_mime::MessagePart;
use pocketmail_net::{AttemptOutcome, TransportKind, TransportPrefs};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

/// Settings pointing at a loopback listener over the direct transport.
fn loopback_settings(port: u16) -> Settings {
    let mut settings = Settings::new("127.0.0.1", port);
    settings.transports = TransportPrefs::NONE.with(TransportKind::WiFi).bits();
    settings.username = "alice".to_string();
    settings.password = "secret".to_string();
    settings
}

/// Runs a scripted retrieval server for one session.
async fn serve_retrieval(listener: TcpListener) {
    let (stream, _) = listener.accept().await.unwrap();
    let (read_half, mut write_half) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();

    write_half.write_all(b"+OK test server ready\r\n").await.unwrap();
    while let Some(line) = lines.next_line().await.unwrap() {
        let verb = line.split(' ').next().unwrap_or("");
        match verb {
            "USER" => write_half.write_all(b"+OK\r\n").await.unwrap(),
            "PASS" => write_half.write_all(b"+OK logged in\r\n").await.unwrap(),
            "RETR" => write_half
                .write_all(
                    b"+OK message follows\r\n\
                      Content-Type: text/plain\r\n\
                      \r\n\
                      hello from the loopback server\r\n\
                      .\r\n",
                )
                .await
                .unwrap(),
            "QUIT" => {
                write_half.write_all(b"+OK bye\r\n").await.unwrap();
                break;
            }
            _ => write_half.write_all(b"-ERR unexpected\r\n").await.unwrap(),
        }
    }
}

/// Runs a scripted submission server for one session.
async fn serve_submission(listener: TcpListener, refuse_rcpt: bool) {
    let (stream, _) = listener.accept().await.unwrap();
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    write_half.write_all(b"220 loopback ready\r\n").await.unwrap();
    let mut line = String::new();
    let mut in_data = false;
    loop {
        line.clear();
        if reader.read_line(&mut line).await.unwrap() == 0 {
            break;
        }
        let line = line.trim_end();
        if in_data {
            if line == "." {
                in_data = false;
                write_half.write_all(b"250 accepted\r\n").await.unwrap();
            }
            continue;
        }
        let verb = line.split(' ').next().unwrap_or("");
        match verb {
            "EHLO" => write_half
                .write_all(b"250-loopback greets you\r\n250 AUTH PLAIN\r\n")
                .await
                .unwrap(),
            "AUTH" => write_half.write_all(b"235 authenticated\r\n").await.unwrap(),
            "MAIL" => write_half.write_all(b"250 ok\r\n").await.unwrap(),
            "RCPT" => {
                if refuse_rcpt {
                    write_half.write_all(b"550 no such user\r\n").await.unwrap();
                } else {
                    write_half.write_all(b"250 ok\r\n").await.unwrap();
                }
            }
            "DATA" => {
                in_data = true;
                write_half.write_all(b"354 go ahead\r\n").await.unwrap();
            }
            "QUIT" => {
                write_half.write_all(b"221 bye\r\n").await.unwrap();
                break;
            }
            _ => write_half.write_all(b"502 unexpected\r\n").await.unwrap(),
        }
    }
}

async fn collect_events(mut rx: tokio::sync::mpsc::UnboundedReceiver<SessionEvent>) -> Vec<SessionEvent> {
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn fetch_session_reports_transport_then_message_then_totals() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let server = tokio::spawn(serve_retrieval(listener));

    let rx = spawn_fetch(loopback_settings(port), 1);
    let events = collect_events(rx).await;
    server.await.unwrap();

    assert_eq!(events.len(), 4);
    let SessionEvent::Transport(first) = &events[0] else {
        panic!("expected a transport event");
    };
    assert_eq!(first.kind, TransportKind::WiFi);
    assert_eq!(first.outcome, AttemptOutcome::Pending);
    let SessionEvent::Transport(second) = &events[1] else {
        panic!("expected a transport event");
    };
    assert_eq!(
        second.outcome,
        AttemptOutcome::Succeeded {
            url: format!("socket://127.0.0.1:{port}"),
        }
    );
    assert_eq!(
        events[2],
        SessionEvent::Fetched {
            number: 1,
            part: MessagePart::text("plain", "hello from the loopback server\r\n"),
        }
    );
    let SessionEvent::Finished {
        bytes_sent,
        bytes_received,
    } = &events[3]
    else {
        panic!("expected a finished event");
    };
    assert!(*bytes_sent > 0);
    assert!(*bytes_received > 0);
}

#[tokio::test]
async fn submit_session_finishes_cleanly() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let server = tokio::spawn(serve_submission(listener, false));

    let envelope = Envelope::new("alice@example.com").to("bob@example.com");
    let rx = spawn_submit(
        loopback_settings(port),
        envelope,
        b"Subject: hi\r\n\r\nhello\r\n".to_vec(),
    );
    let events = collect_events(rx).await;
    server.await.unwrap();

    assert!(matches!(
        events.last(),
        Some(SessionEvent::Finished { bytes_sent, .. }) if *bytes_sent > 0
    ));
    assert!(
        !events
            .iter()
            .any(|e| matches!(e, SessionEvent::Failed { .. }))
    );
}

#[tokio::test]
async fn refused_recipient_surfaces_as_a_fatal_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(serve_submission(listener, true));

    let envelope = Envelope::new("alice@example.com").to("nobody@example.com");
    let rx = spawn_submit(loopback_settings(port), envelope, b"hello\r\n".to_vec());
    let events = collect_events(rx).await;

    let Some(SessionEvent::Failed { error, fatal }) = events.last() else {
        panic!("expected a failure event");
    };
    assert!(*fatal);
    assert!(error.contains("RCPT"));
}
