//! Background WebSocket tasks for a live session.
//!
//! Both halves are generic over the socket so the loops can be driven by
//! in-memory streams in tests.

use std::fmt::Display;

use futures_util::{Sink, SinkExt, Stream, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use liveturn_core::{EventSink, LiveError};

use crate::protocol::ServerMessage;

// ---------------------------------------------------------------------------
// Frame decoding
// ---------------------------------------------------------------------------

/// What a single inbound frame means for the session.
#[derive(Debug)]
pub(crate) enum Inbound {
    Message(ServerMessage),
    Closed(String),
    Ignored,
}

/// The server sends JSON in both text and binary frames.
pub(crate) fn classify(frame: WsMessage) -> Inbound {
    let parsed = match &frame {
        WsMessage::Text(text) => ServerMessage::decode(text.as_str()),
        WsMessage::Binary(data) => match std::str::from_utf8(data) {
            Ok(text) => ServerMessage::decode(text),
            Err(_) => {
                debug!(len = data.len(), "Ignoring non-UTF-8 binary frame");
                return Inbound::Ignored;
            }
        },
        WsMessage::Close(close) => {
            let reason = close
                .as_ref()
                .map(|c| c.reason.as_str().to_string())
                .filter(|r| !r.is_empty())
                .unwrap_or_else(|| "closed by server".to_string());
            return Inbound::Closed(reason);
        }
        _ => return Inbound::Ignored,
    };

    match parsed {
        Ok(message) => Inbound::Message(message),
        Err(e) => {
            warn!(error = %e, "Unrecognized message from server");
            Inbound::Ignored
        }
    }
}

// ---------------------------------------------------------------------------
// Handshake
// ---------------------------------------------------------------------------

/// Read frames until the server acknowledges setup.
///
/// Anything else that arrives first is forwarded to the sink so no content
/// is lost.
pub(crate) async fn await_setup_complete<St, E>(
    stream: &mut St,
    sink: &EventSink,
) -> Result<(), LiveError>
where
    St: Stream<Item = Result<WsMessage, E>> + Unpin,
    E: Display,
{
    while let Some(frame) = stream.next().await {
        let frame = frame.map_err(|e| LiveError::Transport(e.to_string()))?;
        match classify(frame) {
            Inbound::Message(message) if message.is_setup_complete() => return Ok(()),
            Inbound::Message(message) => {
                for event in message.into_events() {
                    sink.on_event(event);
                }
            }
            Inbound::Closed(reason) => {
                return Err(LiveError::Transport(format!(
                    "server closed during setup: {reason}"
                )))
            }
            Inbound::Ignored => {}
        }
    }
    Err(LiveError::Transport(
        "connection ended before setup completed".to_string(),
    ))
}

// ---------------------------------------------------------------------------
// Reader
// ---------------------------------------------------------------------------

/// Translate inbound frames into events until the socket ends or the
/// session is cancelled.
pub(crate) async fn reader_task<St, E>(mut stream: St, sink: EventSink, cancel: CancellationToken)
where
    St: Stream<Item = Result<WsMessage, E>> + Unpin,
    E: Display,
{
    loop {
        let frame = tokio::select! {
            _ = cancel.cancelled() => {
                debug!("Reader cancelled");
                return;
            }
            frame = stream.next() => frame,
        };

        match frame {
            Some(Ok(frame)) => match classify(frame) {
                Inbound::Message(message) => {
                    for event in message.into_events() {
                        debug!(kind = event.kind(), "Inbound event");
                        if !sink.on_event(event) {
                            return;
                        }
                    }
                }
                Inbound::Closed(reason) => {
                    info!(reason = %reason, "Server closed the live session");
                    sink.on_closed(reason);
                    return;
                }
                Inbound::Ignored => {}
            },
            Some(Err(e)) => {
                warn!(error = %e, "WebSocket error");
                sink.on_error(e.to_string());
                return;
            }
            None => {
                sink.on_closed("connection ended");
                return;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Writer
// ---------------------------------------------------------------------------

/// Forward queued outbound frames to the socket. On cancellation, or once
/// every sender is gone, a close frame is sent and the task exits.
pub(crate) async fn writer_task<S>(
    mut ws_write: S,
    mut outbound: mpsc::UnboundedReceiver<WsMessage>,
    sink: EventSink,
    cancel: CancellationToken,
) where
    S: Sink<WsMessage> + Unpin,
    S::Error: Display,
{
    loop {
        let next = tokio::select! {
            _ = cancel.cancelled() => None,
            msg = outbound.recv() => msg,
        };

        let Some(msg) = next else {
            let _ = ws_write.send(WsMessage::Close(None)).await;
            return;
        };

        if let Err(e) = ws_write.send(msg).await {
            warn!(error = %e, "Failed to write frame");
            sink.on_error(format!("send failed: {e}"));
            cancel.cancel();
            return;
        }
    }
}
