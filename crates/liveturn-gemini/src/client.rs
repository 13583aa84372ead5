//! [`Transport`] implementation over the Gemini Live WebSocket API.

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use liveturn_core::{EventSink, LiveError, ToolResult, Transport};

use crate::config::GeminiLiveConfig;
use crate::connection::{await_setup_complete, reader_task, writer_task};
use crate::protocol::ClientMessage;

/// A connected live session. Sends are queued to a writer task and return
/// immediately; inbound frames are delivered to the [`EventSink`] given at
/// connect time.
#[derive(Debug)]
pub struct GeminiLiveTransport {
    outbound: mpsc::UnboundedSender<WsMessage>,
    cancel: CancellationToken,
}

impl GeminiLiveTransport {
    /// Open the socket, send setup, and wait for the server to acknowledge
    /// it. Both steps are bounded by `config.connect_timeout`.
    pub async fn connect(config: &GeminiLiveConfig, sink: EventSink) -> Result<Self, LiveError> {
        let url = config.ws_url();
        info!(endpoint = %config.endpoint, model = %config.model, "Connecting to Gemini Live");

        let (ws_stream, _) =
            tokio::time::timeout(config.connect_timeout, tokio_tungstenite::connect_async(&url))
                .await
                .map_err(|_| {
                    LiveError::Transport(format!(
                        "connection timed out after {}s",
                        config.connect_timeout.as_secs()
                    ))
                })?
                .map_err(|e| LiveError::Transport(format!("connection failed: {e}")))?;

        let (mut ws_write, mut ws_read) = ws_stream.split();

        let setup = ClientMessage::setup(config).to_json()?;
        debug!(tools = config.tools.len(), "Sending setup");
        ws_write
            .send(WsMessage::Text(setup.into()))
            .await
            .map_err(|e| LiveError::Transport(format!("failed to send setup: {e}")))?;

        tokio::time::timeout(
            config.connect_timeout,
            await_setup_complete(&mut ws_read, &sink),
        )
        .await
        .map_err(|_| LiveError::Transport("timed out waiting for setup to complete".into()))??;

        info!("Gemini Live session ready");

        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        tokio::spawn(writer_task(
            ws_write,
            outbound_rx,
            sink.clone(),
            cancel.clone(),
        ));
        tokio::spawn(reader_task(ws_read, sink, cancel.clone()));

        Ok(Self { outbound, cancel })
    }

    fn enqueue(&self, message: ClientMessage) -> Result<(), LiveError> {
        if self.cancel.is_cancelled() {
            return Err(LiveError::Transport("connection closed".into()));
        }
        let json = message.to_json()?;
        self.outbound
            .send(WsMessage::Text(json.into()))
            .map_err(|_| LiveError::Transport("connection closed".into()))
    }
}

impl Transport for GeminiLiveTransport {
    fn send_text(&self, text: &str) -> Result<(), LiveError> {
        self.enqueue(ClientMessage::user_text(text))
    }

    fn send_binary(&self, data: &[u8], mime_type: &str) -> Result<(), LiveError> {
        self.enqueue(ClientMessage::realtime_media(data, mime_type)?)
    }

    fn send_tool_results(&self, results: &[ToolResult]) -> Result<(), LiveError> {
        debug!(count = results.len(), "Sending tool responses");
        self.enqueue(ClientMessage::tool_response(results))
    }

    fn close(&self) {
        if !self.cancel.is_cancelled() {
            debug!("Closing Gemini Live connection");
            self.cancel.cancel();
        }
    }
}

impl Drop for GeminiLiveTransport {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
