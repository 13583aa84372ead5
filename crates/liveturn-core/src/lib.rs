//! Streaming turn coordinator for live model sessions.
//!
//! Turns an interleaved stream of server events (text fragments, media
//! fragments, tool-call requests, turn-completion markers) into discrete,
//! ordered turns, and runs the tool-call / tool-response cycle against a
//! registry of local handlers:
//! - [`EventQueue`]: unbounded FIFO fed by the transport's delivery task
//! - [`TurnAggregator`]: drains the queue into sealed [`Turn`]s
//! - [`ToolRegistry`]: name → handler dispatch with fault isolation
//! - [`LiveSession`]: the façade tying transport, queue and registry together

pub mod aggregator;
pub mod event;
pub mod queue;
pub mod session;
pub mod tools;
pub mod transport;
pub mod turn;

#[cfg(test)]
pub(crate) mod testing;

use serde::{Deserialize, Serialize};

pub use aggregator::TurnAggregator;
pub use event::{Event, MediaFragment};
pub use queue::{EventQueue, EventSink};
pub use session::{CloseHandle, Exchange, ExchangeState, LiveSession};
pub use tools::{HandlerError, ToolHandler, ToolRegistry};
pub use transport::{Transport, UserContent};
pub use turn::{ContentFilter, Turn, TurnEnd};

/// Structured tool arguments and results: a JSON object.
pub type Payload = serde_json::Map<String, serde_json::Value>;

/// Declaration of a tool the remote peer may call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// JSON schema of the arguments object; `Null` for tools without parameters.
    #[serde(default)]
    pub parameters: serde_json::Value,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: serde_json::Value::Null,
        }
    }

    pub fn with_parameters(mut self, parameters: serde_json::Value) -> Self {
        self.parameters = parameters;
        self
    }
}

/// A request from the remote peer to invoke a named local capability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub arguments: Payload,
}

/// The outcome of one [`ToolCall`], sent back to the peer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Echoes the originating `ToolCall::id`.
    pub id: String,
    pub name: String,
    pub payload: Payload,
}

impl ToolResult {
    pub fn new(call: &ToolCall, payload: Payload) -> Self {
        Self {
            id: call.id.clone(),
            name: call.name.clone(),
            payload,
        }
    }

    /// A result whose payload is `{"error": message}`.
    pub fn error(call: &ToolCall, message: impl Into<String>) -> Self {
        Self::new(call, error_payload(message))
    }

    /// The `error` entry of the payload, if the call failed.
    pub fn error_message(&self) -> Option<&str> {
        self.payload.get("error").and_then(|v| v.as_str())
    }
}

/// `{"result": text}`, the payload shape handlers usually return.
pub fn result_payload(text: impl Into<String>) -> Payload {
    let mut payload = Payload::new();
    payload.insert("result".into(), serde_json::Value::String(text.into()));
    payload
}

/// `{"error": message}`, the payload reported for unknown tools and faults.
pub fn error_payload(message: impl Into<String>) -> Payload {
    let mut payload = Payload::new();
    payload.insert("error".into(), serde_json::Value::String(message.into()));
    payload
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LiveError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("Unknown function \"{0}\"")]
    UnknownTool(String),
    #[error("tool '{name}' failed: {message}")]
    HandlerFault { name: String, message: String },
    #[error("protocol violation: {0}")]
    ProtocolViolation(String),
    #[error("{0} tool call(s) still awaiting results")]
    ToolsPending(usize),
    #[error("session closed")]
    Closed,
}
