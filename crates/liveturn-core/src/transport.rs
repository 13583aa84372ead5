//! The outbound half of the boundary with a streaming transport.
//!
//! Inbound delivery goes through [`EventSink`](crate::EventSink). Outbound
//! sends are fire-and-forget: they hand the message to the transport and
//! return without waiting for the peer.

use crate::{LiveError, ToolResult};

pub trait Transport: Send + Sync {
    fn send_text(&self, text: &str) -> Result<(), LiveError>;

    fn send_binary(&self, data: &[u8], mime_type: &str) -> Result<(), LiveError>;

    fn send_tool_results(&self, results: &[ToolResult]) -> Result<(), LiveError>;

    /// Release the connection. Must be idempotent.
    fn close(&self);
}

/// Content of one user turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserContent {
    Text(String),
    Media { mime_type: String, data: Vec<u8> },
}

impl UserContent {
    pub fn media(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        UserContent::Media {
            mime_type: mime_type.into(),
            data,
        }
    }
}

impl From<String> for UserContent {
    fn from(text: String) -> Self {
        UserContent::Text(text)
    }
}

impl From<&str> for UserContent {
    fn from(text: &str) -> Self {
        UserContent::Text(text.to_string())
    }
}
