//! Session state, exchange results and the close handle.

use std::sync::Arc;

use crate::{EventQueue, MediaFragment, ToolCall, ToolResult, Transport, TurnEnd};

/// Where one exchange currently is.
///
/// `Idle → Sent → Draining → {ToolsPending → Draining}* → Complete`, with
/// `Closed` reachable from any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExchangeState {
    #[default]
    Idle,
    Sent,
    Draining,
    ToolsPending,
    Complete,
    Closed,
}

/// Everything the peer produced in answer to one user turn.
#[derive(Debug, Clone, PartialEq)]
pub struct Exchange {
    /// Text fragments of every drained turn, joined.
    pub text: String,
    pub media: Vec<MediaFragment>,
    /// Tool calls serviced along the way, in arrival order.
    pub tool_calls: Vec<ToolCall>,
    /// Results sent back for those calls.
    pub tool_results: Vec<ToolResult>,
    /// How the final turn ended.
    pub end: TurnEnd,
}

impl Exchange {
    pub fn is_complete(&self) -> bool {
        self.end == TurnEnd::Complete
    }

    pub fn is_terminal(&self) -> bool {
        self.end.is_terminal()
    }

    /// All media payloads concatenated, e.g. one PCM stream.
    pub fn media_data(&self) -> Vec<u8> {
        self.media
            .iter()
            .flat_map(|m| m.data.iter().copied())
            .collect()
    }
}

/// Closes a session from any task, including while `await_turn` is
/// suspended or tools are being dispatched.
#[derive(Clone)]
pub struct CloseHandle {
    queue: Arc<EventQueue>,
    transport: Arc<dyn Transport>,
}

impl CloseHandle {
    pub(crate) fn new(queue: Arc<EventQueue>, transport: Arc<dyn Transport>) -> Self {
        Self { queue, transport }
    }

    /// Close the queue (waking any waiter) and release the transport.
    /// Returns `false` if the session was already closed.
    pub fn close(&self) -> bool {
        if !self.queue.close() {
            return false;
        }
        self.transport.close();
        true
    }

    pub fn is_closed(&self) -> bool {
        self.queue.is_closed()
    }
}

impl std::fmt::Debug for CloseHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloseHandle")
            .field("closed", &self.is_closed())
            .finish()
    }
}
