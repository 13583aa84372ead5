//! `LiveSession` struct, sending, and turn draining.

use std::sync::Arc;

use liveturn_common::SessionId;
use tracing::{debug, info, warn};

use crate::{
    ContentFilter, EventQueue, LiveError, ToolCall, ToolRegistry, Transport, Turn,
    TurnAggregator, TurnEnd, UserContent,
};

use super::types::{CloseHandle, ExchangeState};

/// Coordinates one live session.
///
/// `C` is the application state handed to tool handlers on every call.
pub struct LiveSession<T, C> {
    pub(super) id: SessionId,
    pub(super) transport: Arc<T>,
    pub(super) closer: CloseHandle,
    pub(super) aggregator: TurnAggregator,
    pub(super) registry: ToolRegistry<C>,
    pub(super) context: C,
    pub(super) state: ExchangeState,
    /// Tool calls from the last drained turn still waiting for a result.
    pub(super) outstanding: Vec<ToolCall>,
}

impl<T: Transport + 'static, C> LiveSession<T, C> {
    /// `queue` must be the queue the transport's [`EventSink`](crate::EventSink)
    /// pushes into.
    pub fn new(
        transport: T,
        queue: Arc<EventQueue>,
        registry: ToolRegistry<C>,
        context: C,
    ) -> Self {
        let transport = Arc::new(transport);
        let closer = CloseHandle::new(
            Arc::clone(&queue),
            Arc::clone(&transport) as Arc<dyn Transport>,
        );
        let id = SessionId::new();
        debug!(session = %id, tools = registry.len(), "Session created");

        Self {
            id,
            transport,
            closer,
            aggregator: TurnAggregator::new(queue),
            registry,
            context,
            state: ExchangeState::Idle,
            outstanding: Vec::new(),
        }
    }

    /// Only accumulate the given content kinds in drained turns.
    pub fn with_filter(mut self, filter: ContentFilter) -> Self {
        self.aggregator = self.aggregator.with_filter(filter);
        self
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Reports `Closed` as soon as any [`CloseHandle`] has closed the session.
    pub fn state(&self) -> ExchangeState {
        if self.is_closed() {
            ExchangeState::Closed
        } else {
            self.state
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    pub fn registry(&self) -> &ToolRegistry<C> {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ToolRegistry<C> {
        &mut self.registry
    }

    /// Tool calls awaiting results, in arrival order. Empty once closed:
    /// those calls will never be answered.
    pub fn outstanding_calls(&self) -> &[ToolCall] {
        if self.is_closed() {
            &[]
        } else {
            &self.outstanding
        }
    }

    pub fn close_handle(&self) -> CloseHandle {
        self.closer.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.closer.is_closed()
    }

    /// Close the session. Results not yet sent are dropped.
    pub fn close(&mut self) {
        if self.closer.close() {
            info!(session = %self.id, dropped_calls = self.outstanding.len(), "Session closed");
        }
        self.outstanding.clear();
        self.state = ExchangeState::Closed;
    }

    /// Transmit a user turn and return without waiting for the reply.
    pub fn send_user_turn(&mut self, content: impl Into<UserContent>) -> Result<(), LiveError> {
        if self.is_closed() {
            return Err(LiveError::Closed);
        }
        if !self.outstanding.is_empty() {
            warn!(
                session = %self.id,
                pending = self.outstanding.len(),
                "Refusing user turn while tool calls are unresolved"
            );
            return Err(LiveError::ToolsPending(self.outstanding.len()));
        }

        match content.into() {
            UserContent::Text(text) => {
                debug!(session = %self.id, chars = text.len(), "Sending text turn");
                self.transport.send_text(&text)?;
            }
            UserContent::Media { mime_type, data } => {
                debug!(session = %self.id, mime_type = %mime_type, bytes = data.len(), "Sending media turn");
                self.transport.send_binary(&data, &mime_type)?;
            }
        }
        self.state = ExchangeState::Sent;
        Ok(())
    }

    /// Drain the next turn from the peer.
    ///
    /// Fails with [`LiveError::ToolsPending`] if the previous turn's tool
    /// calls have not been answered. After close this returns an empty
    /// [`TurnEnd::Closed`] turn instead of suspending.
    pub async fn await_turn(&mut self) -> Result<Turn, LiveError> {
        if self.is_closed() {
            if !self.outstanding.is_empty() {
                debug!(
                    session = %self.id,
                    dropped_calls = self.outstanding.len(),
                    "Closed with tool calls unanswered"
                );
                self.outstanding.clear();
            }
            self.state = ExchangeState::Closed;
        } else if !self.outstanding.is_empty() {
            return Err(LiveError::ToolsPending(self.outstanding.len()));
        } else {
            self.state = ExchangeState::Draining;
        }

        let turn = self.aggregator.await_turn().await;
        match turn.end() {
            TurnEnd::Complete => self.state = ExchangeState::Complete,
            TurnEnd::ToolCalls => {
                self.outstanding = turn.tool_calls().into_iter().cloned().collect();
                self.state = ExchangeState::ToolsPending;
                debug!(session = %self.id, calls = self.outstanding.len(), "Peer awaiting tool results");
            }
            TurnEnd::Failed { cause } => {
                warn!(session = %self.id, cause = %cause, "Transport failed");
                self.state = ExchangeState::Closed;
            }
            TurnEnd::Disconnected { reason } => {
                info!(session = %self.id, reason = %reason, "Peer closed the session");
                self.state = ExchangeState::Closed;
            }
            TurnEnd::Closed => self.state = ExchangeState::Closed,
        }
        Ok(turn)
    }
}
