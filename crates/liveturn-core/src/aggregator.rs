//! Folds queued events into sealed turns.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::turn::{ContentFilter, Turn, TurnEnd};
use crate::{Event, EventQueue};

/// Drains an [`EventQueue`] into [`Turn`]s.
///
/// A turn is sealed on the first of: `TurnComplete`, a `ToolCallRequest`
/// (the peer is blocked on tool results, so draining stops there even if
/// more events are already queued), a transport error or remote close, or
/// a local close of the queue.
#[derive(Debug, Clone)]
pub struct TurnAggregator {
    queue: Arc<EventQueue>,
    filter: ContentFilter,
}

impl TurnAggregator {
    pub fn new(queue: Arc<EventQueue>) -> Self {
        Self {
            queue,
            filter: ContentFilter::ALL,
        }
    }

    pub fn with_filter(mut self, filter: ContentFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn filter(&self) -> ContentFilter {
        self.filter
    }

    pub fn queue(&self) -> &Arc<EventQueue> {
        &self.queue
    }

    /// Suspend until a terminating event arrives, then return the sealed turn.
    /// After the queue is closed this returns an empty [`TurnEnd::Closed`] turn
    /// immediately.
    pub async fn await_turn(&self) -> Turn {
        let mut events = Vec::new();

        loop {
            let Some(event) = self.queue.pop().await else {
                debug!(events = events.len(), "Queue closed while draining turn");
                return Turn::sealed(events, TurnEnd::Closed);
            };

            let end = match &event {
                Event::TurnComplete => Some(TurnEnd::Complete),
                Event::ToolCallRequest { .. } => Some(TurnEnd::ToolCalls),
                Event::Error { cause } => Some(TurnEnd::Failed {
                    cause: cause.clone(),
                }),
                Event::Closed { reason } => Some(TurnEnd::Disconnected {
                    reason: reason.clone(),
                }),
                Event::TextFragment { .. } | Event::MediaFragment(_) => None,
            };

            if !self.filter.accepts(&event) {
                trace!(kind = event.kind(), "Skipping filtered fragment");
                continue;
            }

            events.push(event);

            if let Some(end) = end {
                debug!(events = events.len(), end = ?end, "Turn sealed");
                return Turn::sealed(events, end);
            }
        }
    }
}
