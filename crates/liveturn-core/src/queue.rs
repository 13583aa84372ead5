//! Inbound event queue shared between the transport and the aggregator.
//!
//! The transport's delivery task pushes through an [`EventSink`] while the
//! aggregator pops. Popping suspends on a [`Notify`] instead of polling, so
//! a push or a close wakes the waiter immediately.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::Notify;
use tracing::{debug, trace};

use crate::Event;

#[derive(Debug, Default)]
struct QueueState {
    events: VecDeque<Event>,
    closed: bool,
}

/// Unbounded FIFO of [`Event`]s.
#[derive(Debug, Default)]
pub struct EventQueue {
    state: Mutex<QueueState>,
    notify: Notify,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a queue already wrapped for sharing.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// A push-side handle for a transport.
    pub fn sink(self: &Arc<Self>) -> EventSink {
        EventSink {
            queue: Arc::clone(self),
        }
    }

    fn state(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append an event to the tail. Returns `false` if the queue is closed
    /// and the event was not accepted.
    pub fn push(&self, event: Event) -> bool {
        {
            let mut state = self.state();
            if state.closed {
                debug!(kind = event.kind(), "Ignoring event pushed after close");
                return false;
            }
            trace!(kind = event.kind(), depth = state.events.len() + 1, "Event queued");
            state.events.push_back(event);
        }
        self.notify.notify_one();
        true
    }

    /// Remove and return the head, or `None` if the queue is empty or closed.
    pub fn try_pop(&self) -> Option<Event> {
        self.state().events.pop_front()
    }

    /// Wait for the next event. Returns `None` once the queue is closed.
    pub async fn pop(&self) -> Option<Event> {
        loop {
            // Register interest before checking so a push or close between
            // the check and the await still wakes us.
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let mut state = self.state();
                if let Some(event) = state.events.pop_front() {
                    return Some(event);
                }
                if state.closed {
                    return None;
                }
            }

            notified.await;
        }
    }

    /// Close the queue: pending events are discarded, later pushes are
    /// ignored, and every suspended [`pop`](Self::pop) returns `None`.
    /// Returns `false` if it was already closed.
    pub fn close(&self) -> bool {
        let dropped = {
            let mut state = self.state();
            if state.closed {
                return false;
            }
            state.closed = true;
            let dropped = state.events.len();
            state.events.clear();
            dropped
        };
        debug!(dropped, "Event queue closed");
        self.notify.notify_waiters();
        true
    }

    pub fn is_closed(&self) -> bool {
        self.state().closed
    }

    pub fn len(&self) -> usize {
        self.state().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state().events.is_empty()
    }
}

/// Cloneable push-side handle handed to a transport's delivery task.
#[derive(Debug, Clone)]
pub struct EventSink {
    queue: Arc<EventQueue>,
}

impl EventSink {
    pub fn on_event(&self, event: Event) -> bool {
        self.queue.push(event)
    }

    /// Enqueue a connection fault as a terminal [`Event::Error`].
    pub fn on_error(&self, cause: impl Into<String>) -> bool {
        self.queue.push(Event::Error {
            cause: cause.into(),
        })
    }

    /// Enqueue a remote close as a terminal [`Event::Closed`].
    pub fn on_closed(&self, reason: impl Into<String>) -> bool {
        self.queue.push(Event::Closed {
            reason: reason.into(),
        })
    }

    pub fn is_closed(&self) -> bool {
        self.queue.is_closed()
    }
}
