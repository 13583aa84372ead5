//! The tool-response cycle and the full exchange loop.

use tracing::{debug, info, warn};

use crate::{Event, LiveError, ToolResult, Transport, TurnEnd, UserContent};

use super::manager::LiveSession;
use super::types::{Exchange, ExchangeState};

impl<T: Transport + 'static, C> LiveSession<T, C> {
    /// Dispatch every outstanding tool call in arrival order, one at a time,
    /// then send all results in a single batch.
    pub fn respond_to_tools(&mut self) -> Result<Vec<ToolResult>, LiveError> {
        let calls = self.outstanding.clone();
        let mut results = Vec::with_capacity(calls.len());

        for call in &calls {
            if self.is_closed() {
                break;
            }
            results.push(self.registry.dispatch(&mut self.context, call));
        }

        self.submit_tool_results(results)
    }

    /// Send results produced outside the registry.
    ///
    /// A result whose id matches no outstanding call is a protocol violation:
    /// it is logged and discarded, never sent. Returns the results sent.
    pub fn submit_tool_results(
        &mut self,
        results: Vec<ToolResult>,
    ) -> Result<Vec<ToolResult>, LiveError> {
        if self.is_closed() {
            debug!(session = %self.id, dropped = results.len(), "Session closed, dropping tool results");
            self.outstanding.clear();
            return Err(LiveError::Closed);
        }

        let mut accepted = Vec::with_capacity(results.len());
        for result in results {
            let matched = self.outstanding.iter().any(|c| c.id == result.id)
                && !accepted.iter().any(|r: &ToolResult| r.id == result.id);
            if matched {
                accepted.push(result);
            } else {
                let violation = LiveError::ProtocolViolation(format!(
                    "no outstanding tool call with id '{}'",
                    result.id
                ));
                warn!(session = %self.id, tool = %result.name, error = %violation, "Discarding tool result");
            }
        }

        if accepted.is_empty() {
            return Ok(accepted);
        }

        // Resolved only once the send succeeds.
        self.transport.send_tool_results(&accepted)?;
        self.outstanding
            .retain(|call| !accepted.iter().any(|r| r.id == call.id));
        info!(
            session = %self.id,
            results = accepted.len(),
            pending = self.outstanding.len(),
            "Sent tool results"
        );
        if self.outstanding.is_empty() {
            self.state = ExchangeState::Draining;
        }
        Ok(accepted)
    }

    /// Send a user turn and drive the exchange to its end: drain, answer any
    /// tool calls, and keep draining until the peer completes its turn or
    /// the session ends.
    pub async fn run_exchange(
        &mut self,
        content: impl Into<UserContent>,
    ) -> Result<Exchange, LiveError> {
        self.send_user_turn(content)?;

        let mut text = String::new();
        let mut media = Vec::new();
        let mut tool_calls = Vec::new();
        let mut tool_results = Vec::new();

        let end = loop {
            let turn = self.await_turn().await?;
            let end = turn.end().clone();

            for event in turn.into_events() {
                match event {
                    Event::TextFragment { text: fragment } => text.push_str(&fragment),
                    Event::MediaFragment(fragment) => media.push(fragment),
                    Event::ToolCallRequest { calls } => tool_calls.extend(calls),
                    _ => {}
                }
            }

            if end != TurnEnd::ToolCalls {
                break end;
            }

            match self.respond_to_tools() {
                Ok(results) => tool_results.extend(results),
                Err(LiveError::Closed) => break TurnEnd::Closed,
                Err(e) => return Err(e),
            }
        };

        debug!(
            session = %self.id,
            chars = text.len(),
            media = media.len(),
            tools = tool_calls.len(),
            end = ?end,
            "Exchange finished"
        );

        Ok(Exchange {
            text,
            media,
            tool_calls,
            tool_results,
            end,
        })
    }
}
