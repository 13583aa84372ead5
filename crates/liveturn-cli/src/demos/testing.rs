//! In-memory transport for driving demo sessions in tests.

use std::sync::{Arc, Mutex};

use liveturn_core::{
    EventQueue, LiveError, LiveSession, Payload, ToolCall, ToolRegistry, ToolResult, Transport,
};

#[derive(Clone, Default)]
pub struct ScriptedTransport {
    turns: Arc<Mutex<Vec<String>>>,
    tool_batches: Arc<Mutex<Vec<Vec<ToolResult>>>>,
}

impl ScriptedTransport {
    pub fn turns(&self) -> Vec<String> {
        self.turns.lock().unwrap().clone()
    }

    pub fn tool_batches(&self) -> Vec<Vec<ToolResult>> {
        self.tool_batches.lock().unwrap().clone()
    }
}

impl Transport for ScriptedTransport {
    fn send_text(&self, text: &str) -> Result<(), LiveError> {
        self.turns.lock().unwrap().push(text.to_string());
        Ok(())
    }

    fn send_binary(&self, _data: &[u8], mime_type: &str) -> Result<(), LiveError> {
        self.turns.lock().unwrap().push(format!("<{mime_type}>"));
        Ok(())
    }

    fn send_tool_results(&self, results: &[ToolResult]) -> Result<(), LiveError> {
        self.tool_batches.lock().unwrap().push(results.to_vec());
        Ok(())
    }

    fn close(&self) {}
}

/// A session whose inbound events are pushed by the test up front.
pub fn scripted_session<C>(
    registry: ToolRegistry<C>,
    context: C,
) -> (LiveSession<ScriptedTransport, C>, Arc<EventQueue>, ScriptedTransport) {
    let queue = EventQueue::shared();
    let transport = ScriptedTransport::default();
    let session = LiveSession::new(transport.clone(), Arc::clone(&queue), registry, context);
    (session, queue, transport)
}

pub fn call(id: &str, name: &str, arguments: Option<serde_json::Value>) -> ToolCall {
    let arguments: Payload = arguments
        .and_then(|v| v.as_object().cloned())
        .unwrap_or_default();
    ToolCall {
        id: id.into(),
        name: name.into(),
        arguments,
    }
}
