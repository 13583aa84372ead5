//! In-memory transport for session tests.

use std::sync::{Arc, Mutex};

use crate::{EventSink, LiveError, ToolResult, Transport};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Outbound {
    Text(String),
    Binary { mime_type: String, len: usize },
    ToolResults(Vec<ToolResult>),
    Close,
}

type ResultsHook = Box<dyn Fn(&EventSink, &[ToolResult]) + Send + Sync>;

/// Records every outbound call. Optionally plays the peer by pushing events
/// when tool results arrive.
#[derive(Clone, Default)]
pub(crate) struct RecordingTransport {
    sent: Arc<Mutex<Vec<Outbound>>>,
    on_results: Arc<Mutex<Option<(EventSink, ResultsHook)>>>,
    fail_sends: Arc<Mutex<bool>>,
}

impl RecordingTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reply_to_results(
        &self,
        sink: EventSink,
        hook: impl Fn(&EventSink, &[ToolResult]) + Send + Sync + 'static,
    ) {
        *self.on_results.lock().unwrap() = Some((sink, Box::new(hook)));
    }

    pub(crate) fn fail_sends(&self) {
        *self.fail_sends.lock().unwrap() = true;
    }

    pub(crate) fn sent(&self) -> Vec<Outbound> {
        self.sent.lock().unwrap().clone()
    }

    pub(crate) fn tool_batches(&self) -> Vec<Vec<ToolResult>> {
        self.sent()
            .into_iter()
            .filter_map(|o| match o {
                Outbound::ToolResults(results) => Some(results),
                _ => None,
            })
            .collect()
    }

    fn record(&self, outbound: Outbound) -> Result<(), LiveError> {
        if *self.fail_sends.lock().unwrap() {
            return Err(LiveError::Transport("socket closed".into()));
        }
        self.sent.lock().unwrap().push(outbound);
        Ok(())
    }
}

impl Transport for RecordingTransport {
    fn send_text(&self, text: &str) -> Result<(), LiveError> {
        self.record(Outbound::Text(text.to_string()))
    }

    fn send_binary(&self, data: &[u8], mime_type: &str) -> Result<(), LiveError> {
        self.record(Outbound::Binary {
            mime_type: mime_type.to_string(),
            len: data.len(),
        })
    }

    fn send_tool_results(&self, results: &[ToolResult]) -> Result<(), LiveError> {
        self.record(Outbound::ToolResults(results.to_vec()))?;
        if let Some((sink, hook)) = self.on_results.lock().unwrap().as_ref() {
            hook(sink, results);
        }
        Ok(())
    }

    fn close(&self) {
        self.sent.lock().unwrap().push(Outbound::Close);
    }
}
