//! BidiGenerateContent wire messages and their translation to coordinator
//! events.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use liveturn_common::{is_local_call_id, new_call_id};
use liveturn_core::{Event, LiveError, Payload, ToolCall, ToolDefinition, ToolResult};

use crate::config::GeminiLiveConfig;

// ---------------------------------------------------------------------------
// Client → server
// ---------------------------------------------------------------------------

/// Top-level client message; serializes as `{"<variant>": {...}}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ClientMessage {
    Setup(Setup),
    ClientContent(ClientContent),
    RealtimeInput(RealtimeInput),
    ToolResponse(ToolResponse),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Setup {
    pub model: String,
    pub generation_config: GenerationConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolGroup>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_modalities: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolGroup {
    pub function_declarations: Vec<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<&'static str>,
    pub parts: Vec<TextPart>,
}

#[derive(Debug, Serialize)]
pub struct TextPart {
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientContent {
    pub turns: Vec<Content>,
    pub turn_complete: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RealtimeInput {
    Audio(Blob),
    Video(Blob),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    pub data: String,
    pub mime_type: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResponse {
    pub function_responses: Vec<FunctionResponse>,
}

#[derive(Debug, Serialize)]
pub struct FunctionResponse {
    /// Omitted when the originating call carried no id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub response: Payload,
}

/// Convert a tool definition to a Gemini function declaration.
pub fn to_gemini_tool(tool: &ToolDefinition) -> serde_json::Value {
    let mut declaration = serde_json::json!({ "name": tool.name });
    if !tool.description.is_empty() {
        declaration["description"] = serde_json::json!(tool.description);
    }
    if !tool.parameters.is_null() {
        declaration["parameters"] = tool.parameters.clone();
    }
    declaration
}

impl ClientMessage {
    pub fn setup(config: &GeminiLiveConfig) -> Self {
        let tools = if config.tools.is_empty() {
            Vec::new()
        } else {
            vec![ToolGroup {
                function_declarations: config.tools.iter().map(to_gemini_tool).collect(),
            }]
        };

        ClientMessage::Setup(Setup {
            model: config.model_resource(),
            generation_config: GenerationConfig {
                response_modalities: vec![config.response_modality.as_str()],
            },
            system_instruction: config.system_instruction.as_ref().map(|text| Content {
                role: None,
                parts: vec![TextPart { text: text.clone() }],
            }),
            tools,
        })
    }

    /// A complete user turn carrying one text part.
    pub fn user_text(text: &str) -> Self {
        ClientMessage::ClientContent(ClientContent {
            turns: vec![Content {
                role: Some("user"),
                parts: vec![TextPart {
                    text: text.to_string(),
                }],
            }],
            turn_complete: true,
        })
    }

    /// Realtime media input. Audio goes in `audio`, images and video frames
    /// in `video`; anything else is rejected.
    pub fn realtime_media(data: &[u8], mime_type: &str) -> Result<Self, LiveError> {
        let blob = Blob {
            data: BASE64.encode(data),
            mime_type: mime_type.to_string(),
        };
        let input = if mime_type.starts_with("audio/") {
            RealtimeInput::Audio(blob)
        } else if mime_type.starts_with("image/") || mime_type.starts_with("video/") {
            RealtimeInput::Video(blob)
        } else {
            return Err(LiveError::Transport(format!(
                "unsupported realtime mime type '{mime_type}'"
            )));
        };
        Ok(ClientMessage::RealtimeInput(input))
    }

    pub fn tool_response(results: &[ToolResult]) -> Self {
        ClientMessage::ToolResponse(ToolResponse {
            function_responses: results
                .iter()
                .map(|r| FunctionResponse {
                    id: (!is_local_call_id(&r.id)).then(|| r.id.clone()),
                    name: r.name.clone(),
                    response: r.payload.clone(),
                })
                .collect(),
        })
    }

    pub fn to_json(&self) -> Result<String, LiveError> {
        serde_json::to_string(self)
            .map_err(|e| LiveError::Transport(format!("failed to encode message: {e}")))
    }
}

// ---------------------------------------------------------------------------
// Server → client
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerMessage {
    pub setup_complete: Option<serde_json::Value>,
    pub server_content: Option<ServerContent>,
    pub tool_call: Option<ToolCallMessage>,
    pub tool_call_cancellation: Option<ToolCallCancellation>,
    pub go_away: Option<GoAway>,
    pub usage_metadata: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerContent {
    pub model_turn: Option<ModelTurn>,
    #[serde(default)]
    pub turn_complete: bool,
    #[serde(default)]
    pub interrupted: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct ModelTurn {
    #[serde(default)]
    pub parts: Vec<ServerPart>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerPart {
    pub text: Option<String>,
    pub inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallMessage {
    #[serde(default)]
    pub function_calls: Vec<FunctionCall>,
}

#[derive(Debug, Deserialize)]
pub struct FunctionCall {
    pub id: Option<String>,
    pub name: String,
    pub args: Option<Payload>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ToolCallCancellation {
    #[serde(default)]
    pub ids: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoAway {
    pub time_left: Option<String>,
}

impl ServerMessage {
    pub fn decode(frame: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(frame)
    }

    pub fn is_setup_complete(&self) -> bool {
        self.setup_complete.is_some()
    }

    /// Translate into coordinator events, preserving part order.
    ///
    /// Model parts come first, then `TurnComplete` if the server marked the
    /// turn complete in the same message. Session bookkeeping messages
    /// (setup, usage, go-away, cancellations) are logged and produce no
    /// events.
    pub fn into_events(self) -> Vec<Event> {
        let mut events = Vec::new();

        if self.setup_complete.is_some() {
            debug!("Setup complete");
        }

        if let Some(content) = self.server_content {
            if content.interrupted {
                debug!("Model generation interrupted");
            }
            let parts = content.model_turn.map(|t| t.parts).unwrap_or_default();
            for part in parts {
                if let Some(text) = part.text {
                    events.push(Event::text(text));
                }
                if let Some(inline) = part.inline_data {
                    match BASE64.decode(inline.data.as_bytes()) {
                        Ok(data) => events.push(Event::media(inline.mime_type, data)),
                        Err(e) => {
                            warn!(mime_type = %inline.mime_type, error = %e, "Dropping undecodable inline data")
                        }
                    }
                }
            }
            if content.turn_complete {
                events.push(Event::TurnComplete);
            }
        }

        if let Some(tool_call) = self.tool_call {
            let calls = tool_call
                .function_calls
                .into_iter()
                .map(|fc| ToolCall {
                    id: fc.id.unwrap_or_else(new_call_id),
                    name: fc.name,
                    arguments: fc.args.unwrap_or_default(),
                })
                .collect();
            events.push(Event::tool_calls(calls));
        }

        if let Some(cancellation) = self.tool_call_cancellation {
            warn!(ids = ?cancellation.ids, "Server cancelled tool calls; results will still be sent");
        }

        if let Some(go_away) = self.go_away {
            info!(time_left = ?go_away.time_left, "Server will close the session soon");
        }

        if let Some(usage) = self.usage_metadata {
            debug!(usage = %usage, "Usage metadata");
        }

        events
    }
}
