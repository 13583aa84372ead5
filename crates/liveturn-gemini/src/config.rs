//! Gemini Live connection configuration.

use std::fmt;
use std::time::Duration;

use liveturn_common::ConfigError;
use liveturn_core::ToolDefinition;

pub const DEFAULT_ENDPOINT: &str = "wss://generativelanguage.googleapis.com/ws/google.ai.generativelanguage.v1beta.GenerativeService.BidiGenerateContent";
pub const DEFAULT_MODEL: &str = "gemini-live-2.5-flash-preview";

/// Environment variables checked for the API key, in order.
const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "GOOGLE_API_KEY"];

/// Output modality requested from the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseModality {
    #[default]
    Text,
    Audio,
}

impl ResponseModality {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseModality::Text => "TEXT",
            ResponseModality::Audio => "AUDIO",
        }
    }
}

#[derive(Clone)]
pub struct GeminiLiveConfig {
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
    pub response_modality: ResponseModality,
    pub system_instruction: Option<String>,
    /// Declarations sent in the setup message.
    pub tools: Vec<ToolDefinition>,
    /// Bound on the WebSocket handshake and on waiting for `setupComplete`.
    pub connect_timeout: Duration,
}

impl fmt::Debug for GeminiLiveConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiLiveConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("response_modality", &self.response_modality)
            .field("system_instruction", &self.system_instruction)
            .field("tools", &self.tools.len())
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

impl GeminiLiveConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            response_modality: ResponseModality::Text,
            system_instruction: None,
            tools: Vec::new(),
            connect_timeout: Duration::from_secs(15),
        }
    }

    /// Read the API key from `GEMINI_API_KEY`, then `GOOGLE_API_KEY`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_var(API_KEY_VARS[0]).or_else(|_| Self::from_env_var(API_KEY_VARS[1]))
    }

    /// Read the API key from a specific environment variable.
    pub fn from_env_var(var: &str) -> Result<Self, ConfigError> {
        match std::env::var(var) {
            Ok(key) if !key.trim().is_empty() => Ok(Self::new(key.trim())),
            _ => Err(ConfigError::MissingCredential(format!(
                "set {var} to a Gemini API key"
            ))),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_response_modality(mut self, modality: ResponseModality) -> Self {
        self.response_modality = modality;
        self
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        let instruction = instruction.into();
        self.system_instruction = (!instruction.trim().is_empty()).then_some(instruction);
        self
    }

    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Model resource name as the setup message expects it.
    pub(crate) fn model_resource(&self) -> String {
        if self.model.starts_with("models/") {
            self.model.clone()
        } else {
            format!("models/{}", self.model)
        }
    }

    pub(crate) fn ws_url(&self) -> String {
        format!("{}?key={}", self.endpoint, self.api_key)
    }
}
