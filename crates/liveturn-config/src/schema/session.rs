//! Model session settings.

use serde::{Deserialize, Serialize};

/// Output modality requested from the model.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    #[default]
    Text,
    Audio,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub model: String,
    pub response_modality: Modality,
    /// Empty means no system instruction is sent.
    pub system_instruction: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            model: "gemini-live-2.5-flash-preview".into(),
            response_modality: Modality::Text,
            system_instruction: String::new(),
        }
    }
}
