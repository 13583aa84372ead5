//! Session setup shared by every subcommand.

use std::time::Duration;

use liveturn_common::LiveturnError;
use liveturn_config::{LiveturnConfig, Modality};
use liveturn_core::{EventQueue, LiveError, LiveSession, ToolRegistry, TurnEnd};
use liveturn_gemini::{GeminiLiveConfig, GeminiLiveTransport, ResponseModality};
use tracing::info;

pub type GeminiSession<C> = LiveSession<GeminiLiveTransport, C>;

/// Per-demo overrides on top of the config file.
#[derive(Debug, Default)]
pub struct SessionOptions {
    pub modality: Option<Modality>,
    /// Replaces `session.system_instruction` when set.
    pub system_instruction: Option<String>,
}

impl SessionOptions {
    /// Use `fallback` only when the config file sets no instruction.
    pub fn instruction_or(config: &LiveturnConfig, fallback: &str) -> Self {
        let configured = config.session.system_instruction.trim();
        Self {
            modality: None,
            system_instruction: configured.is_empty().then(|| fallback.to_string()),
        }
    }
}

pub fn gemini_config(
    config: &LiveturnConfig,
    options: &SessionOptions,
) -> Result<GeminiLiveConfig, LiveturnError> {
    let gemini = GeminiLiveConfig::from_env_var(&config.gemini.api_key_env)
        .or_else(|_| GeminiLiveConfig::from_env())?;

    let modality = match options.modality.unwrap_or(config.session.response_modality) {
        Modality::Text => ResponseModality::Text,
        Modality::Audio => ResponseModality::Audio,
    };
    let instruction = options
        .system_instruction
        .clone()
        .unwrap_or_else(|| config.session.system_instruction.clone());

    Ok(gemini
        .with_model(config.session.model.clone())
        .with_endpoint(config.gemini.endpoint.clone())
        .with_response_modality(modality)
        .with_system_instruction(instruction)
        .with_connect_timeout(Duration::from_secs(u64::from(
            config.gemini.connect_timeout_secs,
        ))))
}

/// Connect to Gemini Live with the registry's tools declared and return a
/// session ready for its first user turn.
pub async fn connect<C>(
    config: &LiveturnConfig,
    options: SessionOptions,
    registry: ToolRegistry<C>,
    context: C,
) -> Result<GeminiSession<C>, LiveturnError> {
    let gemini = gemini_config(config, &options)?.with_tools(registry.definitions());

    let queue = EventQueue::shared();
    let transport = GeminiLiveTransport::connect(&gemini, queue.sink())
        .await
        .map_err(session_error)?;

    let session = LiveSession::new(transport, queue, registry, context);
    info!(session = %session.id(), model = %gemini.model, "Session connected");
    Ok(session)
}

pub fn session_error(error: LiveError) -> LiveturnError {
    match error {
        LiveError::Transport(message) => LiveturnError::Transport(message),
        other => LiveturnError::Session(other.to_string()),
    }
}

/// Print why a session can no longer continue. Returns `true` if it can't.
pub fn report_terminal(end: &TurnEnd) -> bool {
    match end {
        TurnEnd::Failed { cause } => eprintln!("Error: {cause}"),
        TurnEnd::Disconnected { reason } => eprintln!("Disconnected: {reason}"),
        TurnEnd::Closed => eprintln!("Session closed"),
        TurnEnd::Complete | TurnEnd::ToolCalls => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_key(var: &str) -> LiveturnConfig {
        std::env::set_var(var, "test-key");
        let mut config = LiveturnConfig::default();
        config.gemini.api_key_env = var.to_string();
        config
    }

    #[test]
    fn gemini_config_follows_file_settings() {
        let mut config = config_with_key("LIVETURN_TEST_KEY_A");
        config.session.model = "custom-model".into();
        config.session.response_modality = Modality::Audio;
        config.gemini.connect_timeout_secs = 30;

        let gemini = gemini_config(&config, &SessionOptions::default()).unwrap();
        assert_eq!(gemini.api_key, "test-key");
        assert_eq!(gemini.model, "custom-model");
        assert_eq!(gemini.response_modality, ResponseModality::Audio);
        assert_eq!(gemini.connect_timeout, Duration::from_secs(30));
        assert!(gemini.system_instruction.is_none());
    }

    #[test]
    fn options_override_modality_and_instruction() {
        let config = config_with_key("LIVETURN_TEST_KEY_B");
        let options = SessionOptions {
            modality: Some(Modality::Audio),
            system_instruction: Some("Be brief.".into()),
        };

        let gemini = gemini_config(&config, &options).unwrap();
        assert_eq!(gemini.response_modality, ResponseModality::Audio);
        assert_eq!(gemini.system_instruction.as_deref(), Some("Be brief."));
    }

    #[test]
    fn configured_instruction_beats_demo_fallback() {
        let mut config = LiveturnConfig::default();
        assert_eq!(
            SessionOptions::instruction_or(&config, "fallback")
                .system_instruction
                .as_deref(),
            Some("fallback")
        );

        config.session.system_instruction = "From file".into();
        assert!(SessionOptions::instruction_or(&config, "fallback")
            .system_instruction
            .is_none());
    }

    #[test]
    fn transport_errors_keep_their_kind() {
        assert!(matches!(
            session_error(LiveError::Transport("reset".into())),
            LiveturnError::Transport(_)
        ));
        assert!(matches!(
            session_error(LiveError::ToolsPending(2)),
            LiveturnError::Session(_)
        ));
    }

    #[test]
    fn only_terminal_ends_are_reported() {
        assert!(!report_terminal(&TurnEnd::Complete));
        assert!(report_terminal(&TurnEnd::Disconnected {
            reason: "bye".into()
        }));
    }
}
