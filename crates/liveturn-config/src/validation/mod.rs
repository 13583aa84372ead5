//! Configuration validation.
//!
//! Each section has its own check; `validate` runs them all and collects
//! every problem into a single `ConfigError`.

mod helpers;


use liveturn_common::ConfigError;

use crate::schema::LiveturnConfig;
use helpers::{validate_non_empty, validate_range};

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &LiveturnConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_session(&mut errors, config);
    validate_gemini(&mut errors, config);
    validate_audio(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_session(errors: &mut Vec<String>, config: &LiveturnConfig) {
    validate_non_empty(errors, "session.model", &config.session.model);
}

fn validate_gemini(errors: &mut Vec<String>, config: &LiveturnConfig) {
    let endpoint = &config.gemini.endpoint;
    if !(endpoint.starts_with("wss://") || endpoint.starts_with("ws://")) {
        errors.push(format!(
            "gemini.endpoint = \"{endpoint}\" must be a ws:// or wss:// URL"
        ));
    }
    validate_non_empty(errors, "gemini.api_key_env", &config.gemini.api_key_env);
    validate_range(
        errors,
        "gemini.connect_timeout_secs",
        config.gemini.connect_timeout_secs,
        1,
        120,
    );
}

fn validate_audio(errors: &mut Vec<String>, config: &LiveturnConfig) {
    validate_range(
        errors,
        "audio.input_sample_rate",
        config.audio.input_sample_rate,
        8_000,
        48_000,
    );
    validate_range(
        errors,
        "audio.output_sample_rate",
        config.audio.output_sample_rate,
        8_000,
        48_000,
    );
}
