//! Default TOML config template.

pub(crate) fn default_config_toml() -> &'static str {
    r##"# liveturn configuration
# Only override what you want to change -- missing fields use defaults.
# The API key is read from the environment variable named by
# gemini.api_key_env (GOOGLE_API_KEY is tried as a fallback).

[session]
# model = "gemini-live-2.5-flash-preview"
# response_modality = "text"      # text, audio
# system_instruction = ""

[gemini]
# endpoint = "wss://generativelanguage.googleapis.com/ws/google.ai.generativelanguage.v1beta.GenerativeService.BidiGenerateContent"
# api_key_env = "GEMINI_API_KEY"
# connect_timeout_secs = 15       # 1-120

[audio]
# input_sample_rate = 16000       # 8000-48000, input WAV must already match
# output_sample_rate = 24000      # 8000-48000

[logging]
# level = "info"                  # trace, debug, info, warn, error
"##
}
