use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),

    #[error("missing credential: {0}")]
    MissingCredential(String),
}

#[derive(Debug, thiserror::Error)]
pub enum LiveturnError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("session error: {0}")]
    Session(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("audio error: {0}")]
    Audio(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ParseError("unexpected token".into());
        assert_eq!(err.to_string(), "config parse error: unexpected token");

        let err = ConfigError::ValidationError("unknown modality 'video'".into());
        assert_eq!(
            err.to_string(),
            "config validation error: unknown modality 'video'"
        );

        let err = ConfigError::MissingCredential("GEMINI_API_KEY".into());
        assert_eq!(err.to_string(), "missing credential: GEMINI_API_KEY");
    }

    #[test]
    fn liveturn_error_from_config() {
        let config_err = ConfigError::ParseError("bad toml".into());
        let err: LiveturnError = config_err.into();
        assert!(matches!(err, LiveturnError::Config(_)));
        assert!(err.to_string().contains("bad toml"));
    }

    #[test]
    fn liveturn_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "sample.wav");
        let err: LiveturnError = io_err.into();
        assert!(matches!(err, LiveturnError::Io(_)));
        assert!(err.to_string().contains("sample.wav"));
    }

    #[test]
    fn liveturn_error_other_variants() {
        let err = LiveturnError::Session("tool calls pending".into());
        assert_eq!(err.to_string(), "session error: tool calls pending");

        let err = LiveturnError::Transport("handshake refused".into());
        assert_eq!(err.to_string(), "transport error: handshake refused");

        let err = LiveturnError::Audio("expected 16-bit samples".into());
        assert_eq!(err.to_string(), "audio error: expected 16-bit samples");
    }
}
