//! Tool dispatch: name → handler mapping with fault isolation.
//!
//! Handlers receive the application's state as an explicit context argument
//! (`&mut C`) rather than closing over shared globals. A handler that keeps
//! a deduplicated collection owns that idempotence; the registry invokes each
//! call exactly once and never retries.

mod arguments;
mod registry;

pub use arguments::required_str;
pub use registry::{ToolHandler, ToolRegistry};

/// A handler's own failure, e.g. a missing or mistyped argument. Reported to
/// the peer as `{"error": message}`; never fatal to the session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct HandlerError(pub String);

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<String> for HandlerError {
    fn from(message: String) -> Self {
        Self(message)
    }
}

impl From<&str> for HandlerError {
    fn from(message: &str) -> Self {
        Self(message.to_string())
    }
}
