//! Typed access to tool-call arguments.

use super::HandlerError;
use crate::Payload;

/// Fetch a required string argument.
pub fn required_str<'a>(args: &'a Payload, key: &str) -> Result<&'a str, HandlerError> {
    match args.get(key) {
        Some(serde_json::Value::String(s)) => Ok(s),
        Some(other) => Err(HandlerError(format!(
            "argument '{key}' must be a string, got {other}"
        ))),
        None => Err(HandlerError(format!("missing argument '{key}'"))),
    }
}
