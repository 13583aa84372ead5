use serde::{Deserialize, Serialize};
use std::fmt;

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Prefix of ids minted locally for tool calls that arrived without one.
pub const LOCAL_CALL_PREFIX: &str = "local-";

/// Id for a tool call the peer sent without one. Prefixed so it is easy to
/// tell apart from server-issued ids in logs.
pub fn new_call_id() -> String {
    format!("{LOCAL_CALL_PREFIX}{}", uuid::Uuid::new_v4().simple())
}

/// True for ids produced by [`new_call_id`]; the peer never saw these.
pub fn is_local_call_id(id: &str) -> bool {
    id.starts_with(LOCAL_CALL_PREFIX)
}

/// Identifies one live session in log output.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    pub fn new() -> Self {
        Self(new_id())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
