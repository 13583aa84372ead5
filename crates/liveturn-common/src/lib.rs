pub mod errors;
pub mod id;

pub use errors::{ConfigError, LiveturnError};
pub use id::{is_local_call_id, new_call_id, new_id, SessionId, LOCAL_CALL_PREFIX};

pub type Result<T> = std::result::Result<T, LiveturnError>;
