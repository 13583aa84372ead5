//! Configuration schema types.
//!
//! Every struct uses `serde(default)`; missing fields take the defaults
//! below.

mod audio;
mod gemini;
mod logging;
mod session;

pub use audio::*;
pub use gemini::*;
pub use logging::*;
pub use session::*;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LiveturnConfig {
    pub session: SessionConfig,
    pub gemini: GeminiConfig,
    pub audio: AudioConfig,
    pub logging: LoggingConfig,
}
