//! Gemini Live transport for the liveturn coordinator.
//!
//! Speaks the BidiGenerateContent WebSocket protocol: sends the setup
//! message, translates server messages into coordinator [`Event`]s, and
//! implements [`Transport`] for user turns, realtime audio and tool responses.
//!
//! [`Event`]: liveturn_core::Event
//! [`Transport`]: liveturn_core::Transport

mod client;
mod config;
mod connection;
pub mod protocol;

pub use client::GeminiLiveTransport;
pub use config::{GeminiLiveConfig, ResponseModality, DEFAULT_ENDPOINT, DEFAULT_MODEL};
