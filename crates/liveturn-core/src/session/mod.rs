//! Session façade over a transport, the event queue and the tool registry.
//!
//! A `LiveSession` sends user turns, drains the peer's replies into turns,
//! and runs the dispatch / tool-response cycle until the peer completes its
//! turn.

mod exchange;
mod manager;
mod types;


pub use manager::LiveSession;
pub use types::{CloseHandle, Exchange, ExchangeState};
