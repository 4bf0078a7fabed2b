//! Signaling relay for peer-to-peer video calls.
//!
//! Brokers WebRTC offers, answers and ICE candidates between connections in the
//! same call, and provides presence and chat (with replay for late joiners) for
//! the lifetime of a room. Media never passes through the relay.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
