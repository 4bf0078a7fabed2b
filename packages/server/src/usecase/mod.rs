//! UseCase layer.
//!
//! The [`SessionCoordinator`] is the single entry point the transport calls
//! into. It owns all room state and turns inbound events into deliveries.

mod coordinator;
mod error;

pub use coordinator::{DisconnectSummary, RoomSnapshot, SessionCoordinator};
pub use error::SessionError;
