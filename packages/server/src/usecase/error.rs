//! UseCase error types.
//!
//! None of these are fatal: the transport logs them and keeps the connection
//! and every other room running.

use thiserror::Error;

use crate::domain::{ConnectionId, RegistryError, RelayError, RoomId};

/// Why the coordinator dropped an inbound event
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Event from a connection that never connected or has already disconnected
    #[error("connection '{0}' is not connected")]
    NotConnected(ConnectionId),

    /// `on_connect` for an id that is already live
    #[error("connection '{0}' is already connected")]
    AlreadyConnected(ConnectionId),

    /// `join-call` with an empty path
    #[error("room id must not be empty")]
    InvalidRoomId,

    /// `join-call` while already in a room
    #[error("connection '{connection_id}' is already in room '{room_id}'")]
    DuplicateMembership {
        connection_id: ConnectionId,
        room_id: RoomId,
    },

    /// `chat-message` from a connection that is not in any room
    #[error("connection '{0}' is not in any room")]
    NotInRoom(ConnectionId),

    /// The room has no open history
    #[error("room '{0}' does not exist")]
    UnknownRoom(RoomId),

    /// `signal` to a connection that is not connected
    #[error("signal recipient '{0}' is not connected")]
    UnknownRecipient(String),
}

impl From<RegistryError> for SessionError {
    fn from(error: RegistryError) -> Self {
        match error {
            RegistryError::DuplicateMembership {
                connection_id,
                room_id,
            } => Self::DuplicateMembership {
                connection_id,
                room_id,
            },
            RegistryError::NotFound(connection_id) => Self::NotInRoom(connection_id),
        }
    }
}

impl From<RelayError> for SessionError {
    fn from(error: RelayError) -> Self {
        match error {
            RelayError::UnknownRecipient(to) => Self::UnknownRecipient(to),
        }
    }
}
