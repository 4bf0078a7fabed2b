//! Domain error types.

use thiserror::Error;

use super::value_object::{ConnectionId, RoomId};

/// Value object validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("connection id must not be empty")]
    EmptyConnectionId,

    #[error("room id must not be empty")]
    EmptyRoomId,
}

/// Connection registry errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The connection is already a member of a room
    #[error("connection '{connection_id}' is already a member of room '{room_id}'")]
    DuplicateMembership {
        connection_id: ConnectionId,
        room_id: RoomId,
    },

    /// The connection is not a member of any room
    #[error("connection '{0}' is not a member of any room")]
    NotFound(ConnectionId),
}

/// History store errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    #[error("room '{0}' has no open history")]
    RoomNotFound(RoomId),
}

/// Signal relay errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    #[error("signal recipient '{0}' is not connected")]
    UnknownRecipient(String),
}

/// Message push errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    /// No live channel is registered for the connection
    #[error("client '{0}' not found")]
    ClientNotFound(String),

    /// The channel exists but its receiving half is gone
    #[error("push failed: {0}")]
    PushFailed(String),
}
