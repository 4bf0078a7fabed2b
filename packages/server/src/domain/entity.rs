//! Entities held by the relay.

use super::value_object::{ConnectionId, Timestamp};

/// One chat message as stored in a room's history and delivered to members.
///
/// Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEvent {
    pub sender_connection_id: ConnectionId,
    pub sender_display_name: String,
    pub payload: String,
}

impl ChatEvent {
    pub fn new(
        sender_connection_id: ConnectionId,
        sender_display_name: String,
        payload: String,
    ) -> Self {
        Self {
            sender_connection_id,
            sender_display_name,
            payload,
        }
    }
}

/// When a live connection joined its room. Used for session duration only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceRecord {
    pub connection_id: ConnectionId,
    pub joined_at: Timestamp,
}

impl PresenceRecord {
    pub fn new(connection_id: ConnectionId, joined_at: Timestamp) -> Self {
        Self {
            connection_id,
            joined_at,
        }
    }
}
