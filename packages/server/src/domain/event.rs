//! Typed events crossing the transport boundary.
//!
//! One closed enum per direction; each variant carries exactly the fields of
//! that event.

use super::{
    entity::ChatEvent,
    value_object::{ConnectionId, RoomId},
};

/// Events a connection sends to the relay.
///
/// Fields are raw strings as received; the coordinator validates them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// Join the room named by `path`
    JoinCall { path: String },
    /// Forward `payload` to connection `to`
    Signal { to: String, payload: String },
    /// Post a chat message to the sender's room
    ChatMessage {
        payload: String,
        display_name: String,
    },
}

impl InboundEvent {
    /// Event name as used on the wire, for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::JoinCall { .. } => "join-call",
            Self::Signal { .. } => "signal",
            Self::ChatMessage { .. } => "chat-message",
        }
    }
}

/// Events the relay sends to a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundEvent {
    /// `joined` entered the room; `members` is the full member list in join order
    UserJoin {
        room_id: RoomId,
        joined: ConnectionId,
        members: Vec<ConnectionId>,
    },
    /// `id` left the room
    UserLeft { id: ConnectionId },
    /// Opaque signaling payload from `from`
    Signal { from: ConnectionId, payload: String },
    /// A chat message, either live or replayed
    ChatMessage(ChatEvent),
}

/// An outbound event addressed to one connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub to: ConnectionId,
    pub event: OutboundEvent,
}

impl Delivery {
    pub fn new(to: ConnectionId, event: OutboundEvent) -> Self {
        Self { to, event }
    }

    /// Address a copy of `event` to every connection in `targets`, in order.
    pub fn fan_out<'a>(
        targets: impl IntoIterator<Item = &'a ConnectionId>,
        event: &OutboundEvent,
    ) -> Vec<Delivery> {
        targets
            .into_iter()
            .map(|to| Delivery::new(to.clone(), event.clone()))
            .collect()
    }
}
