//! Conversion logic between DTOs and domain types.

use huddle_shared::time::timestamp_to_rfc3339;

use crate::{
    domain::{InboundEvent, OutboundEvent},
    infrastructure::dto::{
        http::{MemberDetailDto, RoomDetailDto, RoomSummaryDto},
        websocket::{ClientMessage, ServerMessage},
    },
    usecase::RoomSnapshot,
};

// ========================================
// DTO → Domain
// ========================================

impl From<ClientMessage> for InboundEvent {
    fn from(dto: ClientMessage) -> Self {
        match dto {
            ClientMessage::JoinCall { path } => Self::JoinCall { path },
            ClientMessage::Signal { to_id, payload } => Self::Signal { to: to_id, payload },
            ClientMessage::ChatMessage {
                payload,
                display_name,
            } => Self::ChatMessage {
                payload,
                display_name,
            },
        }
    }
}

// ========================================
// Domain → DTO
// ========================================

impl From<OutboundEvent> for ServerMessage {
    fn from(event: OutboundEvent) -> Self {
        match event {
            OutboundEvent::UserJoin {
                room_id,
                joined,
                members,
            } => Self::UserJoin {
                room_id: room_id.into_string(),
                joined_id: joined.into_string(),
                members: members.into_iter().map(|id| id.into_string()).collect(),
            },
            OutboundEvent::UserLeft { id } => Self::UserLeft {
                id: id.into_string(),
            },
            OutboundEvent::Signal { from, payload } => Self::Signal {
                from_id: from.into_string(),
                payload,
            },
            OutboundEvent::ChatMessage(event) => Self::ChatMessage {
                payload: event.payload,
                sender: event.sender_display_name,
                sender_connection_id: event.sender_connection_id.into_string(),
            },
        }
    }
}

impl From<RoomSnapshot> for RoomSummaryDto {
    fn from(room: RoomSnapshot) -> Self {
        Self {
            id: room.id.into_string(),
            members: room
                .members
                .into_iter()
                .map(|m| m.connection_id.into_string())
                .collect(),
            message_count: room.message_count,
        }
    }
}

impl From<RoomSnapshot> for RoomDetailDto {
    fn from(room: RoomSnapshot) -> Self {
        Self {
            id: room.id.into_string(),
            members: room
                .members
                .into_iter()
                .map(|m| MemberDetailDto {
                    connection_id: m.connection_id.into_string(),
                    joined_at: timestamp_to_rfc3339(m.joined_at.value()),
                })
                .collect(),
            message_count: room.message_count,
        }
    }
}
