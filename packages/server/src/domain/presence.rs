//! Presence: join/leave notifications and per-connection join times.

use std::collections::HashMap;

use super::{
    entity::PresenceRecord,
    event::{Delivery, OutboundEvent},
    value_object::{ConnectionId, RoomId, Timestamp},
};

/// Derives the `user-join` / `user-left` deliveries from registry changes.
///
/// The join announcement carries the joiner's id and the full member list, so
/// each peer decides locally whether it must send offers: only the connection
/// whose id equals the announced joiner initiates, toward everyone else.
/// See [`PresenceNotifier::offer_targets`].
pub struct PresenceNotifier;

impl PresenceNotifier {
    /// `user-join` addressed to every member, the joiner included.
    pub fn on_join(
        room_id: &RoomId,
        joined: &ConnectionId,
        members: &[ConnectionId],
    ) -> Vec<Delivery> {
        let event = OutboundEvent::UserJoin {
            room_id: room_id.clone(),
            joined: joined.clone(),
            members: members.to_vec(),
        };
        Delivery::fan_out(members, &event)
    }

    /// `user-left` addressed to every member except the one that left.
    pub fn on_leave(departed: &ConnectionId, previous_members: &[ConnectionId]) -> Vec<Delivery> {
        let event = OutboundEvent::UserLeft {
            id: departed.clone(),
        };
        Delivery::fan_out(
            previous_members.iter().filter(|id| *id != departed),
            &event,
        )
    }

    /// Connections `own` must send offers to after a `user-join` announcement.
    ///
    /// Empty unless `own` is the announced joiner.
    pub fn offer_targets(
        own: &ConnectionId,
        joined: &ConnectionId,
        members: &[ConnectionId],
    ) -> Vec<ConnectionId> {
        if own != joined {
            return Vec::new();
        }
        members.iter().filter(|id| *id != own).cloned().collect()
    }
}

/// Join time of every connection currently in a room.
#[derive(Debug, Default)]
pub struct PresenceTable {
    records: HashMap<ConnectionId, PresenceRecord>,
}

impl PresenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_join(&mut self, connection_id: &ConnectionId, joined_at: Timestamp) {
        self.records.insert(
            connection_id.clone(),
            PresenceRecord::new(connection_id.clone(), joined_at),
        );
    }

    pub fn remove(&mut self, connection_id: &ConnectionId) -> Option<PresenceRecord> {
        self.records.remove(connection_id)
    }

    pub fn get(&self, connection_id: &ConnectionId) -> Option<&PresenceRecord> {
        self.records.get(connection_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
