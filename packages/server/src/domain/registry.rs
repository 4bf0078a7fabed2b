//! Connection registry: which connections are in which room.
//!
//! Holds the forward index (room -> ordered members) and the reverse index
//! (connection -> room). Every mutation updates both, so a connection can never
//! point at a room that does not exist, and a room is never left empty.

use std::collections::HashMap;

use super::{
    error::RegistryError,
    value_object::{ConnectionId, RoomId},
};

/// Result of a successful join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOutcome {
    /// Members after the append, in join order
    pub members: Vec<ConnectionId>,
    /// `true` if this join created the room
    pub room_created: bool,
}

/// Result of a successful leave.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveOutcome {
    pub room_id: RoomId,
    /// Members before the removal, in join order
    pub previous_members: Vec<ConnectionId>,
    /// `true` if the departing connection was the last member
    pub room_deleted: bool,
}

#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    rooms: HashMap<RoomId, Vec<ConnectionId>>,
    room_of: HashMap<ConnectionId, RoomId>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `connection_id` to `room_id`, creating the room if needed.
    ///
    /// # Errors
    ///
    /// `DuplicateMembership` if the connection is already in any room; nothing changes.
    pub fn join(
        &mut self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
    ) -> Result<JoinOutcome, RegistryError> {
        if let Some(current) = self.room_of.get(connection_id) {
            return Err(RegistryError::DuplicateMembership {
                connection_id: connection_id.clone(),
                room_id: current.clone(),
            });
        }

        let room_created = !self.rooms.contains_key(room_id);
        let members = self.rooms.entry(room_id.clone()).or_default();
        members.push(connection_id.clone());
        let members = members.clone();
        self.room_of.insert(connection_id.clone(), room_id.clone());

        Ok(JoinOutcome {
            members,
            room_created,
        })
    }

    /// Remove `connection_id` from its room, deleting the room if it becomes empty.
    ///
    /// # Errors
    ///
    /// `NotFound` if the connection is not in any room.
    pub fn leave(&mut self, connection_id: &ConnectionId) -> Result<LeaveOutcome, RegistryError> {
        let room_id = self
            .room_of
            .remove(connection_id)
            .ok_or_else(|| RegistryError::NotFound(connection_id.clone()))?;

        let Some(members) = self.rooms.get_mut(&room_id) else {
            // Reverse index pointed at a missing room; treat as not found.
            return Err(RegistryError::NotFound(connection_id.clone()));
        };

        let previous_members = members.clone();
        members.retain(|id| id != connection_id);

        let room_deleted = members.is_empty();
        if room_deleted {
            self.rooms.remove(&room_id);
        }

        Ok(LeaveOutcome {
            room_id,
            previous_members,
            room_deleted,
        })
    }

    /// Snapshot of a room's members; empty if the room does not exist.
    pub fn members_of(&self, room_id: &RoomId) -> Vec<ConnectionId> {
        self.rooms.get(room_id).cloned().unwrap_or_default()
    }

    /// The room containing `connection_id`, if any.
    pub fn room_of(&self, connection_id: &ConnectionId) -> Option<&RoomId> {
        self.room_of.get(connection_id)
    }

    pub fn contains_room(&self, room_id: &RoomId) -> bool {
        self.rooms.contains_key(room_id)
    }

    /// All rooms with their members, sorted by room id.
    pub fn rooms(&self) -> Vec<(RoomId, Vec<ConnectionId>)> {
        let mut rooms: Vec<_> = self
            .rooms
            .iter()
            .map(|(id, members)| (id.clone(), members.clone()))
            .collect();
        rooms.sort_by(|a, b| a.0.cmp(&b.0));
        rooms
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
