//! Per-room chat history.
//!
//! A room's log is opened when the room is created and discarded in the same
//! step that deletes the room. There is no other expiry.

use std::collections::HashMap;

use super::{entity::ChatEvent, error::HistoryError, value_object::RoomId};

#[derive(Debug, Default)]
pub struct HistoryStore {
    logs: HashMap<RoomId, Vec<ChatEvent>>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start an empty log for a newly created room. Existing logs are kept.
    pub fn open(&mut self, room_id: &RoomId) {
        self.logs.entry(room_id.clone()).or_default();
    }

    /// Append `event` to the room's log.
    ///
    /// # Errors
    ///
    /// `RoomNotFound` if the room has no open log; nothing is stored.
    pub fn append(&mut self, room_id: &RoomId, event: ChatEvent) -> Result<(), HistoryError> {
        let log = self
            .logs
            .get_mut(room_id)
            .ok_or_else(|| HistoryError::RoomNotFound(room_id.clone()))?;
        log.push(event);
        Ok(())
    }

    /// The room's log in arrival order. Empty if the room has no history.
    pub fn replay(&self, room_id: &RoomId) -> &[ChatEvent] {
        self.logs.get(room_id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Drop the room's log. Returns how many events were discarded.
    pub fn discard(&mut self, room_id: &RoomId) -> usize {
        self.logs.remove(room_id).map_or(0, |log| log.len())
    }

    pub fn len(&self, room_id: &RoomId) -> usize {
        self.logs.get(room_id).map_or(0, Vec::len)
    }
}
