//! WebSocket frame DTOs.
//!
//! Every frame is a JSON object tagged by `type`.

use serde::{Deserialize, Serialize};

/// Frames sent by clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientMessage {
    /// `{"type":"join-call","path":"..."}`
    JoinCall { path: String },
    /// `{"type":"signal","to_id":"...","payload":"..."}`
    Signal { to_id: String, payload: String },
    /// `{"type":"chat-message","payload":"...","display_name":"..."}`
    ChatMessage {
        payload: String,
        display_name: String,
    },
}

impl ClientMessage {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Frames sent by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerMessage {
    /// First frame on every connection: the id the transport assigned
    Connected { connection_id: String },
    UserJoin {
        room_id: String,
        joined_id: String,
        members: Vec<String>,
    },
    UserLeft { id: String },
    Signal { from_id: String, payload: String },
    ChatMessage {
        payload: String,
        sender: String,
        sender_connection_id: String,
    },
}

impl ServerMessage {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
