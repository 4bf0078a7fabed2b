//! Domain layer.
//!
//! Pure room/connection bookkeeping plus the traits the outer layers implement.
//! Nothing here performs I/O directly; delivery goes through [`MessagePusher`].

pub mod entity;
pub mod error;
pub mod event;
pub mod history;
pub mod message_pusher;
pub mod presence;
pub mod registry;
pub mod relay;
pub mod value_object;

pub use entity::{ChatEvent, PresenceRecord};
pub use error::{HistoryError, MessagePushError, RegistryError, RelayError, ValueObjectError};
pub use event::{Delivery, InboundEvent, OutboundEvent};
pub use history::HistoryStore;
pub use message_pusher::{MessagePusher, PusherChannel};
pub use presence::{PresenceNotifier, PresenceTable};
pub use registry::{ConnectionRegistry, JoinOutcome, LeaveOutcome};
pub use relay::SignalRelay;
pub use value_object::{ConnectionId, RoomId, Timestamp};
