//! Outbound delivery abstraction.
//!
//! The domain defines what it needs from the transport; the infrastructure
//! layer provides the WebSocket implementation.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{error::MessagePushError, event::OutboundEvent, value_object::ConnectionId};

/// Per-connection outbound channel drained by the transport's writer task
pub type PusherChannel = mpsc::UnboundedSender<OutboundEvent>;

/// Best-effort delivery to individual connections.
///
/// There is no broadcast primitive; fan-out is one `push_to` per target.
/// Pushing never waits on the peer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// Register the outbound channel of a newly accepted connection
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// Forget a connection's channel. Unknown ids are ignored.
    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// Queue `event` for one connection
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: OutboundEvent,
    ) -> Result<(), MessagePushError>;

    /// Number of registered connections
    async fn count_clients(&self) -> usize;
}
