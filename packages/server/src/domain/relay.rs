//! Signal relay: directed, uninterpreted forwarding of signaling payloads.

use std::sync::Arc;

use super::{
    error::RelayError,
    event::OutboundEvent,
    message_pusher::MessagePusher,
    value_object::ConnectionId,
};

/// Forwards a payload from one connection to exactly one other.
///
/// Payloads (offers, answers, ICE candidates) are passed through byte for byte
/// and never stored.
pub struct SignalRelay {
    message_pusher: Arc<dyn MessagePusher>,
}

impl SignalRelay {
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// Deliver `payload` to `to`, tagged with `from`.
    ///
    /// # Errors
    ///
    /// `UnknownRecipient` if `to` is not a valid id or is not connected. Callers
    /// drop the signal; racing a disconnect is expected.
    pub async fn relay(
        &self,
        from: &ConnectionId,
        to: &str,
        payload: String,
    ) -> Result<(), RelayError> {
        let to_id = ConnectionId::new(to.to_string())
            .map_err(|_| RelayError::UnknownRecipient(to.to_string()))?;

        let event = OutboundEvent::Signal {
            from: from.clone(),
            payload,
        };

        self.message_pusher
            .push_to(&to_id, event)
            .await
            .map_err(|e| {
                tracing::debug!("Dropped signal from '{}' to '{}': {}", from, to_id, e);
                RelayError::UnknownRecipient(to_id.to_string())
            })?;

        tracing::debug!("Relayed signal from '{}' to '{}'", from, to_id);
        Ok(())
    }
}
