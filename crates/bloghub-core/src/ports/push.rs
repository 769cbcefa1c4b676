//! Push channel port - abstraction over the realtime fan-out transport.
//!
//! Delivery is at-most-once and best-effort: no acknowledgment, no replay.
//! Publishers treat failures as log-and-continue; a push error never rolls
//! back the write that preceded it.

use async_trait::async_trait;

/// Publisher side of the realtime channel. Subscription is an infrastructure
/// concern (the websocket endpoint attaches to the concrete channel directly).
#[async_trait]
pub trait PushChannel: Send + Sync {
    /// Publish a JSON payload to a named topic.
    async fn publish(&self, topic: &str, payload: serde_json::Value) -> Result<(), PushError>;
}

/// Push channel errors.
#[derive(Debug, thiserror::Error)]
pub enum PushError {
    #[error("Failed to publish to {topic}: {reason}")]
    Publish { topic: String, reason: String },

    #[error("Channel connection error: {0}")]
    Connection(String),
}
