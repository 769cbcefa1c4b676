//! In-process push channel over tokio broadcast channels.
//!
//! Topic fan-out is at-most-once and best-effort: a publish with no
//! subscribers succeeds, and a lagging subscriber drops messages.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{RwLock, broadcast};

use bloghub_core::ports::{PushChannel, PushError};

/// In-process push channel keyed by topic name.
pub struct InMemoryPushChannel {
    topics: RwLock<HashMap<String, broadcast::Sender<String>>>,
    buffer_size: usize,
}

impl InMemoryPushChannel {
    pub fn new(buffer_size: usize) -> Self {
        Self {
            topics: RwLock::new(HashMap::new()),
            buffer_size,
        }
    }

    /// Attach a subscriber to `topic`, creating the topic on demand.
    ///
    /// The websocket endpoint uses this to forward published payloads into
    /// joined rooms; integration tests use it to observe emissions.
    pub async fn attach(&self, topic: &str) -> broadcast::Receiver<String> {
        let mut topics = self.topics.write().await;
        topics
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(self.buffer_size).0)
            .subscribe()
    }

    /// Number of live subscribers on `topic`.
    pub async fn subscriber_count(&self, topic: &str) -> usize {
        let topics = self.topics.read().await;
        topics
            .get(topic)
            .map(broadcast::Sender::receiver_count)
            .unwrap_or(0)
    }
}

impl Default for InMemoryPushChannel {
    fn default() -> Self {
        Self::new(100)
    }
}

#[async_trait]
impl PushChannel for InMemoryPushChannel {
    async fn publish(&self, topic: &str, payload: serde_json::Value) -> Result<(), PushError> {
        let encoded = serde_json::to_string(&payload).map_err(|e| PushError::Publish {
            topic: topic.to_string(),
            reason: e.to_string(),
        })?;

        let topics = self.topics.read().await;
        match topics.get(topic) {
            Some(sender) => {
                // A send error only means nobody is listening right now.
                let delivered = sender.send(encoded).unwrap_or(0);
                tracing::debug!(topic = %topic, subscribers = delivered, "push event published");
            }
            None => {
                tracing::debug!(topic = %topic, "push event published to empty topic");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fans_out_to_every_subscriber() {
        let channel = InMemoryPushChannel::default();
        let mut first = channel.attach("new-post").await;
        let mut second = channel.attach("new-post").await;

        channel
            .publish("new-post", serde_json::json!({"hello": "world"}))
            .await
            .unwrap();

        assert_eq!(first.recv().await.unwrap(), r#"{"hello":"world"}"#);
        assert_eq!(second.recv().await.unwrap(), r#"{"hello":"world"}"#);
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_ok() {
        let channel = InMemoryPushChannel::default();
        assert!(
            channel
                .publish("post-123", serde_json::json!({"n": 1}))
                .await
                .is_ok()
        );
        assert_eq!(channel.subscriber_count("post-123").await, 0);
    }

    #[tokio::test]
    async fn topics_are_isolated() {
        let channel = InMemoryPushChannel::default();
        let mut comments = channel.attach("post-a").await;
        let _other = channel.attach("post-b").await;

        channel
            .publish("post-a", serde_json::json!({"comment": 1}))
            .await
            .unwrap();

        assert!(comments.try_recv().is_ok());
    }
}
