//! Realtime push endpoint.
//!
//! Clients connect to `GET /ws` and receive push events as JSON text frames of
//! the form `{ "topic": ..., "data": ... }`. Every connection is subscribed to
//! the global new-post topic; per-post comment rooms are joined and left with
//! `{ "action": "join", "room": "post-<id>" }` style frames.

use std::collections::HashMap;
use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, web};
use actix_ws::{Message, MessageStream, Session};
use futures::StreamExt;
use serde::Deserialize;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use bloghub_infra::pubsub::InMemoryPushChannel;
use bloghub_shared::events::NEW_POST_TOPIC;

use crate::state::AppState;

/// Commands a client may send over the socket.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
enum ClientCommand {
    Join { room: String },
    Leave { room: String },
}

/// GET /ws - upgrade and hand the connection to its session task.
pub async fn socket(
    req: HttpRequest,
    body: web::Payload,
    state: web::Data<AppState>,
) -> actix_web::Result<HttpResponse> {
    let (response, session, msg_stream) = actix_ws::handle(&req, body)?;
    actix_web::rt::spawn(run_session(session, msg_stream, state.push.clone()));
    Ok(response)
}

/// One task per connection: multiplex joined topics into outgoing text frames
/// while reacting to client commands.
async fn run_session(
    mut session: Session,
    mut stream: MessageStream,
    push: Arc<InMemoryPushChannel>,
) {
    let (frames_tx, mut frames_rx) = mpsc::channel::<String>(32);
    let mut rooms: HashMap<String, JoinHandle<()>> = HashMap::new();

    join_room(&mut rooms, &push, NEW_POST_TOPIC, &frames_tx).await;

    loop {
        tokio::select! {
            frame = frames_rx.recv() => {
                // The session holds a sender, so this only closes on teardown.
                let Some(frame) = frame else { break };
                if session.text(frame).await.is_err() {
                    break;
                }
            }
            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ClientCommand>(&text) {
                            Ok(ClientCommand::Join { room }) => {
                                join_room(&mut rooms, &push, &room, &frames_tx).await;
                            }
                            Ok(ClientCommand::Leave { room }) => {
                                if let Some(handle) = rooms.remove(&room) {
                                    handle.abort();
                                }
                            }
                            Err(e) => {
                                tracing::debug!("ignoring malformed socket frame: {e}");
                            }
                        }
                    }
                    Some(Ok(Message::Ping(bytes))) => {
                        if session.pong(&bytes).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    for handle in rooms.into_values() {
        handle.abort();
    }
    let _ = session.close(None).await;
}

/// Subscribe the session to `room`, spawning a forwarder that wraps published
/// payloads into outgoing frames. Joining a room twice is a no-op.
async fn join_room(
    rooms: &mut HashMap<String, JoinHandle<()>>,
    push: &InMemoryPushChannel,
    room: &str,
    frames_tx: &mpsc::Sender<String>,
) {
    if rooms.contains_key(room) {
        return;
    }

    let receiver = push.attach(room).await;
    let topic = room.to_string();
    let tx = frames_tx.clone();
    let handle = tokio::spawn(forward(topic.clone(), receiver, tx));
    rooms.insert(topic, handle);
}

async fn forward(topic: String, mut receiver: broadcast::Receiver<String>, tx: mpsc::Sender<String>) {
    loop {
        match receiver.recv().await {
            Ok(payload) => {
                let data: serde_json::Value = match serde_json::from_str(&payload) {
                    Ok(v) => v,
                    Err(e) => {
                        tracing::warn!(topic = %topic, "dropping undecodable push payload: {e}");
                        continue;
                    }
                };
                let frame = serde_json::json!({ "topic": topic, "data": data }).to_string();
                if tx.send(frame).await.is_err() {
                    break;
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(topic = %topic, skipped, "socket subscriber lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_parse_from_client_frames() {
        let join: ClientCommand =
            serde_json::from_str(r#"{"action":"join","room":"post-123"}"#).unwrap();
        assert!(matches!(join, ClientCommand::Join { room } if room == "post-123"));

        let leave: ClientCommand =
            serde_json::from_str(r#"{"action":"leave","room":"post-123"}"#).unwrap();
        assert!(matches!(leave, ClientCommand::Leave { room } if room == "post-123"));

        assert!(serde_json::from_str::<ClientCommand>(r#"{"action":"dance"}"#).is_err());
    }

    #[tokio::test]
    async fn forwarder_wraps_payloads_with_their_topic() {
        let push = InMemoryPushChannel::default();
        let receiver = push.attach("post-abc").await;
        let (tx, mut rx) = mpsc::channel(8);
        let handle = tokio::spawn(forward("post-abc".to_string(), receiver, tx));

        use bloghub_core::ports::PushChannel;
        push.publish("post-abc", serde_json::json!({"n": 1}))
            .await
            .unwrap();

        let frame: serde_json::Value =
            serde_json::from_str(&rx.recv().await.expect("forwarded frame")).unwrap();
        assert_eq!(frame["topic"], "post-abc");
        assert_eq!(frame["data"]["n"], 1);
        handle.abort();
    }
}
