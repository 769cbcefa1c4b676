//! Push-event payloads and topic names for the realtime channel.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dto::{CommentResponse, PostResponse};

/// Global topic announcing newly published posts.
pub const NEW_POST_TOPIC: &str = "new-post";

/// Event name for comments, delivered on the parent post's room.
pub const NEW_COMMENT_TOPIC: &str = "new-comment";

/// Per-post room carrying that post's comment events.
pub fn post_room(post_id: Uuid) -> String {
    format!("post-{post_id}")
}

/// Payload published on [`NEW_POST_TOPIC`] when a post first becomes published.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPostEvent {
    pub post: PostResponse,
    /// Human-readable announcement shown as a notification.
    pub message: String,
}

impl NewPostEvent {
    pub fn new(post: PostResponse) -> Self {
        let message = format!(
            "New post published: \"{}\" by {}",
            post.title, post.author.full_name
        );
        Self { post, message }
    }
}

/// Payload published on a post's room when a comment is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCommentEvent {
    pub comment: CommentResponse,
    pub post_id: Uuid,
}
