use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Comment entity - attached to a post.
///
/// `author` and `post_id` are immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author: Uuid,
    pub content: String,
    pub likes: Vec<Uuid>,
    pub is_edited: bool,
    pub edited_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Create a new comment on `post_id` by `author`.
    pub fn new(post_id: Uuid, author: Uuid, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            post_id,
            author,
            content,
            likes: Vec::new(),
            is_edited: false,
            edited_at: None,
            created_at: Utc::now(),
        }
    }

    /// Replace the content, marking the comment as edited.
    pub fn edit(&mut self, content: String) {
        self.content = content;
        self.is_edited = true;
        self.edited_at = Some(Utc::now());
    }
}
