use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Publication state of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Published,
}

/// Post entity - a blog article owned by its author.
///
/// Invariants: `author` is immutable after creation; `likes` never contains
/// duplicate user ids; `published_at` is stamped exactly once, at the first
/// transition into [`PostStatus::Published`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author: Uuid,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub category: String,
    pub tags: Vec<String>,
    pub cover_image: Option<String>,
    pub status: PostStatus,
    pub views: u64,
    pub likes: Vec<Uuid>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a post.
#[derive(Debug, Clone)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub category: String,
    pub tags: Vec<String>,
    pub cover_image: Option<String>,
    pub status: PostStatus,
}

/// Partial update to a post. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub cover_image: Option<String>,
    pub status: Option<PostStatus>,
}

impl Post {
    /// Create a new post owned by `author`.
    ///
    /// A post created directly in `Published` state gets its `published_at`
    /// stamped immediately.
    pub fn new(author: Uuid, draft: PostDraft) -> Self {
        let now = Utc::now();
        let published_at = (draft.status == PostStatus::Published).then_some(now);
        Self {
            id: Uuid::new_v4(),
            author,
            title: draft.title,
            content: draft.content,
            excerpt: draft.excerpt,
            category: draft.category,
            tags: draft.tags,
            cover_image: draft.cover_image,
            status: draft.status,
            views: 0,
            likes: Vec::new(),
            published_at,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update, refreshing `updated_at`.
    ///
    /// Returns `true` when this update transitioned the post into `Published`
    /// for the first time. A later update that keeps the post published does
    /// not re-stamp `published_at` and returns `false`.
    pub fn apply_patch(&mut self, patch: PostPatch) -> bool {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(excerpt) = patch.excerpt {
            self.excerpt = excerpt;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        if let Some(cover_image) = patch.cover_image {
            self.cover_image = Some(cover_image);
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        self.updated_at = Utc::now();

        let newly_published =
            self.status == PostStatus::Published && self.published_at.is_none();
        if newly_published {
            self.published_at = Some(self.updated_at);
        }
        newly_published
    }

    /// Whether `user_id` is present in the like set.
    pub fn is_liked_by(&self, user_id: Uuid) -> bool {
        self.likes.contains(&user_id)
    }
}
