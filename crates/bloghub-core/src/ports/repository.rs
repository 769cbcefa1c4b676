//! Repository ports - the persistence collaborator's surface.
//!
//! The document store itself is external; the core only depends on these
//! traits. Like toggling and view counting are expressed as single atomic
//! operations here so a fetch-mutate-save race cannot lose updates.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Comment, Post, PostPatch, User};
use crate::error::RepoError;
use crate::query::{CommentQuery, Page, PostQuery, UserQuery};

/// Result of an atomic like toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeOutcome {
    /// Like count after the toggle.
    pub likes_count: u64,
    /// Whether the actor is in the like set after the toggle.
    pub is_liked: bool,
}

/// Aggregate statistics over an author's published posts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuthorStats {
    pub posts_count: u64,
    pub total_likes: u64,
    pub total_views: u64,
}

/// User repository.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// Insert a new user. Fails with [`RepoError::Constraint`] on a duplicate
    /// username or email.
    async fn insert(&self, user: User) -> Result<User, RepoError>;

    async fn update(&self, user: User) -> Result<User, RepoError>;

    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;

    /// Paginated listing, newest first, with optional substring search across
    /// full name, username and email.
    async fn list(&self, query: &UserQuery) -> Result<Page<User>, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError>;

    /// Fetch a post and increment its view counter by exactly one, as a single
    /// atomic operation. The returned post carries the incremented count.
    async fn fetch_counted(&self, id: Uuid) -> Result<Option<Post>, RepoError>;

    async fn insert(&self, post: Post) -> Result<Post, RepoError>;

    /// Apply a partial update as a single atomic operation, so concurrent
    /// like toggles and view counts on the same post are never clobbered by
    /// a stale copy. Returns the updated post and whether this update was
    /// the first transition into published.
    async fn apply_patch(
        &self,
        id: Uuid,
        patch: PostPatch,
    ) -> Result<Option<(Post, bool)>, RepoError>;

    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;

    /// Filtered, sorted, paginated listing.
    async fn list(&self, query: &PostQuery) -> Result<Page<Post>, RepoError>;

    /// Atomically add the actor to the like set if absent, remove if present.
    async fn toggle_like(&self, id: Uuid, user_id: Uuid) -> Result<LikeOutcome, RepoError>;

    /// Distinct categories among published posts.
    async fn distinct_categories(&self) -> Result<Vec<String>, RepoError>;

    /// Delete every post owned by `author`, returning the deleted post ids so
    /// dependent comments can be cleaned up.
    async fn delete_by_author(&self, author: Uuid) -> Result<Vec<Uuid>, RepoError>;

    /// Remove `user_id` from every post's like set.
    async fn pull_like(&self, user_id: Uuid) -> Result<(), RepoError>;

    /// Aggregate stats over `author`'s published posts.
    async fn author_stats(&self, author: Uuid) -> Result<AuthorStats, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError>;

    async fn insert(&self, comment: Comment) -> Result<Comment, RepoError>;

    async fn update(&self, comment: Comment) -> Result<Comment, RepoError>;

    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;

    /// Paginated listing of a post's comments, newest first.
    async fn list_for_post(
        &self,
        post_id: Uuid,
        query: &CommentQuery,
    ) -> Result<Page<Comment>, RepoError>;

    /// Atomically add the actor to the like set if absent, remove if present.
    async fn toggle_like(&self, id: Uuid, user_id: Uuid) -> Result<LikeOutcome, RepoError>;

    /// Delete every comment under `post_id`, returning how many were removed.
    async fn delete_by_post(&self, post_id: Uuid) -> Result<u64, RepoError>;

    /// Delete every comment authored by `author`.
    async fn delete_by_author(&self, author: Uuid) -> Result<u64, RepoError>;

    /// Remove `user_id` from every comment's like set.
    async fn pull_like(&self, user_id: Uuid) -> Result<(), RepoError>;
}
