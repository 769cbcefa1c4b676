//! Data Transfer Objects - request/response types for the API.
//!
//! Field names are camelCase on the wire to match the original client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bloghub_core::domain::{Comment, Post, PostStatus, User};
use bloghub_core::query::{Pagination, PostSortField, SortOrder};

// ---------------------------------------------------------------------------
// Requests

/// Register a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
}

/// Login with email + password.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Create a post. Omitted status defaults to draft.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub cover_image: Option<String>,
    pub status: Option<PostStatus>,
}

/// Partially update a post. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub cover_image: Option<String>,
    pub status: Option<PostStatus>,
}

/// Create a comment on a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub content: String,
    pub post_id: Uuid,
}

/// Edit a comment's content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCommentRequest {
    pub content: String,
}

/// Update the editable profile fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<String>,
}

/// Query string accepted by `GET /api/posts`.
///
/// Parsing is deliberately lenient: malformed numeric parameters and
/// unrecognized author/sort values fall back to defaults instead of failing
/// the request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PostListParams {
    #[serde(deserialize_with = "lenient::u64_opt")]
    pub page: Option<u64>,
    #[serde(deserialize_with = "lenient::u64_opt")]
    pub limit: Option<u64>,
    pub category: Option<String>,
    #[serde(deserialize_with = "lenient::uuid_opt")]
    pub author: Option<Uuid>,
    pub search: Option<String>,
    #[serde(deserialize_with = "lenient::sort_field_opt")]
    pub sort_by: Option<PostSortField>,
    #[serde(deserialize_with = "lenient::sort_order_opt")]
    pub sort_order: Option<SortOrder>,
}

/// Query string accepted by `GET /api/posts/user/{userId}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OwnPostListParams {
    #[serde(deserialize_with = "lenient::u64_opt")]
    pub page: Option<u64>,
    #[serde(deserialize_with = "lenient::u64_opt")]
    pub limit: Option<u64>,
    #[serde(deserialize_with = "lenient::status_opt")]
    pub status: Option<PostStatus>,
}

/// Query string accepted by comment and user listings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PageParams {
    #[serde(deserialize_with = "lenient::u64_opt")]
    pub page: Option<u64>,
    #[serde(deserialize_with = "lenient::u64_opt")]
    pub limit: Option<u64>,
    pub search: Option<String>,
}

/// Lenient query-string deserializers: anything that does not parse is
/// treated as absent, so the engine's defaults apply.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use uuid::Uuid;

    use bloghub_core::domain::PostStatus;
    use bloghub_core::query::{PostSortField, SortOrder};

    fn raw<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        Option::<String>::deserialize(deserializer)
    }

    pub fn u64_opt<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
        Ok(raw(d)?.and_then(|s| s.parse().ok()))
    }

    pub fn uuid_opt<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Uuid>, D::Error> {
        Ok(raw(d)?.and_then(|s| Uuid::parse_str(&s).ok()))
    }

    pub fn sort_field_opt<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<PostSortField>, D::Error> {
        Ok(raw(d)?.and_then(|s| match s.as_str() {
            "publishedAt" => Some(PostSortField::PublishedAt),
            "createdAt" => Some(PostSortField::CreatedAt),
            "updatedAt" => Some(PostSortField::UpdatedAt),
            "views" => Some(PostSortField::Views),
            "title" => Some(PostSortField::Title),
            _ => None,
        }))
    }

    pub fn sort_order_opt<'de, D: Deserializer<'de>>(d: D) -> Result<Option<SortOrder>, D::Error> {
        Ok(raw(d)?.and_then(|s| match s.as_str() {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }))
    }

    pub fn status_opt<'de, D: Deserializer<'de>>(d: D) -> Result<Option<PostStatus>, D::Error> {
        Ok(raw(d)?.and_then(|s| match s.as_str() {
            "draft" => Some(PostStatus::Draft),
            "published" => Some(PostStatus::Published),
            _ => None,
        }))
    }
}

// ---------------------------------------------------------------------------
// Responses

/// Author summary joined into post/comment responses at read time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorSummary {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub avatar: Option<String>,
}

impl AuthorSummary {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            full_name: user.full_name.clone(),
            avatar: user.avatar.clone(),
        }
    }
}

/// A post as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub author: AuthorSummary,
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

impl PostResponse {
    pub fn from_domain(post: Post, author: AuthorSummary) -> Self {
        Self {
            id: post.id,
            title: post.title,
            content: post.content,
            excerpt: post.excerpt,
            author,
            category: post.category,
            tags: post.tags,
            cover_image: post.cover_image,
            status: post.status,
            views: post.views,
            likes: post.likes,
            published_at: post.published_at,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

/// A comment as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: Uuid,
    pub post: Uuid,
    pub author: AuthorSummary,
    pub content: String,
    pub likes: Vec<Uuid>,
    pub is_edited: bool,
    pub edited_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl CommentResponse {
    pub fn from_domain(comment: Comment, author: AuthorSummary) -> Self {
        Self {
            id: comment.id,
            post: comment.post_id,
            author,
            content: comment.content,
            likes: comment.likes,
            is_edited: comment.is_edited,
            edited_at: comment.edited_at,
            created_at: comment.created_at,
        }
    }
}

/// A user's public profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub bio: Option<String>,
    pub avatar: Option<String>,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl UserResponse {
    pub fn from_domain(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            bio: user.bio,
            avatar: user.avatar,
            is_admin: user.is_admin,
            created_at: user.created_at,
        }
    }
}

/// Aggregate stats shown on a profile page.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub posts_count: u64,
    pub total_likes: u64,
    pub total_views: u64,
}

/// `GET /api/users/{id}` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfileResponse {
    pub user: UserResponse,
    pub stats: UserStats,
}

/// Successful register/login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

/// `{ message, post }` mutation envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostEnvelope {
    pub message: String,
    pub post: PostResponse,
}

/// `{ message, comment }` mutation envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentEnvelope {
    pub message: String,
    pub comment: CommentResponse,
}

/// `{ message, user }` mutation envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserEnvelope {
    pub message: String,
    pub user: UserResponse,
}

/// Like toggle result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    pub message: String,
    pub likes_count: u64,
    pub is_liked: bool,
}

/// Paginated post listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostListResponse {
    pub posts: Vec<PostResponse>,
    pub pagination: Pagination,
}

/// Paginated comment listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentListResponse {
    pub comments: Vec<CommentResponse>,
    pub pagination: Pagination,
}

/// Paginated user listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserListResponse {
    pub users: Vec<UserResponse>,
    pub pagination: Pagination,
}
