//! Post handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use bloghub_core::domain::{Post, PostDraft, PostPatch, PostStatus};
use bloghub_core::error::RepoError;
use bloghub_core::ports::{CommentRepository, PostRepository};
use bloghub_core::query::{PostQuery, PostSortField, SortOrder};
use bloghub_shared::dto::{
    CreatePostRequest, LikeResponse, OwnPostListParams, PostEnvelope, PostListParams,
    PostListResponse, PostResponse, UpdatePostRequest,
};
use bloghub_shared::events::{NEW_POST_TOPIC, NewPostEvent};

use super::{author_summaries, author_summary, emit, ghost_author};
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn patch_from(req: UpdatePostRequest) -> PostPatch {
    PostPatch {
        title: req.title,
        content: req.content,
        excerpt: req.excerpt,
        category: req.category,
        tags: req.tags,
        cover_image: req.cover_image,
        status: req.status,
    }
}

async fn respond_page(
    state: &AppState,
    page: bloghub_core::query::Page<Post>,
) -> AppResult<PostListResponse> {
    let authors = author_summaries(state, page.items.iter().map(|p| p.author)).await?;
    let pagination = page.pagination;
    let posts = page
        .items
        .into_iter()
        .map(|post| {
            let author = authors
                .get(&post.author)
                .cloned()
                .unwrap_or_else(|| ghost_author(post.author));
            PostResponse::from_domain(post, author)
        })
        .collect();
    Ok(PostListResponse { posts, pagination })
}

/// GET /api/posts - published posts with filters and pagination.
pub async fn list_posts(
    state: web::Data<AppState>,
    params: web::Query<PostListParams>,
) -> AppResult<HttpResponse> {
    let params = params.into_inner();
    let query = PostQuery {
        page: params.page.unwrap_or(1),
        per_page: params.limit.unwrap_or(10),
        category: params.category,
        author: params.author,
        status: Some(PostStatus::Published),
        search: params.search,
        sort_by: params.sort_by.unwrap_or_default(),
        sort_order: params.sort_order.unwrap_or_default(),
    };

    let page = state.posts.list(&query).await?;
    Ok(HttpResponse::Ok().json(respond_page(&state, page).await?))
}

/// GET /api/posts/{id} - single post. Increments the view counter as a side
/// effect, so two reads of the same post return different counts.
pub async fn get_post(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .fetch_counted(path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    let author = author_summary(&state, post.author).await?;
    Ok(HttpResponse::Ok().json(PostResponse::from_domain(post, author)))
}

/// POST /api/posts - create a post, draft unless stated otherwise.
pub async fn create_post(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    if req.title.trim().is_empty() || req.content.trim().is_empty() {
        return Err(AppError::BadRequest("Title and content are required".to_string()));
    }
    if req.category.trim().is_empty() {
        return Err(AppError::BadRequest("Category is required".to_string()));
    }

    let draft = PostDraft {
        title: req.title,
        content: req.content,
        excerpt: req.excerpt,
        category: req.category,
        tags: req.tags,
        cover_image: req.cover_image,
        status: req.status.unwrap_or(PostStatus::Draft),
    };
    let saved = state.posts.insert(Post::new(identity.user_id, draft)).await?;

    let author = author_summary(&state, saved.author).await?;
    let response = PostResponse::from_domain(saved, author);

    // Published posts are announced globally once the write has committed.
    if response.status == PostStatus::Published {
        emit(&state, NEW_POST_TOPIC, &NewPostEvent::new(response.clone())).await;
    }

    Ok(HttpResponse::Created().json(PostEnvelope {
        message: "Post created successfully".to_string(),
        post: response,
    }))
}

/// PUT /api/posts/{id} - update fields; only the author or an admin may act.
pub async fn update_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    if !identity.owns_or_admin(post.author) {
        return Err(AppError::Forbidden(
            "Not authorized to update this post".to_string(),
        ));
    }

    // The patch itself is applied inside the store, so a like or view count
    // landing between the ownership check and the write survives.
    let (saved, newly_published) = state
        .posts
        .apply_patch(id, patch_from(body.into_inner()))
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    let author = author_summary(&state, saved.author).await?;
    let response = PostResponse::from_domain(saved, author);

    // Announce only the first transition into published.
    if newly_published {
        emit(&state, NEW_POST_TOPIC, &NewPostEvent::new(response.clone())).await;
    }

    Ok(HttpResponse::Ok().json(PostEnvelope {
        message: "Post updated successfully".to_string(),
        post: response,
    }))
}

/// DELETE /api/posts/{id} - delete a post and its comments.
pub async fn delete_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    if !identity.owns_or_admin(post.author) {
        return Err(AppError::Forbidden(
            "Not authorized to delete this post".to_string(),
        ));
    }

    state.comments.delete_by_post(id).await?;
    state.posts.delete(id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Post deleted successfully" })))
}

/// POST /api/posts/{id}/like - toggle the actor's like.
pub async fn like_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let outcome = state
        .posts
        .toggle_like(path.into_inner(), identity.user_id)
        .await
        .map_err(|e| match e {
            RepoError::NotFound => AppError::NotFound("Post not found".to_string()),
            other => other.into(),
        })?;

    Ok(HttpResponse::Ok().json(LikeResponse {
        message: if outcome.is_liked {
            "Post liked".to_string()
        } else {
            "Post unliked".to_string()
        },
        likes_count: outcome.likes_count,
        is_liked: outcome.is_liked,
    }))
}

/// GET /api/posts/meta/categories - distinct categories among published posts.
pub async fn categories(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.posts.distinct_categories().await?))
}

/// GET /api/posts/user/{userId} - a user's posts including drafts;
/// restricted to the user themself or an admin.
pub async fn user_posts(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    params: web::Query<OwnPostListParams>,
) -> AppResult<HttpResponse> {
    let user_id = path.into_inner();
    if !identity.owns_or_admin(user_id) {
        return Err(AppError::Forbidden("Not authorized".to_string()));
    }

    let params = params.into_inner();
    let query = PostQuery {
        page: params.page.unwrap_or(1),
        per_page: params.limit.unwrap_or(10),
        author: Some(user_id),
        status: params.status,
        sort_by: PostSortField::UpdatedAt,
        sort_order: SortOrder::Desc,
        ..Default::default()
    };

    let page = state.posts.list(&query).await?;
    Ok(HttpResponse::Ok().json(respond_page(&state, page).await?))
}
