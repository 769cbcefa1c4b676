//! Comment handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use bloghub_core::domain::Comment;
use bloghub_core::error::RepoError;
use bloghub_core::ports::{CommentRepository, PostRepository};
use bloghub_core::query::CommentQuery;
use bloghub_shared::dto::{
    CommentEnvelope, CommentListResponse, CommentResponse, CreateCommentRequest, LikeResponse,
    PageParams, UpdateCommentRequest,
};
use bloghub_shared::events::{NEW_COMMENT_TOPIC, NewCommentEvent, post_room};

use super::{author_summaries, author_summary, emit, ghost_author};
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/comments/post/{postId} - a post's comments, newest first.
///
/// The post itself is not looked up; an unknown id yields an empty page.
pub async fn list_for_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    params: web::Query<PageParams>,
) -> AppResult<HttpResponse> {
    let query = CommentQuery {
        page: params.page.unwrap_or(1),
        per_page: params.limit.unwrap_or(20),
    };

    let page = state.comments.list_for_post(path.into_inner(), &query).await?;
    let authors = author_summaries(&state, page.items.iter().map(|c| c.author)).await?;
    let pagination = page.pagination;
    let comments = page
        .items
        .into_iter()
        .map(|comment| {
            let author = authors
                .get(&comment.author)
                .cloned()
                .unwrap_or_else(|| ghost_author(comment.author));
            CommentResponse::from_domain(comment, author)
        })
        .collect();

    Ok(HttpResponse::Ok().json(CommentListResponse { comments, pagination }))
}

/// POST /api/comments - comment on an existing post.
pub async fn create_comment(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreateCommentRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    if req.content.trim().is_empty() {
        return Err(AppError::BadRequest("Content is required".to_string()));
    }

    let post = state
        .posts
        .find_by_id(req.post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    let saved = state
        .comments
        .insert(Comment::new(post.id, identity.user_id, req.content))
        .await?;

    let author = author_summary(&state, saved.author).await?;
    let response = CommentResponse::from_domain(saved, author);

    // Announced on the parent post's room after the write has committed.
    let event = NewCommentEvent {
        comment: response.clone(),
        post_id: post.id,
    };
    emit(&state, &post_room(post.id), &event).await;
    emit(&state, NEW_COMMENT_TOPIC, &event).await;

    Ok(HttpResponse::Created().json(CommentEnvelope {
        message: "Comment created successfully".to_string(),
        comment: response,
    }))
}

/// PUT /api/comments/{id} - edit the content; authors only.
pub async fn update_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdateCommentRequest>,
) -> AppResult<HttpResponse> {
    let mut comment = state
        .comments
        .find_by_id(path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

    if comment.author != identity.user_id {
        return Err(AppError::Forbidden(
            "Not authorized to update this comment".to_string(),
        ));
    }
    if body.content.trim().is_empty() {
        return Err(AppError::BadRequest("Content is required".to_string()));
    }

    comment.edit(body.into_inner().content);
    let saved = state.comments.update(comment).await?;

    let author = author_summary(&state, saved.author).await?;
    Ok(HttpResponse::Ok().json(CommentEnvelope {
        message: "Comment updated successfully".to_string(),
        comment: CommentResponse::from_domain(saved, author),
    }))
}

/// DELETE /api/comments/{id} - author or admin.
pub async fn delete_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let comment = state
        .comments
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

    if !identity.owns_or_admin(comment.author) {
        return Err(AppError::Forbidden(
            "Not authorized to delete this comment".to_string(),
        ));
    }

    state.comments.delete(id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Comment deleted successfully" })))
}

/// POST /api/comments/{id}/like - toggle the actor's like.
pub async fn like_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let outcome = state
        .comments
        .toggle_like(path.into_inner(), identity.user_id)
        .await
        .map_err(|e| match e {
            RepoError::NotFound => AppError::NotFound("Comment not found".to_string()),
            other => other.into(),
        })?;

    Ok(HttpResponse::Ok().json(LikeResponse {
        message: if outcome.is_liked {
            "Comment liked".to_string()
        } else {
            "Comment unliked".to_string()
        },
        likes_count: outcome.likes_count,
        is_liked: outcome.is_liked,
    }))
}

#[cfg(test)]
mod tests {
    use actix_web::{App, test, web};
    use uuid::Uuid;

    use bloghub_core::domain::PostStatus;
    use bloghub_shared::dto::{CommentEnvelope, CommentListResponse};
    use bloghub_shared::events::{NewCommentEvent, post_room};

    use crate::handlers::configure_routes;
    use crate::handlers::testutil::{bearer, seed_post, seed_user};
    use crate::state::AppState;

    #[actix_web::test]
    async fn commenting_on_a_missing_post_is_404_and_emits_nothing() {
        let state = AppState::for_tests();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .configure(configure_routes),
        )
        .await;
        let (_, token) = seed_user(&state, "ann", false).await;
        let ghost = Uuid::new_v4();
        let mut room = state.push.attach(&post_room(ghost)).await;

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/comments")
                .insert_header(bearer(&token))
                .set_json(serde_json::json!({ "content": "hi", "postId": ghost }))
                .to_request(),
        )
        .await;

        assert_eq!(resp.status(), 404);
        assert!(room.try_recv().is_err());
    }

    #[actix_web::test]
    async fn creating_a_comment_announces_it_on_the_post_room() {
        let state = AppState::for_tests();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .configure(configure_routes),
        )
        .await;
        let (author, token) = seed_user(&state, "ann", false).await;
        let post = seed_post(&state, author.id, PostStatus::Published).await;
        let mut room = state.push.attach(&post_room(post.id)).await;

        let created: CommentEnvelope = test::call_and_read_body_json(
            &app,
            test::TestRequest::post()
                .uri("/api/comments")
                .insert_header(bearer(&token))
                .set_json(serde_json::json!({ "content": "First!", "postId": post.id }))
                .to_request(),
        )
        .await;
        assert_eq!(created.comment.post, post.id);

        let event: NewCommentEvent =
            serde_json::from_str(&room.try_recv().expect("room announcement")).unwrap();
        assert_eq!(event.post_id, post.id);
        assert_eq!(event.comment.content, "First!");
    }

    #[actix_web::test]
    async fn editing_marks_the_comment_and_is_author_only() {
        let state = AppState::for_tests();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .configure(configure_routes),
        )
        .await;
        let (author, token) = seed_user(&state, "ann", false).await;
        let (_, admin_token) = seed_user(&state, "root", true).await;
        let post = seed_post(&state, author.id, PostStatus::Published).await;

        let created: CommentEnvelope = test::call_and_read_body_json(
            &app,
            test::TestRequest::post()
                .uri("/api/comments")
                .insert_header(bearer(&token))
                .set_json(serde_json::json!({ "content": "draft thought", "postId": post.id }))
                .to_request(),
        )
        .await;

        // Even an admin cannot rewrite someone else's words.
        let resp = test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&format!("/api/comments/{}", created.comment.id))
                .insert_header(bearer(&admin_token))
                .set_json(serde_json::json!({ "content": "rewritten" }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 403);

        let edited: CommentEnvelope = test::call_and_read_body_json(
            &app,
            test::TestRequest::put()
                .uri(&format!("/api/comments/{}", created.comment.id))
                .insert_header(bearer(&token))
                .set_json(serde_json::json!({ "content": "final thought" }))
                .to_request(),
        )
        .await;
        assert!(edited.comment.is_edited);
        assert!(edited.comment.edited_at.is_some());
        assert_eq!(edited.comment.content, "final thought");
    }

    #[actix_web::test]
    async fn admin_may_delete_a_foreign_comment() {
        let state = AppState::for_tests();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .configure(configure_routes),
        )
        .await;
        let (author, token) = seed_user(&state, "ann", false).await;
        let (_, admin_token) = seed_user(&state, "root", true).await;
        let post = seed_post(&state, author.id, PostStatus::Published).await;

        let created: CommentEnvelope = test::call_and_read_body_json(
            &app,
            test::TestRequest::post()
                .uri("/api/comments")
                .insert_header(bearer(&token))
                .set_json(serde_json::json!({ "content": "spam", "postId": post.id }))
                .to_request(),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri(&format!("/api/comments/{}", created.comment.id))
                .insert_header(bearer(&admin_token))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 200);

        let listed: CommentListResponse = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri(&format!("/api/comments/post/{}", post.id))
                .to_request(),
        )
        .await;
        assert!(listed.comments.is_empty());
    }

    #[actix_web::test]
    async fn listing_an_unknown_post_yields_an_empty_page() {
        let state = AppState::for_tests();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .configure(configure_routes),
        )
        .await;

        let listed: CommentListResponse = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri(&format!("/api/comments/post/{}", Uuid::new_v4()))
                .to_request(),
        )
        .await;
        assert!(listed.comments.is_empty());
        assert_eq!(listed.pagination.total_items, 0);
    }
}
