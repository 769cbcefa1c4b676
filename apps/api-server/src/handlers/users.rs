//! User handlers: profiles, admin listing and account removal.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use bloghub_core::domain::ProfilePatch;
use bloghub_core::ports::{CommentRepository, PostRepository, UserRepository};
use bloghub_core::query::UserQuery;
use bloghub_shared::dto::{
    PageParams, UpdateProfileRequest, UserEnvelope, UserListResponse, UserProfileResponse,
    UserResponse, UserStats,
};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/users/{id} - public profile with aggregate stats.
pub async fn get_user(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let user = state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let stats = state.posts.author_stats(id).await?;
    Ok(HttpResponse::Ok().json(UserProfileResponse {
        user: UserResponse::from_domain(user),
        stats: UserStats {
            posts_count: stats.posts_count,
            total_likes: stats.total_likes,
            total_views: stats.total_views,
        },
    }))
}

/// PUT /api/users/{id} - edit profile fields; the user themself or an admin.
pub async fn update_user(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdateProfileRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    if !identity.owns_or_admin(id) {
        return Err(AppError::Forbidden(
            "Not authorized to update this user".to_string(),
        ));
    }

    let mut user = state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let req = body.into_inner();
    user.apply_profile(ProfilePatch {
        full_name: req.full_name,
        bio: req.bio,
        avatar: req.avatar,
    });
    let saved = state.users.update(user).await?;

    Ok(HttpResponse::Ok().json(UserEnvelope {
        message: "Profile updated successfully".to_string(),
        user: UserResponse::from_domain(saved),
    }))
}

/// GET /api/users - paginated account listing, admins only.
pub async fn list_users(
    state: web::Data<AppState>,
    identity: Identity,
    params: web::Query<PageParams>,
) -> AppResult<HttpResponse> {
    if !identity.is_admin {
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }

    let params = params.into_inner();
    let query = UserQuery {
        page: params.page.unwrap_or(1),
        per_page: params.limit.unwrap_or(20),
        search: params.search,
    };

    let page = state.users.list(&query).await?;
    let pagination = page.pagination;
    let users = page.items.into_iter().map(UserResponse::from_domain).collect();
    Ok(HttpResponse::Ok().json(UserListResponse { users, pagination }))
}

/// DELETE /api/users/{id} - remove an account and everything it touched.
///
/// Admins only, and never their own account. The cascade removes the user's
/// comments, then their posts together with the comments under those posts,
/// then withdraws their likes from surviving posts and comments, and finally
/// deletes the account itself.
pub async fn delete_user(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    if !identity.is_admin {
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }

    let id = path.into_inner();
    if id == identity.user_id {
        return Err(AppError::Conflict(
            "Cannot delete your own account".to_string(),
        ));
    }

    state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let removed_comments = state.comments.delete_by_author(id).await?;
    let removed_posts = state.posts.delete_by_author(id).await?;
    for post_id in &removed_posts {
        state.comments.delete_by_post(*post_id).await?;
    }
    state.posts.pull_like(id).await?;
    state.comments.pull_like(id).await?;
    state.users.delete(id).await?;

    tracing::info!(
        user_id = %id,
        posts = removed_posts.len(),
        comments = removed_comments,
        "user account removed"
    );
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "User deleted successfully" })))
}

#[cfg(test)]
mod tests {
    use actix_web::{App, test, web};

    use bloghub_core::domain::PostStatus;
    use bloghub_core::ports::{PostRepository, UserRepository};
    use bloghub_shared::dto::{UserEnvelope, UserListResponse, UserProfileResponse};

    use crate::handlers::configure_routes;
    use crate::handlers::testutil::{bearer, seed_post, seed_user};
    use crate::state::AppState;

    #[actix_web::test]
    async fn profile_carries_aggregate_stats_over_published_posts() {
        let state = AppState::for_tests();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .configure(configure_routes),
        )
        .await;
        let (author, _) = seed_user(&state, "ann", false).await;
        let (fan, _) = seed_user(&state, "bob", false).await;
        let published = seed_post(&state, author.id, PostStatus::Published).await;
        seed_post(&state, author.id, PostStatus::Draft).await;
        state.posts.toggle_like(published.id, fan.id).await.unwrap();
        state.posts.fetch_counted(published.id).await.unwrap();

        let profile: UserProfileResponse = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri(&format!("/api/users/{}", author.id))
                .to_request(),
        )
        .await;

        // Drafts count toward nothing.
        assert_eq!(profile.stats.posts_count, 1);
        assert_eq!(profile.stats.total_likes, 1);
        assert_eq!(profile.stats.total_views, 1);
        assert_eq!(profile.user.username, author.username);
    }

    #[actix_web::test]
    async fn profile_edit_is_self_or_admin() {
        let state = AppState::for_tests();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .configure(configure_routes),
        )
        .await;
        let (target, token) = seed_user(&state, "ann", false).await;
        let (_, stranger_token) = seed_user(&state, "eve", false).await;

        let resp = test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&format!("/api/users/{}", target.id))
                .insert_header(bearer(&stranger_token))
                .set_json(serde_json::json!({ "bio": "not yours" }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 403);

        let updated: UserEnvelope = test::call_and_read_body_json(
            &app,
            test::TestRequest::put()
                .uri(&format!("/api/users/{}", target.id))
                .insert_header(bearer(&token))
                .set_json(serde_json::json!({ "bio": "writes about systems", "fullName": "Ann B." }))
                .to_request(),
        )
        .await;
        assert_eq!(updated.user.bio.as_deref(), Some("writes about systems"));
        assert_eq!(updated.user.full_name, "Ann B.");
    }

    #[actix_web::test]
    async fn listing_accounts_requires_admin() {
        let state = AppState::for_tests();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .configure(configure_routes),
        )
        .await;
        let (_, token) = seed_user(&state, "ann", false).await;
        let (_, admin_token) = seed_user(&state, "root", true).await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/users")
                .insert_header(bearer(&token))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 403);

        let listed: UserListResponse = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri("/api/users")
                .insert_header(bearer(&admin_token))
                .to_request(),
        )
        .await;
        assert_eq!(listed.pagination.total_items, 2);
    }

    #[actix_web::test]
    async fn admins_cannot_delete_their_own_account() {
        let state = AppState::for_tests();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .configure(configure_routes),
        )
        .await;
        let (admin, admin_token) = seed_user(&state, "root", true).await;

        let resp = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri(&format!("/api/users/{}", admin.id))
                .insert_header(bearer(&admin_token))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 400);
    }

    #[actix_web::test]
    async fn deleting_a_user_cascades_and_withdraws_likes() {
        let state = AppState::for_tests();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .configure(configure_routes),
        )
        .await;
        let (victim, _) = seed_user(&state, "ann", false).await;
        let (survivor, _) = seed_user(&state, "bob", false).await;
        let (_, admin_token) = seed_user(&state, "root", true).await;

        let victims_post = seed_post(&state, victim.id, PostStatus::Published).await;
        let survivors_post = seed_post(&state, survivor.id, PostStatus::Published).await;
        state
            .posts
            .toggle_like(survivors_post.id, victim.id)
            .await
            .unwrap();

        let resp = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri(&format!("/api/users/{}", victim.id))
                .insert_header(bearer(&admin_token))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 200);

        assert!(state.users.find_by_id(victim.id).await.unwrap().is_none());
        assert!(state.posts.find_by_id(victims_post.id).await.unwrap().is_none());
        let remaining = state
            .posts
            .find_by_id(survivors_post.id)
            .await
            .unwrap()
            .unwrap();
        assert!(remaining.likes.is_empty());
    }
}
