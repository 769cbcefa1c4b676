//! HTTP handlers and route configuration.

mod auth;
mod comments;
mod health;
mod posts;
mod users;

#[cfg(test)]
pub(crate) mod testutil;

use std::collections::HashMap;

use actix_web::web;
use uuid::Uuid;

use bloghub_core::ports::UserRepository;
use bloghub_shared::dto::AuthorSummary;

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::me)),
            )
            // Post routes; literal segments registered before `{id}`
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list_posts))
                    .route("", web::post().to(posts::create_post))
                    .route("/meta/categories", web::get().to(posts::categories))
                    .route("/user/{user_id}", web::get().to(posts::user_posts))
                    .route("/{id}", web::get().to(posts::get_post))
                    .route("/{id}", web::put().to(posts::update_post))
                    .route("/{id}", web::delete().to(posts::delete_post))
                    .route("/{id}/like", web::post().to(posts::like_post)),
            )
            // Comment routes
            .service(
                web::scope("/comments")
                    .route("/post/{post_id}", web::get().to(comments::list_for_post))
                    .route("", web::post().to(comments::create_comment))
                    .route("/{id}", web::put().to(comments::update_comment))
                    .route("/{id}", web::delete().to(comments::delete_comment))
                    .route("/{id}/like", web::post().to(comments::like_comment)),
            )
            // User routes
            .service(
                web::scope("/users")
                    .route("", web::get().to(users::list_users))
                    .route("/{id}", web::get().to(users::get_user))
                    .route("/{id}", web::put().to(users::update_user))
                    .route("/{id}", web::delete().to(users::delete_user)),
            ),
    );
}

/// Fire-and-forget push emission: serialize, publish, log on failure. The
/// write that preceded the emission is never rolled back.
pub(crate) async fn emit<E: serde::Serialize>(state: &AppState, topic: &str, event: &E) {
    use bloghub_core::ports::PushChannel;

    match serde_json::to_value(event) {
        Ok(payload) => {
            if let Err(e) = state.push.publish(topic, payload).await {
                tracing::warn!(topic = %topic, "push emission failed: {e}");
            }
        }
        Err(e) => tracing::warn!(topic = %topic, "push payload encoding failed: {e}"),
    }
}

/// Placeholder summary for an author the cascade has already removed.
pub(crate) fn ghost_author(id: Uuid) -> AuthorSummary {
    AuthorSummary {
        id,
        username: "deleted".to_string(),
        full_name: "Deleted User".to_string(),
        avatar: None,
    }
}

/// Resolve the display-time author summary for `id`.
pub(crate) async fn author_summary(state: &AppState, id: Uuid) -> AppResult<AuthorSummary> {
    Ok(match state.users.find_by_id(id).await? {
        Some(user) => AuthorSummary::from_user(&user),
        None => ghost_author(id),
    })
}

/// Resolve summaries for a batch of author ids, one lookup per distinct id.
pub(crate) async fn author_summaries(
    state: &AppState,
    ids: impl IntoIterator<Item = Uuid>,
) -> AppResult<HashMap<Uuid, AuthorSummary>> {
    let mut map = HashMap::new();
    for id in ids {
        if !map.contains_key(&id) {
            let summary = author_summary(state, id).await?;
            map.insert(id, summary);
        }
    }
    Ok(map)
}
