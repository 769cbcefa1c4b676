//! Shared fixtures for handler tests.

use uuid::Uuid;

use bloghub_core::domain::{Post, PostDraft, PostStatus, User};
use bloghub_core::ports::{PostRepository, TokenService, UserRepository};

use crate::state::AppState;

/// Authorization header for `token`.
pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

/// Insert a user directly into the store and mint a token for them.
///
/// The stored hash is a placeholder; seeded accounts authenticate through
/// their token, never through the login endpoint.
pub async fn seed_user(state: &AppState, name: &str, admin: bool) -> (User, String) {
    let mut user = User::new(
        name.to_string(),
        format!("{name}@example.com"),
        "seeded-placeholder-hash".to_string(),
        format!("{name} Example"),
    );
    user.is_admin = admin;

    let user = state.users.insert(user).await.unwrap();
    let token = state
        .tokens
        .generate_token(user.id, &user.username, user.is_admin)
        .unwrap();
    (user, token)
}

/// Insert a post owned by `author` directly into the store.
pub async fn seed_post(state: &AppState, author: Uuid, status: PostStatus) -> Post {
    let post = Post::new(
        author,
        PostDraft {
            title: "Seeded title".to_string(),
            content: "Seeded content".to_string(),
            excerpt: "Seeded excerpt".to_string(),
            category: "General".to_string(),
            tags: vec!["seed".to_string()],
            cover_image: None,
            status,
        },
    );
    state.posts.insert(post).await.unwrap()
}
