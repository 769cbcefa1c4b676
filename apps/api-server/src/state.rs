//! Application state - shared across all handlers.

use std::sync::Arc;

use bloghub_core::ports::{
    CommentRepository, PasswordService, PostRepository, RateLimiter, TokenService, UserRepository,
};
use bloghub_infra::auth::{Argon2PasswordService, JwtTokenService};
use bloghub_infra::pubsub::InMemoryPushChannel;
use bloghub_infra::rate_limit::InMemoryRateLimiter;
use bloghub_infra::store::MemoryStore;

/// Shared application state. Every collaborator is an explicit dependency
/// injected here at construction time; nothing is reachable through a
/// process-wide singleton.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    /// Concrete type rather than the port: the websocket endpoint also needs
    /// the subscribe side, which only the in-process channel exposes.
    pub push: Arc<InMemoryPushChannel>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    pub rate_limiter: Arc<dyn RateLimiter>,
}

impl AppState {
    /// Build the application state from environment configuration.
    pub fn from_env() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            users: store.clone(),
            posts: store.clone(),
            comments: store,
            push: Arc::new(InMemoryPushChannel::default()),
            tokens: Arc::new(JwtTokenService::from_env()),
            passwords: Arc::new(Argon2PasswordService::new()),
            rate_limiter: Arc::new(InMemoryRateLimiter::from_env()),
        }
    }

    /// State with fixed configuration, for handler tests.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        use bloghub_infra::auth::JwtConfig;
        use bloghub_infra::rate_limit::RateLimitConfig;

        let store = Arc::new(MemoryStore::new());
        Self {
            users: store.clone(),
            posts: store.clone(),
            comments: store,
            push: Arc::new(InMemoryPushChannel::default()),
            tokens: Arc::new(JwtTokenService::new(JwtConfig::default())),
            passwords: Arc::new(Argon2PasswordService::new()),
            rate_limiter: Arc::new(InMemoryRateLimiter::new(RateLimitConfig::default())),
        }
    }
}
