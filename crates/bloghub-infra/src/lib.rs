//! # BlogHub Infrastructure
//!
//! Concrete implementations of the ports defined in `bloghub-core`:
//! the in-memory document store, the broadcast push channel, JWT + Argon2
//! authentication and the governor-based rate limiter.

pub mod auth;
pub mod pubsub;
pub mod rate_limit;
pub mod store;

pub use auth::{Argon2PasswordService, JwtTokenService};
pub use pubsub::InMemoryPushChannel;
pub use rate_limit::{InMemoryRateLimiter, RateLimitConfig};
pub use store::MemoryStore;
