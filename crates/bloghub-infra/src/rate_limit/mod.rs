//! Rate limiter implementations.

mod memory;

pub use memory::{InMemoryRateLimiter, RateLimitConfig};
