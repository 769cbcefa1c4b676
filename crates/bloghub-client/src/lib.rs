//! # BlogHub Client
//!
//! The client-side sync state: an in-memory store of posts, comments and
//! categories that merges REST responses with live push events through a
//! single state-transition function.

mod store;

pub use store::{Action, BlogStore};
