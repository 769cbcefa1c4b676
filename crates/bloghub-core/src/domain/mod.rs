//! Domain entities - the core business objects.

mod comment;
mod post;
mod user;

pub use comment::Comment;
pub use post::{Post, PostDraft, PostPatch, PostStatus};
pub use user::{ProfilePatch, User};
