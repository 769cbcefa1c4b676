//! Reducer-style blog store.
//!
//! Collections are caches keyed by identifier: every merge, whether from a
//! direct API call or a push event, is an upsert-by-id rather than a blind
//! prepend, so the creator's own insert and the broadcast of the same entity
//! cannot produce duplicates.

use uuid::Uuid;

use bloghub_shared::dto::{CommentResponse, PostResponse};
use bloghub_shared::events::{NEW_COMMENT_TOPIC, NEW_POST_TOPIC, NewCommentEvent, NewPostEvent};

/// One state transition. Each variant carries its full payload.
#[derive(Debug, Clone)]
pub enum Action {
    /// Posts page fetch resolved.
    PostsLoaded(Vec<PostResponse>),
    /// Posts page fetch failed; hydration still completes.
    PostsFailed,
    /// Categories fetch resolved.
    CategoriesLoaded(Vec<String>),
    /// Categories fetch failed; hydration still completes.
    CategoriesFailed,
    /// A post was created through the direct API path.
    PostSaved(PostResponse),
    /// A post was updated through the direct API path.
    PostUpdated(PostResponse),
    /// A post was deleted; drops its comments too.
    PostDeleted(Uuid),
    /// The server confirmed a like toggle; recompute membership locally.
    PostLikeToggled { post_id: Uuid, user_id: Uuid },
    /// A comment was created through the direct API path.
    CommentAdded(CommentResponse),
    /// The server confirmed a comment like toggle.
    CommentLikeToggled { comment_id: Uuid, user_id: Uuid },
    /// `new-post` push event.
    PushNewPost(NewPostEvent),
    /// `new-comment` push event, regardless of which post is on screen.
    PushNewComment(NewCommentEvent),
}

/// Client-side cache of blog data, newest first.
#[derive(Debug, Default)]
pub struct BlogStore {
    posts: Vec<PostResponse>,
    comments: Vec<CommentResponse>,
    categories: Vec<String>,
    posts_pending: bool,
    categories_pending: bool,
}

impl BlogStore {
    /// A fresh store with both hydration fetches outstanding.
    pub fn new() -> Self {
        Self {
            posts_pending: true,
            categories_pending: true,
            ..Default::default()
        }
    }

    /// True until both hydration fetches have settled (resolved or failed).
    pub fn loading(&self) -> bool {
        self.posts_pending || self.categories_pending
    }

    pub fn posts(&self) -> &[PostResponse] {
        &self.posts
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn comments(&self) -> &[CommentResponse] {
        &self.comments
    }

    /// Comments belonging to one post, for rendering a thread.
    pub fn comments_for(&self, post_id: Uuid) -> impl Iterator<Item = &CommentResponse> {
        self.comments.iter().filter(move |c| c.post == post_id)
    }

    /// The push topics this store consumes for its lifetime.
    pub fn subscriptions() -> [&'static str; 2] {
        [NEW_POST_TOPIC, NEW_COMMENT_TOPIC]
    }

    /// Apply one transition.
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::PostsLoaded(posts) => {
                self.posts = posts;
                self.posts_pending = false;
            }
            Action::PostsFailed => {
                self.posts_pending = false;
            }
            Action::CategoriesLoaded(categories) => {
                self.categories = categories;
                self.categories_pending = false;
            }
            Action::CategoriesFailed => {
                self.categories_pending = false;
            }
            Action::PostSaved(post) | Action::PostUpdated(post) => {
                self.upsert_post(post);
            }
            Action::PushNewPost(event) => {
                self.upsert_post(event.post);
            }
            Action::PostDeleted(post_id) => {
                self.posts.retain(|p| p.id != post_id);
                self.comments.retain(|c| c.post != post_id);
            }
            Action::PostLikeToggled { post_id, user_id } => {
                if let Some(post) = self.posts.iter_mut().find(|p| p.id == post_id) {
                    toggle_membership(&mut post.likes, user_id);
                }
            }
            Action::CommentAdded(comment) => {
                self.upsert_comment(comment);
            }
            Action::PushNewComment(event) => {
                self.upsert_comment(event.comment);
            }
            Action::CommentLikeToggled {
                comment_id,
                user_id,
            } => {
                if let Some(comment) = self.comments.iter_mut().find(|c| c.id == comment_id) {
                    toggle_membership(&mut comment.likes, user_id);
                }
            }
        }
    }

    fn upsert_post(&mut self, post: PostResponse) {
        match self.posts.iter_mut().find(|p| p.id == post.id) {
            Some(existing) => *existing = post,
            None => self.posts.insert(0, post),
        }
    }

    fn upsert_comment(&mut self, comment: CommentResponse) {
        match self.comments.iter_mut().find(|c| c.id == comment.id) {
            Some(existing) => *existing = comment,
            None => self.comments.insert(0, comment),
        }
    }
}

/// Symmetric add/remove on a like set, selected by current membership.
fn toggle_membership(likes: &mut Vec<Uuid>, user_id: Uuid) {
    if likes.contains(&user_id) {
        likes.retain(|id| *id != user_id);
    } else {
        likes.push(user_id);
    }
}
