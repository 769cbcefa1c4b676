//! In-memory document store.
//!
//! Stand-in for the external document database. All three collections live
//! behind one `RwLock`, so the like-toggle and view-count operations are
//! single read-modify-writes under the write lock - concurrent toggles by
//! different actors cannot lose updates.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use bloghub_core::domain::{Comment, Post, PostPatch, PostStatus, User};
use bloghub_core::error::RepoError;
use bloghub_core::ports::{
    AuthorStats, CommentRepository, LikeOutcome, PostRepository, UserRepository,
};
use bloghub_core::query::{CommentQuery, Page, PostQuery, PostSortField, SortOrder, UserQuery};

#[derive(Default)]
struct Collections {
    users: HashMap<Uuid, User>,
    posts: HashMap<Uuid, Post>,
    comments: HashMap<Uuid, Comment>,
}

/// In-memory store implementing every repository port.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn toggle(likes: &mut Vec<Uuid>, user_id: Uuid) -> LikeOutcome {
    let was_liked = likes.contains(&user_id);
    if was_liked {
        likes.retain(|id| *id != user_id);
    } else {
        likes.push(user_id);
    }
    LikeOutcome {
        likes_count: likes.len() as u64,
        is_liked: !was_liked,
    }
}

fn paginate<T: Clone>(sorted: &[&T], page: u64, per_page: u64) -> Page<T> {
    let total = sorted.len() as u64;
    let offset = page.max(1).saturating_sub(1) * per_page;
    let items = sorted
        .iter()
        .skip(offset as usize)
        .take(per_page as usize)
        .map(|item| (*item).clone())
        .collect();
    Page::new(items, page, per_page, total)
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Sort key for posts. Posts without a publish timestamp sort oldest when
/// ordering by `publishedAt`.
fn post_sort_key(post: &Post, field: PostSortField) -> DateTime<Utc> {
    match field {
        PostSortField::PublishedAt => post.published_at.unwrap_or(DateTime::<Utc>::MIN_UTC),
        PostSortField::CreatedAt => post.created_at,
        PostSortField::UpdatedAt => post.updated_at,
        // Non-timestamp fields are compared separately.
        PostSortField::Views | PostSortField::Title => post.created_at,
    }
}

fn compare_posts(a: &Post, b: &Post, field: PostSortField, order: SortOrder) -> Ordering {
    let ordering = match field {
        PostSortField::Views => a.views.cmp(&b.views),
        PostSortField::Title => a.title.cmp(&b.title),
        _ => post_sort_key(a, field).cmp(&post_sort_key(b, field)),
    };
    match order {
        SortOrder::Asc => ordering,
        SortOrder::Desc => ordering.reverse(),
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let inner = self.inner.read().await;
        Ok(inner
            .users
            .values()
            .find(|user| user.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut inner = self.inner.write().await;
        let duplicate = inner.users.values().any(|existing| {
            existing.username.eq_ignore_ascii_case(&user.username)
                || existing.email.eq_ignore_ascii_case(&user.email)
        });
        if duplicate {
            return Err(RepoError::Constraint(
                "username or email already taken".into(),
            ));
        }
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut inner = self.inner.write().await;
        let slot = inner.users.get_mut(&user.id).ok_or(RepoError::NotFound)?;
        *slot = user.clone();
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut inner = self.inner.write().await;
        inner.users.remove(&id).ok_or(RepoError::NotFound)?;
        Ok(())
    }

    async fn list(&self, query: &UserQuery) -> Result<Page<User>, RepoError> {
        let inner = self.inner.read().await;
        let needle = query.search.as_deref().map(str::to_lowercase);
        let mut matches: Vec<&User> = inner
            .users
            .values()
            .filter(|user| match &needle {
                Some(needle) => {
                    contains_ci(&user.full_name, needle)
                        || contains_ci(&user.username, needle)
                        || contains_ci(&user.email, needle)
                }
                None => true,
            })
            .collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(&matches, query.page, query.per_page))
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.inner.read().await.posts.get(&id).cloned())
    }

    async fn fetch_counted(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let mut inner = self.inner.write().await;
        Ok(inner.posts.get_mut(&id).map(|post| {
            post.views += 1;
            post.clone()
        }))
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let mut inner = self.inner.write().await;
        inner.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn apply_patch(
        &self,
        id: Uuid,
        patch: PostPatch,
    ) -> Result<Option<(Post, bool)>, RepoError> {
        let mut inner = self.inner.write().await;
        Ok(inner.posts.get_mut(&id).map(|post| {
            let newly_published = post.apply_patch(patch);
            (post.clone(), newly_published)
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut inner = self.inner.write().await;
        inner.posts.remove(&id).ok_or(RepoError::NotFound)?;
        Ok(())
    }

    async fn list(&self, query: &PostQuery) -> Result<Page<Post>, RepoError> {
        let inner = self.inner.read().await;
        let category = query.category_filter();
        let needle = query.search.as_deref().map(str::to_lowercase);

        let mut matches: Vec<&Post> = inner
            .posts
            .values()
            .filter(|post| query.status.is_none_or(|status| post.status == status))
            .filter(|post| category.is_none_or(|c| post.category == c))
            .filter(|post| query.author.is_none_or(|author| post.author == author))
            .filter(|post| match &needle {
                Some(needle) => {
                    contains_ci(&post.title, needle)
                        || contains_ci(&post.content, needle)
                        || contains_ci(&post.excerpt, needle)
                        || post.tags.iter().any(|tag| contains_ci(tag, needle))
                }
                None => true,
            })
            .collect();
        matches.sort_by(|a, b| compare_posts(a, b, query.sort_by, query.sort_order));
        Ok(paginate(&matches, query.page, query.per_page))
    }

    async fn toggle_like(&self, id: Uuid, user_id: Uuid) -> Result<LikeOutcome, RepoError> {
        let mut inner = self.inner.write().await;
        let post = inner.posts.get_mut(&id).ok_or(RepoError::NotFound)?;
        Ok(toggle(&mut post.likes, user_id))
    }

    async fn distinct_categories(&self) -> Result<Vec<String>, RepoError> {
        let inner = self.inner.read().await;
        let categories: BTreeSet<String> = inner
            .posts
            .values()
            .filter(|post| post.status == PostStatus::Published)
            .map(|post| post.category.clone())
            .collect();
        Ok(categories.into_iter().collect())
    }

    async fn delete_by_author(&self, author: Uuid) -> Result<Vec<Uuid>, RepoError> {
        let mut inner = self.inner.write().await;
        let ids: Vec<Uuid> = inner
            .posts
            .values()
            .filter(|post| post.author == author)
            .map(|post| post.id)
            .collect();
        for id in &ids {
            inner.posts.remove(id);
        }
        Ok(ids)
    }

    async fn pull_like(&self, user_id: Uuid) -> Result<(), RepoError> {
        let mut inner = self.inner.write().await;
        for post in inner.posts.values_mut() {
            post.likes.retain(|id| *id != user_id);
        }
        Ok(())
    }

    async fn author_stats(&self, author: Uuid) -> Result<AuthorStats, RepoError> {
        let inner = self.inner.read().await;
        let mut stats = AuthorStats::default();
        for post in inner
            .posts
            .values()
            .filter(|post| post.author == author && post.status == PostStatus::Published)
        {
            stats.posts_count += 1;
            stats.total_likes += post.likes.len() as u64;
            stats.total_views += post.views;
        }
        Ok(stats)
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        Ok(self.inner.read().await.comments.get(&id).cloned())
    }

    async fn insert(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut inner = self.inner.write().await;
        inner.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn update(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut inner = self.inner.write().await;
        let slot = inner
            .comments
            .get_mut(&comment.id)
            .ok_or(RepoError::NotFound)?;
        *slot = comment.clone();
        Ok(comment)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut inner = self.inner.write().await;
        inner.comments.remove(&id).ok_or(RepoError::NotFound)?;
        Ok(())
    }

    async fn list_for_post(
        &self,
        post_id: Uuid,
        query: &CommentQuery,
    ) -> Result<Page<Comment>, RepoError> {
        let inner = self.inner.read().await;
        let mut matches: Vec<&Comment> = inner
            .comments
            .values()
            .filter(|comment| comment.post_id == post_id)
            .collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(&matches, query.page, query.per_page))
    }

    async fn toggle_like(&self, id: Uuid, user_id: Uuid) -> Result<LikeOutcome, RepoError> {
        let mut inner = self.inner.write().await;
        let comment = inner.comments.get_mut(&id).ok_or(RepoError::NotFound)?;
        Ok(toggle(&mut comment.likes, user_id))
    }

    async fn delete_by_post(&self, post_id: Uuid) -> Result<u64, RepoError> {
        let mut inner = self.inner.write().await;
        let before = inner.comments.len();
        inner.comments.retain(|_, comment| comment.post_id != post_id);
        Ok((before - inner.comments.len()) as u64)
    }

    async fn delete_by_author(&self, author: Uuid) -> Result<u64, RepoError> {
        let mut inner = self.inner.write().await;
        let before = inner.comments.len();
        inner.comments.retain(|_, comment| comment.author != author);
        Ok((before - inner.comments.len()) as u64)
    }

    async fn pull_like(&self, user_id: Uuid) -> Result<(), RepoError> {
        let mut inner = self.inner.write().await;
        for comment in inner.comments.values_mut() {
            comment.likes.retain(|id| *id != user_id);
        }
        Ok(())
    }
}
