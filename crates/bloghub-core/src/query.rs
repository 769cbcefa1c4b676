//! List query engine - filter, sort and pagination parameters shared by all
//! list endpoints, plus the pagination metadata computed from result counts.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::PostStatus;

/// Sort direction. Descending is the default everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl Default for SortOrder {
    fn default() -> Self {
        Self::Desc
    }
}

/// Sortable post fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PostSortField {
    PublishedAt,
    CreatedAt,
    UpdatedAt,
    Views,
    Title,
}

impl Default for PostSortField {
    fn default() -> Self {
        Self::PublishedAt
    }
}

/// Query options for listing posts.
#[derive(Debug, Clone)]
pub struct PostQuery {
    pub page: u64,
    pub per_page: u64,
    /// Category equality filter. `None` or `"all"` applies no filter.
    pub category: Option<String>,
    /// Author equality filter.
    pub author: Option<Uuid>,
    /// Status equality filter.
    pub status: Option<PostStatus>,
    /// Case-insensitive substring match over title/content/excerpt/tags.
    pub search: Option<String>,
    pub sort_by: PostSortField,
    pub sort_order: SortOrder,
}

impl Default for PostQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 10,
            category: None,
            author: None,
            status: None,
            search: None,
            sort_by: PostSortField::default(),
            sort_order: SortOrder::default(),
        }
    }
}

impl PostQuery {
    /// Whether the category filter is active. `"all"` is treated as absent.
    pub fn category_filter(&self) -> Option<&str> {
        self.category
            .as_deref()
            .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case("all"))
    }

    pub fn offset(&self) -> u64 {
        page_offset(self.page, self.per_page)
    }
}

/// Query options for listing comments of a post.
#[derive(Debug, Clone)]
pub struct CommentQuery {
    pub page: u64,
    pub per_page: u64,
}

impl Default for CommentQuery {
    fn default() -> Self {
        Self { page: 1, per_page: 20 }
    }
}

impl CommentQuery {
    pub fn offset(&self) -> u64 {
        page_offset(self.page, self.per_page)
    }
}

/// Query options for listing users.
#[derive(Debug, Clone)]
pub struct UserQuery {
    pub page: u64,
    pub per_page: u64,
    /// Case-insensitive substring match across full name, username and email.
    pub search: Option<String>,
}

impl Default for UserQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 20,
            search: None,
        }
    }
}

impl UserQuery {
    pub fn offset(&self) -> u64 {
        page_offset(self.page, self.per_page)
    }
}

/// `(page - 1) * per_page`, with page clamped to 1.
fn page_offset(page: u64, per_page: u64) -> u64 {
    page.max(1).saturating_sub(1) * per_page
}

/// Pagination metadata attached to every list response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_items: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    /// Compute metadata for a page of `returned` items out of `total` matches.
    pub fn new(page: u64, per_page: u64, returned: u64, total: u64) -> Self {
        let page = page.max(1);
        let total_pages = if per_page == 0 { 0 } else { total.div_ceil(per_page) };
        let offset = page_offset(page, per_page);
        Self {
            current_page: page,
            total_pages,
            total_items: total,
            has_next: offset + returned < total,
            has_prev: page > 1,
        }
    }
}

/// One page of results together with its metadata.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, page: u64, per_page: u64, total: u64) -> Self {
        let pagination = Pagination::new(page, per_page, items.len() as u64, total);
        Self { items, pagination }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}
