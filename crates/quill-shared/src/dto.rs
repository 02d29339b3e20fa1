//! View contexts handed to the renderer.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A tag with its listing URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagResponse {
    pub name: String,
    pub slug: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub author_id: Uuid,
    pub body: String,
    pub publish: NaiveDate,
    pub status: String,
    /// Canonical path, `/{year}/{month}/{day}/{slug}/`.
    pub url: String,
    pub tags: Vec<TagResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: Uuid,
    pub name: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Pagination metadata for a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResponse {
    pub number: u64,
    pub num_pages: u64,
    pub per_page: u64,
    pub total: u64,
    pub has_next: bool,
    pub has_previous: bool,
    pub next_page_number: Option<u64>,
    pub previous_page_number: Option<u64>,
}

/// Submitted (or empty) form data with field-level errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormResponse<T> {
    pub data: T,
    pub errors: BTreeMap<String, Vec<String>>,
}

impl<T> FormResponse<T> {
    pub fn unbound(data: T) -> Self {
        Self {
            data,
            errors: BTreeMap::new(),
        }
    }
}

/// Context of `blog/post/list`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostListContext {
    pub posts: Vec<PostResponse>,
    pub page: PageResponse,
    pub tag: Option<TagResponse>,
}

/// Context of `blog/post/detail`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetailContext<F> {
    pub post: PostResponse,
    pub comments: Vec<CommentResponse>,
    pub form: FormResponse<F>,
    pub similar_posts: Vec<PostResponse>,
}

/// Context of `blog/post/share`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareContext<F> {
    pub post: PostResponse,
    pub form: FormResponse<F>,
    pub sent: bool,
}

/// Context of `blog/post/comment`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentContext<F> {
    pub post: PostResponse,
    pub form: FormResponse<F>,
    pub comment: Option<CommentResponse>,
}
