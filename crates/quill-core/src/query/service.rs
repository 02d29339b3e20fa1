use std::sync::Arc;

use uuid::Uuid;

use super::{PAGE_SIZE, Page, resolve_page};
use crate::domain::{Post, PostLocator, Tag};
use crate::error::DomainError;
use crate::ports::{PostRepository, PostScope, TagRepository};

/// A page of published posts, with the tag it was filtered by.
#[derive(Debug, Clone)]
pub struct PostListing {
    pub posts: Page<Post>,
    pub tag: Option<Tag>,
}

/// Read-side queries over published posts.
#[derive(Clone)]
pub struct PostQueries {
    posts: Arc<dyn PostRepository>,
    tags: Arc<dyn TagRepository>,
}

impl PostQueries {
    pub fn new(posts: Arc<dyn PostRepository>, tags: Arc<dyn TagRepository>) -> Self {
        Self { posts, tags }
    }

    /// Published posts, newest first, optionally restricted to one tag.
    pub async fn list_published(
        &self,
        tag_slug: Option<&str>,
        page: Option<&str>,
    ) -> Result<PostListing, DomainError> {
        let tag = match tag_slug {
            Some(slug) => Some(
                self.tags
                    .find_by_slug(slug)
                    .await?
                    .ok_or_else(|| DomainError::not_found("Tag", slug))?,
            ),
            None => None,
        };

        let total = self.posts.count(PostScope::Published, tag.as_ref()).await?;
        let window = resolve_page(page, total, PAGE_SIZE);
        let items = self
            .posts
            .list(
                PostScope::Published,
                tag.as_ref(),
                window.offset,
                window.per_page,
            )
            .await?;

        tracing::debug!(
            tag = tag_slug.unwrap_or("-"),
            page = window.number,
            total,
            "Listed published posts"
        );

        Ok(PostListing {
            posts: Page::new(items, window, total),
            tag,
        })
    }

    /// The published post at `locator`.
    pub async fn published_by_date(&self, locator: &PostLocator) -> Result<Post, DomainError> {
        let not_found = || DomainError::not_found("Post", locator.path());
        let date = locator.date().ok_or_else(not_found)?;

        self.posts
            .find_by_date(PostScope::Published, date, &locator.slug)
            .await?
            .ok_or_else(not_found)
    }

    pub async fn published_by_id(&self, id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_in_scope(PostScope::Published, id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", id))
    }

    /// Published posts sharing tags with `post`, best matches first.
    pub async fn similar_posts(&self, post: &Post, limit: usize) -> Result<Vec<Post>, DomainError> {
        if post.tags.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        Ok(self
            .posts
            .list_similar(PostScope::Published, post, limit)
            .await?)
    }
}
