use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{Comment, Post, Tag};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update). Timestamps are set on the way in.
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Which posts a query may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostScope {
    /// Every stored post, drafts included.
    All,
    /// Published posts only.
    Published,
}

impl PostScope {
    pub fn admits(&self, post: &Post) -> bool {
        match self {
            Self::All => true,
            Self::Published => post.is_published(),
        }
    }
}

/// Post repository. Lists are ordered newest publish date first.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    async fn find_in_scope(&self, scope: PostScope, id: Uuid) -> Result<Option<Post>, RepoError>;

    /// Look a post up by its publish date and slug.
    async fn find_by_date(
        &self,
        scope: PostScope,
        date: NaiveDate,
        slug: &str,
    ) -> Result<Option<Post>, RepoError>;

    async fn count(&self, scope: PostScope, tag: Option<&Tag>) -> Result<u64, RepoError>;

    async fn list(
        &self,
        scope: PostScope,
        tag: Option<&Tag>,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError>;

    /// Up to `limit` other posts sharing at least one tag with `post`.
    ///
    /// Ordered by shared-tag count descending, then publish date descending,
    /// then id.
    async fn list_similar(
        &self,
        scope: PostScope,
        post: &Post,
        limit: usize,
    ) -> Result<Vec<Post>, RepoError>;
}

/// Comment repository. Lists are ordered oldest first.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    async fn list_for_post(
        &self,
        post_id: Uuid,
        active_only: bool,
    ) -> Result<Vec<Comment>, RepoError>;

    async fn count_for_post(&self, post_id: Uuid) -> Result<u64, RepoError>;
}

#[async_trait]
pub trait TagRepository: Send + Sync {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError>;

    /// Return the tag with this name, creating it if it does not exist yet.
    async fn find_or_create(&self, name: &str) -> Result<Tag, RepoError>;
}
