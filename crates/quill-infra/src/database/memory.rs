//! In-memory content store - used when no database is configured.
//!
//! Mirrors the constraints of the PostgreSQL schema: unique `(slug, publish)` per post,
//! unique tag names and slugs, comments and tag links that must point at stored rows,
//! and comments that are removed with their post. Data is lost on process restart.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{Comment, Post, Tag, stamp_for_write};
use quill_core::error::RepoError;
use quill_core::ports::{
    BaseRepository, CommentRepository, PostRepository, PostScope, TagRepository,
};
use quill_core::query::rank_similar;

#[derive(Default)]
struct StoreState {
    posts: HashMap<Uuid, Post>,
    comments: HashMap<Uuid, Comment>,
    tags: HashMap<Uuid, Tag>,
}

/// Shared in-memory store. Clones see the same data.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<StoreState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn posts(&self) -> InMemoryPostRepository {
        InMemoryPostRepository {
            state: self.state.clone(),
        }
    }

    pub fn comments(&self) -> InMemoryCommentRepository {
        InMemoryCommentRepository {
            state: self.state.clone(),
        }
    }

    pub fn tags(&self) -> InMemoryTagRepository {
        InMemoryTagRepository {
            state: self.state.clone(),
        }
    }
}

pub struct InMemoryPostRepository {
    state: Arc<RwLock<StoreState>>,
}

pub struct InMemoryCommentRepository {
    state: Arc<RwLock<StoreState>>,
}

pub struct InMemoryTagRepository {
    state: Arc<RwLock<StoreState>>,
}

/// Newest publish date first, then newest creation, then id.
fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| {
        b.publish_date
            .cmp(&a.publish_date)
            .then_with(|| b.created_at.cmp(&a.created_at))
            .then_with(|| a.id.cmp(&b.id))
    });
}

fn has_tag(post: &Post, tag: Option<&Tag>) -> bool {
    tag.is_none_or(|tag| post.tags.iter().any(|t| t.id == tag.id))
}

/// Stored posts carry the current version of each tag.
fn refresh_tags(post: &Post, tags: &HashMap<Uuid, Tag>) -> Post {
    let mut post = post.clone();
    let mut current: Vec<Tag> = post
        .tags
        .iter()
        .filter_map(|t| tags.get(&t.id).cloned())
        .collect();
    current.sort_by(|a, b| a.name.cmp(&b.name));
    post.tags = current;
    post
}

impl InMemoryPostRepository {
    async fn matching(&self, pred: impl Fn(&Post) -> bool) -> Vec<Post> {
        let state = self.state.read().await;
        let mut posts: Vec<Post> = state
            .posts
            .values()
            .filter(|p| pred(p))
            .map(|p| refresh_tags(p, &state.tags))
            .collect();
        sort_newest_first(&mut posts);
        posts
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        self.find_in_scope(PostScope::All, id).await
    }

    async fn save(&self, mut post: Post) -> Result<Post, RepoError> {
        post.validate()
            .map_err(|e| RepoError::Constraint(e.to_string()))?;

        let mut state = self.state.write().await;

        let clash = state.posts.values().any(|p| {
            p.id != post.id && p.slug == post.slug && p.publish_date == post.publish_date
        });
        if clash {
            return Err(RepoError::Constraint(format!(
                "slug '{}' is already used on {}",
                post.slug, post.publish_date
            )));
        }

        if let Some(missing) = post.tags.iter().find(|t| !state.tags.contains_key(&t.id)) {
            return Err(RepoError::Constraint(format!(
                "tag '{}' does not exist",
                missing.slug
            )));
        }

        let stored = state.posts.get(&post.id).cloned();
        stamp_for_write(&mut post, stored.as_ref(), Utc::now());
        post.tags.sort_by(|a, b| a.name.cmp(&b.name));
        state.posts.insert(post.id, post.clone());

        tracing::debug!(post_id = %post.id, slug = %post.slug, "Saved post");
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut state = self.state.write().await;
        if state.posts.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        state.comments.retain(|_, c| c.post_id != id);
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_in_scope(&self, scope: PostScope, id: Uuid) -> Result<Option<Post>, RepoError> {
        let state = self.state.read().await;
        Ok(state
            .posts
            .get(&id)
            .filter(|p| scope.admits(p))
            .map(|p| refresh_tags(p, &state.tags)))
    }

    async fn find_by_date(
        &self,
        scope: PostScope,
        date: NaiveDate,
        slug: &str,
    ) -> Result<Option<Post>, RepoError> {
        let found = self
            .matching(|p| scope.admits(p) && p.publish_date == date && p.slug == slug)
            .await;
        Ok(found.into_iter().next())
    }

    async fn count(&self, scope: PostScope, tag: Option<&Tag>) -> Result<u64, RepoError> {
        let state = self.state.read().await;
        let count = state
            .posts
            .values()
            .filter(|p| scope.admits(p) && has_tag(p, tag))
            .count();
        Ok(count as u64)
    }

    async fn list(
        &self,
        scope: PostScope,
        tag: Option<&Tag>,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError> {
        let posts = self
            .matching(|p| scope.admits(p) && has_tag(p, tag))
            .await;
        Ok(posts
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn list_similar(
        &self,
        scope: PostScope,
        post: &Post,
        limit: usize,
    ) -> Result<Vec<Post>, RepoError> {
        let candidates = self
            .matching(|p| p.id != post.id && scope.admits(p) && post.shared_tag_count(p) > 0)
            .await;
        Ok(rank_similar(post, candidates, limit))
    }
}

#[async_trait]
impl BaseRepository<Comment, Uuid> for InMemoryCommentRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        let state = self.state.read().await;
        Ok(state.comments.get(&id).cloned())
    }

    async fn save(&self, mut comment: Comment) -> Result<Comment, RepoError> {
        let mut state = self.state.write().await;
        if !state.posts.contains_key(&comment.post_id) {
            return Err(RepoError::Constraint(format!(
                "post {} does not exist",
                comment.post_id
            )));
        }

        let stored = state.comments.get(&comment.id).cloned();
        stamp_for_write(&mut comment, stored.as_ref(), Utc::now());
        state.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut state = self.state.write().await;
        state
            .comments
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn list_for_post(
        &self,
        post_id: Uuid,
        active_only: bool,
    ) -> Result<Vec<Comment>, RepoError> {
        let state = self.state.read().await;
        let mut comments: Vec<Comment> = state
            .comments
            .values()
            .filter(|c| c.post_id == post_id && (c.active || !active_only))
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(comments)
    }

    async fn count_for_post(&self, post_id: Uuid) -> Result<u64, RepoError> {
        let state = self.state.read().await;
        Ok(state.comments.values().filter(|c| c.post_id == post_id).count() as u64)
    }
}

#[async_trait]
impl TagRepository for InMemoryTagRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError> {
        let state = self.state.read().await;
        Ok(state.tags.values().find(|t| t.slug == slug).cloned())
    }

    async fn find_or_create(&self, name: &str) -> Result<Tag, RepoError> {
        let tag = Tag::new(name);
        tag.validate()
            .map_err(|e| RepoError::Constraint(e.to_string()))?;

        let mut state = self.state.write().await;
        if let Some(existing) = state.tags.values().find(|t| t.name == tag.name) {
            return Ok(existing.clone());
        }
        if state.tags.values().any(|t| t.slug == tag.slug) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }

        state.tags.insert(tag.id, tag.clone());
        tracing::debug!(tag = %tag.slug, "Created tag");
        Ok(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn published(title: &str, slug: &str, day: NaiveDate, tags: Vec<Tag>) -> Post {
        let mut post = Post::new(Uuid::new_v4(), title, slug, "Body", day).with_tags(tags);
        post.publish().unwrap();
        post
    }

    #[tokio::test]
    async fn test_save_stamps_and_keeps_created_at() {
        let store = InMemoryStore::new();
        let posts = store.posts();

        let post = Post::new(Uuid::new_v4(), "First", "first", "Body", date(2024, 1, 5));
        let saved = posts.save(post).await.unwrap();
        assert_eq!(saved.created_at, saved.updated_at);

        let resaved = posts.save(saved.clone()).await.unwrap();
        assert_eq!(resaved.created_at, saved.created_at);
        assert!(resaved.updated_at > saved.updated_at);

        let again = posts.save(resaved.clone()).await.unwrap();
        assert_eq!(again.created_at, saved.created_at);
        assert!(again.updated_at > resaved.updated_at);

        let stored = posts.find_by_id(saved.id).await.unwrap().unwrap();
        assert_eq!(stored.created_at, saved.created_at);
        assert_eq!(stored.updated_at, again.updated_at);
    }

    #[tokio::test]
    async fn test_slug_unique_per_publish_date() {
        let store = InMemoryStore::new();
        let posts = store.posts();

        posts
            .save(Post::new(Uuid::new_v4(), "A", "same", "x", date(2024, 1, 5)))
            .await
            .unwrap();
        let clash = posts
            .save(Post::new(Uuid::new_v4(), "B", "same", "x", date(2024, 1, 5)))
            .await;
        assert!(matches!(clash, Err(RepoError::Constraint(_))));

        let other_day = posts
            .save(Post::new(Uuid::new_v4(), "C", "same", "x", date(2024, 1, 6)))
            .await;
        assert!(other_day.is_ok());
    }

    #[tokio::test]
    async fn test_invalid_post_rejected() {
        let posts = InMemoryStore::new().posts();
        let result = posts
            .save(Post::new(Uuid::new_v4(), "", "ok", "x", date(2024, 1, 5)))
            .await;
        assert!(matches!(result, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_unknown_tag_rejected() {
        let posts = InMemoryStore::new().posts();
        let post = published("A", "a", date(2024, 1, 5), vec![Tag::new("ghost")]);
        assert!(matches!(posts.save(post).await, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_scopes_hide_drafts() {
        let store = InMemoryStore::new();
        let posts = store.posts();

        let draft = posts
            .save(Post::new(Uuid::new_v4(), "Draft", "draft", "x", date(2024, 1, 5)))
            .await
            .unwrap();
        posts
            .save(published("Live", "live", date(2024, 1, 5), vec![]))
            .await
            .unwrap();

        assert_eq!(posts.count(PostScope::All, None).await.unwrap(), 2);
        assert_eq!(posts.count(PostScope::Published, None).await.unwrap(), 1);
        assert!(
            posts
                .find_in_scope(PostScope::Published, draft.id)
                .await
                .unwrap()
                .is_none()
        );
        assert!(posts.find_by_id(draft.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_list_orders_newest_first() {
        let posts = InMemoryStore::new().posts();
        for (slug, day) in [("old", 1), ("new", 3), ("mid", 2)] {
            posts
                .save(published(slug, slug, date(2024, 1, day), vec![]))
                .await
                .unwrap();
        }

        let listed = posts.list(PostScope::Published, None, 0, 10).await.unwrap();
        let slugs: Vec<&str> = listed.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, ["new", "mid", "old"]);

        let second = posts.list(PostScope::Published, None, 1, 1).await.unwrap();
        assert_eq!(second[0].slug, "mid");
    }

    #[tokio::test]
    async fn test_find_by_date() {
        let posts = InMemoryStore::new().posts();
        posts
            .save(published("Hello", "hello", date(2024, 3, 9), vec![]))
            .await
            .unwrap();

        let found = posts
            .find_by_date(PostScope::Published, date(2024, 3, 9), "hello")
            .await
            .unwrap();
        assert_eq!(found.unwrap().title, "Hello");

        let wrong_day = posts
            .find_by_date(PostScope::Published, date(2024, 3, 10), "hello")
            .await
            .unwrap();
        assert!(wrong_day.is_none());
    }

    #[tokio::test]
    async fn test_tag_filter_and_sharing() {
        let store = InMemoryStore::new();
        let (posts, tags) = (store.posts(), store.tags());
        let rust = tags.find_or_create("Rust").await.unwrap();
        let web = tags.find_or_create("Web").await.unwrap();

        let a = posts
            .save(published("A", "a", date(2024, 1, 1), vec![rust.clone()]))
            .await
            .unwrap();
        let b = posts
            .save(published("B", "b", date(2024, 1, 2), vec![web.clone()]))
            .await
            .unwrap();

        let tagged = posts.list(PostScope::Published, Some(&rust), 0, 10).await.unwrap();
        assert_eq!(tagged.len(), 1);
        assert_eq!(tagged[0].id, a.id);
        assert_eq!(posts.count(PostScope::Published, Some(&web)).await.unwrap(), 1);

        let both = posts
            .save(published("C", "c", date(2024, 1, 3), vec![rust.clone(), web.clone()]))
            .await
            .unwrap();
        let source = published("S", "s", date(2024, 1, 4), vec![rust, web]);

        let similar = posts
            .list_similar(PostScope::Published, &source, 4)
            .await
            .unwrap();
        let ids: Vec<Uuid> = similar.iter().map(|p| p.id).collect();
        assert_eq!(ids, [both.id, b.id, a.id]);

        let limited = posts
            .list_similar(PostScope::Published, &both, 1)
            .await
            .unwrap();
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].id, b.id);
    }

    #[tokio::test]
    async fn test_find_or_create_tag_is_idempotent() {
        let tags = InMemoryStore::new().tags();
        let first = tags.find_or_create("Web Dev").await.unwrap();
        let again = tags.find_or_create("  Web Dev ").await.unwrap();

        assert_eq!(first.id, again.id);
        assert_eq!(first.slug, "web-dev");
        assert_eq!(tags.find_by_slug("web-dev").await.unwrap(), Some(first));
        assert!(matches!(
            tags.find_or_create("!!!").await,
            Err(RepoError::Constraint(_))
        ));
        assert!(matches!(
            tags.find_or_create(&"x".repeat(101)).await,
            Err(RepoError::Constraint(_))
        ));
    }

    #[tokio::test]
    async fn test_comments_follow_their_post() {
        let store = InMemoryStore::new();
        let (posts, comments) = (store.posts(), store.comments());
        let post = posts
            .save(published("A", "a", date(2024, 1, 1), vec![]))
            .await
            .unwrap();

        let first = comments
            .save(Comment::new(post.id, "Ann", "ann@example.com", "First"))
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;

        let mut hidden = Comment::new(post.id, "Bob", "bob@example.com", "Spam");
        hidden.deactivate();
        comments.save(hidden).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;

        comments
            .save(Comment::new(post.id, "Cy", "cy@example.com", "Second"))
            .await
            .unwrap();

        let active = comments.list_for_post(post.id, true).await.unwrap();
        let bodies: Vec<&str> = active.iter().map(|c| c.body.as_str()).collect();
        assert_eq!(bodies, ["First", "Second"]);
        assert_eq!(active[0].id, first.id);
        assert_eq!(comments.count_for_post(post.id).await.unwrap(), 3);

        posts.delete(post.id).await.unwrap();
        assert_eq!(comments.count_for_post(post.id).await.unwrap(), 0);
        assert!(matches!(posts.delete(post.id).await, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_comment_requires_post() {
        let comments = InMemoryStore::new().comments();
        let orphan = Comment::new(Uuid::new_v4(), "Ann", "ann@example.com", "Hi");
        assert!(matches!(comments.save(orphan).await, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_post_queries_over_store() {
        use quill_core::DomainError;
        use quill_core::domain::PostLocator;
        use quill_core::query::{PostQueries, SIMILAR_POSTS_LIMIT};

        let store = InMemoryStore::new();
        let (posts, tags) = (store.posts(), store.tags());
        let django = tags.find_or_create("django").await.unwrap();
        let python = tags.find_or_create("python").await.unwrap();
        let go = tags.find_or_create("go").await.unwrap();

        let p = posts
            .save(published("P", "p", date(2024, 4, 3), vec![django, python.clone()]))
            .await
            .unwrap();
        let q = posts
            .save(published("Q", "q", date(2024, 4, 2), vec![python]))
            .await
            .unwrap();
        posts
            .save(published("R", "r", date(2024, 4, 1), vec![go]))
            .await
            .unwrap();

        let queries = PostQueries::new(Arc::new(store.posts()), Arc::new(store.tags()));

        let similar = queries.similar_posts(&p, SIMILAR_POSTS_LIMIT).await.unwrap();
        let ids: Vec<Uuid> = similar.iter().map(|post| post.id).collect();
        assert_eq!(ids, [q.id]);

        let found = queries
            .published_by_date(&PostLocator::new(2024, 4, 3, "p"))
            .await
            .unwrap();
        assert_eq!(found.id, p.id);

        let impossible = queries
            .published_by_date(&PostLocator::new(2024, 4, 31, "p"))
            .await;
        assert!(matches!(impossible, Err(DomainError::NotFound { .. })));

        let listing = queries.list_published(Some("python"), None).await.unwrap();
        assert_eq!(listing.posts.total, 2);
        assert_eq!(listing.tag.map(|t| t.slug), Some("python".to_string()));

        let missing = queries.list_published(Some("rust"), Some("1")).await;
        assert!(matches!(missing, Err(DomainError::NotFound { entity_type: "Tag", .. })));
    }
}
