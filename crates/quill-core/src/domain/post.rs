use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{PostLocator, Record, Tag, is_valid_slug};
use crate::error::DomainError;

pub const TITLE_MAX_LEN: usize = 255;
pub const SLUG_MAX_LEN: usize = 255;

/// Publication state of a post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
}

impl PostStatus {
    /// Two-letter storage code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Draft => "DR",
            Self::Published => "PB",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "DR" => Some(Self::Draft),
            "PB" => Some(Self::Published),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Published => "Published",
        }
    }

    /// Move to `next`. Publication is one-way: a published post never returns to draft.
    pub fn transition_to(self, next: PostStatus) -> Result<PostStatus, DomainError> {
        match (self, next) {
            (Self::Published, Self::Draft) => Err(DomainError::InvalidTransition {
                from: self,
                to: next,
            }),
            _ => Ok(next),
        }
    }
}

/// Post entity - a blog article.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub author_id: Uuid,
    pub body: String,
    pub publish_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub status: PostStatus,
    pub tags: Vec<Tag>,
}

impl Post {
    /// Create a new draft post without tags.
    pub fn new(
        author_id: Uuid,
        title: impl Into<String>,
        slug: impl Into<String>,
        body: impl Into<String>,
        publish_date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            slug: slug.into(),
            author_id,
            body: body.into(),
            publish_date,
            created_at: now,
            updated_at: now,
            status: PostStatus::Draft,
            tags: Vec::new(),
        }
    }

    /// Replace the tag set. Duplicate tags are dropped.
    pub fn with_tags(mut self, tags: Vec<Tag>) -> Self {
        self.set_tags(tags);
        self
    }

    pub fn set_tags(&mut self, tags: Vec<Tag>) {
        let mut seen = HashSet::new();
        self.tags = tags.into_iter().filter(|t| seen.insert(t.id)).collect();
    }

    pub fn publish(&mut self) -> Result<(), DomainError> {
        self.status = self.status.transition_to(PostStatus::Published)?;
        Ok(())
    }

    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }

    pub fn tag_ids(&self) -> Vec<Uuid> {
        self.tags.iter().map(|t| t.id).collect()
    }

    /// Number of tags this post has in common with `other`.
    pub fn shared_tag_count(&self, other: &Post) -> usize {
        let mine: HashSet<Uuid> = self.tags.iter().map(|t| t.id).collect();
        other.tags.iter().filter(|t| mine.contains(&t.id)).count()
    }

    pub fn locator(&self) -> PostLocator {
        PostLocator::for_post(self)
    }

    pub fn absolute_path(&self) -> String {
        self.locator().path()
    }

    /// Field checks applied on every save.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.title.trim().is_empty() {
            return Err(DomainError::Validation("title is required".to_string()));
        }
        if self.title.chars().count() > TITLE_MAX_LEN {
            return Err(DomainError::Validation(format!(
                "title must be at most {TITLE_MAX_LEN} characters"
            )));
        }
        if self.slug.chars().count() > SLUG_MAX_LEN || !is_valid_slug(&self.slug) {
            return Err(DomainError::Validation(format!(
                "slug '{}' is not a valid slug",
                self.slug
            )));
        }
        Ok(())
    }
}

impl Record for Post {
    type Id = Uuid;

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn set_timestamps(&mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) {
        self.created_at = created_at;
        self.updated_at = updated_at;
    }
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> Post {
        Post::new(
            Uuid::new_v4(),
            "Who was Django Reinhardt?",
            "who-was-django-reinhardt",
            "A jazz guitarist.",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        )
    }

    #[test]
    fn new_posts_start_as_drafts() {
        let post = draft();
        assert_eq!(post.status, PostStatus::Draft);
        assert!(!post.is_published());
        assert_eq!(post.to_string(), "Who was Django Reinhardt?");
    }

    #[test]
    fn publishing_is_one_way() {
        let mut post = draft();
        post.publish().unwrap();
        assert!(post.is_published());

        let back = post.status.transition_to(PostStatus::Draft);
        assert!(matches!(back, Err(DomainError::InvalidTransition { .. })));
        assert!(post.publish().is_ok());
    }

    #[test]
    fn status_codes_round_trip() {
        for status in [PostStatus::Draft, PostStatus::Published] {
            assert_eq!(PostStatus::from_code(status.code()), Some(status));
        }
        assert_eq!(PostStatus::from_code("XX"), None);
    }

    #[test]
    fn shared_tags_are_counted_by_id() {
        let django = Tag::new("django");
        let python = Tag::new("python");
        let go = Tag::new("go");

        let a = draft().with_tags(vec![django.clone(), python.clone(), django.clone()]);
        let b = draft().with_tags(vec![python, go]);

        assert_eq!(a.tags.len(), 2);
        assert_eq!(a.shared_tag_count(&b), 1);
        assert_eq!(b.shared_tag_count(&a), 1);
    }

    #[test]
    fn validation_rejects_long_titles_and_bad_slugs() {
        let mut post = draft();
        assert!(post.validate().is_ok());

        post.title = "x".repeat(TITLE_MAX_LEN + 1);
        assert!(post.validate().is_err());

        post.title = "ok".into();
        post.slug = "not a slug".into();
        assert!(post.validate().is_err());
    }

    #[test]
    fn absolute_path_follows_publish_date() {
        let post = draft();
        assert_eq!(post.absolute_path(), "/2024/1/1/who-was-django-reinhardt/");
    }
}
