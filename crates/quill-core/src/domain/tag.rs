use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::slugify;
use crate::error::DomainError;

/// Longest tag name or slug the store accepts.
pub const TAG_NAME_MAX_LEN: usize = 100;

/// A label shared between posts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

impl Tag {
    /// Create a tag whose slug is derived from its name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into().trim().to_string();
        let slug = slugify(&name);
        Self {
            id: Uuid::new_v4(),
            name,
            slug,
        }
    }

    /// Checks applied before a tag is stored.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.slug.is_empty() {
            return Err(DomainError::Validation(format!(
                "tag name '{}' has no letters or digits",
                self.name
            )));
        }
        if self.name.chars().count() > TAG_NAME_MAX_LEN
            || self.slug.chars().count() > TAG_NAME_MAX_LEN
        {
            return Err(DomainError::Validation(format!(
                "tag name must be at most {TAG_NAME_MAX_LEN} characters"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_follows_name() {
        let tag = Tag::new("  Web Dev ");
        assert_eq!(tag.name, "Web Dev");
        assert_eq!(tag.slug, "web-dev");
        assert!(tag.validate().is_ok());
    }

    #[test]
    fn rejects_empty_slug_and_long_names() {
        assert!(Tag::new("!!!").validate().is_err());
        assert!(Tag::new("a".repeat(TAG_NAME_MAX_LEN)).validate().is_ok());
        assert!(Tag::new("a".repeat(TAG_NAME_MAX_LEN + 1)).validate().is_err());
    }
}
