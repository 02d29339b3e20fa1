use serde::{Deserialize, Serialize};
use validator::Validate;

use super::ValidationErrors;
use super::errors::email_address;
use crate::domain::{Comment, Post};

/// Reader comment submission.
///
/// Limits match the `comments` columns: name 80 characters, e-mail 254.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CommentForm {
    #[serde(default)]
    #[validate(length(min = 1, max = 80))]
    pub name: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 254), custom(function = "email_address"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub body: String,
}

impl CommentForm {
    /// Validate and return the trimmed field values.
    pub fn clean(&self) -> Result<CommentForm, ValidationErrors> {
        let cleaned = CommentForm {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            body: self.body.trim().to_string(),
        };
        ValidationErrors::check(&cleaned).into_result(cleaned)
    }

    /// Build an unsaved comment on `post`. The caller decides when to persist it.
    pub fn build_comment(&self, post: &Post) -> Result<Comment, ValidationErrors> {
        let cleaned = self.clean()?;
        Ok(Comment::new(post.id, cleaned.name, cleaned.email, cleaned.body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EMAIL_MAX_LEN, NAME_MAX_LEN};
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn post() -> Post {
        Post::new(
            Uuid::new_v4(),
            "Title",
            "title",
            "body",
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        )
    }

    fn form(name: &str, email: &str, body: &str) -> CommentForm {
        CommentForm {
            name: name.into(),
            email: email.into(),
            body: body.into(),
        }
    }

    #[test]
    fn rejects_each_empty_field() {
        let errors = form("", "", "").clean().unwrap_err();
        assert!(errors.has("name"));
        assert!(errors.has("email"));
        assert!(errors.has("body"));

        let errors = form("Ann", "", "Nice post").clean().unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["email"]);
    }

    #[test]
    fn rejects_invalid_email_and_long_name() {
        let errors = form(&"n".repeat(NAME_MAX_LEN + 1), "ann-at-example", "hi")
            .clean()
            .unwrap_err();
        assert!(errors.has("name"));
        assert_eq!(errors.get("email"), ["Enter a valid email address.".to_string()]);

        let long_email = format!("{}@example.com", "a".repeat(EMAIL_MAX_LEN));
        let errors = form("Ann", &long_email, "hi").clean().unwrap_err();
        assert!(errors.get("email")[0].starts_with("Ensure this value has at most 254"));
    }

    #[test]
    fn whitespace_only_fields_are_blank() {
        let errors = form("   ", "ann@example.com", "\t").clean().unwrap_err();
        assert_eq!(errors.get("name"), ["This field is required.".to_string()]);
        assert_eq!(errors.get("body"), ["This field is required.".to_string()]);
    }

    #[test]
    fn builds_unsaved_comment_bound_to_post() {
        let post = post();
        let comment = form(" Ann ", "ann@example.com", " Nice post ")
            .build_comment(&post)
            .unwrap();

        assert_eq!(comment.post_id, post.id);
        assert_eq!(comment.name, "Ann");
        assert_eq!(comment.body, "Nice post");
        assert!(comment.active);
        assert_eq!(comment.describe(&post), "Comment by Ann on Title");
    }
}
