use serde::{Deserialize, Serialize};
use validator::Validate;

use super::ValidationErrors;
use super::errors::email_address;
use crate::domain::Post;
use crate::ports::MailMessage;

/// "E-mail this post to a friend" submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct SharePostForm {
    #[serde(default)]
    #[validate(length(min = 1, max = 25))]
    pub name: String,
    /// Sender address.
    #[serde(default)]
    #[validate(length(min = 1, max = 254), custom(function = "email_address"))]
    pub email: String,
    /// Recipient address.
    #[serde(default)]
    #[validate(length(min = 1, max = 254), custom(function = "email_address"))]
    pub to: String,
    #[serde(default)]
    pub comments: String,
}

impl SharePostForm {
    pub fn clean(&self) -> Result<SharePostForm, ValidationErrors> {
        let cleaned = SharePostForm {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            to: self.to.trim().to_string(),
            comments: self.comments.trim().to_string(),
        };
        ValidationErrors::check(&cleaned).into_result(cleaned)
    }

    /// Compose the recommendation message for a cleaned form.
    ///
    /// `post_url` is the absolute URL of the post; `from` the site's sender address.
    pub fn compose(&self, post: &Post, post_url: &str, from: &str) -> MailMessage {
        let subject = format!("{} recommends you read {}", self.name, post.title);
        let body = format!(
            "Read {} at {}\n\n{}'s comments: {}",
            post.title, post_url, self.name, self.comments
        );
        MailMessage::new(subject, body, from, vec![self.to.clone()]).with_reply_to(&self.email)
    }
}
